use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::api::traits::RemoteApi;
use crate::errors::CoreError;
use crate::models::holding::{Holding, NewHolding, PortfolioEntry, Quote};
use crate::models::identity::Token;
use crate::models::valuation::PortfolioValuation;
use crate::services::valuation_service::ValuationEngine;

/// What the portfolio view shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioOverview {
    pub holdings: Vec<Holding>,
    pub quotes: Vec<Quote>,
    pub valuation: PortfolioValuation,
    /// Mean market value per holding (0 with no holdings)
    pub average_position: f64,
}

/// Reads and extends the user's portfolio on the remote service.
pub struct PortfolioService {
    api: Arc<dyn RemoteApi>,
    engine: ValuationEngine,
}

impl PortfolioService {
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self {
            api,
            engine: ValuationEngine::new(),
        }
    }

    /// Current holdings, each joined with its latest close.
    pub async fn fetch(&self, token: &Token) -> Result<Vec<PortfolioEntry>, CoreError> {
        let entries = self.api.get_portfolio(token).await?;
        debug!("[Portfolio] Fetched {} holding(s)", entries.len());
        Ok(entries)
    }

    /// Record a holding, then fetch the portfolio again as a fresh list.
    ///
    /// The symbol is trimmed and upper-cased. Quantity must be a finite,
    /// non-negative number; so must the average buy price when given.
    pub async fn add_holding(
        &self,
        token: &Token,
        holding: NewHolding,
    ) -> Result<Vec<PortfolioEntry>, CoreError> {
        let holding = Self::validate(holding)?;
        self.api.add_holding(token, &holding).await?;
        info!("[Portfolio] Recorded {} x {}", holding.quantity, holding.symbol);
        self.fetch(token).await
    }

    /// Holdings with valuations and the average position value.
    pub async fn overview(&self, token: &Token) -> Result<PortfolioOverview, CoreError> {
        let entries = self.fetch(token).await?;
        Ok(self.build_overview(entries))
    }

    #[must_use]
    pub fn build_overview(&self, entries: Vec<PortfolioEntry>) -> PortfolioOverview {
        let (holdings, quotes) = PortfolioEntry::split_all(entries);
        let valuation = self.engine.aggregate(&holdings, &quotes);
        let per_position: Vec<_> = valuation.positions.iter().map(|p| p.valuation).collect();
        let average_position = self.engine.average_position(&per_position);
        PortfolioOverview {
            holdings,
            quotes,
            valuation,
            average_position,
        }
    }

    fn validate(holding: NewHolding) -> Result<NewHolding, CoreError> {
        let symbol = holding.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(CoreError::ValidationError("Symbol is required".into()));
        }
        if !holding.quantity.is_finite() || holding.quantity < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Quantity must be a non-negative number, got {}",
                holding.quantity
            )));
        }
        if let Some(price) = holding.avg_buy_price {
            if !price.is_finite() || price < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "Average buy price must be a non-negative number, got {price}"
                )));
            }
        }
        Ok(NewHolding {
            symbol,
            quantity: holding.quantity,
            avg_buy_price: holding.avg_buy_price,
        })
    }
}
