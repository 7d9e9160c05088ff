use std::collections::HashMap;
use std::sync::Arc;

use log::info;

use crate::api::traits::RemoteApi;
use crate::errors::CoreError;
use crate::models::admin::{AdminOverview, UserPortfolio, UserPortfolioSummary, UserRecord};
use crate::models::holding::PortfolioEntry;
use crate::models::session::Session;
use crate::services::valuation_service::ValuationEngine;

/// Cross-user figures for the admin dashboard.
pub struct AdminService {
    api: Arc<dyn RemoteApi>,
    engine: ValuationEngine,
}

impl AdminService {
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self {
            api,
            engine: ValuationEngine::new(),
        }
    }

    /// Fetch users and portfolios together and summarize them.
    ///
    /// Rejected locally with `Unauthorized` unless the session is an admin.
    pub async fn overview(&self, session: &Session) -> Result<AdminOverview, CoreError> {
        if !session.identity.is_admin() {
            return Err(CoreError::Unauthorized);
        }

        let (users, portfolios) = tokio::join!(
            self.api.admin_users(&session.token),
            self.api.admin_portfolios(&session.token)
        );
        let overview = self.summarize(users?, portfolios?);
        info!(
            "[Admin] {} user(s), {} active portfolio(s)",
            overview.total_users, overview.active_portfolios
        );
        Ok(overview)
    }

    #[must_use]
    pub fn summarize(&self, users: Vec<UserRecord>, portfolios: Vec<UserPortfolio>) -> AdminOverview {
        let values: HashMap<i64, (f64, usize)> = portfolios
            .iter()
            .map(|p| (p.user_id, (self.portfolio_value(&p.portfolio), p.portfolio.len())))
            .collect();

        let total_portfolio_value = values.values().map(|(value, _)| value).sum();
        let active_portfolios = portfolios.iter().filter(|p| !p.portfolio.is_empty()).count();

        let summaries = users
            .iter()
            .map(|user| {
                let (portfolio_value, holdings_count) =
                    values.get(&user.id).copied().unwrap_or((0.0, 0));
                UserPortfolioSummary {
                    user: user.clone(),
                    portfolio_value,
                    holdings_count,
                }
            })
            .collect();

        AdminOverview {
            total_users: users.len(),
            total_portfolio_value,
            active_portfolios,
            users: summaries,
            portfolios,
        }
    }

    /// Market value of one user's holdings.
    fn portfolio_value(&self, entries: &[PortfolioEntry]) -> f64 {
        let (holdings, quotes) = PortfolioEntry::split_all(entries.to_vec());
        self.engine.aggregate(&holdings, &quotes).total.market_value
    }
}
