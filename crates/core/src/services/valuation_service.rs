use std::collections::HashMap;

use crate::models::holding::{Holding, Quote};
use crate::models::valuation::{PortfolioValuation, PositionValuation, Valuation};

/// Turns holdings and quotes into market value and unrealized P&L.
///
/// Stateless and infallible: a missing price or average buy price is
/// valued at zero. Views that need to show "no price" read the
/// `Option` fields kept on [`PositionValuation`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValuationEngine;

impl ValuationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Value one holding against its quote (`None` means no quote).
    #[must_use]
    pub fn value_holding(&self, holding: &Holding, quote: Option<&Quote>) -> Valuation {
        let last_price = quote.and_then(|q| q.last_price);
        Self::value(holding.quantity, holding.avg_buy_price, last_price)
    }

    /// Join holdings to quotes by symbol (case-insensitive) and sum.
    ///
    /// A holding without a quote is valued at zero. When several quotes
    /// share a symbol the last one wins.
    #[must_use]
    pub fn aggregate(&self, holdings: &[Holding], quotes: &[Quote]) -> PortfolioValuation {
        let prices: HashMap<String, Option<f64>> = quotes
            .iter()
            .map(|q| (q.symbol.to_uppercase(), q.last_price))
            .collect();

        let mut total_market_value = 0.0;
        let mut total_cost_basis = 0.0;
        let mut priced_count = 0;
        let mut positions = Vec::with_capacity(holdings.len());

        for holding in holdings {
            let last_price = prices
                .get(&holding.symbol.to_uppercase())
                .copied()
                .flatten();
            let valuation = Self::value(holding.quantity, holding.avg_buy_price, last_price);

            total_market_value += valuation.market_value;
            total_cost_basis += valuation.cost_basis;

            let position = PositionValuation {
                symbol: holding.symbol.clone(),
                quantity: holding.quantity,
                avg_buy_price: holding.avg_buy_price,
                last_price,
                valuation,
            };
            if position.is_priced() {
                priced_count += 1;
            }
            positions.push(position);
        }

        PortfolioValuation {
            positions,
            total: Valuation::from_totals(total_market_value, total_cost_basis),
            priced_count,
        }
    }

    /// Mean market value per position; 0 for an empty list.
    #[must_use]
    pub fn average_position(&self, valuations: &[Valuation]) -> f64 {
        let total: f64 = valuations.iter().map(|v| v.market_value).sum();
        Self::average(total, valuations.len())
    }

    /// `total / count`, defined as 0 when `count` is 0.
    #[must_use]
    pub fn average(total: f64, count: usize) -> f64 {
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }

    /// Relative change from `previous` to `current`, in percent.
    /// 0 when there is no positive base to compare against.
    #[must_use]
    pub fn percent_change(previous: f64, current: f64) -> f64 {
        if previous > 0.0 {
            (current - previous) / previous * 100.0
        } else {
            0.0
        }
    }

    fn value(quantity: f64, avg_buy_price: Option<f64>, last_price: Option<f64>) -> Valuation {
        let market_value = quantity * last_price.unwrap_or(0.0);
        let cost_basis = quantity * avg_buy_price.unwrap_or(0.0);
        Valuation::from_totals(market_value, cost_basis)
    }
}
