use serde::{Deserialize, Serialize};

/// Derived figures for one holding or for a whole portfolio. Never stored.
///
/// `pnl == market_value - cost_basis` always holds, and `pnl_percent`
/// is 0 (not NaN) when there is no cost basis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub market_value: f64,
    pub cost_basis: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
}

impl Valuation {
    pub fn from_totals(market_value: f64, cost_basis: f64) -> Self {
        let pnl = market_value - cost_basis;
        let pnl_percent = if cost_basis > 0.0 {
            pnl / cost_basis * 100.0
        } else {
            0.0
        };
        Self {
            market_value,
            cost_basis,
            pnl,
            pnl_percent,
        }
    }
}

/// Valuation of one position, with the raw inputs kept so views can
/// tell "no price" apart from a price of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionValuation {
    pub symbol: String,
    pub quantity: f64,
    pub avg_buy_price: Option<f64>,
    pub last_price: Option<f64>,
    pub valuation: Valuation,
}

impl PositionValuation {
    #[must_use]
    pub fn is_priced(&self) -> bool {
        self.last_price.is_some_and(|p| p != 0.0)
    }
}

/// Portfolio-level result of joining holdings to quotes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    /// Per-holding figures, in holding order
    pub positions: Vec<PositionValuation>,

    /// Sums over all positions
    pub total: Valuation,

    /// Positions with a non-zero last price
    pub priced_count: usize,
}

impl PortfolioValuation {
    #[must_use]
    pub fn holdings_count(&self) -> usize {
        self.positions.len()
    }
}
