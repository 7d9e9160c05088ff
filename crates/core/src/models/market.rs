use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::holding::Quote;

/// Latest row per symbol from `GET /stocks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub symbol: String,
    pub ts: DateTime<Utc>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: Option<i64>,
}

impl From<&StockQuote> for Quote {
    fn from(stock: &StockQuote) -> Self {
        Quote::new(stock.symbol.clone(), stock.close)
    }
}

/// One OHLCV bar from `GET /stocks/:symbol`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub ts: DateTime<Utc>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: Option<i64>,
}

/// Dashboard figures derived from the latest quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub stocks: Vec<StockQuote>,
    pub stock_count: usize,
    /// Mean close across all stocks; a missing close counts as 0
    pub average_close: f64,
}

/// Price history of one symbol with its latest day-over-day move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockHistory {
    pub symbol: String,
    /// Bars newest first, as served
    pub bars: Vec<PriceBar>,
    pub latest_close: Option<f64>,
    pub change: f64,
    pub change_percent: f64,
}
