use std::sync::Arc;

use log::debug;

use crate::api::traits::RemoteApi;
use crate::errors::CoreError;
use crate::models::chart::ChartDataPoint;
use crate::models::identity::Token;
use crate::models::market::{MarketSummary, PriceBar, StockHistory, StockQuote};
use crate::services::valuation_service::ValuationEngine;

/// Market data for the dashboard and the stock detail view.
pub struct MarketService {
    api: Arc<dyn RemoteApi>,
}

impl MarketService {
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self { api }
    }

    /// Latest quote per symbol with count and average close.
    pub async fn summary(&self, token: &Token) -> Result<MarketSummary, CoreError> {
        let stocks = self.api.list_stocks(token).await?;
        debug!("[Market] Fetched {} quote(s)", stocks.len());
        Ok(Self::summarize(stocks))
    }

    #[must_use]
    pub fn summarize(stocks: Vec<StockQuote>) -> MarketSummary {
        let total_close: f64 = stocks.iter().map(|s| s.close.unwrap_or(0.0)).sum();
        MarketSummary {
            stock_count: stocks.len(),
            average_close: ValuationEngine::average(total_close, stocks.len()),
            stocks,
        }
    }

    /// Price history of one symbol plus its latest day-over-day change.
    pub async fn history(&self, token: &Token, symbol: &str) -> Result<StockHistory, CoreError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(CoreError::ValidationError("Symbol is required".into()));
        }
        let bars = self.api.stock_history(token, &symbol).await?;
        debug!("[Market] Fetched {} bar(s) for {symbol}", bars.len());
        Ok(Self::describe(symbol, bars))
    }

    /// Bars arrive newest first; the change compares the two newest closes.
    #[must_use]
    pub fn describe(symbol: String, bars: Vec<PriceBar>) -> StockHistory {
        let latest_close = bars.first().and_then(|b| b.close);
        let previous_close = bars.get(1).and_then(|b| b.close);

        let (change, change_percent) = match (latest_close, previous_close) {
            (Some(current), Some(previous)) => (
                current - previous,
                ValuationEngine::percent_change(previous, current),
            ),
            _ => (0.0, 0.0),
        };

        StockHistory {
            symbol,
            bars,
            latest_close,
            change,
            change_percent,
        }
    }

    /// Chart series oldest first, skipping bars without a close.
    #[must_use]
    pub fn chart_points(history: &StockHistory) -> Vec<ChartDataPoint> {
        let mut points: Vec<ChartDataPoint> = history
            .bars
            .iter()
            .filter_map(|b| {
                b.close.map(|close| ChartDataPoint { ts: b.ts, close })
            })
            .collect();
        points.sort_by_key(|p| p.ts);
        points
    }
}
