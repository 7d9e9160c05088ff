use serde::{Deserialize, Serialize};

/// A recorded position in one instrument.
///
/// Holdings are never edited in place: after any mutation the whole
/// portfolio is fetched again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol, uppercased.
    pub symbol: String,

    /// Units held, never negative.
    pub quantity: f64,

    /// Average purchase price per unit, if recorded.
    pub avg_buy_price: Option<f64>,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, quantity: f64, avg_buy_price: Option<f64>) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            quantity: quantity.max(0.0),
            avg_buy_price,
        }
    }
}

/// Latest known price for a symbol. Supplied externally, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub last_price: Option<f64>,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, last_price: Option<f64>) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            last_price,
        }
    }
}

/// One row of `GET /portfolio`: the holding joined with its latest close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioEntry {
    pub symbol: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub avg_buy_price: Option<f64>,
    #[serde(default)]
    pub last_price: Option<f64>,
}

impl PortfolioEntry {
    /// Split the row into the holding and the quote it was joined with.
    /// A missing quantity reads as zero units.
    #[must_use]
    pub fn into_parts(self) -> (Holding, Quote) {
        let holding = Holding::new(
            self.symbol.clone(),
            self.quantity.unwrap_or(0.0),
            self.avg_buy_price,
        );
        let quote = Quote::new(self.symbol, self.last_price);
        (holding, quote)
    }

    /// Split a whole portfolio into parallel holding and quote lists.
    #[must_use]
    pub fn split_all(entries: Vec<PortfolioEntry>) -> (Vec<Holding>, Vec<Quote>) {
        entries.into_iter().map(PortfolioEntry::into_parts).unzip()
    }
}

/// Body of `POST /portfolio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub symbol: String,
    pub quantity: f64,
    pub avg_buy_price: Option<f64>,
}

impl NewHolding {
    pub fn new(symbol: impl Into<String>, quantity: f64, avg_buy_price: Option<f64>) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            avg_buy_price,
        }
    }
}
