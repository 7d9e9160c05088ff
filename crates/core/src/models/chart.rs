use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single data point for price chart rendering.
///
/// The core generates these; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    /// Bar timestamp
    pub ts: DateTime<Utc>,

    /// Closing price at this timestamp
    pub close: f64,
}
