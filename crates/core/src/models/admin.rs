use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::holding::PortfolioEntry;
use super::identity::Role;

/// A row of `GET /admin/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A row of `GET /admin/portfolios`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPortfolio {
    pub user_id: i64,
    pub email: String,
    #[serde(default)]
    pub portfolio: Vec<PortfolioEntry>,
}

/// Per-user line of the admin overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPortfolioSummary {
    pub user: UserRecord,
    pub portfolio_value: f64,
    pub holdings_count: usize,
}

/// Everything the admin dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminOverview {
    pub total_users: usize,

    /// Market value summed over every user's holdings
    pub total_portfolio_value: f64,

    /// Users holding at least one position
    pub active_portfolios: usize,

    pub users: Vec<UserPortfolioSummary>,
    pub portfolios: Vec<UserPortfolio>,
}
