use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::admin::{UserPortfolio, UserRecord};
use crate::models::holding::{NewHolding, PortfolioEntry};
use crate::models::identity::{Identity, Token};
use crate::models::market::{PriceBar, StockQuote};
use crate::models::preferences::Preferences;

/// Successful `POST /auth/login` response.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct LoginResponse {
    pub token: Token,
    pub user: Identity,
}

/// Trait abstraction over the remote portfolio service.
///
/// `HttpApi` talks to the real service; tests substitute scripted
/// implementations. Implementations map transport failures to
/// `NetworkUnavailable` and status codes to the matching `CoreError`.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RemoteApi: Send + Sync {
    /// `POST /auth/login`. A rejected login is `InvalidCredentials`.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, CoreError>;

    /// `POST /auth/register`. Does not authenticate.
    async fn register(&self, email: &str, password: &str) -> Result<(), CoreError>;

    /// `GET /auth/me`
    async fn me(&self, token: &Token) -> Result<Identity, CoreError>;

    /// `GET /preferences`
    async fn get_preferences(&self, token: &Token) -> Result<Preferences, CoreError>;

    /// `POST /preferences`
    async fn update_preferences(
        &self,
        token: &Token,
        preferences: &Preferences,
    ) -> Result<(), CoreError>;

    /// `GET /portfolio`
    async fn get_portfolio(&self, token: &Token) -> Result<Vec<PortfolioEntry>, CoreError>;

    /// `POST /portfolio` (insert or replace by symbol)
    async fn add_holding(&self, token: &Token, holding: &NewHolding) -> Result<(), CoreError>;

    /// `GET /stocks`: latest row per symbol.
    async fn list_stocks(&self, token: &Token) -> Result<Vec<StockQuote>, CoreError>;

    /// `GET /stocks/:symbol`: bars newest first.
    async fn stock_history(&self, token: &Token, symbol: &str) -> Result<Vec<PriceBar>, CoreError>;

    /// `GET /admin/users`
    async fn admin_users(&self, token: &Token) -> Result<Vec<UserRecord>, CoreError>;

    /// `GET /admin/portfolios`
    async fn admin_portfolios(&self, token: &Token) -> Result<Vec<UserPortfolio>, CoreError>;
}
