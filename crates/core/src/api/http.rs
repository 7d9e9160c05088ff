use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::admin::{UserPortfolio, UserRecord};
use crate::models::holding::{NewHolding, PortfolioEntry};
use crate::models::identity::{Identity, Token};
use crate::models::market::{PriceBar, StockQuote};
use crate::models::preferences::Preferences;
use crate::models::settings::ClientSettings;

use super::traits::{LoginResponse, RemoteApi};

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// `RemoteApi` over HTTP/JSON using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(settings: &ClientSettings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str, token: &Token) -> RequestBuilder {
        let url = self.url(path);
        debug!("[Api] GET {url}");
        self.client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, token.bearer())
    }

    fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> RequestBuilder {
        let url = self.url(path);
        debug!("[Api] POST {url}");
        self.client.post(url).json(body)
    }

    /// GET a bearer-protected JSON resource. 401 and 403 both mean the
    /// session may not see it.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &Token) -> Result<T, CoreError> {
        let response = self.get(path, token).send().await?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(CoreError::Unauthorized),
            status if status.is_success() => parse_json(response).await,
            status => Err(api_error(status, response).await),
        }
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, CoreError> {
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| CoreError::Deserialization(format!("Failed to parse response: {e}")))
}

async fn api_error(status: StatusCode, response: Response) -> CoreError {
    let body = response.text().await.unwrap_or_default();
    CoreError::Api {
        status: status.as_u16(),
        message: body.trim().chars().take(200).collect(),
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RemoteApi for HttpApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, CoreError> {
        let response = self
            .post("/auth/login", &Credentials { email, password })
            .send()
            .await?;
        match response.status() {
            StatusCode::UNAUTHORIZED => Err(CoreError::InvalidCredentials),
            status if status.is_success() => parse_json(response).await,
            status => Err(api_error(status, response).await),
        }
    }

    async fn register(&self, email: &str, password: &str) -> Result<(), CoreError> {
        let response = self
            .post("/auth/register", &Credentials { email, password })
            .send()
            .await?;
        match response.status() {
            StatusCode::CONFLICT => Err(CoreError::EmailAlreadyExists),
            status if status.is_success() => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(CoreError::RegistrationFailed(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    body.trim()
                )))
            }
        }
    }

    async fn me(&self, token: &Token) -> Result<Identity, CoreError> {
        self.get_json("/auth/me", token).await
    }

    async fn get_preferences(&self, token: &Token) -> Result<Preferences, CoreError> {
        self.get_json("/preferences", token).await
    }

    async fn update_preferences(
        &self,
        token: &Token,
        preferences: &Preferences,
    ) -> Result<(), CoreError> {
        let response = self
            .post("/preferences", preferences)
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .send()
            .await?;
        match response.status() {
            StatusCode::UNAUTHORIZED => Err(CoreError::Unauthorized),
            status if status.is_success() => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(CoreError::PreferencesUpdateFailed(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    body.trim()
                )))
            }
        }
    }

    async fn get_portfolio(&self, token: &Token) -> Result<Vec<PortfolioEntry>, CoreError> {
        // The service encodes an empty portfolio as `null`.
        let entries: Option<Vec<PortfolioEntry>> = self.get_json("/portfolio", token).await?;
        Ok(entries.unwrap_or_default())
    }

    async fn add_holding(&self, token: &Token, holding: &NewHolding) -> Result<(), CoreError> {
        let response = self
            .post("/portfolio", holding)
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .send()
            .await?;
        match response.status() {
            StatusCode::UNAUTHORIZED => Err(CoreError::Unauthorized),
            status if status.is_success() => Ok(()),
            status => Err(api_error(status, response).await),
        }
    }

    async fn list_stocks(&self, token: &Token) -> Result<Vec<StockQuote>, CoreError> {
        let stocks: Option<Vec<StockQuote>> = self.get_json("/stocks", token).await?;
        Ok(stocks.unwrap_or_default())
    }

    async fn stock_history(&self, token: &Token, symbol: &str) -> Result<Vec<PriceBar>, CoreError> {
        let path = format!("/stocks/{}", symbol.trim().to_uppercase());
        let bars: Option<Vec<PriceBar>> = self.get_json(&path, token).await?;
        Ok(bars.unwrap_or_default())
    }

    async fn admin_users(&self, token: &Token) -> Result<Vec<UserRecord>, CoreError> {
        let users: Option<Vec<UserRecord>> = self.get_json("/admin/users", token).await?;
        Ok(users.unwrap_or_default())
    }

    async fn admin_portfolios(&self, token: &Token) -> Result<Vec<UserPortfolio>, CoreError> {
        let portfolios: Option<Vec<UserPortfolio>> =
            self.get_json("/admin/portfolios", token).await?;
        Ok(portfolios.unwrap_or_default())
    }
}
