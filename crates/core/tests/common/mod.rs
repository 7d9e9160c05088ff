// ═══════════════════════════════════════════════════════════════════
// Shared test helpers — scripted RemoteApi
// ═══════════════════════════════════════════════════════════════════

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use stock_portfolio_core::api::traits::{LoginResponse, RemoteApi};
use stock_portfolio_core::errors::CoreError;
use stock_portfolio_core::models::admin::{UserPortfolio, UserRecord};
use stock_portfolio_core::models::holding::{NewHolding, PortfolioEntry};
use stock_portfolio_core::models::identity::{Identity, Role, Token};
use stock_portfolio_core::models::market::{PriceBar, StockQuote};
use stock_portfolio_core::models::preferences::Preferences;

pub const TOKEN_KEY: &str = "token";

pub fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, 16, 0, 0).unwrap()
}

struct Account {
    password: String,
    identity: Identity,
    token: String,
}

/// In-memory stand-in for the remote service.
///
/// Accounts, preferences and portfolios are kept per token. Failures
/// are switched on with the public flags, and any call can be held in
/// flight with [`MockApi::gate`].
#[derive(Default)]
pub struct MockApi {
    accounts: Mutex<HashMap<String, Account>>,
    preferences: Mutex<HashMap<String, Preferences>>,
    portfolios: Mutex<HashMap<String, Vec<PortfolioEntry>>>,
    stocks: Mutex<Vec<StockQuote>>,
    bars: Mutex<HashMap<String, Vec<PriceBar>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
    next_id: AtomicUsize,

    /// `GET /auth/me` answers 401
    pub reject_me: AtomicBool,
    /// `GET /preferences` fails at the transport level
    pub preferences_offline: AtomicBool,
    /// Number of upcoming `POST /preferences` calls that answer 500
    pub update_failures: AtomicUsize,
    /// `POST /portfolio` answers 500
    pub reject_add_holding: AtomicBool,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, email: &str, password: &str, role: Role, token: &str) -> Self {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                identity: Identity::new(id, email, role),
                token: token.to_string(),
            },
        );
        self
    }

    pub fn with_preferences(self, token: &str, preferences: Preferences) -> Self {
        self.preferences
            .lock()
            .unwrap()
            .insert(token.to_string(), preferences);
        self
    }

    pub fn with_portfolio(self, token: &str, entries: Vec<PortfolioEntry>) -> Self {
        self.portfolios
            .lock()
            .unwrap()
            .insert(token.to_string(), entries);
        self
    }

    pub fn with_stocks(self, stocks: Vec<StockQuote>) -> Self {
        *self.stocks.lock().unwrap() = stocks;
        self
    }

    pub fn with_bars(self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.bars.lock().unwrap().insert(symbol.to_string(), bars);
        self
    }

    /// Hold the call named `key` (e.g. `"login:alice@example.com"`,
    /// `"me"`) until the returned handle is notified.
    pub fn gate(&self, key: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(key.to_string(), Arc::clone(&notify));
        notify
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    pub fn stored_preferences(&self, token: &str) -> Option<Preferences> {
        self.preferences.lock().unwrap().get(token).cloned()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    async fn pass_gate(&self, key: &str) {
        let gate = self.gates.lock().unwrap().get(key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn identity_for(&self, token: &Token) -> Result<Identity, CoreError> {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.token == token.as_str())
            .map(|a| a.identity.clone())
            .ok_or(CoreError::Unauthorized)
    }

    fn require_admin(&self, token: &Token) -> Result<(), CoreError> {
        match self.identity_for(token)?.role {
            Role::Admin => Ok(()),
            Role::Standard => Err(CoreError::Unauthorized),
        }
    }

    fn last_price(&self, symbol: &str) -> Option<f64> {
        self.stocks
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.symbol == symbol)
            .and_then(|s| s.close)
    }
}

#[async_trait]
impl RemoteApi for MockApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, CoreError> {
        self.record("login");
        self.pass_gate(&format!("login:{email}")).await;
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some(account) if account.password == password => Ok(LoginResponse {
                token: Token::new(account.token.clone()),
                user: account.identity.clone(),
            }),
            _ => Err(CoreError::InvalidCredentials),
        }
    }

    async fn register(&self, email: &str, password: &str) -> Result<(), CoreError> {
        self.record("register");
        if email.is_empty() || password.is_empty() {
            return Err(CoreError::Api {
                status: 400,
                message: "bad input".into(),
            });
        }
        if self.accounts.lock().unwrap().contains_key(email) {
            return Err(CoreError::EmailAlreadyExists);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                identity: Identity::new(id, email, Role::Standard),
                token: format!("token-{id}"),
            },
        );
        Ok(())
    }

    async fn me(&self, token: &Token) -> Result<Identity, CoreError> {
        self.record("me");
        self.pass_gate("me").await;
        if self.reject_me.load(Ordering::SeqCst) {
            return Err(CoreError::Unauthorized);
        }
        self.identity_for(token)
    }

    async fn get_preferences(&self, token: &Token) -> Result<Preferences, CoreError> {
        self.record("get_preferences");
        if self.preferences_offline.load(Ordering::SeqCst) {
            return Err(CoreError::NetworkUnavailable("connection refused".into()));
        }
        self.identity_for(token)?;
        Ok(self
            .preferences
            .lock()
            .unwrap()
            .get(token.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn update_preferences(
        &self,
        token: &Token,
        preferences: &Preferences,
    ) -> Result<(), CoreError> {
        self.record("update_preferences");
        self.identity_for(token)?;
        let remaining = self.update_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.update_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(CoreError::PreferencesUpdateFailed("HTTP 500: db down".into()));
        }
        self.preferences
            .lock()
            .unwrap()
            .insert(token.as_str().to_string(), preferences.clone());
        Ok(())
    }

    async fn get_portfolio(&self, token: &Token) -> Result<Vec<PortfolioEntry>, CoreError> {
        self.record("get_portfolio");
        self.identity_for(token)?;
        Ok(self
            .portfolios
            .lock()
            .unwrap()
            .get(token.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn add_holding(&self, token: &Token, holding: &NewHolding) -> Result<(), CoreError> {
        self.record("add_holding");
        self.identity_for(token)?;
        if self.reject_add_holding.load(Ordering::SeqCst) {
            return Err(CoreError::Api {
                status: 500,
                message: "insert failed".into(),
            });
        }
        let entry = PortfolioEntry {
            symbol: holding.symbol.clone(),
            quantity: Some(holding.quantity),
            avg_buy_price: Some(holding.avg_buy_price.unwrap_or(0.0)),
            last_price: self.last_price(&holding.symbol),
        };
        let mut portfolios = self.portfolios.lock().unwrap();
        let entries = portfolios.entry(token.as_str().to_string()).or_default();
        entries.retain(|e| e.symbol != entry.symbol);
        entries.push(entry);
        entries.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(())
    }

    async fn list_stocks(&self, token: &Token) -> Result<Vec<StockQuote>, CoreError> {
        self.record("list_stocks");
        self.identity_for(token)?;
        Ok(self.stocks.lock().unwrap().clone())
    }

    async fn stock_history(&self, token: &Token, symbol: &str) -> Result<Vec<PriceBar>, CoreError> {
        self.record("stock_history");
        self.identity_for(token)?;
        Ok(self
            .bars
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .unwrap_or_default())
    }

    async fn admin_users(&self, token: &Token) -> Result<Vec<UserRecord>, CoreError> {
        self.record("admin_users");
        self.require_admin(token)?;
        let accounts = self.accounts.lock().unwrap();
        let mut users: Vec<UserRecord> = accounts
            .values()
            .map(|a| UserRecord {
                id: a.identity.id,
                email: a.identity.email.clone(),
                role: a.identity.role,
                created_at: ts(1),
            })
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn admin_portfolios(&self, token: &Token) -> Result<Vec<UserPortfolio>, CoreError> {
        self.record("admin_portfolios");
        self.require_admin(token)?;
        let accounts = self.accounts.lock().unwrap();
        let portfolios = self.portfolios.lock().unwrap();
        let mut out: Vec<UserPortfolio> = accounts
            .values()
            .map(|a| UserPortfolio {
                user_id: a.identity.id,
                email: a.identity.email.clone(),
                portfolio: portfolios.get(&a.token).cloned().unwrap_or_default(),
            })
            .collect();
        out.sort_by_key(|p| p.user_id);
        Ok(out)
    }
}
