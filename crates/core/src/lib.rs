pub mod api;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use std::sync::Arc;

use api::http::HttpApi;
use api::traits::RemoteApi;
use models::{
    admin::AdminOverview,
    chart::ChartDataPoint,
    holding::{NewHolding, PortfolioEntry},
    identity::{Identity, Token},
    market::{MarketSummary, StockHistory},
    preferences::Preferences,
    route::{Decision, Route},
    session::SessionState,
    settings::ClientSettings,
};
use services::{
    access_gate::AccessGate,
    admin_service::AdminService,
    market_service::MarketService,
    onboarding_service::OnboardingFlow,
    portfolio_service::{PortfolioOverview, PortfolioService},
    session_store::SessionStore,
};
use storage::{memory::MemoryTokenStore, traits::TokenStore};
use tokio::sync::watch;

use errors::CoreError;

/// Main entry point for the stock portfolio client core.
/// Owns the one session of this process and every service that needs it.
#[must_use]
pub struct StockPortfolioClient {
    settings: ClientSettings,
    session: Arc<SessionStore>,
    gate: AccessGate,
    portfolio_service: PortfolioService,
    market_service: MarketService,
    admin_service: AdminService,
}

impl std::fmt::Debug for StockPortfolioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockPortfolioClient")
            .field("api_base_url", &self.settings.api_base_url)
            .field("session", &self.session)
            .finish()
    }
}

impl StockPortfolioClient {
    /// Client talking HTTP to `settings.api_base_url`, keeping the token
    /// in `tokens`.
    pub fn new(settings: ClientSettings, tokens: Arc<dyn TokenStore>) -> Self {
        let api: Arc<dyn RemoteApi> = Arc::new(HttpApi::new(&settings));
        Self::with_api(settings, api, tokens)
    }

    /// Client whose token only lives as long as the process.
    pub fn in_memory(settings: ClientSettings) -> Self {
        Self::new(settings, Arc::new(MemoryTokenStore::new()))
    }

    /// Client over any `RemoteApi` implementation.
    pub fn with_api(
        settings: ClientSettings,
        api: Arc<dyn RemoteApi>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(
            Arc::clone(&api),
            tokens,
            settings.token_key.clone(),
        ));
        Self {
            portfolio_service: PortfolioService::new(Arc::clone(&api)),
            market_service: MarketService::new(Arc::clone(&api)),
            admin_service: AdminService::new(api),
            gate: AccessGate::new(),
            session,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Shared handle to the session store, for reactive consumers.
    #[must_use]
    pub fn session_store(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Restore the session from the stored token. See [`SessionStore::initialize`].
    pub async fn initialize(&self) -> SessionState {
        self.session.initialize().await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, CoreError> {
        self.session.login(email, password).await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<(), CoreError> {
        self.session.register(email, password).await
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.session.subscribe()
    }

    // ── Routing ─────────────────────────────────────────────────────

    /// Where a request for `path` should end up given the current session.
    #[must_use]
    pub fn route(&self, path: &str) -> Decision {
        self.gate.decide(&self.session.state(), &Route::from_path(path))
    }

    // ── Onboarding ──────────────────────────────────────────────────

    /// Open a fresh wizard. Only a standard user who has not finished
    /// onboarding may start one.
    pub fn start_onboarding(&self) -> Result<OnboardingFlow, CoreError> {
        self.require_onboarding_pending()?;
        Ok(OnboardingFlow::new())
    }

    /// Submit a wizard that has reached the review step.
    pub async fn complete_onboarding(
        &self,
        flow: &mut OnboardingFlow,
    ) -> Result<Preferences, CoreError> {
        self.require_onboarding_pending()?;
        flow.complete(&self.session).await
    }

    // ── Portfolio ───────────────────────────────────────────────────

    pub async fn portfolio_overview(&self) -> Result<PortfolioOverview, CoreError> {
        let token = self.token()?;
        self.portfolio_service.overview(&token).await
    }

    /// Record a holding and return the re-fetched portfolio.
    pub async fn add_holding(&self, holding: NewHolding) -> Result<Vec<PortfolioEntry>, CoreError> {
        let token = self.token()?;
        self.portfolio_service.add_holding(&token, holding).await
    }

    // ── Market data ─────────────────────────────────────────────────

    pub async fn market_summary(&self) -> Result<MarketSummary, CoreError> {
        let token = self.token()?;
        self.market_service.summary(&token).await
    }

    pub async fn stock_history(&self, symbol: &str) -> Result<StockHistory, CoreError> {
        let token = self.token()?;
        self.market_service.history(&token, symbol).await
    }

    /// Chart series for a symbol, oldest first.
    pub async fn stock_chart(&self, symbol: &str) -> Result<Vec<ChartDataPoint>, CoreError> {
        let history = self.stock_history(symbol).await?;
        Ok(MarketService::chart_points(&history))
    }

    // ── Admin ───────────────────────────────────────────────────────

    pub async fn admin_overview(&self) -> Result<AdminOverview, CoreError> {
        let session = self.session.require_session()?;
        self.admin_service.overview(&session).await
    }

    // ── Internal ────────────────────────────────────────────────────

    fn token(&self) -> Result<Token, CoreError> {
        self.session.token().ok_or(CoreError::Unauthorized)
    }

    fn require_onboarding_pending(&self) -> Result<(), CoreError> {
        let session = self.session.require_session()?;
        if session.identity.is_admin() {
            return Err(CoreError::Unauthorized);
        }
        if session.onboarding_completed() {
            return Err(CoreError::ValidationError(
                "Onboarding is already completed".into(),
            ));
        }
        Ok(())
    }
}
