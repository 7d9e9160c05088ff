use log::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::onboarding::{find_market, OnboardingDraft, OnboardingStep, MARKET_CATALOG};
use crate::models::preferences::{Preferences, Symbol};
use crate::services::session_store::SessionStore;

/// Three-step wizard that collects a standard user's first preferences.
///
/// 1. choose markets (at least one to move on)
/// 2. choose watchlist symbols from the selected markets (optional)
/// 3. review, then [`complete`](Self::complete)
///
/// Validation only runs forward. Going back never drops selections, and
/// deselecting a market later does not prune the watchlist.
#[derive(Debug, Clone)]
pub struct OnboardingFlow {
    /// `None` once the preferences have been saved.
    draft: Option<OnboardingDraft>,
}

impl OnboardingFlow {
    pub fn new() -> Self {
        Self {
            draft: Some(OnboardingDraft::default()),
        }
    }

    /// The in-progress selections, or `None` after completion.
    #[must_use]
    pub fn draft(&self) -> Option<&OnboardingDraft> {
        self.draft.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.draft.is_none()
    }

    #[must_use]
    pub fn step(&self) -> Option<OnboardingStep> {
        self.draft.as_ref().map(|d| d.step)
    }

    /// Watchlist candidates: instruments of every selected market, in
    /// catalog order.
    #[must_use]
    pub fn candidate_pool(&self) -> Vec<Symbol> {
        let Some(draft) = &self.draft else {
            return Vec::new();
        };
        MARKET_CATALOG
            .iter()
            .filter(|m| draft.selected_markets.contains(m.id))
            .flat_map(|m| m.instruments.iter().map(|s| (*s).to_string()))
            .collect()
    }

    /// Select or deselect a market. Only allowed on the markets step.
    /// Returns whether the market is selected afterwards.
    pub fn toggle_market(&mut self, market_id: &str) -> Result<bool, CoreError> {
        let draft = Self::active(&mut self.draft)?;
        if draft.step != OnboardingStep::ChooseMarkets {
            return Err(CoreError::ValidationError(
                "Markets can only be changed on the first step".into(),
            ));
        }
        let market = find_market(market_id).ok_or_else(|| {
            CoreError::ValidationError(format!("Unknown market '{market_id}'"))
        })?;

        let id = market.id.to_string();
        if draft.selected_markets.remove(&id) {
            Ok(false)
        } else {
            draft.selected_markets.insert(id);
            Ok(true)
        }
    }

    /// Select or deselect a watchlist symbol. Only allowed on the
    /// watchlist step. Selecting requires the symbol to be in the
    /// candidate pool; deselecting anything already selected is allowed.
    /// Returns whether the symbol is selected afterwards.
    pub fn toggle_symbol(&mut self, symbol: &str) -> Result<bool, CoreError> {
        let pool = self.candidate_pool();
        let draft = Self::active(&mut self.draft)?;
        if draft.step != OnboardingStep::ChooseWatchlist {
            return Err(CoreError::ValidationError(
                "Watchlist can only be changed on the second step".into(),
            ));
        }

        let symbol = symbol.trim().to_uppercase();
        if draft.selected_watchlist.remove(&symbol) {
            return Ok(false);
        }
        if !pool.contains(&symbol) {
            return Err(CoreError::ValidationError(format!(
                "'{symbol}' is not offered by the selected markets"
            )));
        }
        draft.selected_watchlist.insert(symbol);
        Ok(true)
    }

    /// Move to the next step. Leaving the first step needs at least one
    /// market; the review step has no next step.
    pub fn advance(&mut self) -> Result<OnboardingStep, CoreError> {
        let draft = Self::active(&mut self.draft)?;
        if draft.step == OnboardingStep::ChooseMarkets && draft.selected_markets.is_empty() {
            return Err(CoreError::ValidationError(
                "Select at least one market to continue".into(),
            ));
        }
        let next = draft.step.next().ok_or_else(|| {
            CoreError::ValidationError("Already on the last step; complete instead".into())
        })?;
        draft.step = next;
        debug!("[Onboarding] Advanced to step {}", next.number());
        Ok(next)
    }

    /// Go back one step. Never discards selections; a no-op on step 1.
    pub fn back(&mut self) -> Result<OnboardingStep, CoreError> {
        let draft = Self::active(&mut self.draft)?;
        if let Some(previous) = draft.step.previous() {
            draft.step = previous;
        }
        Ok(draft.step)
    }

    /// The preferences that [`complete`](Self::complete) would submit.
    pub fn preferences(&self) -> Result<Preferences, CoreError> {
        let draft = self.draft.as_ref().ok_or_else(Self::finished_error)?;
        Ok(Preferences {
            preferred_markets: draft.selected_markets.clone(),
            watchlist: draft.selected_watchlist.clone(),
            onboarding_completed: true,
        })
    }

    /// Submit the draft from the review step.
    ///
    /// On success the draft is discarded and the saved preferences are
    /// returned. On failure the draft stays on the review step untouched,
    /// so calling `complete` again retries with the same selections.
    pub async fn complete(&mut self, store: &SessionStore) -> Result<Preferences, CoreError> {
        let step = self.step().ok_or_else(Self::finished_error)?;
        if step != OnboardingStep::Review {
            return Err(CoreError::ValidationError(
                "Onboarding can only be completed from the review step".into(),
            ));
        }

        let preferences = self.preferences()?;
        match store.update_preferences(preferences.clone()).await {
            Ok(()) => {
                info!(
                    "[Onboarding] Completed with {} market(s), {} watchlist symbol(s)",
                    preferences.preferred_markets.len(),
                    preferences.watchlist.len()
                );
                self.draft = None;
                Ok(preferences)
            }
            Err(e) => {
                warn!("[Onboarding] Saving preferences failed: {e}");
                Err(e)
            }
        }
    }

    fn active(draft: &mut Option<OnboardingDraft>) -> Result<&mut OnboardingDraft, CoreError> {
        draft.as_mut().ok_or_else(Self::finished_error)
    }

    fn finished_error() -> CoreError {
        CoreError::ValidationError("Onboarding is already completed".into())
    }
}

impl Default for OnboardingFlow {
    fn default() -> Self {
        Self::new()
    }
}
