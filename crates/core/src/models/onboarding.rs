use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::preferences::{MarketId, Symbol};

pub const TOTAL_STEPS: u8 = 3;

/// A market offered during onboarding, with its popular instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Market {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub instruments: &'static [&'static str],
}

/// Static catalog of markets and instruments.
pub const MARKET_CATALOG: &[Market] = &[
    Market {
        id: "US",
        name: "US Markets",
        description: "NASDAQ, NYSE, S&P 500",
        instruments: &["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "META", "NFLX"],
    },
    Market {
        id: "IN",
        name: "Indian Markets",
        description: "NSE, BSE, Nifty 50",
        instruments: &[
            "RELIANCE.NS",
            "TCS.NS",
            "INFY.NS",
            "HDFCBANK.NS",
            "ICICIBANK.NS",
            "SBIN.NS",
            "ITC.NS",
            "LT.NS",
        ],
    },
];

/// Look up a catalog market by id (case-insensitive).
#[must_use]
pub fn find_market(id: &str) -> Option<&'static Market> {
    MARKET_CATALOG.iter().find(|m| m.id.eq_ignore_ascii_case(id))
}

/// The three wizard screens, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OnboardingStep {
    ChooseMarkets,
    ChooseWatchlist,
    Review,
}

impl OnboardingStep {
    /// 1-based position shown in the progress bar.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            OnboardingStep::ChooseMarkets => 1,
            OnboardingStep::ChooseWatchlist => 2,
            OnboardingStep::Review => 3,
        }
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            OnboardingStep::ChooseMarkets => Some(OnboardingStep::ChooseWatchlist),
            OnboardingStep::ChooseWatchlist => Some(OnboardingStep::Review),
            OnboardingStep::Review => None,
        }
    }

    #[must_use]
    pub fn previous(self) -> Option<Self> {
        match self {
            OnboardingStep::ChooseMarkets => None,
            OnboardingStep::ChooseWatchlist => Some(OnboardingStep::ChooseMarkets),
            OnboardingStep::Review => Some(OnboardingStep::ChooseWatchlist),
        }
    }

    /// Completion percentage for the progress bar (33, 67, 100).
    #[must_use]
    pub fn progress_percent(self) -> u8 {
        let pct = f64::from(self.number()) / f64::from(TOTAL_STEPS) * 100.0;
        pct.round() as u8
    }
}

/// Transient wizard state; lives only while the wizard is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingDraft {
    pub step: OnboardingStep,
    pub selected_markets: BTreeSet<MarketId>,
    pub selected_watchlist: BTreeSet<Symbol>,
}

impl Default for OnboardingDraft {
    fn default() -> Self {
        Self {
            step: OnboardingStep::ChooseMarkets,
            selected_markets: BTreeSet::new(),
            selected_watchlist: BTreeSet::new(),
        }
    }
}
