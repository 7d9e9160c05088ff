use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Market identifier from the onboarding catalog (e.g., "US", "IN").
pub type MarketId = String;

/// Instrument ticker (e.g., "AAPL", "TCS.NS").
pub type Symbol = String;

/// Per-user preferences collected by the onboarding wizard.
///
/// Always replaced as a whole; there is no partial merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub preferred_markets: BTreeSet<MarketId>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub watchlist: BTreeSet<Symbol>,

    #[serde(default)]
    pub onboarding_completed: bool,
}

impl Preferences {
    pub fn new<M, W>(markets: M, watchlist: W, onboarding_completed: bool) -> Self
    where
        M: IntoIterator,
        M::Item: Into<MarketId>,
        W: IntoIterator,
        W::Item: Into<Symbol>,
    {
        Self {
            preferred_markets: markets.into_iter().map(Into::into).collect(),
            watchlist: watchlist.into_iter().map(Into::into).collect(),
            onboarding_completed,
        }
    }
}

/// The service encodes empty lists as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeSet<String>>::deserialize(deserializer)?.unwrap_or_default())
}
