pub mod admin;
pub mod chart;
pub mod holding;
pub mod identity;
pub mod market;
pub mod onboarding;
pub mod preferences;
pub mod route;
pub mod session;
pub mod settings;
pub mod valuation;
