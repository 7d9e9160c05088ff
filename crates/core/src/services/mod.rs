pub mod access_gate;
pub mod admin_service;
pub mod market_service;
pub mod onboarding_service;
pub mod portfolio_service;
pub mod session_store;
pub mod valuation_service;
