// ═══════════════════════════════════════════════════════════════════
// Access Gate Tests — decision table per session state and route
// ═══════════════════════════════════════════════════════════════════

use stock_portfolio_core::models::identity::{Identity, Role, Token};
use stock_portfolio_core::models::preferences::Preferences;
use stock_portfolio_core::models::route::{Decision, Route};
use stock_portfolio_core::models::session::{Session, SessionState};
use stock_portfolio_core::services::access_gate::AccessGate;

fn all_routes() -> Vec<Route> {
    vec![
        Route::Login,
        Route::Register,
        Route::Onboarding,
        Route::Dashboard,
        Route::Portfolio,
        Route::StockDetail("AAPL".into()),
        Route::AdminDashboard,
        Route::Unknown("/settings".into()),
    ]
}

fn authenticated(role: Role, preferences: Option<Preferences>) -> SessionState {
    SessionState::Authenticated(Session {
        identity: Identity::new(7, "someone@example.com", role),
        preferences,
        token: Token::new("tok"),
    })
}

fn onboarded() -> Option<Preferences> {
    Some(Preferences::new(["US"], ["AAPL"], true))
}

fn not_onboarded() -> Option<Preferences> {
    Some(Preferences::default())
}

// ── Pending ─────────────────────────────────────────────────────────

mod pending {
    use super::*;

    #[test]
    fn uninitialized_and_loading_never_decide() {
        let gate = AccessGate::new();
        for state in [SessionState::Uninitialized, SessionState::Loading] {
            for route in all_routes() {
                assert_eq!(gate.decide(&state, &route), Decision::Loading, "{route}");
            }
        }
    }
}

// ── Anonymous ───────────────────────────────────────────────────────

mod anonymous {
    use super::*;

    #[test]
    fn public_routes_allowed() {
        let gate = AccessGate::new();
        let state = SessionState::Anonymous;
        assert_eq!(gate.decide(&state, &Route::Login), Decision::Allow(Route::Login));
        assert_eq!(
            gate.decide(&state, &Route::Register),
            Decision::Allow(Route::Register)
        );
    }

    #[test]
    fn everything_else_goes_to_login() {
        let gate = AccessGate::new();
        for route in all_routes().into_iter().filter(|r| !r.is_public()) {
            assert_eq!(
                gate.decide(&SessionState::Anonymous, &route),
                Decision::Redirect(Route::Login),
                "{route}"
            );
        }
    }
}

// ── Admin ───────────────────────────────────────────────────────────

mod admin {
    use super::*;

    #[test]
    fn only_admin_dashboard_allowed() {
        let gate = AccessGate::new();
        let state = authenticated(Role::Admin, onboarded());
        for route in all_routes() {
            let expected = if route == Route::AdminDashboard {
                Decision::Allow(Route::AdminDashboard)
            } else {
                Decision::Redirect(Route::AdminDashboard)
            };
            assert_eq!(gate.decide(&state, &route), expected, "{route}");
        }
    }

    #[test]
    fn admin_never_onboards() {
        let gate = AccessGate::new();
        let state = authenticated(Role::Admin, None);
        assert_eq!(
            gate.decide(&state, &Route::Onboarding),
            Decision::Redirect(Route::AdminDashboard)
        );
        assert_eq!(
            gate.decide(&state, &Route::AdminDashboard),
            Decision::Allow(Route::AdminDashboard)
        );
    }
}

// ── Standard, onboarding pending ────────────────────────────────────

mod standard_onboarding {
    use super::*;

    #[test]
    fn everything_funnels_into_onboarding() {
        let gate = AccessGate::new();
        for prefs in [not_onboarded(), None] {
            let state = authenticated(Role::Standard, prefs);
            for route in all_routes() {
                let expected = if route == Route::Onboarding {
                    Decision::Allow(Route::Onboarding)
                } else {
                    Decision::Redirect(Route::Onboarding)
                };
                assert_eq!(gate.decide(&state, &route), expected, "{route}");
            }
        }
    }
}

// ── Standard, onboarded ─────────────────────────────────────────────

mod standard_onboarded {
    use super::*;

    #[test]
    fn app_routes_allowed() {
        let gate = AccessGate::new();
        let state = authenticated(Role::Standard, onboarded());
        for route in [
            Route::Dashboard,
            Route::Portfolio,
            Route::StockDetail("TCS.NS".into()),
        ] {
            assert_eq!(gate.decide(&state, &route), Decision::Allow(route.clone()));
        }
    }

    #[test]
    fn other_routes_go_home() {
        let gate = AccessGate::new();
        let state = authenticated(Role::Standard, onboarded());
        for route in [
            Route::Login,
            Route::Register,
            Route::Onboarding,
            Route::AdminDashboard,
            Route::Unknown("/settings".into()),
        ] {
            assert_eq!(
                gate.decide(&state, &route),
                Decision::Redirect(Route::Dashboard),
                "{route}"
            );
        }
    }
}

// ── Properties ──────────────────────────────────────────────────────

mod properties {
    use super::*;

    #[test]
    fn decisions_are_pure() {
        let gate = AccessGate::new();
        let state = authenticated(Role::Standard, onboarded());
        let first = gate.decide(&state, &Route::Portfolio);
        let second = gate.decide(&state, &Route::Portfolio);
        assert_eq!(first, second);
    }

    #[test]
    fn redirect_targets_are_themselves_allowed() {
        let gate = AccessGate::new();
        let states = [
            SessionState::Anonymous,
            authenticated(Role::Admin, onboarded()),
            authenticated(Role::Standard, None),
            authenticated(Role::Standard, onboarded()),
        ];
        for state in &states {
            for route in all_routes() {
                if let Decision::Redirect(target) = gate.decide(state, &route) {
                    assert_eq!(
                        gate.decide(state, &target),
                        Decision::Allow(target.clone()),
                        "redirect loop from {route}"
                    );
                }
            }
        }
    }

    #[test]
    fn decide_path_parses_first() {
        let gate = AccessGate::new();
        assert_eq!(
            gate.decide_path(&SessionState::Anonymous, "/login?next=/"),
            Decision::Allow(Route::Login)
        );
    }

    #[test]
    fn home_by_role_and_onboarding() {
        let make = |role, prefs| Session {
            identity: Identity::new(1, "x@example.com", role),
            preferences: prefs,
            token: Token::new("t"),
        };
        assert_eq!(AccessGate::home(&make(Role::Admin, None)), Route::AdminDashboard);
        assert_eq!(AccessGate::home(&make(Role::Standard, None)), Route::Onboarding);
        assert_eq!(
            AccessGate::home(&make(Role::Standard, onboarded())),
            Route::Dashboard
        );
    }
}
