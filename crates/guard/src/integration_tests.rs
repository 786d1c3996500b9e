//! End-to-end guard scenarios over the in-memory adapters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use sentryops_auth::{routes::LANDING_ROUTE, AccessPolicy, RouteTable};
use sentryops_core::UserId;
use sentryops_infra::{InMemoryKv, StaticAuthProvider};
use sentryops_session::{AuthError, AuthProvider, AuthSession, RoleStore, SessionResolver};

use crate::cue::AccessCue;
use crate::guard::{GuardOutcome, RouteGuard};

#[derive(Default)]
struct CountingCue {
    allowed: AtomicUsize,
    denied: AtomicUsize,
}

impl AccessCue for CountingCue {
    fn allowed(&self) {
        self.allowed.fetch_add(1, Ordering::SeqCst);
    }

    fn denied(&self) {
        self.denied.fetch_add(1, Ordering::SeqCst);
    }
}

struct Fixture {
    cue: Arc<CountingCue>,
    guard: RouteGuard,
}

fn fixture(provider: Arc<dyn AuthProvider>) -> Fixture {
    sentryops_observability::init();
    let kv = Arc::new(InMemoryKv::new());
    let roles = Arc::new(RoleStore::new(kv.clone(), provider.clone()));
    let resolver = Arc::new(SessionResolver::new(kv, provider, roles.clone()));
    let cue = Arc::new(CountingCue::default());
    let guard = RouteGuard::new(
        resolver,
        roles,
        RouteTable::back_office(),
        AccessPolicy::shipped(),
        cue.clone(),
    );
    Fixture { cue, guard }
}

fn signed_in(tags: &[&str]) -> Arc<dyn AuthProvider> {
    Arc::new(StaticAuthProvider::signed_in(
        AuthSession {
            user_id: UserId::new(),
            email: None,
            name: None,
        },
        tags,
    ))
}

#[tokio::test]
async fn unauthenticated_navigation_redirects_home_without_a_cue() {
    let fx = fixture(Arc::new(StaticAuthProvider::signed_out()));

    let outcome = fx.guard.check("/sales").await;
    assert_eq!(
        outcome,
        GuardOutcome::Unauthenticated {
            redirect: LANDING_ROUTE
        }
    );
    assert_eq!(fx.cue.allowed.load(Ordering::SeqCst), 0);
    assert_eq!(fx.cue.denied.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn matching_role_renders_the_module() {
    let fx = fixture(signed_in(&["sales"]));

    assert_eq!(fx.guard.check("/sales").await, GuardOutcome::Allowed);
    assert_eq!(fx.cue.allowed.load(Ordering::SeqCst), 1);
    assert_eq!(fx.cue.denied.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn mismatched_role_redirects_with_exactly_one_error_cue() {
    let fx = fixture(signed_in(&["hr"]));

    let outcome = fx.guard.check("/sales").await;
    assert_eq!(
        outcome,
        GuardOutcome::Denied {
            redirect: LANDING_ROUTE
        }
    );
    assert_eq!(fx.cue.denied.load(Ordering::SeqCst), 1);
    assert_eq!(fx.cue.allowed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn admin_passes_every_department_route() {
    let fx = fixture(signed_in(&["admin"]));

    for path in ["/sales", "/operations", "/accounts", "/hr", "/office-admin", "/reports"] {
        assert_eq!(fx.guard.check(path).await, GuardOutcome::Allowed, "{path}");
    }
}

#[tokio::test]
async fn open_routes_need_only_a_session() {
    let fx = fixture(signed_in(&[]));

    assert_eq!(fx.guard.check("/dashboard").await, GuardOutcome::Allowed);
    assert_eq!(fx.guard.check("/profile").await, GuardOutcome::Allowed);
    // Still shut out of gated modules without a role.
    assert_eq!(
        fx.guard.check("/hr").await,
        GuardOutcome::Denied {
            redirect: LANDING_ROUTE
        }
    );
}

#[tokio::test]
async fn role_lookup_failure_denies_gated_routes() {
    let provider = Arc::new(StaticAuthProvider::signed_in(
        AuthSession {
            user_id: UserId::new(),
            email: None,
            name: None,
        },
        &["sales"],
    ));
    provider.set_fail_roles(true);
    let fx = fixture(provider);

    assert_eq!(
        fx.guard.check("/sales").await,
        GuardOutcome::Denied {
            redirect: LANDING_ROUTE
        }
    );
}

#[tokio::test]
async fn session_failure_fails_closed() {
    let provider = Arc::new(StaticAuthProvider::signed_in(
        AuthSession {
            user_id: UserId::new(),
            email: None,
            name: None,
        },
        &["admin"],
    ));
    provider.set_fail_session(true);
    let fx = fixture(provider);

    assert_eq!(
        fx.guard.check("/dashboard").await,
        GuardOutcome::Unauthenticated {
            redirect: LANDING_ROUTE
        }
    );
}

/// Provider whose session lookup blocks until released, to stage an unmount
/// while the guard is mid-lookup.
struct StalledAuth {
    release: Notify,
}

#[async_trait]
impl AuthProvider for StalledAuth {
    async fn session(&self) -> Result<Option<AuthSession>, AuthError> {
        self.release.notified().await;
        Ok(Some(AuthSession {
            user_id: UserId::new(),
            email: None,
            name: None,
        }))
    }

    async fn user_roles(&self) -> Result<Vec<String>, AuthError> {
        Ok(vec!["admin".to_string()])
    }
}

#[tokio::test]
async fn cancelling_mid_lookup_applies_nothing() {
    let provider = Arc::new(StalledAuth {
        release: Notify::new(),
    });
    let fx = fixture(provider.clone());

    let (outcome, ()) = tokio::join!(fx.guard.check("/sales"), async {
        fx.guard.cancel();
        provider.release.notify_one();
    });

    assert_eq!(outcome, GuardOutcome::Cancelled);
    assert_eq!(fx.cue.allowed.load(Ordering::SeqCst), 0);
    assert_eq!(fx.cue.denied.load(Ordering::SeqCst), 0);
}
