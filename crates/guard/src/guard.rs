//! The route guard state machine.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use sentryops_auth::{can_access_route, routes::LANDING_ROUTE, AccessPolicy, RouteTable};
use sentryops_session::{RoleStore, SessionResolver};

use crate::cue::AccessCue;

/// Terminal state of one guarded navigation.
///
/// A check starts in an implicit loading state and ends in exactly one of
/// these. `Cancelled` means the owning screen went away mid-lookup; nothing
/// was rendered, redirected, or cued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Render the requested module.
    Allowed,
    /// Session present, role check failed: redirect, with an error cue.
    Denied { redirect: &'static str },
    /// No session: redirect quietly.
    Unauthenticated { redirect: &'static str },
    /// The check was torn down while a lookup was in flight.
    Cancelled,
}

/// Decides, per navigation, whether to render, redirect, or do nothing.
///
/// Checks are cancellable: [`RouteGuard::cancel`] invalidates every check
/// that is still awaiting a collaborator, so a stale answer can never touch
/// state after its screen unmounted. All collaborator failures have already
/// been collapsed to anonymous/none below this layer — the guard itself is
/// infallible.
pub struct RouteGuard {
    resolver: Arc<SessionResolver>,
    roles: Arc<RoleStore>,
    table: RouteTable,
    policy: AccessPolicy,
    cue: Arc<dyn AccessCue>,
    epoch: AtomicU64,
}

impl RouteGuard {
    pub fn new(
        resolver: Arc<SessionResolver>,
        roles: Arc<RoleStore>,
        table: RouteTable,
        policy: AccessPolicy,
        cue: Arc<dyn AccessCue>,
    ) -> Self {
        Self {
            resolver,
            roles,
            table,
            policy,
            cue,
            epoch: AtomicU64::new(0),
        }
    }

    /// Invalidate in-flight checks (screen unmounted, navigation replaced).
    pub fn cancel(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Run the full decision for `path`.
    pub async fn check(&self, path: &str) -> GuardOutcome {
        let epoch = self.epoch.load(Ordering::SeqCst);

        let session = self.resolver.resolve().await;
        if self.epoch.load(Ordering::SeqCst) != epoch {
            return GuardOutcome::Cancelled;
        }
        if !session.is_authenticated {
            return GuardOutcome::Unauthenticated {
                redirect: LANDING_ROUTE,
            };
        }

        let role = self.roles.role(&session).await;
        if self.epoch.load(Ordering::SeqCst) != epoch {
            return GuardOutcome::Cancelled;
        }

        // Routes without a rule carry no role constraint.
        let allowed = match self.table.rule(path) {
            Some(rule) => can_access_route(role, &rule.allowed_roles, &self.policy),
            None => true,
        };

        if allowed {
            self.cue.allowed();
            GuardOutcome::Allowed
        } else {
            info!(path, role = ?role, "route denied, redirecting");
            self.cue.denied();
            GuardOutcome::Denied {
                redirect: LANDING_ROUTE,
            }
        }
    }
}
