// ============================================================================
// ROLE GUARD - Control de acceso por página (una sola vez por carga)
// ============================================================================

use std::cell::Cell;

use crate::models::{Role, Session};
use crate::viewmodels::navigation::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Unchecked,
    Checked,
}

/// Quién puede ver una página
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePolicy {
    AdminOnly,
    /// Staff y también admin
    Staff,
    /// Cualquier usuario con sesión
    Authenticated,
}

impl PagePolicy {
    pub fn allows(&self, role: &Role) -> bool {
        match self {
            PagePolicy::AdminOnly => *role == Role::Admin,
            PagePolicy::Staff => matches!(role, Role::Staff | Role::Admin),
            PagePolicy::Authenticated => true,
        }
    }

    fn denied_copy(&self) -> &'static str {
        match self {
            PagePolicy::AdminOnly => "Access Denied. Admins only.",
            PagePolicy::Staff => "Access Denied. Staff only.",
            PagePolicy::Authenticated => "Please login to continue.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    Allowed(Session),
    /// El llamador muestra la alerta, redirige y NO inicializa la página
    Denied { alert: String, redirect: Route },
    AlreadyChecked,
}

#[derive(Debug)]
pub struct RoleGuard {
    policy: PagePolicy,
    state: Cell<GuardState>,
}

impl RoleGuard {
    pub fn new(policy: PagePolicy) -> Self {
        Self {
            policy,
            state: Cell::new(GuardState::Unchecked),
        }
    }

    pub fn state(&self) -> GuardState {
        self.state.get()
    }

    pub fn check(&self, session: Option<Session>) -> GuardOutcome {
        if self.state.replace(GuardState::Checked) == GuardState::Checked {
            return GuardOutcome::AlreadyChecked;
        }

        match session {
            Some(session) if self.policy.allows(session.role()) => {
                log::info!("🛡️ [GUARD] Acceso permitido ({})", session.role());
                GuardOutcome::Allowed(session)
            }
            Some(session) => {
                log::warn!("🚫 [GUARD] Rol {} sin acceso a {:?}", session.role(), self.policy);
                GuardOutcome::Denied {
                    alert: self.policy.denied_copy().to_string(),
                    redirect: Route::Index,
                }
            }
            None => {
                log::warn!("🚫 [GUARD] Sin sesión, redirigiendo a login");
                GuardOutcome::Denied {
                    alert: self.policy.denied_copy().to_string(),
                    redirect: Route::Login,
                }
            }
        }
    }
}
