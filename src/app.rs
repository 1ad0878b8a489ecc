// ============================================================================
// APP - Arranque de cada página (contexto compartido + guard + vistas)
// ============================================================================
// Cada HTML marca su zona en `<body data-page="...">`. Las páginas protegidas
// pasan por el RoleGuard ANTES de montar nada; si se deniega, no se inicializa
// el resto de la página.
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;

use crate::config::CONFIG;
use crate::dom::body_page;
use crate::services::{ApiClient, AuthHeader, ResourceDescriptor, ResourceService};
use crate::state::SessionStore;
use crate::utils::storage::default_storage;
use crate::viewmodels::{Confirmer, GuardOutcome, Navigator, Notifier, PagePolicy, RoleGuard, Route};
use crate::views::notifications::{alert, BrowserConfirmer, BrowserNotifier};
use crate::views::navigation::BrowserNavigator;
use crate::views::pages;

/// Zona del sitio a la que pertenece la página actual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Public,
    Admin,
    Staff,
    /// Páginas de cliente que exigen sesión (mis reservas, perfil)
    Account,
}

impl Page {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("admin") => Page::Admin,
            Some("staff") => Page::Staff,
            Some("account") => Page::Account,
            _ => Page::Public,
        }
    }

    pub fn detect() -> Self {
        Self::parse(body_page().as_deref())
    }

    pub fn policy(&self) -> Option<PagePolicy> {
        match self {
            Page::Admin => Some(PagePolicy::AdminOnly),
            Page::Staff => Some(PagePolicy::Staff),
            Page::Account => Some(PagePolicy::Authenticated),
            Page::Public => None,
        }
    }

    /// admin/ y staff/ cuelgan un nivel por debajo de la raíz
    pub fn is_nested(&self) -> bool {
        matches!(self, Page::Admin | Page::Staff)
    }

    pub fn asset_root(&self) -> &'static str {
        if self.is_nested() {
            "../"
        } else {
            ""
        }
    }
}

/// Dependencias compartidas por todas las vistas de una página
#[derive(Clone)]
pub struct AppContext {
    pub page: Page,
    pub api: ApiClient,
    pub store: SessionStore,
    pub notifier: Rc<dyn Notifier>,
    pub confirmer: Rc<dyn Confirmer>,
    pub navigator: Rc<dyn Navigator>,
}

impl AppContext {
    pub fn browser(page: Page) -> Self {
        let auth = AuthHeader::default();
        let store = SessionStore::restore(default_storage(), auth.clone());
        let api = ApiClient::browser(CONFIG.current_api_url(), auth);
        Self {
            page,
            api,
            store,
            notifier: Rc::new(BrowserNotifier),
            confirmer: Rc::new(BrowserConfirmer),
            navigator: Rc::new(BrowserNavigator::new(page.is_nested())),
        }
    }

    pub fn resources(&self, descriptor: &'static ResourceDescriptor) -> ResourceService {
        ResourceService::new(self.api.clone(), descriptor)
    }

    pub fn go(&self, route: &Route) {
        self.navigator.go(route);
    }

    /// 401 en un request autenticado: sesión fuera y al login
    fn install_session_expiry(&self) {
        let store = self.store.clone();
        let navigator = self.navigator.clone();
        self.api.on_unauthenticated(move || {
            log::warn!("🔒 [APP] Token rechazado por el servidor, cerrando sesión");
            alert("Session expired. Please login again.");
            store.clear_session();
            navigator.go(&Route::Login);
        });
    }
}

/// Aplica la política de la página; `false` si ya se redirigió
fn enforce(guard: &RoleGuard, ctx: &AppContext) -> bool {
    match guard.check(ctx.store.get_session()) {
        GuardOutcome::Allowed(session) => {
            log::info!("✅ [GUARD] {} autorizado ({:?})", session.user.username, ctx.page);
            true
        }
        GuardOutcome::Denied { alert: message, redirect } => {
            log::warn!("⛔ [GUARD] Acceso denegado a {:?}", ctx.page);
            alert(&message);
            ctx.go(&redirect);
            false
        }
        GuardOutcome::AlreadyChecked => true,
    }
}

/// Aplicación de la página actual
pub struct App {
    ctx: AppContext,
    guard: Option<RoleGuard>,
}

impl App {
    pub fn new() -> Self {
        let page = Page::detect();
        log::info!("📄 [APP] Página {:?}", page);
        let ctx = AppContext::browser(page);
        ctx.install_session_expiry();
        Self {
            guard: page.policy().map(RoleGuard::new),
            ctx,
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Guard primero; si pasa, se montan las vistas de la página
    pub fn boot(&self) -> Result<(), JsValue> {
        if let Some(guard) = &self.guard {
            if !enforce(guard, &self.ctx) {
                return Ok(());
            }
        }
        pages::mount(&self.ctx)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_marker_selects_the_page_policy() {
        assert_eq!(Page::parse(Some("admin")).policy(), Some(PagePolicy::AdminOnly));
        assert_eq!(Page::parse(Some(" staff ")).policy(), Some(PagePolicy::Staff));
        assert_eq!(Page::parse(Some("account")).policy(), Some(PagePolicy::Authenticated));
        assert_eq!(Page::parse(None).policy(), None);
        assert_eq!(Page::parse(Some("catalog")), Page::Public);
    }

    #[test]
    fn only_dashboards_are_nested() {
        assert_eq!(Page::Admin.asset_root(), "../");
        assert_eq!(Page::Staff.asset_root(), "../");
        assert_eq!(Page::Public.asset_root(), "");
        assert!(!Page::Account.is_nested());
    }
}
