// Navegación real entre páginas (window.location)

use crate::viewmodels::navigation::{Navigator, Route};

/// Las páginas de admin/ y staff/ viven un nivel más abajo que el resto
#[derive(Debug, Clone)]
pub struct BrowserNavigator {
    root_prefix: &'static str,
}

impl BrowserNavigator {
    pub fn new(nested: bool) -> Self {
        Self {
            root_prefix: if nested { "../" } else { "" },
        }
    }

    pub fn href(&self, route: &Route) -> String {
        format!("{}{}", self.root_prefix, route.path())
    }
}

impl Navigator for BrowserNavigator {
    fn go(&self, route: &Route) {
        let href = self.href(route);
        log::info!("➡️ [NAV] {}", href);
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(&href) {
                log::error!("❌ [NAV] No se pudo navegar a {}: {:?}", href, e);
            }
        }
    }
}
