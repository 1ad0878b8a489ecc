// ============================================================================
// CONFIG - Configuración de la app (URLs del API, entorno, opciones UI)
// ============================================================================
// Valores por defecto sobreescribibles en compilación (build.rs carga .env)
// ============================================================================

use serde::{Deserialize, Serialize};

const DEFAULT_API_URL_DEVELOPMENT: &str = "http://127.0.0.1:8000/api";
const DEFAULT_API_URL_PRODUCTION: &str = "https://techfix.ccs4thyear.com/backend/public/api";

/// Entorno de ejecución del frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Detecta el entorno inspeccionando el host.
    ///
    /// La app empaquetada (Cordova) siempre habla con producción; en el
    /// navegador, loopback o host vacío (file://) es desarrollo.
    pub fn detect(hostname: &str, packaged_app: bool) -> Self {
        if packaged_app {
            return Environment::Production;
        }
        match hostname {
            "" | "localhost" | "127.0.0.1" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_url_development: String,
    pub api_url_production: String,
    /// Entorno forzado en compilación; `None` = detectar por host
    pub environment_override: Option<Environment>,
    pub enable_logging: bool,
    /// Cuenta que nunca se puede borrar desde el panel admin
    pub protected_user_id: u64,
    pub toast_timeout_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url_development: DEFAULT_API_URL_DEVELOPMENT.to_string(),
            api_url_production: DEFAULT_API_URL_PRODUCTION.to_string(),
            environment_override: None,
            enable_logging: true,
            protected_user_id: 6,
            toast_timeout_ms: 3000,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url_development: option_env!("API_URL_DEVELOPMENT")
                .map(str::to_string)
                .unwrap_or(defaults.api_url_development),
            api_url_production: option_env!("API_URL_PRODUCTION")
                .map(str::to_string)
                .unwrap_or(defaults.api_url_production),
            environment_override: option_env!("ENVIRONMENT").and_then(Environment::parse),
            enable_logging: option_env!("ENABLE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enable_logging),
            protected_user_id: option_env!("PROTECTED_USER_ID")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.protected_user_id),
            toast_timeout_ms: option_env!("TOAST_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.toast_timeout_ms),
        }
    }

    /// URL base del API para un entorno
    pub fn api_url(&self, environment: Environment) -> &str {
        match environment {
            Environment::Development => &self.api_url_development,
            Environment::Production => &self.api_url_production,
        }
    }

    /// Resuelve el entorno: override de compilación o inspección del host
    pub fn resolve_environment(&self, hostname: &str, packaged_app: bool) -> Environment {
        self.environment_override
            .unwrap_or_else(|| Environment::detect(hostname, packaged_app))
    }

    /// URL del API para la página actual del navegador
    pub fn current_api_url(&self) -> String {
        let (hostname, packaged_app) = browser_host();
        let environment = self.resolve_environment(&hostname, packaged_app);
        let url = self.api_url(environment).to_string();

        match environment {
            Environment::Development => log::info!("🔧 [CONFIG] Modo desarrollo - API: {}", url),
            Environment::Production => log::info!("🚀 [CONFIG] Modo producción - API: {}", url),
        }
        url
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

/// Hostname actual y si corremos dentro de la app empaquetada (window.cordova)
fn browser_host() -> (String, bool) {
    let Some(window) = web_sys::window() else {
        return (String::new(), false);
    };
    let hostname = window.location().hostname().unwrap_or_default();
    let packaged_app = js_sys::Reflect::get(&window, &wasm_bindgen::JsValue::from_str("cordova"))
        .map(|value| !value.is_undefined() && !value.is_null())
        .unwrap_or(false);
    (hostname, packaged_app)
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_hosts_are_development() {
        assert_eq!(Environment::detect("localhost", false), Environment::Development);
        assert_eq!(Environment::detect("127.0.0.1", false), Environment::Development);
        assert_eq!(Environment::detect("", false), Environment::Development);
    }

    #[test]
    fn other_hosts_and_packaged_app_are_production() {
        assert_eq!(Environment::detect("techfix.github.io", false), Environment::Production);
        assert_eq!(Environment::detect("localhost", true), Environment::Production);
    }

    #[test]
    fn override_wins_over_host_detection() {
        let config = AppConfig {
            environment_override: Some(Environment::Production),
            ..AppConfig::default()
        };
        assert_eq!(config.resolve_environment("localhost", false), Environment::Production);
        assert_eq!(config.api_url(Environment::Production), DEFAULT_API_URL_PRODUCTION);
    }
}
