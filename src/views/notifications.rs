// ============================================================================
// NOTIFICATIONS - Toasts, alertas y confirmaciones nativas
// ============================================================================

use async_trait::async_trait;
use gloo_timers::callback::Timeout;

use crate::config::CONFIG;
use crate::dom::{document, ElementBuilder};
use crate::viewmodels::action_dispatcher::{ConfirmPrompt, Confirmer, NoticeLevel, Notifier};

/// `window.alert` (no-op fuera del navegador)
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.alert_with_message(message) {
            log::warn!("⚠️ [NOTIFY] alert falló: {:?}", e);
        }
    }
}

fn level_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "success",
        NoticeLevel::Error => "danger",
        NoticeLevel::Info => "info",
    }
}

/// Toast arriba a la derecha que se cierra solo
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNotifier;

impl BrowserNotifier {
    fn show_toast(&self, level: NoticeLevel, message: &str) -> Result<(), wasm_bindgen::JsValue> {
        let body = document()
            .and_then(|doc| doc.body())
            .ok_or_else(|| wasm_bindgen::JsValue::from_str("No body"))?;
        let toast = ElementBuilder::new("div")?
            .class(&format!(
                "alert alert-{} shadow position-fixed top-0 end-0 m-3",
                level_class(level)
            ))
            .attr("role", "alert")?
            .attr("style", "z-index: 2000;")?
            .text(message)
            .build();
        body.append_child(&toast)?;

        Timeout::new(CONFIG.toast_timeout_ms, move || toast.remove()).forget();
        Ok(())
    }
}

impl Notifier for BrowserNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Error => log::error!("❌ [NOTIFY] {}", message),
            _ => log::info!("💬 [NOTIFY] {}", message),
        }
        if let Err(e) = self.show_toast(level, message) {
            log::warn!("⚠️ [NOTIFY] Toast no disponible ({:?}), usando alert", e);
            alert(message);
        }
    }
}

/// `window.confirm` con título + texto
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserConfirmer;

#[async_trait(?Send)]
impl Confirmer for BrowserConfirmer {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        window
            .confirm_with_message(&format!("{}\n\n{}", prompt.title, prompt.text))
            .unwrap_or(false)
    }
}
