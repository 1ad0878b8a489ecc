// ============================================================================
// PAGES - Montaje de cada zona del sitio
// ============================================================================
// Cada región se engancha solo si su contenedor existe en el HTML actual.
// ============================================================================

pub mod admin;
pub mod auth_forms;
pub mod catalog;
pub mod device_manager;
pub mod session_nav;
pub mod staff;

use wasm_bindgen::prelude::*;

use crate::app::{AppContext, Page};

pub fn mount(ctx: &AppContext) -> Result<(), JsValue> {
    session_nav::mount(ctx)?;
    match ctx.page {
        Page::Admin => admin::mount(ctx)?,
        Page::Staff => staff::mount(ctx)?,
        Page::Public | Page::Account => {
            auth_forms::mount(ctx)?;
            catalog::mount(ctx)?;
        }
    }
    log::info!("✅ [APP] Página {:?} lista", ctx.page);
    Ok(())
}
