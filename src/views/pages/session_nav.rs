// Barra de navegación según sesión + botones de logout

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::dom::{get_element_by_id, on_click, set_visible};
use crate::services::AuthService;
use crate::viewmodels::SessionViewModel;

const GUEST_LINKS: [&str; 2] = ["auth-login", "auth-register"];
const MEMBER_LINKS: [&str; 4] = ["auth-logout", "nav-profile", "nav-my-bookings", "nav-my-devices"];
const LOGOUT_BUTTONS: [&str; 3] = ["auth-logout", "admin-logout", "staff-logout"];

fn apply_nav(logged_in: bool) {
    let toggle = |ids: &[&str], visible: bool| {
        for id in ids {
            if let Some(element) = get_element_by_id(id) {
                if let Err(e) = set_visible(&element, visible) {
                    log::warn!("⚠️ [NAV] #{}: {:?}", id, e);
                }
            }
        }
    };
    toggle(&GUEST_LINKS, !logged_in);
    toggle(&MEMBER_LINKS, logged_in);
}

pub fn mount(ctx: &AppContext) -> Result<(), JsValue> {
    apply_nav(ctx.store.is_logged_in());
    ctx.store.subscribe(|session| apply_nav(session.is_some()));

    let vm = Rc::new(SessionViewModel::new(AuthService::new(ctx.api.clone()), ctx.store.clone()));
    for id in LOGOUT_BUTTONS {
        let Some(button) = get_element_by_id(id) else {
            continue;
        };
        let (ctx, vm) = (ctx.clone(), vm.clone());
        on_click(&button, move |event| {
            event.prevent_default();
            let (ctx, vm) = (ctx.clone(), vm.clone());
            spawn_local(async move {
                if let Some(route) = vm.logout(ctx.confirmer.as_ref()).await {
                    log::info!("👋 [NAV] Sesión cerrada");
                    ctx.go(&route);
                }
            });
        })?;
    }
    Ok(())
}
