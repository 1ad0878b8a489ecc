// Modales de bootstrap sin su JS: mostrar/ocultar con clases

use wasm_bindgen::prelude::*;

use crate::dom::{add_class, for_each_selected, get_element_by_id, on_click, remove_class, set_attribute};

pub fn show(id: &str) -> Result<(), JsValue> {
    let Some(modal) = get_element_by_id(id) else {
        return Ok(());
    };
    add_class(&modal, "show")?;
    add_class(&modal, "d-block")?;
    set_attribute(&modal, "aria-hidden", "false")
}

pub fn hide(id: &str) -> Result<(), JsValue> {
    let Some(modal) = get_element_by_id(id) else {
        return Ok(());
    };
    remove_class(&modal, "show")?;
    remove_class(&modal, "d-block")?;
    set_attribute(&modal, "aria-hidden", "true")
}

/// Botones de cierre (`data-bs-dismiss="modal"`) dentro del modal
pub fn bind_dismiss(id: &'static str) -> Result<(), JsValue> {
    let mut result = Ok(());
    for_each_selected(&format!("#{} [data-bs-dismiss=\"modal\"]", id), |button| {
        if let Err(e) = on_click(button, move |_| {
            if let Err(e) = hide(id) {
                log::warn!("⚠️ [MODAL] No se pudo cerrar #{}: {:?}", id, e);
            }
        }) {
            result = Err(e);
        }
    })?;
    result
}
