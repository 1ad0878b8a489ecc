// Lectura/escritura de campos de formulario por ID

use wasm_bindgen::JsCast;
use web_sys::{HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use crate::dom::get_element_by_id;
use crate::services::http::{FilePart, FilePayload};

/// Valor de input, select o textarea (vacío si no existe)
pub fn field_value(id: &str) -> String {
    let Some(element) = get_element_by_id(id) else {
        return String::new();
    };
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

pub fn set_field_value(id: &str, value: &str) {
    let Some(element) = get_element_by_id(id) else {
        return;
    };
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.set_value(value);
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.set_value(value);
    }
}

/// Primer archivo elegido en un `<input type="file">`
pub fn selected_file(id: &str) -> Option<FilePart> {
    let input = get_element_by_id(id)?.dyn_into::<HtmlInputElement>().ok()?;
    let file = input.files()?.get(0)?;
    Some(FilePart {
        file_name: file.name(),
        payload: FilePayload::Browser(file),
    })
}

pub fn reset_form(id: &str) {
    if let Some(form) = get_element_by_id(id).and_then(|e| e.dyn_into::<HtmlFormElement>().ok()) {
        form.reset();
    }
}

/// Parámetro de la URL actual (`?username=...`)
pub fn query_param(name: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search).ok()?.get(name)
}
