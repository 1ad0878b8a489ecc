// ============================================================================
// EVENT HANDLING - Listeners de DOM
// ============================================================================
// closure.forget(): los listeners de elementos se limpian cuando el elemento
// sale del DOM. Cada página registra sus listeners UNA sola vez al arrancar.
// ============================================================================

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent, SubmitEvent};

pub fn on_click<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Submit de formulario (se cancela el envío nativo)
pub fn on_submit<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    let closure = Closure::wrap(Box::new(move |event: SubmitEvent| {
        event.prevent_default();
        handler();
    }) as Box<dyn FnMut(SubmitEvent)>);
    element.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Click delegado: un listener en el contenedor para todos los botones con
/// `data-action` (las filas se repintan sin re-registrar nada)
pub fn on_action<F>(container: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(String, u64) + 'static,
{
    on_click(container, move |event: MouseEvent| {
        let Some(button) = action_target(&event) else {
            return;
        };
        let action = button.get_attribute("data-action");
        let id = button
            .get_attribute("data-id")
            .and_then(|id| id.parse::<u64>().ok());
        if let (Some(action), Some(id)) = (action, id) {
            event.prevent_default();
            handler(action, id);
        }
    })
}

fn action_target(event: &Event) -> Option<Element> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest("[data-action]")
        .ok()
        .flatten()
}
