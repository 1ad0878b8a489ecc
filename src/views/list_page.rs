// ============================================================================
// LIST PAGE - Pegamento común de las páginas con listas
// ============================================================================
// Controlador + dispatcher por lista, búsqueda por formulario y botones de
// fila delegados en el contenedor.
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::dom::{get_element_by_id, on_action, on_submit};
use crate::services::resources::ResourceDescriptor;
use crate::viewmodels::list_controller::ListController;
use crate::viewmodels::action_dispatcher::Refresh;
use crate::viewmodels::list_renderer::{ListPresenter, RowCommand};
use crate::viewmodels::{ActionDispatcher, ActionKind, ConfirmPrompt, Criteria};
use crate::views::list_view::DomListSink;

/// Lista montada en la página: carga + acciones de fila
pub struct MountedList<P: ListPresenter> {
    pub controller: ListController<P>,
    pub dispatcher: ActionDispatcher,
    pub descriptor: &'static ResourceDescriptor,
}

impl<P: ListPresenter> Clone for MountedList<P> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            dispatcher: self.dispatcher.clone(),
            descriptor: self.descriptor,
        }
    }
}

impl<P: ListPresenter + 'static> MountedList<P> {
    pub fn new(ctx: &AppContext, presenter: P, descriptor: &'static ResourceDescriptor, sink: DomListSink) -> Self {
        let controller = ListController::new(presenter, ctx.resources(descriptor), Rc::new(sink));
        Self::assemble(ctx, controller, descriptor)
    }

    /// Solo los primeros `limit` elementos (destacados)
    pub fn limited(
        ctx: &AppContext,
        presenter: P,
        descriptor: &'static ResourceDescriptor,
        sink: DomListSink,
        limit: usize,
    ) -> Self {
        let controller = ListController::new(presenter, ctx.resources(descriptor), Rc::new(sink)).with_limit(limit);
        Self::assemble(ctx, controller, descriptor)
    }

    fn assemble(ctx: &AppContext, controller: ListController<P>, descriptor: &'static ResourceDescriptor) -> Self {
        let dispatcher = ActionDispatcher::new(
            ctx.resources(descriptor),
            ctx.confirmer.clone(),
            ctx.notifier.clone(),
            Rc::new(controller.clone()),
        );
        Self {
            controller,
            dispatcher,
            descriptor,
        }
    }

    pub fn load(&self, criteria: Criteria) {
        let controller = self.controller.clone();
        spawn_local(async move {
            controller.load(criteria).await;
        });
    }

    /// Recarga con los últimos criterios usados
    pub fn refresh(&self) {
        let controller = self.controller.clone();
        spawn_local(async move {
            controller.refresh().await;
        });
    }

    /// Submit del formulario de búsqueda → recarga con sus criterios
    pub fn bind_search<F>(&self, form_id: &str, read: F) -> Result<(), JsValue>
    where
        F: Fn() -> Criteria + 'static,
    {
        let Some(form) = get_element_by_id(form_id) else {
            return Ok(());
        };
        let list = self.clone();
        on_submit(&form, move || list.load(read()))
    }

    /// Confirmar y ejecutar una acción destructiva/de estado
    pub fn run(&self, action: ActionKind, id: u64) {
        let dispatcher = self.dispatcher.clone();
        let prompt = ConfirmPrompt::for_action(&action, self.descriptor.name);
        spawn_local(async move {
            // el dispatcher ya notifica el error al usuario
            let _ = dispatcher.dispatch(&action, id, &prompt).await;
        });
    }
}

/// Botones `data-action` de los contenedores indicados (tabla y tarjetas)
pub fn bind_row_actions<F>(container_ids: &[&str], handler: F) -> Result<(), JsValue>
where
    F: Fn(RowCommand, u64) + 'static,
{
    let handler = Rc::new(handler);
    for id in container_ids {
        let Some(container) = get_element_by_id(id) else {
            continue;
        };
        let handler = handler.clone();
        on_action(&container, move |action, entity_id| match RowCommand::decode(&action) {
            Some(command) => handler(command, entity_id),
            None => log::warn!("⚠️ [LIST] Acción desconocida: {}", action),
        })?;
    }
    Ok(())
}
