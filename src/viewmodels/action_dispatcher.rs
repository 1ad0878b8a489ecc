// ============================================================================
// ACTION DISPATCHER - confirmar → llamar API → refrescar lista → notificar
// ============================================================================

use async_trait::async_trait;
use std::rc::Rc;

use crate::services::api_client::ApiError;
use crate::services::resources::ResourceService;
use crate::utils::format::status_label;

/// Acción destructiva o de cambio de estado sobre una fila
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Delete,
    /// Reserva → `status=cancelled`
    Cancel,
    /// Ticket → `rental_status=<estado>`
    Transition(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub text: String,
    pub confirm_label: String,
}

impl ConfirmPrompt {
    fn new(title: &str, text: &str, confirm_label: &str) -> Self {
        Self {
            title: title.to_string(),
            text: text.to_string(),
            confirm_label: confirm_label.to_string(),
        }
    }

    pub fn delete_device() -> Self {
        Self::new("Are you sure?", "You won't be able to revert this!", "Yes, delete it!")
    }

    pub fn delete_user() -> Self {
        Self::new(
            "Are you sure?",
            "This will delete the user and all their data. You won't be able to revert this!",
            "Yes, delete it!",
        )
    }

    pub fn cancel_booking() -> Self {
        Self::new(
            "Are you sure?",
            "You want to cancel this booking? This action can be reversed by updating the status.",
            "Yes, cancel it!",
        )
    }

    pub fn transition(status: &str) -> Self {
        Self::new(
            "Update status",
            &format!("Are you sure you want to set this ticket to \"{}\"?", status_label(status)),
            "Yes",
        )
    }

    pub fn logout() -> Self {
        Self::new("Are you sure?", "You will be logged out of your account.", "Yes, logout!")
    }

    /// Prompt por defecto para una acción sobre un recurso
    pub fn for_action(action: &ActionKind, resource_name: &str) -> Self {
        match action {
            ActionKind::Delete if resource_name == "user" => Self::delete_user(),
            ActionKind::Delete => Self::delete_device(),
            ActionKind::Cancel => Self::cancel_booking(),
            ActionKind::Transition(status) => Self::transition(status),
        }
    }
}

/// Diálogo de confirmación (window.confirm en el navegador)
#[async_trait(?Send)]
pub trait Confirmer {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// Aviso transitorio al usuario (toast / alert)
pub trait Notifier {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Algo que sabe recargarse con sus últimos criterios (una lista)
#[async_trait(?Send)]
pub trait Refresh {
    async fn refresh(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Declined,
    Completed,
}

#[derive(Clone)]
pub struct ActionDispatcher {
    resources: ResourceService,
    confirmer: Rc<dyn Confirmer>,
    notifier: Rc<dyn Notifier>,
    list: Rc<dyn Refresh>,
}

impl ActionDispatcher {
    pub fn new(
        resources: ResourceService,
        confirmer: Rc<dyn Confirmer>,
        notifier: Rc<dyn Notifier>,
        list: Rc<dyn Refresh>,
    ) -> Self {
        Self {
            resources,
            confirmer,
            notifier,
            list,
        }
    }

    fn success_copy(&self, action: &ActionKind) -> String {
        let name = self.resources.descriptor().name;
        match action {
            ActionKind::Delete => format!("The {} has been deleted.", name),
            ActionKind::Cancel => "Booking cancelled successfully".to_string(),
            ActionKind::Transition(_) => "Status updated".to_string(),
        }
    }

    /// Nada sale a la red si el usuario no confirma
    pub async fn dispatch(
        &self,
        action: &ActionKind,
        entity_id: u64,
        prompt: &ConfirmPrompt,
    ) -> Result<DispatchOutcome, ApiError> {
        if !self.confirmer.confirm(prompt).await {
            log::info!("↩️ [ACTION] {:?} #{} cancelado por el usuario", action, entity_id);
            return Ok(DispatchOutcome::Declined);
        }

        match self.resources.run(action, entity_id).await {
            Ok(()) => {
                self.list.refresh().await;
                self.notifier.notify(NoticeLevel::Success, &self.success_copy(action));
                Ok(DispatchOutcome::Completed)
            }
            Err(e) => {
                log::error!("❌ [ACTION] {:?} #{} falló: {}", action, entity_id, e);
                self.notifier.notify(NoticeLevel::Error, e.user_message());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api_client::{ApiClient, AuthHeader};
    use crate::services::resources::{ResourceDescriptor, ADMIN_DEVICES, BOOKINGS};
    use crate::testing::{RecordingNotifier, ScriptedConfirmer, ScriptedTransport};
    use futures::executor::block_on;
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingRefresh(Cell<usize>);

    #[async_trait(?Send)]
    impl Refresh for CountingRefresh {
        async fn refresh(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    struct Harness {
        transport: ScriptedTransport,
        confirmer: Rc<ScriptedConfirmer>,
        notifier: Rc<RecordingNotifier>,
        refresh: Rc<CountingRefresh>,
        dispatcher: ActionDispatcher,
    }

    fn harness(descriptor: &'static ResourceDescriptor, answer: bool) -> Harness {
        let transport = ScriptedTransport::new();
        let api = ApiClient::new("http://api.test/api", Rc::new(transport.clone()), AuthHeader::default());
        let confirmer = Rc::new(ScriptedConfirmer::answering(answer));
        let notifier = Rc::new(RecordingNotifier::default());
        let refresh = Rc::new(CountingRefresh::default());
        let dispatcher = ActionDispatcher::new(
            ResourceService::new(api, descriptor),
            confirmer.clone(),
            notifier.clone(),
            refresh.clone(),
        );
        Harness {
            transport,
            confirmer,
            notifier,
            refresh,
            dispatcher,
        }
    }

    #[test]
    fn declined_delete_makes_no_request() {
        let h = harness(&ADMIN_DEVICES, false);

        let outcome = block_on(h.dispatcher.dispatch(&ActionKind::Delete, 4, &ConfirmPrompt::delete_device()));

        assert_eq!(outcome, Ok(DispatchOutcome::Declined));
        assert_eq!(h.confirmer.asked(), 1);
        assert_eq!(h.transport.request_count(), 0);
        assert_eq!(h.refresh.0.get(), 0);
        assert!(h.notifier.messages().is_empty());
    }

    #[test]
    fn confirmed_cancel_calls_refreshes_and_notifies() {
        let h = harness(&BOOKINGS, true);
        h.transport.respond(200, "{}");

        let outcome = block_on(h.dispatcher.dispatch(&ActionKind::Cancel, 9, &ConfirmPrompt::cancel_booking()));

        assert_eq!(outcome, Ok(DispatchOutcome::Completed));
        assert_eq!(h.transport.last_request().unwrap().url, "http://api.test/api/bookings/9");
        assert_eq!(h.refresh.0.get(), 1);
        assert_eq!(
            h.notifier.messages(),
            vec![(NoticeLevel::Success, "Booking cancelled successfully".to_string())]
        );
    }

    #[test]
    fn failed_call_notifies_without_refresh() {
        let h = harness(&ADMIN_DEVICES, true);
        h.transport.respond(409, r#"{"message":"Device has active bookings"}"#);

        let outcome = block_on(h.dispatcher.dispatch(&ActionKind::Delete, 4, &ConfirmPrompt::delete_device()));

        assert!(outcome.is_err());
        assert_eq!(h.refresh.0.get(), 0);
        assert_eq!(
            h.notifier.messages(),
            vec![(NoticeLevel::Error, "Device has active bookings".to_string())]
        );
    }

    #[test]
    fn transition_prompt_uses_a_readable_label() {
        let prompt = ConfirmPrompt::for_action(&ActionKind::Transition("in_progress".to_string()), "ticket");
        assert_eq!(prompt.text, "Are you sure you want to set this ticket to \"in progress\"?");
        assert_eq!(ConfirmPrompt::for_action(&ActionKind::Delete, "user"), ConfirmPrompt::delete_user());
    }
}
