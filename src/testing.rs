// Dobles de prueba compartidos por los tests del crate

use async_trait::async_trait;
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::services::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::viewmodels::action_dispatcher::{ConfirmPrompt, Confirmer, NoticeLevel, Notifier};
use crate::viewmodels::list_controller::ListSink;
use crate::viewmodels::list_renderer::ListView;
use crate::viewmodels::navigation::{Navigator, Route};

/// Responde en orden lo que se le haya programado y guarda cada request
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Rc<RefCell<VecDeque<Result<HttpResponse, TransportError>>>>,
    sent: Rc<RefCell<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.script.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn fail(&self, message: &str) {
        self.script
            .borrow_mut()
            .push_back(Err(TransportError(message.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.sent.borrow().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.sent.borrow().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.sent.borrow().len()
    }
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.borrow_mut().push(request);
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response".to_string())))
    }
}

/// Deja cada request en vuelo hasta que el test la resuelve
#[derive(Clone, Default)]
pub struct DeferredTransport {
    waiting: Rc<RefCell<Vec<Option<oneshot::Sender<HttpResponse>>>>>,
}

impl DeferredTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.waiting.borrow().iter().filter(|slot| slot.is_some()).count()
    }

    /// Resuelve la request número `index` (orden de envío)
    pub fn resolve(&self, index: usize, status: u16, body: &str) {
        let sender = self.waiting.borrow_mut()[index].take().expect("request already resolved");
        sender
            .send(HttpResponse {
                status,
                body: body.to_string(),
            })
            .expect("request dropped");
    }
}

#[async_trait(?Send)]
impl HttpTransport for DeferredTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let (sender, receiver) = oneshot::channel();
        self.waiting.borrow_mut().push(Some(sender));
        receiver
            .await
            .map_err(|_| TransportError("request abandoned".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(NoticeLevel, String)> {
        self.messages.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.messages.borrow_mut().push((level, message.to_string()));
    }
}

/// Contesta siempre lo mismo y cuenta cuántas veces se preguntó
pub struct ScriptedConfirmer {
    answer: bool,
    asked: Cell<usize>,
}

impl ScriptedConfirmer {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Cell::new(0),
        }
    }

    pub fn asked(&self) -> usize {
        self.asked.get()
    }
}

#[async_trait(?Send)]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
        self.asked.set(self.asked.get() + 1);
        self.answer
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    visited: RefCell<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<Route> {
        self.visited.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn go(&self, route: &Route) {
        self.visited.borrow_mut().push(route.clone());
    }
}

#[derive(Default)]
pub struct RecordingSink {
    views: RefCell<Vec<ListView>>,
}

impl RecordingSink {
    pub fn views(&self) -> Vec<ListView> {
        self.views.borrow().clone()
    }

    pub fn last(&self) -> Option<ListView> {
        self.views.borrow().last().cloned()
    }
}

impl ListSink for RecordingSink {
    fn publish(&self, view: &ListView) {
        self.views.borrow_mut().push(view.clone());
    }
}
