pub mod list_query;
pub mod list_renderer;
pub mod presenters;
pub mod action_dispatcher;
pub mod list_controller;
pub mod navigation;
pub mod role_guard;
pub mod session_viewmodel;

pub use action_dispatcher::{ActionDispatcher, ActionKind, ConfirmPrompt, Confirmer, NoticeLevel, Notifier};
pub use list_controller::{ListController, ListSink};
pub use list_query::Criteria;
pub use navigation::{Navigator, Route};
pub use role_guard::{GuardOutcome, PagePolicy, RoleGuard};
pub use session_viewmodel::SessionViewModel;
