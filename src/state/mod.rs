// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod session_store;
pub mod list_state;

pub use reactivity::ReactiveState;
pub use session_store::{SessionError, SessionStore};
pub use list_state::{ListState, RequestSequencer, Ticket};
