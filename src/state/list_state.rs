// ============================================================================
// LIST STATE - Vista publicada, últimos criterios y secuencia de requests
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::state::reactivity::ReactiveState;
use crate::viewmodels::list_query::Criteria;
use crate::viewmodels::list_renderer::ListView;

/// Ticket de una carga de lista
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Numera cada request de una lista; solo la última emitida puede pintar
#[derive(Clone, Default, Debug)]
pub struct RequestSequencer {
    latest: Rc<Cell<u64>>,
}

impl RequestSequencer {
    pub fn issue(&self) -> Ticket {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        Ticket(next)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest.get()
    }
}

#[derive(Clone)]
pub struct ListState {
    pub view: ReactiveState<ListView>,
    pub last_criteria: Rc<RefCell<Criteria>>,
    pub sequencer: RequestSequencer,
}

impl ListState {
    pub fn new(initial: ListView) -> Self {
        Self {
            view: ReactiveState::new(initial),
            last_criteria: Rc::new(RefCell::new(Criteria::default())),
            sequencer: RequestSequencer::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_ticket_is_current() {
        let sequencer = RequestSequencer::default();
        let a = sequencer.issue();
        let b = sequencer.issue();
        assert!(!sequencer.is_current(a));
        assert!(sequencer.is_current(b));
    }
}
