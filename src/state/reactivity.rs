// ============================================================================
// REACTIVITY - Estado observable con subscribers (get/set/subscribe)
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Callback<T> = Rc<dyn Fn(&T)>;

/// Estado reactivo compartido. Los clones comparten valor Y subscribers, así
/// cualquier copia que haga `set` notifica a todos.
pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<Callback<T>>>>,
}

impl<T: Clone> ReactiveState<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Copia del valor actual
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Leer sin clonar
    pub fn with<R>(&self, reader: impl FnOnce(&T) -> R) -> R {
        reader(&self.value.borrow())
    }

    /// Establecer nuevo valor y notificar subscribers
    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Actualizar valor usando closure y notificar
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        updater(&mut self.value.borrow_mut());
        self.notify();
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&T) + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(callback));
    }

    // Snapshot de valor y callbacks: un subscriber puede volver a hacer set
    fn notify(&self) {
        let snapshot = self.get();
        let callbacks: Vec<Callback<T>> = self.subscribers.borrow().clone();
        for callback in callbacks {
            callback(&snapshot);
        }
    }
}

impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn clones_share_value_and_subscribers() {
        let state = ReactiveState::new(1);
        let seen = Rc::new(Cell::new(0));
        let seen_clone = seen.clone();
        state.subscribe(move |v| seen_clone.set(*v));

        let other = state.clone();
        other.set(7);

        assert_eq!(state.get(), 7);
        assert_eq!(seen.get(), 7);
    }

    #[test]
    fn subscriber_may_write_back_without_panicking() {
        let state = ReactiveState::new(0u32);
        let writer = state.clone();
        state.subscribe(move |v| {
            if *v == 1 {
                writer.set(2);
            }
        });
        state.set(1);
        assert_eq!(state.get(), 2);
    }
}
