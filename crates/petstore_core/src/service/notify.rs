//! Change notification registry.
//!
//! # Invariants
//! - Observers are called synchronously, in registration order.
//! - Events are dispatched in the order mutations completed.
//! - `ObserverId` values are never reused within one notifier.

use crate::contract::Address;
use std::sync::Arc;

/// Mutation that produced a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Inserted,
    Updated,
    Deleted,
}

/// Emitted after a mutation changed at least one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// New item address for inserts, the request address otherwise.
    pub address: Address,
    pub change: ChangeKind,
    pub affected: usize,
}

/// Receiver of change events.
pub trait ChangeObserver: Send + Sync {
    fn on_change(&self, event: &ChangeEvent);
}

/// Handle returned by registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Fire-and-forget dispatcher over registered observers.
#[derive(Default)]
pub struct ChangeNotifier {
    observers: Vec<(ObserverId, Arc<dyn ChangeObserver>)>,
    next_id: u64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Arc<dyn ChangeObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Removes one observer. Returns `false` when `id` is not registered.
    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    pub fn notify(&self, event: &ChangeEvent) {
        for (_, observer) in &self.observers {
            observer.on_change(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeEvent, ChangeKind, ChangeNotifier, ChangeObserver};
    use crate::contract::Address;
    use std::sync::{Arc, Mutex};

    struct Tagged {
        tag: &'static str,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    impl ChangeObserver for Tagged {
        fn on_change(&self, _event: &ChangeEvent) {
            self.seen.lock().unwrap().push(self.tag);
        }
    }

    fn event() -> ChangeEvent {
        ChangeEvent {
            address: Address::from("content://com.example.android.pets/pets"),
            change: ChangeKind::Deleted,
            affected: 2,
        }
    }

    #[test]
    fn notify_calls_observers_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = ChangeNotifier::new();
        notifier.register(Arc::new(Tagged {
            tag: "first",
            seen: Arc::clone(&seen),
        }));
        notifier.register(Arc::new(Tagged {
            tag: "second",
            seen: Arc::clone(&seen),
        }));

        notifier.notify(&event());
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn unregister_removes_only_the_given_observer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = ChangeNotifier::new();
        let first = notifier.register(Arc::new(Tagged {
            tag: "first",
            seen: Arc::clone(&seen),
        }));
        let second = notifier.register(Arc::new(Tagged {
            tag: "second",
            seen: Arc::clone(&seen),
        }));
        assert_ne!(first, second);

        assert!(notifier.unregister(first));
        assert!(!notifier.unregister(first));

        notifier.notify(&event());
        assert_eq!(*seen.lock().unwrap(), vec!["second"]);
    }
}
