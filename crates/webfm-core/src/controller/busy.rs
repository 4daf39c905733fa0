//! Busy indicator scopes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::event::{Event, Observers};

/// Counts in-flight workflows.
///
/// [`Event::BusyChanged`] is emitted only on the idle/busy edges, so a
/// reload nested inside an upload does not flicker the indicator.
#[derive(Debug, Clone)]
pub struct BusyState {
    depth: Arc<AtomicUsize>,
    observers: Observers,
}

impl BusyState {
    pub fn new(observers: Observers) -> Self {
        Self {
            depth: Arc::new(AtomicUsize::new(0)),
            observers,
        }
    }

    /// Marks a workflow as started until the returned scope is dropped.
    #[must_use = "the workflow is only busy while the scope is alive"]
    pub fn enter(&self) -> BusyScope {
        if self.depth.fetch_add(1, Ordering::SeqCst) == 0 {
            self.observers.emit(Event::BusyChanged(true));
        }
        BusyScope {
            state: self.clone(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.depth.load(Ordering::SeqCst) > 0
    }
}

/// RAII guard returned by [`BusyState::enter`]. Released on every exit
/// path, including early returns and `?`.
#[derive(Debug)]
pub struct BusyScope {
    state: BusyState,
}

impl Drop for BusyScope {
    fn drop(&mut self) {
        if self.state.depth.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.state.observers.emit(Event::BusyChanged(false));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{harness, FakeService};

    fn busy_events(events: &[Event]) -> Vec<bool> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::BusyChanged(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn scope_emits_on_enter_and_drop() {
        let h = harness(FakeService::new());
        let busy = BusyState::new(h.observers.clone());

        {
            let _scope = busy.enter();
            assert!(busy.is_busy());
        }

        assert!(!busy.is_busy());
        assert_eq!(busy_events(&h.view.events()), vec![true, false]);
    }

    #[test]
    fn nested_scopes_emit_only_edges() {
        let h = harness(FakeService::new());
        let busy = BusyState::new(h.observers.clone());

        let outer = busy.enter();
        let inner = busy.enter();
        drop(inner);
        assert!(busy.is_busy());
        drop(outer);

        assert_eq!(busy_events(&h.view.events()), vec![true, false]);
    }

    #[test]
    fn scope_released_on_early_return() {
        fn work(busy: &BusyState) -> Result<(), ()> {
            let _scope = busy.enter();
            Err(())
        }

        let h = harness(FakeService::new());
        let busy = BusyState::new(h.observers.clone());
        assert!(work(&busy).is_err());
        assert!(!busy.is_busy());
    }
}
