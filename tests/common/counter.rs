use mvi_store::mvi::{Action, Change, Reducer, UiState};
use mvi_store::{Effects, Feature};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Counter {
    pub value: i64,
}

impl UiState for Counter {}

#[derive(Debug, Clone)]
pub enum CounterChange {
    /// Adds the amount; adding zero hands back the same state.
    Add(i64),
    /// Always hands back the same state.
    Unchanged,
    /// Fresh allocation equal to the current state.
    Rebuilt,
    /// The reducer panics.
    Explode,
}

impl Change for CounterChange {}

#[derive(Debug)]
pub enum CounterAction {
    Add(i64),
    AddAfter { amount: i64, delay: Duration },
    Explode,
}

impl Action for CounterAction {}

#[derive(Default)]
pub struct CounterFeature {
    pub transitions: Arc<Mutex<Vec<(i64, i64)>>>,
    pub detached: Arc<AtomicUsize>,
    /// `AddAfter` effects dropped before they dispatched their change.
    pub cancelled: Arc<AtomicUsize>,
}

/// Bumps the counter unless `finish` ran before the drop.
struct Unfinished(Option<Arc<AtomicUsize>>);

impl Unfinished {
    fn finish(mut self) {
        self.0 = None;
    }
}

impl Drop for Unfinished {
    fn drop(&mut self) {
        if let Some(counter) = self.0.take() {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl CounterFeature {
    pub fn transitions(&self) -> Vec<(i64, i64)> {
        self.transitions.lock().clone()
    }

    pub fn detach_count(&self) -> usize {
        self.detached.load(Ordering::SeqCst)
    }

    pub fn cancel_count(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Reducer for CounterFeature {
    type State = Counter;
    type Change = CounterChange;

    fn reduce(state: &Arc<Counter>, change: CounterChange) -> Arc<Counter> {
        match change {
            CounterChange::Add(0) | CounterChange::Unchanged => Arc::clone(state),
            CounterChange::Add(amount) => Arc::new(Counter {
                value: state.value + amount,
            }),
            CounterChange::Rebuilt => Arc::new(Counter { value: state.value }),
            CounterChange::Explode => panic!("counter exploded at {}", state.value),
        }
    }
}

impl Feature for CounterFeature {
    type Action = CounterAction;

    fn on_action(&self, action: CounterAction, effects: &Effects<Self>) {
        let task_effects = effects.clone();
        match action {
            CounterAction::Add(amount) => {
                effects.launch(async move {
                    task_effects.dispatch_change(CounterChange::Add(amount)).await;
                });
            }
            CounterAction::AddAfter { amount, delay } => {
                let unfinished = Unfinished(Some(Arc::clone(&self.cancelled)));
                effects.launch_io(async move {
                    tokio::time::sleep(delay).await;
                    task_effects.dispatch_change(CounterChange::Add(amount)).await;
                    unfinished.finish();
                });
            }
            CounterAction::Explode => {
                effects.launch(async move {
                    task_effects.dispatch_change(CounterChange::Explode).await;
                });
            }
        }
    }

    fn on_state_transition(&self, old: &Arc<Counter>, new: &Arc<Counter>) {
        assert!(!Arc::ptr_eq(old, new));
        self.transitions.lock().push((old.value, new.value));
    }

    fn on_detach(&self) {
        self.detached.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn values(states: &[Arc<Counter>]) -> Vec<i64> {
    states.iter().map(|state| state.value).collect()
}
