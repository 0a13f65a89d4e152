mod common;

use common::recorder;
use mvi_store::mvi::{Action, Change, Reducer, UiState};
use mvi_store::{Effects, Feature, RuntimeDispatchers, Store, Transition};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

static ACTIVE: AtomicUsize = AtomicUsize::new(0);
static MAX_ACTIVE: AtomicUsize = AtomicUsize::new(0);
static CALLS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone, PartialEq, Default)]
struct Tally {
    applied: Vec<usize>,
}

impl UiState for Tally {}

#[derive(Debug)]
struct Apply(usize);

impl Change for Apply {}

#[derive(Debug)]
struct Burst(usize);

impl Action for Burst {}

/// Reducer with an artificial delay that records overlapping calls.
struct SlowFeature;

impl Reducer for SlowFeature {
    type State = Tally;
    type Change = Apply;

    fn reduce(state: &Arc<Tally>, change: Apply) -> Arc<Tally> {
        let active = ACTIVE.fetch_add(1, Ordering::SeqCst) + 1;
        MAX_ACTIVE.fetch_max(active, Ordering::SeqCst);
        CALLS.fetch_add(1, Ordering::SeqCst);

        std::thread::sleep(Duration::from_millis(2));
        let mut applied = state.applied.clone();
        applied.push(change.0);

        ACTIVE.fetch_sub(1, Ordering::SeqCst);
        Arc::new(Tally { applied })
    }
}

impl Feature for SlowFeature {
    type Action = Burst;

    fn on_action(&self, action: Burst, effects: &Effects<Self>) {
        for origin in 0..action.0 {
            let task_effects = effects.clone();
            effects.launch(async move {
                task_effects.dispatch_change(Apply(origin)).await;
            });
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_changes_never_overlap() {
    const ORIGINS: usize = 24;

    let dispatchers = RuntimeDispatchers::from_current().unwrap().into_shared();
    let store = Store::new(SlowFeature, dispatchers);
    let (subscriber, mut rendered) = recorder::<Tally>();
    store.register(&subscriber).unwrap();
    assert!(rendered.next().await.applied.is_empty());

    let mut handles = Vec::new();
    for origin in 0..ORIGINS {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.dispatch_change(Apply(origin)).await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), Transition::Published);
    }

    assert_eq!(CALLS.load(Ordering::SeqCst), ORIGINS);
    assert_eq!(MAX_ACTIVE.load(Ordering::SeqCst), 1);

    let final_state = store.state();
    let mut applied = final_state.applied.clone();
    applied.sort_unstable();
    assert_eq!(applied, (0..ORIGINS).collect::<Vec<_>>());

    // Deliveries arrive on the foreground thread in publish order, each
    // extending the previous one by exactly one change.
    let mut previous = 0;
    while previous < ORIGINS {
        let state = rendered.next().await;
        assert_eq!(state.applied.len(), previous + 1);
        previous = state.applied.len();
    }
    assert_eq!(*final_state, *store.state());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn actions_fan_out_and_reduce_sequentially() {
    #[derive(Debug, Clone, PartialEq, Default)]
    struct Seen(usize);
    impl UiState for Seen {}

    #[derive(Debug)]
    struct Hit;
    impl Change for Hit {}

    #[derive(Debug)]
    struct Fire(usize);
    impl Action for Fire {}

    static IN_REDUCE: AtomicUsize = AtomicUsize::new(0);
    static OVERLAPS: AtomicUsize = AtomicUsize::new(0);

    struct Fanout;

    impl Reducer for Fanout {
        type State = Seen;
        type Change = Hit;

        fn reduce(state: &Arc<Seen>, _change: Hit) -> Arc<Seen> {
            if IN_REDUCE.fetch_add(1, Ordering::SeqCst) > 0 {
                OVERLAPS.fetch_add(1, Ordering::SeqCst);
            }
            std::thread::sleep(Duration::from_millis(1));
            IN_REDUCE.fetch_sub(1, Ordering::SeqCst);
            Arc::new(Seen(state.0 + 1))
        }
    }

    impl Feature for Fanout {
        type Action = Fire;

        fn on_action(&self, action: Fire, effects: &Effects<Self>) {
            for _ in 0..action.0 {
                let task_effects = effects.clone();
                effects.launch(async move {
                    task_effects.dispatch_change(Hit).await;
                });
            }
        }
    }

    let dispatchers = RuntimeDispatchers::from_current().unwrap().into_shared();
    let store = Store::new(Fanout, dispatchers);
    let (subscriber, mut rendered) = recorder::<Seen>();
    store.register(&subscriber).unwrap();

    store.dispatch_action(Fire(16));
    loop {
        if rendered.next().await.0 == 16 {
            break;
        }
    }

    assert_eq!(OVERLAPS.load(Ordering::SeqCst), 0);
    assert_eq!(store.state().0, 16);
}
