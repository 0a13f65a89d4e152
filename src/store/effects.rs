use std::future::Future;
use std::sync::{Arc, Weak};

use tokio::runtime::Handle;
use tracing::Instrument;

use super::{Feature, StoreInner, Transition};
use crate::dispatch::DispatcherProvider;

/// Handle through which a feature runs background work.
///
/// Every launched task is owned by the store: detaching the subscriber or
/// dropping the store aborts it. The handle only holds a weak reference,
/// so a change produced after teardown is dropped instead of reduced.
pub struct Effects<F: Feature> {
    store: Weak<StoreInner<F>>,
}

impl<F: Feature> Clone for Effects<F> {
    fn clone(&self) -> Self {
        Self {
            store: Weak::clone(&self.store),
        }
    }
}

impl<F: Feature> Effects<F> {
    pub(super) fn new(store: &Arc<StoreInner<F>>) -> Self {
        Self {
            store: Arc::downgrade(store),
        }
    }

    /// Spawn `work` on the background context.
    ///
    /// Returns `false` when the store is gone or poisoned and nothing was
    /// spawned.
    pub fn launch<Fut>(&self, work: Fut) -> bool
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.spawn_with(|dispatchers| dispatchers.background(), work)
    }

    /// Spawn `work` on the io context.
    pub fn launch_io<Fut>(&self, work: Fut) -> bool
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.spawn_with(|dispatchers| dispatchers.io(), work)
    }

    pub async fn dispatch_change(&self, change: F::Change) -> Transition {
        match self.store.upgrade() {
            Some(store) => store.dispatch_change(change).await,
            None => {
                tracing::trace!(?change, "Store torn down, change dropped");
                Transition::Detached
            }
        }
    }

    fn spawn_with<Fut>(&self, context: impl FnOnce(&dyn DispatcherProvider) -> Handle, work: Fut) -> bool
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let Some(store) = self.store.upgrade() else {
            tracing::trace!("Store torn down, effect not launched");
            return false;
        };
        if store.is_poisoned() {
            tracing::warn!(parent: &store.span, "Store poisoned, effect not launched");
            return false;
        }
        let handle = context(store.dispatchers.as_ref());
        let task = handle.spawn(work.instrument(store.span.clone()));
        store.track(task);
        true
    }
}
