use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

type DestroyObserver = Box<dyn FnOnce() + Send + 'static>;

/// Lifecycle of the component hosting a subscriber.
///
/// `destroy()` runs every registered observer on the calling thread before
/// it returns, so a store bound to this lifecycle has unregistered its
/// subscriber by the time the host finishes tearing down.
pub struct Lifecycle {
    destroyed: Arc<AtomicBool>,
    notify: Arc<Notify>,
    observers: Mutex<Vec<DestroyObserver>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            destroyed: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Register an observer for the destroy signal.
    ///
    /// If the lifecycle is already destroyed the observer runs immediately.
    pub fn on_destroy<F>(&self, observer: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut observers = self.observers.lock();
            if !self.destroyed.load(Ordering::SeqCst) {
                observers.push(Box::new(observer));
                return;
            }
        }
        observer();
    }

    /// Signal destruction. Only the first call has any effect.
    pub fn destroy(&self) {
        let observers = {
            let mut observers = self.observers.lock();
            if self.destroyed.swap(true, Ordering::SeqCst) {
                return;
            }
            std::mem::take(&mut *observers)
        };
        tracing::debug!(observers = observers.len(), "Lifecycle destroyed");
        for observer in observers {
            observer();
        }
        self.notify.notify_waiters();
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    /// Cloneable view for code that only awaits destruction.
    pub fn handle(&self) -> LifecycleHandle {
        LifecycleHandle {
            destroyed: Arc::clone(&self.destroyed),
            notify: Arc::clone(&self.notify),
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only side of a [`Lifecycle`]; cannot destroy it.
#[derive(Clone)]
pub struct LifecycleHandle {
    destroyed: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl LifecycleHandle {
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub async fn wait(&self) {
        // Registered as a waiter before the flag is read, so a destroy in
        // between still wakes us.
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_destroyed() {
            return;
        }
        notified.await;
    }
}
