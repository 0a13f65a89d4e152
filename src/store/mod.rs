//! Reduction engine.
//!
//! A [`Store`] owns the current state of one [`Feature`], reduces changes
//! one at a time under a single async lock and republishes real
//! transitions through its [`SubscriptionChannel`].

mod channel;
mod effects;

pub use channel::{RegistrationId, Subscriber, SubscriptionChannel};
pub use effects::Effects;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::Span;
use uuid::Uuid;

use crate::config::{NoOpDetection, StoreConfig};
use crate::dispatch::DispatcherProvider;
use crate::error::RegistrationError;
use crate::lifecycle::Lifecycle;
use crate::mvi::{Action, Reducer};

/// Behavior plugged into a [`Store`].
///
/// The reducer half is pure. The action half decides which background
/// work to launch; that work reports back only through
/// [`Effects::dispatch_change`].
pub trait Feature: Reducer + Send + Sync + Sized + 'static {
    type Action: Action;

    /// Map an action to background work. Must not block.
    fn on_action(&self, action: Self::Action, effects: &Effects<Self>);

    /// Called after a real transition has been published.
    ///
    /// `old` and `new` are never the same value. Runs while the store lock
    /// is held, so keep it cheap.
    fn on_state_transition(&self, _old: &Arc<Self::State>, _new: &Arc<Self::State>) {}

    /// Called when the subscriber disconnects, before the store aborts the
    /// feature's in-flight effects. Also called when a subscriber is
    /// dropped without unregistering.
    fn on_detach(&self) {}
}

/// Outcome of a single `dispatch_change`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The reduced state was published.
    Published,
    /// The reducer signalled no transition; nothing was published.
    Skipped,
    /// The store no longer exists; the change was dropped unreduced.
    Detached,
    /// An earlier reduction panicked. The store refuses further changes and
    /// keeps the last good state.
    Poisoned,
}

pub(crate) struct StoreInner<F: Feature> {
    feature: F,
    state: tokio::sync::Mutex<Arc<F::State>>,
    channel: SubscriptionChannel<F::State>,
    dispatchers: Arc<dyn DispatcherProvider>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    config: StoreConfig,
    poisoned: AtomicBool,
    span: Span,
}

impl<F: Feature> StoreInner<F> {
    async fn dispatch_change(&self, change: F::Change) -> Transition {
        let mut current = self.state.lock().await;
        if self.is_poisoned() {
            tracing::error!(parent: &self.span, ?change, "Store poisoned, change rejected");
            return Transition::Poisoned;
        }
        tracing::trace!(parent: &self.span, ?change, "Reducing change");

        // Poison first, then let the panic continue into the caller.
        let next = match panic::catch_unwind(AssertUnwindSafe(|| F::reduce(&current, change))) {
            Ok(next) => next,
            Err(payload) => {
                self.poisoned.store(true, Ordering::Release);
                tracing::error!(parent: &self.span, state = ?*current, "Reducer panicked, store poisoned");
                panic::resume_unwind(payload);
            }
        };
        let unchanged = Arc::ptr_eq(&*current, &next)
            || (self.config.no_op_detection == NoOpDetection::Equality && **current == *next);

        if unchanged {
            if !self.config.publish_every_transition {
                tracing::trace!(parent: &self.span, "State unchanged, transition skipped");
                return Transition::Skipped;
            }
            self.channel.publish(Arc::clone(&*current));
            tracing::debug!(parent: &self.span, "Unchanged state published (publish_every_transition)");
            return Transition::Published;
        }

        let previous = std::mem::replace(&mut *current, next);
        self.channel.publish(Arc::clone(&*current));
        tracing::debug!(parent: &self.span, state = ?*current, "State published");
        self.feature.on_state_transition(&previous, &current);
        Transition::Published
    }

    fn is_poisoned(&self) -> bool {
        self.poisoned.load(Ordering::Acquire)
    }

    fn track(&self, task: JoinHandle<()>) {
        let mut tasks = self.tasks.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(task);
    }

    fn cancel_effects(&self) -> usize {
        let tasks = std::mem::take(&mut *self.tasks.lock());
        let mut cancelled = 0;
        for task in tasks {
            if !task.is_finished() {
                cancelled += 1;
            }
            task.abort();
        }
        cancelled
    }

    fn detach(&self, registration: Option<RegistrationId>) {
        let removed = match registration {
            Some(id) => self.channel.unregister_id(id),
            None => self.channel.unregister(),
        };
        if removed {
            self.on_vacated();
        }
    }

    fn on_vacated(&self) {
        self.feature.on_detach();
        let cancelled = self.cancel_effects();
        tracing::info!(parent: &self.span, cancelled, "Subscriber detached");
    }
}

impl<F: Feature> Drop for StoreInner<F> {
    fn drop(&mut self) {
        self.detach(None);
        let cancelled = self.cancel_effects();
        if cancelled > 0 {
            tracing::info!(parent: &self.span, cancelled, "Store dropped, effects cancelled");
        }
    }
}

/// State container for one feature.
///
/// Cloning yields another handle to the same store. When the last handle
/// is dropped the subscriber is detached and every effect is aborted.
pub struct Store<F: Feature> {
    inner: Arc<StoreInner<F>>,
}

impl<F: Feature> Clone for Store<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: Feature> Store<F> {
    /// Store starting from `F::State::default()` with default config.
    pub fn new(feature: F, dispatchers: Arc<dyn DispatcherProvider>) -> Self {
        Self::builder(feature, dispatchers).build()
    }

    pub fn builder(feature: F, dispatchers: Arc<dyn DispatcherProvider>) -> StoreBuilder<F> {
        StoreBuilder {
            feature,
            dispatchers,
            initial_state: None,
            config: StoreConfig::default(),
            span: None,
        }
    }

    /// Hand an action to the feature. Returns without waiting for any work.
    pub fn dispatch_action(&self, action: F::Action) {
        tracing::debug!(parent: &self.inner.span, ?action, "Action dispatched");
        let effects = Effects::new(&self.inner);
        self.inner.feature.on_action(action, &effects);
    }

    /// Reduce `change` against the current state.
    ///
    /// Waits for any reduction already in progress; changes are applied in
    /// the order their callers acquire the lock.
    pub async fn dispatch_change(&self, change: F::Change) -> Transition {
        self.inner.dispatch_change(change).await
    }

    /// Current state snapshot.
    pub fn state(&self) -> Arc<F::State> {
        self.inner.channel.latest()
    }

    pub fn register<V>(&self, subscriber: &Arc<V>) -> Result<RegistrationId, RegistrationError>
    where
        V: Subscriber<F::State>,
    {
        self.inner.channel.register(subscriber)
    }

    /// Register `subscriber` and unregister it when `lifecycle` is destroyed.
    pub fn bind<V>(
        &self,
        subscriber: &Arc<V>,
        lifecycle: &Lifecycle,
    ) -> Result<RegistrationId, RegistrationError>
    where
        V: Subscriber<F::State>,
    {
        let id = self.register(subscriber)?;
        let store: Weak<StoreInner<F>> = Arc::downgrade(&self.inner);
        lifecycle.on_destroy(move || {
            if let Some(store) = store.upgrade() {
                store.detach(Some(id));
            }
        });
        Ok(id)
    }

    /// Disconnect the subscriber, if any. Idempotent.
    pub fn unregister(&self) {
        self.inner.detach(None);
    }

    pub fn is_registered(&self) -> bool {
        self.inner.channel.is_registered()
    }

    /// Whether a reducer panicked. A poisoned store answers every further
    /// change with [`Transition::Poisoned`].
    pub fn is_poisoned(&self) -> bool {
        self.inner.is_poisoned()
    }

    pub fn config(&self) -> StoreConfig {
        self.inner.config
    }

    pub fn feature(&self) -> &F {
        &self.inner.feature
    }
}

pub struct StoreBuilder<F: Feature> {
    feature: F,
    dispatchers: Arc<dyn DispatcherProvider>,
    initial_state: Option<F::State>,
    config: StoreConfig,
    span: Option<Span>,
}

impl<F: Feature> StoreBuilder<F> {
    pub fn initial_state(mut self, state: F::State) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Span every log line and effect of this store is recorded under.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn build(self) -> Store<F> {
        let span = self.span.unwrap_or_else(|| {
            tracing::info_span!(
                "store",
                id = %Uuid::new_v4(),
                feature = std::any::type_name::<F>()
            )
        });
        let initial = Arc::new(self.initial_state.unwrap_or_default());

        let inner = Arc::new_cyclic(|store: &Weak<StoreInner<F>>| {
            let store = Weak::clone(store);
            let channel = SubscriptionChannel::new(Arc::clone(&initial), self.dispatchers.main())
                .with_vacated_hook(move || {
                    if let Some(store) = store.upgrade() {
                        store.on_vacated();
                    }
                });
            StoreInner {
                feature: self.feature,
                state: tokio::sync::Mutex::new(initial),
                channel,
                dispatchers: self.dispatchers,
                tasks: Mutex::new(Vec::new()),
                config: self.config,
                poisoned: AtomicBool::new(false),
                span,
            }
        });
        Store { inner }
    }
}
