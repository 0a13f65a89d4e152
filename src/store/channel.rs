//! Single-slot, replay-latest channel between a store and its subscriber.

use std::cell::Cell;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::RegistrationError;

/// Renderer receiving state snapshots.
pub trait Subscriber<S>: Send + Sync + 'static {
    fn render_state(&self, state: Arc<S>);
}

impl<S, F> Subscriber<S> for F
where
    F: Fn(Arc<S>) + Send + Sync + 'static,
{
    fn render_state(&self, state: Arc<S>) {
        self(state)
    }
}

/// Identifies one `Empty → Registered → Empty` cycle of the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationId(u64);

type VacatedHook = Arc<dyn Fn() + Send + Sync + 'static>;

/// Open while deliveries may run. Held across each `render_state`, so
/// closing it waits for a render in progress. Reentrant: a subscriber may
/// unregister itself from inside `render_state`.
type RenderGate = Arc<ReentrantMutex<Cell<bool>>>;

/// Holds the latest state and at most one subscriber.
///
/// Publishing always updates the latest value. When a subscriber is
/// registered the value is also queued for it; a delivery task on the
/// `main` context drains the queue in publish order. A new registration
/// starts with the latest value already queued (replay-of-one).
///
/// A subscriber dropped without unregistering frees the slot as soon as
/// the channel notices, and the vacated hook runs as for an explicit
/// unregister.
pub struct SubscriptionChannel<S> {
    slot: Arc<Mutex<Slot<S>>>,
    main: Handle,
    vacated: Option<VacatedHook>,
}

struct Slot<S> {
    latest: Arc<S>,
    active: Option<Registration<S>>,
    next_id: u64,
}

struct Registration<S> {
    id: RegistrationId,
    queue: mpsc::UnboundedSender<Arc<S>>,
    subscriber: Weak<dyn Subscriber<S>>,
    gate: RenderGate,
    delivery: JoinHandle<()>,
}

impl<S> Registration<S> {
    fn is_abandoned(&self) -> bool {
        self.subscriber.strong_count() == 0
    }

    /// Returns once no `render_state` for this registration is running
    /// on another thread.
    fn close(self) {
        self.gate.lock().set(false);
        self.delivery.abort();
    }
}

impl<S> SubscriptionChannel<S>
where
    S: Send + Sync + 'static,
{
    pub fn new(initial: Arc<S>, main: Handle) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                latest: initial,
                active: None,
                next_id: 0,
            })),
            main,
            vacated: None,
        }
    }

    /// Run `hook` after a subscriber left without unregistering.
    pub fn with_vacated_hook<H>(mut self, hook: H) -> Self
    where
        H: Fn() + Send + Sync + 'static,
    {
        self.vacated = Some(Arc::new(hook));
        self
    }

    /// Occupy the slot with `subscriber`.
    ///
    /// Only a weak reference is kept: the channel never extends the
    /// subscriber's lifetime.
    pub fn register<V>(&self, subscriber: &Arc<V>) -> Result<RegistrationId, RegistrationError>
    where
        V: Subscriber<S>,
    {
        self.reap_abandoned();

        let mut slot = self.slot.lock();
        if slot.active.is_some() {
            return Err(RegistrationError::AlreadyRegistered);
        }

        let id = RegistrationId(slot.next_id);
        slot.next_id += 1;

        let (queue, pending) = mpsc::unbounded_channel();
        let _ = queue.send(Arc::clone(&slot.latest));

        let weak: Weak<V> = Arc::downgrade(subscriber);
        let weak: Weak<dyn Subscriber<S>> = weak;
        let gate: RenderGate = Arc::new(ReentrantMutex::new(Cell::new(true)));
        let delivery = self.main.spawn(deliver(
            pending,
            weak.clone(),
            Arc::clone(&gate),
            Abandon {
                slot: Arc::clone(&self.slot),
                id,
                vacated: self.vacated.clone(),
            },
        ));

        slot.active = Some(Registration {
            id,
            queue,
            subscriber: weak,
            gate,
            delivery,
        });
        tracing::debug!(registration = id.0, "Subscriber registered");
        Ok(id)
    }

    /// Clear the slot. Returns `false` when it was already empty.
    ///
    /// Does not run the vacated hook; the caller is the one detaching.
    pub fn unregister(&self) -> bool {
        let taken = self.slot.lock().active.take();
        match taken {
            Some(registration) => {
                tracing::debug!(registration = registration.id.0, "Subscriber unregistered");
                registration.close();
                true
            }
            None => false,
        }
    }

    /// Clear the slot only if it still holds registration `id`.
    pub fn unregister_id(&self, id: RegistrationId) -> bool {
        match take_registration(&self.slot, id) {
            Some(registration) => {
                tracing::debug!(registration = id.0, "Subscriber unregistered");
                registration.close();
                true
            }
            None => false,
        }
    }

    pub fn publish(&self, state: Arc<S>) {
        let mut slot = self.slot.lock();
        slot.latest = Arc::clone(&state);
        if let Some(registration) = &slot.active {
            if registration.queue.send(state).is_err() {
                tracing::trace!(
                    registration = registration.id.0,
                    "Delivery task gone, state kept as latest only"
                );
            }
        }
    }

    /// The value a new subscriber would receive on registration.
    pub fn latest(&self) -> Arc<S> {
        Arc::clone(&self.slot.lock().latest)
    }

    pub fn is_registered(&self) -> bool {
        self.reap_abandoned();
        self.slot.lock().active.is_some()
    }

    fn reap_abandoned(&self) {
        let id = {
            let slot = self.slot.lock();
            match &slot.active {
                Some(registration) if registration.is_abandoned() => registration.id,
                _ => return,
            }
        };
        Abandon {
            slot: Arc::clone(&self.slot),
            id,
            vacated: self.vacated.clone(),
        }
        .run();
    }
}

impl<S> Drop for SubscriptionChannel<S> {
    fn drop(&mut self) {
        let taken = self.slot.lock().active.take();
        if let Some(registration) = taken {
            registration.close();
        }
    }
}

fn take_registration<S>(slot: &Mutex<Slot<S>>, id: RegistrationId) -> Option<Registration<S>> {
    let mut slot = slot.lock();
    let held = matches!(&slot.active, Some(registration) if registration.id == id);
    if held {
        slot.active.take()
    } else {
        None
    }
}

/// Frees the slot held by a subscriber that was dropped while registered.
struct Abandon<S> {
    slot: Arc<Mutex<Slot<S>>>,
    id: RegistrationId,
    vacated: Option<VacatedHook>,
}

impl<S> Abandon<S> {
    fn run(self) {
        let Some(registration) = take_registration(&self.slot, self.id) else {
            return;
        };
        tracing::warn!(
            registration = self.id.0,
            "Subscriber dropped while still registered; slot freed"
        );
        registration.close();
        if let Some(vacated) = &self.vacated {
            vacated();
        }
    }
}

async fn deliver<S>(
    mut pending: mpsc::UnboundedReceiver<Arc<S>>,
    subscriber: Weak<dyn Subscriber<S>>,
    gate: RenderGate,
    abandon: Abandon<S>,
) where
    S: Send + Sync + 'static,
{
    while let Some(state) = pending.recv().await {
        {
            let open = gate.lock();
            if !open.get() {
                return;
            }
            if let Some(subscriber) = subscriber.upgrade() {
                subscriber.render_state(state);
                continue;
            }
        }
        abandon.run();
        return;
    }
}
