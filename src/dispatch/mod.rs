//! Named execution contexts for stores.
//!
//! Stores never reach for a global runtime. Every store is built with a
//! [`DispatcherProvider`] so tests can collapse all contexts onto one
//! current-thread runtime while production keeps background work off the
//! foreground thread.

mod foreground;

pub use foreground::ForegroundThread;

use std::io;
use std::sync::Arc;

use tokio::runtime::Handle;

/// Source of the execution contexts a store spawns onto.
pub trait DispatcherProvider: Send + Sync + 'static {
    /// CPU-bound background work (reducer callers, effect tasks).
    fn background(&self) -> Handle;

    /// Blocking-prone or I/O-bound work launched by features.
    fn io(&self) -> Handle;

    /// Foreground context where subscribers receive state.
    fn main(&self) -> Handle;

    /// Whatever context the caller is already running on.
    fn unconfined(&self) -> Handle;
}

/// Production provider.
///
/// Background and io share a multi-thread runtime; `main` is a dedicated
/// [`ForegroundThread`] so deliveries are serialized on one OS thread.
pub struct RuntimeDispatchers {
    background: Handle,
    foreground: ForegroundThread,
}

impl RuntimeDispatchers {
    /// Build from the runtime the caller is running on.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn from_current() -> io::Result<Self> {
        Self::new(Handle::current())
    }

    pub fn new(background: Handle) -> io::Result<Self> {
        Ok(Self {
            background,
            foreground: ForegroundThread::spawn("mvi-main")?,
        })
    }

    pub fn into_shared(self) -> Arc<dyn DispatcherProvider> {
        Arc::new(self)
    }
}

impl DispatcherProvider for RuntimeDispatchers {
    fn background(&self) -> Handle {
        self.background.clone()
    }

    fn io(&self) -> Handle {
        self.background.clone()
    }

    fn main(&self) -> Handle {
        self.foreground.handle()
    }

    fn unconfined(&self) -> Handle {
        Handle::try_current().unwrap_or_else(|_| self.background.clone())
    }
}

/// Every context is the same runtime handle.
///
/// Pair with `#[tokio::test]` (current-thread flavor) to get a fully
/// deterministic, single-threaded store.
#[derive(Clone)]
pub struct CurrentThreadDispatchers {
    handle: Handle,
}

impl CurrentThreadDispatchers {
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self {
            handle: Handle::current(),
        }
    }

    pub fn shared() -> Arc<dyn DispatcherProvider> {
        Arc::new(Self::current())
    }
}

impl DispatcherProvider for CurrentThreadDispatchers {
    fn background(&self) -> Handle {
        self.handle.clone()
    }

    fn io(&self) -> Handle {
        self.handle.clone()
    }

    fn main(&self) -> Handle {
        self.handle.clone()
    }

    fn unconfined(&self) -> Handle {
        self.handle.clone()
    }
}
