//! Shared test utilities: recording subscriber and a counter feature.

#![allow(dead_code, unused_imports)]

pub mod counter;

use mvi_store::Subscriber;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Receiving end of a recording subscriber.
pub struct Rendered<S> {
    rx: mpsc::UnboundedReceiver<Arc<S>>,
}

impl<S> Rendered<S> {
    /// Next delivered state; fails the test after 5 seconds.
    pub async fn next(&mut self) -> Arc<S> {
        tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("Timed out waiting for a rendered state")
            .expect("Subscriber dropped")
    }

    /// Everything delivered so far.
    pub fn drain(&mut self) -> Vec<Arc<S>> {
        let mut states = Vec::new();
        while let Ok(state) = self.rx.try_recv() {
            states.push(state);
        }
        states
    }
}

/// Subscriber that forwards every rendered state to a channel.
pub fn recorder<S>() -> (Arc<impl Subscriber<S>>, Rendered<S>)
where
    S: Send + Sync + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let subscriber = Arc::new(move |state: Arc<S>| {
        let _ = tx.send(state);
    });
    (subscriber, Rendered { rx })
}

/// Let every ready task run. Needs a paused clock (`start_paused = true`).
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
