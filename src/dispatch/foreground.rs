//! Dedicated foreground thread running a single-threaded runtime.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;

use tokio::runtime::{Builder, Handle};
use tokio::sync::oneshot;

/// An OS thread that owns a current-thread runtime until dropped.
///
/// Tasks spawned on [`ForegroundThread::handle`] run one at a time, in the
/// order they become ready, which is what subscribers expect from a UI
/// thread.
pub struct ForegroundThread {
    handle: Handle,
    stop: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl ForegroundThread {
    pub fn spawn(name: &str) -> io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let handle = runtime.handle().clone();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let (ready_tx, ready_rx) = mpsc::channel();

        let thread = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let _ = ready_tx.send(());
                runtime.block_on(async {
                    let _ = stop_rx.await;
                });
                tracing::debug!("foreground runtime stopped");
            })?;

        // Park until the thread is live so early spawns are not lost to a
        // runtime nobody drives yet.
        ready_rx
            .recv()
            .map_err(|_| io::Error::other("foreground thread exited during startup"))?;

        Ok(Self {
            handle,
            stop: Some(stop_tx),
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }
}

impl Drop for ForegroundThread {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.thread().id() != std::thread::current().id() {
                let _ = thread.join();
            }
        }
    }
}
