//! Cancellable repeating tick source.
//!
//! A tick carries no data: it only tells the owning thread that it is time
//! to recompute the display. Workers never touch clock state.

use crate::errors::AppResult;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub trait Scheduler {
    /// Start a repeating tick. The tick stops when the handle is dropped.
    fn start(&self, period: Duration) -> AppResult<TickHandle>;
}

/// Owner of one running tick. Dropping it cancels the tick deterministically.
pub struct TickHandle {
    ticks: Receiver<()>,
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
    live: Option<Arc<AtomicUsize>>,
}

impl TickHandle {
    /// Block until the next tick. `false` on timeout or when the source is gone.
    pub fn wait(&self, timeout: Duration) -> bool {
        self.ticks.recv_timeout(timeout).is_ok()
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        // disconnecting the stop channel wakes the worker immediately
        self.stop.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        if let Some(live) = &self.live {
            live.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// One background thread per handle, ticking every `period`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn start(&self, period: Duration) -> AppResult<TickHandle> {
        let (tick_tx, tick_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let worker = thread::Builder::new()
            .name("rworkclock-tick".into())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => {
                            if tick_tx.send(()).is_err() {
                                break;
                            }
                        }
                        // explicit stop or handle dropped
                        _ => break,
                    }
                }
            })?;

        Ok(TickHandle {
            ticks: tick_rx,
            stop: Some(stop_tx),
            worker: Some(worker),
            live: None,
        })
    }
}

/// Scheduler driven by hand. Clones share the same set of handles, so a test
/// can keep one copy and fire ticks into the clock that owns the other.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    senders: Arc<Mutex<Vec<Sender<()>>>>,
    live: Arc<AtomicUsize>,
    started: Arc<AtomicUsize>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one tick to every live handle. Returns how many received it.
    pub fn fire(&self) -> usize {
        let mut senders = self.senders.lock().unwrap_or_else(|e| e.into_inner());
        senders.retain(|tx| tx.send(()).is_ok());
        senders.len()
    }

    /// Handles currently alive.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Handles ever started.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

impl Scheduler for ManualScheduler {
    fn start(&self, _period: Duration) -> AppResult<TickHandle> {
        let (tick_tx, tick_rx) = mpsc::channel();
        self.senders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tick_tx);
        self.live.fetch_add(1, Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::SeqCst);

        Ok(TickHandle {
            ticks: tick_rx,
            stop: None,
            worker: None,
            live: Some(Arc::clone(&self.live)),
        })
    }
}
