// UI run loop and the handle used to post work onto it
// Posting never blocks: UI thread runs inline, other threads enqueue and return

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use crossbeam_channel::{unbounded, Receiver, Sender};
use thiserror::Error;
use tracing::{debug, error};

/// A unit of work for the UI thread
pub type Job = Box<dyn FnOnce() + Send + 'static>;

enum UiMessage {
    Run(Job),
    Quit,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    #[error("UI thread is no longer accepting work")]
    Disconnected,
}

/// How a posted job was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Ran synchronously because the caller is the UI thread
    Inline,
    /// Enqueued for the UI thread's next pump
    Queued,
}

/// Run loop owned by the UI thread
///
/// Created on the thread that will execute posted work. The host either calls
/// [`UiLoop::pump`] once per frame or hands the thread over to [`UiLoop::run`].
/// Dropping the loop turns every outstanding [`UiHandle`] into a no-op.
pub struct UiLoop {
    rx: Receiver<UiMessage>,
    handle: UiHandle,
}

impl UiLoop {
    /// Create a loop bound to the current thread
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        let handle = UiHandle {
            tx,
            ui_thread: thread::current().id(),
            alive: Arc::new(AtomicBool::new(true)),
        };

        Self { rx, handle }
    }

    pub fn handle(&self) -> UiHandle {
        self.handle.clone()
    }

    /// Run everything queued so far without blocking. Returns the number of jobs run.
    pub fn pump(&self) -> usize {
        debug_assert!(self.handle.is_ui_thread(), "UiLoop pumped off its own thread");

        let mut ran = 0;
        while let Ok(message) = self.rx.try_recv() {
            // Quit only matters to run()
            if let UiMessage::Run(job) = message {
                run_guarded(job);
                ran += 1;
            }
        }
        ran
    }

    /// Block and run posted work until [`UiHandle::quit`] is received
    pub fn run(&self) {
        debug_assert!(self.handle.is_ui_thread(), "UiLoop run off its own thread");

        // recv() cannot disconnect: self.handle keeps a sender alive
        while let Ok(message) = self.rx.recv() {
            match message {
                UiMessage::Run(job) => run_guarded(job),
                UiMessage::Quit => break,
            }
        }
    }
}

impl Default for UiLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for UiLoop {
    fn drop(&mut self) {
        self.handle.alive.store(false, Ordering::Release);

        let dropped = self.rx.try_iter().filter(|m| matches!(m, UiMessage::Run(_))).count();
        if dropped > 0 {
            debug!(dropped, "UI loop shut down with pending work");
        }
    }
}

/// Cloneable, thread-safe handle for posting work to a [`UiLoop`]
#[derive(Clone)]
pub struct UiHandle {
    tx: Sender<UiMessage>,
    ui_thread: ThreadId,
    alive: Arc<AtomicBool>,
}

impl UiHandle {
    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    pub fn ui_thread(&self) -> ThreadId {
        self.ui_thread
    }

    /// Whether the owning loop still exists
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Post work, reporting whether it ran inline, was queued, or had nowhere to go
    pub fn try_post<F>(&self, work: F) -> Result<Dispatched, DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.is_alive() {
            return Err(DispatchError::Disconnected);
        }

        if self.is_ui_thread() {
            run_guarded(Box::new(work));
            return Ok(Dispatched::Inline);
        }

        self.tx
            .send(UiMessage::Run(Box::new(work)))
            .map(|_| Dispatched::Queued)
            .map_err(|_| DispatchError::Disconnected)
    }

    /// Fire-and-forget post. Without a UI thread the work is silently dropped.
    pub fn post<F>(&self, work: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(err) = self.try_post(work) {
            debug!(%err, "dropping UI work");
        }
    }

    /// Ask a loop blocked in [`UiLoop::run`] to return
    pub fn quit(&self) {
        let _ = self.tx.send(UiMessage::Quit);
    }
}

impl std::fmt::Debug for UiHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiHandle")
            .field("ui_thread", &self.ui_thread)
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// A failing job must never take the loop (or an inline caller) down with it
fn run_guarded(job: Job) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
        error!(reason = panic_reason(payload.as_ref()), "UI work panicked; dropped");
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testing::{spawn_ui_thread, WAIT};
    use crossbeam_channel::bounded;
    use parking_lot::Mutex;

    #[test]
    fn test_queued_work_runs_on_ui_thread() {
        let ui = spawn_ui_thread();
        let (tx, rx) = bounded(1);

        let outcome = ui.handle.try_post(move || {
            let _ = tx.send(thread::current().id());
        });

        assert_eq!(outcome, Ok(Dispatched::Queued));
        let ran_on = rx.recv_timeout(WAIT).expect("work never ran");
        assert_eq!(ran_on, ui.thread_id);
        assert_ne!(ran_on, thread::current().id());
    }

    #[test]
    fn test_caller_does_not_wait_for_work() {
        let ui = spawn_ui_thread();
        let (gate_tx, gate_rx) = bounded::<()>(0);
        let (done_tx, done_rx) = bounded(1);

        ui.handle.post(move || {
            let _ = gate_rx.recv();
            let _ = done_tx.send(());
        });

        // post() returned while the job is still parked on the gate
        assert!(done_rx.try_recv().is_err());
        gate_tx.send(()).unwrap();
        done_rx.recv_timeout(WAIT).expect("work never finished");
    }

    #[test]
    fn test_inline_on_ui_thread() {
        let ui_loop = UiLoop::new();
        let handle = ui_loop.handle();
        let hit = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&hit);
        let outcome = handle.try_post(move || flag.store(true, Ordering::SeqCst));

        assert_eq!(outcome, Ok(Dispatched::Inline));
        assert!(hit.load(Ordering::SeqCst));
        assert_eq!(ui_loop.pump(), 0);
    }

    #[test]
    fn test_fifo_per_caller() {
        let ui = spawn_ui_thread();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..100 {
            let seen = Arc::clone(&seen);
            ui.handle.post(move || seen.lock().push(i));
        }
        let (tx, rx) = bounded(1);
        ui.handle.post(move || {
            let _ = tx.send(());
        });
        rx.recv_timeout(WAIT).unwrap();

        assert_eq!(*seen.lock(), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_panicking_work_does_not_stop_loop() {
        let ui = spawn_ui_thread();
        let (tx, rx) = bounded(1);

        ui.handle.post(|| panic!("widget blew up"));
        ui.handle.post(move || {
            let _ = tx.send(thread::current().id());
        });

        assert_eq!(rx.recv_timeout(WAIT).unwrap(), ui.thread_id);
    }

    #[test]
    fn test_inline_panic_does_not_reach_caller() {
        let ui_loop = UiLoop::new();
        let handle = ui_loop.handle();

        let outcome = handle.try_post(|| panic!("inline failure"));

        assert_eq!(outcome, Ok(Dispatched::Inline));
    }

    #[test]
    fn test_post_after_loop_dropped_is_noop() {
        let (handle_tx, handle_rx) = bounded(1);
        thread::spawn(move || {
            let ui_loop = UiLoop::new();
            let _ = handle_tx.send(ui_loop.handle());
        })
        .join()
        .unwrap();
        let handle: UiHandle = handle_rx.recv().unwrap();
        let hit = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&hit);
        assert!(!handle.is_alive());
        assert_eq!(
            handle.try_post(move || flag.store(true, Ordering::SeqCst)),
            Err(DispatchError::Disconnected)
        );
        handle.post(|| unreachable!());
        assert!(!hit.load(Ordering::SeqCst));
    }

    #[test]
    fn test_pump_drains_queued_work() {
        let ui_loop = UiLoop::new();
        let handle = ui_loop.handle();
        let count = Arc::new(Mutex::new(0));

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let handle = handle.clone();
                let count = Arc::clone(&count);
                thread::spawn(move || handle.post(move || *count.lock() += 1))
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(*count.lock(), 0);
        assert_eq!(ui_loop.pump(), 4);
        assert_eq!(*count.lock(), 4);
    }

    #[test]
    fn test_quit_stops_run() {
        let ui = spawn_ui_thread();
        ui.handle.quit();
        ui.join.join().expect("ui thread panicked");
    }
}
