// Test helpers: a dedicated thread playing the UI thread

use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;

use crossbeam_channel::bounded;

use super::{UiHandle, UiLoop};

pub(crate) const WAIT: Duration = Duration::from_secs(5);

pub(crate) struct TestUiThread {
    pub handle: UiHandle,
    pub thread_id: ThreadId,
    pub join: JoinHandle<()>,
}

/// Spawn a thread that owns a UiLoop and blocks in run() until quit
pub(crate) fn spawn_ui_thread() -> TestUiThread {
    let (handle_tx, handle_rx) = bounded(1);

    let join = thread::Builder::new()
        .name("test-ui".to_string())
        .spawn(move || {
            let ui_loop = UiLoop::new();
            handle_tx.send(ui_loop.handle()).unwrap();
            ui_loop.run();
        })
        .expect("Failed to spawn test-ui thread");

    let handle = handle_rx.recv_timeout(WAIT).expect("UI thread never started");
    let thread_id = join.thread().id();

    TestUiThread { handle, thread_id, join }
}
