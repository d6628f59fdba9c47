// UI-thread dispatcher
// Work posted from any thread runs on the thread that owns the UiLoop

pub mod ui_thread;

#[cfg(test)]
pub(crate) mod testing;

pub use ui_thread::{DispatchError, Dispatched, UiHandle, UiLoop};
