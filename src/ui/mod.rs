/// UI-related Rust modules
///
/// This module contains the UI bridging code between Rust and Godot:
/// the toast command surface and the node that pumps the UI loop.

pub mod toast;
