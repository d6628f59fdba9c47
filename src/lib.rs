use godot::prelude::*;

macro_rules! debug_log {
    ($($arg:tt)*) => {
        if cfg!(feature = "debug_logs") {
            godot_print!($($arg)*);
        }
    };
}

pub mod config;  // Centralized configuration constants
pub mod dispatch;  // UI-thread dispatcher (run loop + cross-thread handle)
mod logging;  // tracing subscriber that prints through Godot
pub mod toast;  // Toast command façade, request types, constant table
pub mod ui;  // Godot nodes

struct ToastExtension;

#[gdextension]
unsafe impl ExtensionLibrary for ToastExtension {
    fn on_level_init(level: InitLevel) {
        if level == InitLevel::Scene {
            logging::init();
            debug_log!("toast_bridge v0.1.0 - GDExtension loaded successfully!");
        }
    }

    fn on_level_deinit(level: InitLevel) {
        if level == InitLevel::Scene {
            // Later show calls from Rust threads become no-ops
            ui::toast::uninstall();
            debug_log!("toast_bridge unloaded");
        }
    }
}
