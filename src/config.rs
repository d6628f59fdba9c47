/// Centralized configuration constants for the toast bridge
///
/// IMPORTANT: The duration and gravity values MUST match what the GDScript
/// toast renderer understands. They are exported to scripts through
/// `ToastBridge.get_exported_constants()`, so scripts should never hardcode them.

/// Name the command surface is registered under
pub const MODULE_NAME: &str = "ToastAndroid";

/// Duration presets, in widget ticks
pub mod duration {
    pub const LENGTH_SHORT: i32 = 0;
    pub const LENGTH_LONG: i32 = 1;
}

/// Raw gravity bits, same layout as android.view.Gravity
pub mod gravity {
    pub const CENTER_HORIZONTAL: i32 = 0x01;
    pub const CENTER_VERTICAL: i32 = 0x10;
    pub const TOP: i32 = 0x30;     // 48
    pub const BOTTOM: i32 = 0x50;  // 80

    /// Sent to GDScript when a toast has no explicit gravity
    pub const UNSET: i32 = -1;
}

/// Keys of the exported constant table
pub mod keys {
    pub const DURATION_SHORT: &str = "SHORT";
    pub const DURATION_LONG: &str = "LONG";
    pub const GRAVITY_TOP: &str = "TOP";
    pub const GRAVITY_BOTTOM: &str = "BOTTOM";
    pub const GRAVITY_CENTER: &str = "CENTER";
}

/// Logging defaults (overridden by RUST_LOG)
pub mod logging {
    pub const DEFAULT_FILTER: &str = "toast_bridge=info";
    pub const DEBUG_FILTER: &str = "toast_bridge=debug";
}
