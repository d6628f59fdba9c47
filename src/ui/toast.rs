//! Toast command surface for GDScript and Rust threads -> Godot UI
//!
//! The bridge node owns the UI loop: it is created when the node enters the
//! tree (always on the main thread) and pumped every frame. Display calls are
//! handed back to the node and emitted as `toast_requested` for GDScript to render.
//!
//! Usage from Rust threads:
//! ```ignore
//! use crate::ui::toast;
//! toast::show("Operation completed!", 0.0);
//! ```

use godot::prelude::*;
use godot::builtin::VariantType;
use crossbeam_channel::{unbounded, Receiver, Sender};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::thread;
use std::time::Duration;

use crate::config;
use crate::dispatch::UiLoop;
use crate::toast::{
    exported_constants, Gravity, HostReply, HostValue, ShowRequest, ToastModule, ToastWidget,
};

/// Widget side of the bridge: runs on the main thread, queues the signal emission
///
/// `toast_requested` is emitted on the bridge's next `process()` tick, never
/// synchronously inside `show`, even when GDScript calls from the main thread.
pub struct SignalWidget {
    tx: Sender<ShowRequest>,
}

impl ToastWidget for SignalWidget {
    fn display(&self, request: &ShowRequest) {
        let _ = self.tx.send(request.clone());
    }
}

pub type GodotToastModule = ToastModule<SignalWidget>;

/// Façades of the bridges currently in the tree, newest last
///
/// Rust-thread calls go to the newest one. A bridge leaving the tree only
/// removes its own entry, so other live bridges keep receiving toasts.
pub struct ModuleRegistry<W> {
    modules: RwLock<Vec<ToastModule<W>>>,
}

impl<W: ToastWidget> ModuleRegistry<W> {
    pub fn new() -> Self {
        Self { modules: RwLock::new(Vec::new()) }
    }

    /// Returns how many bridges are installed afterwards
    pub fn install(&self, module: ToastModule<W>) -> usize {
        let mut modules = self.modules.write();
        modules.push(module);
        modules.len()
    }

    pub fn release(&self, module: &ToastModule<W>) {
        self.modules.write().retain(|installed| !installed.same_module(module));
    }

    pub fn clear(&self) {
        self.modules.write().clear();
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }

    /// Run `f` against the newest installed module, if any
    pub fn with_current<R>(&self, f: impl FnOnce(&ToastModule<W>) -> R) -> Option<R> {
        self.modules.read().last().map(f)
    }
}

impl<W: ToastWidget> Default for ModuleRegistry<W> {
    fn default() -> Self {
        Self::new()
    }
}

// Process-wide façade for Rust worker threads; empty while no bridge is in the tree
static MODULES: Lazy<ModuleRegistry<SignalWidget>> = Lazy::new(ModuleRegistry::new);

/// Show a toast from any Rust thread. No-op if no bridge is in the tree.
pub fn show(message: impl Into<String>, duration: f64) {
    MODULES.with_current(|module| module.show(message, duration));
}

pub fn show_with_gravity(message: impl Into<String>, duration: f64, gravity: f64) {
    MODULES.with_current(|module| module.show_with_gravity(message, duration, gravity));
}

pub fn show_with_gravity_and_offset(
    message: impl Into<String>,
    duration: f64,
    gravity: f64,
    x_offset: f64,
    y_offset: f64,
) {
    MODULES.with_current(|module| {
        module.show_with_gravity_and_offset(message, duration, gravity, x_offset, y_offset)
    });
}

/// Drop every process-wide façade (extension teardown)
pub fn uninstall() {
    MODULES.clear();
}

/// Main-thread state, alive between enter_tree and exit_tree
struct BridgeRuntime {
    ui_loop: UiLoop,
    module: GodotToastModule,
    display_rx: Receiver<ShowRequest>,
}

impl BridgeRuntime {
    fn new() -> Self {
        let ui_loop = UiLoop::new();
        let (tx, display_rx) = unbounded();
        let module = ToastModule::new(ui_loop.handle(), SignalWidget { tx });

        Self { ui_loop, module, display_rx }
    }
}

// GDScript bridge for toast notifications
#[derive(GodotClass)]
#[class(base=Node)]
pub struct ToastBridge {
    base: Base<Node>,
    runtime: Option<BridgeRuntime>,
}

#[godot_api]
impl INode for ToastBridge {
    fn init(base: Base<Node>) -> Self {
        debug_log!("ToastBridge initialized!");
        Self { base, runtime: None }
    }

    fn enter_tree(&mut self) {
        let runtime = BridgeRuntime::new();
        let installed = MODULES.install(runtime.module.clone());
        if installed > 1 {
            godot_warn!("{} ToastBridge nodes in the tree; Rust threads use the newest", installed);
        }
        debug_log!("ToastBridge entered tree, UI loop bound to {:?}", runtime.module.ui_thread());
        self.runtime = Some(runtime);
    }

    fn exit_tree(&mut self) {
        // Dropping the loop turns every outstanding handle into a no-op
        if let Some(runtime) = self.runtime.take() {
            MODULES.release(&runtime.module);
        }
        debug_log!("ToastBridge left tree, toasts disabled");
    }

    fn ready(&mut self) {
        // Enable processing so process() gets called every frame
        self.base_mut().set_process(true);
    }

    fn process(&mut self, _delta: f64) {
        let pending: Vec<ShowRequest> = match &self.runtime {
            Some(runtime) => {
                runtime.ui_loop.pump();
                runtime.display_rx.try_iter().collect()
            }
            None => return,
        };

        for request in pending {
            self.emit_toast(&request);
        }
    }
}

#[godot_api]
impl ToastBridge {
    /// Signal that GDScript renders. gravity is -1 when the toast has no explicit placement.
    #[signal]
    fn toast_requested(message: GString, duration: i32, gravity: i32, x_offset: i32, y_offset: i32);

    #[func]
    fn show(&self, message: GString, duration: f64) {
        if let Some(runtime) = &self.runtime {
            runtime.module.show(message.to_string(), duration);
        }
    }

    #[func]
    fn show_with_gravity(&self, message: GString, duration: f64, gravity: f64) {
        if let Some(runtime) = &self.runtime {
            runtime.module.show_with_gravity(message.to_string(), duration, gravity);
        }
    }

    #[func]
    fn show_with_gravity_and_offset(
        &self,
        message: GString,
        duration: f64,
        gravity: f64,
        x_offset: f64,
        y_offset: f64,
    ) {
        if let Some(runtime) = &self.runtime {
            runtime.module.show_with_gravity_and_offset(
                message.to_string(),
                duration,
                gravity,
                x_offset,
                y_offset,
            );
        }
    }

    /// SHORT, LONG, TOP, BOTTOM, CENTER -> int
    #[func]
    fn get_exported_constants(&self) -> Dictionary {
        constants_dictionary()
    }

    /// Route a command by its host name, e.g. `invoke("showWithGravity", ["hi", 0, 49])`
    /// Returns the constants Dictionary for getConstants, nil otherwise.
    #[func]
    fn invoke(&self, method: GString, args: VariantArray) -> Variant {
        let Some(runtime) = &self.runtime else {
            return Variant::nil();
        };

        let method = method.to_string();
        let args: Vec<HostValue> = args.iter_shared().map(|arg| host_value(&arg)).collect();

        match runtime.module.invoke(&method, &args) {
            Ok(HostReply::Unit) => Variant::nil(),
            Ok(HostReply::Constants(_)) => constants_dictionary().to_variant(),
            Err(err) => {
                godot_error!("{}: {}", config::MODULE_NAME, err);
                Variant::nil()
            }
        }
    }

    #[func]
    fn get_constants_json(&self) -> GString {
        match exported_constants().to_json() {
            Ok(json) => GString::from(json.as_str()),
            Err(err) => {
                godot_error!("Failed to serialize toast constants: {}", err);
                GString::new()
            }
        }
    }

    #[func]
    fn get_module_name(&self) -> GString {
        GString::from(config::MODULE_NAME)
    }

    /// Spawn a Rust thread that shows a toast after a delay (exercises the cross-thread path)
    #[func]
    fn spawn_test_thread(&mut self, message: GString, delay_ms: i64) {
        let message = message.to_string();
        let delay = Duration::from_millis(delay_ms.max(0) as u64);

        let spawned = thread::Builder::new()
            .name("toast_test".to_string())
            .spawn(move || {
                thread::sleep(delay);
                show(message, f64::from(config::duration::LENGTH_SHORT));
            });

        if let Err(err) = spawned {
            godot_error!("Failed to spawn toast_test thread: {}", err);
        }
    }
}

impl ToastBridge {
    fn emit_toast(&mut self, request: &ShowRequest) {
        let gravity = request.gravity().map_or(config::gravity::UNSET, Gravity::raw);
        let (x_offset, y_offset) = request.offset();

        self.base_mut().emit_signal(
            "toast_requested",
            &[
                GString::from(request.message()).to_variant(),
                request.duration().ticks().to_variant(),
                gravity.to_variant(),
                x_offset.to_variant(),
                y_offset.to_variant(),
            ],
        );
    }
}

fn constants_dictionary() -> Dictionary {
    let mut constants = Dictionary::new();
    for (key, value) in exported_constants().iter() {
        constants.set(GString::from(key), value);
    }
    constants
}

/// GDScript ints and floats are both numbers to the host convention
fn host_value(variant: &Variant) -> HostValue {
    match variant.get_type() {
        VariantType::FLOAT => variant.try_to::<f64>().map_or(HostValue::Other, HostValue::Number),
        VariantType::INT => variant
            .try_to::<i64>()
            .map_or(HostValue::Other, |value| HostValue::Number(value as f64)),
        VariantType::STRING | VariantType::STRING_NAME => variant
            .try_to::<GString>()
            .map_or(HostValue::Other, |text| HostValue::Text(text.to_string())),
        _ => HostValue::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testing::WAIT;

    fn show_from_worker(registry: &'static ModuleRegistry<SignalWidget>, message: &'static str) {
        thread::spawn(move || {
            registry.with_current(|module| module.show(message, 1.0));
        })
        .join()
        .unwrap();
    }

    fn leak_registry() -> &'static ModuleRegistry<SignalWidget> {
        Box::leak(Box::new(ModuleRegistry::new()))
    }

    #[test]
    fn test_worker_show_lands_on_pump() {
        let registry = leak_registry();
        let runtime = BridgeRuntime::new();
        registry.install(runtime.module.clone());

        show_from_worker(registry, "from worker");

        // Nothing reaches the node until the loop thread pumps
        assert!(runtime.display_rx.try_recv().is_err());
        assert_eq!(runtime.ui_loop.pump(), 1);
        let request = runtime.display_rx.recv_timeout(WAIT).unwrap();
        assert_eq!(request, ShowRequest::new("from worker", crate::toast::ToastDuration::LONG));
    }

    #[test]
    fn test_leaving_bridge_keeps_other_bridge_installed() {
        let registry = leak_registry();
        let first = BridgeRuntime::new();
        let second = BridgeRuntime::new();
        registry.install(first.module.clone());
        registry.install(second.module.clone());

        registry.release(&first.module);
        drop(first);
        show_from_worker(registry, "still here");

        assert_eq!(registry.len(), 1);
        assert_eq!(second.ui_loop.pump(), 1);
        assert_eq!(second.display_rx.try_recv().unwrap().message(), "still here");
    }

    #[test]
    fn test_newest_leaving_falls_back_to_older_bridge() {
        let registry = leak_registry();
        let first = BridgeRuntime::new();
        let second = BridgeRuntime::new();
        registry.install(first.module.clone());
        registry.install(second.module.clone());

        registry.release(&second.module);
        show_from_worker(registry, "fallback");

        assert_eq!(second.ui_loop.pump(), 0);
        assert_eq!(first.ui_loop.pump(), 1);
        assert_eq!(first.display_rx.try_recv().unwrap().message(), "fallback");

        registry.release(&first.module);
        assert!(registry.is_empty());
        assert_eq!(registry.with_current(|module| module.name()), None);
    }

    #[test]
    fn test_process_wide_show_until_uninstall() {
        let runtime = BridgeRuntime::new();
        MODULES.install(runtime.module.clone());

        thread::spawn(|| show_with_gravity("global", 0.0, 81.0)).join().unwrap();
        assert_eq!(runtime.ui_loop.pump(), 1);
        assert_eq!(
            runtime.display_rx.try_recv().unwrap().gravity(),
            Some(Gravity::BOTTOM_CENTER)
        );

        uninstall();
        thread::spawn(|| show("dropped", 0.0)).join().unwrap();
        assert_eq!(runtime.ui_loop.pump(), 0);
        assert!(runtime.display_rx.try_recv().is_err());
    }
}
