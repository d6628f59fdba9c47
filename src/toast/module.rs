// Toast command façade
// Truncates host numbers, builds a ShowRequest, posts the display to the UI thread

use std::sync::Arc;
use std::thread::ThreadId;

use tracing::debug;

use crate::config;
use crate::dispatch::UiHandle;
use super::constants::{exported_constants, ConstantTable};
use super::gravity::Gravity;
use super::host::{expect_arity, number_arg, text_arg, HostReply, HostValue, InvokeError};
use super::request::{truncate, ShowRequest, ToastDuration};

/// The platform's transient notification widget
///
/// `display` is only ever called on the UI thread. Whatever it does with odd
/// durations, masks, offsets or empty messages is its own business.
pub trait ToastWidget: Send + Sync + 'static {
    fn display(&self, request: &ShowRequest);
}

/// Fire-and-forget toast commands for a host runtime
///
/// Every `show*` call returns immediately; the display happens on the UI
/// thread behind `ui`. Cheap to clone and safe to share across threads.
pub struct ToastModule<W> {
    ui: UiHandle,
    widget: Arc<W>,
}

impl<W> Clone for ToastModule<W> {
    fn clone(&self) -> Self {
        Self {
            ui: self.ui.clone(),
            widget: Arc::clone(&self.widget),
        }
    }
}

impl<W: ToastWidget> ToastModule<W> {
    pub const NAME: &'static str = config::MODULE_NAME;

    pub fn new(ui: UiHandle, widget: W) -> Self {
        Self {
            ui,
            widget: Arc::new(widget),
        }
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn exported_constants(&self) -> &'static ConstantTable {
        exported_constants()
    }

    pub fn show(&self, message: impl Into<String>, duration: f64) {
        self.dispatch(ShowRequest::new(message, ToastDuration::from_host(duration)));
    }

    pub fn show_with_gravity(&self, message: impl Into<String>, duration: f64, gravity: f64) {
        self.dispatch(
            ShowRequest::new(message, ToastDuration::from_host(duration))
                .with_gravity(Gravity::from_host(gravity)),
        );
    }

    pub fn show_with_gravity_and_offset(
        &self,
        message: impl Into<String>,
        duration: f64,
        gravity: f64,
        x_offset: f64,
        y_offset: f64,
    ) {
        self.dispatch(
            ShowRequest::new(message, ToastDuration::from_host(duration))
                .with_gravity(Gravity::from_host(gravity))
                .with_offset(truncate(x_offset), truncate(y_offset)),
        );
    }

    /// Post an already-typed request
    pub fn dispatch(&self, request: ShowRequest) {
        debug!(
            text = request.message(),
            duration = request.duration().ticks(),
            "toast requested"
        );

        let widget = Arc::clone(&self.widget);
        self.ui.post(move || {
            widget.display(&request);
            debug!(text = request.message(), "toast displayed on UI thread");
        });
    }

    /// Route a command the host issued by name
    pub fn invoke(&self, method: &str, args: &[HostValue]) -> Result<HostReply, InvokeError> {
        match method {
            "show" => {
                expect_arity("show", args, 2)?;
                self.show(text_arg("show", args, 0)?, number_arg("show", args, 1)?);
            }
            "showWithGravity" => {
                const M: &str = "showWithGravity";
                expect_arity(M, args, 3)?;
                self.show_with_gravity(
                    text_arg(M, args, 0)?,
                    number_arg(M, args, 1)?,
                    number_arg(M, args, 2)?,
                );
            }
            "showWithGravityAndOffset" => {
                const M: &str = "showWithGravityAndOffset";
                expect_arity(M, args, 5)?;
                self.show_with_gravity_and_offset(
                    text_arg(M, args, 0)?,
                    number_arg(M, args, 1)?,
                    number_arg(M, args, 2)?,
                    number_arg(M, args, 3)?,
                    number_arg(M, args, 4)?,
                );
            }
            "getConstants" => return self.constants_reply("getConstants", args),
            "getExportedConstants" => return self.constants_reply("getExportedConstants", args),
            other => return Err(InvokeError::UnknownMethod(other.to_string())),
        }

        Ok(HostReply::Unit)
    }

    fn constants_reply(&self, method: &'static str, args: &[HostValue]) -> Result<HostReply, InvokeError> {
        expect_arity(method, args, 0)?;
        Ok(HostReply::Constants(self.exported_constants()))
    }
}

impl<W> ToastModule<W> {
    /// Whether both values are clones of the same module
    pub fn same_module(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.widget, &other.widget)
    }

    pub fn ui_thread(&self) -> ThreadId {
        self.ui.ui_thread()
    }
}
