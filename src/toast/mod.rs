/// Toast command surface
///
/// Typed show-requests, the exported constant table, and the façade that
/// turns host calls into UI-thread work for a [`ToastWidget`].

pub mod constants;
pub mod gravity;
pub mod host;
pub mod module;
pub mod request;

pub use constants::{exported_constants, ConstantTable};
pub use gravity::Gravity;
pub use host::{HostReply, HostValue, InvokeError};
pub use module::{ToastModule, ToastWidget};
pub use request::{truncate, DurationCategory, ShowRequest, ToastDuration};
