// Show-request types

use crate::config::duration;
use super::gravity::Gravity;

/// Truncate a host number toward zero
///
/// The host runtime only has doubles. No rounding and no validation: NaN
/// becomes 0 and out-of-range values saturate at the i32 bounds.
#[inline]
pub fn truncate(value: f64) -> i32 {
    value as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationCategory {
    Short,
    Long,
}

/// Display duration in widget ticks
///
/// Values outside the exported presets pass through untouched; the widget
/// decides what they mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastDuration(i32);

impl ToastDuration {
    pub const SHORT: Self = Self(duration::LENGTH_SHORT);
    pub const LONG: Self = Self(duration::LENGTH_LONG);

    #[inline]
    pub fn from_raw(ticks: i32) -> Self {
        Self(ticks)
    }

    #[inline]
    pub fn from_host(value: f64) -> Self {
        Self(truncate(value))
    }

    #[inline]
    pub fn ticks(self) -> i32 {
        self.0
    }

    /// The preset this value names, if any
    pub fn category(self) -> Option<DurationCategory> {
        match self {
            Self::SHORT => Some(DurationCategory::Short),
            Self::LONG => Some(DurationCategory::Long),
            _ => None,
        }
    }
}

impl From<DurationCategory> for ToastDuration {
    fn from(category: DurationCategory) -> Self {
        match category {
            DurationCategory::Short => Self::SHORT,
            DurationCategory::Long => Self::LONG,
        }
    }
}

/// One toast to display. Built on the caller thread, consumed on the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowRequest {
    message: String,
    duration: ToastDuration,
    gravity: Option<Gravity>,
    x_offset: i32,
    y_offset: i32,
}

impl ShowRequest {
    /// Plain toast; placement is left to the widget
    pub fn new(message: impl Into<String>, duration: ToastDuration) -> Self {
        Self {
            message: message.into(),
            duration,
            gravity: None,
            x_offset: 0,
            y_offset: 0,
        }
    }

    /// Anchor the toast; offsets stay at zero unless set with [`Self::with_offset`]
    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn with_offset(mut self, x_offset: i32, y_offset: i32) -> Self {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn duration(&self) -> ToastDuration {
        self.duration
    }

    /// `None` for the plain show path
    pub fn gravity(&self) -> Option<Gravity> {
        self.gravity
    }

    pub fn offset(&self) -> (i32, i32) {
        (self.x_offset, self.y_offset)
    }
}
