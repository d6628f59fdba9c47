use bitflags::bitflags;

use crate::config::gravity as raw;
use super::request::truncate;

bitflags! {
    /// Anchor alignment for a toast, as the widget's raw bitmask
    /// Using i32 to match the widget's int parameter. Unknown bits are kept.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Gravity: i32 {
        const CENTER_HORIZONTAL = raw::CENTER_HORIZONTAL;  // 1
        const CENTER_VERTICAL   = raw::CENTER_VERTICAL;    // 16
        const TOP               = raw::TOP;                // 48
        const BOTTOM            = raw::BOTTOM;             // 80

        // Exported presets
        const TOP_CENTER    = Self::TOP.bits() | Self::CENTER_HORIZONTAL.bits();                // 49
        const BOTTOM_CENTER = Self::BOTTOM.bits() | Self::CENTER_HORIZONTAL.bits();             // 81
        const CENTER        = Self::CENTER_HORIZONTAL.bits() | Self::CENTER_VERTICAL.bits();    // 17
    }
}

impl Gravity {
    /// Wrap any mask, including bits this crate has no name for
    #[inline]
    pub fn from_raw(mask: i32) -> Self {
        Self::from_bits_retain(mask)
    }

    /// Truncate a host number into a mask
    #[inline]
    pub fn from_host(value: f64) -> Self {
        Self::from_raw(truncate(value))
    }

    #[inline]
    pub fn raw(self) -> i32 {
        self.bits()
    }
}
