//! Device health alert flags carried in every frame header

use core::ops::{BitOr, BitOrAssign};

/// Bit-flag set of device health conditions
///
/// Flags are independent: a node reports every condition that currently
/// holds, e.g. both `BATT_LOW` and `BATT_CRITICAL` once the battery drops
/// below the lower threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alerts(u16);

impl Alerts {
    pub const NONE: Self = Self(0);
    // Bit 0 is unused on the wire.
    pub const BATT_LOW: Self = Self(1 << 1);
    pub const BATT_CRITICAL: Self = Self(1 << 2);
    pub const RTC_FAILURE: Self = Self(1 << 3);

    /// Wrap raw header bits; unknown bits are preserved
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every flag in `other` is set in `self`
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for Alerts {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Alerts {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl From<u16> for Alerts {
    fn from(bits: u16) -> Self {
        Self::from_bits(bits)
    }
}

impl From<Alerts> for u16 {
    fn from(alerts: Alerts) -> Self {
        alerts.bits()
    }
}
