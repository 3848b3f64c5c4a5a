//! Board capability set
//!
//! A board bundles the peripherals the framework sequences: the RTC, the
//! radio, the MCU system clock and battery sensing, plus the power
//! transitions around deep sleep.

use core::ops::{BitOr, BitOrAssign};

use crate::radio::Radio;
use crate::rtc::Rtc;
use crate::time::SystemClock;

/// Board operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    /// Peripheral or power-rail bring-up failed
    InitFailed,
    /// RTC not present or not responding
    RtcUnavailable,
    /// Radio not present or not responding
    RadioUnavailable,
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InitFailed => write!(f, "Board initialization failed"),
            Self::RtcUnavailable => write!(f, "RTC unavailable"),
            Self::RadioUnavailable => write!(f, "Radio unavailable"),
        }
    }
}

impl core::error::Error for BoardError {}

/// One or more reasons a board woke from deep sleep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WakeReason(u8);

impl WakeReason {
    /// Unknown / spurious wake
    pub const NONE: Self = Self(0);
    pub const RTC_ALARM: Self = Self(1 << 1);
    pub const USB: Self = Self(1 << 2);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if every reason in `other` is present
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for WakeReason {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for WakeReason {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Common abstraction for all compatible boards
pub trait Board {
    type Rtc: Rtc;
    type Radio: Radio;
    type Clock: SystemClock;

    /// Bring up enough of the board (power rails, buses) to reach the RTC
    fn init_pre_rtc(&mut self) -> Result<(), BoardError>;

    /// Bring up the remaining peripherals; wall-clock time is valid here
    fn init_post_rtc(&mut self) -> Result<(), BoardError>;

    /// Enter the deepest sleep the board allows until an RTC alarm or USB
    /// attach
    ///
    /// Implementations:
    ///  1. reduce power consumption as far as possible (excepting the RTC)
    ///  2. put the MCU into its deepest permissible sleep state
    ///  3. wait on RTC alarm / USB plug-in
    ///  4. restore power to peripherals
    ///
    /// Returns immediately if the alarm is already pending or USB is
    /// already attached. The MCU may lose all state while asleep, in which
    /// case this never returns and the board restarts from reset.
    fn deep_sleep(&mut self) -> WakeReason;

    /// RTC access
    fn rtc(&mut self) -> Result<&mut Self::Rtc, BoardError>;

    /// Radio access
    fn radio(&mut self) -> Result<&mut Self::Radio, BoardError>;

    /// MCU system clock
    fn clock(&mut self) -> &mut Self::Clock;

    /// Battery voltage in millivolts
    fn battery_voltage(&mut self) -> u16;

    /// Factory-programmed unique ID of the MCU (length varies by part)
    fn unique_id(&self) -> &[u8];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wake_reason_bits() {
        assert_eq!(WakeReason::NONE.bits(), 0);
        assert_eq!(WakeReason::RTC_ALARM.bits(), 0x02);
        assert_eq!(WakeReason::USB.bits(), 0x04);
    }

    #[test]
    fn test_wake_reason_combined() {
        let reason = WakeReason::RTC_ALARM | WakeReason::USB;
        assert!(reason.contains(WakeReason::USB));
        assert!(reason.contains(WakeReason::RTC_ALARM));
        assert!(!WakeReason::NONE.contains(WakeReason::USB));
        assert!(!WakeReason::from_bits(0x02).contains(WakeReason::USB));
    }
}
