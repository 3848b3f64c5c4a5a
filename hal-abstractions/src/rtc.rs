//! Real-time clock capability
//!
//! The RTC may be part of the MCU or a separate IC. Every supported board
//! has one that can at least get and set the time and run one periodic
//! alarm; the alarm is what wakes the node from deep sleep.

use fugit::MicrosDurationU64;

use crate::time::Timestamp;

/// RTC operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcError {
    /// RTC not initialized
    NotInitialized,
    /// RTC hardware error
    HardwareError,
    /// Requested alarm field or value not supported by this RTC
    Unsupported,
}

impl core::fmt::Display for RtcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "RTC not initialized"),
            Self::HardwareError => write!(f, "RTC hardware error"),
            Self::Unsupported => write!(f, "RTC operation not supported"),
        }
    }
}

impl core::error::Error for RtcError {}

/// Calendar field a periodic alarm matches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcField {
    Seconds,
    Minutes,
    Hours,
    Weekday,
    Day,
}

/// Access to the board RTC
pub trait Rtc {
    /// Current time according to the RTC
    ///
    /// Resolution may be as coarse as one second, see [`Rtc::accuracy`].
    fn now(&mut self) -> Result<Timestamp, RtcError>;

    /// Accuracy of the RTC (e.g. 1 s)
    fn accuracy(&self) -> MicrosDurationU64;

    /// Adjust the RTC time
    fn set_time(&mut self, time: Timestamp) -> Result<(), RtcError>;

    /// Install an alarm that fires every time `field` equals `value`
    ///
    /// `(2, RtcField::Seconds)` fires once per minute, two seconds past.
    fn set_periodic_alarm(&mut self, value: u8, field: RtcField) -> Result<(), RtcError>;

    /// True if an alarm is currently configured
    fn is_alarm_enabled(&mut self) -> Result<bool, RtcError>;

    /// True if the alarm has fired and not been acknowledged
    fn is_alarm_triggered(&mut self) -> Result<bool, RtcError>;

    /// Clear the alarm interrupt status
    fn acknowledge_alarm(&mut self) -> Result<(), RtcError>;

    /// True if the RTC is in a healthy running state
    fn is_healthy(&mut self) -> bool;

    /// Emit diagnostic register state to the board's debug output
    fn dump(&mut self) {}
}
