//! Error types for the node lifecycle

use core::fmt;

use hal_abstractions::{BoardError, RadioError, RtcError};
use node_protocol::PacketError;

use crate::framework::LifecycleState;

/// Failure reported by an application callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppError {
    /// A sensor could not be read
    Sensor,
    /// Transmitting a message failed
    Send(SendError),
    /// An RTC operation failed
    Rtc(RtcError),
    /// Application-specific failure
    Failed(&'static str),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor => write!(f, "sensor read failed"),
            Self::Send(e) => write!(f, "send failed: {}", e),
            Self::Rtc(e) => write!(f, "RTC failed: {}", e),
            Self::Failed(reason) => write!(f, "{}", reason),
        }
    }
}

impl core::error::Error for AppError {}

impl From<SendError> for AppError {
    fn from(e: SendError) -> Self {
        Self::Send(e)
    }
}

impl From<RtcError> for AppError {
    fn from(e: RtcError) -> Self {
        Self::Rtc(e)
    }
}

/// Transmit errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError {
    /// Radio capability not available from the board
    Board(BoardError),
    /// Radio rejected or timed out the frame
    Radio(RadioError),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Board(e) => write!(f, "{}", e),
            Self::Radio(e) => write!(f, "radio: {}", e),
        }
    }
}

impl core::error::Error for SendError {}

impl From<BoardError> for SendError {
    fn from(e: BoardError) -> Self {
        Self::Board(e)
    }
}

impl From<RadioError> for SendError {
    fn from(e: RadioError) -> Self {
        Self::Radio(e)
    }
}

/// Receive errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiveError {
    Board(BoardError),
    Radio(RadioError),
    /// Radio reported a length the packet cannot hold
    Packet(PacketError),
    /// Frame shorter than its own header
    ShortFrame { len: usize },
    /// Checksum mismatch; carries the CRC found in the header
    BadChecksum { stored: u16 },
}

impl fmt::Display for ReceiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Board(e) => write!(f, "{}", e),
            Self::Radio(e) => write!(f, "radio: {}", e),
            Self::Packet(e) => write!(f, "packet: {}", e),
            Self::ShortFrame { len } => write!(f, "short frame ({} bytes)", len),
            Self::BadChecksum { stored } => write!(f, "bad checksum (stored {:#06x})", stored),
        }
    }
}

impl core::error::Error for ReceiveError {}

impl From<BoardError> for ReceiveError {
    fn from(e: BoardError) -> Self {
        Self::Board(e)
    }
}

impl From<RadioError> for ReceiveError {
    fn from(e: RadioError) -> Self {
        Self::Radio(e)
    }
}

impl From<PacketError> for ReceiveError {
    fn from(e: PacketError) -> Self {
        Self::Packet(e)
    }
}

/// Unrecoverable lifecycle failure
///
/// Each variant corresponds to the lifecycle state it was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameworkError {
    PreRtcInit(BoardError),
    RtcUnavailable(BoardError),
    TimeSync(RtcError),
    PostRtcInit(BoardError),
    AppInit(AppError),
    AlarmStatus(RtcError),
}

impl FrameworkError {
    /// Lifecycle state the error was raised from
    pub fn state(&self) -> LifecycleState {
        match self {
            Self::PreRtcInit(_) => LifecycleState::PreRtcInit,
            Self::RtcUnavailable(_) => LifecycleState::AcquireRtc,
            Self::TimeSync(_) => LifecycleState::SyncTime,
            Self::PostRtcInit(_) => LifecycleState::PostRtcInit,
            Self::AppInit(_) => LifecycleState::AppInit,
            Self::AlarmStatus(_) => LifecycleState::CheckAlarm,
        }
    }
}

impl fmt::Display for FrameworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreRtcInit(e) => write!(f, "pre-RTC init failed: {}", e),
            Self::RtcUnavailable(e) => write!(f, "RTC unavailable: {}", e),
            Self::TimeSync(e) => write!(f, "time sync failed: {}", e),
            Self::PostRtcInit(e) => write!(f, "post-RTC init failed: {}", e),
            Self::AppInit(e) => write!(f, "app init failed: {}", e),
            Self::AlarmStatus(e) => write!(f, "alarm status query failed: {}", e),
        }
    }
}

impl core::error::Error for FrameworkError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversions() {
        let send: SendError = RadioError::Timeout.into();
        assert_eq!(AppError::from(send), AppError::Send(SendError::Radio(RadioError::Timeout)));
        assert_eq!(
            AppError::from(RtcError::HardwareError),
            AppError::Rtc(RtcError::HardwareError)
        );
        assert_eq!(
            SendError::from(BoardError::RadioUnavailable),
            SendError::Board(BoardError::RadioUnavailable)
        );
    }

    #[test]
    fn test_framework_error_state() {
        assert_eq!(
            FrameworkError::PreRtcInit(BoardError::InitFailed).state(),
            LifecycleState::PreRtcInit
        );
        assert_eq!(
            FrameworkError::RtcUnavailable(BoardError::RtcUnavailable).state(),
            LifecycleState::AcquireRtc
        );
        assert_eq!(
            FrameworkError::AlarmStatus(RtcError::HardwareError).state(),
            LifecycleState::CheckAlarm
        );
    }

    #[test]
    fn test_display_nests_cause() {
        let err = FrameworkError::AppInit(AppError::Failed("no sensor"));
        assert_eq!(err.to_string(), "app init failed: no sensor");

        let err = ReceiveError::BadChecksum { stored: 0x1234 };
        assert_eq!(err.to_string(), "bad checksum (stored 0x1234)");
    }
}
