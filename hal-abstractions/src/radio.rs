//! Packet radio capability (e.g. a LoRa transceiver)

/// Radio operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError {
    /// A transmission or reception is already in progress
    Busy,
    /// No frame sent or received within the timeout
    Timeout,
    /// Transceiver reported a fault
    HardwareError,
    /// Received frame does not fit the supplied buffer
    BufferTooSmall,
}

impl core::fmt::Display for RadioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Busy => write!(f, "Radio busy"),
            Self::Timeout => write!(f, "Radio timeout"),
            Self::HardwareError => write!(f, "Radio hardware error"),
            Self::BufferTooSmall => write!(f, "Radio buffer too small"),
        }
    }
}

impl core::error::Error for RadioError {}

impl embedded_io::Error for RadioError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Self::Timeout => embedded_io::ErrorKind::TimedOut,
            Self::BufferTooSmall => embedded_io::ErrorKind::OutOfMemory,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

/// Synchronous, timeout-bounded frame radio
///
/// One call sends or receives exactly one frame; there is no queueing.
pub trait Radio {
    /// Transmit `frame`, blocking for at most `timeout_ms`
    fn tx(&mut self, frame: &[u8], timeout_ms: u32) -> Result<(), RadioError>;

    /// Receive one frame into `buf`, blocking for at most `timeout_ms`
    ///
    /// Returns the number of bytes received.
    fn rx(&mut self, timeout_ms: u32, buf: &mut [u8]) -> Result<usize, RadioError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{Error, ErrorKind};

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(RadioError::Timeout.kind(), ErrorKind::TimedOut);
        assert_eq!(RadioError::BufferTooSmall.kind(), ErrorKind::OutOfMemory);
        assert_eq!(RadioError::Busy.kind(), ErrorKind::Other);
    }
}
