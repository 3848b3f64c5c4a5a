//! Packet codec error types

/// Packet codec errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// A write would run past the end of the packet buffer
    Overflow,
    /// Requested length exceeds the packet buffer
    LengthOutOfRange,
    /// A read would run past the logical length
    Truncated,
}

impl core::fmt::Display for PacketError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Overflow => write!(f, "Packet buffer overflow"),
            Self::LengthOutOfRange => write!(f, "Packet length out of range"),
            Self::Truncated => write!(f, "Packet truncated"),
        }
    }
}

impl core::error::Error for PacketError {}
