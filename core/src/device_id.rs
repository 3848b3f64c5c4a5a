//! Link-layer device identifier
//!
//! MCU unique IDs vary in length between parts (96 bits on STM32, 64 or
//! 128 bits elsewhere). The radio header only has room for 16 bits, so the
//! ID is normalized by taking the low half of its CRC-32 (IEEE). The
//! result is stable across reboots for a given chip.

use crc::{Crc, CRC_32_ISO_HDLC};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// 16-bit device identifier carried in every frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId(u16);

impl DeviceId {
    /// Derive the identifier from the raw hardware unique ID
    pub fn from_uid(uid: &[u8]) -> Self {
        Self(CRC32.checksum(uid) as u16)
    }

    /// Use an already-derived identifier
    pub const fn from_raw(id: u16) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

impl From<DeviceId> for u16 {
    fn from(id: DeviceId) -> Self {
        id.get()
    }
}

impl core::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_check_value() {
        assert_eq!(CRC32.checksum(b"123456789"), 0xCBF4_3926);
        assert_eq!(DeviceId::from_uid(b"123456789").get(), 0x3926);
    }

    #[test]
    fn test_stable_for_same_uid() {
        let uid = [0x30, 0x00, 0x3A, 0x00, 0x0F, 0x51, 0x33, 0x34, 0x39, 0x35, 0x36, 0x30];
        assert_eq!(DeviceId::from_uid(&uid), DeviceId::from_uid(&uid));
    }

    #[test]
    fn test_display_is_zero_padded_hex() {
        assert_eq!(DeviceId::from_raw(0x00AB).to_string(), "00ab");
    }
}
