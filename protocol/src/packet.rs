//! Fixed-capacity packet buffer with a version-dependent header
//!
//! The header is a set of big-endian `u16` fields at fixed offsets. Its
//! length is derived from the Version field at call time (10 bytes for
//! version 1, 12 bytes from version 2 on, which adds the CRC field), so
//! changing the version moves where the payload begins.
//!
//! Payload is accessed through a single cursor that is never allowed
//! before the end of the header: any read, write or skip first snaps the
//! cursor forward to the header boundary. Header fields and payload can
//! therefore be filled in any order.

use crc::{Crc, CRC_16_MODBUS};

use crate::alerts::Alerts;
use crate::error::PacketError;

/// Largest frame the radio carries
pub const MAX_PACKET_LEN: usize = 256;

/// Protocol version stamped by [`Packet::reset`]
pub const CURRENT_VERSION: u16 = 2;

/// First protocol version whose header carries a CRC field
const CRC_MIN_VERSION: u16 = 2;

const DEVICE_ID_OFFSET: usize = 0;
const NETWORK_ID_OFFSET: usize = 2;
const VERSION_OFFSET: usize = 4;
const ALERTS_OFFSET: usize = 6;
const TYPE_OFFSET: usize = 8;
const CRC_OFFSET: usize = 10;
const CRC_END: usize = CRC_OFFSET + 2;

const HEADER_LEN_V1: usize = 10;
const HEADER_LEN_V2: usize = CRC_END;

/// Value held in the CRC field while the checksum is computed
///
/// Non-zero so that a frame of another MODBUS-checked protocol sharing the
/// channel is unlikely to validate as one of ours.
const CRC_SENTINEL: u16 = 0xA152;

/// MODBUS CRC-16: poly 0xA001 LSB-first, seed 0xFFFF
const MODBUS: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

/// Message type carried in the header Type field
///
/// Full-width on the wire; values without an associated constant are
/// preserved as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacketType(pub u16);

impl PacketType {
    pub const ANNOUNCE: Self = Self(0x0000);
    pub const SENSOR_REPORT: Self = Self(0x0001);
    pub const CONFIGURE_DEVICE: Self = Self(0x8000);
}

/// A single radio frame
///
/// `len` is the number of bytes that go on air; `ptr` is the payload cursor.
#[derive(Clone)]
pub struct Packet {
    data: [u8; MAX_PACKET_LEN],
    ptr: usize,
    len: usize,
}

impl Packet {
    /// Create an empty packet stamped with [`CURRENT_VERSION`]
    pub fn new() -> Self {
        let mut packet = Self {
            data: [0; MAX_PACKET_LEN],
            ptr: 0,
            len: 0,
        };
        packet.reset();
        packet
    }

    /// Copy a received frame into a new packet
    ///
    /// # Errors
    ///
    /// Returns `PacketError::LengthOutOfRange` if `bytes` is longer than
    /// [`MAX_PACKET_LEN`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PacketError> {
        if bytes.len() > MAX_PACKET_LEN {
            return Err(PacketError::LengthOutOfRange);
        }

        let mut packet = Self {
            data: [0; MAX_PACKET_LEN],
            ptr: 0,
            len: bytes.len(),
        };
        packet.data[..bytes.len()].copy_from_slice(bytes);
        Ok(packet)
    }

    /// Clear cursor and length, then stamp the current protocol version
    ///
    /// DeviceID and NetworkID are left untouched; callers set those.
    pub fn reset(&mut self) {
        self.ptr = 0;
        self.len = 0;
        self.put_u16(VERSION_OFFSET, CURRENT_VERSION);
    }

    pub fn device_id(&self) -> u16 {
        self.get_u16(DEVICE_ID_OFFSET)
    }

    pub fn set_device_id(&mut self, device: u16) {
        self.set_header_field(DEVICE_ID_OFFSET, device);
    }

    pub fn network_id(&self) -> u16 {
        self.get_u16(NETWORK_ID_OFFSET)
    }

    pub fn set_network_id(&mut self, network: u16) {
        self.set_header_field(NETWORK_ID_OFFSET, network);
    }

    pub fn version(&self) -> u16 {
        self.get_u16(VERSION_OFFSET)
    }

    pub fn set_version(&mut self, version: u16) {
        self.set_header_field(VERSION_OFFSET, version);
    }

    pub fn alerts(&self) -> Alerts {
        Alerts::from_bits(self.get_u16(ALERTS_OFFSET))
    }

    pub fn set_alerts(&mut self, alerts: Alerts) {
        self.set_header_field(ALERTS_OFFSET, alerts.bits());
    }

    pub fn packet_type(&self) -> PacketType {
        PacketType(self.get_u16(TYPE_OFFSET))
    }

    pub fn set_packet_type(&mut self, packet_type: PacketType) {
        self.set_header_field(TYPE_OFFSET, packet_type.0);
    }

    /// Stored CRC field
    ///
    /// Only meaningful for version 2 and later; on version 1 frames these
    /// bytes are payload.
    pub fn crc(&self) -> u16 {
        self.get_u16(CRC_OFFSET)
    }

    /// Overwrite the CRC field
    ///
    /// Prefer [`Packet::update_crc`]. On version 1 frames this writes into
    /// the payload.
    pub fn set_crc(&mut self, crc: u16) {
        self.set_header_field(CRC_OFFSET, crc);
    }

    /// Header length for the version currently in the header
    pub fn header_len(&self) -> usize {
        if self.has_crc() {
            HEADER_LEN_V2
        } else {
            HEADER_LEN_V1
        }
    }

    /// True if the header version carries a CRC field
    pub fn has_crc(&self) -> bool {
        self.version() >= CRC_MIN_VERSION
    }

    /// Append one big-endian `u16` at the cursor
    ///
    /// # Errors
    ///
    /// Returns `PacketError::Overflow` if the value does not fit in the
    /// buffer. The packet is left unchanged.
    pub fn write_u16(&mut self, value: u16) -> Result<(), PacketError> {
        self.clamp_cursor();

        let end = self.ptr + 2;
        if end > MAX_PACKET_LEN {
            return Err(PacketError::Overflow);
        }

        self.put_u16(self.ptr, value);
        self.ptr = end;
        self.len = self.len.max(end);
        Ok(())
    }

    /// Read one big-endian `u16` at the cursor
    ///
    /// # Errors
    ///
    /// Returns `PacketError::Truncated` if fewer than two bytes remain
    /// before the logical length. The cursor does not move.
    pub fn read_u16(&mut self) -> Result<u16, PacketError> {
        self.clamp_cursor();

        let end = self.ptr + 2;
        if end > self.len {
            return Err(PacketError::Truncated);
        }

        let value = self.get_u16(self.ptr);
        self.ptr = end;
        Ok(value)
    }

    /// Advance the cursor by `n` bytes without reading them
    pub fn skip(&mut self, n: usize) {
        self.clamp_cursor();
        self.ptr = (self.ptr + n).min(MAX_PACKET_LEN);
    }

    /// Move the cursor back to the first payload byte
    pub fn rewind(&mut self) {
        self.ptr = self.header_len();
    }

    /// Move the cursor to the end of the payload, ready to append
    pub fn seek_end(&mut self) {
        self.ptr = self.len.max(self.header_len());
    }

    /// Cursor position, never before the header boundary
    pub fn position(&self) -> usize {
        self.ptr.max(self.header_len())
    }

    /// Unread payload bytes between the cursor and the logical length
    pub fn remaining(&self) -> usize {
        self.len.saturating_sub(self.position())
    }

    /// Number of bytes that go on air
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Declare the transmittable length, e.g. after a radio receive
    ///
    /// The cursor is pulled back to `len` if it was past it.
    ///
    /// # Errors
    ///
    /// Returns `PacketError::LengthOutOfRange` if `len` exceeds
    /// [`MAX_PACKET_LEN`].
    pub fn set_length(&mut self, len: usize) -> Result<(), PacketError> {
        if len > MAX_PACKET_LEN {
            return Err(PacketError::LengthOutOfRange);
        }

        self.len = len;
        self.ptr = self.ptr.min(len);
        Ok(())
    }

    /// Exact bytes to transmit, or that were received
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Bytes after the header, up to the logical length
    pub fn payload(&self) -> &[u8] {
        let start = self.header_len().min(self.len);
        &self.data[start..self.len]
    }

    /// Whole backing buffer, for radios that receive in place
    ///
    /// Follow with [`Packet::set_length`] once the frame size is known.
    pub fn as_mut_buffer(&mut self) -> &mut [u8; MAX_PACKET_LEN] {
        &mut self.data
    }

    /// Compute and store the frame checksum
    ///
    /// No-op for version 1 frames, which have no CRC field.
    pub fn update_crc(&mut self) {
        if !self.has_crc() {
            return;
        }

        let crc = self.checksum();
        self.put_u16(CRC_OFFSET, crc);
    }

    /// Check the stored checksum against the frame contents
    ///
    /// Always true for version 1 frames. Never modifies the packet.
    pub fn crc_is_valid(&self) -> bool {
        if !self.has_crc() {
            return true;
        }

        self.checksum() == self.crc()
    }

    /// MODBUS CRC over `[0, len)` with the CRC field read as the sentinel
    fn checksum(&self) -> u16 {
        let frame = self.as_bytes();
        let sentinel = CRC_SENTINEL.to_be_bytes();

        // Clip the CRC slot to the frame so short frames still hash only
        // their own bytes.
        let slot_start = frame.len().min(CRC_OFFSET);
        let slot_end = frame.len().min(CRC_END);

        let mut digest = MODBUS.digest();
        digest.update(&frame[..slot_start]);
        digest.update(&sentinel[..slot_end - slot_start]);
        digest.update(&frame[slot_end..]);
        digest.finalize()
    }

    fn clamp_cursor(&mut self) {
        let header_len = self.header_len();
        if self.ptr < header_len {
            self.ptr = header_len;
        }
    }

    /// Header writes make the header part of the frame
    fn set_header_field(&mut self, offset: usize, value: u16) {
        self.put_u16(offset, value);
        self.len = self.len.max(self.header_len());
    }

    fn get_u16(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.data[offset], self.data[offset + 1]])
    }

    fn put_u16(&mut self, offset: usize, value: u16) {
        self.data[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    }
}

impl Default for Packet {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Packet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Packet")
            .field("device_id", &self.device_id())
            .field("network_id", &self.network_id())
            .field("version", &self.version())
            .field("alerts", &self.alerts())
            .field("packet_type", &self.packet_type())
            .field("len", &self.len)
            .field("ptr", &self.ptr)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Packet {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Packet(device={=u16:#x}, network={=u16}, version={=u16}, type={=u16:#x}, len={=usize})",
            self.device_id(),
            self.network_id(),
            self.version(),
            self.packet_type().0,
            self.len
        );
    }
}
