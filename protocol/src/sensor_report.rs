//! Sensor report message
//!
//! Sensor reports are sent from devices to the controller with the current
//! value of the sensors available on the device. Devices have different
//! sensing capabilities, so every reading is optional.
//!
//! The payload is a sequence of `(kind: u16, value: u16)` pairs right after
//! the header, with no count field: the number of readings is implied by
//! the frame length. Lookups are linear scans from the start of the
//! payload; a trailing partial pair is ignored rather than reported.

use crate::error::PacketError;
use crate::message::Message;
use crate::packet::{Packet, PacketType, MAX_PACKET_LEN};
use crate::sensors::SensorType;

/// Size of one `(kind, value)` pair on the wire
const READING_LEN: usize = 4;

/// Most readings a single frame can hold (version 1 header)
pub const MAX_READINGS: usize = (MAX_PACKET_LEN - 10) / READING_LEN;

/// One decoded reading
///
/// Keeps the raw kind code so pairs from newer nodes survive decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub code: u16,
    pub value: u16,
}

impl Reading {
    pub const fn new(kind: SensorType, value: u16) -> Self {
        Self {
            code: kind.code(),
            value,
        }
    }

    /// Kind of this reading, `None` if this build does not know the code
    pub fn kind(&self) -> Option<SensorType> {
        SensorType::from_code(self.code)
    }

    /// Value converted to the kind's SI unit, if the kind is known
    pub fn to_si(&self) -> Option<f32> {
        self.kind().map(|kind| kind.info().to_si(self.value))
    }
}

/// Typed view of a packet carrying sensor readings
///
/// Borrows the packet; the report itself holds no other state.
pub struct SensorReport<'a> {
    packet: &'a mut Packet,
}

impl<'a> SensorReport<'a> {
    /// Type code of sensor report frames
    pub const TYPE: PacketType = PacketType::SENSOR_REPORT;

    /// View `packet` as a sensor report
    ///
    /// The packet is not modified; call [`Packet::reset`] first to start a
    /// fresh report.
    pub fn attach(packet: &'a mut Packet) -> Self {
        Self { packet }
    }

    /// Give the underlying packet back
    pub fn into_packet(self) -> &'a mut Packet {
        self.packet
    }

    /// Append a reading after any existing ones
    ///
    /// # Errors
    ///
    /// Returns `PacketError::Overflow` if the pair does not fit. Nothing is
    /// written in that case.
    pub fn add_reading(&mut self, kind: SensorType, value: u16) -> Result<(), PacketError> {
        self.packet.seek_end();
        if self.packet.position() + READING_LEN > MAX_PACKET_LEN {
            return Err(PacketError::Overflow);
        }

        self.packet.write_u16(kind.code())?;
        self.packet.write_u16(value)
    }

    /// True if at least one reading of `kind` is present
    pub fn has_reading(&mut self, kind: SensorType) -> bool {
        self.packet.rewind();
        while self.packet.remaining() >= READING_LEN {
            match self.packet.read_u16() {
                Ok(code) if code == kind.code() => return true,
                Ok(_) => self.packet.skip(2),
                Err(_) => break,
            }
        }

        false
    }

    /// Value of the first reading of `kind`, or `default` if absent
    pub fn reading(&mut self, kind: SensorType, default: u16) -> u16 {
        self.packet.rewind();
        while self.packet.remaining() >= READING_LEN {
            let (Ok(code), Ok(value)) = (self.packet.read_u16(), self.packet.read_u16()) else {
                break;
            };
            if code == kind.code() {
                return value;
            }
        }

        default
    }

    /// Iterate over every complete pair in wire order, unknown kinds included
    pub fn readings(&mut self) -> Readings<'_> {
        self.packet.rewind();
        Readings {
            packet: &mut *self.packet,
        }
    }

    /// Every reading in the payload, duplicates included
    pub fn all_readings(&mut self) -> heapless::Vec<Reading, MAX_READINGS> {
        let mut all = heapless::Vec::new();
        for reading in self.readings() {
            if all.push(reading).is_err() {
                break;
            }
        }
        all
    }

    /// Number of complete pairs in the payload
    pub fn reading_count(&self) -> usize {
        self.packet.payload().len() / READING_LEN
    }
}

macro_rules! reading_accessors {
    ($($kind:ident => $add:ident, $has:ident, $get:ident;)*) => {
        impl SensorReport<'_> {
            $(
                #[doc = concat!("Append a `", stringify!($kind), "` reading")]
                pub fn $add(&mut self, value: u16) -> Result<(), PacketError> {
                    self.add_reading(SensorType::$kind, value)
                }

                pub fn $has(&mut self) -> bool {
                    self.has_reading(SensorType::$kind)
                }

                #[doc = concat!("First `", stringify!($kind), "` reading, or `default`")]
                pub fn $get(&mut self, default: u16) -> u16 {
                    self.reading(SensorType::$kind, default)
                }
            )*
        }
    };
}

reading_accessors! {
    BattVolts => add_battery_voltage, has_battery_voltage, battery_voltage;
    Temperature => add_temperature, has_temperature, temperature;
    Pressure => add_pressure, has_pressure, pressure;
    Humidity => add_humidity, has_humidity, humidity;
    SupplyVolts => add_supply_voltage, has_supply_voltage, supply_voltage;
    LoadPower => add_load_power, has_load_power, load_power;
    Coils => add_coils, has_coils, coils;
}

impl Message for SensorReport<'_> {
    fn packet(&self) -> &Packet {
        &*self.packet
    }

    fn packet_mut(&mut self) -> &mut Packet {
        &mut *self.packet
    }
}

/// Iterator returned by [`SensorReport::readings`]
pub struct Readings<'p> {
    packet: &'p mut Packet,
}

impl Iterator for Readings<'_> {
    type Item = Reading;

    fn next(&mut self) -> Option<Reading> {
        if self.packet.remaining() < READING_LEN {
            return None;
        }

        let code = self.packet.read_u16().ok()?;
        let value = self.packet.read_u16().ok()?;
        Some(Reading { code, value })
    }
}
