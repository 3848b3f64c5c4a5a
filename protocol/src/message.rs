//! Typed message views and dispatch on the header Type field
//!
//! A message never owns its bytes: it borrows a [`Packet`] and exposes
//! typed accessors over it. Adding a message kind means adding a view type
//! and one arm to [`detect_message`]; the packet codec is not touched.

use crate::packet::{Packet, PacketType};
use crate::sensor_report::SensorReport;

/// Types that wrap a packet with type-safe access to its contents
pub trait Message {
    /// Underlying packet
    fn packet(&self) -> &Packet;

    /// Underlying packet, for header stamping before transmit
    fn packet_mut(&mut self) -> &mut Packet;
}

/// A bare packet is a message with no typed payload (e.g. announce)
impl Message for Packet {
    fn packet(&self) -> &Packet {
        self
    }

    fn packet_mut(&mut self) -> &mut Packet {
        self
    }
}

/// Any message kind this build understands
pub enum AnyMessage<'a> {
    SensorReport(SensorReport<'a>),
}

impl AnyMessage<'_> {
    /// Type code of the underlying frame
    pub fn packet_type(&self) -> PacketType {
        self.packet().packet_type()
    }
}

impl Message for AnyMessage<'_> {
    fn packet(&self) -> &Packet {
        match self {
            Self::SensorReport(report) => report.packet(),
        }
    }

    fn packet_mut(&mut self) -> &mut Packet {
        match self {
            Self::SensorReport(report) => report.packet_mut(),
        }
    }
}

/// Attach the view matching the packet's Type field
///
/// Returns `None` for types without a view.
pub fn detect_message(packet: &mut Packet) -> Option<AnyMessage<'_>> {
    match packet.packet_type() {
        PacketType::SENSOR_REPORT => Some(AnyMessage::SensorReport(SensorReport::attach(packet))),
        _ => None,
    }
}
