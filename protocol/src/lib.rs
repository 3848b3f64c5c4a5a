//! Wire format for sensor node radio frames
//!
//! Every frame is a single radio packet of at most 256 bytes: a fixed
//! big-endian header whose length depends on the protocol version, followed
//! by a message-specific payload.
//!
//! ```text
//!   Offset  Width  Field
//!   0       2      DeviceID
//!   2       2      NetworkID
//!   4       2      Version
//!   6       2      Alerts
//!   8       2      Type
//!   10      2      CRC        (version >= 2 only)
//! ```
//!
//! This crate has NO hardware dependencies and never allocates.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![deny(warnings)]

pub mod alerts;
pub mod error;
pub mod message;
pub mod packet;
pub mod sensor_report;
pub mod sensors;

pub use alerts::Alerts;
pub use error::PacketError;
pub use message::{detect_message, AnyMessage, Message};
pub use packet::{Packet, PacketType, CURRENT_VERSION, MAX_PACKET_LEN};
pub use sensor_report::{Reading, SensorReport, MAX_READINGS};
pub use sensors::{SensorInfo, SensorType};
