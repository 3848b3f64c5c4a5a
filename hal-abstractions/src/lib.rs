//! Hardware abstraction traits for sensor node firmware
//!
//! This crate defines the capabilities the node core needs from a board.
//! BSPs implement these traits; tests implement them in memory.
//!
//! - **`board`**: `Board` trait, `WakeReason`, `BoardError`
//! - **`rtc`**: `Rtc` trait, `RtcField`, `RtcError`
//! - **`radio`**: `Radio` trait, `RadioError`
//! - **`time`**: `SystemClock` trait and `Timestamp`

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![deny(warnings)]

pub mod board;
pub mod radio;
pub mod rtc;
pub mod time;

pub use board::{Board, BoardError, WakeReason};
pub use radio::{Radio, RadioError};
pub use rtc::{Rtc, RtcError, RtcField};
pub use time::{SystemClock, Timestamp};
