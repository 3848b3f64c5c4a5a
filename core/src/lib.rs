//! Platform-agnostic core logic for sensor node firmware
//!
//! This crate contains the lifecycle that can be shared across all
//! supported boards. It has NO hardware dependencies: boards are reached
//! through the traits in `hal-abstractions`, and frames are built with
//! `node-protocol`.
//!
//! ## Lifecycle
//!
//! ```text
//! PreRtcInit -> AcquireRtc -> SyncTime -> PostRtcInit -> AppInit
//!     -> [ CheckAlarm -> (App::triggered) -> DeepSleep -> (App::usb_powered) ]*
//! ```
//!
//! Any failure during startup, or while querying the RTC alarm, is fatal:
//! [`Framework::run`] attempts a last deep sleep and returns the
//! [`FrameworkError`] so the board can reset. Application callback
//! failures inside the loop are logged and counted, never fatal.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![deny(warnings)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod app;
pub mod config;
pub mod device_id;
pub mod error;
pub mod framework;
pub mod time;

#[cfg(test)]
pub(crate) mod testing;

pub use app::App;
pub use config::FrameworkConfig;
pub use device_id::DeviceId;
pub use error::{AppError, FrameworkError, ReceiveError, SendError};
pub use framework::{Framework, FrameworkStats, LifecycleState};
