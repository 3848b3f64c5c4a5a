//! Application callbacks driven by the framework

use hal_abstractions::Board;

use crate::error::AppError;
use crate::framework::Framework;

/// Node application
///
/// Every callback receives the framework, giving access to the board
/// (sensors, RTC) and to [`Framework::send`].
pub trait App<B: Board> {
    /// Called once after the board is fully initialized
    ///
    /// An error here is fatal.
    fn initialize(&mut self, framework: &mut Framework<B>) -> Result<(), AppError>;

    /// Called each time the RTC alarm fires
    ///
    /// Errors are logged and counted; the node goes back to sleep.
    fn triggered(&mut self, framework: &mut Framework<B>) -> Result<(), AppError>;

    /// Called after waking with USB power present
    fn usb_powered(&mut self, _framework: &mut Framework<B>) -> Result<(), AppError> {
        Ok(())
    }
}
