//! System clock synchronization from the RTC
//!
//! The RTC only resolves whole ticks (typically one second), so a reading
//! can lag true time by up to one tick. Correcting by half the tick width
//! centers the expected error on zero.

use fugit::MicrosDurationU64;
use hal_abstractions::{Board, Rtc, RtcError, SystemClock, Timestamp};

use crate::config::FrameworkConfig;
use crate::error::FrameworkError;

/// Offset in microseconds that moves `system_now` onto `rtc_now`
pub fn clock_correction(
    rtc_now: Timestamp,
    system_now: Timestamp,
    accuracy: MicrosDurationU64,
) -> i64 {
    let half_tick = (accuracy.to_micros() / 2) as i64;
    rtc_now.micros_since(system_now).saturating_add(half_tick)
}

/// Move `clock` onto `rtc_now`, returning the applied offset
fn slew_clock<C: SystemClock + ?Sized>(
    clock: &mut C,
    rtc_now: Timestamp,
    accuracy: MicrosDurationU64,
) -> i64 {
    let offset = clock_correction(rtc_now, clock.now(), accuracy);
    clock.adjust(offset);
    offset
}

/// Install the periodic alarm unless the RTC already has one
///
/// Returns whether an alarm was installed. An alarm configured on a
/// previous boot (the RTC is battery-backed) is left untouched.
pub fn ensure_periodic_alarm<R: Rtc + ?Sized>(
    rtc: &mut R,
    config: &FrameworkConfig,
) -> Result<bool, RtcError> {
    if rtc.is_alarm_enabled()? {
        return Ok(false);
    }

    rtc.set_periodic_alarm(config.alarm_value, config.alarm_field)?;
    info!(
        "Installed periodic alarm (value {}, field {:?})",
        config.alarm_value, config.alarm_field
    );
    Ok(true)
}

/// Slew the system clock onto RTC time and make sure an alarm is set
///
/// Returns the applied correction in microseconds.
pub fn sync_from_rtc<B: Board>(
    board: &mut B,
    config: &FrameworkConfig,
) -> Result<i64, FrameworkError> {
    let (rtc_now, accuracy) = {
        let rtc = board.rtc().map_err(|_| FrameworkError::TimeSync(RtcError::NotInitialized))?;
        (rtc.now().map_err(FrameworkError::TimeSync)?, rtc.accuracy())
    };

    let offset = slew_clock(board.clock(), rtc_now, accuracy);
    debug!("System clock adjusted by {} us", offset);

    let rtc = board.rtc().map_err(|_| FrameworkError::TimeSync(RtcError::NotInitialized))?;
    ensure_periodic_alarm(rtc, config).map_err(FrameworkError::TimeSync)?;

    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubBoard;
    use hal_abstractions::RtcField;

    #[test]
    fn test_correction_adds_half_tick() {
        let rtc = Timestamp::new(1_700_000_000, 0);
        let sys = Timestamp::new(0, 250_000);
        let offset = clock_correction(rtc, sys, MicrosDurationU64::secs(1));
        assert_eq!(offset, 1_700_000_000_000_000 - 250_000 + 500_000);
    }

    #[test]
    fn test_correction_can_be_negative() {
        let rtc = Timestamp::new(100, 0);
        let sys = Timestamp::new(102, 0);
        assert_eq!(clock_correction(rtc, sys, MicrosDurationU64::micros(0)), -2_000_000);
    }

    #[test]
    fn test_sync_moves_clock_onto_rtc() {
        let mut board = StubBoard::new();
        board.rtc.now = Timestamp::new(1_700_000_000, 0);
        board.rtc.accuracy = MicrosDurationU64::secs(1);
        board.clock.now = Timestamp::new(5, 0);

        let offset = sync_from_rtc(&mut board, &FrameworkConfig::default()).unwrap();

        assert_eq!(offset, (1_700_000_000 - 5) * 1_000_000 + 500_000);
        assert_eq!(board.clock.adjustments, [offset]);
        assert_eq!(board.clock.now, Timestamp::new(1_700_000_000, 500_000));
    }

    #[test]
    fn test_default_alarm_installed_when_none() {
        let mut board = StubBoard::new();
        board.rtc.alarm = None;

        sync_from_rtc(&mut board, &FrameworkConfig::default()).unwrap();

        assert_eq!(board.rtc.alarm, Some((2, RtcField::Seconds)));
        assert_eq!(board.rtc.alarm_installs, 1);
    }

    #[test]
    fn test_existing_alarm_left_alone() {
        let mut board = StubBoard::new();
        board.rtc.alarm = Some((15, RtcField::Minutes));

        sync_from_rtc(&mut board, &FrameworkConfig::default()).unwrap();

        assert_eq!(board.rtc.alarm, Some((15, RtcField::Minutes)));
        assert_eq!(board.rtc.alarm_installs, 0);
    }

    #[test]
    fn test_missing_rtc_is_time_sync_error() {
        let mut board = StubBoard::new();
        board.rtc_missing = true;

        let err = sync_from_rtc(&mut board, &FrameworkConfig::default()).unwrap_err();

        assert_eq!(err, FrameworkError::TimeSync(RtcError::NotInitialized));
        assert_eq!(err.state(), crate::framework::LifecycleState::SyncTime);
    }

    #[test]
    fn test_rtc_read_failure_is_time_sync_error() {
        let mut board = StubBoard::new();
        board.rtc.fail_now = true;

        let err = sync_from_rtc(&mut board, &FrameworkConfig::default()).unwrap_err();

        assert_eq!(err, FrameworkError::TimeSync(RtcError::HardwareError));
        assert!(board.clock.adjustments.is_empty());
    }
}
