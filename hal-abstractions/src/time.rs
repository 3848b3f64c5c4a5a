//! Wall-clock timestamps and the MCU system clock

/// Timestamp with microsecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    /// Unix timestamp in seconds since epoch (1970-01-01 00:00:00 UTC)
    pub unix_secs: u64,
    /// Microseconds component (0-999,999)
    pub micros: u32,
}

impl Timestamp {
    const MICROS_PER_SEC: i64 = 1_000_000;

    /// Create a new timestamp
    pub const fn new(unix_secs: u64, micros: u32) -> Self {
        Self { unix_secs, micros }
    }

    /// Build from microseconds since epoch; negative values clamp to epoch
    pub fn from_micros(total_micros: i64) -> Self {
        let total = total_micros.max(0);
        Self::new(
            (total / Self::MICROS_PER_SEC) as u64,
            (total % Self::MICROS_PER_SEC) as u32,
        )
    }

    /// Microseconds since epoch
    pub fn as_micros(&self) -> i64 {
        (self.unix_secs as i64)
            .saturating_mul(Self::MICROS_PER_SEC)
            .saturating_add(self.micros as i64)
    }

    /// Signed distance `self - earlier` in microseconds
    pub fn micros_since(&self, earlier: Timestamp) -> i64 {
        self.as_micros().saturating_sub(earlier.as_micros())
    }

    /// This timestamp moved by `offset` microseconds (either direction)
    pub fn shifted(&self, offset: i64) -> Self {
        Self::from_micros(self.as_micros().saturating_add(offset))
    }
}

/// MCU system clock, the time base the firmware reads between RTC syncs
///
/// Boards without a battery-backed clock start this at epoch on every
/// boot; the framework slews it onto RTC time during startup.
pub trait SystemClock {
    /// Current system time
    fn now(&self) -> Timestamp;

    /// Shift the system clock by `offset` microseconds
    fn adjust(&mut self, offset: i64);
}
