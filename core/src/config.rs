//! Framework configuration

use hal_abstractions::RtcField;

/// Tunables for alerting, transmit and wake cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameworkConfig {
    /// BattLow is raised below this voltage (millivolts)
    pub low_battery_mv: u16,
    /// BattCritical is raised below this voltage (millivolts)
    pub critical_battery_mv: u16,
    /// Radio transmit timeout in milliseconds
    pub tx_timeout_ms: u32,
    /// NetworkID stamped on outgoing frames
    pub network_id: u16,
    /// Periodic alarm installed when the RTC has none configured
    pub alarm_value: u8,
    pub alarm_field: RtcField,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            low_battery_mv: 3400,
            critical_battery_mv: 3100,
            tx_timeout_ms: 1000,
            // Flat, unsegmented network
            network_id: 0,
            // Once per minute, two seconds past
            alarm_value: 2,
            alarm_field: RtcField::Seconds,
        }
    }
}
