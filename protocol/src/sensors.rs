//! Sensor reading kinds and their unit metadata
//!
//! Readings travel as raw `u16` values. Each kind has a static rational
//! scale factor (`mult / div`) that converts the raw value to its SI unit,
//! so devices never need floating point to encode a reading.

/// Kind of a sensor reading, as encoded on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum SensorType {
    /// Battery voltage in millivolts
    BattVolts = 0,
    /// Temperature in centi-degrees Celsius
    Temperature = 1,
    /// Pressure in decapascals
    Pressure = 2,
    /// Relative humidity in centi-percent
    Humidity = 3,
    /// Supply (e.g. solar/USB) voltage in millivolts
    SupplyVolts = 4,
    /// Load power in deciwatts
    LoadPower = 5,
    /// Coil bitmap
    Coils = 6,
}

impl SensorType {
    /// Every known kind, in wire-code order
    pub const ALL: [SensorType; 7] = [
        SensorType::BattVolts,
        SensorType::Temperature,
        SensorType::Pressure,
        SensorType::Humidity,
        SensorType::SupplyVolts,
        SensorType::LoadPower,
        SensorType::Coils,
    ];

    /// Wire code
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Look up a kind by wire code
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::BattVolts),
            1 => Some(Self::Temperature),
            2 => Some(Self::Pressure),
            3 => Some(Self::Humidity),
            4 => Some(Self::SupplyVolts),
            5 => Some(Self::LoadPower),
            6 => Some(Self::Coils),
            _ => None,
        }
    }

    /// Static metadata for this kind
    pub fn info(self) -> &'static SensorInfo {
        &SENSOR_METADATA[self as usize]
    }
}

impl TryFrom<u16> for SensorType {
    type Error = u16;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}

/// Display name, SI unit and scale factor for a reading kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorInfo {
    pub name: &'static str,
    pub unit: &'static str,
    pub mult: u32,
    pub div: u32,
}

impl SensorInfo {
    /// Convert a raw wire value to its SI unit: `raw * mult / div`
    pub fn to_si(&self, raw: u16) -> f32 {
        (raw as f32) * (self.mult as f32) / (self.div as f32)
    }
}

/// Indexed by `SensorType` wire code
static SENSOR_METADATA: [SensorInfo; 7] = [
    SensorInfo {
        name: "battery",
        unit: "volts",
        mult: 1,
        div: 1000,
    },
    SensorInfo {
        name: "temperature",
        unit: "celsius",
        mult: 1,
        div: 100,
    },
    SensorInfo {
        name: "pressure",
        unit: "pascals",
        mult: 10,
        div: 1,
    },
    SensorInfo {
        name: "humidity",
        unit: "percent",
        mult: 1,
        div: 100,
    },
    SensorInfo {
        name: "supply",
        unit: "volts",
        mult: 1,
        div: 1000,
    },
    SensorInfo {
        name: "load",
        unit: "watts",
        mult: 1,
        div: 10,
    },
    SensorInfo {
        name: "coils",
        unit: "",
        mult: 1,
        div: 1,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for (index, kind) in SensorType::ALL.iter().enumerate() {
            assert_eq!(kind.code() as usize, index);
            assert_eq!(SensorType::from_code(kind.code()), Some(*kind));
        }
        assert_eq!(SensorType::from_code(7), None);
        assert_eq!(SensorType::try_from(0x00FF), Err(0x00FF));
    }

    #[test]
    fn test_metadata_lookup() {
        let info = SensorType::Pressure.info();
        assert_eq!(info.name, "pressure");
        assert_eq!(info.unit, "pascals");
        assert_eq!((info.mult, info.div), (10, 1));

        assert_eq!(SensorType::Coils.info().unit, "");
    }

    #[test]
    fn test_scale_to_si() {
        assert_eq!(SensorType::BattVolts.info().to_si(3700), 3.7);
        assert_eq!(SensorType::Temperature.info().to_si(2150), 21.5);
        assert_eq!(SensorType::Pressure.info().to_si(10132), 101_320.0);
        assert_eq!(SensorType::LoadPower.info().to_si(25), 2.5);
    }

    #[test]
    fn test_every_kind_has_nonzero_divisor() {
        for kind in SensorType::ALL {
            assert!(kind.info().div > 0, "{:?}", kind);
        }
    }
}
