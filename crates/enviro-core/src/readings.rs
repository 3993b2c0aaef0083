//! The reading aggregate and its published snapshot format.
//!
//! [`Readings`] holds the most recent value for each measured
//! quantity; there is no history. The poller overwrites the relevant
//! group of fields once per cycle and publishes an immutable
//! [`Snapshot`] with per-quantity units attached, rounded to two
//! decimals and (for Fahrenheit) unit-converted.

use serde::Serialize;

use crate::units::{round2, to_fahrenheit};

/// Temperature scale used for the published snapshot.
///
/// The aggregate always stores Celsius internally; the scale only
/// affects what [`Readings::snapshot`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
}

impl TemperatureScale {
    /// Unit string attached to the temperature measurement.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }

    /// Convert a Celsius reading into this scale.
    pub fn apply(self, celsius: f32) -> f32 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => to_fahrenheit(celsius),
        }
    }
}

/// A single published value with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub data: f32,
    pub unit: &'static str,
}

/// Point-in-time copy of all readings with units attached.
///
/// The unit strings are part of the published payload format and must
/// not change: gas channels report kilo-ohms as `kO` for oxidising
/// and `KO` for nh3/reducing, proximity is the sensor's dimensionless
/// `prox` count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    pub temperature: Measurement,
    pub pressure: Measurement,
    pub humidity: Measurement,
    pub lux: Measurement,
    pub prox: Measurement,
    pub oxidising: Measurement,
    pub nh3: Measurement,
    pub reducing: Measurement,
}

impl Snapshot {
    /// The snapshot as a name/measurement mapping, in field order.
    pub fn entries(&self) -> [(&'static str, Measurement); 8] {
        [
            ("temperature", self.temperature),
            ("pressure", self.pressure),
            ("humidity", self.humidity),
            ("lux", self.lux),
            ("prox", self.prox),
            ("oxidising", self.oxidising),
            ("nh3", self.nh3),
            ("reducing", self.reducing),
        ]
    }
}

/// Latest value of each measured quantity.
///
/// All fields are per-instance and start at zero. Temperature is in
/// Celsius, pressure in hPa, humidity in percent, the gas channels in
/// kilo-ohms.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Readings {
    pub temperature: f32,
    pub pressure: f32,
    pub humidity: f32,
    pub lux: f32,
    pub proximity: f32,
    pub oxidising: f32,
    pub nh3: f32,
    pub reducing: f32,
}

impl Readings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the climate sensor group. Inputs are trusted as-read
    /// from the driver; no validation.
    pub fn record_climate(&mut self, temperature: f32, pressure: f32, humidity: f32) {
        self.temperature = temperature;
        self.pressure = pressure;
        self.humidity = humidity;
    }

    /// Record the light/proximity sensor group.
    pub fn record_light(&mut self, lux: f32, proximity: f32) {
        self.lux = lux;
        self.proximity = proximity;
    }

    /// Record the gas sensor group, already scaled to kilo-ohms.
    pub fn record_gas(&mut self, oxidising: f32, nh3: f32, reducing: f32) {
        self.oxidising = oxidising;
        self.nh3 = nh3;
        self.reducing = reducing;
    }

    /// Publish the current readings.
    ///
    /// Pure function of the current field values: no side effects,
    /// deterministic for fixed fields. Every value is rounded to two
    /// decimals; temperature is converted into the requested scale.
    pub fn snapshot(&self, scale: TemperatureScale) -> Snapshot {
        Snapshot {
            temperature: Measurement {
                data: round2(scale.apply(self.temperature)),
                unit: scale.unit(),
            },
            pressure: Measurement {
                data: round2(self.pressure),
                unit: "hPa",
            },
            humidity: Measurement {
                data: round2(self.humidity),
                unit: "%",
            },
            lux: Measurement {
                data: round2(self.lux),
                unit: "Lux",
            },
            prox: Measurement {
                data: round2(self.proximity),
                unit: "prox",
            },
            oxidising: Measurement {
                data: round2(self.oxidising),
                unit: "kO",
            },
            nh3: Measurement {
                data: round2(self.nh3),
                unit: "KO",
            },
            reducing: Measurement {
                data: round2(self.reducing),
                unit: "KO",
            },
        }
    }
}
