//! Trait seams for the sensor drivers.
//!
//! The actual drivers (BME280-class climate sensor, LTR559-class
//! light/proximity sensor, MICS6814-class gas sensor, PMS5003-class
//! particulate sensor) live outside this crate. The poller only
//! relies on these capability traits, chosen and constructed at
//! startup by the platform binary.

use thiserror_no_std::Error;

/// Errors surfaced by a sensor source.
///
/// There is no recovery in this crate: a failed read aborts the poll
/// cycle and propagates to the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("{sensor} read failed: {details}")]
    ReadFailed {
        sensor: &'static str,
        details: &'static str,
    },
    /// Transient read timeout, as raised by the particulate sensor's
    /// serial protocol.
    #[error("{sensor} read timed out")]
    ReadTimeout { sensor: &'static str },
}

/// Raw gas channel resistances in ohms.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GasReadings {
    pub oxidising: f32,
    pub nh3: f32,
    pub reducing: f32,
}

/// Particulate matter concentrations in ug/m3.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParticulateReadings {
    pub pm1_0: u16,
    pub pm2_5: u16,
    pub pm10: u16,
}

/// Temperature / pressure / humidity source.
pub trait ClimateSource {
    /// Temperature in Celsius.
    fn temperature(&mut self) -> Result<f32, SensorError>;
    /// Pressure in hPa.
    fn pressure(&mut self) -> Result<f32, SensorError>;
    /// Relative humidity in percent.
    fn humidity(&mut self) -> Result<f32, SensorError>;
}

/// Ambient light and proximity source.
pub trait LightSource {
    /// Illuminance in lux.
    fn lux(&mut self) -> Result<f32, SensorError>;
    /// Dimensionless proximity count.
    fn proximity(&mut self) -> Result<f32, SensorError>;
}

/// Gas sensor source. All three channels are read in one transaction.
pub trait GasSource {
    fn read_all(&mut self) -> Result<GasReadings, SensorError>;
}

/// Particulate matter source.
///
/// May return [`SensorError::ReadTimeout`] on a missed serial frame.
pub trait ParticulateSource {
    fn read(&mut self) -> Result<ParticulateReadings, SensorError>;
}
