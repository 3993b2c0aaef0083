//! Sequential polling loop over the sensor groups.
//!
//! One cycle reads climate, light, and gas in fixed order with an
//! unconditional settle delay after each group, then publishes one
//! snapshot. There is no retry and no isolation between groups: the
//! first failed read aborts the cycle and stops the loop.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use log::{error, info};
use thiserror_no_std::Error;

use crate::config::GROUP_SETTLE_MS;
use crate::readings::{Readings, Snapshot, TemperatureScale};
use crate::sensors::{ClimateSource, GasSource, LightSource, ParticulateSource, SensorError};
use crate::units::ohms_to_kilohms;

/// Shared stop signal for the polling loop.
///
/// The loop checks it once per cycle, so a raised flag takes effect
/// at the next cycle boundary rather than mid-read.
#[derive(Debug)]
pub struct StopFlag(AtomicBool);

impl StopFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Error terminating the polling loop.
#[derive(Error, Debug)]
pub enum CycleError<E> {
    #[error("sensor read failed: {0}")]
    Sensor(SensorError),
    #[error("cycle callback failed")]
    Callback(E),
}

impl<E> From<SensorError> for CycleError<E> {
    fn from(err: SensorError) -> Self {
        Self::Sensor(err)
    }
}

/// Polls the sensor sources and maintains the reading aggregate.
///
/// The particulate source is constructed and held but not part of the
/// poll cycle; it is reachable through [`SensorPoller::particulate_mut`]
/// for callers that want to query it out of band.
pub struct SensorPoller<C, L, G, P, D> {
    climate: C,
    light: L,
    gas: G,
    particulate: P,
    pacing: D,
    readings: Readings,
    scale: TemperatureScale,
}

impl<C, L, G, P, D> SensorPoller<C, L, G, P, D>
where
    C: ClimateSource,
    L: LightSource,
    G: GasSource,
    P: ParticulateSource,
    D: DelayNs,
{
    /// Build the poller and give the sensors one settle period to
    /// warm up.
    pub fn new(
        climate: C,
        light: L,
        gas: G,
        particulate: P,
        mut pacing: D,
        scale: TemperatureScale,
    ) -> Self {
        pacing.delay_ms(GROUP_SETTLE_MS);
        Self {
            climate,
            light,
            gas,
            particulate,
            pacing,
            readings: Readings::new(),
            scale,
        }
    }

    /// Latest recorded values.
    pub fn readings(&self) -> &Readings {
        &self.readings
    }

    pub fn particulate_mut(&mut self) -> &mut P {
        &mut self.particulate
    }

    /// Run one full pass over the sensor groups and publish a
    /// snapshot.
    pub fn poll_cycle(&mut self) -> Result<Snapshot, SensorError> {
        let temperature = self.climate.temperature()?;
        let pressure = self.climate.pressure()?;
        let humidity = self.climate.humidity()?;
        self.readings.record_climate(temperature, pressure, humidity);
        self.pacing.delay_ms(GROUP_SETTLE_MS);

        let lux = self.light.lux()?;
        let proximity = self.light.proximity()?;
        self.readings.record_light(lux, proximity);
        self.pacing.delay_ms(GROUP_SETTLE_MS);

        let gases = self.gas.read_all()?;
        self.readings.record_gas(
            ohms_to_kilohms(gases.oxidising),
            ohms_to_kilohms(gases.nh3),
            ohms_to_kilohms(gases.reducing),
        );
        self.pacing.delay_ms(GROUP_SETTLE_MS);

        Ok(self.readings.snapshot(self.scale))
    }

    /// Poll until `stop` is raised, invoking `on_cycle` with each
    /// snapshot.
    ///
    /// The callback is fallible so that downstream consumers (the
    /// display, a publisher) can terminate the loop; its error comes
    /// back as [`CycleError::Callback`].
    pub fn run<F, E>(&mut self, stop: &StopFlag, mut on_cycle: F) -> Result<(), CycleError<E>>
    where
        F: FnMut(&Snapshot) -> Result<(), E>,
    {
        info!("sensor poller started");
        while !stop.is_stopped() {
            let snapshot = self.poll_cycle().map_err(|e| {
                error!("poll cycle aborted: {e}");
                e
            })?;
            on_cycle(&snapshot).map_err(CycleError::Callback)?;
            self.pacing.delay_ms(GROUP_SETTLE_MS);
        }
        info!("sensor poller stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::{GasReadings, ParticulateReadings};

    struct FixedClimate;

    impl ClimateSource for FixedClimate {
        fn temperature(&mut self) -> Result<f32, SensorError> {
            Ok(21.0)
        }

        fn pressure(&mut self) -> Result<f32, SensorError> {
            Ok(1013.0)
        }

        fn humidity(&mut self) -> Result<f32, SensorError> {
            Ok(45.0)
        }
    }

    struct FixedLight;

    impl LightSource for FixedLight {
        fn lux(&mut self) -> Result<f32, SensorError> {
            Ok(300.0)
        }

        fn proximity(&mut self) -> Result<f32, SensorError> {
            Ok(0.0)
        }
    }

    struct FixedGas;

    impl GasSource for FixedGas {
        fn read_all(&mut self) -> Result<GasReadings, SensorError> {
            Ok(GasReadings {
                oxidising: 12000.0,
                nh3: 3000.0,
                reducing: 8000.0,
            })
        }
    }

    struct FailingGas;

    impl GasSource for FailingGas {
        fn read_all(&mut self) -> Result<GasReadings, SensorError> {
            Err(SensorError::ReadFailed {
                sensor: "gas",
                details: "adc unavailable",
            })
        }
    }

    struct IdleParticulate;

    impl ParticulateSource for IdleParticulate {
        fn read(&mut self) -> Result<ParticulateReadings, SensorError> {
            Err(SensorError::ReadTimeout { sensor: "pms5003" })
        }
    }

    struct NoopDelay;

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn poller() -> SensorPoller<FixedClimate, FixedLight, FixedGas, IdleParticulate, NoopDelay> {
        SensorPoller::new(
            FixedClimate,
            FixedLight,
            FixedGas,
            IdleParticulate,
            NoopDelay,
            TemperatureScale::Fahrenheit,
        )
    }

    #[test]
    fn cycle_records_all_groups() {
        let mut poller = poller();
        let snapshot = poller.poll_cycle().unwrap();

        assert_eq!(snapshot.temperature.data, 69.8);
        assert_eq!(snapshot.temperature.unit, "F");
        assert_eq!(snapshot.pressure.data, 1013.0);
        assert_eq!(snapshot.humidity.data, 45.0);
        assert_eq!(snapshot.lux.data, 300.0);
        assert_eq!(snapshot.prox.data, 0.0);
        assert_eq!(snapshot.oxidising.data, 12.0);
        assert_eq!(snapshot.nh3.data, 3.0);
        assert_eq!(snapshot.reducing.data, 8.0);
    }

    #[test]
    fn run_invokes_callback_once_per_cycle_until_stopped() {
        let mut poller = poller();
        let stop = StopFlag::new();
        let mut cycles = 0;

        let result: Result<(), CycleError<()>> = poller.run(&stop, |snapshot| {
            assert_eq!(snapshot.oxidising.data, 12.0);
            cycles += 1;
            if cycles == 3 {
                stop.request_stop();
            }
            Ok(())
        });

        assert!(result.is_ok());
        assert_eq!(cycles, 3);
    }

    #[test]
    fn sensor_failure_terminates_the_loop() {
        let mut poller = SensorPoller::new(
            FixedClimate,
            FixedLight,
            FailingGas,
            IdleParticulate,
            NoopDelay,
            TemperatureScale::Fahrenheit,
        );
        let stop = StopFlag::new();

        let result: Result<(), CycleError<()>> = poller.run(&stop, |_| Ok(()));
        assert!(matches!(
            result,
            Err(CycleError::Sensor(SensorError::ReadFailed {
                sensor: "gas",
                ..
            }))
        ));
    }

    #[test]
    fn callback_failure_terminates_the_loop() {
        let mut poller = poller();
        let stop = StopFlag::new();

        let result = poller.run(&stop, |_| Err("publish failed"));
        assert!(matches!(result, Err(CycleError::Callback("publish failed"))));
    }

    #[test]
    fn particulate_source_reports_its_timeout_condition() {
        let mut poller = poller();
        assert_eq!(
            poller.particulate_mut().read(),
            Err(SensorError::ReadTimeout { sensor: "pms5003" })
        );
    }

    #[test]
    fn raised_flag_prevents_any_cycle() {
        let mut poller = poller();
        let stop = StopFlag::new();
        stop.request_stop();

        let mut cycles = 0;
        let result: Result<(), CycleError<()>> = poller.run(&stop, |_| {
            cycles += 1;
            Ok(())
        });

        assert!(result.is_ok());
        assert_eq!(cycles, 0);
    }
}
