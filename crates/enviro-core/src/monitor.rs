//! Top-level orchestration: poller feeding display and callback.
//!
//! Wires the sensor poller's per-cycle snapshot into the display
//! controller (temperature and humidity as a two-line summary) and
//! forwards the untouched snapshot to the caller's callback, which is
//! where publishing or logging would hang off.

use core::fmt::Write as _;

use embedded_hal::delay::DelayNs;
use heapless::String;
use log::info;

use crate::config::MESSAGE_CAPACITY;
use crate::display::{DisplayController, Panel};
use crate::poller::{CycleError, SensorPoller, StopFlag};
use crate::readings::Snapshot;
use crate::sensors::{ClimateSource, GasSource, LightSource, ParticulateSource};

/// Two-line display summary: temperature over humidity, each as
/// `"<value> <unit>"`.
fn format_message(snapshot: &Snapshot) -> String<MESSAGE_CAPACITY> {
    let mut message = String::new();
    // Writes can only fail on overflow; two short lines always fit.
    let _ = write!(
        message,
        "{} {}\n{} {}",
        snapshot.temperature.data,
        snapshot.temperature.unit,
        snapshot.humidity.data,
        snapshot.humidity.unit
    );
    message
}

/// The composed monitor: sensor poller plus display controller.
pub struct EnviroMonitor<C, L, G, P, D, PN: Panel> {
    poller: SensorPoller<C, L, G, P, D>,
    display: DisplayController<PN>,
}

impl<C, L, G, P, D, PN> EnviroMonitor<C, L, G, P, D, PN>
where
    C: ClimateSource,
    L: LightSource,
    G: GasSource,
    P: ParticulateSource,
    D: DelayNs,
    PN: Panel,
{
    pub fn new(poller: SensorPoller<C, L, G, P, D>, display: DisplayController<PN>) -> Self {
        Self { poller, display }
    }

    pub fn display(&self) -> &DisplayController<PN> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayController<PN> {
        &mut self.display
    }

    /// Render once, then poll until `stop` is raised.
    ///
    /// Each cycle updates the display (skipped while it is Stopped)
    /// and hands the snapshot to `callback`. Sensor and panel
    /// failures terminate the loop; there is no retry.
    pub fn run<F>(&mut self, stop: &StopFlag, mut callback: F) -> Result<(), CycleError<PN::Error>>
    where
        F: FnMut(&Snapshot),
    {
        self.display.render().map_err(CycleError::Callback)?;
        info!("monitor started");

        let Self { poller, display } = self;
        poller.run(stop, |snapshot| {
            if display.is_active() {
                display.set_message(&format_message(snapshot));
                display.render()?;
            }
            callback(snapshot);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::convert::Infallible;

    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::Rectangle;

    use crate::config::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
    use crate::readings::{Readings, TemperatureScale};
    use crate::sensors::{GasReadings, ParticulateReadings, SensorError};

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

    struct RecordingPanel {
        pixels_written: usize,
    }

    impl OriginDimensions for RecordingPanel {
        fn size(&self) -> Size {
            Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX)
        }
    }

    impl DrawTarget for RecordingPanel {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            self.pixels_written += pixels.into_iter().count();
            Ok(())
        }

        fn fill_contiguous<I>(&mut self, _area: &Rectangle, colors: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Self::Color>,
        {
            self.pixels_written += colors.into_iter().count();
            Ok(())
        }
    }

    impl Panel for RecordingPanel {
        fn begin(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn set_backlight(&mut self, _on: bool) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn monitor() -> EnviroMonitor<FixedClimate, FixedLight, FixedGas, IdleParticulate, NoopDelay, RecordingPanel>
    {
        let poller = SensorPoller::new(
            FixedClimate,
            FixedLight,
            FixedGas,
            IdleParticulate,
            NoopDelay,
            TemperatureScale::Fahrenheit,
        );
        let display = DisplayController::new(RecordingPanel { pixels_written: 0 }).unwrap();
        EnviroMonitor::new(poller, display)
    }

    #[test]
    fn formats_temperature_and_humidity_lines() {
        let mut readings = Readings::new();
        readings.record_climate(21.0, 1013.0, 45.0);
        let snapshot = readings.snapshot(TemperatureScale::Fahrenheit);
        assert_eq!(&format_message(&snapshot)[..], "69.8 F\n45 %");
    }

    #[test]
    fn cycle_updates_display_and_forwards_snapshot() {
        let mut monitor = monitor();
        let stop = StopFlag::new();
        let mut seen = Vec::new();

        let result = monitor.run(&stop, |snapshot| {
            seen.push(*snapshot);
            stop.request_stop();
        });

        assert!(result.is_ok());
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].temperature.data, 69.8);
        assert_eq!(monitor.display().message(), "69.8 F\n45 %");
        assert!(monitor.display().panel().pixels_written >= 160 * 80);
    }

    #[test]
    fn stopped_display_skips_rendering_but_keeps_the_callback() {
        let mut monitor = monitor();
        monitor.display_mut().stop().unwrap();
        let baseline = monitor.display().panel().pixels_written;
        let stop = StopFlag::new();
        let mut cycles = 0;

        let result = monitor.run(&stop, |_| {
            cycles += 1;
            stop.request_stop();
        });

        assert!(result.is_ok());
        assert_eq!(cycles, 1);
        assert_eq!(monitor.display().panel().pixels_written, baseline);
        assert_eq!(monitor.display().message(), "");
    }
}
