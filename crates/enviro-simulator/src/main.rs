//! Desktop simulator for the enviro-rs monitor.
//!
//! Runs the full orchestration loop against synthetic sensor sources
//! and a `SimulatorDisplay` panel, so the polling, conversion, and
//! rendering paths can be exercised without the hardware. Snapshots
//! are logged once per cycle; the stop flag is raised after a fixed
//! number of cycles to demonstrate graceful shutdown.

use std::convert::Infallible;
use std::time::Duration;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::SimulatorDisplay;
use embedded_hal::delay::DelayNs;
use log::{debug, error, info};

use enviro_core::config::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
use enviro_core::display::{DisplayController, Panel};
use enviro_core::monitor::EnviroMonitor;
use enviro_core::poller::{SensorPoller, StopFlag};
use enviro_core::readings::TemperatureScale;
use enviro_core::sensors::{
    ClimateSource, GasReadings, GasSource, LightSource, ParticulateReadings, ParticulateSource,
    SensorError,
};

/// Number of poll cycles before the simulator shuts itself down.
const SIM_CYCLES: usize = 6;

/// Wall-clock speedup applied to the pacing delays.
const TIME_SCALE: u64 = 20;

/// Pacing delay that sleeps scaled-down wall-clock time.
struct ScaledDelay;

impl DelayNs for ScaledDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns) / TIME_SCALE));
    }
}

/// Panel adapter around the simulator's in-memory display.
struct SimPanel {
    display: SimulatorDisplay<Rgb565>,
}

impl SimPanel {
    fn new() -> Self {
        Self {
            display: SimulatorDisplay::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX)),
        }
    }
}

impl OriginDimensions for SimPanel {
    fn size(&self) -> Size {
        self.display.size()
    }
}

impl DrawTarget for SimPanel {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels)
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.display.fill_contiguous(area, colors)
    }
}

impl Panel for SimPanel {
    fn begin(&mut self) -> Result<(), Self::Error> {
        debug!("panel initialised");
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error> {
        debug!("backlight {}", if on { "on" } else { "off" });
        Ok(())
    }
}

/// Synthetic climate readings drifting around comfortable indoor
/// values.
#[derive(Default)]
struct SyntheticClimate {
    tick: f32,
}

impl ClimateSource for SyntheticClimate {
    fn temperature(&mut self) -> Result<f32, SensorError> {
        self.tick += 1.0;
        Ok(22.0 + 2.5 * (self.tick / 12.0).sin())
    }

    fn pressure(&mut self) -> Result<f32, SensorError> {
        Ok(1012.0 + 3.0 * (self.tick / 40.0).sin())
    }

    fn humidity(&mut self) -> Result<f32, SensorError> {
        Ok(48.0 + 8.0 * (self.tick / 25.0).cos())
    }
}

#[derive(Default)]
struct SyntheticLight {
    tick: f32,
}

impl LightSource for SyntheticLight {
    fn lux(&mut self) -> Result<f32, SensorError> {
        self.tick += 1.0;
        Ok(320.0 + 120.0 * (self.tick / 18.0).sin())
    }

    fn proximity(&mut self) -> Result<f32, SensorError> {
        Ok(0.0)
    }
}

#[derive(Default)]
struct SyntheticGas {
    tick: f32,
}

impl GasSource for SyntheticGas {
    fn read_all(&mut self) -> Result<GasReadings, SensorError> {
        self.tick += 1.0;
        Ok(GasReadings {
            oxidising: 12_000.0 + 500.0 * (self.tick / 9.0).sin(),
            nh3: 3_000.0 + 200.0 * (self.tick / 14.0).cos(),
            reducing: 8_000.0 + 300.0 * (self.tick / 11.0).sin(),
        })
    }
}

/// Stand-in for the particulate sensor: present, never polled by the
/// loop, times out when queried directly.
struct SyntheticParticulate;

impl ParticulateSource for SyntheticParticulate {
    fn read(&mut self) -> Result<ParticulateReadings, SensorError> {
        Err(SensorError::ReadTimeout { sensor: "pms5003" })
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let display = match DisplayController::new(SimPanel::new()) {
        Ok(display) => display,
        Err(never) => match never {},
    };
    let poller = SensorPoller::new(
        SyntheticClimate::default(),
        SyntheticLight::default(),
        SyntheticGas::default(),
        SyntheticParticulate,
        ScaledDelay,
        TemperatureScale::Fahrenheit,
    );
    let mut monitor = EnviroMonitor::new(poller, display);

    let stop = StopFlag::new();
    let mut cycles = 0;
    let result = monitor.run(&stop, |snapshot| {
        for (name, measurement) in snapshot.entries() {
            info!("{name}: {} {}", measurement.data, measurement.unit);
        }
        cycles += 1;
        if cycles >= SIM_CYCLES {
            stop.request_stop();
        }
    });

    match result {
        Ok(()) => info!("simulator finished after {cycles} cycles"),
        Err(e) => error!("simulator aborted: {e}"),
    }
}
