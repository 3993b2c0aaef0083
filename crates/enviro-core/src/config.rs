//! Compiled-in configuration for the monitor.
//!
//! There is deliberately no runtime configuration: panel wiring,
//! colours, font, and pacing are fixed properties of the device. A
//! platform panel driver is expected to consume the wiring constants
//! when it sets up SPI; everything else is used directly by this
//! crate.

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::RgbColor;

/// Panel width in pixels (0.96" ST7735 strip, landscape).
pub const DISPLAY_WIDTH_PX: u32 = 160;

/// Panel height in pixels.
pub const DISPLAY_HEIGHT_PX: u32 = 80;

// SPI wiring of the panel on the sensor HAT.
pub const SPI_PORT: u8 = 0;
pub const SPI_CS: u8 = 1;
pub const DC_PIN: u8 = 9;
pub const BACKLIGHT_PIN: u8 = 12;
pub const SPI_SPEED_HZ: u32 = 10_000_000;

/// Panel rotation in degrees.
pub const ROTATION: u16 = 270;

/// I2C bus number the climate and light sensors sit on.
pub const I2C_BUS: u8 = 1;

/// Font used for the on-screen summary.
pub const FONT: MonoFont<'static> = FONT_10X20;

/// Foreground colour for the summary text.
pub const TEXT_COLOUR: Rgb565 = Rgb565::WHITE;

/// Background accent colour, teal (0, 170, 170) in RGB888.
pub const BACK_COLOUR: Rgb565 = Rgb565::new(0, 42, 21);

/// Unconditional settle delay after each sensor group, in
/// milliseconds. Pacing, not a timeout: it gives the sensors time to
/// recover between reads and keeps the bus quiet.
pub const GROUP_SETTLE_MS: u32 = 1_000;

/// Capacity of the display message buffer, in bytes.
pub const MESSAGE_CAPACITY: usize = 64;
