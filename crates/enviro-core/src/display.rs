//! Display controller for the LCD strip.
//!
//! Owns the framebuffer and the panel, tracks the backlight state,
//! and renders a short text message centered on the screen. The panel
//! itself is an injected capability: anything that can blit Rgb565
//! pixels and switch its backlight qualifies.

use core::fmt::Write as _;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use log::debug;

use crate::config::{
    BACK_COLOUR, DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, FONT, MESSAGE_CAPACITY, TEXT_COLOUR,
};
use crate::framebuffer::FrameBuffer;

/// Physical panel the controller blits to.
///
/// Width and height are fixed by [`crate::config`]; implementations
/// are expected to match them.
pub trait Panel: DrawTarget<Color = Rgb565> {
    /// One-time panel initialisation.
    fn begin(&mut self) -> Result<(), Self::Error>;
    /// Switch the backlight on or off.
    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error>;
}

/// Backlight state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacklightState {
    /// Backlight lit, render requests are honoured.
    Active,
    /// Backlight off, render requests are ignored.
    Stopped,
}

/// Position that centers a box of `text` dimensions on a `canvas`.
///
/// Oversized text is pinned to the top-left corner rather than pushed
/// off-screen.
pub fn centered(canvas: Size, text: Size) -> Point {
    Point::new(
        (canvas.width.saturating_sub(text.width) / 2) as i32,
        (canvas.height.saturating_sub(text.height) / 2) as i32,
    )
}

/// Pixel dimensions of a (possibly multi-line) message in the
/// configured mono font.
fn measure(text: &str) -> Size {
    let advance = FONT.character_size.width + FONT.character_spacing;
    let mut lines = 0u32;
    let mut widest = 0u32;
    for line in text.lines() {
        lines += 1;
        let chars = line.chars().count() as u32;
        let width = (chars * advance).saturating_sub(FONT.character_spacing);
        widest = widest.max(width);
    }
    Size::new(widest, lines.max(1) * FONT.character_size.height)
}

/// Renders the current message centered on the panel.
///
/// Construction initialises the panel and lights the backlight, so a
/// freshly built controller is Active.
pub struct DisplayController<P: Panel> {
    panel: P,
    framebuffer: FrameBuffer,
    state: BacklightState,
    message: String<MESSAGE_CAPACITY>,
    text_size: Size,
}

impl<P: Panel> DisplayController<P> {
    pub fn new(mut panel: P) -> Result<Self, P::Error> {
        panel.begin()?;
        panel.set_backlight(true)?;
        Ok(Self {
            panel,
            framebuffer: FrameBuffer::new(),
            state: BacklightState::Active,
            message: String::new(),
            text_size: Size::zero(),
        })
    }

    pub fn state(&self) -> BacklightState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == BacklightState::Active
    }

    /// Current message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Store the message and measure it against the font.
    ///
    /// Messages longer than the buffer are truncated at a character
    /// boundary.
    pub fn set_message(&mut self, text: &str) {
        self.message.clear();
        for ch in text.chars() {
            if self.message.write_char(ch).is_err() {
                break;
            }
        }
        self.text_size = measure(&self.message);
    }

    /// Draw the background and the centered message, then blit to the
    /// panel.
    ///
    /// Explicit contract: while Stopped this is a no-op returning Ok,
    /// not an error. Panel I/O failures propagate to the caller.
    pub fn render(&mut self) -> Result<(), P::Error> {
        if !self.is_active() {
            debug!("render skipped, display stopped");
            return Ok(());
        }

        let canvas = Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX);
        // Framebuffer drawing is infallible; only the flush can fail.
        let _ = Rectangle::new(Point::zero(), canvas)
            .into_styled(PrimitiveStyle::with_fill(BACK_COLOUR))
            .draw(&mut self.framebuffer);
        let style = MonoTextStyle::new(&FONT, TEXT_COLOUR);
        let position = centered(canvas, self.text_size);
        let _ = Text::with_baseline(&self.message, position, style, Baseline::Top)
            .draw(&mut self.framebuffer);

        self.framebuffer.flush(&mut self.panel)
    }

    /// Active -> Stopped: power the backlight off. Idempotent.
    pub fn stop(&mut self) -> Result<(), P::Error> {
        debug!("display stopped");
        self.state = BacklightState::Stopped;
        self.panel.set_backlight(false)
    }

    /// Stopped -> Active: light the backlight and re-render the
    /// current message.
    pub fn run(&mut self) -> Result<(), P::Error> {
        debug!("display reactivated");
        self.state = BacklightState::Active;
        self.panel.set_backlight(true)?;
        self.render()
    }
}
