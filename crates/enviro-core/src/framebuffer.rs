//! In-memory canvas for the 160x80 LCD with changed-region tracking.
//!
//! The display controller draws onto this buffer instead of the SPI
//! panel. On flush, only the bounding rectangle of pixels that
//! actually changed is pushed to the panel in a single blit, which
//! keeps a full redraw of the little strip display cheap.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::trace;

use crate::config::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

const WIDTH: usize = DISPLAY_WIDTH_PX as usize;
const HEIGHT: usize = DISPLAY_HEIGHT_PX as usize;

/// Bounding box of pixels written since the last flush.
#[derive(Debug, Clone, Copy)]
struct Dirty {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl Dirty {
    fn pixel(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

/// RAM canvas implementing `DrawTarget<Color = Rgb565>`.
///
/// Starts out black, matching a freshly initialised panel. Pixels
/// outside the canvas are silently discarded.
pub struct FrameBuffer {
    pixels: Vec<Rgb565>,
    dirty: Option<Dirty>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; WIDTH * HEIGHT],
            dirty: None,
        }
    }

    /// True if any pixel changed since the last flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * WIDTH + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.include(x, y),
                None => self.dirty = Some(Dirty::pixel(x, y)),
            }
        }
    }

    /// Push the changed region to the panel and reset the dirty state.
    ///
    /// A no-op when nothing changed.
    pub fn flush<D>(&mut self, panel: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let width = rect.max_x - rect.min_x + 1;
        let height = rect.max_y - rect.min_y + 1;
        trace!(
            "flushing {}x{} region at ({}, {})",
            width, height, rect.min_x, rect.min_y
        );

        let area = Rectangle::new(
            Point::new(rect.min_x as i32, rect.min_y as i32),
            Size::new(width as u32, height as u32),
        );

        let pixels = &self.pixels;
        let colors = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row = y * WIDTH + rect.min_x;
            pixels[row..row + width].iter().copied()
        });

        panel.fill_contiguous(&area, colors)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0
                && coord.y >= 0
                && (coord.x as usize) < WIDTH
                && (coord.y as usize) < HEIGHT
            {
                self.set_pixel(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let x_start = (area.top_left.x.max(0) as usize).min(WIDTH);
        let y_start = (area.top_left.y.max(0) as usize).min(HEIGHT);
        let x_end = ((i64::from(area.top_left.x) + i64::from(area.size.width)).max(0) as usize)
            .min(WIDTH);
        let y_end = ((i64::from(area.top_left.y) + i64::from(area.size.height)).max(0) as usize)
            .min(HEIGHT);

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}
