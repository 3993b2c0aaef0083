//! Hardware-independent core library for enviro-rs
//!
//! This crate contains all platform-agnostic logic for the enviro
//! environmental monitor: the reading aggregate and its snapshot
//! format, unit conversion, the LCD framebuffer and display
//! controller, the sensor trait seams, and the polling loop that ties
//! them together.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! the target single-board computer and desktop hosts (for the
//! simulator and tests). Sensor drivers and the panel driver are
//! injected through the traits in [`sensors`] and [`display`]; this
//! crate never touches a bus directly.

#![no_std]

extern crate alloc;

pub mod config;
pub mod display;
pub mod framebuffer;
pub mod monitor;
pub mod poller;
pub mod readings;
pub mod sensors;
pub mod units;
