//! Nickname badge: a name and subtitle on a 160x80 panel with sparkling LEDs
//! and a battery gauge.

pub mod app;
pub mod battery;
pub mod clock;
pub mod color;
pub mod config;
pub mod device;
mod error;
pub mod error_screen;
pub mod leds;
pub mod render;

pub use error::{Error, Result};
