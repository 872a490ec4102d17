//! Hardware capabilities the renderer is written against.
//!
//! Each trait covers one peripheral of the badge. [`host`] provides
//! implementations that run on a regular Linux machine.

use std::{
	fmt, io,
	ops::{Deref, DerefMut},
	time::Duration,
};

use badge_lib::{DrawTarget, Rgb565, Rgb888};

use crate::{Error, Result};

pub mod host;

/// The LCD panel.
///
/// Drawing happens through [`DrawTarget`] between `open` and `close`;
/// nothing becomes visible before `update`.
pub trait Display: DrawTarget<Color = Rgb565, Error = Error> {
	fn open(&mut self) -> Result<()>;
	fn update(&mut self) -> Result<()>;
	fn close(&mut self);
}

/// Exclusive access to an opened [`Display`]. Closes the display when dropped.
pub struct DisplayGuard<'a, D: Display> {
	display: &'a mut D,
}

impl<'a, D: Display> DisplayGuard<'a, D> {
	pub fn open(display: &'a mut D) -> Result<Self> {
		display.open()?;
		Ok(DisplayGuard { display })
	}
}

impl<D: Display> Deref for DisplayGuard<'_, D> {
	type Target = D;

	fn deref(&self) -> &D {
		self.display
	}
}

impl<D: Display> DerefMut for DisplayGuard<'_, D> {
	fn deref_mut(&mut self) -> &mut D {
		self.display
	}
}

impl<D: Display> Drop for DisplayGuard<'_, D> {
	fn drop(&mut self) {
		self.display.close();
	}
}

/// The three single-colour LEDs above the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rocket {
	Blue = 0,
	Yellow = 1,
	Green = 2,
}

impl Rocket {
	pub const ALL: [Rocket; 3] = [Rocket::Blue, Rocket::Yellow, Rocket::Green];

	pub fn index(self) -> usize {
		self as usize
	}
}

/// Highest rocket brightness.
pub const ROCKET_MAX: u8 = 15;

/// The RGB LED strip and the rocket LEDs.
pub trait Leds {
	/// Stage a colour; shown on the next [`Leds::update`].
	fn prep(&mut self, index: usize, color: Rgb888) -> Result<()>;
	fn update(&mut self) -> Result<()>;
	/// Dim the top LED group by `level`.
	fn dim_top(&mut self, level: u8) -> Result<()>;
	fn set_rocket(&mut self, rocket: Rocket, brightness: u8) -> Result<()>;
	/// Switch every LED off immediately.
	fn clear(&mut self) -> Result<()>;
}

/// Local wall clock.
pub trait Clock {
	fn now(&self) -> Result<time::Time>;
}

#[derive(Debug)]
pub enum SensorError {
	/// This hardware has no way to measure the battery.
	Unavailable,
	Io(io::Error),
	Malformed(String),
}

impl fmt::Display for SensorError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SensorError::Unavailable => write!(f, "no battery sensor"),
			SensorError::Io(e) => write!(f, "{e}"),
			SensorError::Malformed(raw) => write!(f, "unexpected reading {raw:?}"),
		}
	}
}

impl std::error::Error for SensorError {}

impl From<io::Error> for SensorError {
	fn from(error: io::Error) -> Self {
		SensorError::Io(error)
	}
}

/// Battery voltage measurement.
pub trait VoltageSensor {
	fn read_voltage(&mut self) -> std::result::Result<f32, SensorError>;
}

impl<T: VoltageSensor + ?Sized> VoltageSensor for Box<T> {
	fn read_voltage(&mut self) -> std::result::Result<f32, SensorError> {
		(**self).read_voltage()
	}
}

/// Source of uniformly random bytes.
pub trait Entropy {
	fn fill(&mut self, buf: &mut [u8]) -> Result<()>;
}

impl<T: Entropy + ?Sized> Entropy for Box<T> {
	fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
		(**self).fill(buf)
	}
}

/// Blocking delay between frames.
pub trait Sleep {
	fn sleep(&mut self, duration: Duration);
}
