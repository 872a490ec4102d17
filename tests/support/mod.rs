#![allow(dead_code)]

use std::{cell::Cell, time::Duration};

use badge_lib::{DrawTarget, HEIGHT, Pixel, Rectangle, Rgb565, WIDTH};
use embedded_graphics::prelude::{OriginDimensions, Size};
use nickname::{
	Error, Result,
	device::{Clock, Display, Sleep, host::FrameDisplay},
};
use time::Time;

/// Advances one second on every reading.
pub struct SteppingClock {
	next: Cell<Time>,
}

impl SteppingClock {
	pub fn starting_at(hour: u8, minute: u8, second: u8) -> Self {
		SteppingClock {
			next: Cell::new(Time::from_hms(hour, minute, second).unwrap()),
		}
	}
}

impl Clock for SteppingClock {
	fn now(&self) -> Result<Time> {
		let now = self.next.get();
		self.next.set(now + time::Duration::SECOND);
		Ok(now)
	}
}

#[derive(Default)]
pub struct RecordingSleep {
	pub calls: Vec<Duration>,
}

impl Sleep for RecordingSleep {
	fn sleep(&mut self, duration: Duration) {
		self.calls.push(duration);
	}
}

/// Frame display that can be told to fail part way through drawing.
pub struct FlakyDisplay {
	pub inner: FrameDisplay,
	pub opens: u32,
	pub closes: u32,
	/// Number of draw calls that still succeed; `None` never fails.
	pub fail_after: Option<u32>,
}

impl FlakyDisplay {
	pub fn new() -> Self {
		FlakyDisplay {
			inner: FrameDisplay::new(),
			opens: 0,
			closes: 0,
			fail_after: None,
		}
	}

	fn spend(&mut self) -> Result<()> {
		match &mut self.fail_after {
			Some(0) => Err(Error::Display("injected failure".to_owned())),
			Some(n) => {
				*n -= 1;
				Ok(())
			},
			None => Ok(()),
		}
	}
}

impl DrawTarget for FlakyDisplay {
	type Color = Rgb565;

	type Error = Error;

	fn draw_iter<I>(&mut self, pixels: I) -> Result<()>
	where
		I: IntoIterator<Item = Pixel<Self::Color>>,
	{
		self.spend()?;
		self.inner.draw_iter(pixels)
	}

	fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<()> {
		self.spend()?;
		self.inner.fill_solid(area, color)
	}
}

impl OriginDimensions for FlakyDisplay {
	fn size(&self) -> Size {
		Size::new(WIDTH, HEIGHT)
	}
}

impl Display for FlakyDisplay {
	fn open(&mut self) -> Result<()> {
		self.opens += 1;
		self.inner.open()
	}

	fn update(&mut self) -> Result<()> {
		self.inner.update()
	}

	fn close(&mut self) {
		self.closes += 1;
		self.inner.close();
	}
}
