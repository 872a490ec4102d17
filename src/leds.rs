use badge_lib::Rgb888;
use log::trace;

use crate::{
	Result,
	color::random_rgb,
	device::{Entropy, Leds, ROCKET_MAX, Rocket},
};

/// LEDs on the strip around the panel.
pub const LED_COUNT: usize = 14;
/// Dimming applied to the top LED group after every sparkle.
pub const TOP_DIM: u8 = 4;

/// Sparkle animation: every LED gets a fresh random colour each frame.
pub struct LedAnimator<L, E> {
	leds: L,
	entropy: E,
}

impl<L: Leds, E: Entropy> LedAnimator<L, E> {
	pub fn new(leds: L, entropy: E) -> Self {
		LedAnimator { leds, entropy }
	}

	pub fn leds(&self) -> &L {
		&self.leds
	}

	pub fn leds_mut(&mut self) -> &mut L {
		&mut self.leds
	}

	/// Recolour `led_count` LEDs and switch the rockets on.
	pub fn tick(&mut self, led_count: usize) -> Result<Vec<Rgb888>> {
		let mut colors = Vec::with_capacity(led_count);
		for index in 0..led_count {
			let color = random_rgb(&mut self.entropy)?;
			self.leds.prep(index, color)?;
			colors.push(color);
		}
		self.leds.update()?;
		self.leds.dim_top(TOP_DIM)?;
		self.toggle_rockets(true)?;
		trace!("sparkle {colors:?}");
		Ok(colors)
	}

	pub fn toggle_rockets(&mut self, on: bool) -> Result<()> {
		let brightness = if on { ROCKET_MAX } else { 0 };
		for rocket in Rocket::ALL {
			self.leds.set_rocket(rocket, brightness)?;
		}
		Ok(())
	}

	pub fn clear(&mut self) -> Result<()> {
		self.leds.clear()
	}
}
