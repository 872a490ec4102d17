//! Startup: blank the hardware, read the configuration, pick a screen.

use std::path::Path;

use badge_lib::{BLACK, DrawTarget};
use log::{info, warn};

use crate::{
	Error, Result,
	config::NicknameConfig,
	device::{Clock, Display, DisplayGuard, Entropy, Leds, Sleep, VoltageSensor},
	error_screen::show_error,
	leds::LedAnimator,
	render::{FrameComposer, Parts},
};

pub enum Boot<D, L, E, C, B> {
	/// Configuration accepted, ready to render.
	Render(FrameComposer<D, L, E, C, B>),
	/// Configuration rejected, the error screen is showing.
	Rejected(D),
}

/// Clear LEDs and display, then load the configuration at `path`.
pub fn boot<D, L, E, C, B>(path: &Path, parts: Parts<D, L, E, C, B>) -> Result<Boot<D, L, E, C, B>>
where
	D: Display,
	L: Leds,
	E: Entropy,
	C: Clock,
	B: VoltageSensor,
{
	let Parts {
		mut display,
		leds,
		entropy,
		clock,
		battery,
	} = parts;
	let mut animator = LedAnimator::new(leds, entropy);
	animator.clear()?;
	{
		let mut disp = DisplayGuard::open(&mut display)?;
		disp.clear(BLACK)?;
		disp.update()?;
	}

	match NicknameConfig::load(path) {
		Ok(config) => Ok(Boot::Render(FrameComposer::with_animator(config, display, animator, clock, battery))),
		Err(Error::Config(e)) => {
			warn!("{}: {e}", path.display());
			show_error(&mut display, "invalid", "json")?;
			Ok(Boot::Rejected(display))
		},
		Err(e) => Err(e),
	}
}

/// [`boot`] and then render until `max_ticks` frames have been shown, or
/// forever without a limit.
pub fn run<D, L, E, C, B, S>(
	path: &Path,
	parts: Parts<D, L, E, C, B>,
	sleep: &mut S,
	max_ticks: Option<u64>,
) -> Result<Boot<D, L, E, C, B>>
where
	D: Display,
	L: Leds,
	E: Entropy,
	C: Clock,
	B: VoltageSensor,
	S: Sleep + ?Sized,
{
	let mut boot = boot(path, parts)?;
	match &mut boot {
		Boot::Render(composer) => composer.run(sleep, max_ticks)?,
		Boot::Rejected(_) => info!("configuration rejected, not rendering"),
	}
	Ok(boot)
}
