//! Stand-ins for the badge peripherals on a desktop or Raspberry Pi.

use std::{
	fs, io,
	path::{Path, PathBuf},
	thread,
	time::Duration,
};

use badge_lib::{DrawTarget, HEIGHT, Pixel, Rectangle, Rgb565, Rgb888, Rng, WIDTH};
use embedded_graphics::prelude::{OriginDimensions, Size};
use frame_output::FrameOutput;
use log::{trace, warn};
use rand_xoshiro::rand_core::{RngCore, SeedableRng};
use time::OffsetDateTime;
use time_tz::{OffsetDateTimeExt, Tz};

use super::{Clock, Display, Entropy, Leds, ROCKET_MAX, Rocket, SensorError, Sleep, VoltageSensor};
use crate::{Error, Result, leds::LED_COUNT};

/// In-memory panel, optionally writing every flushed frame as PNG.
pub struct FrameDisplay {
	frame: FrameOutput,
	open: bool,
	flushed: u64,
	export: Option<PathBuf>,
}

impl FrameDisplay {
	pub fn new() -> Self {
		FrameDisplay {
			frame: FrameOutput::new(WIDTH, HEIGHT),
			open: false,
			flushed: 0,
			export: None,
		}
	}

	/// Save each update as `frame{n}.png` in `dir`.
	pub fn exporting_to(dir: impl Into<PathBuf>) -> Self {
		FrameDisplay {
			export: Some(dir.into()),
			..Self::new()
		}
	}

	pub fn frame(&self) -> &FrameOutput {
		&self.frame
	}

	pub fn is_open(&self) -> bool {
		self.open
	}

	/// Number of completed updates.
	pub fn flushed(&self) -> u64 {
		self.flushed
	}

	fn check_open(&self) -> Result<()> {
		if self.open {
			Ok(())
		} else {
			Err(Error::Display("display is not open".to_owned()))
		}
	}
}

impl Default for FrameDisplay {
	fn default() -> Self {
		Self::new()
	}
}

impl DrawTarget for FrameDisplay {
	type Color = Rgb565;

	type Error = Error;

	fn draw_iter<I>(&mut self, pixels: I) -> Result<()>
	where
		I: IntoIterator<Item = Pixel<Self::Color>>,
	{
		self.check_open()?;
		self.frame
			.draw_iter(pixels)
			.map_err(|()| Error::Display("frame buffer rejected pixels".to_owned()))
	}

	fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<()> {
		self.check_open()?;
		self.frame
			.fill_solid(area, color)
			.map_err(|()| Error::Display("frame buffer rejected fill".to_owned()))
	}
}

impl OriginDimensions for FrameDisplay {
	fn size(&self) -> Size {
		Size::new(WIDTH, HEIGHT)
	}
}

impl Display for FrameDisplay {
	fn open(&mut self) -> Result<()> {
		if self.open {
			return Err(Error::Display("display is already open".to_owned()));
		}
		self.open = true;
		Ok(())
	}

	fn update(&mut self) -> Result<()> {
		self.check_open()?;
		self.flushed += 1;
		if let Some(dir) = &self.export {
			let path = dir.join(format!("frame{}.png", self.flushed));
			self.frame
				.save(&path)
				.map_err(|e| Error::Display(format!("saving {}: {e}", path.display())))?;
		}
		Ok(())
	}

	fn close(&mut self) {
		self.open = false;
	}
}

/// Simulated LED strip. Keeps the last committed state around for inspection.
#[derive(Debug, Clone)]
pub struct LedStrip {
	staged: [Rgb888; LED_COUNT],
	shown: [Rgb888; LED_COUNT],
	top_dim: u8,
	rockets: [u8; 3],
	commits: u64,
}

impl LedStrip {
	pub fn new() -> Self {
		LedStrip {
			staged: [Rgb888::new(0, 0, 0); LED_COUNT],
			shown: [Rgb888::new(0, 0, 0); LED_COUNT],
			top_dim: 0,
			rockets: [0; 3],
			commits: 0,
		}
	}

	pub fn shown(&self) -> &[Rgb888; LED_COUNT] {
		&self.shown
	}

	pub fn rocket(&self, rocket: Rocket) -> u8 {
		self.rockets[rocket.index()]
	}

	pub fn top_dim(&self) -> u8 {
		self.top_dim
	}

	pub fn commits(&self) -> u64 {
		self.commits
	}
}

impl Default for LedStrip {
	fn default() -> Self {
		Self::new()
	}
}

impl Leds for LedStrip {
	fn prep(&mut self, index: usize, color: Rgb888) -> Result<()> {
		let slot = self
			.staged
			.get_mut(index)
			.ok_or_else(|| Error::Leds(format!("no LED with index {index}")))?;
		*slot = color;
		Ok(())
	}

	fn update(&mut self) -> Result<()> {
		self.shown = self.staged;
		self.commits += 1;
		trace!("leds: {:?}", self.shown);
		Ok(())
	}

	fn dim_top(&mut self, level: u8) -> Result<()> {
		self.top_dim = level;
		Ok(())
	}

	fn set_rocket(&mut self, rocket: Rocket, brightness: u8) -> Result<()> {
		if brightness > ROCKET_MAX {
			return Err(Error::Leds(format!("rocket brightness {brightness} out of range")));
		}
		self.rockets[rocket.index()] = brightness;
		Ok(())
	}

	fn clear(&mut self) -> Result<()> {
		self.staged = [Rgb888::new(0, 0, 0); LED_COUNT];
		self.rockets = [0; 3];
		self.update()
	}
}

/// System time converted to the machine's configured time zone.
pub struct SystemClock {
	tz: Option<&'static Tz>,
}

impl SystemClock {
	pub fn new() -> Self {
		let tz = match time_tz::system::get_timezone() {
			Ok(tz) => Some(tz),
			Err(e) => {
				warn!("cannot determine local time zone, using UTC: {e:?}");
				None
			},
		};
		SystemClock { tz }
	}
}

impl Default for SystemClock {
	fn default() -> Self {
		Self::new()
	}
}

impl Clock for SystemClock {
	fn now(&self) -> Result<time::Time> {
		let now = OffsetDateTime::now_utc();
		Ok(match self.tz {
			Some(tz) => now.to_timezone(tz).time(),
			None => now.time(),
		})
	}
}

/// Battery voltage from the Linux power supply class.
pub struct SysfsBattery {
	root: PathBuf,
}

impl SysfsBattery {
	pub fn new() -> Self {
		Self::with_root("/sys/class/power_supply")
	}

	pub fn with_root(root: impl Into<PathBuf>) -> Self {
		SysfsBattery { root: root.into() }
	}

	fn battery_dir(&self) -> std::result::Result<PathBuf, SensorError> {
		let entries = match fs::read_dir(&self.root) {
			Ok(entries) => entries,
			Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(SensorError::Unavailable),
			Err(e) => return Err(e.into()),
		};
		let mut dirs: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
		dirs.sort();
		dirs.into_iter()
			.find(|dir| is_battery(dir) && dir.join("voltage_now").exists())
			.ok_or(SensorError::Unavailable)
	}
}

impl Default for SysfsBattery {
	fn default() -> Self {
		Self::new()
	}
}

fn is_battery(dir: &Path) -> bool {
	fs::read_to_string(dir.join("type")).is_ok_and(|kind| kind.trim() == "Battery")
}

impl VoltageSensor for SysfsBattery {
	fn read_voltage(&mut self) -> std::result::Result<f32, SensorError> {
		let raw = fs::read_to_string(self.battery_dir()?.join("voltage_now"))?;
		let microvolts: u64 = raw.trim().parse().map_err(|_| SensorError::Malformed(raw.clone()))?;
		Ok(microvolts as f32 / 1_000_000.0)
	}
}

/// Always reports the same voltage.
#[derive(Debug, Clone, Copy)]
pub struct FixedVoltage(pub f32);

impl VoltageSensor for FixedVoltage {
	fn read_voltage(&mut self) -> std::result::Result<f32, SensorError> {
		Ok(self.0)
	}
}

/// Hardware without a battery sensor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBattery;

impl VoltageSensor for NoBattery {
	fn read_voltage(&mut self) -> std::result::Result<f32, SensorError> {
		Err(SensorError::Unavailable)
	}
}

/// Operating system randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl Entropy for OsEntropy {
	fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
		getrandom::fill(buf)?;
		Ok(())
	}
}

/// Reproducible byte stream.
pub struct SeededEntropy(Rng);

impl SeededEntropy {
	pub fn new(seed: u64) -> Self {
		SeededEntropy(Rng::seed_from_u64(seed))
	}
}

impl Entropy for SeededEntropy {
	fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
		self.0.fill_bytes(buf);
		Ok(())
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
	fn sleep(&mut self, duration: Duration) {
		thread::sleep(duration);
	}
}
