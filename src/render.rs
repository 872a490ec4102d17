//! The nickname screen and the loop that keeps it alive.

use std::time::Duration;

use badge_lib::{
	Baseline, CHAR_WIDTH, Draw, DrawTarget, Drawable, HEIGHT, Point, PrimitiveStyle, Rectangle, Rgb565, Rgb888,
	StyledDrawable, Text, WIDTH, rgb565, text_style,
};
use log::{debug, info, warn};

use crate::{
	battery::{BatteryIcon, BatteryStatus, geometry, sample_color},
	clock::now_hms,
	config::NicknameConfig,
	device::{Clock, Display, DisplayGuard, Entropy, Leds, Sleep, VoltageSensor},
	leds::{LED_COUNT, LedAnimator},
};

/// Pause between two frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(500);

const CENTER_X: i32 = WIDTH as i32 / 2;
/// Title row when there is no subtitle.
pub const TITLE_Y_ALONE: i32 = 30;
pub const TITLE_Y: i32 = 18;
pub const SUBTITLE_Y: i32 = 42;

/// Left edge that centres `text`, assuming every glyph is [`CHAR_WIDTH`] wide.
pub fn centered_x(text: &str) -> i32 {
	let len = text.chars().count() as i32;
	CENTER_X - len * CHAR_WIDTH as i32 / 2
}

/// What one frame showed.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
	pub subtitle: String,
	pub sparkle: Vec<Rgb888>,
	/// `None` when the indicator is disabled.
	pub battery: Option<BatteryStatus>,
}

pub struct NicknameScreen<'a> {
	pub config: &'a NicknameConfig,
	pub subtitle: &'a str,
	pub battery: Option<&'a BatteryIcon>,
}

impl<D: DrawTarget<Color = Rgb565>> Draw<D> for NicknameScreen<'_> {
	fn draw(&self, disp: &mut D) -> Result<(), D::Error> {
		let config = self.config;
		Rectangle::with_corners(Point::new(0, 0), Point::new(WIDTH as i32, HEIGHT as i32))
			.draw_styled(&PrimitiveStyle::with_fill(rgb565(config.background)), disp)?;
		if let Some(icon) = self.battery {
			icon.draw(disp)?;
		}
		let title_y = if config.subtitle.is_empty() {
			TITLE_Y_ALONE
		} else {
			TITLE_Y
		};
		Text::with_baseline(
			&config.nickname,
			Point::new(centered_x(&config.nickname), title_y),
			text_style(config.fg_color, config.bg_color),
			Baseline::Top,
		)
		.draw(disp)?;
		if !self.subtitle.is_empty() {
			Text::with_baseline(
				self.subtitle,
				Point::new(centered_x(self.subtitle), SUBTITLE_Y),
				text_style(config.fg_sub_color, config.bg_sub_color),
				Baseline::Top,
			)
			.draw(disp)?;
		}
		Ok(())
	}
}

/// Peripherals the badge is rendered with.
pub struct Parts<D, L, E, C, B> {
	pub display: D,
	pub leds: L,
	pub entropy: E,
	pub clock: C,
	pub battery: B,
}

/// Renders the nickname, one [`tick`](FrameComposer::tick) per frame.
pub struct FrameComposer<D, L, E, C, B> {
	config: NicknameConfig,
	display: D,
	animator: LedAnimator<L, E>,
	clock: C,
	battery: B,
	ticks: u64,
	sensor_missing: bool,
}

impl<D, L, E, C, B> FrameComposer<D, L, E, C, B>
where
	D: Display,
	L: Leds,
	E: Entropy,
	C: Clock,
	B: VoltageSensor,
{
	pub fn new(config: NicknameConfig, parts: Parts<D, L, E, C, B>) -> Self {
		let animator = LedAnimator::new(parts.leds, parts.entropy);
		Self::with_animator(config, parts.display, animator, parts.clock, parts.battery)
	}

	pub fn with_animator(
		config: NicknameConfig,
		display: D,
		animator: LedAnimator<L, E>,
		clock: C,
		battery: B,
	) -> Self {
		FrameComposer {
			config,
			display,
			animator,
			clock,
			battery,
			ticks: 0,
			sensor_missing: false,
		}
	}

	pub fn config(&self) -> &NicknameConfig {
		&self.config
	}

	pub fn display(&self) -> &D {
		&self.display
	}

	pub fn animator(&self) -> &LedAnimator<L, E> {
		&self.animator
	}

	/// Frames rendered so far.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Render a single frame. The display is closed again when this returns,
	/// whether or not drawing succeeded.
	pub fn tick(&mut self) -> crate::Result<FrameState> {
		let subtitle = if self.config.live_clock() {
			now_hms(&self.clock)?
		} else {
			self.config.subtitle.clone()
		};

		let sparkle = self.animator.tick(LED_COUNT)?;

		let mut disp = DisplayGuard::open(&mut self.display)?;
		let battery = if self.config.battery.enabled {
			let status = sample_color(&mut self.battery, &self.config.battery)?;
			if status.color.is_none() && !self.sensor_missing {
				warn!("battery sensor not available, hiding indicator");
				self.sensor_missing = true;
			}
			Some(status)
		} else {
			None
		};
		let icon = battery.and_then(|status| geometry(status.voltage, status.color));
		NicknameScreen {
			config: &self.config,
			subtitle: &subtitle,
			battery: icon.as_ref(),
		}
		.draw(&mut *disp)?;
		disp.update()?;
		drop(disp);

		self.ticks += 1;
		debug!("frame {}: {:?} / {:?}", self.ticks, self.config.nickname, subtitle);
		Ok(FrameState {
			subtitle,
			sparkle,
			battery,
		})
	}

	/// Render until an error occurs, or `max_ticks` frames when given.
	/// Whether a run limited to `max_ticks` frames is over.
	pub fn finished(&self, max_ticks: Option<u64>) -> bool {
		max_ticks.is_some_and(|max| self.ticks >= max)
	}

	pub fn run<S: Sleep + ?Sized>(&mut self, sleep: &mut S, max_ticks: Option<u64>) -> crate::Result<()> {
		info!("showing {:?}", self.config.nickname);
		loop {
			if self.finished(max_ticks) {
				return Ok(());
			}
			self.tick()?;
			sleep.sleep(FRAME_INTERVAL);
		}
	}
}

#[cfg(test)]
mod tests {
	use badge_lib::RgbColor;

	use super::*;
	use crate::device::host::{FixedVoltage, FrameDisplay, LedStrip, NoBattery, SeededEntropy};

	struct Fixed(time::Time);

	impl Clock for Fixed {
		fn now(&self) -> crate::Result<time::Time> {
			Ok(self.0)
		}
	}

	struct Count(Vec<Duration>);

	impl Sleep for Count {
		fn sleep(&mut self, duration: Duration) {
			self.0.push(duration);
		}
	}

	fn composer<B: VoltageSensor>(config: NicknameConfig, battery: B) -> TestComposer<B> {
		FrameComposer::new(
			config,
			Parts {
				display: FrameDisplay::new(),
				leds: LedStrip::new(),
				entropy: SeededEntropy::new(17381),
				clock: Fixed(time::Time::from_hms(9, 5, 1).unwrap()),
				battery,
			},
		)
	}

	type TestComposer<B> = FrameComposer<FrameDisplay, LedStrip, SeededEntropy, Fixed, B>;

	fn pixel<B: VoltageSensor>(c: &TestComposer<B>, x: u32, y: u32) -> Rgb888 {
		c.display().frame().pixel(x, y).unwrap()
	}

	#[test]
	fn centering() {
		assert_eq!(centered_x("hi"), 66);
		assert_eq!(centered_x(""), 80);
		assert_eq!(centered_x("abc"), 59);
		assert_eq!(centered_x("äöü"), 59);
		assert_eq!(centered_x("invalid"), 31);
	}

	#[test]
	fn static_subtitle_is_kept() {
		let config = NicknameConfig {
			subtitle: "hello".to_owned(),
			..NicknameConfig::default()
		};
		let mut c = composer(config, NoBattery);
		let state = c.tick().unwrap();
		assert_eq!(state.subtitle, "hello");
		assert_eq!(state.sparkle.len(), LED_COUNT);
	}

	#[test]
	fn live_clock_subtitle() {
		let config = NicknameConfig {
			subtitle: "#time".to_owned(),
			..NicknameConfig::default()
		};
		let mut c = composer(config, NoBattery);
		assert_eq!(c.tick().unwrap().subtitle, "09:05:01");
	}

	#[test]
	fn display_is_closed_after_each_tick() {
		let mut c = composer(NicknameConfig::default(), NoBattery);
		for n in 1..=3 {
			c.tick().unwrap();
			assert!(!c.display().is_open());
			assert_eq!(c.display().flushed(), n);
		}
	}

	#[test]
	fn background_fills_canvas() {
		let config = NicknameConfig {
			background: Rgb888::new(0, 0, 255),
			battery: crate::config::BatteryDisplayConfig {
				enabled: false,
				..Default::default()
			},
			..NicknameConfig::default()
		};
		let mut c = composer(config, FixedVoltage(3.9));
		c.tick().unwrap();
		assert_eq!(pixel(&c, 0, 0), Rgb888::new(0, 0, 248));
		assert_eq!(pixel(&c, 159, 79), Rgb888::new(0, 0, 248));
		assert_eq!(pixel(&c, 150, 5), Rgb888::new(0, 0, 248));
	}

	#[test]
	fn battery_icon_is_drawn() {
		let mut c = composer(NicknameConfig::default(), FixedVoltage(4.2));
		let state = c.tick().unwrap();
		let good = NicknameConfig::default().battery.good;
		assert_eq!(state.battery.unwrap().color, Some(good));
		// solid body and nub
		assert_eq!(pixel(&c, 145, 5).g(), rgb565(good).g() << 2);
		assert_eq!(pixel(&c, 156, 5).g(), rgb565(good).g() << 2);
		assert_eq!(pixel(&c, 139, 5), Rgb888::new(0, 0, 0));
	}

	#[test]
	fn missing_sensor_hides_icon() {
		let mut c = composer(NicknameConfig::default(), NoBattery);
		let state = c.tick().unwrap();
		assert_eq!(state.battery, Some(BatteryStatus::UNAVAILABLE));
		for x in 138..160 {
			for y in 0..12 {
				assert_eq!(pixel(&c, x, y), Rgb888::new(0, 0, 0));
			}
		}
	}

	#[test]
	fn title_moves_up_with_subtitle() {
		let alone = NicknameConfig {
			nickname: "X".to_owned(),
			fg_color: Rgb888::new(255, 255, 255),
			..NicknameConfig::default()
		};
		let with_sub = NicknameConfig {
			subtitle: "y".to_owned(),
			..alone.clone()
		};
		let lit_rows = |config: NicknameConfig| {
			let mut c = composer(config, NoBattery);
			c.tick().unwrap();
			(0..HEIGHT)
				.filter(|&y| (73..87).any(|x| pixel(&c, x, y) == Rgb888::new(248, 252, 248)))
				.collect::<Vec<_>>()
		};
		let rows = lit_rows(alone);
		assert!(rows.iter().all(|&y| (30..50).contains(&(y as i32))), "{rows:?}");
		let rows = lit_rows(with_sub);
		assert!(rows.iter().any(|&y| (18..38).contains(&(y as i32))));
		assert!(rows.iter().any(|&y| y >= 42));
	}

	#[test]
	fn run_paces_every_tick() {
		let mut c = composer(NicknameConfig::default(), NoBattery);
		let mut sleep = Count(vec![]);
		c.run(&mut sleep, Some(4)).unwrap();
		assert_eq!(c.ticks(), 4);
		assert_eq!(sleep.0, vec![FRAME_INTERVAL; 4]);
		assert_eq!(c.animator().leds().commits(), 4);
	}

	#[test]
	fn finished_after_tick_limit() {
		let mut c = composer(NicknameConfig::default(), NoBattery);
		assert!(!c.finished(None));
		assert!(!c.finished(Some(2)));
		c.tick().unwrap();
		c.tick().unwrap();
		assert!(c.finished(Some(2)));
		assert!(!c.finished(Some(3)));
		assert!(!c.finished(None));
	}
}
