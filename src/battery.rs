//! Battery level indicator in the top right corner.

use badge_lib::{Draw, DrawTarget, Point, PrimitiveStyle, Rectangle, Rgb565, Rgb888, StyledDrawable, rgb565};

use crate::{
	config::BatteryDisplayConfig,
	device::{SensorError, VoltageSensor},
};

/// Above this the battery counts as full and the icon is drawn solid.
const FULL: f32 = 4.0;
/// Above this the fill bar starts growing.
const EMPTY: f32 = 3.5;
/// Fill bar pixels per volt above [`EMPTY`].
const BAR_SCALE: f32 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryStatus {
	pub voltage: f32,
	/// `None` if this hardware cannot measure the battery.
	pub color: Option<Rgb888>,
}

impl BatteryStatus {
	pub const UNAVAILABLE: BatteryStatus = BatteryStatus {
		voltage: 0.0,
		color: None,
	};
}

/// Colour for a measured voltage. The thresholds are rough estimates.
pub fn color_for(voltage: f32, config: &BatteryDisplayConfig) -> Rgb888 {
	if voltage > 3.8 {
		config.good
	} else if voltage > 3.6 {
		config.ok
	} else {
		config.bad
	}
}

/// Measure the battery. A missing sensor is reported as unavailable, any
/// other sensor failure is returned.
pub fn sample_color<S: VoltageSensor + ?Sized>(
	sensor: &mut S,
	config: &BatteryDisplayConfig,
) -> crate::Result<BatteryStatus> {
	match sensor.read_voltage() {
		Ok(voltage) => Ok(BatteryStatus {
			voltage,
			color: Some(color_for(voltage, config)),
		}),
		Err(SensorError::Unavailable) => Ok(BatteryStatus::UNAVAILABLE),
		Err(e) => Err(e.into()),
	}
}

/// Rectangle given by inclusive corner coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconRect {
	pub x0: i32,
	pub y0: i32,
	pub x1: i32,
	pub y1: i32,
	pub filled: bool,
}

const fn rect(x0: i32, y0: i32, x1: i32, y1: i32, filled: bool) -> IconRect {
	IconRect { x0, y0, x1, y1, filled }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatteryIcon {
	pub color: Rgb888,
	pub rects: Vec<IconRect>,
}

/// Icon layout for a reading, or nothing if the reading has no colour.
pub fn geometry(voltage: f32, color: Option<Rgb888>) -> Option<BatteryIcon> {
	let color = color?;
	let mut rects = Vec::with_capacity(3);
	if voltage > FULL {
		rects.push(rect(140, 2, 155, 9, true));
	} else {
		rects.push(rect(140, 2, 154, 8, false));
		if voltage > EMPTY {
			let bar = ((voltage - EMPTY) * BAR_SCALE) as i32;
			rects.push(rect(141, 3, 142 + bar, 8, true));
		}
	}
	// terminal nub
	rects.push(rect(155, 4, 157, 7, true));
	Some(BatteryIcon { color, rects })
}

impl<D: DrawTarget<Color = Rgb565>> Draw<D> for BatteryIcon {
	fn draw(&self, disp: &mut D) -> Result<(), D::Error> {
		let color = rgb565(self.color);
		for r in &self.rects {
			let style = if r.filled {
				PrimitiveStyle::with_fill(color)
			} else {
				PrimitiveStyle::with_stroke(color, 1)
			};
			Rectangle::with_corners(Point::new(r.x0, r.y0), Point::new(r.x1, r.y1)).draw_styled(&style, disp)?;
		}
		Ok(())
	}
}
