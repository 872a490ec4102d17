use badge_lib::{BLACK, Baseline, Draw, DrawTarget, Drawable, FONT, Point, Rgb565, Text};

use crate::{
	device::{Display, DisplayGuard},
	render::{SUBTITLE_Y, TITLE_Y, centered_x},
};

/// Two centred lines of white text, each meant to fit in 11 characters.
pub struct ErrorScreen<'a> {
	pub lines: [&'a str; 2],
}

impl<D: DrawTarget<Color = Rgb565>> Draw<D> for ErrorScreen<'_> {
	fn draw(&self, disp: &mut D) -> Result<(), D::Error> {
		disp.clear(BLACK)?;
		for (line, y) in self.lines.iter().zip([TITLE_Y, SUBTITLE_Y]) {
			Text::with_baseline(line, Point::new(centered_x(line), y), FONT, Baseline::Top).draw(disp)?;
		}
		Ok(())
	}
}

/// Replace whatever is on the display with an error message.
pub fn show_error<D: Display>(display: &mut D, line1: &str, line2: &str) -> crate::Result<()> {
	let mut disp = DisplayGuard::open(display)?;
	ErrorScreen { lines: [line1, line2] }.draw(&mut *disp)?;
	disp.update()
}

#[cfg(test)]
mod tests {
	use badge_lib::Rgb888;

	use super::*;
	use crate::device::host::FrameDisplay;

	#[test]
	fn draws_both_lines_and_closes() {
		let mut disp = FrameDisplay::new();
		show_error(&mut disp, "invalid", "json").unwrap();
		assert!(!disp.is_open());
		assert_eq!(disp.flushed(), 1);
		let white = Rgb888::new(248, 252, 248);
		let lit = |x0: u32, x1: u32, y0: u32, y1: u32| {
			(y0..y1).any(|y| (x0..x1).any(|x| disp.frame().pixel(x, y) == Some(white)))
		};
		// "invalid" spans x 31..129, "json" spans x 52..108
		assert!(lit(31, 129, 18, 38));
		assert!(lit(52, 108, 42, 62));
		assert!(!lit(0, 31, 0, 80));
		assert!(!lit(129, 160, 0, 80));
	}

	#[test]
	fn open_failure_is_reported() {
		let mut disp = FrameDisplay::new();
		disp.open().unwrap();
		assert!(show_error(&mut disp, "a", "b").is_err());
	}
}
