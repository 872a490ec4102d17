use badge_lib::Rgb888;

use crate::{Result, device::Entropy};

/// Colour wheel: red at 0, green at 85, blue at 170 and back to red at 255.
///
/// Negative positions are black. Positions above 255 wrap once, so inputs
/// should stay below 510.
pub fn hue_to_rgb(position: i32) -> Rgb888 {
	if position < 0 {
		return Rgb888::new(0, 0, 0);
	}
	let mut pos = i64::from(position);
	if pos > 255 {
		pos -= 255;
	}
	let (r, g, b) = if pos < 85 {
		(255 - pos * 3, pos * 3, 0)
	} else if pos < 170 {
		pos -= 85;
		(0, 255 - pos * 3, pos * 3)
	} else {
		pos -= 170;
		(pos * 3, 0, 255 - pos * 3)
	};
	Rgb888::new(channel(r), channel(g), channel(b))
}

fn channel(value: i64) -> u8 {
	value.clamp(0, 255) as u8
}

/// Three independent random bytes.
pub fn random_rgb<E: Entropy + ?Sized>(entropy: &mut E) -> Result<Rgb888> {
	let mut rgb = [0u8; 3];
	entropy.fill(&mut rgb)?;
	Ok(Rgb888::new(rgb[0], rgb[1], rgb[2]))
}
