use std::path::Path;

use embedded_graphics::{
	pixelcolor::{Rgb565, Rgb888},
	prelude::{Dimensions, DrawTarget, RgbColor},
	primitives::Rectangle,
};
use image::{ImageBuffer, ImageResult, Rgba};

/// Frame buffer backed by an RGBA image, usable wherever a panel is expected.
pub struct FrameOutput {
	pub buffer: ImageBuffer<Rgba<u8>, Vec<u8>>,
}

impl FrameOutput {
	pub fn new(width: u32, height: u32) -> Self {
		FrameOutput {
			buffer: ImageBuffer::new(width, height),
		}
	}

	/// Colour at the given pixel, widened back to 8 bits per channel.
	pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
		let px = self.buffer.get_pixel_checked(x, y)?;
		Some(Rgb888::new(px.0[0], px.0[1], px.0[2]))
	}

	/// Write the current contents to disk, format chosen by extension.
	pub fn save(&self, path: impl AsRef<Path>) -> ImageResult<()> {
		self.buffer.save(path)
	}
}

fn rgba(color: Rgb565) -> Rgba<u8> {
	Rgba([color.r() << 3, color.g() << 2, color.b() << 3, 0xff])
}

impl DrawTarget for FrameOutput {
	type Color = Rgb565;

	type Error = ();

	fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
	where
		I: IntoIterator<Item = embedded_graphics::Pixel<Self::Color>>,
	{
		for pos in pixels {
			if pos.0.x < 0
				|| pos.0.y < 0
				|| pos.0.x as u32 >= self.buffer.width()
				|| pos.0.y as u32 >= self.buffer.height()
			{
				continue;
			}
			self.buffer.put_pixel(pos.0.x as u32, pos.0.y as u32, rgba(pos.1));
		}
		Ok(())
	}

	fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
		// shapes may extend past the panel edge
		let area = area.intersection(&self.bounding_box());
		let Some(bottom_right) = area.bottom_right() else {
			return Ok(());
		};
		let rgb = rgba(color);
		for y in area.top_left.y..=bottom_right.y {
			for x in area.top_left.x..=bottom_right.x {
				self.buffer.put_pixel(x as u32, y as u32, rgb);
			}
		}
		Ok(())
	}
}

impl Dimensions for FrameOutput {
	fn bounding_box(&self) -> Rectangle {
		Rectangle::new((0, 0).into(), (self.buffer.width(), self.buffer.height()).into())
	}
}
