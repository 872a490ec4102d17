use embedded_graphics::{pixelcolor::Rgb565, prelude::DrawTarget};

/// One full screen worth of content.
///
/// Implementors draw everything they own and leave flushing to the caller.
pub trait Draw<D: DrawTarget<Color = Rgb565>> {
	fn draw(&self, disp: &mut D) -> Result<(), D::Error>;
}
