use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
pub use rand_xoshiro::Xoroshiro128StarStar as Rng;

pub use embedded_graphics::{
	pixelcolor::{Rgb565, Rgb888},
	prelude::{DrawTarget, RgbColor},
};

pub use embedded_graphics::mono_font::ascii::FONT_10X20;

pub use embedded_graphics::mono_font::MonoTextStyleBuilder;

pub use embedded_graphics::Pixel;
pub use embedded_graphics::prelude::{Point, Size};
pub use embedded_graphics::text::{Baseline, Text};

pub use embedded_graphics::Drawable;
pub use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, StyledDrawable};

mod context;
pub use context::Draw;

/// Panel width in pixels.
pub const WIDTH: u32 = 160;
/// Panel height in pixels.
pub const HEIGHT: u32 = 80;

/// Horizontal advance of one glyph of [`FONT`].
pub const CHAR_WIDTH: u32 = 14;

pub const BLACK: Rgb565 = Rgb565::new(0, 0, 0);
pub const WHITE: Rgb565 = Rgb565::new(0x1f, 0x3f, 0x1f);

/// 10x20 glyphs padded to the 14 pixel cell the badge layout is computed with.
pub static FONT_BADGE: MonoFont<'static> = MonoFont {
	character_spacing: CHAR_WIDTH - FONT_10X20.character_size.width,
	..FONT_10X20
};

pub static FONT: MonoTextStyle<'static, Rgb565> = MonoTextStyleBuilder::new()
	.font(&FONT_BADGE)
	.text_color(WHITE)
	.background_color(BLACK)
	.build();

/// Truncate a 24 bit colour to the panel's 16 bit format.
pub fn rgb565(color: Rgb888) -> Rgb565 {
	Rgb565::new(color.r() >> 3, color.g() >> 2, color.b() >> 3)
}

/// Text style with explicit foreground and background colours.
pub fn text_style(fg: Rgb888, bg: Rgb888) -> MonoTextStyle<'static, Rgb565> {
	MonoTextStyleBuilder::new()
		.font(&FONT_BADGE)
		.text_color(rgb565(fg))
		.background_color(rgb565(bg))
		.build()
}
