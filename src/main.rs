use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command, value_parser};
use log::info;
use nickname::{
	app::{self, Boot},
	config::FILENAME,
	device::{
		Entropy, VoltageSensor,
		host::{FixedVoltage, FrameDisplay, LedStrip, OsEntropy, SeededEntropy, SysfsBattery, SystemClock, ThreadSleep},
	},
	render::Parts,
};

type HostParts = Parts<FrameDisplay, LedStrip, Box<dyn Entropy>, SystemClock, Box<dyn VoltageSensor>>;

fn cli() -> Command {
	Command::new("nickname")
		.about("Nickname badge for a 160x80 panel")
		.arg(
			Arg::new("config")
				.long("config")
				.value_name("PATH")
				.help("JSON configuration, defaults are used if it does not exist")
				.default_value(FILENAME)
				.value_parser(value_parser!(PathBuf)),
		)
		.arg(
			Arg::new("frames")
				.long("frames")
				.value_name("DIR")
				.help("Save every displayed frame as PNG in this directory")
				.value_parser(value_parser!(PathBuf)),
		)
		.arg(
			Arg::new("ticks")
				.long("ticks")
				.value_name("N")
				.help("Stop after N frames")
				.value_parser(value_parser!(u64)),
		)
		.arg(
			Arg::new("seed")
				.long("seed")
				.value_name("N")
				.help("Seed for a reproducible LED animation")
				.value_parser(value_parser!(u64)),
		)
		.arg(
			Arg::new("voltage")
				.long("voltage")
				.value_name("VOLTS")
				.help("Pretend the battery is at this voltage")
				.value_parser(value_parser!(f32)),
		)
		.arg(
			Arg::new("window")
				.long("window")
				.help("Show the badge in a window (needs the `pc` feature)")
				.action(ArgAction::SetTrue),
		)
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let matches = cli().get_matches();

	let config = matches
		.get_one::<PathBuf>("config")
		.cloned()
		.context("no configuration path")?;
	let max_ticks = matches.get_one::<u64>("ticks").copied();

	let display = match matches.get_one::<PathBuf>("frames") {
		Some(dir) => {
			fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
			info!("saving frames to {}", dir.display());
			FrameDisplay::exporting_to(dir)
		},
		None => FrameDisplay::new(),
	};
	let entropy: Box<dyn Entropy> = match matches.get_one::<u64>("seed") {
		Some(&seed) => Box::new(SeededEntropy::new(seed)),
		None => Box::new(OsEntropy),
	};
	let battery: Box<dyn VoltageSensor> = match matches.get_one::<f32>("voltage") {
		Some(&volts) => Box::new(FixedVoltage(volts)),
		None => Box::new(SysfsBattery::new()),
	};
	let parts: HostParts = Parts {
		display,
		leds: LedStrip::new(),
		entropy,
		clock: SystemClock::new(),
		battery,
	};

	if matches.get_flag("window") {
		return window_main(&config, parts, max_ticks);
	}

	match app::run(&config, parts, &mut ThreadSleep, max_ticks).context("badge stopped")? {
		Boot::Render(composer) => info!("rendered {} frames", composer.ticks()),
		Boot::Rejected(_) => info!("fix {} and restart", config.display()),
	}
	Ok(())
}

#[cfg(not(feature = "pc"))]
fn window_main(_config: &std::path::Path, _parts: HostParts, _max_ticks: Option<u64>) -> Result<()> {
	anyhow::bail!("built without the `pc` feature, no window support")
}

#[cfg(feature = "pc")]
fn window_main(config: &std::path::Path, parts: HostParts, max_ticks: Option<u64>) -> Result<()> {
	use std::{num::NonZeroU32, time::Instant};

	use badge_lib::{HEIGHT, WIDTH};
	use frame_output::FrameOutput;
	use log::error;
	use nickname::render::FRAME_INTERVAL;
	use winit::{
		dpi::LogicalSize,
		event::{Event, WindowEvent},
		event_loop::EventLoop,
		window::WindowBuilder,
	};

	const SIZE: (NonZeroU32, NonZeroU32) = match (NonZeroU32::new(WIDTH), NonZeroU32::new(HEIGHT)) {
		(Some(w), Some(h)) => (w, h),
		_ => panic!("empty panel"),
	};

	fn present(surface: &mut softbuffer::Surface, frame: &FrameOutput) -> Result<(), softbuffer::SoftBufferError> {
		surface.resize(SIZE.0, SIZE.1)?;
		let mut buffer = surface.buffer_mut()?;
		for index in 0..(WIDTH * HEIGHT) {
			let y = index / WIDTH;
			let x = index % WIDTH;
			let pixel = frame.buffer.get_pixel(x, y);
			let red = pixel.0[0];
			let green = pixel.0[1];
			let blue = pixel.0[2];

			buffer[index as usize] = blue as u32 | ((green as u32) << 8) | ((red as u32) << 16);
		}
		buffer.present()
	}

	let mut boot = app::boot(config, parts).context("starting badge")?;

	let event_loop = EventLoop::new();
	let window = WindowBuilder::new()
		.with_title("nickname")
		.with_inner_size(LogicalSize::new(WIDTH, HEIGHT))
		.build(&event_loop)
		.map_err(|e| anyhow::anyhow!("creating window: {e}"))?;
	let context = unsafe { softbuffer::Context::new(&window) }
		.map_err(|e| anyhow::anyhow!("creating drawing context: {e}"))?;
	let mut surface = unsafe { softbuffer::Surface::new(&context, &window) }
		.map_err(|e| anyhow::anyhow!("creating surface: {e}"))?;

	let start = Instant::now();
	let mut iters = 0;
	let mut buffer_dirty = true;

	event_loop.run(move |event, _, control_flow| {
		control_flow.set_poll();

		match event {
			Event::WindowEvent {
				event: WindowEvent::CloseRequested,
				..
			} => {
				control_flow.set_exit();
			},
			Event::MainEventsCleared => {
				window.request_redraw();
			},
			Event::RedrawRequested(window_id) if window_id == window.id() => {
				// the event loop takes over the pacing, so call tick directly
				if let Boot::Render(composer) = &mut boot {
					let due = Instant::now().duration_since(start) > FRAME_INTERVAL * iters;
					if due && composer.finished(max_ticks) {
						// last frame has had its interval on screen
						control_flow.set_exit();
						return;
					}
					if due {
						iters += 1;
						if let Err(e) = composer.tick() {
							error!("{e}");
							control_flow.set_exit();
							return;
						}
						buffer_dirty = true;
					}
				}

				if buffer_dirty {
					let frame = match &boot {
						Boot::Render(composer) => composer.display().frame(),
						Boot::Rejected(display) => display.frame(),
					};
					if let Err(e) = present(&mut surface, frame) {
						error!("presenting frame: {e}");
					}
					buffer_dirty = false;
				}
			},
			_ => (),
		}
	});
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cli_is_consistent() {
		cli().debug_assert();
	}

	#[test]
	fn parses_options() {
		let matches = cli()
			.try_get_matches_from(["nickname", "--ticks", "3", "--seed", "7", "--voltage", "3.9"])
			.unwrap();
		assert_eq!(matches.get_one::<u64>("ticks"), Some(&3));
		assert_eq!(matches.get_one::<u64>("seed"), Some(&7));
		assert_eq!(matches.get_one::<f32>("voltage"), Some(&3.9));
		assert_eq!(matches.get_one::<PathBuf>("config"), Some(&PathBuf::from(FILENAME)));
	}
}
