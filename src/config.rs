//! Badge settings from `nickname.json`.
//!
//! Every key is optional. `bg_color` and `bg_sub_color` fall back to
//! whatever `background` resolved to, so resolution runs in two passes.

use std::{fmt, fs, io, path::Path};

use badge_lib::Rgb888;
use log::{debug, info};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::Error;

/// Looked up in the working directory.
pub const FILENAME: &str = "nickname.json";

const DEFAULT_NICKNAME: &str = "no nick";
const WHITE: [u8; 3] = [255, 255, 255];
const BLACK: [u8; 3] = [0, 0, 0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryDisplayConfig {
	pub enabled: bool,
	pub good: Rgb888,
	pub ok: Rgb888,
	pub bad: Rgb888,
}

impl Default for BatteryDisplayConfig {
	fn default() -> Self {
		BatteryDisplayConfig {
			enabled: true,
			good: Rgb888::new(0, 230, 0),
			ok: Rgb888::new(255, 215, 0),
			bad: Rgb888::new(255, 0, 0),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct NicknameConfig {
	pub nickname: String,
	/// Second line, [`crate::clock::LIVE_CLOCK`] for the current time.
	pub subtitle: String,
	pub background: Rgb888,
	pub fg_color: Rgb888,
	pub bg_color: Rgb888,
	pub fg_sub_color: Rgb888,
	pub bg_sub_color: Rgb888,
	pub battery: BatteryDisplayConfig,
}

impl Default for NicknameConfig {
	fn default() -> Self {
		RawConfig::default().resolve()
	}
}

#[derive(Debug)]
pub enum ConfigError {
	/// The file exists but is not a usable JSON object.
	Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::Parse(e) => write!(f, "invalid json: {e}"),
		}
	}
}

impl std::error::Error for ConfigError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			ConfigError::Parse(e) => Some(e),
		}
	}
}

/// The file as written, nothing filled in yet.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
	nickname: Option<String>,
	subtitle: Option<String>,
	battery: Option<bool>,
	battery_color_good: Option<[u8; 3]>,
	battery_color_ok: Option<[u8; 3]>,
	battery_color_bad: Option<[u8; 3]>,
	background: Option<[u8; 3]>,
	fg_color: Option<[u8; 3]>,
	bg_color: Option<[u8; 3]>,
	fg_sub_color: Option<[u8; 3]>,
	bg_sub_color: Option<[u8; 3]>,
}

fn rgb([r, g, b]: [u8; 3]) -> Rgb888 {
	Rgb888::new(r, g, b)
}

fn color_or(value: Option<[u8; 3]>, default: [u8; 3]) -> Rgb888 {
	rgb(value.unwrap_or(default))
}

impl RawConfig {
	fn resolve(self) -> NicknameConfig {
		// keys with fixed defaults
		let battery_defaults = BatteryDisplayConfig::default();
		let battery = BatteryDisplayConfig {
			enabled: self.battery.unwrap_or(battery_defaults.enabled),
			good: self.battery_color_good.map(rgb).unwrap_or(battery_defaults.good),
			ok: self.battery_color_ok.map(rgb).unwrap_or(battery_defaults.ok),
			bad: self.battery_color_bad.map(rgb).unwrap_or(battery_defaults.bad),
		};
		let background = color_or(self.background, BLACK);
		let fg_color = color_or(self.fg_color, WHITE);
		let fg_sub_color = color_or(self.fg_sub_color, WHITE);

		// keys defaulting to another resolved key
		let bg_color = self.bg_color.map(rgb).unwrap_or(background);
		let bg_sub_color = self.bg_sub_color.map(rgb).unwrap_or(background);

		NicknameConfig {
			nickname: self.nickname.unwrap_or_else(|| DEFAULT_NICKNAME.to_owned()),
			subtitle: self.subtitle.unwrap_or_default(),
			background,
			fg_color,
			bg_color,
			fg_sub_color,
			bg_sub_color,
			battery,
		}
	}
}

impl NicknameConfig {
	pub fn from_json(text: &[u8]) -> Result<Self, ConfigError> {
		// a repeated key keeps its last value
		let object: Map<String, Value> = serde_json::from_slice(text).map_err(ConfigError::Parse)?;
		let raw: RawConfig = serde_json::from_value(Value::Object(object)).map_err(ConfigError::Parse)?;
		debug!("config file: {raw:?}");
		Ok(raw.resolve())
	}

	/// Read the configuration. A missing file means defaults for everything.
	pub fn load(path: &Path) -> crate::Result<Self> {
		let text = match fs::read(path) {
			Ok(text) => text,
			Err(e) if e.kind() == io::ErrorKind::NotFound => {
				info!("{} not found, using defaults", path.display());
				return Ok(Self::default());
			},
			Err(e) => return Err(Error::Io(e)),
		};
		let config = Self::from_json(&text)?;
		info!("loaded {}", path.display());
		Ok(config)
	}

	/// Whether the subtitle shows the current time.
	pub fn live_clock(&self) -> bool {
		self.subtitle == crate::clock::LIVE_CLOCK
	}
}
