use std::{fmt, io};

use crate::config::ConfigError;
use crate::device::SensorError;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop the badge.
///
/// Apart from a rejected configuration (handled by showing an error screen)
/// all of these are hardware faults and end the process.
#[derive(Debug)]
pub enum Error {
	Io(io::Error),
	Config(ConfigError),
	Entropy(getrandom::Error),
	Display(String),
	Leds(String),
	Sensor(SensorError),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::Io(e) => write!(f, "i/o error: {e}"),
			Error::Config(e) => write!(f, "configuration error: {e}"),
			Error::Entropy(e) => write!(f, "entropy source failed: {e}"),
			Error::Display(msg) => write!(f, "display error: {msg}"),
			Error::Leds(msg) => write!(f, "led error: {msg}"),
			Error::Sensor(e) => write!(f, "battery sensor error: {e}"),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(e) => Some(e),
			Error::Config(e) => Some(e),
			Error::Sensor(e) => Some(e),
			_ => None,
		}
	}
}

impl From<io::Error> for Error {
	fn from(error: io::Error) -> Self {
		Error::Io(error)
	}
}

impl From<ConfigError> for Error {
	fn from(error: ConfigError) -> Self {
		Error::Config(error)
	}
}

impl From<getrandom::Error> for Error {
	fn from(error: getrandom::Error) -> Self {
		Error::Entropy(error)
	}
}

impl From<SensorError> for Error {
	fn from(error: SensorError) -> Self {
		Error::Sensor(error)
	}
}
