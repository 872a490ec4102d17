use crate::{Result, device::Clock};

/// Subtitle value that is replaced by the current time on every frame.
pub const LIVE_CLOCK: &str = "#time";

/// Current local time as `hh:mm:ss`.
pub fn now_hms<C: Clock + ?Sized>(clock: &C) -> Result<String> {
	Ok(format_hms(clock.now()?))
}

pub fn format_hms(time: time::Time) -> String {
	format!("{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())
}
