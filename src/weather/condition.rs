//! Discrete weather conditions and the WMO weather-code mapping.

use std::fmt;

/// Discrete weather category. Drives both the color theme and the particle
/// parameter set; selected once per resolution cycle and replaced wholesale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
	/// Clear daytime sky.
	Sunny,
	/// Clear night sky (star field).
	ClearNight,
	/// Drizzle, rain, or rain showers.
	Rain,
	/// Overcast or fog during the day.
	Cloudy,
	/// Overcast or fog at night.
	CloudyNight,
	/// Snowfall of any intensity.
	Snow,
	/// Thunderstorm.
	Thunder,
	/// Fallback when the weather is unknown or resolution failed.
	#[default]
	Clear,
}

impl WeatherCondition {
	/// Stable lowercase tag matching the theme naming used by the site CSS.
	pub fn as_str(self) -> &'static str {
		match self {
			WeatherCondition::Sunny => "sunny",
			WeatherCondition::ClearNight => "clear-night",
			WeatherCondition::Rain => "rain",
			WeatherCondition::Cloudy => "cloudy",
			WeatherCondition::CloudyNight => "cloudy-night",
			WeatherCondition::Snow => "snow",
			WeatherCondition::Thunder => "thunder",
			WeatherCondition::Clear => "clear",
		}
	}
}

impl fmt::Display for WeatherCondition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Map a WMO weather code (as reported by Open-Meteo) onto a condition.
///
/// Codes 51-67 and 80-82 are drizzle/rain and showers, 71-77 and 85-86 snow,
/// 95-99 thunderstorms, 1-3/45/48 cloud cover and fog, 0 a clear sky. Every
/// other code falls back to [`WeatherCondition::Clear`].
pub fn condition_for_code(code: u16, is_day: bool) -> WeatherCondition {
	match code {
		51..=67 | 80..=82 => WeatherCondition::Rain,
		71..=77 | 85..=86 => WeatherCondition::Snow,
		95..=99 => WeatherCondition::Thunder,
		1..=3 | 45 | 48 => {
			if is_day {
				WeatherCondition::Cloudy
			} else {
				WeatherCondition::CloudyNight
			}
		}
		0 => {
			if is_day {
				WeatherCondition::Sunny
			} else {
				WeatherCondition::ClearNight
			}
		}
		_ => WeatherCondition::Clear,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rain_code_ranges() {
		for code in (51..=67).chain(80..=82) {
			assert_eq!(condition_for_code(code, true), WeatherCondition::Rain);
			assert_eq!(condition_for_code(code, false), WeatherCondition::Rain);
		}
	}

	#[test]
	fn snow_code_ranges() {
		for code in (71..=77).chain(85..=86) {
			assert_eq!(condition_for_code(code, true), WeatherCondition::Snow);
			assert_eq!(condition_for_code(code, false), WeatherCondition::Snow);
		}
	}

	#[test]
	fn thunder_code_range() {
		for code in 95..=99 {
			assert_eq!(condition_for_code(code, true), WeatherCondition::Thunder);
		}
	}

	#[test]
	fn cloud_codes_split_on_daylight() {
		for code in [1, 2, 3, 45, 48] {
			assert_eq!(condition_for_code(code, true), WeatherCondition::Cloudy);
			assert_eq!(
				condition_for_code(code, false),
				WeatherCondition::CloudyNight
			);
		}
	}

	#[test]
	fn clear_sky_splits_on_daylight() {
		assert_eq!(condition_for_code(0, true), WeatherCondition::Sunny);
		assert_eq!(condition_for_code(0, false), WeatherCondition::ClearNight);
	}

	#[test]
	fn unknown_codes_fall_back_to_clear() {
		for code in [4, 10, 44, 49, 50, 68, 70, 78, 79, 83, 84, 87, 94, 100, 9999] {
			assert_eq!(condition_for_code(code, true), WeatherCondition::Clear);
			assert_eq!(condition_for_code(code, false), WeatherCondition::Clear);
		}
	}

	#[test]
	fn default_is_clear() {
		assert_eq!(WeatherCondition::default(), WeatherCondition::Clear);
	}
}
