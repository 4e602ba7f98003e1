//! Per-condition color themes for the weather overlay.

use super::condition::WeatherCondition;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Channels brightened for a parallax depth in [0, 1] (0.8x to 1.2x),
	/// clamped to 255. Closer particles read brighter.
	pub fn depth_scaled(self, depth: f64) -> (u8, u8, u8) {
		let factor = 0.8 + depth * 0.4;
		let scale = |c: u8| (c as f64 * factor).floor().min(255.0) as u8;
		(scale(self.r), scale(self.g), scale(self.b))
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Colors and chrome parameters for one weather condition.
///
/// `gradient` is the utility-class descriptor consumed by the page sections;
/// the canvas itself only reads the two colors and the hue.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherTheme {
	pub name: &'static str,
	pub gradient: &'static str,
	/// Base color for particles, scaled per particle by depth.
	pub particle_color: Color,
	/// Ambient glow wash color.
	pub glow_color: Color,
	/// Accent hue in degrees, used by page-level styling.
	pub accent_hue: u16,
}

const SUNNY: WeatherTheme = WeatherTheme {
	name: "sunny",
	gradient: "from-amber-900/20 via-orange-900/10 to-yellow-900/5",
	particle_color: Color::rgba(255, 215, 100, 0.4),
	glow_color: Color::rgba(255, 180, 50, 0.3),
	accent_hue: 35,
};

const CLEAR_NIGHT: WeatherTheme = WeatherTheme {
	name: "clear-night",
	gradient: "from-slate-950/40 via-indigo-950/30 to-slate-900/20",
	particle_color: Color::rgba(255, 255, 255, 0.6), // Stars
	glow_color: Color::rgba(100, 120, 255, 0.15),    // Moon glow
	accent_hue: 240,
};

const RAIN: WeatherTheme = WeatherTheme {
	name: "rain",
	gradient: "from-slate-900/30 via-blue-900/20 to-slate-800/10",
	particle_color: Color::rgba(150, 180, 220, 0.5),
	glow_color: Color::rgba(100, 150, 200, 0.2),
	accent_hue: 210,
};

const CLOUDY: WeatherTheme = WeatherTheme {
	name: "cloudy",
	gradient: "from-slate-800/30 via-purple-900/10 to-gray-800/20",
	particle_color: Color::rgba(180, 180, 200, 0.3),
	glow_color: Color::rgba(150, 150, 180, 0.15),
	accent_hue: 270,
};

const CLOUDY_NIGHT: WeatherTheme = WeatherTheme {
	name: "cloudy-night",
	gradient: "from-slate-950/40 via-gray-900/30 to-purple-950/20",
	particle_color: Color::rgba(150, 160, 180, 0.2),
	glow_color: Color::rgba(100, 100, 120, 0.1),
	accent_hue: 260,
};

const SNOW: WeatherTheme = WeatherTheme {
	name: "snow",
	gradient: "from-blue-900/20 via-slate-800/15 to-cyan-900/10",
	particle_color: Color::rgba(220, 235, 255, 0.6),
	glow_color: Color::rgba(200, 220, 255, 0.25),
	accent_hue: 200,
};

const THUNDER: WeatherTheme = WeatherTheme {
	name: "thunder",
	gradient: "from-purple-950/40 via-slate-900/30 to-blue-950/20",
	particle_color: Color::rgba(130, 150, 200, 0.5),
	glow_color: Color::rgba(100, 100, 180, 0.3),
	accent_hue: 250,
};

const CLEAR: WeatherTheme = WeatherTheme {
	name: "clear",
	gradient: "from-indigo-900/15 via-purple-900/10 to-slate-900/5",
	particle_color: Color::rgba(200, 200, 255, 0.3),
	glow_color: Color::rgba(180, 180, 220, 0.2),
	accent_hue: 260,
};

/// Look up the theme for a condition. Total over the closed condition set;
/// unknown weather codes have already collapsed to `Clear` during mapping.
pub fn theme_for(condition: WeatherCondition) -> &'static WeatherTheme {
	match condition {
		WeatherCondition::Sunny => &SUNNY,
		WeatherCondition::ClearNight => &CLEAR_NIGHT,
		WeatherCondition::Rain => &RAIN,
		WeatherCondition::Cloudy => &CLOUDY,
		WeatherCondition::CloudyNight => &CLOUDY_NIGHT,
		WeatherCondition::Snow => &SNOW,
		WeatherCondition::Thunder => &THUNDER,
		WeatherCondition::Clear => &CLEAR,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn theme_name_matches_condition_tag() {
		for condition in [
			WeatherCondition::Sunny,
			WeatherCondition::ClearNight,
			WeatherCondition::Rain,
			WeatherCondition::Cloudy,
			WeatherCondition::CloudyNight,
			WeatherCondition::Snow,
			WeatherCondition::Thunder,
			WeatherCondition::Clear,
		] {
			assert_eq!(theme_for(condition).name, condition.as_str());
		}
	}

	#[test]
	fn depth_scaling_brightens_and_clamps() {
		let color = Color::rgb(200, 100, 50);
		let (far_r, _, _) = color.depth_scaled(0.0);
		let (near_r, near_g, _) = color.depth_scaled(1.0);
		assert_eq!(far_r, 160);
		assert_eq!(near_r, 240);
		assert_eq!(near_g, 120);

		// A bright channel saturates rather than wrapping.
		let (r, _, _) = Color::rgb(255, 0, 0).depth_scaled(1.0);
		assert_eq!(r, 255);
	}

	#[test]
	fn css_formatting() {
		assert_eq!(Color::rgb(255, 215, 100).to_css(), "#ffd764");
		assert_eq!(
			Color::rgba(150, 180, 220, 0.5).to_css(),
			"rgba(150, 180, 220, 0.5)"
		);
	}
}
