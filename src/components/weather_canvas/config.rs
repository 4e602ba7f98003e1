//! Per-condition particle tuning.
//!
//! This table is the core visual policy: each condition gets a density divisor
//! (canvas area per particle), randomization ranges for the per-particle
//! attributes, a shape, and the flags for its special behaviors.

use crate::weather::condition::WeatherCondition;

/// Geometry used when drawing a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleShape {
	/// Filled arc, optionally with a radial glow halo.
	Circle,
	/// Stroked streak tilted by drift (rain, thunder).
	Line,
}

/// Tunable parameters for one condition's particle field.
#[derive(Clone, Copy, Debug)]
pub struct ParticleConfig {
	/// Canvas area in px^2 per particle; pool size = floor(w * h / density).
	pub density: f64,
	/// Min/max size (circle radius or streak length).
	pub size: (f64, f64),
	/// Min/max vertical speed per frame.
	pub speed: (f64, f64),
	/// Min/max horizontal drift per frame (before wind).
	pub drift: (f64, f64),
	/// Min/max base opacity.
	pub opacity: (f64, f64),
	pub shape: ParticleShape,
	/// Radial halo around circles larger than 1.5px.
	pub glow: bool,
	/// Periodic opacity oscillation (sun sparkle, star twinkle).
	pub sparkle: bool,
	/// Sparkle phase advance per frame.
	pub twinkle_speed: f64,
	/// Lateral sinusoidal perturbation (snow).
	pub wobble: bool,
	/// Net upward motion with wrap at the top (clear-sky dust).
	pub float_up: bool,
	/// Spawn a splash ring when a particle exits the bottom edge (rain).
	pub splash: bool,
	/// Periodic lightning flashes (thunder).
	pub lightning: bool,
	/// Fade opacity near the left/right edges (cloud banks).
	pub fade_edges: bool,
}

const DEFAULTS: ParticleConfig = ParticleConfig {
	density: 30000.0,
	size: (0.3, 1.5),
	speed: (0.02, 0.08),
	drift: (-0.2, 0.2),
	opacity: (0.1, 0.3),
	shape: ParticleShape::Circle,
	glow: false,
	sparkle: false,
	twinkle_speed: 0.05,
	wobble: false,
	float_up: false,
	splash: false,
	lightning: false,
	fade_edges: false,
};

const SUNNY: ParticleConfig = ParticleConfig {
	density: 25000.0,
	size: (0.5, 2.0),
	speed: (0.05, 0.15),
	drift: (-0.3, 0.3),
	opacity: (0.2, 0.5),
	glow: true,
	sparkle: true,
	..DEFAULTS
};

const CLEAR_NIGHT: ParticleConfig = ParticleConfig {
	density: 15000.0,
	size: (0.5, 2.5),
	speed: (0.01, 0.05), // Stars barely move
	drift: (-0.05, 0.05),
	opacity: (0.3, 0.8),
	glow: true,
	sparkle: true, // Twinkle
	..DEFAULTS
};

const RAIN: ParticleConfig = ParticleConfig {
	density: 6000.0,
	size: (4.0, 12.0),
	speed: (12.0, 20.0),
	drift: (2.0, 4.0),
	opacity: (0.15, 0.4),
	shape: ParticleShape::Line,
	splash: true,
	..DEFAULTS
};

const CLOUDY: ParticleConfig = ParticleConfig {
	density: 18000.0,
	size: (2.0, 6.0),
	speed: (0.1, 0.3),
	drift: (-1.5, 1.5),
	opacity: (0.05, 0.15),
	glow: true,
	fade_edges: true,
	..DEFAULTS
};

const CLOUDY_NIGHT: ParticleConfig = ParticleConfig {
	density: 12000.0,
	size: (2.0, 6.0),
	speed: (0.1, 0.3),
	drift: (-1.5, 1.5),
	opacity: (0.03, 0.1), // Fainter at night
	fade_edges: true,
	..DEFAULTS
};

const SNOW: ParticleConfig = ParticleConfig {
	density: 12000.0,
	size: (1.0, 4.0),
	speed: (0.3, 0.8),
	drift: (-0.8, 0.8),
	opacity: (0.3, 0.7),
	glow: true,
	sparkle: true,
	wobble: true,
	..DEFAULTS
};

const THUNDER: ParticleConfig = ParticleConfig {
	density: 5000.0,
	size: (5.0, 15.0),
	speed: (15.0, 25.0),
	drift: (3.0, 6.0),
	opacity: (0.2, 0.5),
	shape: ParticleShape::Line,
	lightning: true,
	..DEFAULTS
};

const CLEAR: ParticleConfig = ParticleConfig {
	glow: true,
	float_up: true,
	..DEFAULTS
};

impl ParticleConfig {
	/// Look up the tuning for a condition.
	pub fn for_condition(condition: WeatherCondition) -> Self {
		match condition {
			WeatherCondition::Sunny => SUNNY,
			WeatherCondition::ClearNight => CLEAR_NIGHT,
			WeatherCondition::Rain => RAIN,
			WeatherCondition::Cloudy => CLOUDY,
			WeatherCondition::CloudyNight => CLOUDY_NIGHT,
			WeatherCondition::Snow => SNOW,
			WeatherCondition::Thunder => THUNDER,
			WeatherCondition::Clear => CLEAR,
		}
	}

	/// Number of pooled particles for a canvas of the given pixel size.
	pub fn pool_size(&self, width: f64, height: f64) -> usize {
		(width * height / self.density).floor() as usize
	}
}
