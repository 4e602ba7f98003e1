//! Simulation entities: pooled particles, splash rings, and the deterministic
//! random stream that drives them.

use std::f64::consts::TAU;

use super::config::{ParticleConfig, ParticleShape};

/// Deterministic pseudo-random stream (xorshift64*).
///
/// Keeps the simulation free of host randomness so frames are reproducible in
/// tests; the component seeds it from the wall clock.
#[derive(Clone, Debug)]
pub struct SimRng {
	state: u64,
}

impl SimRng {
	pub fn new(seed: u64) -> Self {
		// Zero is a fixed point of xorshift; nudge it away.
		Self {
			state: seed | 0x9e37_79b9_7f4a_7c15,
		}
	}

	/// Next value in [0, 1).
	pub fn next_f64(&mut self) -> f64 {
		let mut x = self.state;
		x ^= x << 13;
		x ^= x >> 7;
		x ^= x << 17;
		self.state = x;
		(x.wrapping_mul(0x2545_f491_4f6c_dd1d) >> 11) as f64 / (1u64 << 53) as f64
	}

	/// Uniform value in [min, max).
	pub fn range(&mut self, min: f64, max: f64) -> f64 {
		min + self.next_f64() * (max - min)
	}

	/// True with probability `p`.
	pub fn chance(&mut self, p: f64) -> bool {
		self.next_f64() < p
	}
}

/// A single pooled particle. Slots are recycled in place when they leave the
/// frame; the pool never grows or shrinks between condition changes.
#[derive(Clone, Debug, Default)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub size: f64,
	pub speed: f64,
	pub drift: f64,
	pub opacity: f64,
	pub base_opacity: f64,
	pub wobble_phase: f64,
	pub wobble_speed: f64,
	pub sparkle_phase: f64,
	/// Parallax factor in [0, 1]; scales fall speed and color brightness.
	pub depth: f64,
}

impl Particle {
	/// Fresh particle just above the top edge.
	pub fn spawn(
		config: &ParticleConfig,
		width: f64,
		wind_drift: f64,
		rng: &mut SimRng,
	) -> Self {
		let mut particle = Self::default();
		particle.reset(config, width, wind_drift, rng);
		particle
	}

	/// Re-seed this slot with fresh random attributes at the top of the frame.
	/// `wind_drift` is added to the base drift (zero for the star field).
	pub fn reset(
		&mut self,
		config: &ParticleConfig,
		width: f64,
		wind_drift: f64,
		rng: &mut SimRng,
	) {
		self.x = rng.range(0.0, width);
		self.y = match config.shape {
			ParticleShape::Line => -20.0,
			ParticleShape::Circle => -10.0,
		};
		self.size = rng.range(config.size.0, config.size.1);
		self.speed = rng.range(config.speed.0, config.speed.1);
		self.drift = rng.range(config.drift.0, config.drift.1) + wind_drift;
		self.opacity = rng.range(config.opacity.0, config.opacity.1);
		self.base_opacity = self.opacity;
		self.wobble_phase = rng.range(0.0, TAU);
		self.wobble_speed = rng.range(0.02, 0.05);
		self.sparkle_phase = rng.range(0.0, TAU);
		self.depth = rng.next_f64();
	}
}

/// Expanding ring spawned when a raindrop exits the bottom edge. Far rarer
/// than particles, so splashes are mark-and-filtered rather than pooled.
#[derive(Clone, Debug)]
pub struct Splash {
	pub x: f64,
	pub y: f64,
	/// Remaining life in [0, 1]; the splash is removed once it reaches zero.
	pub life: f64,
	max_radius: f64,
}

impl Splash {
	const DECAY: f64 = 0.05;

	pub fn new(x: f64, y: f64, rng: &mut SimRng) -> Self {
		Self {
			x,
			y,
			life: 1.0,
			max_radius: rng.range(4.0, 8.0),
		}
	}

	/// Advance one frame.
	pub fn step(&mut self) {
		self.life -= Self::DECAY;
	}

	/// Ring radius, growing as life decays.
	pub fn radius(&self) -> f64 {
		self.max_radius * (1.0 - self.life)
	}

	pub fn alive(&self) -> bool {
		self.life > 0.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::weather::condition::WeatherCondition;

	#[test]
	fn rng_stays_in_unit_interval() {
		let mut rng = SimRng::new(42);
		for _ in 0..10_000 {
			let v = rng.next_f64();
			assert!((0.0..1.0).contains(&v));
		}
	}

	#[test]
	fn rng_range_respects_bounds() {
		let mut rng = SimRng::new(7);
		for _ in 0..1_000 {
			let v = rng.range(-1.5, 1.5);
			assert!((-1.5..1.5).contains(&v));
		}
	}

	#[test]
	fn reset_places_particles_above_the_frame() {
		let mut rng = SimRng::new(1);
		let rain = ParticleConfig::for_condition(WeatherCondition::Rain);
		let snow = ParticleConfig::for_condition(WeatherCondition::Snow);

		let drop = Particle::spawn(&rain, 800.0, 0.0, &mut rng);
		assert_eq!(drop.y, -20.0); // Streaks start higher
		assert!((0.0..800.0).contains(&drop.x));
		assert!((4.0..12.0).contains(&drop.size));
		assert!((12.0..20.0).contains(&drop.speed));

		let flake = Particle::spawn(&snow, 800.0, 0.0, &mut rng);
		assert_eq!(flake.y, -10.0);
		assert!((0.0..=1.0).contains(&flake.depth));
		assert_eq!(flake.opacity, flake.base_opacity);
	}

	#[test]
	fn reset_applies_wind_to_drift() {
		let mut rng = SimRng::new(3);
		let rain = ParticleConfig::for_condition(WeatherCondition::Rain);
		let wind_drift = 5.0;
		for _ in 0..100 {
			let drop = Particle::spawn(&rain, 800.0, wind_drift, &mut rng);
			assert!(drop.drift >= rain.drift.0 + wind_drift);
			assert!(drop.drift < rain.drift.1 + wind_drift);
		}
	}

	#[test]
	fn splash_dies_after_twenty_frames_and_grows_until_then() {
		let mut rng = SimRng::new(11);
		let mut splash = Splash::new(100.0, 595.0, &mut rng);
		assert_eq!(splash.radius(), 0.0);

		let mut previous = splash.radius();
		for frame in 1..=20 {
			splash.step();
			if frame < 20 {
				assert!(splash.alive(), "died early at frame {frame}");
				assert!(splash.radius() > previous);
				previous = splash.radius();
			}
		}
		assert!(!splash.alive());
	}
}
