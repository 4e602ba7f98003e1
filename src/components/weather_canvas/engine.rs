//! Fixed-capacity particle pool and the per-frame simulation step.
//!
//! The engine owns every piece of mutable simulation state and advances it
//! with a synchronous [`ParticleEngine::tick`]; it never touches browser APIs,
//! which keeps the frame step directly testable.

use log::debug;

use super::config::ParticleConfig;
use super::particles::{Particle, SimRng, Splash};
use crate::weather::condition::WeatherCondition;

/// Thunderstorm flash state. Exists only while the condition is `thunder`.
#[derive(Clone, Debug, Default)]
pub struct Lightning {
	/// Flash intensity in [0, 1]; decays by 0.08 each frame.
	pub flash: f64,
	/// Main bolt polyline, regenerated each frame while the flash is bright
	/// so the bolt flickers.
	pub bolt: Vec<(f64, f64)>,
	/// Short fork segments off the main bolt: (origin, tip).
	pub branches: Vec<((f64, f64), (f64, f64))>,
	since_strike: f64,
	next_strike: f64,
}

impl Lightning {
	const DECAY: f64 = 0.08;
	/// Intensity above which the bolt itself is visible (below it only the
	/// full-screen flash wash remains).
	const BOLT_THRESHOLD: f64 = 0.8;

	fn armed(rng: &mut SimRng) -> Self {
		Self {
			next_strike: rng.range(3.0, 8.0),
			..Self::default()
		}
	}

	/// Advance the strike timer by `dt` seconds and decay the current flash.
	fn step(&mut self, dt: f64, width: f64, height: f64, rng: &mut SimRng) {
		self.flash = (self.flash - Self::DECAY).max(0.0);

		self.since_strike += dt;
		if self.since_strike >= self.next_strike {
			self.since_strike = 0.0;
			self.next_strike = rng.range(3.0, 8.0);
			self.flash = 1.0;
			debug!("lightning strike, next in {:.1}s", self.next_strike);
		}

		if self.flash > Self::BOLT_THRESHOLD {
			self.regenerate_bolt(width, height, rng);
		} else {
			self.bolt.clear();
			self.branches.clear();
		}
	}

	/// Jagged descent from a random top position to ~70% of canvas height,
	/// with probabilistic forks.
	fn regenerate_bolt(&mut self, width: f64, height: f64, rng: &mut SimRng) {
		self.bolt.clear();
		self.branches.clear();

		let mut x = rng.range(width * 0.2, width * 0.8);
		let mut y = 0.0;
		self.bolt.push((x, y));

		while y < height * 0.7 {
			x += rng.range(-30.0, 30.0);
			y += rng.range(20.0, 50.0);
			self.bolt.push((x, y));

			if rng.chance(0.3) {
				let fork = (x + rng.range(-50.0, 50.0), y + rng.range(20.0, 40.0));
				self.branches.push(((x, y), fork));
			}
		}
	}
}

/// Weather particle simulation over a fixed-size pool.
///
/// The pool is sized once from canvas area and the condition's density
/// divisor. Particles leaving the frame are reset in place rather than
/// reallocated, so steady-state frames allocate nothing (splashes and bolt
/// geometry are the only transient allocations, both small and short-lived).
/// A condition change is handled by building a whole new engine.
pub struct ParticleEngine {
	particles: Vec<Particle>,
	splashes: Vec<Splash>,
	config: ParticleConfig,
	width: f64,
	height: f64,
	/// Horizontal push from wind, pre-divided: clamp(wind, 0, 100) / 20.
	wind_factor: f64,
	/// Stars ignore wind entirely.
	wind_immune: bool,
	lightning: Option<Lightning>,
	rng: SimRng,
}

impl ParticleEngine {
	/// Build the pool for a condition and viewport. Initial particles are
	/// scattered over the full height so the field starts dense rather than
	/// raining in from the top edge.
	pub fn new(
		condition: WeatherCondition,
		width: f64,
		height: f64,
		wind_speed: f64,
		seed: u64,
	) -> Self {
		let config = ParticleConfig::for_condition(condition);
		let mut rng = SimRng::new(seed);
		let wind_immune = condition == WeatherCondition::ClearNight;
		let wind_factor = if wind_immune {
			0.0
		} else {
			wind_speed.clamp(0.0, 100.0) / 20.0
		};

		let count = config.pool_size(width, height);
		let mut particles = Vec::with_capacity(count);
		for _ in 0..count {
			let mut particle = Particle::spawn(&config, width, wind_factor, &mut rng);
			particle.y = rng.range(0.0, height);
			particles.push(particle);
		}

		let lightning = config.lightning.then(|| Lightning::armed(&mut rng));

		Self {
			particles,
			splashes: Vec::new(),
			config,
			width,
			height,
			wind_factor,
			wind_immune,
			lightning,
			rng,
		}
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn splashes(&self) -> &[Splash] {
		&self.splashes
	}

	pub fn lightning(&self) -> Option<&Lightning> {
		self.lightning.as_ref()
	}

	pub fn config(&self) -> &ParticleConfig {
		&self.config
	}

	/// Current simulation bounds (canvas pixel size).
	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Track a viewport change. Bounds are updated so recycling targets the
	/// new edges, but the pool deliberately keeps its size; the count only
	/// changes when the condition does.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Advance the simulation one frame. `dt` is elapsed seconds and feeds
	/// only the lightning strike timer; particle motion is stepped in
	/// per-frame units tuned for a 60 Hz callback.
	pub fn tick(&mut self, dt: f64) {
		self.step_particles();
		self.step_splashes();
		if let Some(lightning) = self.lightning.as_mut() {
			lightning.step(dt, self.width, self.height, &mut self.rng);
		}
	}

	fn step_particles(&mut self) {
		let Self {
			particles,
			splashes,
			config,
			width,
			height,
			wind_factor,
			wind_immune,
			rng,
			..
		} = self;
		let (width, height) = (*width, *height);
		let wind_drift = if *wind_immune { 0.0 } else { *wind_factor };

		for p in particles.iter_mut() {
			// Parallax: deeper particles fall slower and read dimmer.
			p.y += p.speed * (0.5 + p.depth * 0.5);
			p.x += p.drift;
			if !*wind_immune {
				p.x += *wind_factor * 0.5;
			}

			if config.wobble {
				p.wobble_phase += p.wobble_speed;
				p.x += p.wobble_phase.sin() * 0.5;
			}

			if config.float_up {
				// Net upward motion dominates the downward base speed.
				p.y -= p.speed * 1.5;
			}

			if config.sparkle {
				p.sparkle_phase += config.twinkle_speed;
				p.opacity = p.base_opacity * (0.5 + p.sparkle_phase.sin() * 0.5);
			}

			if p.y > height + 20.0 {
				if config.splash && rng.chance(0.3) {
					splashes.push(Splash::new(p.x, height - 5.0, rng));
				}
				p.reset(config, width, wind_drift, rng);
			} else if p.y < -30.0 && config.float_up {
				p.y = height + 20.0;
			}

			if p.x > width + 20.0 {
				p.x = -20.0;
				// Strong drift would otherwise produce visible diagonal bands.
				if p.drift.abs() > 2.0 {
					p.y = rng.range(0.0, height);
				}
			} else if p.x < -20.0 {
				p.x = width + 20.0;
				if p.drift.abs() > 2.0 {
					p.y = rng.range(0.0, height);
				}
			}
		}
	}

	fn step_splashes(&mut self) {
		for splash in &mut self.splashes {
			splash.step();
		}
		self.splashes.retain(Splash::alive);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const DT: f64 = 0.016;

	fn engine(condition: WeatherCondition) -> ParticleEngine {
		ParticleEngine::new(condition, 800.0, 600.0, 0.0, 0xC0FFEE)
	}

	#[test]
	fn pool_size_is_area_over_density_and_never_changes() {
		let mut engine = engine(WeatherCondition::Rain);
		assert_eq!(engine.particles().len(), 80); // floor(800 * 600 / 6000)

		for _ in 0..500 {
			engine.tick(DT);
			assert_eq!(engine.particles().len(), 80);
		}
	}

	#[test]
	fn resize_updates_bounds_but_not_the_pool() {
		let mut engine = engine(WeatherCondition::Snow);
		let before = engine.particles().len();
		engine.resize(2560.0, 1440.0);
		assert_eq!(engine.size(), (2560.0, 1440.0));
		assert_eq!(engine.particles().len(), before);
	}

	#[test]
	fn fallen_particles_are_recycled_above_the_frame() {
		let mut engine = engine(WeatherCondition::Rain);
		let (_, height) = engine.size();

		let mut recycled = 0;
		for _ in 0..2_000 {
			let before: Vec<f64> = engine.particles().iter().map(|p| p.y).collect();
			engine.tick(DT);
			for (p, old_y) in engine.particles().iter().zip(&before) {
				// Motion-then-recycle: no particle survives a frame beyond
				// the exit line.
				assert!(p.y <= height + 20.0);
				if p.y < *old_y && p.y < 0.0 {
					recycled += 1;
				}
			}
		}
		assert!(recycled > 0, "no raindrop was ever recycled");
	}

	#[test]
	fn sparkle_opacity_stays_within_base_amplitude() {
		let mut engine = engine(WeatherCondition::Sunny);
		for _ in 0..1_000 {
			engine.tick(DT);
			for p in engine.particles() {
				assert!(p.opacity >= 0.0);
				assert!(p.opacity <= p.base_opacity + 1e-12);
			}
		}
	}

	#[test]
	fn star_field_ignores_wind() {
		let calm = ParticleEngine::new(WeatherCondition::ClearNight, 800.0, 600.0, 0.0, 5);
		let storm = ParticleEngine::new(WeatherCondition::ClearNight, 800.0, 600.0, 95.0, 5);

		// Same seed, same drift: the wind contribution is zero for stars.
		for (a, b) in calm.particles().iter().zip(storm.particles()) {
			assert_eq!(a.drift, b.drift);
			assert!((-0.05..0.05).contains(&a.drift));
		}
	}

	#[test]
	fn wind_shifts_drift_for_everything_else() {
		let config = ParticleConfig::for_condition(WeatherCondition::Snow);
		let storm = ParticleEngine::new(WeatherCondition::Snow, 800.0, 600.0, 200.0, 5);
		// Wind speed clamps at 100 -> factor 5.0 added to every drift.
		for p in storm.particles() {
			assert!(p.drift >= config.drift.0 + 5.0);
			assert!(p.drift < config.drift.1 + 5.0);
		}
	}

	#[test]
	fn floating_dust_wraps_to_the_bottom() {
		let mut engine = engine(WeatherCondition::Clear);
		let (_, height) = engine.size();

		let mut wrapped = false;
		for _ in 0..200_000 {
			let before: Vec<f64> = engine.particles().iter().map(|p| p.y).collect();
			engine.tick(DT);
			if engine
				.particles()
				.iter()
				.zip(&before)
				.any(|(p, old_y)| p.y > *old_y + height / 2.0)
			{
				wrapped = true;
				break;
			}
		}
		assert!(wrapped, "no dust mote ever wrapped from top to bottom");
	}

	#[test]
	fn splashes_spawn_from_rain_and_die_at_zero_life() {
		let mut engine = engine(WeatherCondition::Rain);

		let mut seen = false;
		for _ in 0..2_000 {
			engine.tick(DT);
			for splash in engine.splashes() {
				seen = true;
				assert!(splash.life > 0.0, "dead splash retained");
			}
		}
		assert!(seen, "rain never produced a splash");
	}

	#[test]
	fn non_rain_conditions_never_splash() {
		let mut engine = engine(WeatherCondition::Thunder);
		for _ in 0..2_000 {
			engine.tick(DT);
			assert!(engine.splashes().is_empty());
		}
	}

	#[test]
	fn lightning_exists_only_for_thunder() {
		assert!(engine(WeatherCondition::Thunder).lightning().is_some());
		assert!(engine(WeatherCondition::Rain).lightning().is_none());
		assert!(engine(WeatherCondition::Clear).lightning().is_none());
	}

	#[test]
	fn lightning_strikes_then_decays_to_zero() {
		let mut engine = engine(WeatherCondition::Thunder);

		// The first strike window is 3-8s; a 10s step guarantees a strike.
		engine.tick(10.0);
		let lightning = engine.lightning().unwrap();
		assert_eq!(lightning.flash, 1.0);
		assert!(
			lightning.bolt.len() >= 2,
			"bright flash must carry a bolt polyline"
		);
		assert!(lightning.bolt.iter().all(|&(_, y)| y <= 600.0 * 0.7 + 50.0));

		// Decay at 0.08/frame: below the bolt threshold after 3 frames,
		// fully dark within 13.
		let mut previous = 1.0;
		for frame in 1..=13 {
			engine.tick(DT);
			let lightning = engine.lightning().unwrap();
			assert!(lightning.flash < previous || lightning.flash == 0.0);
			if lightning.flash <= 0.8 {
				assert!(
					lightning.bolt.is_empty() && lightning.branches.is_empty(),
					"bolt geometry must clear once the flash dims (frame {frame})"
				);
			}
			previous = lightning.flash;
		}
		assert_eq!(engine.lightning().unwrap().flash, 0.0);
	}

	#[test]
	fn cloudy_night_scenario_density() {
		// Weather code 3 at night resolves to cloudy-night (density 12000).
		let condition = crate::weather::condition::condition_for_code(3, false);
		assert_eq!(condition, WeatherCondition::CloudyNight);
		let engine = ParticleEngine::new(condition, 1200.0, 800.0, 10.0, 1);
		assert_eq!(engine.particles().len(), 80); // floor(960000 / 12000)
	}
}
