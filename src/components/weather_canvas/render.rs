//! Canvas drawing for the weather overlay.
//!
//! Draw order per frame: ambient glow wash, particles, splash rings,
//! lightning flash and bolt. All geometry comes from the engine; this module
//! only translates it into `CanvasRenderingContext2d` calls.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::config::ParticleShape;
use super::engine::{Lightning, ParticleEngine};
use crate::weather::theme::WeatherTheme;

/// Renders one frame of the overlay.
pub fn render(engine: &ParticleEngine, ctx: &CanvasRenderingContext2d, theme: &WeatherTheme) {
	let (width, height) = engine.size();
	ctx.clear_rect(0.0, 0.0, width, height);

	if engine.config().glow {
		draw_ambient_glow(ctx, theme, width, height);
	}

	draw_particles(engine, ctx, theme);
	draw_splashes(engine, ctx, theme);

	if let Some(lightning) = engine.lightning() {
		draw_lightning(lightning, ctx, width, height);
	}
}

/// Soft radial wash centered above the fold, tinted by the theme glow color.
fn draw_ambient_glow(
	ctx: &CanvasRenderingContext2d,
	theme: &WeatherTheme,
	width: f64,
	height: f64,
) {
	let gradient = ctx
		.create_radial_gradient(
			width / 2.0,
			height / 3.0,
			0.0,
			width / 2.0,
			height / 3.0,
			width * 0.8,
		)
		.unwrap();

	let glow = theme.glow_color;
	gradient
		.add_color_stop(
			0.0,
			&format!("rgba({}, {}, {}, 0.1)", glow.r, glow.g, glow.b),
		)
		.unwrap();
	gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0)").unwrap();

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, width, height);
}

/// Opacity falloff within 15% of the left/right edges, for cloud banks.
fn edge_fade(x: f64, width: f64) -> f64 {
	let margin = width * 0.15;
	(x / margin).min((width - x) / margin).clamp(0.0, 1.0)
}

fn draw_particles(engine: &ParticleEngine, ctx: &CanvasRenderingContext2d, theme: &WeatherTheme) {
	let config = engine.config();
	let (width, _) = engine.size();

	for p in engine.particles() {
		let (r, g, b) = theme.particle_color.depth_scaled(p.depth);
		let mut alpha = p.opacity;
		if config.fade_edges {
			alpha *= edge_fade(p.x, width);
		}

		ctx.begin_path();
		match config.shape {
			ParticleShape::Line => {
				// Streak tilted by drift, so wind-blown rain leans over.
				ctx.set_stroke_style_str(&format!("rgba({r}, {g}, {b}, {alpha})"));
				ctx.set_line_width(1.0 + p.depth);
				ctx.move_to(p.x, p.y);
				ctx.line_to(p.x + p.drift * 2.0, p.y + p.size);
				ctx.stroke();
			}
			ParticleShape::Circle => {
				if config.glow && p.size > 1.5 {
					let gradient = ctx
						.create_radial_gradient(p.x, p.y, 0.0, p.x, p.y, p.size * 3.0)
						.unwrap();
					gradient
						.add_color_stop(0.0, &format!("rgba({r}, {g}, {b}, {alpha})"))
						.unwrap();
					gradient
						.add_color_stop(0.5, &format!("rgba({r}, {g}, {b}, {})", alpha * 0.3))
						.unwrap();
					gradient
						.add_color_stop(1.0, &format!("rgba({r}, {g}, {b}, 0)"))
						.unwrap();
					#[allow(deprecated)]
					ctx.set_fill_style(&gradient);
					let _ = ctx.arc(p.x, p.y, p.size * 3.0, 0.0, PI * 2.0);
				} else {
					ctx.set_fill_style_str(&format!("rgba({r}, {g}, {b}, {alpha})"));
					let _ = ctx.arc(p.x, p.y, p.size, 0.0, PI * 2.0);
				}
				ctx.fill();
			}
		}
	}
}

fn draw_splashes(engine: &ParticleEngine, ctx: &CanvasRenderingContext2d, theme: &WeatherTheme) {
	let color = theme.particle_color;
	for splash in engine.splashes() {
		ctx.begin_path();
		ctx.set_stroke_style_str(&format!(
			"rgba({}, {}, {}, {})",
			color.r,
			color.g,
			color.b,
			splash.life * 0.3
		));
		ctx.set_line_width(1.0);
		let _ = ctx.arc(splash.x, splash.y, splash.radius(), 0.0, PI * 2.0);
		ctx.stroke();
	}
}

fn draw_lightning(
	lightning: &Lightning,
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
) {
	if lightning.flash <= 0.0 {
		return;
	}

	// Full-screen flash wash.
	ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", lightning.flash * 0.15));
	ctx.fill_rect(0.0, 0.0, width, height);

	// The bolt is only populated while the flash is bright.
	if lightning.bolt.len() >= 2 {
		ctx.set_stroke_style_str(&format!("rgba(200, 200, 255, {})", lightning.flash));
		ctx.set_line_width(2.0);
		ctx.begin_path();

		let (start_x, start_y) = lightning.bolt[0];
		ctx.move_to(start_x, start_y);
		for &(x, y) in &lightning.bolt[1..] {
			ctx.line_to(x, y);
		}
		for &((from_x, from_y), (to_x, to_y)) in &lightning.branches {
			ctx.move_to(from_x, from_y);
			ctx.line_to(to_x, to_y);
		}
		ctx.stroke();
	}
}
