//! Full-viewport animated weather canvas.
//!
//! Renders a fixed, pointer-transparent particle overlay whose visual
//! character follows the resolved weather condition:
//! - A fixed-capacity particle pool sized from canvas area, recycled in place
//! - Per-condition physics (fall speed, drift, wobble, twinkle, wind)
//! - Secondary effects: rain splash rings and thunderstorm lightning
//! - A `requestAnimationFrame` loop that pauses while scrolled out of view
//!   and is torn down completely on unmount
//!
//! The simulation ([`engine`]) is free of browser APIs so the frame step can
//! be exercised directly in tests; all drawing lives in [`render`].

mod component;
pub mod config;
pub mod engine;
pub mod particles;
mod render;

pub use component::WeatherCanvas;
