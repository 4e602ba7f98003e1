//! weather-overlay: live-weather particle backdrop for the portfolio site.
//!
//! This crate resolves the visitor's local weather (browser geolocation with
//! an IP-based fallback, then an Open-Meteo current-conditions lookup) and
//! renders a full-viewport canvas particle field that matches it: drifting
//! rain streaks with splash rings, wobbling snow, twinkling stars, lightning
//! flashes during thunderstorms. Resolution is best-effort; the overlay
//! always renders, falling back to a calm "clear" field when anything fails.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod components;
pub mod weather;

pub use components::weather_canvas::WeatherCanvas;
pub use weather::condition::{WeatherCondition, condition_for_code};
pub use weather::context::{PermissionState, WeatherContext, provide_weather, use_weather};
pub use weather::theme::{WeatherTheme, theme_for};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("weather-overlay: logging initialized");
}

/// Main application component: provides the shared weather state, starts
/// resolution once, and mounts the canvas overlay.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let weather = provide_weather();

	// Informational only; shown while the browser permission prompt is open.
	let show_hint =
		move || weather.loading.get() && weather.permission.get() == PermissionState::Prompt;

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Weather Overlay" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<WeatherCanvas />
		<Show when=show_hint>
			<div class="weather-hint">
				"Allow location access for a backdrop that matches your local weather."
			</div>
		</Show>
	}
}
