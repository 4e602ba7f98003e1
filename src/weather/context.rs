//! Shared reactive weather state and the one-shot resolution pipeline.
//!
//! [`provide_weather`] registers a [`WeatherContext`] with the Leptos context
//! tree and starts resolution: browser geolocation first, ipapi.co as the
//! fallback, then an Open-Meteo current-conditions lookup. Resolution is
//! single-flight and best-effort; every failure collapses to the `clear`
//! condition so the canvas can always render.

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen_futures::spawn_local;

use super::condition::{WeatherCondition, condition_for_code};
use super::fetch::{CurrentWeather, fetch_current_weather, fetch_ip_location};
use super::theme::{WeatherTheme, theme_for};

/// Browser location-permission flow state. Terminal once `Granted` or
/// `Denied` is reached for the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PermissionState {
	/// The permission request has not been answered yet.
	#[default]
	Prompt,
	/// Geolocation succeeded.
	Granted,
	/// Geolocation failed or was refused; the IP fallback takes over.
	Denied,
}

/// Reactive weather state shared with the rest of the application.
///
/// A `Copy` bundle of signals, cheap to move into event closures. Created
/// once per session by [`provide_weather`] and never reset.
#[derive(Clone, Copy)]
pub struct WeatherContext {
	/// Resolved condition; stays `Clear` until (and unless) resolution succeeds.
	pub condition: RwSignal<WeatherCondition>,
	/// True until resolution finishes, successfully or not. While loading the
	/// overlay keeps itself transparent.
	pub loading: RwSignal<bool>,
	/// Wind speed in km/h from the weather provider.
	pub wind_speed: RwSignal<f64>,
	/// Location permission flow state.
	pub permission: RwSignal<PermissionState>,
	/// Single-flight guard so remounts never re-trigger resolution.
	started: StoredValue<bool>,
}

impl WeatherContext {
	fn new() -> Self {
		Self {
			condition: RwSignal::new(WeatherCondition::Clear),
			loading: RwSignal::new(true),
			wind_speed: RwSignal::new(0.0),
			permission: RwSignal::new(PermissionState::Prompt),
			started: StoredValue::new(false),
		}
	}

	/// Theme for the currently resolved condition. Reactive read.
	pub fn theme(&self) -> &'static WeatherTheme {
		theme_for(self.condition.get())
	}

	/// Start the location -> weather resolution chain. Idempotent: only the
	/// first call does anything, so remounting a consumer cannot fire
	/// duplicate requests.
	pub fn resolve(self) {
		if self.started.get_value() {
			return;
		}
		self.started.set_value(true);

		let geolocation = web_sys::window().and_then(|w| w.navigator().geolocation().ok());
		let Some(geolocation) = geolocation else {
			// No geolocation API at all; go straight to the IP fallback.
			self.ip_fallback();
			return;
		};

		self.permission.set(PermissionState::Prompt);

		let on_success = Closure::once_into_js(move |position: web_sys::Position| {
			self.permission.set(PermissionState::Granted);
			let coords = position.coords();
			self.lookup_weather(coords.latitude(), coords.longitude());
		});
		let on_error = Closure::once_into_js(move |error: web_sys::PositionError| {
			info!(
				"weather: geolocation unavailable ({}), trying IP fallback",
				error.message()
			);
			self.permission.set(PermissionState::Denied);
			self.ip_fallback();
		});

		if geolocation
			.get_current_position_with_error_callback(
				on_success.unchecked_ref(),
				Some(on_error.unchecked_ref()),
			)
			.is_err()
		{
			self.permission.set(PermissionState::Denied);
			self.ip_fallback();
		}
	}

	fn lookup_weather(self, lat: f64, lon: f64) {
		spawn_local(async move {
			match fetch_current_weather(lat, lon).await {
				Ok(weather) => self.apply_weather(weather),
				Err(e) => self.fail("weather lookup failed", &e),
			}
		});
	}

	fn ip_fallback(self) {
		spawn_local(async move {
			match fetch_ip_location().await {
				Ok((lat, lon)) => match fetch_current_weather(lat, lon).await {
					Ok(weather) => self.apply_weather(weather),
					Err(e) => self.fail("weather lookup failed", &e),
				},
				Err(e) => self.fail("IP location lookup failed", &e),
			}
		});
	}

	fn apply_weather(self, weather: CurrentWeather) {
		let condition = condition_for_code(weather.weathercode, weather.is_day != 0);
		info!(
			"weather: code {} (day: {}) -> {condition}, wind {} km/h",
			weather.weathercode, weather.is_day, weather.windspeed
		);
		self.wind_speed.set(weather.windspeed);
		self.condition.set(condition);
		self.loading.set(false);
	}

	fn fail(self, what: &str, error: &dyn std::fmt::Display) {
		warn!("weather: {what}: {error}");
		self.condition.set(WeatherCondition::Clear);
		self.loading.set(false);
	}
}

/// Create the session-wide weather context, register it with Leptos, and kick
/// off resolution.
pub fn provide_weather() -> WeatherContext {
	let ctx = WeatherContext::new();
	provide_context(ctx);
	ctx.resolve();
	ctx
}

/// Access the weather context registered by [`provide_weather`].
///
/// # Panics
///
/// Panics if no ancestor called [`provide_weather`].
pub fn use_weather() -> WeatherContext {
	expect_context::<WeatherContext>()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::weather::fetch::CurrentWeather;

	#[test]
	fn starts_clear_and_loading() {
		let ctx = WeatherContext::new();
		assert_eq!(ctx.condition.get_untracked(), WeatherCondition::Clear);
		assert!(ctx.loading.get_untracked());
		assert_eq!(ctx.permission.get_untracked(), PermissionState::Prompt);
		assert_eq!(ctx.wind_speed.get_untracked(), 0.0);
		assert_eq!(ctx.theme().name, "clear");
	}

	#[test]
	fn applying_weather_resolves_condition_and_ends_loading() {
		let ctx = WeatherContext::new();
		ctx.apply_weather(CurrentWeather {
			weathercode: 3,
			is_day: 0,
			windspeed: 22.5,
		});
		assert_eq!(ctx.condition.get_untracked(), WeatherCondition::CloudyNight);
		assert!(!ctx.loading.get_untracked());
		assert_eq!(ctx.wind_speed.get_untracked(), 22.5);
		assert_eq!(ctx.theme().name, "cloudy-night");
	}

	#[test]
	fn failure_collapses_to_clear() {
		let ctx = WeatherContext::new();
		ctx.permission.set(PermissionState::Denied);
		ctx.fail("IP location lookup failed", &"network error");
		assert_eq!(ctx.condition.get_untracked(), WeatherCondition::Clear);
		assert!(!ctx.loading.get_untracked());
		assert_eq!(ctx.permission.get_untracked(), PermissionState::Denied);
	}
}
