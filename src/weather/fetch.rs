//! Thin wrappers over the browser `fetch` API for the two external providers:
//! Open-Meteo (current conditions for a coordinate pair) and ipapi.co
//! (IP-based approximate location, used when geolocation is denied).

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// Failure while talking to a provider. Every variant is absorbed by the
/// resolver (logged, then collapsed to the `clear` condition); nothing here is
/// ever surfaced to the visitor.
#[derive(Debug, Error)]
pub enum FetchError {
	#[error("window object not available")]
	NoWindow,
	#[error("network request failed: {0}")]
	Network(String),
	#[error("provider returned HTTP {0}")]
	Status(u16),
	#[error("unreadable response body: {0}")]
	Body(String),
	#[error("malformed provider payload: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("IP lookup returned no coordinates")]
	NoCoordinates,
}

/// Current conditions as reported by Open-Meteo's `current_weather` object.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct CurrentWeather {
	/// WMO weather code.
	pub weathercode: u16,
	/// 1 during daylight, 0 at night.
	pub is_day: u8,
	/// Wind speed in km/h.
	pub windspeed: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
	current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct IpLocation {
	latitude: Option<f64>,
	longitude: Option<f64>,
}

async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
	let window = web_sys::window().ok_or(FetchError::NoWindow)?;

	let response: Response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(|e| FetchError::Network(format!("{e:?}")))?
		.dyn_into()
		.map_err(|_| FetchError::Network("fetch did not return a Response".into()))?;

	if !response.ok() {
		return Err(FetchError::Status(response.status()));
	}

	let text = JsFuture::from(
		response
			.text()
			.map_err(|e| FetchError::Body(format!("{e:?}")))?,
	)
	.await
	.map_err(|e| FetchError::Body(format!("{e:?}")))?;
	let text = text
		.as_string()
		.ok_or_else(|| FetchError::Body("response body was not text".into()))?;

	Ok(serde_json::from_str(&text)?)
}

/// Fetch current weather for the given coordinates from Open-Meteo.
pub async fn fetch_current_weather(lat: f64, lon: f64) -> Result<CurrentWeather, FetchError> {
	let url = format!(
		"https://api.open-meteo.com/v1/forecast?latitude={lat}&longitude={lon}&current_weather=true"
	);
	let forecast: ForecastResponse = fetch_json(&url).await?;
	Ok(forecast.current_weather)
}

/// Approximate the caller's coordinates from their IP address.
pub async fn fetch_ip_location() -> Result<(f64, f64), FetchError> {
	let location: IpLocation = fetch_json("https://ipapi.co/json/").await?;
	match (location.latitude, location.longitude) {
		(Some(lat), Some(lon)) => Ok((lat, lon)),
		_ => Err(FetchError::NoCoordinates),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_open_meteo_payload() {
		let body = r#"{
			"latitude": 52.52,
			"longitude": 13.42,
			"current_weather": {
				"temperature": 12.3,
				"windspeed": 18.7,
				"winddirection": 230,
				"weathercode": 61,
				"is_day": 0,
				"time": "2024-03-01T21:00"
			}
		}"#;
		let forecast: ForecastResponse = serde_json::from_str(body).unwrap();
		assert_eq!(forecast.current_weather.weathercode, 61);
		assert_eq!(forecast.current_weather.is_day, 0);
		assert!((forecast.current_weather.windspeed - 18.7).abs() < f64::EPSILON);
	}

	#[test]
	fn parses_ip_location_payload() {
		let body = r#"{"ip": "203.0.113.7", "city": "Berlin", "latitude": 52.52, "longitude": 13.42}"#;
		let location: IpLocation = serde_json::from_str(body).unwrap();
		assert_eq!(location.latitude, Some(52.52));
		assert_eq!(location.longitude, Some(13.42));
	}

	#[test]
	fn ip_location_without_coordinates_is_detectable() {
		let body = r#"{"ip": "203.0.113.7", "error": true, "reason": "RateLimited"}"#;
		let location: IpLocation = serde_json::from_str(body).unwrap();
		assert!(location.latitude.is_none() || location.longitude.is_none());
	}
}
