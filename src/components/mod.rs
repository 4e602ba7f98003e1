//! Leptos UI components.

pub mod weather_canvas;
