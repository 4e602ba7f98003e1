//! Leptos component wrapping the weather overlay canvas.
//!
//! The component creates a fixed full-viewport canvas and drives the particle
//! engine from a `requestAnimationFrame` loop. A `resize` listener re-sizes
//! the canvas pixel buffer (the pool is not rebuilt), a `scroll` listener
//! pauses drawing while the canvas is scrolled out of view, and a reactive
//! effect swaps in a freshly built engine whenever the resolved condition or
//! wind speed changes. Unmounting cancels the pending frame and detaches both
//! listeners.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::engine::ParticleEngine;
use super::render;
use crate::weather::context::use_weather;
use crate::weather::theme::{WeatherTheme, theme_for};

/// Frame step handed to the engine; the raf callback runs at display rate and
/// the motion constants are tuned for 60 Hz.
const FRAME_DT: f64 = 0.016;

/// State shared between the animation loop and the event listeners.
struct OverlayState {
	engine: ParticleEngine,
	theme: &'static WeatherTheme,
	/// False while the canvas is scrolled out of the viewport; frames are
	/// skipped (no tick, no draw) but the loop keeps re-scheduling.
	visible: bool,
}

/// Browser-side handles that must be released on unmount. Held behind a
/// local-storage `StoredValue` so the (`Send`-bounded) cleanup closure only
/// captures the arena key, not the `Rc`s themselves.
struct OverlayHooks {
	state: Rc<RefCell<Option<OverlayState>>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	scroll_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	raf_id: Rc<Cell<Option<i32>>>,
}

/// Full-viewport animated weather backdrop.
///
/// Mount once, anywhere below [`crate::weather::context::provide_weather`].
/// The canvas ignores pointer events, composites with a screen blend mode,
/// and stays transparent until weather resolution has finished.
#[component]
pub fn WeatherCanvas() -> impl IntoView {
	let weather = use_weather();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<OverlayState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let scroll_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

	// Rebuild the pool when the resolved condition or wind changes. The new
	// engine replaces the old one wholesale between frames, so the loop never
	// observes a partially initialized pool.
	let state_rebuild = state.clone();
	Effect::new(move |_| {
		let condition = weather.condition.get();
		let wind = weather.wind_speed.get();

		let mut slot = state_rebuild.borrow_mut();
		let Some(overlay) = slot.as_mut() else {
			return;
		};
		let (w, h) = overlay.engine.size();
		overlay.engine = ParticleEngine::new(condition, w, h, wind, js_sys::Date::now() as u64);
		overlay.theme = theme_for(condition);
	});

	let (state_init, animate_init, resize_init, scroll_init, raf_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		scroll_cb.clone(),
		raf_id.clone(),
	);
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = (
			window.inner_width().unwrap().as_f64().unwrap(),
			window.inner_height().unwrap().as_f64().unwrap(),
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let condition = weather.condition.get_untracked();
		let wind = weather.wind_speed.get_untracked();
		*state_init.borrow_mut() = Some(OverlayState {
			engine: ParticleEngine::new(condition, w, h, wind, js_sys::Date::now() as u64),
			theme: theme_for(condition),
			visible: true,
		});

		// Viewport resize only touches the pixel buffer and the engine
		// bounds; the pool is rebuilt exclusively on condition change.
		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_init.borrow_mut() = Some(Closure::new(move || {
			let win: Window = web_sys::window().unwrap();
			let (nw, nh) = (
				win.inner_width().unwrap().as_f64().unwrap(),
				win.inner_height().unwrap().as_f64().unwrap(),
			);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut overlay) = *state_resize.borrow_mut() {
				overlay.engine.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		// The overlay only decorates the first viewport-height of the page;
		// past that, skip the work.
		let state_scroll = state_init.clone();
		*scroll_init.borrow_mut() = Some(Closure::new(move || {
			let win: Window = web_sys::window().unwrap();
			let in_view = win.scroll_y().unwrap_or(0.0)
				<= win.inner_height().unwrap().as_f64().unwrap_or(0.0);
			if let Some(ref mut overlay) = *state_scroll.borrow_mut() {
				overlay.visible = in_view;
			}
		}));
		if let Some(ref cb) = *scroll_init.borrow() {
			let _ = window.add_event_listener_with_callback("scroll", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner, raf_anim) =
			(state_init.clone(), animate_init.clone(), raf_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut overlay) = *state_anim.borrow_mut() {
				if overlay.visible {
					overlay.engine.tick(FRAME_DT);
					render::render(&overlay.engine, &ctx, overlay.theme);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				raf_anim.set(
					web_sys::window()
						.unwrap()
						.request_animation_frame(cb.as_ref().unchecked_ref())
						.ok(),
				);
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			raf_init.set(
				window
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.ok(),
			);
		}
	});

	// Unmount: cancel the pending frame and detach both listeners so nothing
	// fires into a torn-down component.
	let hooks = StoredValue::new_local(OverlayHooks {
		state,
		animate,
		resize_cb,
		scroll_cb,
		raf_id,
	});
	on_cleanup(move || {
		hooks.try_update_value(|hooks| {
			if let Some(window) = web_sys::window() {
				if let Some(id) = hooks.raf_id.take() {
					let _ = window.cancel_animation_frame(id);
				}
				if let Some(cb) = hooks.resize_cb.borrow_mut().take() {
					let _ = window
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				if let Some(cb) = hooks.scroll_cb.borrow_mut().take() {
					let _ = window
						.remove_event_listener_with_callback("scroll", cb.as_ref().unchecked_ref());
				}
			}
			// Dropping the closure stops the loop even if cancellation raced
			// a newly scheduled frame.
			hooks.animate.borrow_mut().take();
			hooks.state.borrow_mut().take();
		});
	});

	let opacity = move || if weather.loading.get() { "0" } else { "1" };

	view! {
		<canvas
			node_ref=canvas_ref
			class="weather-canvas"
			style="position: fixed; inset: 0; z-index: 50; pointer-events: none; mix-blend-mode: screen; transition: opacity 1s ease;"
			style:opacity=opacity
		/>
	}
}
