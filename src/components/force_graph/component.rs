//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and forwards mouse and wheel
//! input to the [`GraphSimulation`]. An animation loop runs via
//! `requestAnimationFrame`, advancing the engine and repainting each frame.
//! Data changes arrive through the reactive `data` signal.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::GraphConfig;
use super::events::GraphEvents;
use super::geometry::Point;
use super::render;
use super::state::GraphSimulation;
use super::theme::Theme;
use super::types::GraphData;

/// Engine state together with what is needed to paint it.
struct GraphContext {
	engine: GraphSimulation,
	ctx: CanvasRenderingContext2d,
	theme: Theme,
}

/// Read access to a mounted graph from outside the component.
///
/// Create one, pass it to [`ForceGraphCanvas`] and keep a clone. Before the
/// canvas mounts every query answers as if the graph were empty.
#[derive(Clone, Default)]
pub struct GraphHandle {
	context: Rc<RefCell<Option<GraphContext>>>,
}

impl GraphHandle {
	pub fn new() -> Self {
		Self::default()
	}

	/// Runs `f` against the engine, if mounted.
	pub fn with<R>(&self, f: impl FnOnce(&GraphSimulation) -> R) -> Option<R> {
		self.context.borrow().as_ref().map(|c| f(&c.engine))
	}

	/// Ids of the nodes currently pinned.
	pub fn pinned_ids(&self) -> Vec<String> {
		self.with(GraphSimulation::pinned_ids).unwrap_or_default()
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Pointer position relative to the canvas.
fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders an interactive force-directed graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal and listen to clicks on
/// `events`. The component sizes itself to its parent container by default;
/// set `fullscreen = true` to fill the viewport and resize automatically with
/// the window. Explicit `width`/`height` override automatic sizing.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	events: GraphEvents,
	#[prop(optional)] handle: Option<GraphHandle>,
	#[prop(optional)] theme: Option<Theme>,
	#[prop(optional)] config: Option<GraphConfig>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context = handle.unwrap_or_default().context;
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());
	let init = RefCell::new(Some((events, theme.unwrap_or_default(), config.unwrap_or_default())));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some((events, theme, config)) = init.borrow_mut().take() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("graph: no window, not mounting");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("graph: canvas has no 2d context");
			return;
		};

		let mut engine = GraphSimulation::new(w, h, events, config);
		engine.update(&data.get_untracked(), js_sys::Date::now(), &ctx);
		*context_init.borrow_mut() = Some(GraphContext { engine, ctx, theme });
		info!("graph: mounted {w}x{h} canvas");

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.engine.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !canvas.is_connected() {
				info!("graph: canvas detached, stopping");
				context_anim.borrow_mut().take();
				return;
			}
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.engine.frame(js_sys::Date::now());
				render::render(&c.engine, &c.ctx, &c.theme);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(window) = web_sys::window() {
					let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_data = context.clone();
	Effect::new(move |_| {
		let data = data.get();
		if let Some(ref mut c) = *context_data.borrow_mut() {
			c.engine.update(&data, js_sys::Date::now(), &c.ctx);
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(at) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.engine.pointer_down(at);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(at) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.engine.pointer_move(at);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.engine.pointer_up();
		}
	};

	let context_click = context.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(at) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_click.borrow_mut() {
			c.engine.click(at, js_sys::Date::now());
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.engine.pointer_leave();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(at) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			c.engine.wheel(at, ev.delta_y(), ev.delta_mode());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:click=on_click
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
