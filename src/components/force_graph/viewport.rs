//! Pan and zoom of the graph surface.
//!
//! The view is a uniform scale `k` followed by a translation `(x, y)`:
//! `screen = world * k + (x, y)`. Every change is constrained so the visible
//! area never leaves the surface extent, and scale stays within the configured
//! bounds. Wheel and drag changes apply immediately; the zoom buttons animate.

use log::debug;

use super::config::ZoomConfig;
use super::geometry::Point;

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// World to screen.
	pub fn apply(&self, world: Point) -> Point {
		Point::new(world.x * self.k + self.x, world.y * self.k + self.y)
	}

	/// Screen to world.
	pub fn invert(&self, screen: Point) -> Point {
		Point::new((screen.x - self.x) / self.k, (screen.y - self.y) / self.k)
	}

	/// Transform at scale `k` that keeps `world` under `screen`.
	fn anchored(k: f64, screen: Point, world: Point) -> Self {
		Self {
			x: screen.x - world.x * k,
			y: screen.y - world.y * k,
			k,
		}
	}
}

/// One of the two on-surface zoom buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomButton {
	In,
	Out,
}

impl ZoomButton {
	pub fn icon(self) -> char {
		match self {
			ZoomButton::In => '+',
			ZoomButton::Out => '\u{2212}',
		}
	}
}

/// Screen-space rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
	}

	pub fn center(&self) -> Point {
		Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
	}
}

#[derive(Clone, Debug)]
struct PanGesture {
	/// World point grabbed by the pointer.
	anchor: Point,
	moved: bool,
}

#[derive(Clone, Debug)]
struct ZoomTransition {
	start_ms: f64,
	from: ViewTransform,
	to: ViewTransform,
	/// Screen point kept fixed, the surface centre.
	focus: Point,
}

fn cubic_in_out(t: f64) -> f64 {
	let t = t * 2.0;
	if t <= 1.0 {
		t * t * t / 2.0
	} else {
		let t = t - 2.0;
		(t * t * t + 2.0) / 2.0
	}
}

/// Pan/zoom state of the graph surface.
pub struct Viewport {
	config: ZoomConfig,
	width: f64,
	height: f64,
	transform: ViewTransform,
	pan: Option<PanGesture>,
	transition: Option<ZoomTransition>,
}

impl Viewport {
	pub fn new(config: ZoomConfig, width: f64, height: f64) -> Self {
		Self {
			config,
			width,
			height,
			transform: ViewTransform::default(),
			pan: None,
			transition: None,
		}
	}

	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	pub fn width(&self) -> f64 {
		self.width
	}

	pub fn height(&self) -> f64 {
		self.height
	}

	pub fn center(&self) -> Point {
		Point::new(self.width * 0.5, self.height * 0.5)
	}

	pub fn to_world(&self, screen: Point) -> Point {
		self.transform.invert(screen)
	}

	pub fn is_panning(&self) -> bool {
		self.pan.is_some()
	}

	pub fn is_animating(&self) -> bool {
		self.transition.is_some()
	}

	/// Changes the surface size and re-constrains the view.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.transform = self.constrain(self.transform);
	}

	/// Clamps `t` so the visible area stays inside the surface.
	///
	/// When the view is larger than the surface on an axis it is centred on
	/// that axis instead.
	fn constrain(&self, t: ViewTransform) -> ViewTransform {
		let dx0 = t.invert(Point::ORIGIN).x;
		let dx1 = t.invert(Point::new(self.width, 0.0)).x - self.width;
		let dy0 = t.invert(Point::ORIGIN).y;
		let dy1 = t.invert(Point::new(0.0, self.height)).y - self.height;
		let shift = |lo: f64, hi: f64| {
			if hi > lo {
				(lo + hi) * 0.5
			} else if lo < 0.0 {
				lo
			} else {
				hi.max(0.0)
			}
		};
		let (sx, sy) = (shift(dx0, dx1), shift(dy0, dy1));
		ViewTransform {
			x: t.x + t.k * sx,
			y: t.y + t.k * sy,
			k: t.k,
		}
	}

	fn clamp_scale(&self, k: f64) -> f64 {
		k.clamp(self.config.min_scale, self.config.max_scale)
	}

	/// Transform after scaling the current view by `factor` about `focus`.
	fn scaled(&self, from: ViewTransform, factor: f64, focus: Point) -> ViewTransform {
		let k = self.clamp_scale(from.k * factor);
		self.constrain(ViewTransform::anchored(k, focus, from.invert(focus)))
	}

	/// Zooms about the pointer for a wheel event.
	///
	/// `delta_mode` is the DOM `WheelEvent.deltaMode`: pixels (0), lines (1)
	/// or pages (2).
	pub fn wheel(&mut self, at: Point, delta_y: f64, delta_mode: u32) {
		self.transition = None;
		let per_unit = match delta_mode {
			0 => self.config.wheel_sensitivity,
			1 => 0.05,
			_ => 1.0,
		};
		let factor = 2f64.powf(-delta_y * per_unit);
		self.transform = self.scaled(self.transform, factor, at);
	}

	/// Starts panning with the pointer at screen point `at`.
	pub fn pan_start(&mut self, at: Point) {
		self.transition = None;
		self.pan = Some(PanGesture {
			anchor: self.transform.invert(at),
			moved: false,
		});
	}

	/// Keeps the grabbed world point under the pointer.
	pub fn pan_move(&mut self, at: Point) {
		let Some(pan) = &mut self.pan else {
			return;
		};
		pan.moved = true;
		let anchor = pan.anchor;
		self.transform = self.constrain(ViewTransform::anchored(self.transform.k, at, anchor));
	}

	/// Ends panning. Returns whether the pointer moved during the gesture.
	pub fn pan_end(&mut self) -> bool {
		self.pan.take().is_some_and(|pan| pan.moved)
	}

	/// Screen rectangle of a zoom button.
	pub fn button_rect(&self, button: ZoomButton) -> Rect {
		let top = match button {
			ZoomButton::In => self.config.zoom_in_button_top,
			ZoomButton::Out => self.config.zoom_out_button_top,
		};
		Rect {
			x: self.width - self.config.button_right_inset,
			y: top,
			width: self.config.button_size,
			height: self.config.button_size,
		}
	}

	/// Zoom button under the screen point `at`.
	pub fn button_at(&self, at: Point) -> Option<ZoomButton> {
		[ZoomButton::In, ZoomButton::Out]
			.into_iter()
			.find(|&b| self.button_rect(b).contains(at))
	}

	/// Animates a zoom by the button's factor about the surface centre.
	pub fn press(&mut self, button: ZoomButton, now_ms: f64) {
		let factor = match button {
			ZoomButton::In => self.config.zoom_in_factor,
			ZoomButton::Out => self.config.zoom_out_factor,
		};
		let focus = self.center();
		let to = self.scaled(self.transform, factor, focus);
		debug!("graph: zoom {button:?} to k={:.3}", to.k);
		self.transition = Some(ZoomTransition {
			start_ms: now_ms,
			from: self.transform,
			to,
			focus,
		});
	}

	pub fn zoom_in(&mut self, now_ms: f64) {
		self.press(ZoomButton::In, now_ms);
	}

	pub fn zoom_out(&mut self, now_ms: f64) {
		self.press(ZoomButton::Out, now_ms);
	}

	/// Advances a running zoom animation. Returns whether the view changed.
	///
	/// The view centre and visible width are interpolated with cubic in-out
	/// easing, so the focus point stays put while the scale changes.
	pub fn advance(&mut self, now_ms: f64) -> bool {
		let Some(transition) = &self.transition else {
			return false;
		};
		let t = ((now_ms - transition.start_ms) / self.config.transition_ms).clamp(0.0, 1.0);
		if t >= 1.0 {
			self.transform = transition.to;
			self.transition = None;
			return true;
		}
		let e = cubic_in_out(t);
		let (a, b, p) = (transition.from, transition.to, transition.focus);
		let (ca, cb) = (a.invert(p), b.invert(p));
		let (wa, wb) = (self.width / a.k, self.width / b.k);
		let centre = ca + (cb - ca) * e;
		let k = self.width / (wa + (wb - wa) * e);
		self.transform = ViewTransform::anchored(k, p, centre);
		true
	}
}
