//! 2-D geometry helpers for edge frames, affordance arcs and hit testing.
//!
//! Link shapes are computed in a *canonical local frame*: the source sits at
//! the origin and the target lies on the positive x-axis at the edge length.
//! A [`Frame`] then places the shape in world space with a single
//! translate + rotate, so per-point trigonometry is never needed.
//!
//! Angles are in degrees. World space uses screen orientation (y grows
//! downwards), matching the canvas transform.

use std::f64::consts::PI;
use std::fmt::Write;
use std::ops::{Add, Mul, Sub};

use serde::Deserialize;

/// A point or vector in 2-D space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn length(self) -> f64 {
		(self.x * self.x + self.y * self.y).sqrt()
	}

	pub fn distance(self, other: Point) -> f64 {
		(other - self).length()
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

impl Add for Point {
	type Output = Point;

	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Point {
	type Output = Point;

	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Point {
	type Output = Point;

	fn mul(self, rhs: f64) -> Point {
		Point::new(self.x * rhs, self.y * rhs)
	}
}

/// Angle of the edge `source -> target` in degrees, in `(-180, 180]`.
pub fn rotation(source: Point, target: Point) -> f64 {
	(target.y - source.y).atan2(target.x - source.x) * 180.0 / PI
}

/// Normalizes an angle in degrees to `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
	angle.rem_euclid(360.0)
}

/// Rotates `point` around `center` by `-angle` degrees.
///
/// This is the inverse of a canvas `rotate(angle)`: rotating a world-space
/// edge offset by the edge's own [`rotation`] lands it on the positive x-axis.
pub fn rotate(center: Point, point: Point, angle: f64) -> Point {
	let (sin, cos) = angle.to_radians().sin_cos();
	let (dx, dy) = (point.x - center.x, point.y - center.y);
	Point::new(
		cos * dx + sin * dy + center.x,
		cos * dy - sin * dx + center.y,
	)
}

/// Unit vector pointing from `source` to `target`.
///
/// Coincident points yield NaN components; callers that need a direction for
/// coincident nodes must guard for it.
pub fn unit_vector(source: Point, target: Point) -> Point {
	let delta = target - source;
	delta * (1.0 / delta.length())
}

/// Unit normal of the edge `source -> target`: the unit vector rotated with
/// [`rotate`] by 90 degrees.
pub fn unit_normal_vector(source: Point, target: Point) -> Point {
	rotate(Point::ORIGIN, unit_vector(source, target), 90.0)
}

/// Converts a compass angle (degrees clockwise from 12 o'clock) to a point
/// at `radius` from `center`.
pub fn polar_to_cartesian(center: Point, radius: f64, angle: f64) -> Point {
	let radians = (angle - 90.0).to_radians();
	Point::new(
		center.x + radius * radians.cos(),
		center.y + radius * radians.sin(),
	)
}

/// Compass angle of `point` seen from `center`, in `[0, 360)`.
pub fn compass_angle(center: Point, point: Point) -> f64 {
	normalize_degrees(rotation(center, point) + 90.0)
}

/// A circular arc between two compass angles, drawn counter-clockwise from
/// `end_angle` back to `start_angle`.
#[derive(Clone, Debug, PartialEq)]
pub struct Arc {
	pub center: Point,
	pub radius: f64,
	pub start_angle: f64,
	pub end_angle: f64,
	/// First point of the path (at `end_angle`).
	pub start: Point,
	/// Last point of the path (at `start_angle`).
	pub end: Point,
	pub large_arc: bool,
}

impl Arc {
	/// SVG path data: `M start A r r 0 large 0 end`.
	pub fn to_svg_path(&self) -> String {
		format!(
			"M {} {} A {} {} 0 {} 0 {} {}",
			self.start.x,
			self.start.y,
			self.radius,
			self.radius,
			if self.large_arc { 1 } else { 0 },
			self.end.x,
			self.end.y
		)
	}

	/// Whether `point` lies inside the pie wedge spanned by this arc.
	pub fn wedge_contains(&self, point: Point) -> bool {
		if self.center.distance(point) > self.radius {
			return false;
		}
		let angle = compass_angle(self.center, point);
		let start = normalize_degrees(self.start_angle);
		let sweep = self.end_angle - self.start_angle;
		normalize_degrees(angle - start) <= sweep
	}
}

/// Describes an arc of `radius` around `center` from `start_angle` to
/// `end_angle` (compass degrees).
pub fn describe_arc(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Arc {
	Arc {
		center,
		radius,
		start_angle,
		end_angle,
		start: polar_to_cartesian(center, radius, end_angle),
		end: polar_to_cartesian(center, radius, start_angle),
		large_arc: end_angle - start_angle > 180.0,
	}
}

/// Even-odd point-in-polygon test.
pub fn polygon_contains(polygon: &[Point], point: Point) -> bool {
	let mut inside = false;
	let mut j = polygon.len().wrapping_sub(1);
	for (i, a) in polygon.iter().enumerate() {
		let b = polygon[j];
		if (a.y > point.y) != (b.y > point.y)
			&& point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
		{
			inside = !inside;
		}
		j = i;
	}
	inside
}

/// Placement of a canonical local frame in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
	pub origin: Point,
	/// Rotation in degrees.
	pub angle: f64,
}

impl Frame {
	/// Frame of the edge `source -> target`.
	pub fn for_edge(source: Point, target: Point) -> Self {
		Self {
			origin: source,
			angle: rotation(source, target),
		}
	}

	/// Maps a local point to world space (rotate, then translate).
	pub fn to_world(&self, local: Point) -> Point {
		let (sin, cos) = self.angle.to_radians().sin_cos();
		Point::new(
			self.origin.x + local.x * cos - local.y * sin,
			self.origin.y + local.x * sin + local.y * cos,
		)
	}

	/// Maps a world point into this frame.
	pub fn to_local(&self, world: Point) -> Point {
		rotate(Point::ORIGIN, world - self.origin, self.angle)
	}

	/// SVG transform attribute equivalent of this frame.
	pub fn to_svg_transform(&self) -> String {
		format!(
			"translate({}, {}) rotate({})",
			self.origin.x, self.origin.y, self.angle
		)
	}
}

/// Renders closed polygons as SVG path data (`M … L … Z`).
pub fn polygons_to_svg_path<'a>(polygons: impl IntoIterator<Item = &'a [Point]>) -> String {
	let mut path = String::new();
	for polygon in polygons {
		for (i, p) in polygon.iter().enumerate() {
			let command = if i == 0 { "M" } else { "L" };
			if !path.is_empty() {
				path.push(' ');
			}
			let _ = write!(path, "{command} {} {}", p.x, p.y);
		}
		if !polygon.is_empty() {
			path.push_str(" Z");
		}
	}
	path
}
