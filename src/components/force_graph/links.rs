//! Link visuals: arrow-tipped outlines, label placement and hit regions.
//!
//! Shapes are computed in the link's canonical local frame (source at the
//! origin, target at `(length, 0)`), where the unit vector is `(1, 0)` and
//! the normal is `(0, -1)`. The group transform of [`LinkGeometry::frame`]
//! then places them in the world.

use log::debug;

use super::config::LinkConfig;
use super::events::GraphEvents;
use super::geometry::{Frame, Point, normalize_degrees, polygon_contains, polygons_to_svg_path};
use super::join::{JoinDiff, Keyed, join};
use super::simulation::NodeResolver;
use super::types::GraphLink;

/// Measures rendered text width in world units.
pub trait TextMeasure {
	fn text_width(&self, text: &str, font: &str) -> f64;
}

/// Fixed-advance measurement for when no drawing context is available.
#[derive(Clone, Copy, Debug)]
pub struct ApproxTextMeasure {
	pub char_width: f64,
}

impl Default for ApproxTextMeasure {
	fn default() -> Self {
		Self { char_width: 3.5 }
	}
}

impl TextMeasure for ApproxTextMeasure {
	fn text_width(&self, text: &str, _font: &str) -> f64 {
		text.chars().count() as f64 * self.char_width
	}
}

/// Label anchor and rotation inside the link frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPlacement {
	pub position: Point,
	/// 180 when the label is flipped to stay upright, otherwise 0.
	pub rotation: f64,
}

/// Per-tick shapes of a link, all in its local frame.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkGeometry {
	pub frame: Frame,
	pub length: f64,
	/// Transparent hit region along the whole edge.
	pub overlay: [Point; 4],
	/// Stub between the source node and the label gap.
	pub outline_source: [Point; 4],
	/// Segment between the label gap and the target node, with arrowhead.
	pub outline_target: [Point; 7],
	pub label: Option<LabelPlacement>,
}

impl LinkGeometry {
	/// Computes the shapes for an edge from `source` to `target`.
	///
	/// `label_width` is the measured label width, `None` for unlabeled links
	/// which closes the label gap entirely.
	pub fn compute(
		source: Point,
		target: Point,
		label_width: Option<f64>,
		node_radius: f64,
		config: &LinkConfig,
	) -> Self {
		let frame = Frame::for_edge(source, target);
		let length = source.distance(target);
		let r = node_radius + 1.0;
		let a = config.arrow_size;
		let gap = label_width.map_or(0.0, |w| w + config.label_padding);
		let margin = (length - gap) * 0.5;
		let s = config.overlay_width2.sqrt();
		let tip = length - r;

		let overlay = [
			Point::new(0.0, s),
			Point::new(length, s),
			Point::new(length, 1.0 - s),
			Point::new(0.0, 1.0 - s),
		];
		let outline_source = [
			Point::new(r, 1.0),
			Point::new(margin, 1.0),
			Point::new(margin, 0.0),
			Point::new(r, 0.0),
		];
		let outline_target = [
			Point::new(length - margin, 1.0),
			Point::new(tip - a, 1.0),
			Point::new(tip - a, 1.0 - a),
			Point::new(tip, 0.0),
			Point::new(tip - a, a),
			Point::new(tip - a, 0.0),
			Point::new(length - margin, 0.0),
		];

		let label = label_width.map(|_| {
			let angle = normalize_degrees(frame.angle);
			let mirror = angle > 90.0 && angle < 270.0;
			if mirror {
				LabelPlacement {
					position: Point::new(length * 0.5, -config.label_offset_mirrored),
					rotation: 180.0,
				}
			} else {
				LabelPlacement {
					position: Point::new(length * 0.5, config.label_offset),
					rotation: 0.0,
				}
			}
		});

		Self {
			frame,
			length,
			overlay,
			outline_source,
			outline_target,
			label,
		}
	}

	/// SVG path data of both outline polygons.
	pub fn outline_path(&self) -> String {
		polygons_to_svg_path([&self.outline_source[..], &self.outline_target[..]])
	}

	/// SVG path data of the overlay.
	pub fn overlay_path(&self) -> String {
		polygons_to_svg_path([&self.overlay[..]])
	}

	/// Whether the world point `at` falls on the overlay.
	pub fn hit(&self, at: Point) -> bool {
		polygon_contains(&self.overlay, self.frame.to_local(at))
	}
}

/// Everything drawn for one link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkVisual {
	pub link: GraphLink,
	/// `link` followed by the link's style tags.
	pub classes: Vec<String>,
	/// Label width measured when the visual was created.
	pub label_width: Option<f64>,
	pub geometry: LinkGeometry,
}

impl Keyed for LinkVisual {
	fn key(&self) -> &str {
		&self.link.id
	}
}

fn link_classes(link: &GraphLink) -> Vec<String> {
	std::iter::once("link".to_string())
		.chain(link.css_classes.iter().cloned())
		.collect()
}

/// Keeps link visuals in sync with data and re-derives their shapes every
/// tick from the live endpoint positions.
pub struct LinkRenderer {
	config: LinkConfig,
	node_radius: f64,
	visuals: Vec<LinkVisual>,
}

impl LinkRenderer {
	pub fn new(config: LinkConfig, node_radius: f64) -> Self {
		Self {
			config,
			node_radius,
			visuals: Vec::new(),
		}
	}

	/// Reconciles visuals against `links`. Labels are measured on creation.
	pub fn update(&mut self, links: &[GraphLink], measure: &dyn TextMeasure) -> JoinDiff {
		let (config, node_radius) = (&self.config, self.node_radius);
		let diff = join(
			&mut self.visuals,
			links,
			|link| {
				let label_width = link
					.label
					.as_deref()
					.filter(|l| !l.is_empty())
					.map(|l| measure.text_width(l, &config.label_font));
				LinkVisual {
					link: link.clone(),
					classes: link_classes(link),
					label_width,
					geometry: LinkGeometry::compute(
						Point::new(f64::NAN, f64::NAN),
						Point::new(f64::NAN, f64::NAN),
						label_width,
						node_radius,
						config,
					),
				}
			},
			|visual, link| {
				visual.classes = link_classes(link);
				visual.link = link.clone();
			},
		);
		debug!(
			"graph: links +{} ={} -{}",
			diff.added.len(),
			diff.retained.len(),
			diff.removed.len()
		);
		diff
	}

	/// Recomputes every link's shapes from its endpoints' current positions.
	///
	/// Unresolved endpoints produce NaN geometry rather than an error.
	pub fn tick(&mut self, nodes: &impl NodeResolver) {
		let missing = Point::new(f64::NAN, f64::NAN);
		for visual in &mut self.visuals {
			let source = nodes.position(&visual.link.source).unwrap_or(missing);
			let target = nodes.position(&visual.link.target).unwrap_or(missing);
			visual.geometry = LinkGeometry::compute(
				source,
				target,
				visual.label_width,
				self.node_radius,
				&self.config,
			);
		}
	}

	pub fn visuals(&self) -> &[LinkVisual] {
		&self.visuals
	}

	pub fn visual(&self, id: &str) -> Option<&LinkVisual> {
		self.visuals.iter().find(|v| v.link.id == id)
	}

	pub fn len(&self) -> usize {
		self.visuals.len()
	}

	pub fn is_empty(&self) -> bool {
		self.visuals.is_empty()
	}

	/// Id of the topmost link whose overlay contains `at`.
	pub fn hit_test(&self, at: Point) -> Option<&str> {
		self.visuals
			.iter()
			.rev()
			.find(|v| v.geometry.hit(at))
			.map(|v| v.link.id.as_str())
	}

	/// Publishes a click on link `id`.
	pub fn click(&self, events: &GraphEvents, id: &str, is_double_click: bool) {
		if let Some(visual) = self.visual(id) {
			events.publish_link_click(&visual.link, is_double_click);
		}
	}
}
