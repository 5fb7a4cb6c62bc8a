//! Visual theming for the force graph.
//!
//! Nodes and links carry string style tags; the theme resolves them to
//! colours. The last tag with a known colour wins.

use std::collections::HashMap;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Outline fill for nodes without a colour tag
	pub fill: Color,
	pub stroke: Color,
	/// Stroke of pinned nodes
	pub fixed_stroke: Color,
	pub ring: Color,
	pub glyph: Color,
	pub label: Color,
	/// Icon font family for node glyphs and affordance arrows
	pub icon_font: &'static str,
	pub label_font: &'static str,
}

/// Directional affordance style.
#[derive(Clone, Debug)]
pub struct AffordanceStyle {
	pub fill: Color,
	pub icon: Color,
	pub disabled_fill: Color,
	pub disabled_icon: Color,
}

/// Link visual style.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	/// Outline colour for links without a colour tag
	pub color: Color,
	pub label: Color,
}

/// Zoom button style.
#[derive(Clone, Debug)]
pub struct ButtonStyle {
	pub fill: Color,
	pub stroke: Color,
	pub icon: Color,
	pub font: &'static str,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: Color,
	pub node: NodeStyle,
	pub affordance: AffordanceStyle,
	pub link: LinkStyle,
	pub button: ButtonStyle,
	/// Style tag to colour.
	pub tags: HashMap<&'static str, Color>,
}

const INFO: Color = Color::rgb(13, 202, 240);
const SUCCESS: Color = Color::rgb(25, 135, 84);
const WARNING: Color = Color::rgb(255, 193, 7);
const DANGER: Color = Color::rgb(220, 53, 69);

fn status_tags() -> HashMap<&'static str, Color> {
	[
		("info", INFO),
		("success", SUCCESS),
		("warning", WARNING),
		("danger", DANGER),
		("fill-info", INFO.lighten(0.6)),
		("fill-success", SUCCESS.lighten(0.6)),
		("fill-warning", WARNING.lighten(0.6)),
		("fill-danger", DANGER.lighten(0.6)),
	]
	.into_iter()
	.collect()
}

impl Theme {
	/// Light theme (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: Color::rgb(255, 255, 255),
			node: NodeStyle {
				fill: Color::rgb(240, 242, 245),
				stroke: Color::rgb(108, 117, 125),
				fixed_stroke: Color::rgb(33, 37, 41),
				ring: Color::rgba(108, 117, 125, 0.25),
				glyph: Color::rgb(33, 37, 41),
				label: Color::rgb(33, 37, 41),
				icon_font: "900 14px 'Font Awesome 6 Free'",
				label_font: "6px sans-serif",
			},
			affordance: AffordanceStyle {
				fill: Color::rgba(13, 110, 253, 0.2),
				icon: Color::rgb(13, 110, 253),
				disabled_fill: Color::rgba(173, 181, 189, 0.2),
				disabled_icon: Color::rgb(173, 181, 189),
			},
			link: LinkStyle {
				color: Color::rgb(108, 117, 125),
				label: Color::rgb(73, 80, 87),
			},
			button: ButtonStyle {
				fill: Color::rgb(248, 249, 250),
				stroke: Color::rgb(173, 181, 189),
				icon: Color::rgb(33, 37, 41),
				font: "bold 16px sans-serif",
			},
			tags: status_tags(),
		}
	}

	fn resolve(&self, classes: &[String]) -> Option<Color> {
		classes.iter().rev().find_map(|c| self.tags.get(c.as_str()).copied())
	}

	/// Outline fill of a node with the given style tags.
	pub fn node_fill(&self, classes: &[String]) -> Color {
		self.resolve(classes).unwrap_or(self.node.fill)
	}

	/// Outline colour of a link with the given style tags.
	pub fn link_color(&self, classes: &[String]) -> Color {
		self.resolve(classes).unwrap_or(self.link.color)
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tags(list: &[&str]) -> Vec<String> {
		list.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn resolves_last_known_tag() {
		let theme = Theme::default();
		assert_eq!(theme.link_color(&tags(&["link", "info"])), INFO);
		assert_eq!(theme.link_color(&tags(&["danger", "info", "bogus"])), INFO);
		assert_eq!(theme.link_color(&tags(&["link"])), theme.link.color);
		assert_eq!(theme.node_fill(&tags(&["node", "fill-warning"])), WARNING.lighten(0.6));
		assert_eq!(theme.node_fill(&[]), theme.node.fill);
	}

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(13, 202, 240).to_css(), "#0dcaf0");
		assert_eq!(Color::rgb(0, 0, 0).with_alpha(0.5).to_css(), "rgba(0, 0, 0, 0.5)");
	}
}
