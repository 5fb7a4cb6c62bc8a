//! Canvas rendering for the force graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Links layer, each link in its own frame (world space)
//! 3. Nodes layer: ring, affordances, outline, glyph, label, arrow icons
//! 4. Zoom buttons (screen space)

use std::f64::consts::PI;

use log::warn;
use web_sys::CanvasRenderingContext2d;

use super::geometry::Point;
use super::links::{LinkVisual, TextMeasure};
use super::nodes::NodeVisual;
use super::state::GraphSimulation;
use super::theme::Theme;
use super::viewport::{Viewport, ZoomButton};

impl TextMeasure for CanvasRenderingContext2d {
	fn text_width(&self, text: &str, font: &str) -> f64 {
		self.save();
		self.set_font(font);
		let width = match self.measure_text(text) {
			Ok(metrics) => metrics.width(),
			Err(e) => {
				warn!("graph: could not measure {text:?}: {e:?}");
				0.0
			}
		};
		self.restore();
		width
	}
}

/// Renders the complete graph to the canvas.
pub fn render(state: &GraphSimulation, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let viewport = state.viewport();
	let transform = viewport.transform();

	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, viewport.width(), viewport.height());

	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);

	let label_font = &state.config().link.label_font;
	for link in state.link_renderer().visuals() {
		draw_link(ctx, link, theme, label_font);
	}
	let radius = state.config().node.radius;
	let ring_radius = state.config().node.ring_radius;
	for node in state.node_renderer().visuals() {
		draw_node(ctx, node, theme, radius, ring_radius);
	}

	ctx.restore();

	draw_zoom_buttons(ctx, viewport, theme);
}

fn trace_polygon(ctx: &CanvasRenderingContext2d, polygon: &[Point]) {
	for (i, p) in polygon.iter().enumerate() {
		if i == 0 {
			ctx.move_to(p.x, p.y);
		} else {
			ctx.line_to(p.x, p.y);
		}
	}
	ctx.close_path();
}

fn draw_link(ctx: &CanvasRenderingContext2d, link: &LinkVisual, theme: &Theme, font: &str) {
	let g = &link.geometry;
	if !g.frame.origin.is_finite() || !g.length.is_finite() {
		return;
	}

	ctx.save();
	let _ = ctx.translate(g.frame.origin.x, g.frame.origin.y);
	let _ = ctx.rotate(g.frame.angle.to_radians());

	ctx.begin_path();
	trace_polygon(ctx, &g.outline_source);
	trace_polygon(ctx, &g.outline_target);
	ctx.set_fill_style_str(&theme.link_color(&link.classes).to_css());
	ctx.fill();

	if let (Some(placement), Some(text)) = (g.label, link.link.label.as_deref()) {
		let _ = ctx.translate(placement.position.x, placement.position.y);
		let _ = ctx.rotate(placement.rotation.to_radians());
		ctx.set_font(font);
		ctx.set_text_align("center");
		ctx.set_text_baseline("alphabetic");
		ctx.set_fill_style_str(&theme.link.label.to_css());
		let _ = ctx.fill_text(text, 0.0, 0.0);
	}

	ctx.restore();
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &NodeVisual,
	theme: &Theme,
	radius: f64,
	ring_radius: f64,
) {
	let p = node.position;
	if !p.is_finite() {
		return;
	}

	ctx.save();
	let _ = ctx.translate(p.x, p.y);

	ctx.begin_path();
	let _ = ctx.arc(0.0, 0.0, ring_radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&theme.node.ring.to_css());
	ctx.set_line_width(1.0);
	ctx.stroke();

	for affordance in &node.affordances {
		let arc = &affordance.arc;
		ctx.begin_path();
		ctx.move_to(arc.center.x, arc.center.y);
		let _ = ctx.arc(
			arc.center.x,
			arc.center.y,
			arc.radius,
			(arc.start_angle - 90.0).to_radians(),
			(arc.end_angle - 90.0).to_radians(),
		);
		ctx.close_path();
		let fill = if affordance.disabled {
			theme.affordance.disabled_fill
		} else {
			theme.affordance.fill
		};
		ctx.set_fill_style_str(&fill.to_css());
		ctx.fill();
	}

	ctx.begin_path();
	let _ = ctx.arc(0.0, 0.0, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&theme.node_fill(&node.classes).to_css());
	ctx.fill();
	let (stroke, width) = if node.fixed {
		(theme.node.fixed_stroke, 2.0)
	} else {
		(theme.node.stroke, 1.0)
	};
	ctx.set_stroke_style_str(&stroke.to_css());
	ctx.set_line_width(width);
	ctx.stroke();

	ctx.set_text_align("center");
	ctx.set_text_baseline("alphabetic");

	ctx.set_font(theme.node.icon_font);
	ctx.set_fill_style_str(&theme.node.glyph.to_css());
	let _ = ctx.fill_text(&node.glyph.to_string(), 0.0, -1.0);

	ctx.set_font(theme.node.label_font);
	ctx.set_fill_style_str(&theme.node.label.to_css());
	for line in &node.label_lines {
		let _ = ctx.fill_text(&line.text, 0.0, line.y);
	}

	ctx.set_font(theme.node.icon_font);
	for affordance in &node.affordances {
		let color = if affordance.disabled {
			theme.affordance.disabled_icon
		} else {
			theme.affordance.icon
		};
		ctx.set_fill_style_str(&color.to_css());
		let at = affordance.icon_position;
		let _ = ctx.fill_text(&affordance.icon.to_string(), at.x, at.y);
	}

	ctx.restore();
}

fn draw_zoom_buttons(ctx: &CanvasRenderingContext2d, viewport: &Viewport, theme: &Theme) {
	ctx.set_font(theme.button.font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_line_width(1.0);
	for button in [ZoomButton::In, ZoomButton::Out] {
		let rect = viewport.button_rect(button);
		ctx.set_fill_style_str(&theme.button.fill.to_css());
		ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
		ctx.set_stroke_style_str(&theme.button.stroke.to_css());
		ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);

		let c = rect.center();
		ctx.set_fill_style_str(&theme.button.icon.to_css());
		let _ = ctx.fill_text(&button.icon().to_string(), c.x, c.y);
	}
}
