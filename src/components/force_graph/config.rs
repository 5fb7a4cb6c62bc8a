//! Tunable constants for layout, shapes, zoom and interaction.
//!
//! Everything the engine measures in world units (radii, distances, arrow
//! size) or in time (reheat and double-click windows) lives here, grouped by
//! the component that reads it. [`GraphConfig::default`] reproduces the
//! reference look and feel.

/// Physics forces and integration parameters.
#[derive(Clone, Debug)]
pub struct ForceConfig {
	/// Many-body strength. Negative values repel.
	pub charge_strength: f64,
	/// Squared distance below which many-body interaction is softened.
	pub charge_distance_min2: f64,
	/// Strength of the pull toward the surface centre.
	pub center_strength: f64,
	/// Rest length of link springs.
	pub link_distance: f64,
	pub link_strength: f64,
	pub link_iterations: usize,
	/// Collision radius around each node.
	pub collide_radius: f64,
	pub collide_strength: f64,
	pub collide_iterations: usize,
	/// Fraction of velocity removed every tick.
	pub velocity_decay: f64,
	/// Simulation stops once alpha drops below this.
	pub alpha_min: f64,
	/// Number of ticks for alpha to cool from 1 to `alpha_min`.
	pub cooling_ticks: f64,
}

impl ForceConfig {
	/// Per-tick alpha decay that reaches `alpha_min` after `cooling_ticks`.
	pub fn alpha_decay(&self) -> f64 {
		1.0 - self.alpha_min.powf(1.0 / self.cooling_ticks)
	}
}

/// Node shape and label geometry.
#[derive(Clone, Debug)]
pub struct NodeConfig {
	/// Outline circle radius; also the drag/click hit target.
	pub radius: f64,
	/// Decorative ring radius; directional affordances sit on this ring.
	pub ring_radius: f64,
	/// Extra reach of the affordance hit area beyond the ring.
	pub affordance_reach: f64,
	/// Half-width of an affordance wedge in degrees.
	pub affordance_half_angle: f64,
	/// Distance of affordance icons from the node centre.
	pub affordance_icon_distance: f64,
	/// Maximum characters per label line.
	pub label_max_width: usize,
	/// Lines actually displayed.
	pub label_max_lines: usize,
}

/// Link shape geometry.
#[derive(Clone, Debug)]
pub struct LinkConfig {
	pub arrow_size: f64,
	/// Padding added to the measured label width to size the outline gap.
	pub label_padding: f64,
	/// Label offset from the edge when drawn upright.
	pub label_offset: f64,
	/// Label offset from the edge when flipped 180 degrees.
	pub label_offset_mirrored: f64,
	/// Squared half-width of the overlay hit region.
	pub overlay_width2: f64,
	/// Label font, used for measuring and drawing.
	pub label_font: String,
}

/// Pan/zoom limits and button behaviour.
#[derive(Clone, Debug)]
pub struct ZoomConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	pub zoom_in_factor: f64,
	pub zoom_out_factor: f64,
	/// Duration of the animated button zoom, milliseconds.
	pub transition_ms: f64,
	/// Wheel sensitivity per pixel of `deltaY`.
	pub wheel_sensitivity: f64,
	/// Side of the square zoom buttons in screen pixels.
	pub button_size: f64,
	/// Distance of the button's left edge from the right side of the surface.
	pub button_right_inset: f64,
	pub zoom_in_button_top: f64,
	pub zoom_out_button_top: f64,
}

/// Energy and click timing.
#[derive(Clone, Debug)]
pub struct InteractionConfig {
	/// Alpha target while a node is dragged.
	pub drag_alpha_target: f64,
	/// Alpha target right after an update.
	pub update_alpha_target: f64,
	/// Delay before the post-update alpha target drops back to zero.
	pub update_cooldown_ms: f64,
	/// Two clicks on the same target within this window form a double-click.
	pub double_click_ms: f64,
}

/// Complete engine configuration.
#[derive(Clone, Debug)]
pub struct GraphConfig {
	pub forces: ForceConfig,
	pub node: NodeConfig,
	pub link: LinkConfig,
	pub zoom: ZoomConfig,
	pub interaction: InteractionConfig,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			forces: ForceConfig {
				charge_strength: -30.0,
				charge_distance_min2: 1.0,
				center_strength: 0.3,
				link_distance: 100.0,
				link_strength: 0.5,
				link_iterations: 1,
				collide_radius: 25.0,
				collide_strength: 1.0,
				collide_iterations: 1,
				velocity_decay: 0.4,
				alpha_min: 0.001,
				cooling_ticks: 300.0,
			},
			node: NodeConfig {
				radius: 17.0,
				ring_radius: 21.0,
				affordance_reach: 4.0,
				affordance_half_angle: 44.75,
				affordance_icon_distance: 22.0,
				label_max_width: 11,
				label_max_lines: 2,
			},
			link: LinkConfig {
				arrow_size: 4.0,
				label_padding: 5.0,
				label_offset: 3.0,
				label_offset_mirrored: 2.0,
				overlay_width2: 50.0,
				label_font: "6px sans-serif".into(),
			},
			zoom: ZoomConfig {
				min_scale: 0.25,
				max_scale: 10.0,
				zoom_in_factor: 1.5,
				zoom_out_factor: 0.5,
				transition_ms: 250.0,
				wheel_sensitivity: 0.002,
				button_size: 22.0,
				button_right_inset: 27.0,
				zoom_in_button_top: 4.0,
				zoom_out_button_top: 28.0,
			},
			interaction: InteractionConfig {
				drag_alpha_target: 0.3,
				update_alpha_target: 0.2,
				update_cooldown_ms: 500.0,
				double_click_ms: 300.0,
			},
		}
	}
}
