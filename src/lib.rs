//! graph-explorer: Interactive, progressively explorable node-link graph.
//!
//! This crate provides a WASM-based graph component with force-directed
//! layout, drag-to-pin nodes, directional expansion affordances and pan/zoom,
//! plus a small demo application that grows a graph from a single node.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod store;

pub use components::force_graph::{
	ClickTarget, ForceGraphCanvas, GraphData, GraphEvents, GraphHandle, GraphLink, GraphNode,
	Point,
};
pub use store::DemoGraphStore;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-explorer: logging initialized");
}

/// Load seed graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> Option<GraphData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"graph-explorer: loaded {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("graph-explorer: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Where start nodes appear: centred horizontally, above the vertical middle.
fn start_position() -> Point {
	web_sys::window()
		.and_then(|w| {
			let width = w.inner_width().ok()?.as_f64()?;
			let height = w.inner_height().ok()?.as_f64()?;
			Some(Point::new(width / 2.0, (height - 200.0) / 2.0))
		})
		.unwrap_or(Point::new(400.0, 200.0))
}

/// Offset of related nodes for an expansion in `direction`.
fn expansion_offset(direction: ClickTarget) -> Option<Point> {
	match direction {
		ClickTarget::Up => Some(Point::new(0.0, -50.0)),
		ClickTarget::Down => Some(Point::new(0.0, 50.0)),
		ClickTarget::Left => Some(Point::new(-50.0, 0.0)),
		ClickTarget::Right => Some(Point::new(50.0, 0.0)),
		ClickTarget::Center => None,
	}
}

/// Main application component.
/// Seeds the store from the DOM and renders the explorable graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let store = StoredValue::new(match load_graph_data() {
		Some(seed) => DemoGraphStore::from_seed(seed, start_position()),
		None => DemoGraphStore::new(start_position()),
	});
	let graph = RwSignal::new(store.with_value(DemoGraphStore::graph_data));
	let events = GraphEvents::new();
	let handle = GraphHandle::new();

	// Attached for the lifetime of the app.
	let _nodes = events.subscribe_to_node_clicks(move |event| {
		let Some(offset) = expansion_offset(event.click_target) else {
			return;
		};
		store.update_value(|s| s.insert_related_nodes(&event.node.id, Some(event.position), offset));
		graph.set(store.with_value(DemoGraphStore::graph_data));
	});
	let _links = events.subscribe_to_link_clicks(|event| {
		debug!(
			"graph-explorer: link {} clicked (double: {})",
			event.link.id, event.is_double_click
		);
	});

	let clear = move |keep_pinned: bool, pinned: Vec<String>| {
		store.update_value(|s| s.clear(keep_pinned, &pinned));
		graph.set(store.with_value(DemoGraphStore::graph_data));
	};
	let pinned_handle = handle.clone();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Graph Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ForceGraphCanvas data=graph events=events handle=handle fullscreen=true />
			<div class="graph-toolbar" style="position: absolute; top: 8px; left: 8px;">
				<button on:click=move |_| clear(false, Vec::new())>"Remove all nodes"</button>
				<button on:click=move |_| clear(true, pinned_handle.pinned_ids())>
					"Remove unpinned nodes"
				</button>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expansion_offsets_point_in_clicked_direction() {
		assert_eq!(expansion_offset(ClickTarget::Up), Some(Point::new(0.0, -50.0)));
		assert_eq!(expansion_offset(ClickTarget::Right), Some(Point::new(50.0, 0.0)));
		assert_eq!(expansion_offset(ClickTarget::Center), None);
	}
}
