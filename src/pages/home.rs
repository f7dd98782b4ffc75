use leptos::prelude::*;
use log::{info, warn};
use serde_json::json;

use crate::components::force_graph::{ForceGraphCanvas, GraphData, GraphLink, GraphNode};
use crate::config::DemoConfig;

const STATUSES: [&str; 3] = ["busy", "unavailable", "present"];

/// Generate sample graph data: a random tree where every tenth node is a
/// group holding one child.
fn generate_sample_data(n: usize) -> GraphData {
	let mut nodes = Vec::with_capacity(n + n / 10 + 1);
	for i in 0..n {
		let index = i % STATUSES.len();
		if i % 10 == 0 {
			nodes.push(GraphNode {
				id: i.to_string(),
				label: Some("Group Node".into()),
				parent: None,
				group: true,
				tag: json!({ "id": i, "type": "group", "status": "group" }),
			});
			nodes.push(GraphNode {
				id: format!("{i}-child"),
				label: Some("Child Node".into()),
				parent: Some(i.to_string()),
				group: false,
				tag: json!({
					"id": i.to_string(),
					"type": index,
					"status": STATUSES[index],
					"name": format!("Child {i}"),
					"isInsideGroup": true,
				}),
			});
		} else {
			nodes.push(GraphNode {
				id: i.to_string(),
				label: Some(format!("Item {i}")),
				parent: None,
				group: false,
				tag: json!({
					"id": i,
					"type": index,
					"status": STATUSES[index],
					"name": format!("Job {i}"),
					"global": i % 7 == 0,
					"resource": i % 5 == 0,
				}),
			});
		}
	}

	let links: Vec<GraphLink> = (1..n)
		.map(|i| {
			let target = (rand_simple(i) * (i as f64)) as usize;
			GraphLink {
				source: i.to_string(),
				target: target.to_string(),
			}
		})
		.collect();

	GraphData { nodes, links }
}

/// Text of an inline `<script type="application/json">` block.
fn embedded_json(id: &str) -> Option<String> {
	web_sys::window()?.document()?.get_element_by_id(id)?.text_content()
}

fn load_config(raw: Option<&str>) -> DemoConfig {
	let Some(raw) = raw else {
		return DemoConfig::default();
	};
	DemoConfig::from_json(raw).unwrap_or_else(|err| {
		warn!("{err}; using the default configuration");
		DemoConfig::default()
	})
}

/// Embedded graph document, or a generated sample when there is none.
fn load_graph(raw: Option<&str>, sample_size: usize) -> GraphData {
	match raw.map(GraphData::from_json) {
		Some(Ok(data)) => {
			info!("loaded graph with {} nodes", data.nodes.len());
			data
		}
		Some(Err(err)) => {
			warn!("invalid graph document: {err}; generating a sample");
			generate_sample_data(sample_size)
		}
		None => generate_sample_data(sample_size),
	}
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = load_config(embedded_json("demo-config").as_deref());
	let size = config.sample_size;
	let graph_data = Signal::derive(move || load_graph(embedded_json("graph-data").as_deref(), size));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<ForceGraphCanvas data=graph_data config=config fullscreen=true />
				<div class="graph-overlay">
					<h1>"Large Graph Rendering"</h1>
					<p class="subtitle">
						"Scroll to zoom across the SVG threshold. Double click to add a node, click a group to collapse it, Delete removes the hovered node."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_tenth_node_is_a_group_with_a_child() {
		let data = generate_sample_data(25);
		let groups: Vec<_> = data.nodes.iter().filter(|n| n.group).collect();
		assert_eq!(groups.len(), 3);
		assert_eq!(data.nodes.len(), 28);

		let child = data.nodes.iter().find(|n| n.id == "10-child").unwrap();
		assert_eq!(child.parent.as_deref(), Some("10"));
		assert_eq!(child.tag["isInsideGroup"], true);
	}

	#[test]
	fn embedded_documents_fall_back_to_defaults() {
		assert_eq!(load_config(None), DemoConfig::default());
		assert_eq!(load_config(Some("not json")), DemoConfig::default());
		assert_eq!(load_config(Some(r#"{ "sampleSize": 40 }"#)).sample_size, 40);

		assert_eq!(load_graph(None, 20).nodes.len(), 22);
		assert_eq!(load_graph(Some("{"), 20).nodes.len(), 22);
		let data = load_graph(Some(r#"{ "nodes": [{ "id": "a" }] }"#), 20);
		assert_eq!(data.nodes.len(), 1);
	}

	#[test]
	fn links_form_a_tree_over_existing_ids() {
		let data = generate_sample_data(50);
		assert_eq!(data.links.len(), 49);
		for link in &data.links {
			let (source, target): (usize, usize) =
				(link.source.parse().unwrap(), link.target.parse().unwrap());
			assert!(target < source);
		}
	}
}
