use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use serde_json::{Value, json};

use super::types::GraphData;
use crate::switching::{HostError, HostGraph, ItemId, StyleDescriptor};

/// Side length of a detailed node in world units.
pub const NODE_SIZE: f64 = 40.0;
/// Radius of a simplified node.
pub const NODE_RADIUS: f64 = 6.0;
pub const GROUP_PADDING: f64 = 10.0;
pub const HIT_RADIUS: f64 = 20.0;

const STATUSES: [&str; 3] = ["busy", "unavailable", "present"];

#[derive(Clone, Debug)]
pub struct NodeRecord {
	pub idx: DefaultNodeIdx,
	pub label: Option<String>,
	pub tag: Value,
	pub group: bool,
	/// Containing group node.
	pub parent: Option<ItemId>,
	pub style: Option<StyleDescriptor>,
	pub removed: bool,
}

#[derive(Clone, Debug)]
pub struct EdgeRecord {
	pub source: ItemId,
	pub target: ItemId,
	pub style: Option<StyleDescriptor>,
	pub removed: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<ItemId>,
	pub neighbors: HashSet<ItemId>,
	pub highlight_t: f64,
}

/// Canvas-side graph: simulation, per-item records and view state.
///
/// Item styles live in the records and are only replaced through
/// [`HostGraph::set_style`]; drag, pan and hover state are kept apart so a
/// style swap never touches them.
pub struct ForceGraphState {
	/// Node user data is the item id; edge user data is `None` for
	/// containment springs that are not graph items.
	pub graph: ForceGraph<ItemId, Option<ItemId>>,
	pub nodes: Vec<NodeRecord>,
	pub edges: Vec<EdgeRecord>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph: ForceGraph::new(SimulationParameters {
				force_charge: 150.0,
				force_spring: 0.05,
				force_max: 100.0,
				node_speed: 3000.0,
				damping_factor: 0.9,
			}),
			nodes: Vec::with_capacity(data.nodes.len()),
			edges: Vec::with_capacity(data.links.len()),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
		};

		let mut id_to_item = HashMap::new();
		let count = data.nodes.len().max(1) as f64;
		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count;
			let radius = 100.0 + 4.0 * (i as f64).sqrt();
			let item = state.push_node(
				radius * angle.cos(),
				radius * angle.sin(),
				node.label.clone(),
				node.tag.clone(),
				node.group,
			);
			id_to_item.insert(node.id.clone(), item);
		}

		for node in &data.nodes {
			if let (Some(child), Some(parent)) = (
				id_to_item.get(&node.id),
				node.parent.as_ref().and_then(|p| id_to_item.get(p)),
			) {
				state.add_spring(*child, *parent, None);
				if let ItemId::Node(i) = *child {
					state.nodes[i as usize].parent = Some(*parent);
				}
			}
		}

		for link in &data.links {
			if let (Some(&source), Some(&target)) =
				(id_to_item.get(&link.source), id_to_item.get(&link.target))
			{
				state.push_edge(source, target);
			}
		}
		state
	}

	fn push_node(&mut self, x: f64, y: f64, label: Option<String>, tag: Value, group: bool) -> ItemId {
		let item = ItemId::Node(self.nodes.len() as u64);
		let idx = self.graph.add_node(NodeData {
			x: x as f32,
			y: y as f32,
			mass: if group { 20.0 } else { 10.0 },
			is_anchor: false,
			user_data: item,
		});
		self.nodes.push(NodeRecord {
			idx,
			label,
			tag,
			group,
			parent: None,
			style: None,
			removed: false,
		});
		item
	}

	fn push_edge(&mut self, source: ItemId, target: ItemId) -> ItemId {
		let item = ItemId::Edge(self.edges.len() as u64);
		self.add_spring(source, target, Some(item));
		self.edges.push(EdgeRecord {
			source,
			target,
			style: None,
			removed: false,
		});
		item
	}

	fn add_spring(&mut self, a: ItemId, b: ItemId, user_data: Option<ItemId>) {
		let (Some(a), Some(b)) = (self.node(a).map(|n| n.idx), self.node(b).map(|n| n.idx)) else {
			return;
		};
		self.graph.add_edge(a, b, EdgeData { user_data });
	}

	/// Live node record; removed nodes are not returned.
	pub fn node(&self, item: ItemId) -> Option<&NodeRecord> {
		match item {
			ItemId::Node(i) => self.nodes.get(i as usize).filter(|n| !n.removed),
			ItemId::Edge(_) => None,
		}
	}

	pub fn edge(&self, item: ItemId) -> Option<&EdgeRecord> {
		match item {
			ItemId::Edge(i) => self.edges.get(i as usize).filter(|e| !e.removed),
			ItemId::Node(_) => None,
		}
	}

	/// Live node and edge counts.
	pub fn counts(&self) -> (usize, usize) {
		(
			self.nodes.iter().filter(|n| !n.removed).count(),
			self.edges.iter().filter(|e| !e.removed).count(),
		)
	}

	/// Whether the item sits inside a collapsed group, or is an edge touching
	/// such an item.
	pub fn is_hidden(&self, item: ItemId) -> bool {
		match item {
			ItemId::Node(_) => self
				.node(item)
				.and_then(|n| n.parent)
				.and_then(|parent| self.node(parent))
				.is_some_and(|parent| parent.tag["collapsed"] == true),
			ItemId::Edge(_) => self
				.edge(item)
				.is_some_and(|e| self.is_hidden(e.source) || self.is_hidden(e.target)),
		}
	}

	/// Flips the `collapsed` flag in a group's tag. Returns `false` for
	/// anything that is not a live group.
	pub fn toggle_collapsed(&mut self, item: ItemId) -> bool {
		let Some(record) = (match item {
			ItemId::Node(i) => self.nodes.get_mut(i as usize),
			ItemId::Edge(_) => None,
		}) else {
			return false;
		};
		if record.removed || !record.group {
			return false;
		}
		let collapsed = record.tag["collapsed"] != true;
		match record.tag.as_object_mut() {
			Some(fields) => {
				fields.insert("collapsed".into(), Value::Bool(collapsed));
			}
			None => record.tag = json!({ "collapsed": collapsed }),
		}
		true
	}

	/// Removes a node and its incident edges. Returns every removed item, the
	/// node first. Members of a removed group stay as top-level nodes.
	pub fn remove_node(&mut self, item: ItemId) -> Vec<ItemId> {
		let Some(idx) = self.node(item).map(|n| n.idx) else {
			return Vec::new();
		};
		let ItemId::Node(i) = item else {
			return Vec::new();
		};
		self.graph.remove_node(idx);
		self.nodes[i as usize].removed = true;
		for node in &mut self.nodes {
			if node.parent == Some(item) {
				node.parent = None;
			}
		}

		let mut removed = vec![item];
		for (i, edge) in self.edges.iter_mut().enumerate() {
			if !edge.removed && (edge.source == item || edge.target == item) {
				edge.removed = true;
				removed.push(ItemId::Edge(i as u64));
			}
		}
		if self.hover.node == Some(item) {
			self.set_hover(None);
		}
		self.hover.neighbors.remove(&item);
		if self.drag.node_idx == Some(idx) {
			self.drag = DragState::default();
		}
		removed
	}

	/// Adds a node at a screen position. The status cycles with the node count.
	pub fn create_node_at(&mut self, sx: f64, sy: f64) -> ItemId {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let index = self.nodes.len() % STATUSES.len();
		let id = self.nodes.len();
		let tag = json!({ "id": id, "type": index, "status": STATUSES[index], "name": format!("Job {id}") });
		self.push_node(gx, gy, Some(format!("Item {id}")), tag, false)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if self.is_hidden(node.data.user_data) {
				return;
			}
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn item_at(&self, idx: DefaultNodeIdx) -> Option<ItemId> {
		self.nodes
			.iter()
			.position(|n| n.idx == idx && !n.removed)
			.map(|i| ItemId::Node(i as u64))
	}

	pub fn set_hover(&mut self, node: Option<ItemId>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();
		if node.is_none() {
			return;
		}
		for edge in &self.edges {
			if Some(edge.source) == node {
				self.hover.neighbors.insert(edge.target);
			} else if Some(edge.target) == node {
				self.hover.neighbors.insert(edge.source);
			}
		}
	}

	pub fn is_highlighted(&self, item: ItemId) -> bool {
		self.hover.node == Some(item) || self.hover.neighbors.contains(&item)
	}

	/// `Job ID: <id> | Status: <status>` for the hovered node.
	pub fn tooltip(&self) -> Option<String> {
		let record = self.node(self.hover.node?)?;
		let tag = record.tag.as_object()?;
		let id = tag.get("id")?;
		let status = tag.get("status").and_then(Value::as_str).unwrap_or("unknown");
		Some(format!("Job ID: {id} | Status: {status}"))
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		let target = if self.hover.node.is_some() { 1.0 } else { 0.0 };
		self.hover.highlight_t += (target - self.hover.highlight_t) * 1.5 * dt as f64;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

impl HostGraph for ForceGraphState {
	fn node_ids(&self) -> Vec<ItemId> {
		(0..self.nodes.len() as u64)
			.map(ItemId::Node)
			.filter(|&item| self.node(item).is_some())
			.collect()
	}

	fn edge_ids(&self) -> Vec<ItemId> {
		(0..self.edges.len() as u64)
			.map(ItemId::Edge)
			.filter(|&item| self.edge(item).is_some())
			.collect()
	}

	fn zoom(&self) -> f64 {
		self.transform.k
	}

	fn tag(&self, item: ItemId) -> Option<&Value> {
		self.node(item).map(|n| &n.tag)
	}

	fn is_group_node(&self, item: ItemId) -> bool {
		self.node(item).is_some_and(|n| n.group)
	}

	fn edge_source(&self, edge: ItemId) -> Option<ItemId> {
		self.edge(edge).map(|e| e.source)
	}

	fn style(&self, item: ItemId) -> Option<&StyleDescriptor> {
		match item {
			ItemId::Node(_) => self.node(item)?.style.as_ref(),
			ItemId::Edge(_) => self.edge(item)?.style.as_ref(),
		}
	}

	fn set_style(&mut self, item: ItemId, style: StyleDescriptor) -> Result<(), HostError> {
		let slot = match item {
			ItemId::Node(i) => self
				.nodes
				.get_mut(i as usize)
				.filter(|n| !n.removed)
				.map(|n| &mut n.style),
			ItemId::Edge(i) => self
				.edges
				.get_mut(i as usize)
				.filter(|e| !e.removed)
				.map(|e| &mut e.style),
		};
		let slot = slot.ok_or(HostError::MissingItem(item))?;
		*slot = Some(style);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};
	use crate::switching::style::{ContainerStyle, StyleProvider};
	use crate::switching::{GraphEvent, RenderingMode, SwitchOrchestrator, Threshold};

	fn sample() -> GraphData {
		let node = |id: &str, parent: Option<&str>, group: bool, status: &str| GraphNode {
			id: id.into(),
			label: None,
			parent: parent.map(Into::into),
			group,
			tag: json!({ "id": id, "status": status }),
		};
		GraphData {
			nodes: vec![
				node("g", None, true, "group"),
				node("a", Some("g"), false, "present"),
				node("b", None, false, "busy"),
			],
			links: vec![GraphLink {
				source: "a".into(),
				target: "b".into(),
			}],
		}
	}

	#[test]
	fn exposes_items_to_the_switch() {
		let container = ContainerStyle {
			fill: "none",
			stroke: "none",
			collapsed: false,
		};
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		assert_eq!(state.node_ids().len(), 3);
		assert_eq!(state.edge_ids(), vec![ItemId::Edge(0)]);
		assert!(state.is_group_node(ItemId::Node(0)));
		assert_eq!(state.edge_source(ItemId::Edge(0)), Some(ItemId::Node(1)));
		assert_eq!(
			state.set_style(ItemId::Edge(4), StyleDescriptor::Container(container)),
			Err(HostError::MissingItem(ItemId::Edge(4)))
		);
	}

	#[test]
	fn zooming_swaps_styles_without_touching_interaction_state() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		let mut switch = SwitchOrchestrator::new(Threshold::Zoom(0.5), StyleProvider::default());
		switch.attach(&mut state).unwrap();
		assert_eq!(state.style(ItemId::Node(2)).map(|s| s.mode()), Some(RenderingMode::Detailed));

		state.set_hover(Some(ItemId::Node(2)));
		state.pan.active = true;
		state.transform.k = 0.2;
		switch.handle_event(&mut state, GraphEvent::ZoomChanged(0.2));

		assert_eq!(state.style(ItemId::Node(2)).map(|s| s.mode()), Some(RenderingMode::Simplified));
		assert_eq!(state.style(ItemId::Node(0)).map(|s| s.mode()), Some(RenderingMode::Detailed));
		assert_eq!(state.hover.node, Some(ItemId::Node(2)));
		assert!(state.hover.neighbors.contains(&ItemId::Node(1)));
		assert!(state.pan.active);
	}

	#[test]
	fn removing_a_node_drops_its_edges_and_hover() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		let mut switch = SwitchOrchestrator::new(Threshold::Zoom(0.5), StyleProvider::default());
		switch.attach(&mut state).unwrap();
		state.set_hover(Some(ItemId::Node(1)));

		let removed = state.remove_node(ItemId::Node(1));
		assert_eq!(removed, vec![ItemId::Node(1), ItemId::Edge(0)]);
		for item in removed {
			switch.handle_event(&mut state, GraphEvent::ItemRemoved(item));
		}

		assert_eq!(state.counts(), (2, 0));
		assert_eq!(state.node_ids(), vec![ItemId::Node(0), ItemId::Node(2)]);
		assert!(state.edge_ids().is_empty());
		assert_eq!(state.hover.node, None);
		assert_eq!(switch.registry().len(), 2);
		assert!(state.remove_node(ItemId::Node(1)).is_empty());
	}

	#[test]
	fn collapsing_a_group_hides_its_members() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0);
		let mut switch = SwitchOrchestrator::new(Threshold::Zoom(0.5), StyleProvider::default());
		switch.attach(&mut state).unwrap();
		assert!(!state.toggle_collapsed(ItemId::Node(2)));

		assert!(state.toggle_collapsed(ItemId::Node(0)));
		switch.handle_event(&mut state, GraphEvent::ItemChanged(ItemId::Node(0)));
		assert!(state.is_hidden(ItemId::Node(1)));
		assert!(state.is_hidden(ItemId::Edge(0)));
		assert!(!state.is_hidden(ItemId::Node(2)));
		assert!(matches!(
			state.style(ItemId::Node(0)),
			Some(StyleDescriptor::Container(ContainerStyle { collapsed: true, .. }))
		));

		assert!(state.toggle_collapsed(ItemId::Node(0)));
		assert!(!state.is_hidden(ItemId::Node(1)));
	}

	#[test]
	fn created_nodes_cycle_statuses_and_show_tooltips() {
		let mut state = ForceGraphState::new(&GraphData::default(), 800.0, 600.0);
		let first = state.create_node_at(400.0, 300.0);
		let second = state.create_node_at(420.0, 300.0);
		assert_eq!(state.tag(first).and_then(|t| t["status"].as_str()), Some("busy"));
		assert_eq!(state.tag(second).and_then(|t| t["status"].as_str()), Some("unavailable"));
		assert_eq!(state.node(second).and_then(|n| n.label.as_deref()), Some("Item 1"));

		state.set_hover(Some(second));
		assert_eq!(state.tooltip().as_deref(), Some("Job ID: 1 | Status: unavailable"));
	}
}
