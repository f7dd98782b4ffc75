//! Contract with the graph that owns the items.

use std::fmt;

use serde_json::Value;

use super::style::StyleDescriptor;

/// Handle of a host-owned item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemId {
	Node(u64),
	Edge(u64),
}

impl fmt::Display for ItemId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ItemId::Node(id) => write!(f, "node {id}"),
			ItemId::Edge(id) => write!(f, "edge {id}"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
	#[error("{0} is not part of the graph")]
	MissingItem(ItemId),
	#[error("{item} rejected style: {reason}")]
	Rejected { item: ItemId, reason: String },
}

/// Notifications the host delivers to the orchestrator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GraphEvent {
	ZoomChanged(f64),
	ItemCreated(ItemId),
	/// The item's tag changed, e.g. a group was collapsed or expanded.
	ItemChanged(ItemId),
	ItemRemoved(ItemId),
}

/// The graph as seen by the switching engine.
///
/// Collections are returned as owned id lists so that the caller can write
/// styles while iterating.
pub trait HostGraph {
	fn node_ids(&self) -> Vec<ItemId>;
	fn edge_ids(&self) -> Vec<ItemId>;
	fn zoom(&self) -> f64;
	/// Domain payload of an item, if the item exists and carries one.
	fn tag(&self, item: ItemId) -> Option<&Value>;
	fn is_group_node(&self, item: ItemId) -> bool;
	/// Source node of an edge.
	fn edge_source(&self, edge: ItemId) -> Option<ItemId>;
	/// Currently assigned style.
	fn style(&self, item: ItemId) -> Option<&StyleDescriptor>;
	fn set_style(&mut self, item: ItemId, style: StyleDescriptor) -> Result<(), HostError>;
}
