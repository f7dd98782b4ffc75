use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	pub id: String,
	#[serde(default)]
	pub label: Option<String>,
	/// Id of the containing group node.
	#[serde(default)]
	pub parent: Option<String>,
	#[serde(default)]
	pub group: bool,
	#[serde(default)]
	pub tag: Value,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	#[serde(default, alias = "edges")]
	pub links: Vec<GraphLink>,
}

impl GraphData {
	pub fn from_json(raw: &str) -> serde_json::Result<Self> {
		serde_json::from_str(raw)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_graph_document() {
		let data = GraphData::from_json(
			r#"{
				"nodes": [
					{ "id": "g", "group": true, "tag": { "status": "group" } },
					{ "id": "a", "parent": "g", "label": "Item a", "tag": { "status": "busy", "id": 1 } },
					{ "id": "b" }
				],
				"edges": [ { "source": "a", "target": "b" } ]
			}"#,
		)
		.unwrap();
		assert_eq!(data.nodes.len(), 3);
		assert!(data.nodes[0].group);
		assert_eq!(data.nodes[1].parent.as_deref(), Some("g"));
		assert!(data.nodes[2].tag.is_null());
		assert_eq!(data.links[0].target, "b");
	}
}
