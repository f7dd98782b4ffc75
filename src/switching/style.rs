//! Maps an item's tag, the zoom and the rendering mode to a concrete style.
//!
//! Two independent axes feed every descriptor: the [`RenderingMode`] picks the
//! technology, the semantic tag fields (status, group membership, resource
//! flags) pick colors, icons and badges within it. Visual variants are plain
//! data records ([`StatusPalette`], [`IconSet`], [`BadgeLayout`]) composed into
//! a [`StyleProvider`].

use serde_json::{Map, Value};

use super::host::ItemId;
use super::mode::RenderingMode;

/// CSS color string understood by the canvas.
pub type Color = &'static str;

pub const NEUTRAL: Color = "#c1c1c1";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
	Present,
	Busy,
	Unavailable,
	#[default]
	Unknown,
}

impl Status {
	/// Index order of the numeric `type` field.
	const BY_TYPE: [Status; 3] = [Status::Busy, Status::Unavailable, Status::Present];

	pub fn parse(raw: &str) -> Self {
		match raw {
			"present" => Status::Present,
			"busy" => Status::Busy,
			"unavailable" => Status::Unavailable,
			_ => Status::Unknown,
		}
	}

	fn from_type(raw: f64) -> Self {
		let index = if raw.is_finite() { raw.max(0.0) as usize } else { 0 };
		Self::BY_TYPE[index.min(Self::BY_TYPE.len() - 1)]
	}

	pub fn name(self) -> &'static str {
		match self {
			Status::Present => "present",
			Status::Busy => "busy",
			Status::Unavailable => "unavailable",
			Status::Unknown => "unknown",
		}
	}
}

/// Leniently parsed view of an item tag. Missing or mistyped fields fall back
/// to their defaults; parsing never fails.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeTag<'a> {
	pub status: Status,
	pub name: Option<&'a str>,
	pub inside_group: bool,
	pub collapsed: bool,
	pub global: bool,
	pub resource: bool,
}

impl<'a> NodeTag<'a> {
	pub fn from_value(value: Option<&'a Value>) -> Self {
		let Some(fields) = value.and_then(Value::as_object) else {
			return Self::default();
		};
		let status = match fields.get("status").and_then(Value::as_str) {
			Some(raw) => Status::parse(raw),
			None => fields
				.get("type")
				.and_then(Value::as_f64)
				.map(Status::from_type)
				.unwrap_or_default(),
		};
		Self {
			status,
			name: fields.get("name").and_then(Value::as_str),
			inside_group: flag(fields, "isInsideGroup"),
			collapsed: flag(fields, "collapsed"),
			global: flag(fields, "global"),
			resource: flag(fields, "resource"),
		}
	}
}

fn flag(fields: &Map<String, Value>, key: &str) -> bool {
	fields.get(key).and_then(Value::as_bool).unwrap_or(false)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
	Checkmark,
	Cross,
	Unavailable,
	Generic,
}

impl Icon {
	/// Single-glyph stand-in used by the canvas renderer.
	pub fn glyph(self) -> &'static str {
		match self {
			Icon::Checkmark => "✓",
			Icon::Cross => "✗",
			Icon::Unavailable => "⊘",
			Icon::Generic => "?",
		}
	}
}

/// Zoom-dependent richness of a detailed node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DetailLevel {
	/// Status-colored block with the abbreviated name.
	Overview,
	/// Status-colored block with icon and status caption.
	Compact,
	/// Thin header bar, icon and caption.
	Standard,
	/// Thinnest header bar plus badges.
	Full,
}

impl DetailLevel {
	pub fn for_zoom(zoom: f64) -> Self {
		if zoom < 0.25 {
			DetailLevel::Overview
		} else if zoom < 0.4 {
			DetailLevel::Compact
		} else if zoom < 0.7 {
			DetailLevel::Standard
		} else {
			DetailLevel::Full
		}
	}

	/// Height of the status bar for a node of the given height.
	pub fn header_height(self, node_height: f64) -> f64 {
		match self {
			DetailLevel::Overview | DetailLevel::Compact => node_height,
			DetailLevel::Standard => 10.0,
			DetailLevel::Full => 5.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Caption {
	Status(Status),
	Initials(String),
	None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Badges {
	pub globe: bool,
	pub resource: bool,
}

impl Badges {
	pub fn any(self) -> bool {
		self.globe || self.resource
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerStyle {
	pub fill: Color,
	pub stroke: Color,
	pub collapsed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DetailedNodeStyle {
	pub accent: Color,
	pub icon: Option<Icon>,
	pub centered_icon: bool,
	pub detail: DetailLevel,
	pub caption: Caption,
	pub badges: Badges,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimplifiedNodeStyle {
	pub fill: Color,
	pub stroke: Color,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
	pub mode: RenderingMode,
	pub stroke: Color,
	pub width: f64,
	pub arrow: bool,
}

/// Style written into the host graph for one item.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleDescriptor {
	Container(ContainerStyle),
	DetailedNode(DetailedNodeStyle),
	SimplifiedNode(SimplifiedNodeStyle),
	Edge(EdgeStyle),
}

impl StyleDescriptor {
	/// Technology the descriptor is drawn with. Containers are always vector.
	pub fn mode(&self) -> RenderingMode {
		match self {
			StyleDescriptor::Container(_) | StyleDescriptor::DetailedNode(_) => {
				RenderingMode::Detailed
			}
			StyleDescriptor::SimplifiedNode(_) => RenderingMode::Simplified,
			StyleDescriptor::Edge(edge) => edge.mode,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusPalette {
	pub present: Color,
	pub busy: Color,
	pub unavailable: Color,
	pub unknown: Color,
}

impl StatusPalette {
	pub fn classic() -> Self {
		Self {
			present: "#76b041",
			busy: "#ab2346",
			unavailable: "blue",
			unknown: NEUTRAL,
		}
	}

	pub fn high_contrast() -> Self {
		Self {
			present: "#00a651",
			busy: "#e00000",
			unavailable: "#1f3fff",
			unknown: "#808080",
		}
	}

	pub fn color(&self, status: Status) -> Color {
		match status {
			Status::Present => self.present,
			Status::Busy => self.busy,
			Status::Unavailable => self.unavailable,
			Status::Unknown => self.unknown,
		}
	}
}

impl Default for StatusPalette {
	fn default() -> Self {
		Self::classic()
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IconSet {
	pub present: Icon,
	pub busy: Icon,
	pub unavailable: Icon,
	pub unknown: Icon,
}

impl IconSet {
	pub fn icon(&self, status: Status) -> Icon {
		match status {
			Status::Present => self.present,
			Status::Busy => self.busy,
			Status::Unavailable => self.unavailable,
			Status::Unknown => self.unknown,
		}
	}
}

impl Default for IconSet {
	fn default() -> Self {
		Self {
			present: Icon::Checkmark,
			busy: Icon::Cross,
			unavailable: Icon::Unavailable,
			unknown: Icon::Generic,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BadgeLayout {
	pub enabled: bool,
	/// Lowest detail level at which badges are shown.
	pub min_detail: DetailLevel,
}

impl Default for BadgeLayout {
	fn default() -> Self {
		Self {
			enabled: true,
			min_detail: DetailLevel::Standard,
		}
	}
}

/// A node as presented to the provider.
#[derive(Clone, Copy, Debug)]
pub struct NodeView<'a> {
	pub id: ItemId,
	pub tag: Option<&'a Value>,
	pub is_group: bool,
}

/// An edge as presented to the provider.
#[derive(Clone, Copy, Debug)]
pub struct EdgeView<'a> {
	pub id: ItemId,
	pub source_tag: Option<&'a Value>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleProvider {
	pub palette: StatusPalette,
	pub icons: IconSet,
	pub badges: BadgeLayout,
}

impl StyleProvider {
	pub fn new(palette: StatusPalette, icons: IconSet, badges: BadgeLayout) -> Self {
		Self {
			palette,
			icons,
			badges,
		}
	}

	pub fn node_style(&self, node: &NodeView<'_>, zoom: f64, mode: RenderingMode) -> StyleDescriptor {
		let tag = NodeTag::from_value(node.tag);
		if node.is_group {
			return StyleDescriptor::Container(ContainerStyle {
				fill: "#3273D90A",
				stroke: "#3273D94D",
				collapsed: tag.collapsed,
			});
		}

		let color = self.palette.color(tag.status);
		match mode {
			RenderingMode::Simplified => StyleDescriptor::SimplifiedNode(SimplifiedNodeStyle {
				fill: color,
				stroke: color,
			}),
			RenderingMode::Detailed => {
				let detail = DetailLevel::for_zoom(zoom);
				let (icon, caption) = if detail == DetailLevel::Overview {
					let caption = tag
						.name
						.map(|name| Caption::Initials(abbreviate(name)))
						.unwrap_or(Caption::None);
					(None, caption)
				} else {
					(Some(self.icons.icon(tag.status)), Caption::Status(tag.status))
				};
				let badges = if self.badges.enabled && detail >= self.badges.min_detail {
					Badges {
						globe: tag.global,
						resource: tag.resource,
					}
				} else {
					Badges::default()
				};
				StyleDescriptor::DetailedNode(DetailedNodeStyle {
					accent: color,
					icon,
					centered_icon: tag.inside_group,
					detail,
					caption,
					badges,
				})
			}
		}
	}

	pub fn edge_style(&self, edge: &EdgeView<'_>, _zoom: f64, mode: RenderingMode) -> StyleDescriptor {
		let stroke = self.palette.color(NodeTag::from_value(edge.source_tag).status);
		let (width, arrow) = match mode {
			RenderingMode::Detailed => (2.0, true),
			RenderingMode::Simplified => (1.0, false),
		};
		StyleDescriptor::Edge(EdgeStyle {
			mode,
			stroke,
			width,
			arrow,
		})
	}
}

/// `"Jane Mary Doe"` → `"J. Mary Doe"`: first letter, then everything after the
/// first word.
pub fn abbreviate(name: &str) -> String {
	let mut chars = name.chars();
	let Some(first) = chars.next() else {
		return String::new();
	};
	let rest = chars.as_str();
	let tail = rest
		.find(char::is_whitespace)
		.map(|at| &rest[at..])
		.unwrap_or("");
	format!("{first}.{tail}")
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn node(tag: &Value) -> NodeView<'_> {
		NodeView {
			id: ItemId::Node(1),
			tag: Some(tag),
			is_group: false,
		}
	}

	#[test]
	fn status_picks_palette_color_in_both_modes() {
		let provider = StyleProvider::default();
		let tag = json!({ "status": "busy" });

		let StyleDescriptor::SimplifiedNode(simple) =
			provider.node_style(&node(&tag), 0.1, RenderingMode::Simplified)
		else {
			panic!("expected simplified node style");
		};
		assert_eq!(simple.fill, "#ab2346");

		let StyleDescriptor::DetailedNode(detailed) =
			provider.node_style(&node(&tag), 1.0, RenderingMode::Detailed)
		else {
			panic!("expected detailed node style");
		};
		assert_eq!(detailed.accent, "#ab2346");
		assert_eq!(detailed.icon, Some(Icon::Cross));
		assert_eq!(detailed.caption, Caption::Status(Status::Busy));
	}

	#[test]
	fn malformed_tags_get_the_default_look() {
		let provider = StyleProvider::default();
		for tag in [json!({}), json!(null), json!("busy"), json!({ "status": 7 })] {
			let style = provider.node_style(&node(&tag), 1.0, RenderingMode::Detailed);
			let StyleDescriptor::DetailedNode(detailed) = style else {
				panic!("expected detailed node style");
			};
			assert_eq!(detailed.accent, NEUTRAL);
			assert_eq!(detailed.icon, Some(Icon::Generic));
			assert_eq!(detailed.badges, Badges::default());
		}

		let untagged = NodeView {
			id: ItemId::Node(2),
			tag: None,
			is_group: false,
		};
		assert_eq!(
			provider.node_style(&untagged, 0.1, RenderingMode::Simplified),
			StyleDescriptor::SimplifiedNode(SimplifiedNodeStyle {
				fill: NEUTRAL,
				stroke: NEUTRAL,
			})
		);
	}

	#[test]
	fn numeric_type_is_used_when_status_is_missing() {
		assert_eq!(NodeTag::from_value(Some(&json!({ "type": 2 }))).status, Status::Present);
		assert_eq!(NodeTag::from_value(Some(&json!({ "type": 99 }))).status, Status::Present);
		assert_eq!(NodeTag::from_value(Some(&json!({ "type": -4 }))).status, Status::Busy);
		assert_eq!(
			NodeTag::from_value(Some(&json!({ "type": 0, "status": "present" }))).status,
			Status::Present
		);
	}

	#[test]
	fn groups_are_containers_in_every_mode() {
		let provider = StyleProvider::default();
		let tag = json!({ "status": "group", "collapsed": true });
		let group = NodeView {
			id: ItemId::Node(0),
			tag: Some(&tag),
			is_group: true,
		};
		for mode in [RenderingMode::Detailed, RenderingMode::Simplified] {
			let style = provider.node_style(&group, 0.1, mode);
			assert!(matches!(
				style,
				StyleDescriptor::Container(ContainerStyle { collapsed: true, .. })
			));
			assert_eq!(style.mode(), RenderingMode::Detailed);
		}
	}

	#[test]
	fn overview_shows_initials_and_full_detail_shows_badges() {
		let provider = StyleProvider::default();
		let tag = json!({ "status": "present", "name": "Ada Lovelace", "global": true });

		let StyleDescriptor::DetailedNode(overview) =
			provider.node_style(&node(&tag), 0.2, RenderingMode::Detailed)
		else {
			panic!("expected detailed node style");
		};
		assert_eq!(overview.detail, DetailLevel::Overview);
		assert_eq!(overview.icon, None);
		assert_eq!(overview.caption, Caption::Initials("A. Lovelace".into()));
		assert!(!overview.badges.any());

		let StyleDescriptor::DetailedNode(full) =
			provider.node_style(&node(&tag), 2.0, RenderingMode::Detailed)
		else {
			panic!("expected detailed node style");
		};
		assert_eq!(full.detail, DetailLevel::Full);
		assert!(full.badges.globe);
		assert!(!full.badges.resource);
	}

	#[test]
	fn edges_follow_source_status_and_mode() {
		let provider = StyleProvider::default();
		let source = json!({ "status": "present" });
		let edge = EdgeView {
			id: ItemId::Edge(0),
			source_tag: Some(&source),
		};
		assert_eq!(
			provider.edge_style(&edge, 1.0, RenderingMode::Detailed),
			StyleDescriptor::Edge(EdgeStyle {
				mode: RenderingMode::Detailed,
				stroke: "#76b041",
				width: 2.0,
				arrow: true,
			})
		);
		let orphan = EdgeView {
			id: ItemId::Edge(1),
			source_tag: None,
		};
		let style = provider.edge_style(&orphan, 0.1, RenderingMode::Simplified);
		assert_eq!(style.mode(), RenderingMode::Simplified);
	}

	#[test]
	fn abbreviate_keeps_everything_after_first_word() {
		assert_eq!(abbreviate("Grace Brewster Hopper"), "G. Brewster Hopper");
		assert_eq!(abbreviate("Linus"), "L.");
		assert_eq!(abbreviate(""), "");
	}

	#[test]
	fn detail_level_boundaries() {
		assert_eq!(DetailLevel::for_zoom(0.249), DetailLevel::Overview);
		assert_eq!(DetailLevel::for_zoom(0.25), DetailLevel::Compact);
		assert_eq!(DetailLevel::for_zoom(0.4), DetailLevel::Standard);
		assert_eq!(DetailLevel::for_zoom(0.7), DetailLevel::Full);
		assert_eq!(DetailLevel::Standard.header_height(100.0), 10.0);
		assert_eq!(DetailLevel::Compact.header_height(100.0), 100.0);
	}
}
