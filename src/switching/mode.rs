use std::fmt;

/// Which rendering technology an item is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderingMode {
	/// Rich vector markup: header, icon, caption, badges.
	Detailed,
	/// Flat GPU-style shapes for large graphs at low zoom.
	Simplified,
}

impl RenderingMode {
	/// Short name shown in the rendering overlay.
	pub fn label(self) -> &'static str {
		match self {
			RenderingMode::Detailed => "SVG",
			RenderingMode::Simplified => "WebGL",
		}
	}
}

impl fmt::Display for RenderingMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// The last mode broadcast to observers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActiveRenderingType {
	/// Nothing broadcast since the graph was attached.
	#[default]
	Unknown,
	/// Last broadcast mode.
	Known(RenderingMode),
}

impl ActiveRenderingType {
	/// Whether broadcasting `mode` would tell observers anything new.
	pub fn differs_from(self, mode: RenderingMode) -> bool {
		self != ActiveRenderingType::Known(mode)
	}
}

impl fmt::Display for ActiveRenderingType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ActiveRenderingType::Unknown => f.write_str("-"),
			ActiveRenderingType::Known(mode) => mode.fmt(f),
		}
	}
}
