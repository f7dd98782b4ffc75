//! Zoom-driven switching between detailed and simplified item rendering.

pub mod host;
pub mod mode;
pub mod orchestrator;
pub mod registry;
pub mod style;
pub mod threshold;

pub use host::{GraphEvent, HostError, HostGraph, ItemId};
pub use mode::{ActiveRenderingType, RenderingMode};
pub use orchestrator::{
	DisposeHandle, Lifecycle, PassStats, RenderingTypeChanged, RenderingTypeListener, SwitchError,
	SwitchOrchestrator,
};
pub use registry::RenderingTypeRegistry;
pub use style::{StyleDescriptor, StyleProvider};
pub use threshold::{Threshold, ThresholdError, ThresholdPolicy};
