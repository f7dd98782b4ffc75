//! Lifecycle and event handling of the renderer switch.
//!
//! One orchestrator is constructed per loaded graph. `attach` establishes the
//! initial styles, `handle_event` reacts to zoom and item changes, and
//! `dispose` detaches. Disposal may happen from inside a style write or from
//! the mode-changed listener through a [`DisposeHandle`]; the running pass then
//! completes but its broadcast is dropped, and the registry and listener are
//! released as soon as the orchestrator observes the disposal.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, info, warn};

use super::host::{GraphEvent, HostGraph, ItemId};
use super::mode::{ActiveRenderingType, RenderingMode};
use super::registry::RenderingTypeRegistry;
use super::style::{EdgeView, NodeView, StyleDescriptor, StyleProvider};
use super::threshold::{Threshold, ThresholdError, ThresholdPolicy};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SwitchError {
	#[error(transparent)]
	InvalidThreshold(#[from] ThresholdError),
	#[error("orchestrator is already attached to a graph")]
	AlreadyAttached,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
	Idle,
	Active,
	Disposed,
}

/// Payload of a rendering-type notification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderingTypeChanged {
	pub mode: RenderingMode,
	pub threshold: Threshold,
	pub threshold_percent: Option<u32>,
}

impl RenderingTypeChanged {
	/// Popup text for the overlay.
	pub fn message(&self) -> String {
		let percent = self
			.threshold_percent
			.map(|p| format!("{p}%"))
			.unwrap_or_else(|| "any zoom".to_string());
		match self.mode {
			RenderingMode::Detailed => format!("SVG rendering at zoom above {percent}"),
			RenderingMode::Simplified => format!("WebGL rendering at zoom below {percent}"),
		}
	}
}

/// Observer of overall rendering-mode flips.
pub trait RenderingTypeListener {
	fn rendering_type_changed(&mut self, change: &RenderingTypeChanged);
}

impl<F: FnMut(&RenderingTypeChanged)> RenderingTypeListener for F {
	fn rendering_type_changed(&mut self, change: &RenderingTypeChanged) {
		self(change)
	}
}

/// Cloneable handle that disposes its orchestrator without borrowing it.
///
/// Only the lifecycle flips here; the orchestrator releases its registry and
/// listener on its next call.
#[derive(Clone, Debug)]
pub struct DisposeHandle(Rc<Cell<Lifecycle>>);

impl DisposeHandle {
	pub fn dispose(&self) {
		if self.0.replace(Lifecycle::Disposed) != Lifecycle::Disposed {
			debug!("renderer switch disposal requested");
		}
	}

	pub fn is_disposed(&self) -> bool {
		self.0.get() == Lifecycle::Disposed
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
	pub evaluated: usize,
	pub written: usize,
	pub failed: usize,
}

pub struct SwitchOrchestrator {
	lifecycle: Rc<Cell<Lifecycle>>,
	policy: ThresholdPolicy,
	provider: StyleProvider,
	registry: RenderingTypeRegistry,
	active: ActiveRenderingType,
	listener: Option<Box<dyn RenderingTypeListener>>,
	last_pass: PassStats,
	released: bool,
}

impl SwitchOrchestrator {
	pub fn new(threshold: Threshold, provider: StyleProvider) -> Self {
		Self {
			lifecycle: Rc::new(Cell::new(Lifecycle::Idle)),
			policy: ThresholdPolicy::new(threshold),
			provider,
			registry: RenderingTypeRegistry::new(),
			active: ActiveRenderingType::Unknown,
			listener: None,
			last_pass: PassStats::default(),
			released: false,
		}
	}

	pub fn set_rendering_type_listener(&mut self, listener: impl RenderingTypeListener + 'static) {
		self.listener = Some(Box::new(listener));
	}

	pub fn dispose_handle(&self) -> DisposeHandle {
		DisposeHandle(self.lifecycle.clone())
	}

	pub fn lifecycle(&self) -> Lifecycle {
		self.lifecycle.get()
	}

	pub fn threshold(&self) -> Threshold {
		self.policy.threshold()
	}

	pub fn current_rendering_type(&self) -> ActiveRenderingType {
		self.active
	}

	pub fn registry(&self) -> &RenderingTypeRegistry {
		&self.registry
	}

	/// Statistics of the most recent zoom or full pass.
	pub fn last_pass(&self) -> PassStats {
		self.last_pass
	}

	pub fn attach<G: HostGraph>(&mut self, graph: &mut G) -> Result<(), SwitchError> {
		match self.observe_lifecycle() {
			Lifecycle::Idle => {}
			Lifecycle::Active => return Err(SwitchError::AlreadyAttached),
			Lifecycle::Disposed => return Ok(()),
		}
		self.registry.reset();
		self.active = ActiveRenderingType::Unknown;
		self.lifecycle.set(Lifecycle::Active);
		info!("renderer switch attached at threshold {}", self.policy.threshold());

		let zoom = graph.zoom();
		self.run_pass(graph, zoom);
		Ok(())
	}

	/// Validates and applies a new threshold, then re-evaluates every item.
	pub fn set_threshold<G: HostGraph>(&mut self, graph: &mut G, value: f64) -> Result<(), SwitchError> {
		if self.observe_lifecycle() == Lifecycle::Disposed {
			return Ok(());
		}
		if let Err(err) = self.policy.set_threshold(value) {
			warn!("rejected threshold {value}: {err}");
			return Err(err.into());
		}
		info!("threshold set to {}", self.policy.threshold());
		if self.lifecycle.get() == Lifecycle::Active {
			let zoom = graph.zoom();
			self.run_pass(graph, zoom);
		}
		Ok(())
	}

	pub fn handle_event<G: HostGraph>(&mut self, graph: &mut G, event: GraphEvent) {
		if self.observe_lifecycle() != Lifecycle::Active {
			return;
		}
		match event {
			GraphEvent::ZoomChanged(zoom) => self.run_pass(graph, zoom),
			GraphEvent::ItemCreated(item) | GraphEvent::ItemChanged(item) => {
				let zoom = graph.zoom();
				let mode = self.policy.mode_for(zoom);
				let mut stats = PassStats::default();
				self.apply(graph, item, zoom, mode, &mut stats);
			}
			GraphEvent::ItemRemoved(item) => self.registry.forget_item(item),
		}
	}

	/// Idempotent; later events and calls are ignored.
	pub fn dispose(&mut self) {
		self.lifecycle.set(Lifecycle::Disposed);
		self.observe_lifecycle();
	}

	/// Current lifecycle. A disposal requested through a [`DisposeHandle`] is
	/// completed here.
	fn observe_lifecycle(&mut self) -> Lifecycle {
		let lifecycle = self.lifecycle.get();
		if lifecycle == Lifecycle::Disposed && !self.released {
			self.registry.reset();
			self.listener = None;
			self.released = true;
			info!("renderer switch disposed");
		}
		lifecycle
	}

	fn run_pass<G: HostGraph>(&mut self, graph: &mut G, zoom: f64) {
		let mode = self.policy.mode_for(zoom);
		let mut stats = PassStats::default();
		for item in graph.node_ids().into_iter().chain(graph.edge_ids()) {
			self.apply(graph, item, zoom, mode, &mut stats);
		}
		self.last_pass = stats;
		debug!(
			"pass at zoom {zoom:.3} ({mode}): {} evaluated, {} written, {} failed",
			stats.evaluated, stats.written, stats.failed
		);

		// An empty graph has no majority; fall back to what the zoom selects.
		let dominant = self.registry.settle().unwrap_or(mode);
		self.broadcast(dominant);
		self.observe_lifecycle();
	}

	fn apply<G: HostGraph>(
		&mut self,
		graph: &mut G,
		item: ItemId,
		zoom: f64,
		mode: RenderingMode,
		stats: &mut PassStats,
	) {
		stats.evaluated += 1;
		let style = self.resolve(graph, item, zoom, mode);
		if graph.style(item) != Some(&style) {
			if let Err(err) = graph.set_style(item, style) {
				warn!("skipping {item}: {err}");
				stats.failed += 1;
				return;
			}
			stats.written += 1;
		}
		// Containers keep their vector look but still vote with the zoom.
		self.registry.record_item_mode(item, mode);
	}

	fn resolve<G: HostGraph>(&self, graph: &G, item: ItemId, zoom: f64, mode: RenderingMode) -> StyleDescriptor {
		match item {
			ItemId::Node(_) => {
				let view = NodeView {
					id: item,
					tag: graph.tag(item),
					is_group: graph.is_group_node(item),
				};
				self.provider.node_style(&view, zoom, mode)
			}
			ItemId::Edge(_) => {
				let view = EdgeView {
					id: item,
					source_tag: graph.edge_source(item).and_then(|source| graph.tag(source)),
				};
				self.provider.edge_style(&view, zoom, mode)
			}
		}
	}

	fn broadcast(&mut self, mode: RenderingMode) {
		if self.lifecycle.get() != Lifecycle::Active || !self.active.differs_from(mode) {
			return;
		}
		self.active = ActiveRenderingType::Known(mode);
		let threshold = self.policy.threshold();
		let change = RenderingTypeChanged {
			mode,
			threshold,
			threshold_percent: threshold.percent(),
		};
		info!("rendering type changed to {mode}");
		if let Some(listener) = self.listener.as_mut() {
			listener.rendering_type_changed(&change);
		}
	}
}
