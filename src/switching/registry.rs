//! Per-item mode bookkeeping and the dominant-mode cache.

use std::collections::HashMap;

use super::host::ItemId;
use super::mode::RenderingMode;

#[derive(Debug, Default)]
pub struct RenderingTypeRegistry {
	modes: HashMap<ItemId, RenderingMode>,
	detailed: usize,
	simplified: usize,
	dominant: Option<RenderingMode>,
}

impl RenderingTypeRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record_item_mode(&mut self, item: ItemId, mode: RenderingMode) {
		if let Some(previous) = self.modes.insert(item, mode) {
			self.decrement(previous);
		}
		match mode {
			RenderingMode::Detailed => self.detailed += 1,
			RenderingMode::Simplified => self.simplified += 1,
		}
	}

	pub fn forget_item(&mut self, item: ItemId) {
		if let Some(previous) = self.modes.remove(&item) {
			self.decrement(previous);
		}
	}

	fn decrement(&mut self, mode: RenderingMode) {
		match mode {
			RenderingMode::Detailed => self.detailed -= 1,
			RenderingMode::Simplified => self.simplified -= 1,
		}
	}

	pub fn item_mode(&self, item: ItemId) -> Option<RenderingMode> {
		self.modes.get(&item).copied()
	}

	pub fn len(&self) -> usize {
		self.modes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.modes.is_empty()
	}

	/// Recomputes the dominant mode from the current per-item records.
	/// Ties go to [`RenderingMode::Simplified`].
	pub fn settle(&mut self) -> Option<RenderingMode> {
		self.dominant = if self.modes.is_empty() {
			None
		} else if self.detailed > self.simplified {
			Some(RenderingMode::Detailed)
		} else {
			Some(RenderingMode::Simplified)
		};
		self.dominant
	}

	/// Dominant mode as of the last [`settle`](Self::settle).
	pub fn dominant_mode(&self) -> Option<RenderingMode> {
		self.dominant
	}

	pub fn reset(&mut self) {
		self.modes.clear();
		self.detailed = 0;
		self.simplified = 0;
		self.dominant = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn majority_wins_and_tie_goes_simplified() {
		let mut registry = RenderingTypeRegistry::new();
		registry.record_item_mode(ItemId::Node(0), RenderingMode::Detailed);
		registry.record_item_mode(ItemId::Node(1), RenderingMode::Simplified);
		assert_eq!(registry.settle(), Some(RenderingMode::Simplified));

		registry.record_item_mode(ItemId::Edge(0), RenderingMode::Detailed);
		assert_eq!(registry.settle(), Some(RenderingMode::Detailed));
	}

	#[test]
	fn rerecording_an_item_moves_its_vote() {
		let mut registry = RenderingTypeRegistry::new();
		registry.record_item_mode(ItemId::Node(0), RenderingMode::Detailed);
		registry.record_item_mode(ItemId::Node(0), RenderingMode::Simplified);
		assert_eq!(registry.len(), 1);
		assert_eq!(registry.settle(), Some(RenderingMode::Simplified));
	}

	#[test]
	fn cache_only_moves_on_settle() {
		let mut registry = RenderingTypeRegistry::new();
		registry.record_item_mode(ItemId::Node(0), RenderingMode::Simplified);
		registry.settle();
		registry.record_item_mode(ItemId::Node(1), RenderingMode::Detailed);
		registry.record_item_mode(ItemId::Node(2), RenderingMode::Detailed);
		assert_eq!(registry.dominant_mode(), Some(RenderingMode::Simplified));
		assert_eq!(registry.settle(), Some(RenderingMode::Detailed));
	}

	#[test]
	fn forget_and_reset() {
		let mut registry = RenderingTypeRegistry::new();
		registry.record_item_mode(ItemId::Node(0), RenderingMode::Detailed);
		registry.record_item_mode(ItemId::Node(1), RenderingMode::Simplified);
		registry.forget_item(ItemId::Node(1));
		registry.forget_item(ItemId::Node(7));
		assert_eq!(registry.settle(), Some(RenderingMode::Detailed));

		registry.reset();
		assert!(registry.is_empty());
		assert_eq!(registry.dominant_mode(), None);
		assert_eq!(registry.settle(), None);
	}
}
