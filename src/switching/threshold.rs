//! Zoom threshold and the memoryless zoom → mode classification.

use std::fmt;

use super::mode::RenderingMode;

/// Rejected threshold values. The previous threshold stays in effect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
	#[error("threshold is not a number")]
	NotANumber,
	#[error("threshold must be positive, got {0}")]
	NotPositive(f64),
}

/// Zoom value at or above which items are drawn detailed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Threshold {
	/// Finite, strictly positive zoom factor.
	Zoom(f64),
	/// Never draw detailed.
	AlwaysSimplified,
}

impl Threshold {
	/// Validates a raw value. `f64::INFINITY` maps to [`Threshold::AlwaysSimplified`].
	pub fn new(value: f64) -> Result<Self, ThresholdError> {
		if value.is_nan() {
			return Err(ThresholdError::NotANumber);
		}
		if value <= 0.0 {
			return Err(ThresholdError::NotPositive(value));
		}
		if value.is_infinite() {
			return Ok(Threshold::AlwaysSimplified);
		}
		Ok(Threshold::Zoom(value))
	}

	/// `floor(threshold * 100)`, `None` for the sentinel.
	pub fn percent(self) -> Option<u32> {
		match self {
			Threshold::Zoom(t) => Some((t * 100.0).floor() as u32),
			Threshold::AlwaysSimplified => None,
		}
	}
}

impl Default for Threshold {
	fn default() -> Self {
		Threshold::Zoom(0.25)
	}
}

impl fmt::Display for Threshold {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Threshold::Zoom(t) => write!(f, "{}%", (t * 100.0).floor()),
			Threshold::AlwaysSimplified => f.write_str("WebGL only"),
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct ThresholdPolicy {
	threshold: Threshold,
}

impl ThresholdPolicy {
	pub fn new(threshold: Threshold) -> Self {
		Self { threshold }
	}

	pub fn threshold(&self) -> Threshold {
		self.threshold
	}

	/// Replaces the threshold. Items are untouched until the next query.
	pub fn set_threshold(&mut self, value: f64) -> Result<(), ThresholdError> {
		self.threshold = Threshold::new(value)?;
		Ok(())
	}

	pub fn mode_for(&self, zoom: f64) -> RenderingMode {
		match self.threshold {
			Threshold::Zoom(t) if zoom >= t => RenderingMode::Detailed,
			_ => RenderingMode::Simplified,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn detailed_iff_zoom_reaches_threshold() {
		let policy = ThresholdPolicy::new(Threshold::Zoom(0.5));
		for zoom in [0.1, 0.3, 0.499_999, 0.5, 0.6, 1.0, 9.5] {
			let expected = if zoom >= 0.5 {
				RenderingMode::Detailed
			} else {
				RenderingMode::Simplified
			};
			assert_eq!(policy.mode_for(zoom), expected, "zoom {zoom}");
		}
	}

	#[test]
	fn sentinel_is_always_simplified() {
		let policy = ThresholdPolicy::new(Threshold::AlwaysSimplified);
		for zoom in [0.1, 1.0, 10.0, f64::MAX] {
			assert_eq!(policy.mode_for(zoom), RenderingMode::Simplified);
		}
	}

	#[test]
	fn infinity_normalises_to_sentinel() {
		assert_eq!(Threshold::new(f64::INFINITY), Ok(Threshold::AlwaysSimplified));
	}

	#[test]
	fn rejected_values_keep_previous_threshold() {
		let mut policy = ThresholdPolicy::new(Threshold::Zoom(0.5));
		assert_eq!(policy.set_threshold(f64::NAN), Err(ThresholdError::NotANumber));
		assert_eq!(policy.set_threshold(-1.0), Err(ThresholdError::NotPositive(-1.0)));
		assert_eq!(policy.set_threshold(0.0), Err(ThresholdError::NotPositive(0.0)));
		assert_eq!(policy.threshold(), Threshold::Zoom(0.5));

		policy.set_threshold(1.0).unwrap();
		assert_eq!(policy.threshold(), Threshold::Zoom(1.0));
	}

	#[test]
	fn percent_floors() {
		assert_eq!(Threshold::Zoom(0.25).percent(), Some(25));
		assert_eq!(Threshold::Zoom(0.999).percent(), Some(99));
		assert_eq!(Threshold::AlwaysSimplified.percent(), None);
	}
}
