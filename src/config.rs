//! Demo configuration: initial threshold, sample size and style variant.

use serde::Deserialize;

use crate::switching::style::{BadgeLayout, IconSet, StatusPalette, StyleProvider};
use crate::switching::{Threshold, ThresholdError};

/// A selectable threshold preset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdOption {
	pub text: &'static str,
	pub value: &'static str,
}

pub const THRESHOLD_OPTIONS: &[ThresholdOption] = &[
	ThresholdOption { text: "≥ 25%", value: "0.25" },
	ThresholdOption { text: "≥ 50%", value: "0.5" },
	ThresholdOption { text: "≥ 100%", value: "1.0" },
	ThresholdOption { text: "WebGL only", value: "-1" },
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
	#[error("`{0}` is not a threshold")]
	Unparsable(String),
	#[error(transparent)]
	Threshold(#[from] ThresholdError),
	#[error("invalid configuration: {0}")]
	Json(String),
}

/// Parses a select value. Negative numbers mean "simplified only".
pub fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
	let value: f64 = raw
		.trim()
		.parse()
		.map_err(|_| ConfigError::Unparsable(raw.to_string()))?;
	Ok(if value < 0.0 { f64::INFINITY } else { value })
}

/// Select value that corresponds to a threshold, if it is one of the presets.
pub fn option_value(threshold: Threshold) -> Option<&'static str> {
	THRESHOLD_OPTIONS.iter().map(|o| o.value).find(|value| {
		parse_threshold(value)
			.ok()
			.and_then(|v| Threshold::new(v).ok())
			.is_some_and(|t| t == threshold)
	})
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteChoice {
	#[default]
	Classic,
	HighContrast,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DemoConfig {
	/// Raw threshold; negative values select "simplified only".
	pub svg_threshold: f64,
	pub sample_size: usize,
	pub palette: PaletteChoice,
	pub badges: bool,
}

impl Default for DemoConfig {
	fn default() -> Self {
		Self {
			svg_threshold: 0.25,
			sample_size: 1000,
			palette: PaletteChoice::Classic,
			badges: true,
		}
	}
}

impl DemoConfig {
	pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
		serde_json::from_str(raw).map_err(|e| ConfigError::Json(e.to_string()))
	}

	pub fn threshold(&self) -> Result<Threshold, ConfigError> {
		let value = if self.svg_threshold < 0.0 {
			f64::INFINITY
		} else {
			self.svg_threshold
		};
		Ok(Threshold::new(value)?)
	}

	pub fn style_provider(&self) -> StyleProvider {
		let palette = match self.palette {
			PaletteChoice::Classic => StatusPalette::classic(),
			PaletteChoice::HighContrast => StatusPalette::high_contrast(),
		};
		let badges = BadgeLayout {
			enabled: self.badges,
			..BadgeLayout::default()
		};
		StyleProvider::new(palette, IconSet::default(), badges)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn select_values_parse() {
		assert_eq!(parse_threshold("0.5"), Ok(0.5));
		assert_eq!(parse_threshold(" 1.0 "), Ok(1.0));
		assert_eq!(parse_threshold("-1"), Ok(f64::INFINITY));
		assert!(matches!(parse_threshold("half"), Err(ConfigError::Unparsable(_))));
	}

	#[test]
	fn presets_map_back_to_values() {
		assert_eq!(option_value(Threshold::Zoom(0.5)), Some("0.5"));
		assert_eq!(option_value(Threshold::AlwaysSimplified), Some("-1"));
		assert_eq!(option_value(Threshold::Zoom(0.3)), None);
	}

	#[test]
	fn json_overrides_defaults() {
		let config = DemoConfig::from_json(r#"{ "svgThreshold": -1, "palette": "high-contrast" }"#).unwrap();
		assert_eq!(config.threshold(), Ok(Threshold::AlwaysSimplified));
		assert_eq!(config.sample_size, 1000);
		assert_eq!(config.style_provider().palette, StatusPalette::high_contrast());
	}

	#[test]
	fn zero_threshold_is_rejected() {
		let config = DemoConfig {
			svg_threshold: 0.0,
			..DemoConfig::default()
		};
		assert!(matches!(
			config.threshold(),
			Err(ConfigError::Threshold(ThresholdError::NotPositive(_)))
		));
		assert!(DemoConfig::from_json("{ nope").is_err());
	}
}
