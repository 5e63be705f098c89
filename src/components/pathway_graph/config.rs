//! Presentation configuration.
//!
//! Every section deserializes with `#[serde(default)]`, so a host page can
//! override a single constant without restating the rest:
//!
//! ```json
//! { "encoding": { "reproductive_radius": 14 }, "flow": { "particles": false } }
//! ```

use serde::{Deserialize, Serialize};

use super::animation::FlowConfig;
use super::encoding::EncodingConfig;
use super::geometry::CurveStyle;
use super::layout::{LayoutPolicy, Viewport};
use super::theme::Theme;

/// Which layout and curve family to use per viewport class.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutSettings {
	/// Placement on wide viewports.
	pub wide: LayoutPolicy,
	/// Placement on compact viewports.
	pub compact: LayoutPolicy,
	/// Edge curve on wide viewports.
	pub wide_curve: CurveStyle,
	/// Edge curve on compact viewports.
	pub compact_curve: CurveStyle,
}

impl Default for LayoutSettings {
	fn default() -> Self {
		Self {
			wide: LayoutPolicy::columns(),
			compact: LayoutPolicy::vertical(),
			wide_curve: CurveStyle::Curved,
			compact_curve: CurveStyle::Arc,
		}
	}
}

impl LayoutSettings {
	/// Layout policy for `viewport`.
	pub fn policy_for(&self, viewport: Viewport) -> &LayoutPolicy {
		if viewport.compact { &self.compact } else { &self.wide }
	}

	/// Curve style for `viewport`.
	pub fn curve_for(&self, viewport: Viewport) -> CurveStyle {
		if viewport.compact {
			self.compact_curve
		} else {
			self.wide_curve
		}
	}
}

/// All tunables of the graph view.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VisualConfig {
	/// Layout policy and curve per viewport class.
	pub layout: LayoutSettings,
	/// Size, width and opacity constants.
	pub encoding: EncodingConfig,
	/// Surface colors and strokes.
	pub theme: Theme,
	/// Animation timing.
	pub flow: FlowConfig,
}

impl VisualConfig {
	/// Parse a (possibly partial) JSON override document.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}
