//! Clinical scenarios and lab range classification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::Severity;

/// A preset set of thyroid lab values with its reproductive consequences.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scenario {
	/// Stable identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Short description.
	pub description: String,
	/// Lab values keyed by thyroid node id.
	pub thyroid_values: BTreeMap<String, f64>,
	/// Expected reproductive consequences.
	pub reproductive_impacts: Vec<String>,
	/// Free-form clinical notes.
	pub clinical_notes: String,
	/// Explicit severity; inferred from the id when absent.
	pub severity: Option<Severity>,
}

impl Scenario {
	/// Severity this scenario implies for node sizing and coloring.
	pub fn severity(&self) -> Severity {
		if let Some(severity) = self.severity {
			return severity;
		}
		if self.id == "optimal" {
			Severity::Normal
		} else if self.id.contains("uncontrolled") || self.id == "overt-hypo" {
			Severity::Overt
		} else {
			Severity::Subclinical
		}
	}
}

/// A reference range as written in the dataset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RangeSpec {
	/// `<x`
	Below(f64),
	/// `>x`
	Above(f64),
	/// `low-high`, inclusive.
	Between(f64, f64),
}

/// Longest leading decimal number in `s` (digits with at most one dot).
fn leading_number(s: &str) -> Option<f64> {
	let s = s.trim_start();
	let mut seen_dot = false;
	let end = s
		.char_indices()
		.find(|&(_, c)| {
			if c == '.' && !seen_dot {
				seen_dot = true;
				false
			} else {
				!c.is_ascii_digit()
			}
		})
		.map_or(s.len(), |(i, _)| i);
	s[..end].parse().ok()
}

impl RangeSpec {
	/// Parse `<2.5`, `>40`, `3.0-4.0` or `3.0-4.0 (upper half)`.
	pub fn parse(text: &str) -> Option<Self> {
		let text = text.trim();
		if let Some(rest) = text.strip_prefix('<') {
			return leading_number(rest).map(RangeSpec::Below);
		}
		if let Some(rest) = text.strip_prefix('>') {
			return leading_number(rest).map(RangeSpec::Above);
		}
		let (low, high) = text.split_once('-')?;
		Some(RangeSpec::Between(leading_number(low)?, leading_number(high)?))
	}

	/// Whether `value` satisfies the range.
	pub fn contains(&self, value: f64) -> bool {
		match *self {
			RangeSpec::Below(max) => value < max,
			RangeSpec::Above(min) => value > min,
			RangeSpec::Between(min, max) => (min..=max).contains(&value),
		}
	}
}

/// Whether `value` satisfies a range string. Unparseable ranges are satisfied.
pub fn in_range(value: f64, range: &str) -> bool {
	RangeSpec::parse(range).is_none_or(|r| r.contains(value))
}

/// Where a lab value sits relative to its reference ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabStatus {
	/// Inside the optimal range.
	Optimal,
	/// Inside the normal range but outside the optimal one.
	Suboptimal,
	/// Outside the normal range.
	Abnormal,
}

impl LabStatus {
	/// Lowercase name, usable as a CSS class.
	pub fn as_str(self) -> &'static str {
		match self {
			LabStatus::Optimal => "optimal",
			LabStatus::Suboptimal => "suboptimal",
			LabStatus::Abnormal => "abnormal",
		}
	}
}

/// Grade a lab value against its normal and optional optimal range.
pub fn classify(value: f64, normal: &str, optimal: Option<&str>) -> LabStatus {
	if optimal.is_some_and(|o| in_range(value, o)) {
		LabStatus::Optimal
	} else if in_range(value, normal) {
		LabStatus::Suboptimal
	} else {
		LabStatus::Abnormal
	}
}

/// One decimal place, with the unit when there is one.
pub fn format_lab_value(value: f64, unit: Option<&str>) -> String {
	match unit {
		Some(unit) => format!("{value:.1} {unit}"),
		None => format!("{value:.1}"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scenario(id: &str) -> Scenario {
		Scenario {
			id: id.to_string(),
			..Scenario::default()
		}
	}

	#[test]
	fn severity_from_id() {
		assert_eq!(scenario("optimal").severity(), Severity::Normal);
		assert_eq!(scenario("subclinical-hypo").severity(), Severity::Subclinical);
		assert_eq!(scenario("hashimotos-uncontrolled").severity(), Severity::Overt);
		assert_eq!(scenario("overt-hypo").severity(), Severity::Overt);
		assert_eq!(scenario("hashimotos-controlled").severity(), Severity::Subclinical);
	}

	#[test]
	fn explicit_severity_wins() {
		let s = Scenario {
			severity: Some(Severity::Overt),
			..scenario("optimal")
		};
		assert_eq!(s.severity(), Severity::Overt);
	}

	#[test]
	fn scenario_from_json() {
		let s: Scenario = serde_json::from_str(
			r#"{
				"id": "subclinical-hypo",
				"name": "Subclinical Hypothyroidism",
				"thyroidValues": { "tsh": 4.2, "freeT3": 2.4 },
				"reproductiveImpacts": ["Short luteal phase"],
				"clinicalNotes": "Often dismissed"
			}"#,
		)
		.unwrap();
		assert_eq!(s.thyroid_values.get("tsh"), Some(&4.2));
		assert_eq!(s.reproductive_impacts.len(), 1);
	}

	#[test]
	fn range_forms() {
		assert_eq!(RangeSpec::parse("<2.5"), Some(RangeSpec::Below(2.5)));
		assert_eq!(RangeSpec::parse(">40"), Some(RangeSpec::Above(40.0)));
		assert_eq!(RangeSpec::parse("3.0-4.0"), Some(RangeSpec::Between(3.0, 4.0)));
		assert_eq!(
			RangeSpec::parse("3.0-4.0 (upper half of range)"),
			Some(RangeSpec::Between(3.0, 4.0))
		);
		assert_eq!(RangeSpec::parse("negative"), None);
	}

	#[test]
	fn range_bounds() {
		assert!(in_range(2.4, "<2.5"));
		assert!(!in_range(2.5, "<2.5"));
		assert!(in_range(4.0, "3.0-4.0"));
		assert!(!in_range(4.1, "3.0-4.0"));
		assert!(in_range(123.0, "varies"));
	}

	#[test]
	fn lab_status() {
		assert_eq!(classify(1.5, "0.4-4.5", Some("<2.5")), LabStatus::Optimal);
		assert_eq!(classify(3.5, "0.4-4.5", Some("<2.5")), LabStatus::Suboptimal);
		assert_eq!(classify(6.0, "0.4-4.5", Some("<2.5")), LabStatus::Abnormal);
		assert_eq!(classify(6.0, "0.4-4.5", None), LabStatus::Abnormal);
	}

	#[test]
	fn lab_value_formatting() {
		assert_eq!(format_lab_value(4.24, Some("mIU/L")), "4.2 mIU/L");
		assert_eq!(format_lab_value(3.0, None), "3.0");
	}
}
