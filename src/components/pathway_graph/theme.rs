//! Colors and the fixed palettes of the visual language.
//!
//! Red/green/yellow mark inhibitory/stimulatory/regulatory edges; thyroid nodes
//! take the severity color, other categories have their own hue. Colors
//! (de)serialize as CSS hex strings so palettes can be overridden from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha (0.0 to 1.0).
	pub a: f64,
}

/// A color string that is not `#rrggbb` or `#rgb`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid color '{0}': expected #rrggbb")]
pub struct ColorParseError(pub String);

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with alpha `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		self.lerp(Color::rgba(255, 255, 255, self.a), factor)
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
		Self {
			r: mix(self.r, other.r),
			g: mix(self.g, other.g),
			b: mix(self.b, other.b),
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	/// Parse `#rrggbb` or `#rgb`.
	pub fn parse_hex(s: &str) -> Result<Self, ColorParseError> {
		let err = || ColorParseError(s.to_string());
		let hex = s.strip_prefix('#').ok_or_else(err)?;
		let channel = |i: usize, len: usize| {
			hex.get(i..i + len)
				.and_then(|c| u8::from_str_radix(c, 16).ok())
				.ok_or_else(err)
		};
		match hex.len() {
			6 => Ok(Color::rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
			3 => {
				let (r, g, b) = (channel(0, 1)?, channel(1, 1)?, channel(2, 1)?);
				Ok(Color::rgb(r * 17, g * 17, b * 17))
			}
			_ => Err(err()),
		}
	}

	/// CSS color string.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

impl TryFrom<String> for Color {
	type Error = ColorParseError;

	fn try_from(s: String) -> Result<Self, Self::Error> {
		Color::parse_hex(s.trim())
	}
}

impl From<Color> for String {
	fn from(c: Color) -> Self {
		c.to_css()
	}
}

/// Colors that carry meaning: edge types, categories, severities.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Palette {
	/// Inhibitory edges.
	pub inhibitory: Color,
	/// Stimulatory edges.
	pub stimulatory: Color,
	/// Regulatory edges.
	pub regulatory: Color,
	/// Fallback for unrecognised edge types.
	pub neutral_edge: Color,
	/// Intermediate nodes.
	pub intermediate: Color,
	/// Reproductive nodes.
	pub reproductive: Color,
	/// Fallback for unrecognised node categories.
	pub neutral_node: Color,
	/// Normal thyroid function.
	pub severity_normal: Color,
	/// Subclinical dysfunction.
	pub severity_subclinical: Color,
	/// Overt dysfunction.
	pub severity_overt: Color,
}

impl Default for Palette {
	fn default() -> Self {
		Self {
			inhibitory: Color::rgb(0xef, 0x44, 0x44),  // red-500
			stimulatory: Color::rgb(0x22, 0xc5, 0x5e), // green-500
			regulatory: Color::rgb(0xea, 0xb3, 0x08),  // yellow-500
			neutral_edge: Color::rgb(0x94, 0xa3, 0xb8), // slate-400
			intermediate: Color::rgb(0x8b, 0x5c, 0xf6), // purple-500
			reproductive: Color::rgb(0xec, 0x48, 0x99), // pink-500
			neutral_node: Color::rgb(0x64, 0x74, 0x8b), // slate-500
			severity_normal: Color::rgb(0x22, 0xc5, 0x5e),
			severity_subclinical: Color::rgb(0xea, 0xb3, 0x08),
			severity_overt: Color::rgb(0xef, 0x44, 0x44),
		}
	}
}

/// Non-semantic surface styling for the canvas renderer.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Theme {
	/// Canvas background.
	pub background: Color,
	/// Label text.
	pub label: Color,
	/// Ring around unselected nodes.
	pub node_stroke: Color,
	/// Ring around the selected node.
	pub selected_stroke: Color,
	/// Ring width of unselected nodes.
	pub node_stroke_width: f64,
	/// Ring width of the selected node.
	pub selected_stroke_width: f64,
	/// Arrowhead length in pixels.
	pub arrow_size: f64,
	/// Radius of the severity badge drawn on thyroid nodes.
	pub badge_radius: f64,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(0xfa, 0xfa, 0xfa),
			label: Color::rgb(0x1f, 0x29, 0x37),
			node_stroke: Color::rgb(255, 255, 255),
			selected_stroke: Color::rgb(0, 0, 0),
			node_stroke_width: 2.0,
			selected_stroke_width: 3.0,
			arrow_size: 8.0,
			badge_radius: 6.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_round_trip_through_css() {
		let c = Color::parse_hex("#ef4444").unwrap();
		assert_eq!(c, Color::rgb(239, 68, 68));
		assert_eq!(c.to_css(), "#ef4444");
		assert_eq!(Color::parse_hex("#fff").unwrap(), Color::rgb(255, 255, 255));
	}

	#[test]
	fn translucent_colors_render_as_rgba() {
		assert_eq!(Color::rgb(1, 2, 3).with_alpha(0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}

	#[test]
	fn bad_hex_is_rejected() {
		for s in ["ef4444", "#ef44", "#gg0000", ""] {
			assert!(Color::parse_hex(s).is_err(), "{s}");
		}
	}

	#[test]
	fn palette_overrides_from_json() {
		let palette: Palette = serde_json::from_str(r##"{ "inhibitory": "#000000" }"##).unwrap();
		assert_eq!(palette.inhibitory, Color::rgb(0, 0, 0));
		assert_eq!(palette.stimulatory, Palette::default().stimulatory);
		assert!(serde_json::from_str::<Palette>(r#"{ "inhibitory": "red" }"#).is_err());
	}

	#[test]
	fn lighten_moves_towards_white() {
		let c = Color::rgb(100, 100, 100).lighten(0.5);
		assert_eq!((c.r, c.g, c.b), (178, 178, 178));
	}
}
