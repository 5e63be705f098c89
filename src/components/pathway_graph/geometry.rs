//! Edge curves between two laid-out points.
//!
//! [`curve_path`] turns an endpoint pair into an [`EdgePath`]: a short list of
//! path segments that can be written as an SVG `d` attribute, traced on a
//! canvas, measured for dash-offset reveals, or sampled to move a particle
//! along the edge. Paths depend on nothing but the two endpoints and the
//! style, so they are recomputed freely on every frame.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::layout::Point;

/// Below this, an arc radius is treated as a straight line (as SVG does for r = 0).
const MIN_RADIUS: f64 = 1e-6;

/// Number of chords used to approximate a quadratic segment's length.
const QUAD_SAMPLES: usize = 24;

/// Curve family for edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveStyle {
	/// S-shaped pair of quadratic curves through the midpoint. Suits columns.
	#[default]
	Curved,
	/// Semicircle-like arc with radius |dy| / 2 that always bulges right.
	/// Suits the single-axis vertical layout.
	Arc,
	/// Wide arc with radius equal to the endpoint distance, for emphasis.
	Dramatic,
}

/// One drawing command. Every segment starts where the previous one ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
	/// Straight line.
	Line {
		/// End point.
		to: Point,
	},
	/// Quadratic Bézier.
	Quad {
		/// Control point.
		control: Point,
		/// End point.
		to: Point,
	},
	/// SVG-style circular arc.
	Arc {
		/// Circle radius.
		radius: f64,
		/// SVG large-arc flag.
		large_arc: bool,
		/// `true` draws in the positive-angle direction (clockwise on screen).
		sweep: bool,
		/// End point.
		to: Point,
	},
}

/// Circle parameters of an arc segment, for drawing APIs that want a centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcCenter {
	/// Circle center.
	pub center: Point,
	/// Circle radius.
	pub radius: f64,
	/// Angle of the start point, in radians.
	pub start_angle: f64,
	/// Angle of the end point, in radians.
	pub end_angle: f64,
	/// Canvas `anticlockwise` flag.
	pub anticlockwise: bool,
}

/// A renderable edge curve.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgePath {
	/// Source end of the curve.
	pub start: Point,
	/// Drawing commands after the start point.
	pub segments: Vec<Segment>,
}

/// Build the curve for an edge from `source` to `target`.
pub fn curve_path(source: Point, target: Point, style: CurveStyle) -> EdgePath {
	let segments = match style {
		CurveStyle::Curved => {
			let mid = source.lerp(target, 0.5);
			vec![
				Segment::Quad {
					control: Point::new(mid.x, source.y),
					to: mid,
				},
				Segment::Quad {
					control: Point::new(mid.x, target.y),
					to: target,
				},
			]
		}
		CurveStyle::Arc => {
			let dy = target.y - source.y;
			vec![arc_or_line(dy.abs() / 2.0, dy > 0.0, target)]
		}
		CurveStyle::Dramatic => vec![arc_or_line(source.distance(target), true, target)],
	};
	EdgePath {
		start: source,
		segments,
	}
}

fn arc_or_line(radius: f64, sweep: bool, to: Point) -> Segment {
	if radius < MIN_RADIUS {
		Segment::Line { to }
	} else {
		Segment::Arc {
			radius,
			large_arc: false,
			sweep,
			to,
		}
	}
}

/// Endpoint-to-centre conversion for a circular SVG arc (rotation 0).
///
/// Radii too small to span the chord are scaled up to half the chord, matching
/// how browsers draw such arcs.
pub fn arc_center(from: Point, radius: f64, large_arc: bool, sweep: bool, to: Point) -> ArcCenter {
	let hx = (from.x - to.x) / 2.0;
	let hy = (from.y - to.y) / 2.0;
	let half_chord_sq = hx * hx + hy * hy;
	let radius = radius.max(half_chord_sq.sqrt());

	let factor = if half_chord_sq > 0.0 {
		((radius * radius - half_chord_sq) / half_chord_sq).max(0.0).sqrt()
	} else {
		0.0
	};
	let sign = if large_arc != sweep { 1.0 } else { -1.0 };
	let (cx, cy) = (sign * factor * hy, -sign * factor * hx);
	let center = Point::new(cx + (from.x + to.x) / 2.0, cy + (from.y + to.y) / 2.0);

	ArcCenter {
		center,
		radius,
		start_angle: (from.y - center.y).atan2(from.x - center.x),
		end_angle: (to.y - center.y).atan2(to.x - center.x),
		anticlockwise: !sweep,
	}
}

impl ArcCenter {
	/// Signed angular travel from start to end in the drawing direction.
	pub fn sweep_angle(&self) -> f64 {
		let mut delta = self.end_angle - self.start_angle;
		if self.anticlockwise {
			while delta > 0.0 {
				delta -= 2.0 * PI;
			}
		} else {
			while delta < 0.0 {
				delta += 2.0 * PI;
			}
		}
		delta
	}

	/// Point at fraction `t` of the sweep.
	pub fn point_at(&self, t: f64) -> Point {
		let angle = self.start_angle + self.sweep_angle() * t;
		Point::new(
			self.center.x + self.radius * angle.cos(),
			self.center.y + self.radius * angle.sin(),
		)
	}
}

fn quad_point(from: Point, control: Point, to: Point, t: f64) -> Point {
	let u = 1.0 - t;
	Point::new(
		u * u * from.x + 2.0 * u * t * control.x + t * t * to.x,
		u * u * from.y + 2.0 * u * t * control.y + t * t * to.y,
	)
}

impl Segment {
	/// Where the segment ends.
	pub fn end(&self) -> Point {
		match *self {
			Segment::Line { to } | Segment::Quad { to, .. } | Segment::Arc { to, .. } => to,
		}
	}

	fn point_at(&self, from: Point, t: f64) -> Point {
		match *self {
			Segment::Line { to } => from.lerp(to, t),
			Segment::Quad { control, to } => quad_point(from, control, to, t),
			Segment::Arc {
				radius,
				large_arc,
				sweep,
				to,
			} => arc_center(from, radius, large_arc, sweep, to).point_at(t),
		}
	}

	fn length(&self, from: Point) -> f64 {
		match *self {
			Segment::Line { to } => from.distance(to),
			Segment::Quad { control, to } => {
				let mut total = 0.0;
				let mut prev = from;
				for i in 1..=QUAD_SAMPLES {
					let p = quad_point(from, control, to, i as f64 / QUAD_SAMPLES as f64);
					total += prev.distance(p);
					prev = p;
				}
				total
			}
			Segment::Arc {
				radius,
				large_arc,
				sweep,
				to,
			} => {
				let arc = arc_center(from, radius, large_arc, sweep, to);
				arc.radius * arc.sweep_angle().abs()
			}
		}
	}
}

impl EdgePath {
	/// Where the curve ends.
	pub fn end(&self) -> Point {
		self.segments.last().map_or(self.start, Segment::end)
	}

	/// Segments paired with the point each one starts from.
	pub fn segments_with_start(&self) -> impl Iterator<Item = (Point, &Segment)> {
		let mut from = self.start;
		self.segments.iter().map(move |seg| {
			let start = from;
			from = seg.end();
			(start, seg)
		})
	}

	/// Approximate arc length, used to size dash patterns for reveal animations.
	pub fn length(&self) -> f64 {
		self.segments_with_start()
			.map(|(from, seg)| seg.length(from))
			.sum()
	}

	/// Point at fraction `t` (clamped to 0..=1) of the path's length.
	pub fn point_at(&self, t: f64) -> Point {
		let t = t.clamp(0.0, 1.0);
		let lengths: Vec<(Point, &Segment, f64)> = self
			.segments_with_start()
			.map(|(from, seg)| (from, seg, seg.length(from)))
			.collect();
		let total: f64 = lengths.iter().map(|(_, _, l)| l).sum();
		if total <= 0.0 {
			return self.start;
		}

		let mut remaining = t * total;
		for (from, seg, len) in &lengths {
			if remaining <= *len && *len > 0.0 {
				return seg.point_at(*from, remaining / len);
			}
			remaining -= len;
		}
		self.end()
	}

	/// SVG path data, e.g. `M 0,0 Q 50,0 50,50 Q 50,100 100,100`.
	pub fn to_svg(&self) -> String {
		let mut d = format!("M {},{}", self.start.x, self.start.y);
		for seg in &self.segments {
			match *seg {
				Segment::Line { to } => d.push_str(&format!(" L {},{}", to.x, to.y)),
				Segment::Quad { control, to } => d.push_str(&format!(
					" Q {},{} {},{}",
					control.x, control.y, to.x, to.y
				)),
				Segment::Arc {
					radius,
					large_arc,
					sweep,
					to,
				} => d.push_str(&format!(
					" A {radius},{radius} 0 {},{} {},{}",
					u8::from(large_arc),
					u8::from(sweep),
					to.x,
					to.y
				)),
			}
		}
		d
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: Point, b: Point) -> bool {
		a.distance(b) < 1e-6
	}

	#[test]
	fn curved_path_svg() {
		let path = curve_path(Point::new(0.0, 0.0), Point::new(100.0, 100.0), CurveStyle::Curved);
		insta::assert_snapshot!(path.to_svg(), @"M 0,0 Q 50,0 50,50 Q 50,100 100,100");
	}

	#[test]
	fn arc_path_svg_sweeps_by_vertical_direction() {
		let down = curve_path(Point::new(200.0, 100.0), Point::new(200.0, 300.0), CurveStyle::Arc);
		insta::assert_snapshot!(down.to_svg(), @"M 200,100 A 100,100 0 0,1 200,300");

		let up = curve_path(Point::new(200.0, 300.0), Point::new(200.0, 100.0), CurveStyle::Arc);
		insta::assert_snapshot!(up.to_svg(), @"M 200,300 A 100,100 0 0,0 200,100");
	}

	#[test]
	fn dramatic_arc_uses_full_distance() {
		let path = curve_path(Point::new(0.0, 0.0), Point::new(30.0, 40.0), CurveStyle::Dramatic);
		insta::assert_snapshot!(path.to_svg(), @"M 0,0 A 50,50 0 0,1 30,40");
	}

	#[test]
	fn vertical_arcs_bulge_right_in_both_directions() {
		for (a, b) in [(100.0, 300.0), (300.0, 100.0)] {
			let path = curve_path(Point::new(200.0, a), Point::new(200.0, b), CurveStyle::Arc);
			let mid = path.point_at(0.5);
			assert!((mid.x - 300.0).abs() < 1e-6, "mid {mid:?}");
			assert!((mid.y - 200.0).abs() < 1e-6, "mid {mid:?}");
		}
	}

	#[test]
	fn flat_arc_degrades_to_line() {
		let path = curve_path(Point::new(0.0, 50.0), Point::new(80.0, 50.0), CurveStyle::Arc);
		assert_eq!(path.segments, vec![Segment::Line { to: Point::new(80.0, 50.0) }]);
		assert!((path.length() - 80.0).abs() < 1e-9);
	}

	#[test]
	fn paths_start_and_end_at_endpoints() {
		let (s, t) = (Point::new(10.0, 20.0), Point::new(300.0, 220.0));
		for style in [CurveStyle::Curved, CurveStyle::Arc, CurveStyle::Dramatic] {
			let path = curve_path(s, t, style);
			assert!(close(path.point_at(0.0), s), "{style:?}");
			assert!(close(path.point_at(1.0), t), "{style:?}");
			assert!(close(path.end(), t), "{style:?}");
		}
	}

	#[test]
	fn semicircle_length() {
		let path = curve_path(Point::new(0.0, 0.0), Point::new(0.0, 200.0), CurveStyle::Arc);
		assert!((path.length() - PI * 100.0).abs() < 1e-6);
	}

	#[test]
	fn quadratic_length_is_at_least_the_chord() {
		let (s, t) = (Point::new(0.0, 0.0), Point::new(100.0, 100.0));
		let path = curve_path(s, t, CurveStyle::Curved);
		assert!(path.length() >= s.distance(t));
	}

	#[test]
	fn same_inputs_same_path() {
		let (s, t) = (Point::new(5.0, 7.0), Point::new(90.0, 12.0));
		assert_eq!(
			curve_path(s, t, CurveStyle::Dramatic),
			curve_path(s, t, CurveStyle::Dramatic)
		);
	}
}
