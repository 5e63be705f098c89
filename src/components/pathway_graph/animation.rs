//! Entrance reveals and particle flow along edges.
//!
//! Everything is a pure function of elapsed milliseconds since the current
//! scene was built. No timers are kept: a rebuilt scene restarts its clock,
//! which visually supersedes whatever was animating before.

use serde::{Deserialize, Serialize};

use super::geometry::EdgePath;
use super::layout::Point;

/// Animation timing.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FlowConfig {
	/// Draw particles travelling along edges.
	pub particles: bool,
	/// Particle dot radius in pixels.
	pub particle_radius: f64,
	/// Time for a particle to cross its edge.
	pub travel_ms: f64,
	/// Fade-out at the target before the particle rests.
	pub fade_ms: f64,
	/// Upper bound of the per-edge pause between trips.
	pub max_rest_ms: f64,
	/// Fade-in duration of each node.
	pub node_fade_ms: f64,
	/// Delay between successive node fade-ins.
	pub node_stagger_ms: f64,
	/// Delay between successive edge reveals.
	pub edge_stagger_ms: f64,
	/// Period of the pulsing badge on thyroid nodes at elevated severity.
	pub pulse_period_ms: f64,
}

impl Default for FlowConfig {
	fn default() -> Self {
		Self {
			particles: true,
			particle_radius: 3.0,
			travel_ms: 2000.0,
			fade_ms: 200.0,
			max_rest_ms: 2000.0,
			node_fade_ms: 600.0,
			node_stagger_ms: 50.0,
			edge_stagger_ms: 30.0,
			pulse_period_ms: 1500.0,
		}
	}
}

/// Staggered start time for the `index`-th element.
pub fn entrance_delay(index: usize, base_ms: f64) -> f64 {
	index as f64 * base_ms
}

/// Duration for revealing an edge, longer for longer edges.
pub fn reveal_duration(source: Point, target: Point) -> f64 {
	const BASE_MS: f64 = 1500.0;
	const MS_PER_PX: f64 = 2.0;
	BASE_MS + source.distance(target) * MS_PER_PX
}

/// Linear progress (0..=1) of a staggered entrance.
pub fn entrance_progress(elapsed_ms: f64, index: usize, stagger_ms: f64, duration_ms: f64) -> f64 {
	let local = elapsed_ms - entrance_delay(index, stagger_ms);
	if duration_ms <= 0.0 {
		return if local >= 0.0 { 1.0 } else { 0.0 };
	}
	(local / duration_ms).clamp(0.0, 1.0)
}

/// Dash offset that hides the unrevealed part of a path of `length`.
pub fn dash_offset(length: f64, progress: f64) -> f64 {
	length * (1.0 - progress.clamp(0.0, 1.0))
}

/// Breathing alpha multiplier in 0.6..=1.0.
pub fn pulse(elapsed_ms: f64, period_ms: f64) -> f64 {
	if period_ms <= 0.0 {
		return 1.0;
	}
	let phase = elapsed_ms / period_ms * std::f64::consts::TAU;
	0.8 + 0.2 * phase.sin()
}

/// Deterministic hash of a seed into 0..1.
fn pseudo_random(seed: f64) -> f64 {
	let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
	x - x.floor()
}

/// Schedule of a single edge's particle.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Trip {
	offset_ms: f64,
	rest_ms: f64,
}

/// One particle per edge, each on its own fixed schedule.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowParticles {
	trips: Vec<Trip>,
	travel_ms: f64,
	fade_ms: f64,
}

/// Where to draw a particle this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSample {
	/// Canvas position.
	pub position: Point,
	/// Alpha multiplier (0.0 to 1.0).
	pub alpha: f64,
}

impl FlowParticles {
	/// Schedule one particle for each of `edge_count` edges.
	pub fn new(edge_count: usize, config: &FlowConfig) -> Self {
		let trips = (0..edge_count)
			.map(|i| {
				let seed = i as f64 + 1.0;
				let rest_ms = pseudo_random(seed * 1.1) * config.max_rest_ms;
				let cycle = config.travel_ms + config.fade_ms + rest_ms;
				Trip {
					offset_ms: pseudo_random(seed * 2.3) * cycle,
					rest_ms,
				}
			})
			.collect();
		Self {
			trips,
			travel_ms: config.travel_ms.max(1.0),
			fade_ms: config.fade_ms.max(0.0),
		}
	}

	/// Number of scheduled particles.
	pub fn len(&self) -> usize {
		self.trips.len()
	}

	/// True when there are no edges to animate.
	pub fn is_empty(&self) -> bool {
		self.trips.is_empty()
	}

	/// Particle for edge `index` along `path`, or `None` while it rests.
	pub fn sample(&self, index: usize, path: &EdgePath, elapsed_ms: f64) -> Option<ParticleSample> {
		let trip = self.trips.get(index)?;
		let cycle = self.travel_ms + self.fade_ms + trip.rest_ms;
		let t = (elapsed_ms + trip.offset_ms).rem_euclid(cycle);

		if t < self.travel_ms {
			Some(ParticleSample {
				position: path.point_at(t / self.travel_ms),
				alpha: 1.0,
			})
		} else if t < self.travel_ms + self.fade_ms {
			Some(ParticleSample {
				position: path.end(),
				alpha: 1.0 - (t - self.travel_ms) / self.fade_ms,
			})
		} else {
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::pathway_graph::geometry::{CurveStyle, curve_path};

	#[test]
	fn delays_stagger_linearly() {
		assert_eq!(entrance_delay(0, 50.0), 0.0);
		assert_eq!(entrance_delay(4, 50.0), 200.0);
	}

	#[test]
	fn reveal_duration_grows_with_distance() {
		let d = reveal_duration(Point::new(0.0, 0.0), Point::new(30.0, 40.0));
		assert_eq!(d, 1600.0);
	}

	#[test]
	fn entrance_progress_clamps() {
		assert_eq!(entrance_progress(0.0, 2, 50.0, 600.0), 0.0);
		assert_eq!(entrance_progress(400.0, 2, 50.0, 600.0), 0.5);
		assert_eq!(entrance_progress(10_000.0, 2, 50.0, 600.0), 1.0);
		assert_eq!(dash_offset(100.0, 0.25), 75.0);
	}

	#[test]
	fn particles_are_deterministic_and_on_path() {
		let config = FlowConfig::default();
		let path = curve_path(Point::new(0.0, 0.0), Point::new(100.0, 100.0), CurveStyle::Curved);
		let a = FlowParticles::new(5, &config);
		let b = FlowParticles::new(5, &config);
		assert_eq!(a, b);

		for i in 0..5 {
			for step in 0..50 {
				let elapsed = step as f64 * 97.0;
				let sample = a.sample(i, &path, elapsed);
				assert_eq!(sample, b.sample(i, &path, elapsed));
				if let Some(s) = sample {
					assert!((0.0..=1.0).contains(&s.alpha));
					assert!(s.position.x >= -1e-9 && s.position.x <= 100.0 + 1e-9);
				}
			}
		}
	}

	#[test]
	fn unknown_edge_has_no_particle() {
		let particles = FlowParticles::new(1, &FlowConfig::default());
		let path = curve_path(Point::new(0.0, 0.0), Point::new(1.0, 1.0), CurveStyle::Curved);
		assert_eq!(particles.sample(3, &path, 0.0), None);
	}

	#[test]
	fn pulse_stays_in_band() {
		for step in 0..20 {
			let p = pulse(step as f64 * 123.0, 1500.0);
			assert!((0.6..=1.0).contains(&p));
		}
	}
}
