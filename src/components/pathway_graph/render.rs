//! Canvas rendering of a [`Frame`].
//!
//! Draw order:
//! 1. Background
//! 2. Edges (dash-offset reveal) and their arrowheads
//! 3. Flow particles
//! 4. Nodes, severity badges, then labels on top
//!
//! Nothing here decides *what* to show; every color, width and opacity comes
//! precomputed in the frame.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::animation::{FlowConfig, FlowParticles, dash_offset, entrance_progress, pulse};
use super::frame::{EdgeVisual, Frame, NodeVisual};
use super::geometry::{EdgePath, Segment, arc_center};
use super::layout::Point;
use super::theme::Theme;

/// Per-frame animation inputs.
pub struct Clock<'a> {
	/// Milliseconds since the scene was (re)built.
	pub elapsed_ms: f64,
	/// Animation timing.
	pub flow: &'a FlowConfig,
	/// Particle schedule, if particles are drawn.
	pub particles: Option<&'a FlowParticles>,
}

/// Draw `frame` onto `ctx`.
pub fn render(ctx: &CanvasRenderingContext2d, frame: &Frame, theme: &Theme, clock: &Clock<'_>) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);

	for (i, edge) in frame.edges.iter().enumerate() {
		let progress = entrance_progress(
			clock.elapsed_ms,
			i,
			clock.flow.edge_stagger_ms,
			edge.reveal_ms,
		);
		draw_edge(ctx, edge, theme, progress);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	if let Some(particles) = clock.particles.filter(|_| clock.flow.particles) {
		draw_particles(ctx, frame, clock, particles);
	}

	let badge_pulse = pulse(clock.elapsed_ms, clock.flow.pulse_period_ms);
	for (i, node) in frame.nodes.iter().enumerate() {
		let progress = entrance_progress(
			clock.elapsed_ms,
			i,
			clock.flow.node_stagger_ms,
			clock.flow.node_fade_ms,
		);
		draw_node(ctx, node, theme, progress, badge_pulse);
	}
	for (i, node) in frame.nodes.iter().enumerate() {
		let progress = entrance_progress(
			clock.elapsed_ms,
			i,
			clock.flow.node_stagger_ms,
			clock.flow.node_fade_ms,
		);
		draw_label(ctx, node, theme, progress);
	}
	ctx.set_global_alpha(1.0);
}

/// Replay an [`EdgePath`] as canvas path commands.
fn trace(ctx: &CanvasRenderingContext2d, path: &EdgePath) {
	ctx.begin_path();
	ctx.move_to(path.start.x, path.start.y);
	for (from, segment) in path.segments_with_start() {
		match *segment {
			Segment::Line { to } => ctx.line_to(to.x, to.y),
			Segment::Quad { control, to } => {
				ctx.quadratic_curve_to(control.x, control.y, to.x, to.y);
			}
			Segment::Arc {
				radius,
				large_arc,
				sweep,
				to,
			} => {
				let arc = arc_center(from, radius, large_arc, sweep, to);
				let _ = ctx.arc_with_anticlockwise(
					arc.center.x,
					arc.center.y,
					arc.radius,
					arc.start_angle,
					arc.end_angle,
					arc.anticlockwise,
				);
			}
		}
	}
}

fn draw_edge(ctx: &CanvasRenderingContext2d, edge: &EdgeVisual, theme: &Theme, progress: f64) {
	if progress <= 0.0 || edge.length <= 0.0 {
		return;
	}
	let color = edge.color.with_alpha(edge.opacity);
	ctx.set_stroke_style_str(&color.to_css());
	ctx.set_line_width(edge.width);

	if progress < 1.0 {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(edge.length),
			&JsValue::from_f64(edge.length),
		));
		ctx.set_line_dash_offset(dash_offset(edge.length, progress));
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
	trace(ctx, &edge.path);
	ctx.stroke();

	if progress >= 1.0 {
		draw_arrow(ctx, edge, theme);
	}
}

fn draw_arrow(ctx: &CanvasRenderingContext2d, edge: &EdgeVisual, theme: &Theme) {
	let size = theme.arrow_size + edge.width;
	let tip_t = 1.0 - edge.arrow_inset / edge.length;
	let back_t = 1.0 - (edge.arrow_inset + size) / edge.length;
	if back_t <= 0.0 {
		return;
	}
	let tip = edge.path.point_at(tip_t);
	let back = edge.path.point_at(back_t);
	let (dx, dy) = (tip.x - back.x, tip.y - back.y);
	let len = (dx * dx + dy * dy).sqrt();
	if len < 0.001 {
		return;
	}
	let (px, py) = (-dy / len * size * 0.5, dx / len * size * 0.5);

	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.set_fill_style_str(&edge.color.with_alpha(edge.opacity).to_css());
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(back.x + px, back.y + py);
	ctx.line_to(back.x - px, back.y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_particles(
	ctx: &CanvasRenderingContext2d,
	frame: &Frame,
	clock: &Clock<'_>,
	particles: &FlowParticles,
) {
	for (i, edge) in frame.edges.iter().enumerate() {
		let Some(sample) = particles.sample(i, &edge.path, clock.elapsed_ms) else {
			continue;
		};
		let alpha = sample.alpha * edge.opacity;
		if alpha < 0.01 {
			continue;
		}
		ctx.set_fill_style_str(&edge.color.with_alpha(alpha).to_css());
		fill_circle(ctx, sample.position, clock.flow.particle_radius);
	}
}

fn fill_circle(ctx: &CanvasRenderingContext2d, at: Point, radius: f64) {
	ctx.begin_path();
	let _ = ctx.arc(at.x, at.y, radius, 0.0, 2.0 * PI);
	ctx.fill();
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &NodeVisual,
	theme: &Theme,
	progress: f64,
	badge_pulse: f64,
) {
	let alpha = node.opacity * progress;
	if alpha <= 0.0 {
		return;
	}
	let Point { x, y } = node.position;
	ctx.set_global_alpha(alpha);

	let gradient = ctx.create_radial_gradient(
		x - node.radius * 0.3,
		y - node.radius * 0.3,
		0.0,
		x,
		y,
		node.radius,
	);
	match gradient {
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, &node.fill.lighten(0.35).to_css());
			let _ = gradient.add_color_stop(1.0, &node.fill.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(&node.fill.to_css()),
	}
	fill_circle(ctx, node.position, node.radius);

	let (stroke, width) = if node.selected {
		(theme.selected_stroke, theme.selected_stroke_width)
	} else {
		(theme.node_stroke, theme.node_stroke_width)
	};
	ctx.begin_path();
	let _ = ctx.arc(x, y, node.radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&stroke.to_css());
	ctx.set_line_width(width);
	ctx.stroke();

	if let Some(badge) = node.badge {
		let offset = node.radius * std::f64::consts::FRAC_1_SQRT_2;
		ctx.set_global_alpha(alpha * badge_pulse);
		ctx.set_fill_style_str(&badge.to_css());
		fill_circle(ctx, Point::new(x + offset, y - offset), theme.badge_radius);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_label(ctx: &CanvasRenderingContext2d, node: &NodeVisual, theme: &Theme, progress: f64) {
	let alpha = node.opacity * progress;
	if alpha <= 0.0 {
		return;
	}
	let weight = if node.selected { "600" } else { "400" };
	ctx.set_global_alpha(alpha);
	ctx.set_fill_style_str(&theme.label.to_css());
	ctx.set_font(&format!("{weight} {}px system-ui, sans-serif", node.font_size));
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(
		&node.label,
		node.position.x + node.radius + 6.0,
		node.position.y,
	);
	ctx.set_global_alpha(1.0);
}
