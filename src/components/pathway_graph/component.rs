//! Leptos component wrapping the pathway graph canvas.
//!
//! The component owns a [`GraphContext`] behind `Rc<RefCell<..>>`: the
//! validated graph, its layout and the highlight state. Mouse and keyboard
//! handlers are the only writers. A `requestAnimationFrame` loop rebuilds the
//! frame from the current state and draws it, so every render reflects state
//! exactly and nothing accumulates between frames.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use super::animation::FlowParticles;
use super::config::VisualConfig;
use super::describe::{PathSummary, edge_aria_label, export_node_markdown, format_citation};
use super::frame::{Frame, Scene, build_frame};
use super::geometry::CurveStyle;
use super::layout::{Layout, Point, Viewport, compute_layout, vertical_height};
use super::render::{self, Clock};
use super::state::{HighlightState, PathMode};
use super::tour::{Tour, TourStep};
use super::types::Severity;
use super::validate::Graph;

/// Graph, derived layout and interaction state for one mounted canvas.
struct GraphContext {
	graph: Graph,
	config: VisualConfig,
	viewport: Viewport,
	layout: Layout,
	curve: CurveStyle,
	state: HighlightState,
	tour: Tour,
	particles: FlowParticles,
	/// `Date.now()` when the current scene was built; animations count from here.
	started_at: f64,
	frame: Frame,
}

impl GraphContext {
	fn new(
		graph: Graph,
		tour: Vec<TourStep>,
		config: VisualConfig,
		viewport: Viewport,
		path_mode: PathMode,
	) -> Self {
		let particles = FlowParticles::new(graph.edges().len(), &config.flow);
		let mut context = Self {
			graph,
			config,
			viewport,
			layout: Layout::new(),
			curve: CurveStyle::default(),
			state: HighlightState::new(path_mode),
			tour: Tour::new(tour),
			particles,
			started_at: js_sys::Date::now(),
			frame: Frame::default(),
		};
		context.relayout(viewport);
		context
	}

	/// Recompute positions for `viewport` and restart entrance animations.
	fn relayout(&mut self, viewport: Viewport) {
		let policy = self.config.layout.policy_for(viewport);
		let height = vertical_height(self.graph.nodes(), policy)
			.map_or(viewport.height, |needed| needed.max(viewport.height));
		self.viewport = Viewport { height, ..viewport };
		self.layout = compute_layout(self.graph.nodes(), self.viewport, policy);
		self.curve = self.config.layout.curve_for(viewport);
		self.particles = FlowParticles::new(self.graph.edges().len(), &self.config.flow);
		self.started_at = js_sys::Date::now();
		debug!(
			"thyroid-pathways: layout {}x{} (compact: {})",
			self.viewport.width, self.viewport.height, self.viewport.compact
		);
	}

	/// Swap in new graph data. Highlights never survive a reload.
	fn load(&mut self, graph: Graph, viewport: Viewport) {
		self.tour.end(&mut self.state);
		self.state.reset();
		self.graph = graph;
		self.relayout(viewport);
	}

	fn rebuild_frame(&mut self, severity: Severity) {
		self.frame = build_frame(&Scene {
			graph: &self.graph,
			layout: &self.layout,
			viewport: self.viewport,
			curve: self.curve,
			severity,
			state: &self.state,
			encoding: &self.config.encoding,
		});
	}
}

/// Detail panel for the selected node.
#[derive(Clone, Debug, PartialEq)]
struct NodeCard {
	title: String,
	description: String,
	summary: String,
	links: Vec<String>,
	citations: Vec<String>,
	markdown: String,
}

impl NodeCard {
	fn new(graph: &Graph, id: &str) -> Option<Self> {
		let node = graph.node(id)?;
		let touching: Vec<_> = graph.edges().iter().filter(|edge| edge.touches(id)).collect();
		Some(Self {
			title: node.display_label().to_string(),
			description: node.description.clone(),
			summary: PathSummary::for_node(id, graph.edges()).headline(),
			links: touching.iter().map(|edge| edge_aria_label(edge, graph)).collect(),
			citations: touching
				.iter()
				.flat_map(|edge| edge.research_citations.iter())
				.enumerate()
				.map(|(i, citation)| format_citation(citation, i))
				.collect(),
			markdown: export_node_markdown(node, graph.edges()),
		})
	}
}

/// Text of the active tour step.
#[derive(Clone, Debug, PartialEq)]
struct TourCard {
	progress: String,
	title: String,
	description: String,
}

fn cards(c: &GraphContext) -> (Option<NodeCard>, Option<TourCard>) {
	let node = c
		.state
		.selected_node
		.as_deref()
		.and_then(|id| NodeCard::new(&c.graph, id));
	let tour = c
		.tour
		.current_index()
		.zip(c.tour.current_step())
		.map(|(i, step)| TourCard {
			progress: format!("{} / {}", i + 1, c.tour.len()),
			title: step.title.clone(),
			description: step.description.clone(),
		});
	(node, tour)
}

fn window_viewport(window: &Window) -> Viewport {
	let width = window
		.inner_width()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(Viewport::TABLET_BELOW);
	let height = window
		.inner_height()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(800.0);
	Viewport::from_window(width, height)
}

fn size_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) {
	canvas.set_width(viewport.width as u32);
	canvas.set_height(viewport.height as u32);
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders the thyroid/reproductive pathway graph on a canvas.
///
/// `severity` resizes and recolors thyroid markers and edge widths;
/// `path_mode` chooses whether a clicked node lights up its causes, its
/// effects or both. Clicking the background or pressing Escape clears the
/// highlight. When `tour` has steps, a tour button steps through scripted
/// highlights (arrow keys also navigate). Outside a tour the arrow keys move a
/// keyboard cursor through the nodes, and Enter or Space selects it.
#[component]
pub fn PathwayGraphCanvas(
	#[prop(into)] graph: Signal<Graph>,
	#[prop(into)] severity: Signal<Severity>,
	#[prop(into)] path_mode: Signal<PathMode>,
	#[prop(optional)] tour: Vec<TourStep>,
	#[prop(optional)] config: VisualConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	let selected_card = RwSignal::new(None::<NodeCard>);
	let tour_card = RwSignal::new(None::<TourCard>);
	let announcement = RwSignal::new(String::new());
	let has_tour = !tour.is_empty();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let graph = graph.get();
		let Some(window) = web_sys::window() else {
			return;
		};
		let viewport = window_viewport(&window);

		// Data changed after mount: reuse the running loop.
		if let Some(c) = context_init.borrow_mut().as_mut() {
			c.load(graph, viewport);
			size_canvas(&canvas, c.viewport);
			selected_card.set(None);
			tour_card.set(None);
			return;
		}

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("thyroid-pathways: canvas 2d context unavailable");
			return;
		};

		let graph_context = GraphContext::new(
			graph,
			tour.clone(),
			config.clone(),
			viewport,
			path_mode.get_untracked(),
		);
		size_canvas(&canvas, graph_context.viewport);
		*context_init.borrow_mut() = Some(graph_context);

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			if let Some(c) = context_resize.borrow_mut().as_mut() {
				c.relayout(window_viewport(&win));
				size_canvas(&canvas_resize, c.viewport);
			}
		}));
		if let Some(cb) = resize_cb_init.borrow().as_ref() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(c) = context_anim.borrow_mut().as_mut() {
				c.rebuild_frame(severity.get_untracked());
				let clock = Clock {
					elapsed_ms: js_sys::Date::now() - c.started_at,
					flow: &c.config.flow,
					particles: Some(&c.particles),
				};
				render::render(&ctx, &c.frame, &c.config.theme, &clock);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(cb) = animate_init.borrow().as_ref() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Mode changes re-derive the highlight for whatever is focused.
	let context_mode = context.clone();
	Effect::new(move |_| {
		let mode = path_mode.get();
		if let Some(c) = context_mode.borrow_mut().as_mut() {
			c.state.set_path_mode(mode, c.graph.edges());
		}
	});

	let publish = move |(node, tour): (Option<NodeCard>, Option<TourCard>)| {
		selected_card.set(node);
		tour_card.set(tour);
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(p) = pointer(canvas_ref, &ev) else {
			return;
		};
		let mut guard = context_mm.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return;
		};
		let hovered = c.frame.node_at(p).map(|n| (n.id.clone(), n.aria_label.clone()));
		let hovered_id = hovered.as_ref().map(|(id, _)| id.as_str());
		if c.state.hovered_node.as_deref() == hovered_id {
			return;
		}
		c.state.set_hover(hovered_id);
		if let Some(canvas) = canvas_ref.get() {
			canvas.set_title(hovered.as_ref().map_or("", |(_, label)| label.as_str()));
			let cursor = if hovered.is_some() { "pointer" } else { "default" };
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(c) = context_ml.borrow_mut().as_mut() {
			c.state.set_hover(None);
		}
	};

	let context_click = context.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(p) = pointer(canvas_ref, &ev) else {
			return;
		};
		let updated = context_click.borrow_mut().as_mut().map(|c| {
			c.tour.end(&mut c.state);
			match c.frame.node_at(p).map(|n| n.id.clone()) {
				Some(id) => c.state.toggle_select(&id, c.graph.edges()),
				None => c.state.clear(),
			}
			cards(c)
		});
		if let Some(updated) = updated {
			publish(updated);
		}
	};

	let context_key = context.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		let updated = context_key.borrow_mut().as_mut().and_then(|c| {
			let mut spoken = None;
			match ev.key().as_str() {
				"Escape" => {
					c.tour.end(&mut c.state);
					c.state.clear();
				}
				"Enter" | " " => {
					let id = c.state.hovered_node.clone()?;
					c.tour.end(&mut c.state);
					c.state.toggle_select(&id, c.graph.edges());
				}
				"ArrowRight" if c.tour.is_active() => c.tour.next(&mut c.state),
				"ArrowLeft" if c.tour.is_active() => c.tour.prev(&mut c.state),
				key @ ("ArrowDown" | "ArrowRight" | "ArrowUp" | "ArrowLeft") => {
					// Keyboard cursor: moves the hover through nodes in draw order.
					let step = if matches!(key, "ArrowDown" | "ArrowRight") { 1 } else { -1 };
					let node = c.frame.next_node(c.state.hovered_node.as_deref(), step)?;
					let id = node.id.clone();
					spoken = Some(node.aria_label.clone());
					c.state.set_hover(Some(&id));
				}
				_ => return None,
			}
			Some((cards(c), spoken))
		});
		if let Some((updated, spoken)) = updated {
			ev.prevent_default();
			publish(updated);
			if let Some(label) = spoken {
				if let Some(canvas) = canvas_ref.get() {
					canvas.set_title(&label);
				}
				announcement.set(label);
			}
		}
	};

	let tour_action = {
		let context = context.clone();
		move |action: fn(&mut Tour, &mut HighlightState)| {
			let context = context.clone();
			move |_: MouseEvent| {
				let updated = context.borrow_mut().as_mut().map(|c| {
					action(&mut c.tour, &mut c.state);
					cards(c)
				});
				if let Some(updated) = updated {
					publish(updated);
				}
			}
		}
	};
	let on_tour_start = tour_action(Tour::start);

	let tour_text = move |field: fn(&TourCard) -> &String| {
		move || {
			tour_card.with(|card| card.as_ref().map(|c| field(c).clone()).unwrap_or_default())
		}
	};

	view! {
		<div class="pathway-graph">
			<canvas
				node_ref=canvas_ref
				class="pathway-graph-canvas"
				tabindex="0"
				role="img"
				aria-label="Cause-effect graph linking thyroid markers to reproductive outcomes"
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				on:click=on_click
				on:keydown=on_keydown
				style="display: block; outline: none;"
			/>
			<p class="visually-hidden" aria-live="polite">
				{move || announcement.get()}
			</p>
			{has_tour
				.then(move || {
					view! {
						<button class="tour-start" on:click=on_tour_start>
							"Take the tour"
						</button>
					}
				})}
			<div
				class="tour-card"
				role="dialog"
				style:display=move || if tour_card.with(Option::is_some) { "block" } else { "none" }
			>
				<p class="tour-progress">{tour_text(|c| &c.progress)}</p>
				<h3>{tour_text(|c| &c.title)}</h3>
				<p>{tour_text(|c| &c.description)}</p>
				<button on:click=tour_action(Tour::prev)>"Back"</button>
				<button on:click=tour_action(Tour::next)>"Next"</button>
				<button on:click=tour_action(Tour::end) aria-label="End tour">
					"×"
				</button>
			</div>
			{move || {
				selected_card
					.get()
					.map(|card| {
						view! {
							<aside class="node-card">
								<h2>{card.title}</h2>
								<p>{card.description}</p>
								<p class="node-summary">{card.summary}</p>
								<ul class="node-links">
									{card
										.links
										.into_iter()
										.map(|link| view! { <li>{link}</li> })
										.collect_view()}
								</ul>
								<ul class="node-citations">
									{card
										.citations
										.into_iter()
										.map(|citation| view! { <li>{citation}</li> })
										.collect_view()}
								</ul>
								<details>
									<summary>"Markdown"</summary>
									<pre>{card.markdown}</pre>
								</details>
							</aside>
						}
					})
			}}
		</div>
	}
}
