//! thyroid-pathways: Interactive cause-effect graph linking thyroid markers to
//! reproductive outcomes.
//!
//! The crate renders a layered pathway graph on a canvas, highlights causes
//! and effects of a clicked marker, and scales the picture with thyroid
//! dysfunction severity. Graph content and optional visual overrides are read
//! from JSON script elements in the host page.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

use components::pathway_graph::layout::category_counts;

pub use components::pathway_graph::scenario::{Scenario, classify, format_lab_value};
pub use components::pathway_graph::tour::TourStep;
pub use components::pathway_graph::traversal::detect_cycles;
pub use components::pathway_graph::{
	Category, Edge, EdgeType, Graph, GraphData, HighlightState, Node, NodeRef, PathMode,
	PathwayGraphCanvas, Severity, Strength, ValidationError, VisualConfig,
};

/// Script element holding the graph document.
pub const GRAPH_DATA_ID: &str = "graph-data";
/// Script element holding optional [`VisualConfig`] overrides.
pub const GRAPH_CONFIG_ID: &str = "graph-config";

/// Why page data could not be read.
#[derive(Debug, Error)]
pub enum LoadError {
	/// Not running in a browser window.
	#[error("no browser document available")]
	NoDocument,
	/// The script element is absent.
	#[error("element #{0} not found")]
	MissingElement(&'static str),
	/// The element exists but is not a script.
	#[error("element #{0} is not a <script>")]
	NotAScript(&'static str),
	/// The script content is not valid JSON for its type.
	#[error("invalid JSON in #{id}: {source}")]
	Json {
		/// Element id.
		id: &'static str,
		/// Parse error.
		#[source]
		source: serde_json::Error,
	},
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("thyroid-pathways: logging initialized");
}

fn script_text(id: &'static str) -> Result<String, LoadError> {
	let window: Window = web_sys::window().ok_or(LoadError::NoDocument)?;
	let document = window.document().ok_or(LoadError::NoDocument)?;
	let element = document
		.get_element_by_id(id)
		.ok_or(LoadError::MissingElement(id))?;
	let script: HtmlScriptElement = element.dyn_into().map_err(|_| LoadError::NotAScript(id))?;
	script.text().map_err(|_| LoadError::NotAScript(id))
}

/// Load the graph document from `<script id="graph-data">`.
///
/// Expected format: JSON with `{ nodes: [...], links: [...] }` and optional
/// `tour` and `scenarios` arrays.
pub fn load_graph_data() -> Result<GraphData, LoadError> {
	let text = script_text(GRAPH_DATA_ID)?;
	serde_json::from_str(&text).map_err(|source| LoadError::Json {
		id: GRAPH_DATA_ID,
		source,
	})
}

/// Load visual overrides from `<script id="graph-config">`.
pub fn load_config() -> Result<VisualConfig, LoadError> {
	let text = script_text(GRAPH_CONFIG_ID)?;
	VisualConfig::from_json(&text).map_err(|source| LoadError::Json {
		id: GRAPH_CONFIG_ID,
		source,
	})
}

/// A validated graph with the content that travels alongside it.
#[derive(Clone, Debug, Default)]
pub struct LoadedGraph {
	/// Consistent part of the document.
	pub graph: Graph,
	/// Guided tour steps.
	pub tour: Vec<TourStep>,
	/// Clinical scenarios.
	pub scenarios: Vec<Scenario>,
	/// Problems found while validating.
	pub problems: Vec<ValidationError>,
}

/// Validate a graph document, logging every problem found.
///
/// Dangling links and duplicate nodes are warned about and dropped. Cycles
/// are legal but unusual in a cause-effect graph, so they are warned about
/// and kept.
pub fn prepare(mut data: GraphData) -> LoadedGraph {
	let tour = std::mem::take(&mut data.tour);
	let scenarios = std::mem::take(&mut data.scenarios);
	let (graph, problems) = Graph::from_data(data);

	for problem in &problems {
		warn!("thyroid-pathways: {problem}");
	}
	for cycle in detect_cycles(graph.nodes(), graph.edges()) {
		warn!("thyroid-pathways: cycle {}", cycle.join(" -> "));
	}
	info!(
		"thyroid-pathways: loaded {} nodes, {} links, {} tour steps, {} scenarios",
		graph.nodes().len(),
		graph.edges().len(),
		tour.len(),
		scenarios.len()
	);

	LoadedGraph {
		graph,
		tour,
		scenarios,
		problems,
	}
}

fn page_config() -> VisualConfig {
	match load_config() {
		Ok(config) => config,
		Err(LoadError::MissingElement(_)) => VisualConfig::default(),
		Err(e) => {
			warn!("thyroid-pathways: {e}; using default visuals");
			VisualConfig::default()
		}
	}
}

/// Main application component.
/// Loads graph data from the DOM and renders the pathway graph with its
/// severity, path-mode and scenario controls.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let data = load_graph_data().unwrap_or_else(|e| {
		warn!("thyroid-pathways: {e}");
		GraphData::default()
	});
	let LoadedGraph {
		graph,
		tour,
		scenarios,
		problems,
	} = prepare(data);
	let config = page_config();

	let legend = category_counts(graph.nodes())
		.into_iter()
		.filter(|&(_, count)| count > 0)
		.map(|(category, count)| {
			view! { <li class=category.as_str()>{format!("{count} {}", category.as_str())}</li> }
		})
		.collect_view();

	let graph = Signal::stored(graph);
	let severity = RwSignal::new(Severity::Normal);
	let path_mode = RwSignal::new(PathMode::default());
	let scenario_id = RwSignal::new(None::<String>);
	let has_scenarios = !scenarios.is_empty();
	let scenarios = StoredValue::new(scenarios);

	let severity_buttons = Severity::ALL
		.into_iter()
		.map(|level| {
			view! {
				<button
					class:active=move || severity.get() == level
					on:click=move |_| {
						severity.set(level);
						scenario_id.set(None);
					}
				>
					{level.label()}
				</button>
			}
		})
		.collect_view();

	let mode_buttons = PathMode::ALL
		.into_iter()
		.map(|mode| {
			view! {
				<button
					class:active=move || path_mode.get() == mode
					on:click=move |_| path_mode.set(mode)
				>
					{mode.label()}
				</button>
			}
		})
		.collect_view();

	let scenario_picker = has_scenarios.then(|| {
		let options = scenarios.with_value(|all| {
			all.iter()
				.map(|s| view! { <option value=s.id.clone()>{s.name.clone()}</option> })
				.collect_view()
		});
		view! {
			<label class="scenario-picker">
				"Scenario "
				<select on:change=move |ev| {
					let id = event_target_value(&ev);
					let picked = scenarios.with_value(|all| all.iter().find(|s| s.id == id).cloned());
					match picked {
						Some(scenario) => {
							info!("thyroid-pathways: scenario {}", scenario.id);
							severity.set(scenario.severity());
							scenario_id.set(Some(scenario.id));
						}
						None => scenario_id.set(None),
					}
				}>
					<option value="">"Custom"</option>
					{options}
				</select>
			</label>
		}
	});

	let scenario_panel = move || {
		let scenario = scenario_id
			.get()
			.and_then(|id| scenarios.with_value(|all| all.iter().find(|s| s.id == id).cloned()))?;
		let values = scenario
			.thyroid_values
			.iter()
			.map(|(marker, &value)| {
				let status = graph.with(|g| {
					g.node(marker).and_then(|node| {
						let normal = node.normal_range.as_deref()?;
						Some(classify(value, normal, node.optimal_range.as_deref()).as_str())
					})
				});
				let label = graph.with(|g| {
					g.node(marker)
						.map(|n| n.display_label().to_string())
						.unwrap_or_else(|| marker.clone())
				});
				view! {
					<li class=status.unwrap_or("unknown")>
						{format!("{label}: {}", format_lab_value(value, None))}
					</li>
				}
			})
			.collect_view();
		let impacts = scenario
			.reproductive_impacts
			.into_iter()
			.map(|impact| view! { <li>{impact}</li> })
			.collect_view();
		Some(view! {
			<section class="scenario-panel">
				<h2>{scenario.name}</h2>
				<p>{scenario.description}</p>
				<ul class="lab-values">{values}</ul>
				<ul class="impacts">{impacts}</ul>
				<p class="clinical-notes">{scenario.clinical_notes}</p>
			</section>
		})
	};

	let problem_note = (!problems.is_empty()).then(|| {
		view! {
			<p class="data-warning">
				{format!("{} data problem(s) found; see the console.", problems.len())}
			</p>
		}
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Thyroid and Fertility Pathways" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="pathway-app">
			<header class="controls">
				<h1>"Thyroid to Fertility Pathways"</h1>
				<ul class="legend">{legend}</ul>
				<fieldset class="severity">
					<legend>"Thyroid function"</legend>
					{severity_buttons}
				</fieldset>
				<fieldset class="path-mode">
					<legend>"Show"</legend>
					{mode_buttons}
				</fieldset>
				{scenario_picker}
			</header>
			{problem_note}
			<PathwayGraphCanvas
				graph=graph
				severity=severity
				path_mode=path_mode
				tour=tour
				config=config
			/>
			{scenario_panel}
		</main>
	}
}
