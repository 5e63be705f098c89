//! Guided tour: an authored sequence of scripted highlights.

use log::debug;
use serde::{Deserialize, Serialize};

use super::state::HighlightState;

/// One tour card.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourStep {
	/// Step heading.
	pub title: String,
	/// Step body text.
	#[serde(default)]
	pub description: String,
	/// Node to select for this step.
	#[serde(default)]
	pub highlight_node: Option<String>,
	/// Node sequence to light up for this step.
	#[serde(default)]
	pub highlight_path: Option<Vec<String>>,
}

/// Tour position. `current` is `None` while the tour is not running.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tour {
	steps: Vec<TourStep>,
	current: Option<usize>,
}

impl Tour {
	/// Inactive tour over `steps`.
	pub fn new(steps: Vec<TourStep>) -> Self {
		Self {
			steps,
			current: None,
		}
	}

	/// True when there are no steps.
	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	/// Number of steps.
	pub fn len(&self) -> usize {
		self.steps.len()
	}

	/// Whether a step is showing.
	pub fn is_active(&self) -> bool {
		self.current.is_some()
	}

	/// Index of the showing step.
	pub fn current_index(&self) -> Option<usize> {
		self.current
	}

	/// The showing step.
	pub fn current_step(&self) -> Option<&TourStep> {
		self.current.and_then(|i| self.steps.get(i))
	}

	/// Begin at the first step. Does nothing when there are no steps.
	pub fn start(&mut self, state: &mut HighlightState) {
		if self.steps.is_empty() {
			return;
		}
		self.go_to(0, state);
	}

	/// Advance; stepping past the last card ends the tour.
	pub fn next(&mut self, state: &mut HighlightState) {
		match self.current {
			Some(i) if i + 1 < self.steps.len() => self.go_to(i + 1, state),
			Some(_) => self.end(state),
			None => {}
		}
	}

	/// Go back one card. No-op on the first card.
	pub fn prev(&mut self, state: &mut HighlightState) {
		if let Some(i) = self.current.filter(|&i| i > 0) {
			self.go_to(i - 1, state);
		}
	}

	/// Leave the tour and drop its scripted highlight.
	pub fn end(&mut self, state: &mut HighlightState) {
		if self.current.take().is_some() {
			debug!("tour ended");
			state.set_scripted_highlight(None, None);
		}
	}

	fn go_to(&mut self, index: usize, state: &mut HighlightState) {
		let step = &self.steps[index];
		debug!("tour step {}/{}: {}", index + 1, self.steps.len(), step.title);
		state.set_scripted_highlight(step.highlight_node.as_deref(), step.highlight_path.as_deref());
		self.current = Some(index);
	}
}
