use std::{
	sync::{Arc, Mutex},
	time::{Duration, Instant},
};

use quill_domain::{
	HighlightMarker, HighlightNavigator, NavigationContext, ScrollRequest, SearchRouteParams,
	highlight, navigation,
};
use quill_storage::{KeyValueStore, kv, navigation_context_key};

/// One-slot hand-off of the result list between the search view and the view a result opens.
///
/// The slot lives in the shared key-value store under `navigation_context:<session_id>`, with
/// an in-memory copy that stays authoritative after a failed write.
pub struct NavigationBridge {
	store: Arc<dyn KeyValueStore>,
	key: String,
	emphasis: Duration,
	marker: HighlightMarker,
	state: Mutex<SlotState>,
}

struct SlotState {
	slot: Option<NavigationContext>,
	synced: bool,
}

/// What the destination view needs after a result was opened from the list.
#[derive(Debug, Clone)]
pub struct Arrival {
	pub params: SearchRouteParams,
	/// Present only when the stored context belongs to the route's `searchId`.
	pub context: Option<NavigationContext>,
	pub show_banner: bool,
	pub navigator: HighlightNavigator,
	pub initial_scroll: Option<ScrollRequest>,
	pub marked_content: String,
}

impl NavigationBridge {
	pub fn new(
		store: Arc<dyn KeyValueStore>,
		session_id: &str,
		cfg: &quill_config::Highlight,
	) -> Self {
		Self {
			store,
			key: navigation_context_key(session_id),
			emphasis: Duration::from_millis(cfg.emphasis_ms),
			marker: HighlightMarker::new(&cfg.marker_open, &cfg.marker_close),
			state: Mutex::new(SlotState { slot: None, synced: true }),
		}
	}

	/// Stores `context`, replacing whatever the slot held.
	pub fn capture(&self, context: &NavigationContext) {
		let mut state = self.state.lock().unwrap_or_else(|err| err.into_inner());

		state.slot = Some(context.clone());
		state.synced = match kv::write_json(self.store.as_ref(), &self.key, context) {
			Ok(()) => true,
			Err(err) => {
				tracing::warn!(
					error = %err,
					key = %self.key,
					"Failed to persist navigation context; keeping it in memory."
				);

				false
			},
		};
	}

	/// Reads the slot without clearing it.
	pub fn restore(&self) -> Option<NavigationContext> {
		let mut state = self.state.lock().unwrap_or_else(|err| err.into_inner());

		if !state.synced {
			return state.slot.clone();
		}

		match kv::read_json::<NavigationContext>(self.store.as_ref(), &self.key) {
			Ok(stored) => {
				state.slot = stored.clone();

				stored
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					key = %self.key,
					"Failed to read navigation context; using in-memory copy."
				);

				state.slot.clone()
			},
		}
	}

	pub fn dismiss(&self) {
		let mut state = self.state.lock().unwrap_or_else(|err| err.into_inner());

		state.slot = None;
		state.synced = match self.store.remove(&self.key) {
			Ok(()) => true,
			Err(err) => {
				tracing::warn!(
					error = %err,
					key = %self.key,
					"Failed to clear navigation context; cleared in memory only."
				);

				false
			},
		};
	}

	/// Handles landing on a destination route. Returns `None` for cold navigation.
	pub fn arrive(&self, route_query: &str, content: &str, now: Instant) -> Option<Arrival> {
		let params = navigation::parse_search_params(route_query)?;
		let context = self.restore().filter(|context| context.search_id == params.search_id);
		let terms = if params.highlight_terms.is_empty() {
			context.as_ref().and_then(|context| context.highlight_terms.clone()).unwrap_or_default()
		} else {
			params.highlight_terms.clone()
		};
		let mut navigator = HighlightNavigator::new(self.emphasis);
		let initial_scroll = navigator.apply(content, &terms, now);
		let marked_content = highlight::render(content, navigator.terms(), &self.marker);

		Some(Arrival {
			show_banner: context.is_some(),
			params,
			context,
			navigator,
			initial_scroll,
			marked_content,
		})
	}
}
