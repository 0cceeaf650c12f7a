//! The search session controller.
//!
//! All mutable state sits behind one `std::sync::Mutex` that is never held across an
//! `.await`. Each request class carries a monotonic token: `search_token` for first pages and
//! `page_token` for follow-up pages. A response is applied only when its token is still the
//! latest and the session is open, and both checks happen in the same critical section as the
//! state change.

use std::{
	sync::{Arc, Mutex, MutexGuard},
	time::Instant,
};

use tokio::sync::watch;
use uuid::Uuid;

use crate::{
	Error, Result,
	analytics::SearchAnalytics,
	backend::{HttpBackend, SearchBackend},
	debounce::{QueryDebouncer, Suggestions},
	navigation::{Arrival, NavigationBridge},
	paginator::ResultPaginator,
	views::SessionView,
};
use quill_config::Config;
use quill_domain::{
	Filters, NavigationContext, SearchRequest, SearchResponse, SearchResult, SearchRouteParams,
	filters, navigation, query,
};
use quill_storage::{
	HistoryStore, KeyValueStore, SavedSearch, SavedSearchStore, StarredResults, kv,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultStatus {
	#[default]
	Idle,
	Loading,
	Ready,
	Empty,
	Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
	Applied { result_count: usize, total_count: u64 },
	/// The backend failed; the session now shows an empty result set.
	Failed,
	/// A newer search started before this one resolved.
	Superseded,
	/// Filters were stored but no query is active.
	Idle,
	Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMoreOutcome {
	Appended { added: usize },
	/// Nothing more to load, or a page is already in flight.
	Skipped,
	Failed,
	Superseded,
	Closed,
}

/// Owned copy of the session state for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
	pub query: Option<String>,
	pub filters: Filters,
	pub results: Vec<SearchResult>,
	pub total_count: u64,
	pub offset: u64,
	pub has_more: bool,
	pub loading: bool,
	pub loading_more: bool,
	pub status: ResultStatus,
	pub query_time_ms: f64,
	/// Related queries returned with the first page.
	pub response_suggestions: Vec<String>,
	pub view: SessionView,
	pub search_id: Option<String>,
}

/// Where the host should navigate after a result was activated.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationTarget {
	pub route: String,
	pub search_id: String,
	pub context: NavigationContext,
}

#[derive(Clone)]
pub struct SearchSession {
	inner: Arc<Inner>,
}

struct Inner {
	id: String,
	max_query_chars: u32,
	backend: Arc<dyn SearchBackend>,
	history: HistoryStore,
	saved: SavedSearchStore,
	starred: StarredResults,
	bridge: NavigationBridge,
	debouncer: QueryDebouncer,
	state: Mutex<SessionState>,
}

struct SessionState {
	query: Option<String>,
	filters: Filters,
	paginator: ResultPaginator,
	loading: bool,
	loading_more: bool,
	status: ResultStatus,
	query_time_ms: f64,
	response_suggestions: Vec<String>,
	view: SessionView,
	search_id: Option<String>,
	search_token: u64,
	page_token: u64,
	closed: bool,
}

impl SearchSession {
	/// Builds a session over HTTP and the store described by `[storage]`.
	pub fn open(cfg: &Config) -> Result<Self> {
		let store = kv::open_store(&cfg.storage)?;

		Self::new(cfg, store)
	}

	/// Builds a session over HTTP with a fresh random session id.
	pub fn new(cfg: &Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
		let backend = Arc::new(HttpBackend::new(&cfg.backend)?);

		Ok(Self::with_backend(cfg, store, backend, &Uuid::new_v4().to_string()))
	}

	pub fn with_backend(
		cfg: &Config,
		store: Arc<dyn KeyValueStore>,
		backend: Arc<dyn SearchBackend>,
		session_id: &str,
	) -> Self {
		let state = SessionState {
			query: None,
			filters: Filters::default(),
			paginator: ResultPaginator::new(cfg.session.page_size),
			loading: false,
			loading_more: false,
			status: ResultStatus::Idle,
			query_time_ms: 0.0,
			response_suggestions: Vec::new(),
			view: SessionView::default(),
			search_id: None,
			search_token: 0,
			page_token: 0,
			closed: false,
		};

		Self {
			inner: Arc::new(Inner {
				id: session_id.to_string(),
				max_query_chars: cfg.session.max_query_chars,
				history: HistoryStore::new(store.clone(), cfg.history.max_entries as usize),
				saved: SavedSearchStore::new(store.clone()),
				starred: StarredResults::new(store.clone()),
				bridge: NavigationBridge::new(store, session_id, &cfg.highlight),
				debouncer: QueryDebouncer::new(backend.clone(), &cfg.suggestions),
				backend,
				state: Mutex::new(state),
			}),
		}
	}

	pub fn id(&self) -> &str {
		&self.inner.id
	}

	/// Runs a fresh search from offset 0.
	///
	/// Only validation errors are returned. Backend failures leave an empty result set with
	/// status [`ResultStatus::Failed`] and report [`SearchOutcome::Failed`].
	pub async fn search(&self, raw_query: &str, filters: Filters) -> Result<SearchOutcome> {
		let query = query::validate_query(raw_query, self.inner.max_query_chars)?;
		let filters = filters::normalize_filters(filters)?;

		Ok(self.run_search(query, filters).await)
	}

	/// Fetches the next page and appends it. Concurrent calls are rejected, not queued.
	pub async fn load_more(&self) -> LoadMoreOutcome {
		let (token, request) = {
			let mut state = self.lock();

			if state.closed {
				return LoadMoreOutcome::Closed;
			}
			if state.loading || state.loading_more || !state.paginator.has_more() {
				return LoadMoreOutcome::Skipped;
			}

			let Some(text) = state.query.clone() else {
				return LoadMoreOutcome::Skipped;
			};

			state.loading_more = true;
			state.page_token += 1;

			let request = SearchRequest {
				text,
				filters: state.filters.clone(),
				limit: state.paginator.page_size(),
				offset: state.paginator.offset(),
			};

			(state.page_token, request)
		};
		let result = self.inner.backend.search(&request).await;
		let mut state = self.lock();

		if state.closed {
			tracing::debug!(offset = request.offset, "Dropping page for closed session.");

			return LoadMoreOutcome::Closed;
		}
		// A newer search owns `loading_more` now.
		if state.page_token != token {
			tracing::debug!(offset = request.offset, "Discarding stale page.");

			return LoadMoreOutcome::Superseded;
		}

		state.loading_more = false;

		match result {
			Ok(response) => {
				let added = state.paginator.append(&response);

				tracing::debug!(
					offset = state.paginator.offset(),
					total_count = state.paginator.total_count(),
					added,
					"Page appended."
				);

				LoadMoreOutcome::Appended { added }
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					offset = request.offset,
					"Failed to load next page; keeping loaded results."
				);

				LoadMoreOutcome::Failed
			},
		}
	}

	/// Infinite-scroll hook. Goes through the same guard as [`SearchSession::load_more`].
	pub async fn on_sentinel_visible(&self) -> LoadMoreOutcome {
		self.load_more().await
	}

	/// Reruns the active query with `filters`, or just stores them when nothing is active.
	pub async fn change_filters(&self, filters: Filters) -> Result<SearchOutcome> {
		let filters = filters::normalize_filters(filters)?;
		let query = {
			let mut state = self.lock();

			if state.closed {
				return Ok(SearchOutcome::Closed);
			}

			match state.query.clone() {
				Some(query) => query,
				None => {
					state.filters = filters;

					return Ok(SearchOutcome::Idle);
				},
			}
		};

		Ok(self.run_search(query, filters).await)
	}

	pub fn snapshot(&self) -> SessionSnapshot {
		let state = self.lock();

		SessionSnapshot {
			query: state.query.clone(),
			filters: state.filters.clone(),
			results: state.paginator.results().to_vec(),
			total_count: state.paginator.total_count(),
			offset: state.paginator.offset(),
			has_more: state.paginator.has_more(),
			loading: state.loading,
			loading_more: state.loading_more,
			status: state.status,
			query_time_ms: state.query_time_ms,
			response_suggestions: state.response_suggestions.clone(),
			view: state.view,
			search_id: state.search_id.clone(),
		}
	}

	/// Captures the list for the way back and builds the route to open `result_id` at.
	pub fn activate(
		&self,
		result_id: &str,
		route: &str,
		scroll_position: f64,
	) -> Result<NavigationTarget> {
		let context = {
			let state = self.lock();

			if state.closed {
				return Err(Error::InvalidRequest { message: "Session is closed.".to_string() });
			}

			let (Some(query), Some(search_id)) = (state.query.clone(), state.search_id.clone())
			else {
				return Err(Error::InvalidRequest {
					message: "No search results to navigate from.".to_string(),
				});
			};

			if !state.paginator.results().iter().any(|result| result.id == result_id) {
				return Err(Error::NotFound {
					message: format!("Result {result_id} is not in the current list."),
				});
			}

			let terms = query::highlight_terms(&query);

			NavigationContext {
				search_id,
				query,
				filters: state.filters.clone(),
				results: state.paginator.results().to_vec(),
				total_count: state.paginator.total_count(),
				scroll_position,
				highlight_terms: (!terms.is_empty()).then_some(terms),
			}
		};

		self.inner.bridge.capture(&context);

		let params = SearchRouteParams {
			search_id: context.search_id.clone(),
			highlight_terms: context.highlight_terms.clone().unwrap_or_default(),
		};

		Ok(NavigationTarget {
			route: navigation::append_search_params(route, &params),
			search_id: context.search_id.clone(),
			context,
		})
	}

	/// Destination-side handling of a route opened from the result list.
	pub fn arrive(&self, route_query: &str, content: &str, now: Instant) -> Option<Arrival> {
		self.inner.bridge.arrive(route_query, content, now)
	}

	/// Returns to the result list. When no query is active the list is rebuilt from the
	/// captured context. Returns the scroll position to restore.
	pub fn resume(&self) -> Option<f64> {
		let context = self.inner.bridge.restore()?;
		let mut state = self.lock();

		if state.closed {
			return None;
		}

		match state.search_id.as_deref() {
			Some(search_id) if search_id == context.search_id => {
				return Some(context.scroll_position);
			},
			Some(_) => return None,
			None if state.query.is_some() => return None,
			None => {},
		}

		state.status =
			if context.results.is_empty() { ResultStatus::Empty } else { ResultStatus::Ready };
		state.paginator.restore(context.results, context.total_count);
		state.query = Some(context.query);
		state.filters = context.filters;
		state.search_id = Some(context.search_id);
		state.view = SessionView::Results;

		Some(context.scroll_position)
	}

	pub fn dismiss_context(&self) {
		self.inner.bridge.dismiss();
	}

	/// Saves the active query and filters under `name`.
	pub fn save_current(&self, name: &str) -> Result<SavedSearch> {
		let (query, filters, result_count) = {
			let state = self.lock();
			let Some(query) = state.query.clone() else {
				return Err(Error::InvalidRequest {
					message: "No active search to save.".to_string(),
				});
			};
			let result_count = matches!(state.status, ResultStatus::Ready | ResultStatus::Empty)
				.then(|| state.paginator.total_count());

			(query, state.filters.clone(), result_count)
		};

		Ok(self.inner.saved.save(name, &query, &filters, result_count)?)
	}

	/// Marks the saved search used, runs it and switches to the results tab.
	pub async fn load_saved(&self, id: Uuid) -> Result<SearchOutcome> {
		let saved = self.inner.saved.touch(id)?;

		self.select_view(SessionView::Results);
		self.search(&saved.query, saved.filters).await
	}

	pub fn rename_saved(&self, id: Uuid, new_name: &str) -> Result<SavedSearch> {
		Ok(self.inner.saved.rename(id, new_name)?)
	}

	pub fn delete_saved(&self, id: Uuid) -> bool {
		self.inner.saved.delete(id)
	}

	pub fn saved_searches(&self) -> Vec<SavedSearch> {
		self.inner.saved.list()
	}

	pub fn history(&self) -> Vec<String> {
		self.inner.history.list()
	}

	pub fn clear_history(&self) {
		self.inner.history.clear();
	}

	pub fn remove_history(&self, query: &str) -> bool {
		self.inner.history.remove(query)
	}

	/// Reruns history entry `index` with the current filters.
	pub async fn run_history(&self, index: usize) -> Result<SearchOutcome> {
		let Some(query) = self.inner.history.list().get(index).cloned() else {
			return Err(Error::NotFound {
				message: format!("History entry {index} does not exist."),
			});
		};
		let filters = self.lock().filters.clone();

		self.select_view(SessionView::Results);
		self.search(&query, filters).await
	}

	pub fn toggle_star(&self, result_id: &str) -> bool {
		self.inner.starred.toggle(result_id)
	}

	pub fn is_starred(&self, result_id: &str) -> bool {
		self.inner.starred.is_starred(result_id)
	}

	pub fn starred(&self) -> Vec<String> {
		self.inner.starred.list()
	}

	pub fn view(&self) -> SessionView {
		self.lock().view
	}

	pub fn select_view(&self, view: SessionView) {
		self.lock().view = view;
	}

	pub fn analytics(&self) -> SearchAnalytics {
		let mut analytics = {
			let state = self.lock();
			let mut analytics = SearchAnalytics::from_results(
				state.paginator.results(),
				state.paginator.total_count(),
				state.query_time_ms,
			);

			analytics.active_filters = state.filters.active_count();

			analytics
		};

		analytics.history_len = self.inner.history.list().len();
		analytics.saved_count = self.inner.saved.list().len();
		analytics.starred_count = self.inner.starred.list().len();

		analytics
	}

	/// Feeds typed text to the suggestion debouncer.
	pub fn suggest(&self, text: &str) {
		if self.lock().closed {
			return;
		}

		self.inner.debouncer.schedule(text);
	}

	pub fn suggestions(&self) -> Suggestions {
		self.inner.debouncer.current()
	}

	pub fn subscribe_suggestions(&self) -> watch::Receiver<Suggestions> {
		self.inner.debouncer.subscribe()
	}

	/// Tears the session down. Responses still in flight will not touch it.
	pub fn close(&self) {
		{
			let mut state = self.lock();

			state.closed = true;
			state.search_token += 1;
			state.page_token += 1;
			state.loading = false;
			state.loading_more = false;
		}

		self.inner.debouncer.cancel();
	}

	pub fn is_closed(&self) -> bool {
		self.lock().closed
	}

	async fn run_search(&self, text: String, filters: Filters) -> SearchOutcome {
		let (token, request) = {
			let mut state = self.lock();

			if state.closed {
				return SearchOutcome::Closed;
			}

			state.search_token += 1;
			// Any page still in flight belongs to the previous query.
			state.page_token += 1;
			state.query = Some(text.clone());
			state.filters = filters.clone();
			state.paginator.reset();
			state.loading = true;
			state.loading_more = false;
			state.status = ResultStatus::Loading;
			state.search_id = None;

			let request =
				SearchRequest { text, filters, limit: state.paginator.page_size(), offset: 0 };

			(state.search_token, request)
		};
		let result = self.inner.backend.search(&request).await;
		let outcome = {
			let mut state = self.lock();

			if state.closed {
				tracing::debug!(token, "Dropping search response for closed session.");

				return SearchOutcome::Closed;
			}
			if state.search_token != token {
				tracing::debug!(
					token,
					latest = state.search_token,
					"Discarding stale search response."
				);

				return SearchOutcome::Superseded;
			}

			state.loading = false;

			match result {
				Ok(response) => {
					apply_first_page(&mut state, &response);

					SearchOutcome::Applied {
						result_count: state.paginator.results().len(),
						total_count: state.paginator.total_count(),
					}
				},
				Err(err) => {
					tracing::warn!(error = %err, query = %request.text, "Search failed.");

					apply_first_page(&mut state, &SearchResponse::empty(&request.text));

					state.status = ResultStatus::Failed;
					state.search_id = None;

					SearchOutcome::Failed
				},
			}
		};

		if let SearchOutcome::Applied { result_count, total_count } = outcome {
			tracing::debug!(query = %request.text, result_count, total_count, "Search applied.");

			self.inner.history.add(&request.text);
		}

		outcome
	}

	fn lock(&self) -> MutexGuard<'_, SessionState> {
		self.inner.state.lock().unwrap_or_else(|err| err.into_inner())
	}
}

fn apply_first_page(state: &mut SessionState, response: &SearchResponse) {
	state.paginator.replace(response);
	state.query_time_ms = response.query_time_ms;
	state.response_suggestions = response.suggestions.clone();
	state.status = if state.paginator.results().is_empty() {
		ResultStatus::Empty
	} else {
		ResultStatus::Ready
	};
	state.search_id = Some(Uuid::new_v4().to_string());
}
