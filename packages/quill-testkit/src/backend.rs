use std::{
	collections::{HashMap, VecDeque},
	sync::{Mutex, MutexGuard},
};

use tokio::sync::oneshot;

use quill_domain::{SearchRequest, SearchResponse, SearchResult};
use quill_service::{BoxFuture, Error, Result, SearchBackend};

/// In-process backend serving canned result lists.
///
/// Each query text maps to a full result list that is filtered by entity type and paged by
/// `offset`/`limit`. While holding, responses are parked until a test releases them, in any
/// order, which is how races between overlapping requests are reproduced.
#[derive(Default)]
pub struct ScriptedBackend {
	state: Mutex<ScriptState>,
}

#[derive(Default)]
struct ScriptState {
	corpus: HashMap<String, Vec<SearchResult>>,
	reported_totals: HashMap<String, u64>,
	suggestions: Vec<String>,
	holding: bool,
	held: VecDeque<oneshot::Sender<()>>,
	holding_suggestions: bool,
	held_suggestions: VecDeque<oneshot::Sender<()>>,
	search_failures: usize,
	fail_suggestions: bool,
	search_calls: Vec<SearchRequest>,
	suggestion_calls: Vec<String>,
}

impl ScriptedBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_corpus(mut self, query: &str, results: Vec<SearchResult>) -> Self {
		self.state_mut().corpus.insert(query.to_string(), results);

		self
	}

	/// Reports `total` instead of the real corpus size for `query`.
	pub fn with_reported_total(mut self, query: &str, total: u64) -> Self {
		self.state_mut().reported_totals.insert(query.to_string(), total);

		self
	}

	pub fn with_suggestions(mut self, items: &[&str]) -> Self {
		self.state_mut().suggestions = items.iter().map(|item| item.to_string()).collect();

		self
	}

	/// Parks every following search response until it is released.
	pub fn hold(&self) {
		self.lock().holding = true;
	}

	/// Stops parking new responses. Already parked ones stay parked.
	pub fn stop_holding(&self) {
		self.lock().holding = false;
	}

	pub fn release_oldest(&self) -> bool {
		let sender = self.lock().held.pop_front();

		release(sender)
	}

	pub fn release_newest(&self) -> bool {
		let sender = self.lock().held.pop_back();

		release(sender)
	}

	pub fn release_all(&self) -> usize {
		let senders: Vec<_> = self.lock().held.drain(..).collect();
		let count = senders.len();

		for sender in senders {
			let _ = sender.send(());
		}

		count
	}

	pub fn held_count(&self) -> usize {
		self.lock().held.len()
	}

	/// Yields until at least `count` responses are parked.
	pub async fn wait_for_held(&self, count: usize) {
		while self.held_count() < count {
			tokio::task::yield_now().await;
		}
	}

	/// Parks every following suggestion response until it is released.
	pub fn hold_suggestions(&self) {
		self.lock().holding_suggestions = true;
	}

	pub fn release_oldest_suggestion(&self) -> bool {
		let sender = self.lock().held_suggestions.pop_front();

		release(sender)
	}

	pub fn held_suggestion_count(&self) -> usize {
		self.lock().held_suggestions.len()
	}

	/// The next `count` searches fail with a backend error.
	pub fn fail_next_searches(&self, count: usize) {
		self.lock().search_failures = count;
	}

	pub fn fail_suggestions(&self, fail: bool) {
		self.lock().fail_suggestions = fail;
	}

	pub fn search_calls(&self) -> Vec<SearchRequest> {
		self.lock().search_calls.clone()
	}

	pub fn suggestion_calls(&self) -> Vec<String> {
		self.lock().suggestion_calls.clone()
	}

	fn lock(&self) -> MutexGuard<'_, ScriptState> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn state_mut(&mut self) -> &mut ScriptState {
		self.state.get_mut().unwrap_or_else(|err| err.into_inner())
	}
}
impl SearchBackend for ScriptedBackend {
	fn search<'a>(&'a self, request: &'a SearchRequest) -> BoxFuture<'a, Result<SearchResponse>> {
		Box::pin(async move {
			let (response, parked) = {
				let mut state = self.lock();

				state.search_calls.push(request.clone());

				let response = if state.search_failures > 0 {
					state.search_failures -= 1;

					Err(Error::Backend { message: "Scripted search failure.".to_string() })
				} else {
					Ok(state.page(request))
				};
				let parked = if state.holding {
					let (sender, receiver) = oneshot::channel();

					state.held.push_back(sender);

					Some(receiver)
				} else {
					None
				};

				(response, parked)
			};

			if let Some(receiver) = parked {
				receiver.await.map_err(|_| Error::Backend {
					message: "Held response was dropped.".to_string(),
				})?;
			}

			response
		})
	}

	fn suggestions<'a>(&'a self, partial_text: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(async move {
			let (response, parked) = {
				let mut state = self.lock();

				state.suggestion_calls.push(partial_text.to_string());

				let response = if state.fail_suggestions {
					Err(Error::Backend { message: "Scripted suggestion failure.".to_string() })
				} else {
					Ok(state.suggestions.clone())
				};
				let parked = if state.holding_suggestions {
					let (sender, receiver) = oneshot::channel();

					state.held_suggestions.push_back(sender);

					Some(receiver)
				} else {
					None
				};

				(response, parked)
			};

			if let Some(receiver) = parked {
				receiver.await.map_err(|_| Error::Backend {
					message: "Held suggestions were dropped.".to_string(),
				})?;
			}

			response
		})
	}
}

impl ScriptState {
	fn page(&self, request: &SearchRequest) -> SearchResponse {
		let matching: Vec<&SearchResult> = self
			.corpus
			.get(&request.text)
			.map(|results| {
				results
					.iter()
					.filter(|result| {
						request.filters.entity_types.is_empty()
							|| request.filters.entity_types.contains(result.kind.as_str())
					})
					.collect()
			})
			.unwrap_or_default();
		let total_count = self
			.reported_totals
			.get(&request.text)
			.copied()
			.unwrap_or(matching.len() as u64);
		let results = matching
			.into_iter()
			.skip(request.offset as usize)
			.take(request.limit as usize)
			.cloned()
			.collect();

		SearchResponse {
			query: request.text.clone(),
			results,
			total_count,
			query_time_ms: 4.0,
			suggestions: Vec::new(),
		}
	}
}

fn release(sender: Option<oneshot::Sender<()>>) -> bool {
	match sender {
		Some(sender) => sender.send(()).is_ok(),
		None => false,
	}
}
