use std::{
	sync::{Arc, Mutex},
	time::Duration,
};

use tokio::{runtime::Handle, sync::watch, task::JoinHandle};

use crate::backend::SearchBackend;

/// Suggestions published for one piece of typed text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
	pub text: String,
	pub items: Vec<String>,
}

/// Delays suggestion requests until typing pauses.
///
/// Only the newest scheduled text may publish. Each call to [`QueryDebouncer::schedule`]
/// bumps a token and aborts the pending timer. A request that already left is not aborted;
/// its response is dropped when its token is no longer the latest.
pub struct QueryDebouncer {
	inner: Arc<Inner>,
}

struct Inner {
	backend: Arc<dyn SearchBackend>,
	delay: Duration,
	min_chars: usize,
	state: Mutex<DebounceState>,
	published: watch::Sender<Suggestions>,
}

#[derive(Default)]
struct DebounceState {
	token: u64,
	timer: Option<JoinHandle<()>>,
}

impl QueryDebouncer {
	pub fn new(backend: Arc<dyn SearchBackend>, cfg: &quill_config::Suggestions) -> Self {
		let (published, _) = watch::channel(Suggestions::default());

		Self {
			inner: Arc::new(Inner {
				backend,
				delay: Duration::from_millis(cfg.debounce_ms),
				min_chars: cfg.min_chars as usize,
				state: Mutex::new(DebounceState::default()),
				published,
			}),
		}
	}

	/// Restarts the quiet-period timer for `text`.
	///
	/// Outside a tokio runtime no timer can run, so an empty list is published instead.
	pub fn schedule(&self, text: &str) {
		let text = text.to_string();
		let mut state = self.inner.state.lock().unwrap_or_else(|err| err.into_inner());

		state.token += 1;

		if let Some(timer) = state.timer.take() {
			timer.abort();
		}

		if text.chars().count() <= self.inner.min_chars {
			self.inner.published.send_replace(Suggestions { text, items: Vec::new() });

			return;
		}

		let runtime = match Handle::try_current() {
			Ok(runtime) => runtime,
			Err(err) => {
				tracing::warn!(
					error = %err,
					"No async runtime for the suggestion timer; showing none."
				);

				self.inner.published.send_replace(Suggestions { text, items: Vec::new() });

				return;
			},
		};
		let token = state.token;
		let inner = self.inner.clone();

		state.timer = Some(runtime.spawn(async move { inner.fire(token, text).await }));
	}

	/// Drops the pending timer and makes any in-flight response stale.
	pub fn cancel(&self) {
		let mut state = self.inner.state.lock().unwrap_or_else(|err| err.into_inner());

		state.token += 1;

		if let Some(timer) = state.timer.take() {
			timer.abort();
		}
	}

	pub fn subscribe(&self) -> watch::Receiver<Suggestions> {
		self.inner.published.subscribe()
	}

	pub fn current(&self) -> Suggestions {
		self.inner.published.borrow().clone()
	}
}
impl Drop for QueryDebouncer {
	fn drop(&mut self) {
		self.cancel();
	}
}

impl Inner {
	async fn fire(&self, token: u64, text: String) {
		tokio::time::sleep(self.delay).await;

		if !self.start_request(token) {
			return;
		}

		let items = match self.backend.suggestions(&text).await {
			Ok(items) => items,
			Err(err) => {
				tracing::warn!(error = %err, "Suggestion request failed; showing none.");

				Vec::new()
			},
		};
		let state = self.state.lock().unwrap_or_else(|err| err.into_inner());

		if state.token != token {
			tracing::debug!(token, latest = state.token, "Discarding stale suggestions.");

			return;
		}

		self.published.send_replace(Suggestions { text, items });
	}

	/// Detaches the fired timer so a later `schedule` leaves the request running; the token
	/// check before publishing decides whether its response is still wanted.
	fn start_request(&self, token: u64) -> bool {
		let mut state = self.state.lock().unwrap_or_else(|err| err.into_inner());

		if state.token != token {
			return false;
		}

		state.timer = None;

		true
	}
}

#[cfg(test)]
mod tests {
	use quill_domain::{SearchRequest, SearchResponse};

	use super::*;
	use crate::{BoxFuture, Result};

	struct UnusedBackend;
	impl SearchBackend for UnusedBackend {
		fn search<'a>(
			&'a self,
			request: &'a SearchRequest,
		) -> BoxFuture<'a, Result<SearchResponse>> {
			Box::pin(async move { Ok(SearchResponse::empty(&request.text)) })
		}

		fn suggestions<'a>(&'a self, _: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
			Box::pin(async move { Ok(vec!["dragon".to_string()]) })
		}
	}

	#[test]
	fn schedule_without_runtime_publishes_empty() {
		let debouncer =
			QueryDebouncer::new(Arc::new(UnusedBackend), &quill_config::Suggestions::default());

		debouncer.schedule("dragon");

		assert_eq!(
			debouncer.current(),
			Suggestions { text: "dragon".to_string(), items: Vec::new() }
		);
	}
}
