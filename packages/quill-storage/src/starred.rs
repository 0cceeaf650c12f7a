use std::sync::Arc;

use crate::{SAVED_RESULTS_KEY, kv::KeyValueStore, list::PersistedList};

/// Ids of results the user starred from the result list.
pub struct StarredResults {
	list: PersistedList<String>,
}
impl StarredResults {
	pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
		Self { list: PersistedList::load(store, SAVED_RESULTS_KEY) }
	}

	/// Stars an unstarred result or unstars a starred one. Returns whether it is starred now.
	pub fn toggle(&self, result_id: &str) -> bool {
		self.list.update(|ids| {
			if let Some(position) = ids.iter().position(|id| id == result_id) {
				ids.remove(position);

				(false, true)
			} else {
				ids.push(result_id.to_string());

				(true, true)
			}
		})
	}

	pub fn is_starred(&self, result_id: &str) -> bool {
		self.list.snapshot().iter().any(|id| id == result_id)
	}

	pub fn list(&self) -> Vec<String> {
		self.list.snapshot()
	}
}
