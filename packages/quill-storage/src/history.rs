use std::sync::Arc;

use crate::{SEARCH_HISTORY_KEY, kv::KeyValueStore, list::PersistedList};

/// Recently issued queries, most recent first, unique by exact text.
pub struct HistoryStore {
	list: PersistedList<String>,
	max_entries: usize,
}
impl HistoryStore {
	pub fn new(store: Arc<dyn KeyValueStore>, max_entries: usize) -> Self {
		Self {
			list: PersistedList::load(store, SEARCH_HISTORY_KEY),
			max_entries: max_entries.max(1),
		}
	}

	/// Promotes `query` to the front, dropping any older copy and anything past the cap.
	pub fn add(&self, query: &str) {
		let query = query.trim();

		if query.is_empty() {
			return;
		}

		self.list.update(|entries| {
			entries.retain(|entry| entry != query);
			entries.insert(0, query.to_string());
			entries.truncate(self.max_entries);

			((), true)
		});
	}

	pub fn remove(&self, query: &str) -> bool {
		self.list.update(|entries| {
			let before = entries.len();

			entries.retain(|entry| entry != query);

			let removed = entries.len() != before;

			(removed, removed)
		})
	}

	pub fn clear(&self) {
		self.list.update(|entries| {
			entries.clear();

			((), true)
		});
	}

	pub fn list(&self) -> Vec<String> {
		let mut entries = self.list.snapshot();

		// Another writer may have used a larger cap.
		entries.truncate(self.max_entries);

		entries
	}
}
