use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Error, Result, SAVED_SEARCHES_KEY, kv::KeyValueStore, list::PersistedList,
	models::SavedSearch,
};
use quill_domain::Filters;

/// Named query + filter snapshots, newest first.
pub struct SavedSearchStore {
	list: PersistedList<SavedSearch>,
}
impl SavedSearchStore {
	pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
		Self { list: PersistedList::load(store, SAVED_SEARCHES_KEY) }
	}

	pub fn save(
		&self,
		name: &str,
		query: &str,
		filters: &Filters,
		result_count: Option<u64>,
	) -> Result<SavedSearch> {
		let name = require_name(name)?;

		Ok(self.list.update(|searches| {
			let mut id = Uuid::new_v4();

			while searches.iter().any(|search| search.id == id) {
				id = Uuid::new_v4();
			}

			let saved = SavedSearch {
				id,
				name,
				query: query.to_string(),
				filters: filters.clone(),
				created_at: OffsetDateTime::now_utc(),
				last_used: None,
				result_count,
			};

			searches.insert(0, saved.clone());

			(saved, true)
		}))
	}

	/// Changes only the name; query, filters and timestamps are left alone.
	pub fn rename(&self, id: Uuid, new_name: &str) -> Result<SavedSearch> {
		let new_name = require_name(new_name)?;

		self.modify(id, |search| search.name = new_name)
	}

	/// Records that the saved search was loaded just now.
	pub fn touch(&self, id: Uuid) -> Result<SavedSearch> {
		let now = OffsetDateTime::now_utc();

		self.modify(id, |search| search.last_used = Some(now))
	}

	pub fn delete(&self, id: Uuid) -> bool {
		self.list.update(|searches| {
			let before = searches.len();

			searches.retain(|search| search.id != id);

			let removed = searches.len() != before;

			(removed, removed)
		})
	}

	pub fn get(&self, id: Uuid) -> Option<SavedSearch> {
		self.list.snapshot().into_iter().find(|search| search.id == id)
	}

	pub fn list(&self) -> Vec<SavedSearch> {
		self.list.snapshot()
	}

	fn modify(&self, id: Uuid, change: impl FnOnce(&mut SavedSearch)) -> Result<SavedSearch> {
		self.list.update(|searches| match searches.iter_mut().find(|search| search.id == id) {
			Some(search) => {
				change(search);

				(Ok(search.clone()), true)
			},
			None => (Err(Error::NotFound(format!("Saved search {id} does not exist."))), false),
		})
	}
}

fn require_name(name: &str) -> Result<String> {
	let name = name.trim();

	if name.is_empty() {
		return Err(Error::InvalidArgument("Saved search name must be non-empty.".to_string()));
	}

	Ok(name.to_string())
}
