use std::sync::{Arc, Mutex};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
	Error,
	kv::{self, KeyValueStore},
};

/// A whole-list document in the key-value store with an in-memory copy.
///
/// Every mutation re-reads the full list, applies the change and writes the full list back
/// inside one synchronous call, so two holders of the same store never lose each other's
/// updates. Once a write fails the in-memory copy stays authoritative until a later write
/// succeeds. A failed read never does: while the store cannot be read, changes stay in memory
/// and are not written over a document that could not be seen.
pub(crate) struct PersistedList<T> {
	store: Arc<dyn KeyValueStore>,
	key: &'static str,
	state: Mutex<ListState<T>>,
}

struct ListState<T> {
	items: Vec<T>,
	/// `false` after a failed write; memory then holds changes the store lacks.
	synced: bool,
}

impl<T> PersistedList<T>
where
	T: Clone + Serialize + DeserializeOwned,
{
	pub(crate) fn load(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
		let list =
			Self { store, key, state: Mutex::new(ListState { items: Vec::new(), synced: true }) };

		if let Some(items) = list.read() {
			list.state.lock().unwrap_or_else(|err| err.into_inner()).items = items;
		}

		list
	}

	pub(crate) fn snapshot(&self) -> Vec<T> {
		let mut state = self.state.lock().unwrap_or_else(|err| err.into_inner());

		self.refresh(&mut state);

		state.items.clone()
	}

	/// Applies `change` to the freshest copy of the list. The closure returns its result plus
	/// whether it modified the list; unmodified lists are not written back.
	pub(crate) fn update<R>(&self, change: impl FnOnce(&mut Vec<T>) -> (R, bool)) -> R {
		let mut state = self.state.lock().unwrap_or_else(|err| err.into_inner());
		let readable = self.refresh(&mut state);
		let (out, modified) = change(&mut state.items);

		if !modified {
			return out;
		}
		if !readable {
			tracing::warn!(key = self.key, "Store is unreadable; keeping change in memory only.");

			return out;
		}

		match kv::write_json(self.store.as_ref(), self.key, &state.items) {
			Ok(()) => state.synced = true,
			Err(err) => {
				tracing::warn!(
					error = %err,
					key = self.key,
					"Failed to persist list; keeping in-memory state."
				);

				state.synced = false;
			},
		}

		out
	}

	/// Reloads memory from the store unless memory is authoritative. Returns `false` when the
	/// store could not be read, so the caller must not write over it.
	fn refresh(&self, state: &mut ListState<T>) -> bool {
		if !state.synced {
			return true;
		}

		match self.read() {
			Some(items) => {
				state.items = items;

				true
			},
			None => false,
		}
	}

	fn read(&self) -> Option<Vec<T>> {
		match kv::read_json::<Vec<T>>(self.store.as_ref(), self.key) {
			Ok(items) => Some(items.unwrap_or_default()),
			// A malformed document holds nothing recoverable; the next write replaces it.
			Err(Error::SerdeJson(err)) => {
				tracing::warn!(error = %err, key = self.key, "Discarding malformed persisted list.");

				Some(Vec::new())
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					key = self.key,
					"Failed to read persisted list; using in-memory state."
				);

				None
			},
		}
	}
}
