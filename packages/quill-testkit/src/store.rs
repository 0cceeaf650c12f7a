use std::sync::atomic::{AtomicBool, Ordering};

use quill_storage::{Error, KeyValueStore, MemoryStore, Result};

/// In-memory store whose reads and writes can be switched to fail.
#[derive(Debug, Default)]
pub struct FlakyStore {
	inner: MemoryStore,
	fail_reads: AtomicBool,
	fail_writes: AtomicBool,
}
impl FlakyStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set_fail_reads(&self, fail: bool) {
		self.fail_reads.store(fail, Ordering::SeqCst);
	}

	/// Also covers `remove`.
	pub fn set_fail_writes(&self, fail: bool) {
		self.fail_writes.store(fail, Ordering::SeqCst);
	}

	/// The backing store, bypassing injected failures.
	pub fn inner(&self) -> &MemoryStore {
		&self.inner
	}
}
impl KeyValueStore for FlakyStore {
	fn get(&self, key: &str) -> Result<Option<String>> {
		if self.fail_reads.load(Ordering::SeqCst) {
			return Err(Error::Unavailable(format!("Injected read failure for {key}.")));
		}

		self.inner.get(key)
	}

	fn set(&self, key: &str, value: &str) -> Result<()> {
		if self.fail_writes.load(Ordering::SeqCst) {
			return Err(Error::Unavailable(format!("Injected write failure for {key}.")));
		}

		self.inner.set(key, value)
	}

	fn remove(&self, key: &str) -> Result<()> {
		if self.fail_writes.load(Ordering::SeqCst) {
			return Err(Error::Unavailable(format!("Injected remove failure for {key}.")));
		}

		self.inner.remove(key)
	}
}

/// A store that is never reachable.
#[derive(Debug, Default)]
pub struct FailingStore;
impl KeyValueStore for FailingStore {
	fn get(&self, _: &str) -> Result<Option<String>> {
		Err(Error::Unavailable("Store is offline.".to_string()))
	}

	fn set(&self, _: &str, _: &str) -> Result<()> {
		Err(Error::Unavailable("Store is offline.".to_string()))
	}

	fn remove(&self, _: &str) -> Result<()> {
		Err(Error::Unavailable("Store is offline.".to_string()))
	}
}
