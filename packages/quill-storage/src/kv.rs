use std::{
	collections::HashMap,
	fs, io,
	path::{Path, PathBuf},
	sync::{Arc, Mutex},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result};

/// Durable key-value storage with synchronous reads and writes.
///
/// History, saved searches, saved results and navigation contexts all go through this trait,
/// so the engine does not care whether values live in memory, on disk, or in a host-provided
/// store.
pub trait KeyValueStore
where
	Self: Send + Sync,
{
	fn get(&self, key: &str) -> Result<Option<String>>;

	fn set(&self, key: &str, value: &str) -> Result<()>;

	fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: Mutex<HashMap<String, String>>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}
impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>> {
		let entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		Ok(entries.get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<()> {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.insert(key.to_string(), value.to_string());

		Ok(())
	}

	fn remove(&self, key: &str) -> Result<()> {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.remove(key);

		Ok(())
	}
}

/// One JSON document per key inside a directory.
#[derive(Debug)]
pub struct FileStore {
	root: PathBuf,
}
impl FileStore {
	pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
		let root = root.into();

		fs::create_dir_all(&root).map_err(|err| Error::Io { path: root.clone(), source: err })?;

		Ok(Self { root })
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	fn path_for(&self, key: &str) -> PathBuf {
		let file_name: String = key
			.chars()
			.map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
			.collect();

		self.root.join(format!("{file_name}.json"))
	}
}
impl KeyValueStore for FileStore {
	fn get(&self, key: &str) -> Result<Option<String>> {
		let path = self.path_for(key);

		match fs::read_to_string(&path) {
			Ok(raw) => Ok(Some(raw)),
			Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
			Err(err) => Err(Error::Io { path, source: err }),
		}
	}

	fn set(&self, key: &str, value: &str) -> Result<()> {
		let path = self.path_for(key);
		let staging = path.with_extension("json.tmp");

		fs::write(&staging, value).map_err(|err| Error::Io { path: staging.clone(), source: err })?;
		// Readers see either the old document or the new one, never a partial write.
		fs::rename(&staging, &path).map_err(|err| Error::Io { path, source: err })
	}

	fn remove(&self, key: &str) -> Result<()> {
		let path = self.path_for(key);

		match fs::remove_file(&path) {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
			Err(err) => Err(Error::Io { path, source: err }),
		}
	}
}

/// Opens the store described by `[storage]`: a [`FileStore`] when a path is set, otherwise an
/// in-memory store that lives as long as the process.
pub fn open_store(cfg: &quill_config::Storage) -> Result<Arc<dyn KeyValueStore>> {
	match cfg.path.as_ref() {
		Some(path) => Ok(Arc::new(FileStore::open(path)?)),
		None => Ok(Arc::new(MemoryStore::new())),
	}
}

pub fn read_json<T>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>>
where
	T: DeserializeOwned,
{
	match store.get(key)? {
		Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
		None => Ok(None),
	}
}

pub fn write_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()>
where
	T: Serialize + ?Sized,
{
	let raw = serde_json::to_string(value)?;

	store.set(key, &raw)
}
