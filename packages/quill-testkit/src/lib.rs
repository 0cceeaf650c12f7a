mod backend;
mod error;
mod store;

pub use backend::ScriptedBackend;
pub use error::{Error, Result};
pub use store::{FailingStore, FlakyStore};

use std::{
	env, fs,
	path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use quill_domain::{ResultKind, SearchResult};
use quill_storage::FileStore;

/// Scratch directory for a [`FileStore`], removed on drop.
pub struct TestStoreDir {
	path: PathBuf,
	cleaned: bool,
}
impl TestStoreDir {
	pub fn new() -> Result<Self> {
		let path = env::temp_dir().join(format!("quill_test_{}", Uuid::new_v4().simple()));

		fs::create_dir_all(&path).map_err(|err| {
			Error::Message(format!("Failed to create test store directory {path:?}: {err}."))
		})?;

		Ok(Self { path, cleaned: false })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Opens a fresh [`FileStore`] handle over the directory. Handles share files.
	pub fn open(&self) -> Result<FileStore> {
		Ok(FileStore::open(&self.path)?)
	}

	pub fn cleanup(mut self) -> Result<()> {
		self.cleanup_inner()
	}

	fn cleanup_inner(&mut self) -> Result<()> {
		if self.cleaned {
			return Ok(());
		}

		fs::remove_dir_all(&self.path).map_err(|err| {
			Error::Message(format!("Failed to remove test store directory {:?}: {err}.", self.path))
		})?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestStoreDir {
	fn drop(&mut self) {
		if let Err(err) = self.cleanup_inner() {
			eprintln!("Test store cleanup failed: {err}");
		}
	}
}

/// `n` results with ids `{prefix}-{i}` and strictly descending scores; every third one is an
/// entity.
pub fn corpus(prefix: &str, n: usize) -> Vec<SearchResult> {
	(0..n)
		.map(|i| {
			let mut metadata = Map::new();

			metadata.insert("rank".to_string(), Value::from(i as u64));

			SearchResult {
				id: format!("{prefix}-{i}"),
				kind: if i % 3 == 2 { ResultKind::Entity } else { ResultKind::Document },
				title: format!("{prefix} result {i}"),
				content: format!("Notes about {prefix} number {i}."),
				relevance_score: 1.0 - (i as f32 + 1.0) / (n as f32 + 1.0),
				highlights: Vec::new(),
				metadata,
			}
		})
		.collect()
}

/// Installs a test-writer subscriber filtered by `RUST_LOG` (default `warn`). Safe to call
/// from every test.
pub fn init_tracing() -> bool {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

	tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init().is_ok()
}
