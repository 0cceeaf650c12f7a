use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub session: Session,
	pub suggestions: Suggestions,
	pub history: History,
	pub highlight: Highlight,
	pub backend: Backend,
	pub storage: Storage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Service {
	/// `tracing_subscriber::EnvFilter` directive, e.g. "info" or "quill_service=debug".
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { log_level: "info".to_string() }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Session {
	/// Results requested per page, both for the first page and for every `load_more`.
	pub page_size: u32,
	/// Upper bound on query length, counted in characters.
	pub max_query_chars: u32,
}
impl Default for Session {
	fn default() -> Self {
		Self { page_size: 20, max_query_chars: 500 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Suggestions {
	pub debounce_ms: u64,
	/// Text must be strictly longer than this before a suggestion request is issued.
	pub min_chars: u32,
}
impl Default for Suggestions {
	fn default() -> Self {
		Self { debounce_ms: 500, min_chars: 2 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct History {
	pub max_entries: u32,
}
impl Default for History {
	fn default() -> Self {
		Self { max_entries: 10 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Highlight {
	pub emphasis_ms: u64,
	pub marker_open: String,
	pub marker_close: String,
}
impl Default for Highlight {
	fn default() -> Self {
		Self {
			emphasis_ms: 1_500,
			marker_open: "<mark>".to_string(),
			marker_close: "</mark>".to_string(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Backend {
	#[serde(default)]
	pub api_base: String,
	#[serde(default = "default_search_path")]
	pub search_path: String,
	#[serde(default = "default_suggestions_path")]
	pub suggestions_path: String,
	pub api_key: Option<String>,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}
impl Default for Backend {
	fn default() -> Self {
		Self {
			api_base: String::new(),
			search_path: default_search_path(),
			suggestions_path: default_suggestions_path(),
			api_key: None,
			timeout_ms: default_timeout_ms(),
			default_headers: Map::new(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Storage {
	/// Directory for the file-backed key-value store. Unset keeps everything in memory.
	pub path: Option<PathBuf>,
}

fn default_search_path() -> String {
	"/search".to_string()
}

fn default_suggestions_path() -> String {
	"/search/suggestions".to_string()
}

fn default_timeout_ms() -> u64 {
	10_000
}
