pub mod history;
pub mod kv;
pub mod models;
pub mod saved;
pub mod starred;

mod error;
mod list;

pub use error::Error;
pub use history::HistoryStore;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use models::SavedSearch;
pub use saved::SavedSearchStore;
pub use starred::StarredResults;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub const SEARCH_HISTORY_KEY: &str = "search_history";
pub const SAVED_SEARCHES_KEY: &str = "saved_searches";
pub const SAVED_RESULTS_KEY: &str = "saved_results";
pub const NAVIGATION_CONTEXT_KEY_PREFIX: &str = "navigation_context";

/// Slot key holding the navigation context of one search session.
pub fn navigation_context_key(session_id: &str) -> String {
	format!("{NAVIGATION_CONTEXT_KEY_PREFIX}:{session_id}")
}
