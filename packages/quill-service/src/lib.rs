pub mod analytics;
pub mod backend;
pub mod debounce;
pub mod navigation;
pub mod paginator;
pub mod session;
pub mod views;

mod error;

pub use analytics::SearchAnalytics;
pub use backend::{HttpBackend, SearchBackend};
pub use debounce::{QueryDebouncer, Suggestions};
pub use error::{Error, Result};
pub use navigation::{Arrival, NavigationBridge};
pub use paginator::ResultPaginator;
pub use session::{
	LoadMoreOutcome, NavigationTarget, ResultStatus, SearchOutcome, SearchSession, SessionSnapshot,
};
pub use views::SessionView;

use std::{future::Future, pin::Pin};

use tracing_subscriber::{EnvFilter, fmt};

use quill_config::Config;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Installs a global fmt subscriber filtered by `service.log_level`.
///
/// Returns `false` when a subscriber is already installed, which leaves the existing one alone.
pub fn init_tracing(cfg: &Config) -> bool {
	let filter =
		EnvFilter::try_new(&cfg.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	fmt().with_env_filter(filter).try_init().is_ok()
}
