mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Backend, Config, Highlight, History, Service, Session, Storage, Suggestions};

use std::{fs, path::Path};

pub const MAX_PAGE_SIZE: u32 = 100;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

/// Same pipeline as [`load`] for configuration that is already in memory.
pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw).map_err(|err| Error::ParseInline { source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.session.page_size == 0 {
		return Err(Error::Validation {
			message: "session.page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.session.page_size > MAX_PAGE_SIZE {
		return Err(Error::Validation {
			message: format!("session.page_size must be {MAX_PAGE_SIZE} or less."),
		});
	}
	if cfg.session.max_query_chars == 0 {
		return Err(Error::Validation {
			message: "session.max_query_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.suggestions.debounce_ms == 0 {
		return Err(Error::Validation {
			message: "suggestions.debounce_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.history.max_entries == 0 {
		return Err(Error::Validation {
			message: "history.max_entries must be greater than zero.".to_string(),
		});
	}
	if cfg.highlight.emphasis_ms == 0 {
		return Err(Error::Validation {
			message: "highlight.emphasis_ms must be greater than zero.".to_string(),
		});
	}

	for (label, marker) in [
		("highlight.marker_open", &cfg.highlight.marker_open),
		("highlight.marker_close", &cfg.highlight.marker_close),
	] {
		if marker.is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if !cfg.backend.api_base.is_empty()
		&& !(cfg.backend.api_base.starts_with("http://")
			|| cfg.backend.api_base.starts_with("https://"))
	{
		return Err(Error::Validation {
			message: "backend.api_base must start with http:// or https://.".to_string(),
		});
	}

	for (label, path) in [
		("backend.search_path", &cfg.backend.search_path),
		("backend.suggestions_path", &cfg.backend.suggestions_path),
	] {
		if !path.starts_with('/') {
			return Err(Error::Validation { message: format!("{label} must start with '/'.") });
		}
	}

	if cfg.backend.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "backend.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (name, value) in &cfg.backend.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("backend.default_headers.{name} must be a string."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.backend.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.backend.api_key = None;
	}

	cfg.backend.api_base = cfg.backend.api_base.trim().trim_end_matches('/').to_string();

	if cfg.storage.path.as_ref().map(|path| path.as_os_str().is_empty()).unwrap_or(false) {
		cfg.storage.path = None;
	}
}
