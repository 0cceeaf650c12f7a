pub mod search;
pub mod suggestions;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

use quill_domain::{SearchRequest, SearchResponse};

/// Query and suggestion RPCs against one configured backend.
#[derive(Debug, Clone)]
pub struct SearchClient {
	http: Client,
	cfg: quill_config::Backend,
}
impl SearchClient {
	pub fn new(cfg: &quill_config::Backend) -> Result<Self> {
		Ok(Self { http: build_client(cfg)?, cfg: cfg.clone() })
	}

	pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
		search::search(&self.http, &self.cfg, request).await
	}

	pub async fn suggestions(&self, partial_text: &str) -> Result<Vec<String>> {
		suggestions::suggestions(&self.http, &self.cfg, partial_text).await
	}
}

pub fn auth_headers(
	api_key: Option<&str>,
	default_headers: &Map<String, Value>,
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(api_key) = api_key {
		headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
	}

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

/// Builds the HTTP client shared by every call against one backend.
pub fn build_client(cfg: &quill_config::Backend) -> Result<Client> {
	if cfg.api_base.is_empty() {
		return Err(Error::InvalidConfig {
			message: "backend.api_base must be set to reach the search backend.".to_string(),
		});
	}

	let client = Client::builder()
		.timeout(Duration::from_millis(cfg.timeout_ms))
		.default_headers(auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.build()?;

	Ok(client)
}

pub(crate) fn endpoint(cfg: &quill_config::Backend, path: &str) -> String {
	format!("{}{}", cfg.api_base, path)
}
