use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};
use quill_domain::{SearchRequest, SearchResponse};

pub async fn search(
	client: &Client,
	cfg: &quill_config::Backend,
	request: &SearchRequest,
) -> Result<SearchResponse> {
	let res = client.post(crate::endpoint(cfg, &cfg.search_path)).json(request).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_search_response(json, request)
}

pub(crate) fn parse_search_response(
	mut json: Value,
	request: &SearchRequest,
) -> Result<SearchResponse> {
	let object = json.as_object_mut().ok_or_else(|| Error::InvalidResponse {
		message: "Search response must be a JSON object.".to_string(),
	})?;

	if !object.get("results").map(Value::is_array).unwrap_or(false) {
		return Err(Error::InvalidResponse {
			message: "Search response is missing results array.".to_string(),
		});
	}
	if !object.contains_key("query") {
		object.insert("query".to_string(), Value::String(request.text.clone()));
	}

	let response: SearchResponse = serde_json::from_value(json)?;

	Ok(response.normalized())
}
