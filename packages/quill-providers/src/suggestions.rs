use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

pub async fn suggestions(
	client: &Client,
	cfg: &quill_config::Backend,
	partial_text: &str,
) -> Result<Vec<String>> {
	let body = serde_json::json!({ "partial_text": partial_text });
	let res = client.post(crate::endpoint(cfg, &cfg.suggestions_path)).json(&body).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_suggestions_response(json)
}

pub(crate) fn parse_suggestions_response(json: Value) -> Result<Vec<String>> {
	let items = json
		.get("suggestions")
		.and_then(Value::as_array)
		.or_else(|| json.as_array())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Suggestion response is missing suggestions array.".to_string(),
		})?;

	Ok(items.iter().filter_map(Value::as_str).map(str::to_string).collect())
}
