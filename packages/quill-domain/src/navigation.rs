use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::{filters::Filters, result::SearchResult};

pub const CONTEXT_PARAM: &str = "context";
pub const CONTEXT_SEARCH: &str = "search";
pub const SEARCH_ID_PARAM: &str = "searchId";
pub const HIGHLIGHT_PARAM: &str = "highlight";

/// Snapshot of the result list taken when a result is opened, so the list can be restored
/// when the user comes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationContext {
	/// Opaque id written into the destination route as `searchId`.
	pub search_id: String,
	pub query: String,
	#[serde(default)]
	pub filters: Filters,
	pub results: Vec<SearchResult>,
	pub total_count: u64,
	pub scroll_position: f64,
	#[serde(default)]
	pub highlight_terms: Option<Vec<String>>,
}

/// Route parameters marking a view as opened from the result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRouteParams {
	pub search_id: String,
	pub highlight_terms: Vec<String>,
}

/// Appends `context=search`, `searchId` and (when there are terms) `highlight` to `route`,
/// keeping its existing query string and fragment.
pub fn append_search_params(route: &str, params: &SearchRouteParams) -> String {
	let (without_fragment, fragment) = match route.split_once('#') {
		Some((head, fragment)) => (head, Some(fragment)),
		None => (route, None),
	};
	let (path, existing_query) = match without_fragment.split_once('?') {
		Some((path, query)) => (path, query),
		None => (without_fragment, ""),
	};
	let mut serializer = form_urlencoded::Serializer::new(existing_query.to_string());

	serializer.append_pair(CONTEXT_PARAM, CONTEXT_SEARCH);
	serializer.append_pair(SEARCH_ID_PARAM, &params.search_id);

	let terms = sanitize_terms(&params.highlight_terms);

	if !terms.is_empty() {
		serializer.append_pair(HIGHLIGHT_PARAM, &terms.join(","));
	}

	let mut out = format!("{path}?{}", serializer.finish());

	if let Some(fragment) = fragment {
		out.push('#');
		out.push_str(fragment);
	}

	out
}

/// Reads search-origin parameters from a route or bare query string.
///
/// Returns `None` for cold navigation: no `context=search` marker or no `searchId`.
pub fn parse_search_params(route_or_query: &str) -> Option<SearchRouteParams> {
	let without_fragment = route_or_query.split('#').next().unwrap_or_default();
	let query = match without_fragment.split_once('?') {
		Some((_, query)) => query,
		None => without_fragment,
	};
	let mut from_search = false;
	let mut search_id = None;
	let mut highlight_terms = Vec::new();

	for (key, value) in form_urlencoded::parse(query.as_bytes()) {
		match key.as_ref() {
			CONTEXT_PARAM => from_search = value == CONTEXT_SEARCH,
			SEARCH_ID_PARAM if !value.trim().is_empty() => search_id = Some(value.into_owned()),
			HIGHLIGHT_PARAM => {
				highlight_terms = value
					.split(',')
					.map(str::trim)
					.filter(|term| !term.is_empty())
					.map(str::to_string)
					.collect();
			},
			_ => {},
		}
	}

	if !from_search {
		return None;
	}

	search_id.map(|search_id| SearchRouteParams { search_id, highlight_terms })
}

// Commas delimit terms on the wire, so they cannot appear inside one.
fn sanitize_terms(terms: &[String]) -> Vec<&str> {
	terms
		.iter()
		.flat_map(|term| term.split(','))
		.map(str::trim)
		.filter(|term| !term.is_empty())
		.collect()
}
