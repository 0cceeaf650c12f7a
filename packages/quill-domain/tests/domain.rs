use std::time::{Duration, Instant};

use serde_json::Map;
use time::macros::datetime;

use quill_domain::{
	Filters, HighlightMarker, HighlightNavigator, NavigationContext, ResultKind, SearchResult,
	SearchRouteParams, highlight, navigation, query,
};

fn result(id: &str, content: &str) -> SearchResult {
	SearchResult {
		id: id.to_string(),
		kind: ResultKind::Document,
		title: format!("Chapter {id}"),
		content: content.to_string(),
		relevance_score: 0.5,
		highlights: vec!["castle".to_string()],
		metadata: Map::new(),
	}
}

#[test]
fn validation_boundaries() {
	let at_limit = "k".repeat(500);
	let over_limit = "k".repeat(501);

	assert!(query::validate_query(&at_limit, 500).is_ok());
	assert!(query::validate_query(&over_limit, 500).is_err());
	assert!(query::validate_query("<script>", 500).is_err());
}

#[test]
fn navigation_context_survives_json() {
	let context = NavigationContext {
		search_id: "s-1".to_string(),
		query: "castle keep".to_string(),
		filters: Filters::default()
			.with_entity_type("place")
			.with_date_range(datetime!(2026-01-01 00:00 UTC), datetime!(2026-02-01 00:00 UTC)),
		results: vec![result("1", "The castle keep."), result("2", "A keep.")],
		total_count: 2,
		scroll_position: 640.0,
		highlight_terms: Some(vec!["castle".to_string(), "keep".to_string()]),
	};
	let json = serde_json::to_string(&context).expect("serialize failed");
	let parsed: NavigationContext = serde_json::from_str(&json).expect("parse failed");

	assert_eq!(parsed, context);
}

#[test]
fn route_params_drive_highlighting() {
	let content = "The castle keep stood over the castle town.";
	let route = navigation::append_search_params(
		"/documents/1",
		&SearchRouteParams {
			search_id: "s-9".to_string(),
			highlight_terms: query::highlight_terms("Castle keep"),
		},
	);
	let params = navigation::parse_search_params(&route).expect("Route must carry params.");
	let now = Instant::now();
	let mut navigator = HighlightNavigator::new(Duration::from_millis(1_500));
	let first = navigator.apply(content, &params.highlight_terms, now);

	assert_eq!(first.map(|request| request.start), Some(4));
	assert_eq!(navigator.total_matches(), 3);
	assert!(navigator.show_controls());
	assert_eq!(
		highlight::render(content, &params.highlight_terms, &HighlightMarker::new("*", "*")),
		"The *castle* *keep* stood over the *castle* town."
	);
}
