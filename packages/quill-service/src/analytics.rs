use quill_domain::{ResultKind, SearchResult};

/// Summary shown on the analytics tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchAnalytics {
	pub total_count: u64,
	pub loaded: usize,
	pub documents: usize,
	pub entities: usize,
	/// `None` until at least one result is loaded.
	pub mean_relevance: Option<f32>,
	pub top_score: Option<f32>,
	pub query_time_ms: f64,
	/// Number of filter criteria narrowing the current search.
	pub active_filters: usize,
	pub history_len: usize,
	pub saved_count: usize,
	pub starred_count: usize,
}
impl SearchAnalytics {
	/// Fills the result-derived fields; store counts are left for the caller.
	pub fn from_results(results: &[SearchResult], total_count: u64, query_time_ms: f64) -> Self {
		let documents = results.iter().filter(|result| result.kind == ResultKind::Document).count();
		let scores = results.iter().map(|result| result.relevance_score);
		let top_score = scores.clone().reduce(f32::max);
		let mean_relevance = if results.is_empty() {
			None
		} else {
			Some(scores.sum::<f32>() / results.len() as f32)
		};

		Self {
			total_count,
			loaded: results.len(),
			documents,
			entities: results.len() - documents,
			mean_relevance,
			top_score,
			query_time_ms,
			..Self::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::Map;

	use super::*;

	fn result(id: &str, kind: ResultKind, score: f32) -> SearchResult {
		SearchResult {
			id: id.to_string(),
			kind,
			title: id.to_string(),
			content: String::new(),
			relevance_score: score,
			highlights: Vec::new(),
			metadata: Map::new(),
		}
	}

	#[test]
	fn summarizes_loaded_results() {
		let results = vec![
			result("a", ResultKind::Document, 0.9),
			result("b", ResultKind::Entity, 0.5),
			result("c", ResultKind::Document, 0.1),
		];
		let analytics = SearchAnalytics::from_results(&results, 30, 12.5);

		assert_eq!(analytics.loaded, 3);
		assert_eq!(analytics.documents, 2);
		assert_eq!(analytics.entities, 1);
		assert_eq!(analytics.top_score, Some(0.9));
		assert!((analytics.mean_relevance.expect("mean missing") - 0.5).abs() < 1e-6);
		assert_eq!(analytics.total_count, 30);
	}

	#[test]
	fn empty_results_have_no_mean() {
		let analytics = SearchAnalytics::from_results(&[], 0, 0.0);

		assert_eq!(analytics.mean_relevance, None);
		assert_eq!(analytics.top_score, None);
	}
}
