use std::collections::HashSet;

use quill_domain::{SearchResponse, SearchResult};

/// Offset cursor plus the results accumulated so far for one query.
///
/// `offset` always equals the number of results the backend has returned since the last
/// reset, including duplicates that were not shown twice.
#[derive(Debug, Clone)]
pub struct ResultPaginator {
	page_size: u32,
	offset: u64,
	total_count: u64,
	exhausted: bool,
	results: Vec<SearchResult>,
	seen: HashSet<String>,
}
impl ResultPaginator {
	pub fn new(page_size: u32) -> Self {
		Self {
			page_size: page_size.max(1),
			offset: 0,
			total_count: 0,
			exhausted: false,
			results: Vec::new(),
			seen: HashSet::new(),
		}
	}

	pub fn reset(&mut self) {
		self.offset = 0;
		self.total_count = 0;
		self.exhausted = false;
		self.results.clear();
		self.seen.clear();
	}

	/// Replaces everything with the first page of a new query.
	pub fn replace(&mut self, response: &SearchResponse) {
		self.reset();
		self.append(response);
	}

	/// Appends a following page. Returns how many results became visible.
	pub fn append(&mut self, response: &SearchResponse) -> usize {
		let before = self.results.len();

		for result in &response.results {
			if self.seen.insert(result.id.clone()) {
				self.results.push(result.clone());
			} else {
				tracing::debug!(result_id = %result.id, "Dropping duplicate result from page.");
			}
		}

		self.offset += response.results.len() as u64;
		self.total_count = response.total_count.max(self.offset);

		// An empty page cannot advance the cursor, so stop paging instead of asking again.
		if response.results.is_empty() {
			self.exhausted = true;
		}

		self.results.len() - before
	}

	/// Rebuilds the accumulated state from a snapshot taken earlier.
	pub fn restore(&mut self, results: Vec<SearchResult>, total_count: u64) {
		self.reset();
		self.seen = results.iter().map(|result| result.id.clone()).collect();
		self.offset = results.len() as u64;
		self.total_count = total_count.max(self.offset);
		self.results = results;
	}

	pub fn has_more(&self) -> bool {
		!self.exhausted && self.offset < self.total_count
	}

	pub fn page_size(&self) -> u32 {
		self.page_size
	}

	pub fn offset(&self) -> u64 {
		self.offset
	}

	pub fn total_count(&self) -> u64 {
		self.total_count
	}

	pub fn results(&self) -> &[SearchResult] {
		&self.results
	}
}

#[cfg(test)]
mod tests {
	use serde_json::Map;

	use super::*;
	use quill_domain::ResultKind;

	fn page(ids: &[&str], total_count: u64) -> SearchResponse {
		SearchResponse {
			query: "dragon".to_string(),
			results: ids
				.iter()
				.map(|id| SearchResult {
					id: id.to_string(),
					kind: ResultKind::Document,
					title: id.to_string(),
					content: String::new(),
					relevance_score: 0.5,
					highlights: Vec::new(),
					metadata: Map::new(),
				})
				.collect(),
			total_count,
			query_time_ms: 1.0,
			suggestions: Vec::new(),
		}
	}

	#[test]
	fn offset_tracks_cumulative_page_sizes() {
		let mut paginator = ResultPaginator::new(2);

		paginator.replace(&page(&["a", "b"], 5));

		assert_eq!(paginator.offset(), 2);
		assert!(paginator.has_more());

		paginator.append(&page(&["c", "d"], 5));
		paginator.append(&page(&["e"], 5));

		assert_eq!(paginator.offset(), 5);
		assert!(!paginator.has_more());
		assert_eq!(paginator.results().len(), 5);
	}

	#[test]
	fn duplicates_count_toward_offset_but_are_hidden() {
		let mut paginator = ResultPaginator::new(2);

		paginator.replace(&page(&["a", "b"], 4));

		let added = paginator.append(&page(&["b", "c"], 4));

		assert_eq!(added, 1);
		assert_eq!(paginator.offset(), 4);
		assert_eq!(paginator.results().len(), 3);
	}

	#[test]
	fn empty_page_stops_paging() {
		let mut paginator = ResultPaginator::new(2);

		paginator.replace(&page(&["a", "b"], 10));
		paginator.append(&page(&[], 10));

		assert_eq!(paginator.offset(), 2);
		assert!(!paginator.has_more());
	}

	#[test]
	fn restore_rebuilds_cursor() {
		let mut paginator = ResultPaginator::new(2);

		paginator.restore(page(&["a", "b", "c"], 9).results, 9);

		assert_eq!(paginator.offset(), 3);
		assert!(paginator.has_more());

		paginator.append(&page(&["c", "d"], 9));

		assert_eq!(paginator.results().len(), 4);
	}
}
