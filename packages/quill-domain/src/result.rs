use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::filters::Filters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
	Document,
	Entity,
}
impl ResultKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Document => "document",
			Self::Entity => "entity",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: ResultKind,
	pub title: String,
	pub content: String,
	pub relevance_score: f32,
	#[serde(default)]
	pub highlights: Vec<String>,
	#[serde(default)]
	pub metadata: Map<String, Value>,
}

/// Body of the query RPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
	pub text: String,
	pub filters: Filters,
	pub limit: u32,
	pub offset: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
	pub query: String,
	#[serde(default)]
	pub results: Vec<SearchResult>,
	#[serde(default)]
	pub total_count: u64,
	#[serde(default)]
	pub query_time_ms: f64,
	#[serde(default)]
	pub suggestions: Vec<String>,
}
impl SearchResponse {
	/// What a failed search resolves to: no results and nothing left to page through.
	pub fn empty(query: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			results: Vec::new(),
			total_count: 0,
			query_time_ms: 0.0,
			suggestions: Vec::new(),
		}
	}

	/// Clamps scores into `[0, 1]`, orders the page by non-increasing score (ties keep backend
	/// order), and lifts `total_count` to at least the page length.
	pub fn normalized(mut self) -> Self {
		for result in &mut self.results {
			result.relevance_score = clamp_score(result.relevance_score);
		}

		self.results.sort_by(|a, b| {
			b.relevance_score.partial_cmp(&a.relevance_score).unwrap_or(Ordering::Equal)
		});

		self.total_count = self.total_count.max(self.results.len() as u64);

		self
	}
}

pub fn clamp_score(score: f32) -> f32 {
	if score.is_nan() {
		return 0.0;
	}

	score.clamp(0.0, 1.0)
}
