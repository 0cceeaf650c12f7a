//! Term highlighting for content opened from a search result.
//!
//! Matching is pure text analysis over byte offsets; [`render`] is the thin adapter that turns
//! spans into markup, and [`HighlightNavigator`] keeps the next/previous cursor a viewer needs.

use std::time::{Duration, Instant};

use regex::RegexBuilder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
	/// Byte offset of the first matched byte.
	pub start: usize,
	/// Byte offset one past the last matched byte.
	pub end: usize,
	pub term: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMarker {
	pub open: String,
	pub close: String,
}
impl HighlightMarker {
	pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
		Self { open: open.into(), close: close.into() }
	}
}
impl Default for HighlightMarker {
	fn default() -> Self {
		Self::new("<mark>", "</mark>")
	}
}

/// Host instruction produced by navigation: bring this span into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
	pub index: usize,
	pub start: usize,
	pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Emphasis {
	index: usize,
	until: Instant,
}

/// Finds every case-insensitive occurrence of each term.
///
/// Matches of one term never overlap each other; matches of different terms may. The result is
/// ordered by start offset, then end offset, then the order the terms were given in. Blank
/// terms and case-insensitive duplicates are ignored.
pub fn find_matches<T>(content: &str, terms: &[T]) -> Vec<Match>
where
	T: AsRef<str>,
{
	let mut found: Vec<(usize, Match)> = Vec::new();

	for (term_index, term) in unique_terms(terms).into_iter().enumerate() {
		let Ok(pattern) = RegexBuilder::new(&regex::escape(&term)).case_insensitive(true).build()
		else {
			continue;
		};

		for hit in pattern.find_iter(content) {
			found.push((
				term_index,
				Match { start: hit.start(), end: hit.end(), term: term.clone() },
			));
		}
	}

	found.sort_by_key(|(term_index, hit)| (hit.start, hit.end, *term_index));

	found.into_iter().map(|(_, hit)| hit).collect()
}

/// Wraps every match in `marker`. Overlapping spans are merged into one marked region; text
/// outside matches is copied through unchanged.
pub fn render<T>(content: &str, terms: &[T], marker: &HighlightMarker) -> String
where
	T: AsRef<str>,
{
	let spans = merge_spans(&find_matches(content, terms));
	let mut out = String::with_capacity(
		content.len() + spans.len() * (marker.open.len() + marker.close.len()),
	);
	let mut cursor = 0;

	for (start, end) in spans {
		out.push_str(&content[cursor..start]);
		out.push_str(&marker.open);
		out.push_str(&content[start..end]);
		out.push_str(&marker.close);

		cursor = end;
	}

	out.push_str(&content[cursor..]);

	out
}

fn unique_terms<T>(terms: &[T]) -> Vec<String>
where
	T: AsRef<str>,
{
	let mut unique: Vec<String> = Vec::new();

	for term in terms {
		let term = term.as_ref().trim();

		if term.is_empty() || unique.iter().any(|seen| seen.to_lowercase() == term.to_lowercase())
		{
			continue;
		}

		unique.push(term.to_string());
	}

	unique
}

// Input must be ordered by start offset, which `find_matches` guarantees.
fn merge_spans(matches: &[Match]) -> Vec<(usize, usize)> {
	let mut spans: Vec<(usize, usize)> = Vec::with_capacity(matches.len());

	for hit in matches {
		match spans.last_mut() {
			Some((_, end)) if hit.start < *end => *end = (*end).max(hit.end),
			_ => spans.push((hit.start, hit.end)),
		}
	}

	spans
}

/// Cursor over the matches of the terms currently highlighted in one piece of content.
#[derive(Debug, Clone)]
pub struct HighlightNavigator {
	terms: Vec<String>,
	matches: Vec<Match>,
	current_index: usize,
	emphasis_duration: Duration,
	emphasis: Option<Emphasis>,
}
impl HighlightNavigator {
	pub fn new(emphasis_duration: Duration) -> Self {
		Self {
			terms: Vec::new(),
			matches: Vec::new(),
			current_index: 0,
			emphasis_duration,
			emphasis: None,
		}
	}

	/// Highlights `terms` in `content` and focuses the first match, if any.
	pub fn apply<T>(&mut self, content: &str, terms: &[T], now: Instant) -> Option<ScrollRequest>
	where
		T: AsRef<str>,
	{
		self.terms = unique_terms(terms);
		self.matches = find_matches(content, &self.terms);
		self.current_index = 0;
		self.emphasis = None;

		self.focus(now)
	}

	pub fn next(&mut self, now: Instant) -> Option<ScrollRequest> {
		if self.matches.is_empty() {
			return None;
		}

		self.current_index = (self.current_index + 1) % self.matches.len();

		self.focus(now)
	}

	pub fn prev(&mut self, now: Instant) -> Option<ScrollRequest> {
		if self.matches.is_empty() {
			return None;
		}

		self.current_index = match self.current_index {
			0 => self.matches.len() - 1,
			index => index - 1,
		};

		self.focus(now)
	}

	pub fn clear(&mut self) {
		self.terms.clear();
		self.matches.clear();
		self.current_index = 0;
		self.emphasis = None;
	}

	pub fn show_controls(&self) -> bool {
		!self.terms.is_empty() && !self.matches.is_empty()
	}

	pub fn current_index(&self) -> usize {
		self.current_index
	}

	pub fn total_matches(&self) -> usize {
		self.matches.len()
	}

	pub fn current(&self) -> Option<&Match> {
		self.matches.get(self.current_index)
	}

	pub fn matches(&self) -> &[Match] {
		&self.matches
	}

	pub fn terms(&self) -> &[String] {
		&self.terms
	}

	/// Index of the match that is still visually emphasized at `now`.
	pub fn emphasized(&self, now: Instant) -> Option<usize> {
		self.emphasis.filter(|emphasis| now < emphasis.until).map(|emphasis| emphasis.index)
	}

	fn focus(&mut self, now: Instant) -> Option<ScrollRequest> {
		let hit = self.matches.get(self.current_index)?;

		self.emphasis =
			Some(Emphasis { index: self.current_index, until: now + self.emphasis_duration });

		Some(ScrollRequest { index: self.current_index, start: hit.start, end: hit.end })
	}
}
