/// Characters that are never accepted inside a query.
pub const FORBIDDEN_CHARS: [char; 2] = ['<', '>'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRejection {
	Empty,
	TooLong { max_chars: u32, actual_chars: usize },
	ForbiddenChar(char),
}
impl std::fmt::Display for QueryRejection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Empty => write!(f, "Query must not be empty."),
			Self::TooLong { max_chars, actual_chars } => {
				write!(f, "Query is {actual_chars} characters long; the limit is {max_chars}.")
			},
			Self::ForbiddenChar(ch) => write!(f, "Query must not contain '{ch}'."),
		}
	}
}

/// Checks a raw query before anything is sent to the backend and returns the trimmed text.
pub fn validate_query(raw: &str, max_chars: u32) -> Result<String, QueryRejection> {
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return Err(QueryRejection::Empty);
	}

	let actual_chars = trimmed.chars().count();

	if actual_chars > max_chars as usize {
		return Err(QueryRejection::TooLong { max_chars, actual_chars });
	}
	if let Some(ch) = trimmed.chars().find(|ch| FORBIDDEN_CHARS.contains(ch)) {
		return Err(QueryRejection::ForbiddenChar(ch));
	}

	Ok(trimmed.to_string())
}

/// Splits a query into the terms worth highlighting in a destination view.
///
/// Surrounding quotes are stripped and duplicates are removed case-insensitively, keeping the
/// first spelling seen.
pub fn highlight_terms(query: &str) -> Vec<String> {
	let mut terms: Vec<String> = Vec::new();

	for word in query.split_whitespace() {
		let term = word.trim_matches(|ch: char| ch == '"' || ch == '\'');

		if term.is_empty() {
			continue;
		}
		if terms.iter().any(|existing| existing.to_lowercase() == term.to_lowercase()) {
			continue;
		}

		terms.push(term.to_string());
	}

	terms
}
