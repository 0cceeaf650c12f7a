use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
	#[serde(with = "crate::time_serde")]
	pub start: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub end: OffsetDateTime,
}

/// Narrowing criteria sent alongside a query. Empty sets mean "unfiltered".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
	#[serde(default)]
	pub entity_types: BTreeSet<String>,
	#[serde(default)]
	pub project_ids: BTreeSet<String>,
	#[serde(default)]
	pub date_range: Option<DateRange>,
}
impl Filters {
	pub fn with_entity_type(mut self, entity_type: impl Into<String>) -> Self {
		self.entity_types.insert(entity_type.into());

		self
	}

	pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
		self.project_ids.insert(project_id.into());

		self
	}

	pub fn with_date_range(mut self, start: OffsetDateTime, end: OffsetDateTime) -> Self {
		self.date_range = Some(DateRange { start, end });

		self
	}

	/// Number of active criteria, as shown on a filter badge.
	pub fn active_count(&self) -> usize {
		self.entity_types.len() + self.project_ids.len() + usize::from(self.date_range.is_some())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRejection {
	InvertedDateRange,
}
impl std::fmt::Display for FilterRejection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvertedDateRange => write!(f, "Date range start must not be after its end."),
		}
	}
}

/// Trims tags and project ids, drops blank entries, and checks the date range.
pub fn normalize_filters(filters: Filters) -> Result<Filters, FilterRejection> {
	if let Some(range) = filters.date_range
		&& range.start > range.end
	{
		return Err(FilterRejection::InvertedDateRange);
	}

	Ok(Filters {
		entity_types: normalize_set(filters.entity_types),
		project_ids: normalize_set(filters.project_ids),
		date_range: filters.date_range,
	})
}

fn normalize_set(values: BTreeSet<String>) -> BTreeSet<String> {
	values
		.into_iter()
		.map(|value| value.trim().to_string())
		.filter(|value| !value.is_empty())
		.collect()
}
