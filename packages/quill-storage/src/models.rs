use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use quill_domain::Filters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSearch {
	pub id: Uuid,
	pub name: String,
	pub query: String,
	#[serde(default)]
	pub filters: Filters,
	#[serde(with = "quill_domain::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(default, with = "quill_domain::time_serde::option")]
	pub last_used: Option<OffsetDateTime>,
	#[serde(default)]
	pub result_count: Option<u64>,
}
