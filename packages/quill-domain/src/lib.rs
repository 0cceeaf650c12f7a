pub mod filters;
pub mod highlight;
pub mod navigation;
pub mod query;
pub mod result;
pub mod time_serde;

pub use filters::{DateRange, FilterRejection, Filters};
pub use highlight::{HighlightMarker, HighlightNavigator, Match, ScrollRequest};
pub use navigation::{NavigationContext, SearchRouteParams};
pub use query::QueryRejection;
pub use result::{ResultKind, SearchRequest, SearchResponse, SearchResult};
