//! Article discovery
//!
//! Two ways of finding articles to visit:
//! - `listing`: the links of a single blog listing page, with weak seed data
//! - `pagination`: the full corpus from the JSON post collection endpoint

mod listing;
mod pagination;

pub use listing::{discover, ListingRules};
pub use pagination::{parse_timestamp, PaginatedSource};
