//! URL handling module for Post-Harvest
//!
//! This module provides media key canonicalization, link resolution, host
//! suffix matching and the ordered media set used during extraction.

mod domain;
mod matcher;
mod media_set;
mod normalize;

// Re-export main functions
pub use domain::resolve_http_url;
pub use matcher::{matches_any_host_suffix, matches_host_suffix};
pub use media_set::MediaSet;
pub use normalize::media_key;
