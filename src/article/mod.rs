//! Article data model
//!
//! The lifecycle of one article through a run:
//!
//! - `ArticleReference`: a URL plus weak seed metadata, produced by listing
//!   discovery or the paginated source
//! - `ExtractedRecord`: what the field resolver found on the visited page
//! - `OutputRow`: the record merged over the seed, one per reference

mod record;
mod reference;

pub use record::{ExtractedRecord, OutputRow};
pub use reference::{ArticleReference, Seed};
