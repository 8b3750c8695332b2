//! Best-effort disc metadata extraction from dizzylab detail pages.
//!
//! Every field is read through an ordered list of named strategies. The
//! first strategy that yields a non-empty value wins, and a field nobody
//! can fill keeps its default. Extraction itself never fails.

pub mod error;
pub mod extractor;
mod selectors;

pub use error::ExtractorError;
pub use extractor::DiscExtractor;
