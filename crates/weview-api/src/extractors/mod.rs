//! Axum extractors for request handling
//!
//! Custom extractors for validated bodies and queries and username paths.

mod path;
mod validated;

pub use path::{ApiPath, UserPairPath, UserPath};
pub use validated::{ValidatedJson, ValidatedQuery};
