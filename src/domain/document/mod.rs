//! Document domain module.
//!
//! The uploaded source document and the single-slot store that keeps it
//! available for display while it is being reviewed.

mod source_document;
mod store;

pub use source_document::{SourceDocument, SOURCE_CONTENT_TYPE};
pub use store::{DocumentStore, RenderHandle};
