//! Domain layer containing the review workflow and its value types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, stages, errors)
//! - `document` - Uploaded source documents and the document store
//! - `review` - Editable artifact, validator, state machine, and export

pub mod document;
pub mod foundation;
pub mod review;
