//! Review domain module.
//!
//! The human-in-the-loop workflow: an extracted bundle is seeded as
//! editable text, checked on every edit, and exported only while it is
//! well-formed.
//!
//! # Components
//!
//! - `validator` - Textual integrity check for edited text
//! - `artifact` - The editable text and its validity
//! - `state` - Pure `(state, event) -> (state, outcome)` state machine
//! - `session` - Aggregate owning the document store and state
//! - `export` - Turns an approved artifact into a downloadable file

mod artifact;
mod errors;
mod export;
mod extraction;
mod session;
mod state;
mod validator;

pub use artifact::{canonical_text, EditableArtifact, Validity};
pub use errors::ReviewError;
pub use export::{
    export, ExportRejected, ExportedArtifact, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME,
    FIX_BEFORE_EXPORT_NOTICE,
};
pub use extraction::{ExtractionResult, FailureCategory};
pub use session::{ExtractionTicket, ReviewSession};
pub use state::{Outcome, ReviewEvent, ReviewState, Transition, EXTRACTION_FAILED_NOTICE};
pub use validator::{check, ParseIssue, TextCheck};
