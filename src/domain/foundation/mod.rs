//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the review workflow.

mod errors;
mod ids;
mod review_stage;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode};
pub use ids::{DocumentId, Generation, ReviewSessionId};
pub use review_stage::ReviewStage;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
