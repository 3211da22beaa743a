//! Review state machine.
//!
//! [`ReviewState::apply`] is a pure function from `(state, event)` to
//! `(state, outcome)`. It performs no I/O; the session aggregate feeds it
//! events and the application layer acts on the outcomes.

use crate::domain::foundation::{DocumentId, Generation, ReviewStage};

use super::{
    export, EditableArtifact, ExportedArtifact, ExtractionResult, FailureCategory, ReviewError,
};

/// Notice shown for any extraction failure. Details go to the log only.
pub const EXTRACTION_FAILED_NOTICE: &str =
    "Error extracting data. Is the extraction service running?";

/// Workflow state.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewState {
    /// Nothing in flight. `notice` holds the last extraction failure, if any,
    /// and `failed` the generation it belonged to.
    Idle {
        notice: Option<String>,
        failed: Option<Generation>,
    },

    /// Waiting for the extraction of `document_id`.
    Extracting {
        generation: Generation,
        document_id: DocumentId,
    },

    /// The user is reviewing the bundle extracted from `document_id`.
    Reviewing {
        generation: Generation,
        document_id: DocumentId,
        artifact: EditableArtifact,
    },
}

impl Default for ReviewState {
    fn default() -> Self {
        ReviewState::Idle {
            notice: None,
            failed: None,
        }
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewEvent {
    /// A document was uploaded and assigned `generation`.
    Upload {
        document_id: DocumentId,
        generation: Generation,
    },
    /// Extraction for `generation` produced a bundle.
    ExtractionSucceeded {
        generation: Generation,
        result: ExtractionResult,
    },
    /// Extraction for `generation` failed.
    ExtractionFailed {
        generation: Generation,
        category: FailureCategory,
    },
    /// The user replaced the artifact text.
    Edit { text: String },
    /// The user asked to download the artifact.
    Export,
}

/// What an event did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A new extraction cycle started. `discarded_artifact` is true when an
    /// artifact under review was thrown away.
    ExtractionStarted {
        generation: Generation,
        discarded_artifact: bool,
    },
    /// A fresh artifact was seeded from the extracted bundle.
    Seeded { generation: Generation },
    /// Extraction failed; the state returned to Idle.
    ExtractionFailed {
        category: FailureCategory,
        notice: String,
    },
    /// The artifact text changed; `valid` is the recomputed flag.
    Edited { valid: bool },
    /// Export approved; the state is unchanged.
    ExportReady(ExportedArtifact),
    /// An extraction outcome for a superseded generation was ignored.
    Stale { generation: Generation },
    /// A second outcome for a generation that already completed was ignored.
    Duplicate { generation: Generation },
    /// The event was refused; the state is unchanged.
    Rejected(ReviewError),
}

/// New state plus outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ReviewState,
    pub outcome: Outcome,
}

impl Transition {
    fn new(state: ReviewState, outcome: Outcome) -> Self {
        Self { state, outcome }
    }
}

impl ReviewState {
    pub fn stage(&self) -> ReviewStage {
        match self {
            ReviewState::Idle { .. } => ReviewStage::Idle,
            ReviewState::Extracting { .. } => ReviewStage::Extracting,
            ReviewState::Reviewing { .. } => ReviewStage::Reviewing,
        }
    }

    /// Artifact under review, if any.
    pub fn artifact(&self) -> Option<&EditableArtifact> {
        match self {
            ReviewState::Reviewing { artifact, .. } => Some(artifact),
            _ => None,
        }
    }

    /// Generation currently extracting or under review.
    pub fn generation(&self) -> Option<Generation> {
        match self {
            ReviewState::Idle { .. } => None,
            ReviewState::Extracting { generation, .. }
            | ReviewState::Reviewing { generation, .. } => Some(*generation),
        }
    }

    /// Failure notice left by the last extraction, if any.
    pub fn notice(&self) -> Option<&str> {
        match self {
            ReviewState::Idle { notice, .. } => notice.as_deref(),
            _ => None,
        }
    }

    /// Applies one event.
    pub fn apply(self, event: ReviewEvent) -> Transition {
        match event {
            ReviewEvent::Upload {
                document_id,
                generation,
            } => {
                let discarded_artifact = matches!(self, ReviewState::Reviewing { .. });
                Transition::new(
                    ReviewState::Extracting {
                        generation,
                        document_id,
                    },
                    Outcome::ExtractionStarted {
                        generation,
                        discarded_artifact,
                    },
                )
            }

            ReviewEvent::ExtractionSucceeded { generation, result } => {
                self.on_extraction_succeeded(generation, result)
            }

            ReviewEvent::ExtractionFailed {
                generation,
                category,
            } => self.on_extraction_failed(generation, category),

            ReviewEvent::Edit { text } => self.on_edit(text),

            ReviewEvent::Export => self.on_export(),
        }
    }

    fn on_extraction_succeeded(self, generation: Generation, result: ExtractionResult) -> Transition {
        match self {
            ReviewState::Extracting {
                generation: current,
                document_id,
            } if current == generation => match EditableArtifact::seed(&result) {
                Ok(artifact) => Transition::new(
                    ReviewState::Reviewing {
                        generation,
                        document_id,
                        artifact,
                    },
                    Outcome::Seeded { generation },
                ),
                Err(_) => failed(generation, FailureCategory::Decode),
            },
            other => other.ignore_completion(generation),
        }
    }

    fn on_extraction_failed(self, generation: Generation, category: FailureCategory) -> Transition {
        match self {
            ReviewState::Extracting {
                generation: current,
                ..
            } if current == generation => failed(generation, category),
            other => other.ignore_completion(generation),
        }
    }

    /// Outcome for an extraction result that arrives when no extraction of
    /// `generation` is in flight.
    fn ignore_completion(self, generation: Generation) -> Transition {
        let settled = match &self {
            ReviewState::Idle { failed, .. } => *failed,
            _ => self.generation(),
        };
        let outcome = if settled == Some(generation) {
            Outcome::Duplicate { generation }
        } else {
            Outcome::Stale { generation }
        };
        Transition::new(self, outcome)
    }

    fn on_edit(mut self, text: String) -> Transition {
        if let ReviewState::Reviewing { artifact, .. } = &mut self {
            let valid = artifact.edit(text);
            return Transition::new(self, Outcome::Edited { valid });
        }
        let stage = self.stage();
        Transition::new(
            self,
            Outcome::Rejected(ReviewError::invalid_stage(stage, "edit")),
        )
    }

    fn on_export(self) -> Transition {
        let outcome = match &self {
            ReviewState::Reviewing { artifact, .. } => match export(artifact) {
                Ok(exported) => Outcome::ExportReady(exported),
                Err(rejected) => Outcome::Rejected(rejected.into()),
            },
            _ => Outcome::Rejected(ReviewError::NoArtifact),
        };
        Transition::new(self, outcome)
    }
}

fn failed(generation: Generation, category: FailureCategory) -> Transition {
    Transition::new(
        ReviewState::Idle {
            notice: Some(EXTRACTION_FAILED_NOTICE.to_string()),
            failed: Some(generation),
        },
        Outcome::ExtractionFailed {
            category,
            notice: EXTRACTION_FAILED_NOTICE.to_string(),
        },
    )
}
