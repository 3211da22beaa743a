//! ReviewStage enum for the upload → extraction → review workflow.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Coarse stage of a review session.
///
/// Valid transitions:
/// - Idle -> Extracting (upload)
/// - Extracting -> Reviewing (extraction succeeded)
/// - Extracting -> Idle (extraction failed)
/// - Extracting -> Extracting (upload restarts the cycle)
/// - Reviewing -> Reviewing (edit, export)
/// - Reviewing -> Extracting (upload)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStage {
    #[default]
    Idle,
    Extracting,
    Reviewing,
}

impl StateMachine for ReviewStage {
    fn valid_transitions(&self) -> Vec<Self> {
        use ReviewStage::*;
        match self {
            Idle => vec![Extracting],
            Extracting => vec![Extracting, Reviewing, Idle],
            Reviewing => vec![Reviewing, Extracting],
        }
    }
}

impl fmt::Display for ReviewStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReviewStage::Idle => "Idle",
            ReviewStage::Extracting => "Extracting",
            ReviewStage::Reviewing => "Reviewing",
        };
        write!(f, "{}", s)
    }
}
