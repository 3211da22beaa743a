//! Stage graph trait.

use super::{DomainError, ErrorCode};

/// A stage enum with a declared set of legal moves.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Stages reachable in one step from `self`.
    fn valid_transitions(&self) -> Vec<Self>;

    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Returns `target` if the move is legal.
    ///
    /// # Errors
    ///
    /// `InvalidStateTransition` when `target` is not reachable from `self`.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            return Ok(target);
        }
        Err(DomainError::new(
            ErrorCode::InvalidStateTransition,
            format!("Cannot move from {:?} to {:?}", self, target),
        ))
    }
}
