use thiserror::Error;

use super::state::Status;

/// Failures of the game core.
///
/// Collisions are not errors; they end a game through the normal state
/// machine and show up as a [`GameSummary`](super::state::GameSummary).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Every cell of the grid is taken, so food cannot be placed
    #[error("no free cell left on the {width}x{height} grid")]
    NoSpaceAvailable { width: i32, height: i32 },

    /// A lifecycle call that does not apply to the current status
    #[error("cannot {action} while {from:?}")]
    InvalidTransition { from: Status, action: &'static str },
}
