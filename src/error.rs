//! Error taxonomy for the editor core.
//!
//! Model-level errors are recovered inside the reducer and reported next to
//! the new state; they never cross the dispatch boundary as a failure. Only
//! [`EditorError::PublishFailed`] is expected to reach the caller that
//! started a publish.

use thiserror::Error;

use crate::block::BlockId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// The factory was asked for a block kind outside the enumeration.
    #[error("unknown block type `{0}`")]
    UnknownBlockType(String),

    /// A reorder payload was not a permutation of the current block ids.
    #[error("reorder rejected: {reason}")]
    InvalidReorder { reason: String },

    /// A content or style mutation targeted a locked block.
    #[error("block {0} is locked")]
    BlockLocked(BlockId),

    /// Content did not fit the shape of the block's kind.
    #[error("invalid content for block {id}: {reason}")]
    InvalidContent { id: BlockId, reason: String },

    /// An action referenced a block id that does not exist.
    #[error("no block with id {0}")]
    UnknownBlock(BlockId),

    /// A scripted action named no block and nothing was selected.
    #[error("{0} needs an id or a selected block")]
    NoTarget(String),

    /// Paste with nothing on the clipboard.
    #[error("clipboard is empty")]
    EmptyClipboard,

    /// An action tag the reducer does not recognize.
    #[error("unhandled action `{0}`")]
    UnhandledAction(String),

    /// The publish adapter reported a failure.
    #[error("publish failed: {0}")]
    PublishFailed(String),
}

impl EditorError {
    /// Programming errors are logged loudly; everything else is a warning.
    pub const fn is_programming_error(&self) -> bool {
        matches!(self, Self::UnhandledAction(_))
    }
}
