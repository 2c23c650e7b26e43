use serde_json::{Map, Value};

use crate::block::{Block, BlockContent, BlockId, Style};
use crate::error::EditorError;

use super::state::{DocumentDetails, EditorState, PreviewMode};

/// Every action the editor understands.
///
/// Dispatch with [`update`], or [`reduce`] to also receive the error an
/// action was rejected with.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Structure
    /// Insert a new block at `index` (clamped), or append
    AddComponent {
        content: BlockContent,
        index: Option<usize>,
    },
    /// Remove a block
    DeleteComponent(BlockId),
    /// Reassign document order; must be a permutation of the current ids
    ReorderComponents(Vec<BlockId>),
    /// Move one block to a new index
    MoveComponent { id: BlockId, to: usize },
    /// Insert a copy right after the source
    DuplicateComponent(BlockId),

    // Content
    /// Shallow-merge fields into a block's content
    UpdateComponentContent {
        id: BlockId,
        patch: Map<String, Value>,
    },
    /// Merge set fields into a block's style
    UpdateComponentStyle { id: BlockId, patch: Style },
    LockComponent(BlockId, bool),
    HideComponent(BlockId, bool),

    // Selection and clipboard
    SelectComponent(Option<BlockId>),
    CopyComponent(BlockId),
    /// Insert the clipboard block at `index` (clamped), or append
    PasteComponent { index: Option<usize> },

    // History
    Undo,
    Redo,
    ClearHistory,

    // Document
    SetDirty(bool),
    /// Overwrite the non-empty fields of the document details
    SetFileDetails(DocumentDetails),
    /// Replace the document wholesale; leaves it clean with empty history
    LoadDocument {
        blocks: Vec<Block>,
        details: DocumentDetails,
    },
    NewDocument,
    SetPreviewMode(PreviewMode),
}

impl Message {
    /// Wire tag used by scripted actions and in logs.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::AddComponent { .. } => "ADD_COMPONENT",
            Self::DeleteComponent(_) => "DELETE_COMPONENT",
            Self::ReorderComponents(_) => "REORDER_COMPONENTS",
            Self::MoveComponent { .. } => "MOVE_COMPONENT",
            Self::DuplicateComponent(_) => "DUPLICATE_COMPONENT",
            Self::UpdateComponentContent { .. } => "UPDATE_COMPONENT_CONTENT",
            Self::UpdateComponentStyle { .. } => "UPDATE_COMPONENT_STYLE",
            Self::LockComponent(..) => "LOCK_COMPONENT",
            Self::HideComponent(..) => "HIDE_COMPONENT",
            Self::SelectComponent(_) => "SELECT_COMPONENT",
            Self::CopyComponent(_) => "COPY_COMPONENT",
            Self::PasteComponent { .. } => "PASTE_COMPONENT",
            Self::Undo => "UNDO",
            Self::Redo => "REDO",
            Self::ClearHistory => "CLEAR_HISTORY",
            Self::SetDirty(_) => "SET_DIRTY",
            Self::SetFileDetails(_) => "SET_FILE_DETAILS",
            Self::LoadDocument { .. } => "LOAD_COMPONENTS",
            Self::NewDocument => "NEW_DOCUMENT",
            Self::SetPreviewMode(_) => "SET_PREVIEW_MODE",
        }
    }
}

/// Apply `msg` and log the rejection, if any.
///
/// The returned state is always usable: a rejected action leaves the
/// document exactly as it was.
pub fn update(state: EditorState, msg: Message) -> EditorState {
    let (state, error) = reduce(state, msg);
    if let Some(error) = &error {
        log_rejection(error);
    }
    state
}

pub(crate) fn log_rejection(error: &EditorError) {
    if error.is_programming_error() {
        tracing::error!(%error, "editor action not handled");
    } else {
        tracing::warn!(%error, "editor action ignored");
    }
}

/// Apply `msg`, returning the new state and the error the action was
/// rejected with. A rejected action leaves the state unchanged.
pub fn reduce(mut state: EditorState, msg: Message) -> (EditorState, Option<EditorError>) {
    tracing::debug!(action = msg.tag(), blocks = state.len(), "reduce");
    let result = apply(&mut state, msg);
    (state, result.err())
}

fn apply(state: &mut EditorState, msg: Message) -> Result<(), EditorError> {
    match msg {
        Message::AddComponent { content, index } => {
            state.checkpoint();
            let id = state.new_block(content, index);
            state.selected = Some(id);
            state.dirty = true;
        }
        Message::DeleteComponent(id) => {
            let position = state.position(id).ok_or(EditorError::UnknownBlock(id))?;
            state.checkpoint();
            state.components.remove(position);
            state.renumber();
            if state.selected == Some(id) {
                state.selected = None;
            }
            state.dirty = true;
        }
        Message::ReorderComponents(ids) => reorder(state, &ids)?,
        Message::MoveComponent { id, to } => {
            let from = state.position(id).ok_or(EditorError::UnknownBlock(id))?;
            let mut ids = state.ids();
            let moved = ids.remove(from);
            ids.insert(to.min(ids.len()), moved);
            reorder(state, &ids)?;
        }
        Message::DuplicateComponent(id) => {
            let position = state.position(id).ok_or(EditorError::UnknownBlock(id))?;
            let copy = state.components[position].clone();
            state.checkpoint();
            let new_id = state.insert_block(copy, Some(position + 1));
            state.selected = Some(new_id);
            state.dirty = true;
        }
        Message::UpdateComponentContent { id, patch } => {
            let position = editable(state, id)?;
            let merged = state.components[position]
                .content
                .merged(&patch)
                .map_err(|err| EditorError::InvalidContent {
                    id,
                    reason: err.to_string(),
                })?;
            state.checkpoint();
            state.components[position].content = merged;
            state.dirty = true;
        }
        Message::UpdateComponentStyle { id, patch } => {
            let position = editable(state, id)?;
            state.checkpoint();
            state.components[position].style.merge(&patch);
            state.dirty = true;
        }
        Message::LockComponent(id, locked) => {
            set_flag(state, id, locked, |block| &mut block.locked)?;
        }
        Message::HideComponent(id, hidden) => {
            set_flag(state, id, hidden, |block| &mut block.hidden)?;
        }
        Message::SelectComponent(selection) => {
            if let Some(id) = selection {
                state.position(id).ok_or(EditorError::UnknownBlock(id))?;
            }
            state.selected = selection;
        }
        Message::CopyComponent(id) => {
            let block = state.block(id).ok_or(EditorError::UnknownBlock(id))?;
            state.clipboard = Some(block.clone());
        }
        Message::PasteComponent { index } => {
            let block = state.clipboard.clone().ok_or(EditorError::EmptyClipboard)?;
            state.checkpoint();
            let id = state.insert_block(block, index);
            state.selected = Some(id);
            state.dirty = true;
        }
        Message::Undo => {
            let current = state.snapshot();
            if let Some(previous) = state.history.undo(current) {
                state.restore(previous);
            }
        }
        Message::Redo => {
            let current = state.snapshot();
            if let Some(next) = state.history.redo(current) {
                state.restore(next);
            }
        }
        Message::ClearHistory => state.history.clear(),
        Message::SetDirty(dirty) => state.dirty = dirty,
        Message::SetFileDetails(details) => {
            state.checkpoint();
            let current = &mut state.details;
            for (field, value) in [
                (&mut current.file_name, details.file_name),
                (&mut current.file_path, details.file_path),
                (&mut current.file_version, details.file_version),
            ] {
                if !value.is_empty() {
                    *field = value;
                }
            }
            state.dirty = true;
        }
        Message::LoadDocument { blocks, details } => state.load(blocks, details),
        Message::NewDocument => state.load(Vec::new(), DocumentDetails::default()),
        Message::SetPreviewMode(mode) => state.preview_mode = mode,
    }
    Ok(())
}

/// Position of `id` if its content and style may change.
fn editable(state: &EditorState, id: BlockId) -> Result<usize, EditorError> {
    let position = state.position(id).ok_or(EditorError::UnknownBlock(id))?;
    if state.components[position].locked {
        return Err(EditorError::BlockLocked(id));
    }
    Ok(position)
}

fn set_flag(
    state: &mut EditorState,
    id: BlockId,
    value: bool,
    flag: impl Fn(&mut Block) -> &mut bool,
) -> Result<(), EditorError> {
    let position = state.position(id).ok_or(EditorError::UnknownBlock(id))?;
    if *flag(&mut state.components[position]) == value {
        return Ok(());
    }
    state.checkpoint();
    *flag(&mut state.components[position]) = value;
    state.dirty = true;
    Ok(())
}

/// Rearrange blocks to follow `ids` exactly.
///
/// Anything but a permutation of the current ids is rejected, since
/// dropping or duplicating a block would lose data.
fn reorder(state: &mut EditorState, ids: &[BlockId]) -> Result<(), EditorError> {
    if ids.len() != state.len() {
        return Err(EditorError::InvalidReorder {
            reason: format!("expected {} ids, got {}", state.len(), ids.len()),
        });
    }
    let mut remaining: Vec<Option<Block>> = state.components.iter().cloned().map(Some).collect();
    let mut reordered = Vec::with_capacity(ids.len());
    for id in ids {
        let slot = state
            .position(*id)
            .ok_or_else(|| EditorError::InvalidReorder {
                reason: format!("{id} is not in the document"),
            })?;
        let block = remaining[slot].take().ok_or_else(|| EditorError::InvalidReorder {
            reason: format!("{id} appears more than once"),
        })?;
        reordered.push(block);
    }
    if reordered.iter().map(|block| block.id).eq(state.components.iter().map(|block| block.id)) {
        return Ok(());
    }
    state.checkpoint();
    state.components = reordered;
    state.renumber();
    state.dirty = true;
    Ok(())
}
