//! Scripted editing: a JSON array of tagged actions replayed through the
//! reducer.
//!
//! ```json
//! [
//!   { "type": "ADD_COMPONENT", "kind": "heading", "content": { "level": 1, "text": "Title" } },
//!   { "type": "UPDATE_COMPONENT_STYLE", "style": { "color": "red" } },
//!   { "type": "SET_DIRTY", "dirty": false }
//! ]
//! ```
//!
//! Actions that target a block take an `id`; when it is omitted the current
//! selection is used, so a script can edit what it just added.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::block::{BlockId, Style, default_content_named};
use crate::error::EditorError;

use super::state::{DocumentDetails, EditorState, PreviewMode};
use super::update::{Message, log_rejection, reduce};

#[derive(Debug, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
enum Action {
    AddComponent {
        kind: String,
        variant: Option<String>,
        content: Option<Map<String, Value>>,
        index: Option<usize>,
    },
    DeleteComponent {
        id: Option<BlockId>,
    },
    ReorderComponents {
        ids: Vec<BlockId>,
    },
    MoveComponent {
        id: Option<BlockId>,
        to: usize,
    },
    DuplicateComponent {
        id: Option<BlockId>,
    },
    UpdateComponentContent {
        id: Option<BlockId>,
        content: Map<String, Value>,
    },
    UpdateComponentStyle {
        id: Option<BlockId>,
        style: Style,
    },
    LockComponent {
        id: Option<BlockId>,
        #[serde(default = "yes")]
        locked: bool,
    },
    HideComponent {
        id: Option<BlockId>,
        #[serde(default = "yes")]
        hidden: bool,
    },
    SelectComponent {
        id: Option<BlockId>,
    },
    CopyComponent {
        id: Option<BlockId>,
    },
    PasteComponent {
        index: Option<usize>,
    },
    Undo,
    Redo,
    ClearHistory,
    SetDirty {
        dirty: bool,
    },
    SetFileDetails(DocumentDetails),
    NewDocument,
    SetPreviewMode {
        mode: PreviewMode,
    },
    #[serde(other)]
    Unknown,
}

const fn yes() -> bool {
    true
}

/// Outcome of a script run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptReport {
    /// Actions that went through the reducer without being rejected.
    pub applied: usize,
    /// Rejected actions by zero-based position in the script.
    pub rejected: Vec<(usize, EditorError)>,
}

impl ScriptReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

fn target(state: &EditorState, id: Option<BlockId>, tag: &str) -> Result<BlockId, EditorError> {
    id.or(state.selected)
        .ok_or_else(|| EditorError::NoTarget(tag.to_string()))
}

fn resolve(state: &EditorState, action: Action, tag: &str) -> Result<Message, EditorError> {
    let message = match action {
        Action::AddComponent {
            kind,
            variant,
            content,
            index,
        } => {
            let mut block = default_content_named(&kind, variant.as_deref())?;
            if let Some(patch) = content {
                block = block.merged(&patch).map_err(|err| EditorError::InvalidContent {
                    id: BlockId::new(state.next_id),
                    reason: err.to_string(),
                })?;
            }
            Message::AddComponent {
                content: block,
                index,
            }
        }
        Action::DeleteComponent { id } => Message::DeleteComponent(target(state, id, tag)?),
        Action::ReorderComponents { ids } => Message::ReorderComponents(ids),
        Action::MoveComponent { id, to } => Message::MoveComponent {
            id: target(state, id, tag)?,
            to,
        },
        Action::DuplicateComponent { id } => Message::DuplicateComponent(target(state, id, tag)?),
        Action::UpdateComponentContent { id, content } => Message::UpdateComponentContent {
            id: target(state, id, tag)?,
            patch: content,
        },
        Action::UpdateComponentStyle { id, style } => Message::UpdateComponentStyle {
            id: target(state, id, tag)?,
            patch: style,
        },
        Action::LockComponent { id, locked } => {
            Message::LockComponent(target(state, id, tag)?, locked)
        }
        Action::HideComponent { id, hidden } => {
            Message::HideComponent(target(state, id, tag)?, hidden)
        }
        Action::SelectComponent { id } => Message::SelectComponent(id),
        Action::CopyComponent { id } => Message::CopyComponent(target(state, id, tag)?),
        Action::PasteComponent { index } => Message::PasteComponent { index },
        Action::Undo => Message::Undo,
        Action::Redo => Message::Redo,
        Action::ClearHistory => Message::ClearHistory,
        Action::SetDirty { dirty } => Message::SetDirty(dirty),
        Action::SetFileDetails(details) => Message::SetFileDetails(details),
        Action::NewDocument => Message::NewDocument,
        Action::SetPreviewMode { mode } => Message::SetPreviewMode(mode),
        Action::Unknown => return Err(EditorError::UnhandledAction(tag.to_string())),
    };
    Ok(message)
}

/// Parse and replay `json` against `state`.
///
/// Rejected actions are logged and skipped; the rest still apply.
///
/// # Errors
/// Returns an error if `json` is not an array of action objects, or if an
/// action of a known type has malformed fields.
pub fn run_script(mut state: EditorState, json: &str) -> Result<(EditorState, ScriptReport)> {
    let _scope = crate::perf::scope("script.run");
    let actions: Vec<Value> =
        serde_json::from_str(json).context("script must be a JSON array of actions")?;
    let mut report = ScriptReport::default();

    for (position, value) in actions.into_iter().enumerate() {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let action: Action = serde_json::from_value(value)
            .with_context(|| format!("action {position} (`{tag}`) is malformed"))?;

        let outcome = match resolve(&state, action, &tag) {
            Ok(message) => {
                let (next, error) = reduce(state, message);
                state = next;
                error
            }
            Err(error) => Some(error),
        };
        match outcome {
            Some(error) => {
                log_rejection(&error);
                crate::perf::log_event("script.rejected", &format!("{position} {error}"));
                report.rejected.push((position, error));
            }
            None => report.applied += 1,
        }
    }
    Ok((state, report))
}
