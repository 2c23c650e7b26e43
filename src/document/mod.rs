//! Native save format: a JSON dump of the blocks plus document details.
//!
//! Markdown export loses the kind of complex blocks, so this is the format
//! that round-trips back into the editor.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::editor::{DocumentDetails, EditorState, Message, update};

/// Current save format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDocument {
    #[serde(default = "format_version")]
    pub version: u32,
    #[serde(flatten)]
    pub details: DocumentDetails,
    pub components: Vec<Block>,
}

const fn format_version() -> u32 {
    FORMAT_VERSION
}

impl SavedDocument {
    pub fn from_state(state: &EditorState) -> Self {
        Self {
            version: FORMAT_VERSION,
            details: state.details().clone(),
            components: state.blocks().to_vec(),
        }
    }

    /// Load into `state`, replacing its document and history.
    pub fn into_state(self, state: EditorState) -> EditorState {
        update(
            state,
            Message::LoadDocument {
                blocks: self.components,
                details: self.details,
            },
        )
    }

    /// # Errors
    /// Returns an error if the JSON is malformed, a block's content does
    /// not fit its kind, or the format version is newer than supported.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: Self = serde_json::from_str(json).context("invalid document JSON")?;
        if doc.version > FORMAT_VERSION {
            anyhow::bail!(
                "document format version {} is newer than supported version {FORMAT_VERSION}",
                doc.version
            );
        }
        Ok(doc)
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize document")
    }

    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read document {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("failed to load {}", path.display()))
    }

    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = self.to_json()?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Load a saved document into a fresh editor state.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn open(path: &Path, history_limit: usize) -> Result<EditorState> {
    let _scope = crate::perf::scope("document.open");
    let doc = SavedDocument::load(path)?;
    crate::perf::log_event(
        "document.open",
        format!("{} blocks={}", path.display(), doc.components.len()),
    );
    Ok(doc.into_state(EditorState::with_history_limit(history_limit)))
}
