use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockContent, BlockId};

use super::history::{History, Snapshot};

/// Render mode of the preview pane. Presentation only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    #[default]
    Edit,
    Preview,
    Mobile,
    Tablet,
}

/// Labels for the document being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDetails {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub file_version: String,
}

/// The complete editing session state.
///
/// `components` is always kept sorted by order key with `order == index`,
/// so the order values form exactly `0..len`.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub(super) components: Vec<Block>,
    pub(super) selected: Option<BlockId>,
    pub(super) clipboard: Option<Block>,
    pub(super) dirty: bool,
    pub(super) history: History,
    pub(super) preview_mode: PreviewMode,
    pub(super) details: DocumentDetails,
    /// Next id to hand out. Survives undo so ids are never reused.
    pub(super) next_id: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    /// An empty document.
    pub fn new() -> Self {
        Self::with_history_limit(super::history::DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            components: Vec::new(),
            selected: None,
            clipboard: None,
            dirty: false,
            history: History::with_limit(limit),
            preview_mode: PreviewMode::default(),
            details: DocumentDetails::default(),
            next_id: 1,
        }
    }

    /// Blocks in document order.
    pub fn blocks(&self) -> &[Block] {
        &self.components
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.components.iter().find(|block| block.id == id)
    }

    /// Ids in document order.
    pub fn ids(&self) -> Vec<BlockId> {
        self.components.iter().map(|block| block.id).collect()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub const fn selected(&self) -> Option<BlockId> {
        self.selected
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.selected.and_then(|id| self.block(id))
    }

    pub const fn clipboard(&self) -> Option<&Block> {
        self.clipboard.as_ref()
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn history(&self) -> &History {
        &self.history
    }

    pub const fn preview_mode(&self) -> PreviewMode {
        self.preview_mode
    }

    pub const fn details(&self) -> &DocumentDetails {
        &self.details
    }

    /// Document as Markdown (hidden blocks excluded).
    pub fn to_markdown(&self) -> String {
        crate::serialize::to_markdown(&self.components)
    }

    /// Document as HTML (hidden blocks excluded).
    pub fn to_html(&self) -> String {
        crate::serialize::to_html(&self.components)
    }

    pub(super) fn position(&self, id: BlockId) -> Option<usize> {
        self.components.iter().position(|block| block.id == id)
    }

    pub(super) fn allocate_id(&mut self) -> BlockId {
        if let Some(next) = self.next_id.checked_add(1) {
            let id = BlockId::new(self.next_id);
            self.next_id = next;
            return id;
        }
        // Sequence exhausted: fall back to the lowest id not in the document.
        let used: HashSet<u64> = self.components.iter().map(|block| block.id.get()).collect();
        BlockId::new((1..u64::MAX).find(|raw| !used.contains(raw)).unwrap_or(0))
    }

    /// Insert `block` at `index` (clamped to the end) under a fresh id.
    ///
    /// Blocks at or after the insertion point move down by one.
    pub(super) fn insert_block(&mut self, mut block: Block, index: Option<usize>) -> BlockId {
        let index = index.map_or(self.components.len(), |i| i.min(self.components.len()));
        block.id = self.allocate_id();
        let id = block.id;
        self.components.insert(index, block);
        self.renumber();
        id
    }

    pub(super) fn new_block(&mut self, content: BlockContent, index: Option<usize>) -> BlockId {
        let block = Block::new(BlockId::new(0), content, 0);
        self.insert_block(block, index)
    }

    /// Reassign order keys from vector position.
    pub(super) fn renumber(&mut self) {
        for (index, block) in self.components.iter_mut().enumerate() {
            block.order = index;
        }
    }

    pub(super) fn snapshot(&self) -> Snapshot {
        Snapshot {
            components: self.components.clone(),
            selected: self.selected,
            dirty: self.dirty,
            details: self.details.clone(),
        }
    }

    pub(super) fn restore(&mut self, snapshot: Snapshot) {
        self.components = snapshot.components;
        self.selected = snapshot.selected;
        self.dirty = snapshot.dirty;
        self.details = snapshot.details;
    }

    /// Push the current document onto the undo stack before an edit.
    pub(super) fn checkpoint(&mut self) {
        let before = self.snapshot();
        self.history.record(before);
    }

    /// Replace the document wholesale with loaded blocks.
    ///
    /// Blocks are sorted by their stored order and renumbered; the id
    /// sequence continues after the largest loaded id.
    pub(super) fn load(&mut self, mut blocks: Vec<Block>, details: DocumentDetails) {
        blocks.sort_by_key(|block| block.order);
        let mut seen = HashSet::new();
        blocks.retain(|block| seen.insert(block.id));
        let max_id = blocks.iter().map(|block| block.id.get()).max().unwrap_or(0);
        self.components = blocks;
        self.renumber();
        self.next_id = self.next_id.max(max_id.saturating_add(1));
        self.selected = None;
        self.dirty = false;
        self.details = details;
        self.history.clear();
    }
}
