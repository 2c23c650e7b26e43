//! Direct-manipulation gestures translated into editor messages.
//!
//! The controller only remembers what is being dragged and where it
//! hovers. It never touches [`EditorState`]; a finished gesture yields at
//! most one [`Message`] for the caller to dispatch, and a cancelled one
//! yields nothing.

use crate::block::{BlockId, PaletteItem};
use crate::editor::{EditorState, Message};

/// What the pointer picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    /// A palette entry: dropping it inserts a new block.
    Palette(PaletteItem),
    /// An existing block: dropping it reorders the document.
    Block(BlockId),
}

/// Where the pointer is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// The open canvas area below the last block.
    Canvas,
    /// The gap before the block currently at this index.
    Index(usize),
    /// On top of a block: take its position.
    Block(BlockId),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DragController {
    dragging: Option<DragSource>,
    hover: Option<DropTarget>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// The item under the pointer, for drawing the drag preview.
    pub const fn dragging(&self) -> Option<&DragSource> {
        self.dragging.as_ref()
    }

    pub const fn hover(&self) -> Option<DropTarget> {
        self.hover
    }

    pub fn start(&mut self, source: DragSource) {
        tracing::debug!(?source, "drag start");
        self.dragging = Some(source);
        self.hover = None;
    }

    /// Track the target under the pointer; `None` when over nothing.
    pub fn over(&mut self, target: Option<DropTarget>) {
        if self.dragging.is_some() {
            self.hover = target;
        }
    }

    /// Abandon the gesture.
    pub fn cancel(&mut self) {
        self.dragging = None;
        self.hover = None;
    }

    /// Finish the gesture at `target` and return the message to dispatch.
    ///
    /// Dropping on nothing, on an unknown block, or back where a block
    /// already is yields `None`.
    pub fn drop(&mut self, state: &EditorState, target: Option<DropTarget>) -> Option<Message> {
        let source = self.dragging.take();
        self.hover = None;
        let message = match (source?, target?) {
            (DragSource::Palette(item), target) => Some(Message::AddComponent {
                content: item.content(),
                index: insertion_index(state, target)?,
            }),
            (DragSource::Block(id), target) => reorder_to(state, id, target),
        };
        tracing::debug!(?message, "drag drop");
        message
    }
}

/// Where a new block lands: `Some(None)` appends, `None` rejects the drop.
fn insertion_index(state: &EditorState, target: DropTarget) -> Option<Option<usize>> {
    match target {
        DropTarget::Canvas => Some(None),
        DropTarget::Index(index) => Some(Some(index.min(state.len()))),
        DropTarget::Block(id) => Some(Some(state.block(id)?.order)),
    }
}

fn reorder_to(state: &EditorState, id: BlockId, target: DropTarget) -> Option<Message> {
    let mut ids = state.ids();
    let from = ids.iter().position(|candidate| *candidate == id)?;
    let to = match target {
        DropTarget::Canvas => ids.len() - 1,
        // A gap index counts the dragged block itself.
        DropTarget::Index(index) if index > from => index.min(ids.len()) - 1,
        DropTarget::Index(index) => index,
        DropTarget::Block(over) => ids.iter().position(|candidate| *candidate == over)?,
    };
    if to == from {
        return None;
    }
    let moved = ids.remove(from);
    ids.insert(to, moved);
    Some(Message::ReorderComponents(ids))
}

/// Clicking a palette entry appends its block.
pub fn click_to_add(item: &PaletteItem) -> Message {
    Message::AddComponent {
        content: item.content(),
        index: None,
    }
}

/// Swap `id` with the block above it.
pub fn move_up(state: &EditorState, id: BlockId) -> Option<Message> {
    let index = state.block(id)?.order;
    let target = state.ids().get(index.checked_sub(1)?).copied()?;
    reorder_to(state, id, DropTarget::Block(target))
}

/// Swap `id` with the block below it.
pub fn move_down(state: &EditorState, id: BlockId) -> Option<Message> {
    let index = state.block(id)?.order;
    let target = state.ids().get(index + 1).copied()?;
    reorder_to(state, id, DropTarget::Block(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockKind, default_content, palette};
    use crate::editor::update;

    fn document(kinds: &[BlockKind]) -> EditorState {
        kinds.iter().fold(EditorState::new(), |state, kind| {
            update(
                state,
                Message::AddComponent {
                    content: default_content(*kind, None),
                    index: None,
                },
            )
        })
    }

    fn palette_item(kind: BlockKind) -> PaletteItem {
        palette()
            .into_iter()
            .flat_map(|category| category.items)
            .find(|item| item.kind == kind)
            .unwrap()
    }

    #[test]
    fn test_palette_drop_on_canvas_appends() {
        let state = document(&[BlockKind::Heading]);
        let mut drag = DragController::new();
        drag.start(DragSource::Palette(palette_item(BlockKind::Divider)));
        drag.over(Some(DropTarget::Canvas));
        assert_eq!(drag.hover(), Some(DropTarget::Canvas));

        let message = drag.drop(&state, Some(DropTarget::Canvas)).unwrap();
        assert!(matches!(message, Message::AddComponent { index: None, .. }));
        assert!(!drag.is_dragging());

        let state = update(state, message);
        assert_eq!(state.blocks()[1].kind(), BlockKind::Divider);
    }

    #[test]
    fn test_palette_drop_on_block_inserts_before_it() {
        let state = document(&[BlockKind::Heading, BlockKind::Paragraph]);
        let target = state.ids()[1];
        let mut drag = DragController::new();
        drag.start(DragSource::Palette(palette_item(BlockKind::Code)));
        let message = drag.drop(&state, Some(DropTarget::Block(target))).unwrap();
        let state = update(state, message);
        let kinds: Vec<BlockKind> = state.blocks().iter().map(|block| block.kind()).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Heading, BlockKind::Code, BlockKind::Paragraph]
        );
    }

    #[test]
    fn test_block_drop_on_block_takes_its_position() {
        let state = document(&[BlockKind::Heading, BlockKind::Paragraph, BlockKind::Divider]);
        let [a, b, c] = [state.ids()[0], state.ids()[1], state.ids()[2]];
        let mut drag = DragController::new();

        drag.start(DragSource::Block(a));
        let message = drag.drop(&state, Some(DropTarget::Block(c))).unwrap();
        assert_eq!(message, Message::ReorderComponents(vec![b, c, a]));

        drag.start(DragSource::Block(c));
        let message = drag.drop(&state, Some(DropTarget::Block(a))).unwrap();
        assert_eq!(message, Message::ReorderComponents(vec![c, a, b]));
    }

    #[test]
    fn test_block_drop_on_gap() {
        let state = document(&[BlockKind::Heading, BlockKind::Paragraph, BlockKind::Divider]);
        let [a, b, c] = [state.ids()[0], state.ids()[1], state.ids()[2]];
        let mut drag = DragController::new();

        drag.start(DragSource::Block(a));
        let message = drag.drop(&state, Some(DropTarget::Index(2))).unwrap();
        assert_eq!(message, Message::ReorderComponents(vec![b, a, c]));

        drag.start(DragSource::Block(c));
        let message = drag.drop(&state, Some(DropTarget::Index(0))).unwrap();
        assert_eq!(message, Message::ReorderComponents(vec![c, a, b]));

        drag.start(DragSource::Block(a));
        assert_eq!(drag.drop(&state, Some(DropTarget::Index(1))), None);
    }

    #[test]
    fn test_drop_in_place_or_nowhere_is_noop() {
        let state = document(&[BlockKind::Heading, BlockKind::Paragraph]);
        let a = state.ids()[0];
        let mut drag = DragController::new();

        drag.start(DragSource::Block(a));
        assert_eq!(drag.drop(&state, Some(DropTarget::Block(a))), None);

        drag.start(DragSource::Block(a));
        drag.over(Some(DropTarget::Index(2)));
        assert_eq!(drag.drop(&state, None), None);
        assert!(!drag.is_dragging());

        drag.start(DragSource::Palette(palette_item(BlockKind::Heading)));
        assert_eq!(
            drag.drop(&state, Some(DropTarget::Block(BlockId::new(404)))),
            None
        );
    }

    #[test]
    fn test_cancel_leaves_state_untouched() {
        let state = document(&[BlockKind::Heading, BlockKind::Paragraph]);
        let before = state.clone();
        let mut drag = DragController::new();
        drag.start(DragSource::Block(state.ids()[0]));
        drag.over(Some(DropTarget::Canvas));
        drag.cancel();
        assert_eq!(drag, DragController::default());
        assert_eq!(drag.drop(&state, Some(DropTarget::Canvas)), None);
        assert_eq!(state, before);
    }

    #[test]
    fn test_move_up_and_down() {
        let state = document(&[BlockKind::Heading, BlockKind::Paragraph, BlockKind::Divider]);
        let [a, b, c] = [state.ids()[0], state.ids()[1], state.ids()[2]];
        assert_eq!(move_up(&state, a), None);
        assert_eq!(move_down(&state, c), None);
        assert_eq!(
            move_up(&state, c),
            Some(Message::ReorderComponents(vec![a, c, b]))
        );
        assert_eq!(
            move_down(&state, a),
            Some(Message::ReorderComponents(vec![b, a, c]))
        );
    }

    #[test]
    fn test_click_to_add_appends() {
        let state = document(&[BlockKind::Heading]);
        let state = update(state, click_to_add(&palette_item(BlockKind::Table)));
        assert_eq!(state.blocks()[1].kind(), BlockKind::Table);
    }
}
