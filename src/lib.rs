// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. block::BlockKind)
    clippy::module_name_repetitions
)]

//! # Docblocks
//!
//! The core of a block-based documentation editor.
//!
//! A document is an ordered list of typed blocks (headings, tables, hero
//! sections, charts, ...). Docblocks edits that list through a reducer with
//! undo/redo, exports it as Markdown or HTML, and publishes the Markdown to
//! a repository host.
//!
//! ## Architecture
//!
//! Docblocks uses The Elm Architecture (TEA) pattern:
//! - **Model**: [`editor::EditorState`]
//! - **Message**: [`editor::Message`]
//! - **Update**: [`editor::update`], a pure state transition
//! - **View**: [`serialize`] turns the model into text
//!
//! ## Modules
//!
//! - [`block`]: Block model and the content factory
//! - [`serialize`]: Markdown and HTML export
//! - [`editor`]: State machine, history and scripted actions
//! - [`canvas`]: Drag and drop gestures
//! - [`publish`]: Repository publishing
//! - [`session`]: An editing session tying the above together
//! - [`document`]: Native JSON save format
//! - [`nav`]: Sidebar navigation from a docs directory

pub mod block;
pub mod canvas;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod nav;
pub mod perf;
pub mod publish;
pub mod serialize;
pub mod session;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::block::{Block, BlockContent, BlockId, BlockKind, Style, default_content};
    pub use crate::editor::{EditorState, Message, update};
    pub use crate::error::EditorError;
    pub use crate::session::EditorSession;
}
