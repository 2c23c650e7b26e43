//! Editor state machine.
//!
//! Follows the Elm architecture: an [`EditorState`] value and a [`Message`]
//! go in, the next state comes out. Rejected actions never panic or return
//! early; they leave the state untouched and are reported by [`reduce`].

mod history;
pub mod script;
mod state;
mod update;

pub use history::{DEFAULT_HISTORY_LIMIT, History};
pub use script::{ScriptReport, run_script};
pub use state::{DocumentDetails, EditorState, PreviewMode};
pub use update::{Message, reduce, update};

pub(crate) use update::log_rejection;
