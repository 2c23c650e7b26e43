//! Block list to Markdown and HTML.
//!
//! Both converters are pure functions of the slice they are given. They do
//! not sort: callers pass blocks already ordered by their order key (see
//! [`crate::block::sorted_by_order`]). Hidden blocks are skipped. Output
//! contains nothing but the block data, so repeated calls are byte-identical.

mod html;
mod markdown;

pub use html::{block_to_html, to_html};
pub use markdown::{block_to_markdown, to_markdown};

use crate::block::BlockContent;

/// Prefix marking a block dumped as a structured comment.
pub const COMMENT_PREFIX: &str = "docblocks:";

/// HTML comment carrying the JSON payload of a block with no direct form.
///
/// `--` never appears in the comment body: inside JSON it can only occur in
/// string literals, where `-` is an equivalent escape.
pub fn structured_comment(content: &BlockContent) -> String {
    let json = serde_json::to_string(content).unwrap_or_else(|_| "null".to_string());
    let json = json.replace("--", "-\\u002d");
    format!("<!-- {COMMENT_PREFIX}{} {json} -->", content.kind())
}
