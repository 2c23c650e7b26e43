//! Block component model and content factory.
//!
//! A [`Block`] pairs an id and document position with a [`BlockContent`]
//! whose variant fixes the content shape for its [`BlockKind`]. New content
//! only comes from [`default_content`], so every block starts renderable.

mod factory;
mod style;
mod types;

pub use factory::{PaletteCategory, PaletteItem, default_content, default_content_named, palette};
pub use style::{HoverStyle, Style};
pub use types::{
    AlertContent, AlertLevel, BannerContent, Block, BlockContent, BlockId, BlockKind,
    BlockquoteContent, ButtonContent, CardContent, ChartContent, CodeContent, ColumnsContent,
    DividerContent, GalleryContent, GalleryImage, GridContent, GridItem, HeadingContent,
    HeroContent, HtmlBlockContent, ImageContent, LinkButton, ListContent, MermaidContent,
    OrderedListContent, ParagraphContent, PricingContent, PricingPlan, SpacerContent,
    TableContent, TaskItem, TaskListContent, TestimonialContent, VideoContent,
};

/// Blocks sorted by their order key.
pub fn sorted_by_order(blocks: &[Block]) -> Vec<Block> {
    let mut sorted = blocks.to_vec();
    sorted.sort_by_key(|block| block.order);
    sorted
}
