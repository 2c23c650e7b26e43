use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use super::style::Style;
use crate::error::EditorError;

/// Opaque block identifier. Allocated by the editor, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(u64);

impl BlockId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block-{}", self.0)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

const fn default_start() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeadingContent {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ParagraphContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageContent {
    pub src: String,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CodeContent {
    pub language: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ButtonContent {
    pub text: String,
    pub link: String,
    pub variant: String,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardContent {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GridItem {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GridContent {
    pub columns: u8,
    pub items: Vec<GridItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DividerContent {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListContent {
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderedListContent {
    pub items: Vec<String>,
    #[serde(default = "default_start")]
    pub start: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskItem {
    pub text: String,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskListContent {
    pub items: Vec<TaskItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BlockquoteContent {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Tables always carry an explicit header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TableContent {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl AlertLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AlertContent {
    pub level: AlertLevel,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MermaidContent {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpacerContent {
    pub height: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ColumnsContent {
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HtmlBlockContent {
    pub name: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LinkButton {
    pub text: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BannerContent {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub background_color: String,
    pub text_color: String,
    pub buttons: Vec<LinkButton>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeroContent {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub background_color: String,
    pub text_align: String,
    pub buttons: Vec<LinkButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChartContent {
    pub chart_type: String,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GalleryImage {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GalleryContent {
    pub images: Vec<GalleryImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TestimonialContent {
    pub quote: String,
    pub author: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PricingPlan {
    pub name: String,
    pub price: String,
    pub period: String,
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PricingContent {
    pub plans: Vec<PricingPlan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VideoContent {
    pub src: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub autoplay: bool,
}

/// Declares the closed set of block kinds together with their content types.
///
/// Every kind gets a `BlockKind` variant, a wire name, and a `BlockContent`
/// variant wrapping its content struct, so the two enums cannot drift apart.
macro_rules! block_kinds {
    ($( $variant:ident => $name:literal, $content:ty; )*) => {
        /// Tag for every block type the editor knows about.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum BlockKind {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl BlockKind {
            /// All kinds, in palette order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// Wire name used in the save format and in structured dumps.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }

        impl FromStr for BlockKind {
            type Err = EditorError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)*
                    other => Err(EditorError::UnknownBlockType(other.to_string())),
                }
            }
        }

        /// Strongly typed block payload; the variant always matches the kind.
        #[derive(Debug, Clone, PartialEq)]
        pub enum BlockContent {
            $($variant($content),)*
        }

        impl BlockContent {
            pub const fn kind(&self) -> BlockKind {
                match self {
                    $(Self::$variant(_) => BlockKind::$variant,)*
                }
            }

            /// Decode a payload for `kind`.
            ///
            /// # Errors
            /// Returns an error if `value` does not have the shape of `kind`'s content.
            pub fn from_value(kind: BlockKind, value: Value) -> serde_json::Result<Self> {
                match kind {
                    $(BlockKind::$variant => serde_json::from_value(value).map(Self::$variant),)*
                }
            }
        }

        // Serializes the payload only; the kind travels next to it.
        impl Serialize for BlockContent {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self {
                    $(Self::$variant(content) => content.serialize(serializer),)*
                }
            }
        }
    };
}

block_kinds! {
    Heading => "heading", HeadingContent;
    Paragraph => "paragraph", ParagraphContent;
    Image => "image", ImageContent;
    Code => "code", CodeContent;
    Button => "button", ButtonContent;
    Card => "card", CardContent;
    Grid => "grid", GridContent;
    Divider => "divider", DividerContent;
    List => "list", ListContent;
    OrderedList => "orderedList", OrderedListContent;
    TaskList => "taskList", TaskListContent;
    Blockquote => "blockquote", BlockquoteContent;
    Table => "table", TableContent;
    Alert => "alert", AlertContent;
    Mermaid => "mermaid", MermaidContent;
    Spacer => "spacer", SpacerContent;
    Columns => "columns", ColumnsContent;
    HtmlBlock => "htmlBlock", HtmlBlockContent;
    Banner => "banner", BannerContent;
    Hero => "hero", HeroContent;
    Chart => "chart", ChartContent;
    Gallery => "gallery", GalleryContent;
    Testimonial => "testimonial", TestimonialContent;
    Pricing => "pricing", PricingContent;
    Video => "video", VideoContent;
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BlockContent {
    /// Payload as a JSON value.
    ///
    /// # Errors
    /// Returns an error only if serialization of the payload fails.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Shallow-merge `patch` over this payload.
    ///
    /// Top-level fields of the patch replace the existing ones; the result
    /// must still decode as the same kind.
    ///
    /// # Errors
    /// Returns an error if the merged payload no longer fits the kind, for
    /// example because of an unknown field or a wrongly typed value.
    pub fn merged(&self, patch: &Map<String, Value>) -> serde_json::Result<Self> {
        let mut value = self.to_value()?;
        if let Value::Object(fields) = &mut value {
            for (key, field) in patch {
                fields.insert(key.clone(), field.clone());
            }
        }
        Self::from_value(self.kind(), value)
    }
}

/// The atomic document unit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: BlockId,
    pub content: BlockContent,
    pub style: Style,
    pub order: usize,
    pub locked: bool,
    pub hidden: bool,
}

impl Block {
    /// A visible, unlocked block with no style overrides.
    pub fn new(id: BlockId, content: BlockContent, order: usize) -> Self {
        Self {
            id,
            content,
            style: Style::default(),
            order,
            locked: false,
            hidden: false,
        }
    }

    pub const fn kind(&self) -> BlockKind {
        self.content.kind()
    }
}

/// Borrowed wire view of a [`Block`].
#[derive(Serialize)]
struct BlockRef<'a> {
    id: BlockId,
    #[serde(rename = "type")]
    kind: BlockKind,
    content: &'a BlockContent,
    #[serde(skip_serializing_if = "Style::is_empty")]
    style: &'a Style,
    order: usize,
    #[serde(skip_serializing_if = "is_false")]
    locked: bool,
    #[serde(skip_serializing_if = "is_false")]
    hidden: bool,
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BlockRef {
            id: self.id,
            kind: self.kind(),
            content: &self.content,
            style: &self.style,
            order: self.order,
            locked: self.locked,
            hidden: self.hidden,
        }
        .serialize(serializer)
    }
}

/// Owned wire form; the content is decoded once the kind is known.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBlock {
    id: BlockId,
    #[serde(rename = "type")]
    kind: BlockKind,
    content: Value,
    #[serde(default)]
    style: Style,
    order: usize,
    #[serde(default)]
    locked: bool,
    #[serde(default)]
    hidden: bool,
}

impl TryFrom<RawBlock> for Block {
    type Error = EditorError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let content =
            BlockContent::from_value(raw.kind, raw.content).map_err(|err| {
                EditorError::InvalidContent {
                    id: raw.id,
                    reason: err.to_string(),
                }
            })?;
        Ok(Self {
            id: raw.id,
            content,
            style: raw.style,
            order: raw.order,
            locked: raw.locked,
            hidden: raw.hidden,
        })
    }
}
