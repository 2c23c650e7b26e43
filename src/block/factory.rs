//! Canonical default content for newly inserted blocks.

use serde::Serialize;

use super::types::{
    AlertContent, AlertLevel, BannerContent, BlockContent, BlockKind, BlockquoteContent,
    ButtonContent, CardContent, ChartContent, CodeContent, ColumnsContent, DividerContent,
    GalleryContent, GalleryImage, GridContent, GridItem, HeadingContent, HeroContent,
    HtmlBlockContent, ImageContent, LinkButton, ListContent, MermaidContent, OrderedListContent,
    ParagraphContent, PricingContent, PricingPlan, SpacerContent, TableContent, TaskItem,
    TaskListContent, TestimonialContent, VideoContent,
};
use crate::error::EditorError;

/// Ready-made HTML snippets offered by the palette as `htmlBlock` variants.
const HTML_SNIPPETS: &[(&str, &str, &str)] = &[
    (
        "primaryButton",
        "Primary Button",
        r#"<button class="inline-flex items-center justify-center rounded-md bg-blue-600 px-4 py-2 text-sm font-medium text-white shadow hover:bg-blue-700">Primary Button</button>"#,
    ),
    (
        "successAlert",
        "Success Alert",
        r#"<div class="rounded-md bg-green-50 p-4 border border-green-200"><p class="text-sm text-green-800">Success! Your action was completed.</p></div>"#,
    ),
    (
        "productCard",
        "Product Card",
        r#"<div class="bg-white rounded-lg shadow-md overflow-hidden"><img class="w-full h-48 object-cover" src="/placeholder.svg?height=200&width=300" alt=""><div class="p-4"><h3 class="text-lg font-semibold">Product Name</h3><p class="text-gray-600 text-sm mt-1">Product description</p></div></div>"#,
    ),
    (
        "navbar",
        "Navbar",
        r##"<nav class="bg-white shadow"><div class="max-w-7xl mx-auto px-4 h-16 flex items-center justify-between"><span class="font-bold text-gray-800">Brand</span><a class="text-gray-700" href="#">Home</a></div></nav>"##,
    ),
];

const FALLBACK_HTML: &str = "<div>Custom HTML</div>";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

fn html_block(variant: Option<&str>) -> HtmlBlockContent {
    let snippet = variant
        .or(Some("primaryButton"))
        .and_then(|key| HTML_SNIPPETS.iter().find(|(k, _, _)| *k == key));
    match snippet {
        Some((_, name, html)) => HtmlBlockContent {
            name: (*name).to_string(),
            html: (*html).to_string(),
        },
        None => HtmlBlockContent {
            name: "Custom HTML".to_string(),
            html: FALLBACK_HTML.to_string(),
        },
    }
}

fn call_to_action() -> Vec<LinkButton> {
    vec![LinkButton {
        text: "Get started".to_string(),
        link: "#".to_string(),
    }]
}

/// Default content for `kind`.
///
/// Total over [`BlockKind`]: every kind yields a complete payload. Each call
/// builds a fresh value, so two blocks never share content. `variant` picks
/// an HTML snippet for `htmlBlock` (unknown keys fall back to a plain
/// `<div>`) and is ignored for every other kind.
pub fn default_content(kind: BlockKind, variant: Option<&str>) -> BlockContent {
    match kind {
        BlockKind::Heading => BlockContent::Heading(HeadingContent {
            level: 2,
            text: "New Heading".to_string(),
        }),
        BlockKind::Paragraph => BlockContent::Paragraph(ParagraphContent {
            text: "This is a new paragraph.".to_string(),
        }),
        BlockKind::Image => BlockContent::Image(ImageContent {
            src: "/placeholder.svg?height=200&width=400".to_string(),
            alt: "placeholder".to_string(),
            caption: None,
            width: None,
            height: None,
        }),
        BlockKind::Code => BlockContent::Code(CodeContent {
            language: "javascript".to_string(),
            code: "console.log('hello');".to_string(),
        }),
        BlockKind::Button => BlockContent::Button(ButtonContent {
            text: "Click me".to_string(),
            link: "#".to_string(),
            variant: "default".to_string(),
            size: "default".to_string(),
        }),
        BlockKind::Card => BlockContent::Card(CardContent {
            title: "Card title".to_string(),
            description: "Card description".to_string(),
            image_url: None,
        }),
        BlockKind::Grid => BlockContent::Grid(GridContent {
            columns: 3,
            items: (1..=3)
                .map(|n| GridItem {
                    title: format!("Item {n}"),
                    description: "Description".to_string(),
                })
                .collect(),
        }),
        BlockKind::Divider => BlockContent::Divider(DividerContent::default()),
        BlockKind::List => BlockContent::List(ListContent {
            items: strings(&["First", "Second", "Third"]),
        }),
        BlockKind::OrderedList => BlockContent::OrderedList(OrderedListContent {
            items: strings(&["First", "Second", "Third"]),
            start: 1,
        }),
        BlockKind::TaskList => BlockContent::TaskList(TaskListContent {
            items: vec![
                TaskItem {
                    text: "Done".to_string(),
                    checked: true,
                },
                TaskItem {
                    text: "To do".to_string(),
                    checked: false,
                },
            ],
        }),
        BlockKind::Blockquote => BlockContent::Blockquote(BlockquoteContent {
            text: "A famous quote.".to_string(),
            author: None,
        }),
        BlockKind::Table => BlockContent::Table(TableContent {
            headers: strings(&["H1", "H2", "H3"]),
            rows: vec![
                strings(&["1 × 1", "1 × 2", "1 × 3"]),
                strings(&["2 × 1", "2 × 2", "2 × 3"]),
            ],
        }),
        BlockKind::Alert => BlockContent::Alert(AlertContent {
            level: AlertLevel::Info,
            title: "Note".to_string(),
            text: "Something worth knowing.".to_string(),
        }),
        BlockKind::Mermaid => BlockContent::Mermaid(MermaidContent {
            code: "graph TD\n  A[Start] --> B[End]".to_string(),
        }),
        BlockKind::Spacer => BlockContent::Spacer(SpacerContent {
            height: "2rem".to_string(),
        }),
        BlockKind::Columns => BlockContent::Columns(ColumnsContent {
            columns: strings(&["Left column", "Right column"]),
        }),
        BlockKind::HtmlBlock => BlockContent::HtmlBlock(html_block(variant)),
        BlockKind::Banner => BlockContent::Banner(BannerContent {
            title: "Announcement".to_string(),
            subtitle: "Something new".to_string(),
            description: "Tell readers what changed.".to_string(),
            background_color: "#1e40af".to_string(),
            text_color: "#ffffff".to_string(),
            buttons: call_to_action(),
        }),
        BlockKind::Hero => BlockContent::Hero(HeroContent {
            title: "Welcome".to_string(),
            subtitle: "Documentation".to_string(),
            description: "Everything you need to get going.".to_string(),
            background_color: "#0f172a".to_string(),
            text_align: "center".to_string(),
            buttons: call_to_action(),
        }),
        BlockKind::Chart => BlockContent::Chart(ChartContent {
            chart_type: "bar".to_string(),
            title: "Chart".to_string(),
            labels: strings(&["Q1", "Q2", "Q3"]),
            values: vec![10.0, 20.0, 15.0],
        }),
        BlockKind::Gallery => BlockContent::Gallery(GalleryContent {
            images: (1..=3)
                .map(|n| GalleryImage {
                    src: "/placeholder.svg?height=200&width=300".to_string(),
                    alt: format!("Image {n}"),
                })
                .collect(),
        }),
        BlockKind::Testimonial => BlockContent::Testimonial(TestimonialContent {
            quote: "This changed how we write docs.".to_string(),
            author: "Jane Doe".to_string(),
            position: "Technical Writer".to_string(),
            avatar: None,
            rating: 5,
        }),
        BlockKind::Pricing => BlockContent::Pricing(PricingContent {
            plans: vec![
                PricingPlan {
                    name: "Basic".to_string(),
                    price: "$9".to_string(),
                    period: "month".to_string(),
                    features: strings(&["1 project"]),
                    highlighted: false,
                },
                PricingPlan {
                    name: "Pro".to_string(),
                    price: "$29".to_string(),
                    period: "month".to_string(),
                    features: strings(&["Unlimited projects", "Priority support"]),
                    highlighted: true,
                },
            ],
        }),
        BlockKind::Video => BlockContent::Video(VideoContent {
            src: String::new(),
            title: "Video".to_string(),
            autoplay: false,
        }),
    }
}

/// Default content for a kind given by its wire name.
///
/// # Errors
/// Returns [`EditorError::UnknownBlockType`] if `name` is not a known kind.
pub fn default_content_named(name: &str, variant: Option<&str>) -> Result<BlockContent, EditorError> {
    let kind = name.parse::<BlockKind>()?;
    Ok(default_content(kind, variant))
}

/// One insertable entry in the palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteItem {
    pub label: String,
    pub kind: BlockKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl PaletteItem {
    pub fn content(&self) -> BlockContent {
        default_content(self.kind, self.variant.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteCategory {
    pub name: String,
    pub items: Vec<PaletteItem>,
}

fn item(kind: BlockKind, label: &str) -> PaletteItem {
    PaletteItem {
        label: label.to_string(),
        kind,
        variant: None,
    }
}

/// The palette shown next to the canvas.
pub fn palette() -> Vec<PaletteCategory> {
    use BlockKind as K;
    let category = |name: &str, items: Vec<PaletteItem>| PaletteCategory {
        name: name.to_string(),
        items,
    };
    vec![
        category(
            "Basic",
            vec![
                item(K::Heading, "Heading"),
                item(K::Paragraph, "Paragraph"),
                item(K::Image, "Image"),
                item(K::Button, "Button"),
                item(K::Divider, "Divider"),
                item(K::Spacer, "Spacer"),
            ],
        ),
        category(
            "Text",
            vec![
                item(K::List, "Bulleted list"),
                item(K::OrderedList, "Numbered list"),
                item(K::TaskList, "Task list"),
                item(K::Blockquote, "Quote"),
                item(K::Code, "Code"),
                item(K::Table, "Table"),
                item(K::Alert, "Alert"),
            ],
        ),
        category(
            "Layout",
            vec![
                item(K::Card, "Card"),
                item(K::Grid, "Grid"),
                item(K::Columns, "Columns"),
                item(K::Banner, "Banner"),
                item(K::Hero, "Hero"),
            ],
        ),
        category(
            "Media",
            vec![
                item(K::Gallery, "Gallery"),
                item(K::Video, "Video"),
                item(K::Chart, "Chart"),
                item(K::Mermaid, "Diagram"),
            ],
        ),
        category(
            "Marketing",
            vec![item(K::Testimonial, "Testimonial"), item(K::Pricing, "Pricing")],
        ),
        category(
            "HTML snippets",
            HTML_SNIPPETS
                .iter()
                .map(|(key, label, _)| PaletteItem {
                    label: (*label).to_string(),
                    kind: K::HtmlBlock,
                    variant: Some((*key).to_string()),
                })
                .collect(),
        ),
    ]
}
