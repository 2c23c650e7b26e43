use crate::block::{Block, BlockContent, TableContent};

use super::structured_comment;

/// Render visible blocks as Markdown, one blank line between blocks.
///
/// Blocks that render to nothing (an empty paragraph or list) are left out
/// instead of leaving a run of blank lines.
pub fn to_markdown(blocks: &[Block]) -> String {
    let _scope = crate::perf::scope("serialize.markdown");
    blocks
        .iter()
        .filter(|block| !block.hidden)
        .map(block_to_markdown)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Markdown for a single block, without surrounding blank lines.
pub fn block_to_markdown(block: &Block) -> String {
    match &block.content {
        BlockContent::Heading(heading) => {
            let level = usize::from(heading.level.clamp(1, 6));
            format!("{} {}", "#".repeat(level), heading.text)
        }
        BlockContent::Paragraph(paragraph) => paragraph.text.clone(),
        BlockContent::Image(image) => {
            let mut out = format!("![{}]({})", image.alt, image.src);
            if let Some(caption) = image.caption.as_deref().filter(|c| !c.is_empty()) {
                out.push_str(&format!("\n*{caption}*"));
            }
            out
        }
        BlockContent::Code(code) => format!("```{}\n{}\n```", code.language, code.code),
        BlockContent::Mermaid(mermaid) => format!("```mermaid\n{}\n```", mermaid.code),
        BlockContent::Blockquote(quote) => {
            let mut lines: Vec<String> = quote.text.lines().map(|line| format!("> {line}")).collect();
            if lines.is_empty() {
                lines.push("> ".to_string());
            }
            if let Some(author) = quote.author.as_deref().filter(|a| !a.is_empty()) {
                lines.push(">".to_string());
                lines.push(format!("> — {author}"));
            }
            lines.join("\n")
        }
        BlockContent::List(list) => list
            .items
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n"),
        BlockContent::OrderedList(list) => list
            .items
            .iter()
            .zip(u64::from(list.start)..)
            .map(|(item, n)| format!("{n}. {item}"))
            .collect::<Vec<_>>()
            .join("\n"),
        BlockContent::TaskList(tasks) => tasks
            .items
            .iter()
            .map(|task| format!("- [{}] {}", if task.checked { 'x' } else { ' ' }, task.text))
            .collect::<Vec<_>>()
            .join("\n"),
        BlockContent::Table(table) if !table.headers.is_empty() => table_to_markdown(table),
        BlockContent::Divider(_) => "---".to_string(),
        BlockContent::HtmlBlock(html) => html.html.clone(),
        BlockContent::Button(button) if button.link.is_empty() => format!("**{}**", button.text),
        BlockContent::Button(button) => format!("[{}]({})", button.text, button.link),
        other => structured_comment(other),
    }
}

fn table_row(cells: &[String], width: usize) -> String {
    let mut escaped: Vec<String> = cells.iter().map(|cell| cell.replace('|', "\\|")).collect();
    if escaped.len() < width {
        escaped.resize(width, String::new());
    }
    format!("| {} |", escaped.join(" | "))
}

fn table_to_markdown(table: &TableContent) -> String {
    let width = table.headers.len();
    let mut lines = Vec::with_capacity(table.rows.len() + 2);
    lines.push(table_row(&table.headers, width));
    lines.push(format!("| {} |", vec!["---"; width].join(" | ")));
    for row in &table.rows {
        lines.push(table_row(row, width));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{
        BlockId, BlockquoteContent, ButtonContent, CodeContent, DividerContent, HeadingContent,
        HtmlBlockContent, ImageContent, ListContent, OrderedListContent, ParagraphContent,
        TaskItem, TaskListContent, default_content, BlockKind,
    };

    fn blocks(contents: Vec<BlockContent>) -> Vec<Block> {
        contents
            .into_iter()
            .enumerate()
            .map(|(i, content)| Block::new(BlockId::new(i as u64), content, i))
            .collect()
    }

    fn heading(level: u8, text: &str) -> BlockContent {
        BlockContent::Heading(HeadingContent {
            level,
            text: text.to_string(),
        })
    }

    fn paragraph(text: &str) -> BlockContent {
        BlockContent::Paragraph(ParagraphContent {
            text: text.to_string(),
        })
    }

    #[test]
    fn test_heading_and_paragraph_joined_by_blank_line() {
        let doc = blocks(vec![heading(1, "Title"), paragraph("Hello")]);
        assert_eq!(to_markdown(&doc), "# Title\n\nHello");
    }

    #[test]
    fn test_heading_level_is_clamped() {
        let doc = blocks(vec![heading(9, "Deep"), heading(0, "Shallow")]);
        assert_eq!(to_markdown(&doc), "###### Deep\n\n# Shallow");
    }

    #[test]
    fn test_table_renders_header_separator_and_rows() {
        let doc = blocks(vec![BlockContent::Table(TableContent {
            headers: vec!["H1".to_string(), "H2".to_string()],
            rows: vec![vec!["x".to_string(), "y".to_string()]],
        })]);
        assert_eq!(to_markdown(&doc), "| H1 | H2 |\n| --- | --- |\n| x | y |");
    }

    #[test]
    fn test_table_pads_short_rows_and_escapes_pipes() {
        let doc = blocks(vec![BlockContent::Table(TableContent {
            headers: vec!["A".to_string(), "B".to_string()],
            rows: vec![vec!["a|b".to_string()]],
        })]);
        assert_eq!(to_markdown(&doc), "| A | B |\n| --- | --- |\n| a\\|b |  |");
    }

    #[test]
    fn test_headerless_table_is_kept_as_comment() {
        let doc = blocks(vec![BlockContent::Table(TableContent {
            headers: vec![],
            rows: vec![vec!["orphan".to_string()]],
        })]);
        let md = to_markdown(&doc);
        assert!(md.starts_with("<!-- docblocks:table "), "{md}");
        assert!(md.contains("orphan"));
    }

    #[test]
    fn test_image_with_caption() {
        let doc = blocks(vec![BlockContent::Image(ImageContent {
            src: "/a.png".to_string(),
            alt: "An image".to_string(),
            caption: Some("Figure 1".to_string()),
            width: None,
            height: None,
        })]);
        assert_eq!(to_markdown(&doc), "![An image](/a.png)\n*Figure 1*");
    }

    #[test]
    fn test_code_fence() {
        let doc = blocks(vec![BlockContent::Code(CodeContent {
            language: "rust".to_string(),
            code: "fn main() {}".to_string(),
        })]);
        assert_eq!(to_markdown(&doc), "```rust\nfn main() {}\n```");
    }

    #[test]
    fn test_blockquote_with_author() {
        let doc = blocks(vec![BlockContent::Blockquote(BlockquoteContent {
            text: "Stay hungry".to_string(),
            author: Some("Someone".to_string()),
        })]);
        assert_eq!(to_markdown(&doc), "> Stay hungry\n>\n> — Someone");
    }

    #[test]
    fn test_lists() {
        let doc = blocks(vec![
            BlockContent::List(ListContent {
                items: vec!["a".to_string(), "b".to_string()],
            }),
            BlockContent::OrderedList(OrderedListContent {
                items: vec!["one".to_string(), "two".to_string()],
                start: 3,
            }),
            BlockContent::TaskList(TaskListContent {
                items: vec![
                    TaskItem {
                        text: "done".to_string(),
                        checked: true,
                    },
                    TaskItem {
                        text: "todo".to_string(),
                        checked: false,
                    },
                ],
            }),
        ]);
        assert_eq!(
            to_markdown(&doc),
            "- a\n- b\n\n3. one\n4. two\n\n- [x] done\n- [ ] todo"
        );
    }

    #[test]
    fn test_ordered_list_starting_at_u32_max() {
        let doc = blocks(vec![BlockContent::OrderedList(OrderedListContent {
            items: vec!["last".to_string(), "after".to_string()],
            start: u32::MAX,
        })]);
        assert_eq!(to_markdown(&doc), "4294967295. last\n4294967296. after");
    }

    #[test]
    fn test_divider_html_and_button() {
        let doc = blocks(vec![
            BlockContent::Divider(DividerContent::default()),
            BlockContent::HtmlBlock(HtmlBlockContent {
                name: "Raw".to_string(),
                html: "<div class=\"x\">hi</div>".to_string(),
            }),
            BlockContent::Button(ButtonContent {
                text: "Go".to_string(),
                link: "/start".to_string(),
                variant: "default".to_string(),
                size: "default".to_string(),
            }),
        ]);
        assert_eq!(
            to_markdown(&doc),
            "---\n\n<div class=\"x\">hi</div>\n\n[Go](/start)"
        );
    }

    #[test]
    fn test_complex_block_becomes_structured_comment() {
        let doc = blocks(vec![default_content(BlockKind::Pricing, None)]);
        let md = to_markdown(&doc);
        assert!(md.starts_with("<!-- docblocks:pricing {"), "{md}");
        assert!(md.ends_with("} -->"));
        assert!(md.contains("\"name\":\"Pro\""));
    }

    #[test]
    fn test_hidden_blocks_are_skipped() {
        let mut doc = blocks(vec![heading(1, "Shown"), paragraph("Hidden"), paragraph("Tail")]);
        doc[1].hidden = true;
        assert_eq!(to_markdown(&doc), "# Shown\n\nTail");
    }

    #[test]
    fn test_empty_fragments_do_not_add_blank_lines() {
        let doc = blocks(vec![
            paragraph("a"),
            BlockContent::List(ListContent { items: vec![] }),
            paragraph(""),
            paragraph("b"),
        ]);
        assert_eq!(to_markdown(&doc), "a\n\nb");
    }

    #[test]
    fn test_empty_document_is_empty_string() {
        assert_eq!(to_markdown(&[]), "");
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let doc: Vec<Block> = blocks(
            BlockKind::ALL
                .iter()
                .map(|kind| default_content(*kind, None))
                .collect(),
        );
        assert_eq!(to_markdown(&doc), to_markdown(&doc));
    }
}
