use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::block::{Block, BlockContent, LinkButton};

use super::structured_comment;

/// Render visible blocks as HTML fragments separated by a newline.
pub fn to_html(blocks: &[Block]) -> String {
    let _scope = crate::perf::scope("serialize.html");
    blocks
        .iter()
        .filter(|block| !block.hidden)
        .map(block_to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

fn items<T>(values: &[T], render: impl Fn(&T) -> String) -> String {
    values.iter().map(render).collect()
}

fn buttons(links: &[LinkButton]) -> String {
    items(links, |b| {
        format!(r#"<a href="{}" class="btn">{}</a>"#, attr(&b.link), text(&b.text))
    })
}

/// HTML fragment for a single block.
pub fn block_to_html(block: &Block) -> String {
    match &block.content {
        BlockContent::Heading(heading) => {
            let level = heading.level.clamp(1, 6);
            format!("<h{level}>{}</h{level}>", text(&heading.text))
        }
        BlockContent::Paragraph(paragraph) => format!("<p>{}</p>", text(&paragraph.text)),
        BlockContent::Image(image) => {
            let mut size = String::new();
            if let Some(width) = image.width {
                size.push_str(&format!(r#" width="{width}""#));
            }
            if let Some(height) = image.height {
                size.push_str(&format!(r#" height="{height}""#));
            }
            let caption = image
                .caption
                .as_deref()
                .filter(|c| !c.is_empty())
                .map(|c| format!("<figcaption>{}</figcaption>", text(c)))
                .unwrap_or_default();
            format!(
                r#"<figure><img src="{}" alt="{}"{size} />{caption}</figure>"#,
                attr(&image.src),
                attr(&image.alt)
            )
        }
        BlockContent::Code(code) => format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            attr(&code.language),
            text(&code.code)
        ),
        BlockContent::Mermaid(mermaid) => {
            format!(r#"<pre class="mermaid">{}</pre>"#, text(&mermaid.code))
        }
        BlockContent::Blockquote(quote) => {
            let cite = quote
                .author
                .as_deref()
                .filter(|a| !a.is_empty())
                .map(|a| format!("<cite>— {}</cite>", text(a)))
                .unwrap_or_default();
            format!("<blockquote><p>{}</p>{cite}</blockquote>", text(&quote.text))
        }
        BlockContent::List(list) => format!(
            "<ul>{}</ul>",
            items(&list.items, |item| format!("<li>{}</li>", text(item)))
        ),
        BlockContent::OrderedList(list) => {
            let start = if list.start == 1 {
                String::new()
            } else {
                format!(r#" start="{}""#, list.start)
            };
            format!(
                "<ol{start}>{}</ol>",
                items(&list.items, |item| format!("<li>{}</li>", text(item)))
            )
        }
        BlockContent::TaskList(tasks) => format!(
            r#"<ul class="task-list">{}</ul>"#,
            items(&tasks.items, |task| format!(
                r#"<li><input type="checkbox" disabled{} /> {}</li>"#,
                if task.checked { " checked" } else { "" },
                text(&task.text)
            ))
        ),
        BlockContent::Table(table) => {
            let head = items(&table.headers, |h| format!("<th>{}</th>", text(h)));
            let body = items(&table.rows, |row| {
                format!("<tr>{}</tr>", items(row, |cell| format!("<td>{}</td>", text(cell))))
            });
            format!("<table><thead><tr>{head}</tr></thead><tbody>{body}</tbody></table>")
        }
        BlockContent::Divider(_) => "<hr />".to_string(),
        BlockContent::HtmlBlock(html) => html.html.clone(),
        BlockContent::Button(button) => format!(
            r#"<a href="{}" class="btn btn-{}">{}</a>"#,
            attr(if button.link.is_empty() { "#" } else { button.link.as_str() }),
            attr(&button.variant),
            text(&button.text)
        ),
        BlockContent::Card(card) => {
            let image = card
                .image_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .map(|url| format!(r#"<img src="{}" alt="" />"#, attr(url)))
                .unwrap_or_default();
            format!(
                r#"<div class="card">{image}<div class="card-content"><h3>{}</h3><p>{}</p></div></div>"#,
                text(&card.title),
                text(&card.description)
            )
        }
        BlockContent::Alert(alert) => format!(
            r#"<div class="alert alert-{}" role="alert"><strong>{}</strong> {}</div>"#,
            alert.level.as_str(),
            text(&alert.title),
            text(&alert.text)
        ),
        BlockContent::Spacer(spacer) => {
            format!(r#"<div class="spacer" style="height: {}"></div>"#, attr(&spacer.height))
        }
        BlockContent::Columns(columns) => format!(
            r#"<div class="columns">{}</div>"#,
            items(&columns.columns, |c| format!(r#"<div class="column">{}</div>"#, text(c)))
        ),
        BlockContent::Banner(banner) => format!(
            r#"<section class="banner" style="background-color: {}; color: {}"><h2>{}</h2><p class="subtitle">{}</p><p>{}</p>{}</section>"#,
            attr(&banner.background_color),
            attr(&banner.text_color),
            text(&banner.title),
            text(&banner.subtitle),
            text(&banner.description),
            buttons(&banner.buttons)
        ),
        BlockContent::Hero(hero) => format!(
            r#"<section class="hero" style="background-color: {}; text-align: {}"><h1>{}</h1><p class="subtitle">{}</p><p>{}</p>{}</section>"#,
            attr(&hero.background_color),
            attr(&hero.text_align),
            text(&hero.title),
            text(&hero.subtitle),
            text(&hero.description),
            buttons(&hero.buttons)
        ),
        BlockContent::Gallery(gallery) => format!(
            r#"<div class="gallery">{}</div>"#,
            items(&gallery.images, |img| format!(
                r#"<img src="{}" alt="{}" />"#,
                attr(&img.src),
                attr(&img.alt)
            ))
        ),
        BlockContent::Testimonial(t) => format!(
            r#"<figure class="testimonial"><blockquote>{}</blockquote><figcaption>{}, {}</figcaption></figure>"#,
            text(&t.quote),
            text(&t.author),
            text(&t.position)
        ),
        BlockContent::Video(video) => format!(
            r#"<video src="{}" title="{}" controls{}></video>"#,
            attr(&video.src),
            attr(&video.title),
            if video.autoplay { " autoplay" } else { "" }
        ),
        other @ (BlockContent::Grid(_) | BlockContent::Chart(_) | BlockContent::Pricing(_)) => {
            structured_comment(other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{
        BlockId, BlockKind, HeadingContent, HtmlBlockContent, ParagraphContent, TableContent,
        default_content,
    };

    fn block(content: BlockContent) -> Block {
        Block::new(BlockId::new(1), content, 0)
    }

    #[test]
    fn test_fragments_joined_by_single_newline() {
        let doc = vec![
            Block::new(
                BlockId::new(1),
                BlockContent::Heading(HeadingContent {
                    level: 1,
                    text: "Title".to_string(),
                }),
                0,
            ),
            Block::new(
                BlockId::new(2),
                BlockContent::Paragraph(ParagraphContent {
                    text: "Hello".to_string(),
                }),
                1,
            ),
        ];
        assert_eq!(to_html(&doc), "<h1>Title</h1>\n<p>Hello</p>");
    }

    #[test]
    fn test_text_is_escaped_but_html_block_is_verbatim() {
        let escaped = block_to_html(&block(BlockContent::Paragraph(ParagraphContent {
            text: "a < b & c".to_string(),
        })));
        assert_eq!(escaped, "<p>a &lt; b &amp; c</p>");

        let raw = block_to_html(&block(BlockContent::HtmlBlock(HtmlBlockContent {
            name: "raw".to_string(),
            html: "<b>bold</b>".to_string(),
        })));
        assert_eq!(raw, "<b>bold</b>");
    }

    #[test]
    fn test_table_html() {
        let html = block_to_html(&block(BlockContent::Table(TableContent {
            headers: vec!["H1".to_string()],
            rows: vec![vec!["x".to_string()]],
        })));
        assert_eq!(
            html,
            "<table><thead><tr><th>H1</th></tr></thead><tbody><tr><td>x</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_chart_has_no_html_form() {
        let html = block_to_html(&block(default_content(BlockKind::Chart, None)));
        assert!(html.starts_with("<!-- docblocks:chart "), "{html}");
    }

    #[test]
    fn test_every_default_block_renders() {
        for kind in BlockKind::ALL {
            let html = block_to_html(&block(default_content(*kind, None)));
            assert!(!html.is_empty(), "{kind} rendered nothing");
        }
    }

    #[test]
    fn test_hidden_blocks_are_skipped() {
        let mut hidden = block(default_content(BlockKind::Divider, None));
        hidden.hidden = true;
        assert_eq!(to_html(&[hidden]), "");
    }
}
