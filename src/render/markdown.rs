//! Markdown rendering for block trees.

use percent_encoding::percent_decode_str;
use rayon::prelude::*;
use url::Url;

use crate::error::{Error, Result};
use crate::model::{Block, BlockKind, Document, Media, TableRow};

use super::{normalize, render_rich_text, RenderOptions, RenderResult, RenderStats};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let mut options = options.clone();
    options.collect_stats = true;
    let renderer = MarkdownRenderer::new(options);
    renderer.render_with_stats(doc)
}

/// Convert many documents in parallel.
///
/// Results are returned in input order; a failure in one document does not
/// affect the others.
pub fn to_markdown_batch(docs: &[Document], options: &RenderOptions) -> Vec<Result<String>> {
    docs.par_iter()
        .map(|doc| {
            to_markdown(doc, options).inspect_err(|e| {
                log::warn!("Failed to render document {}: {}", doc.id, e);
            })
        })
        .collect()
}

/// Render sibling blocks without frontmatter or normalization.
pub fn render_blocks(blocks: &[Block], document_id: &str) -> Result<String> {
    let mut renderer = MarkdownRenderer::new(RenderOptions::default());
    let mut output = String::new();
    for block in blocks {
        renderer.render_block(&mut output, block, 0, document_id)?;
    }
    Ok(output)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    stats: RenderStats,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: RenderStats::new(),
        }
    }

    /// Render a document to Markdown.
    pub fn render(mut self, doc: &Document) -> Result<String> {
        let body = self.render_body(doc)?;
        Ok(self.with_header(doc, body))
    }

    /// Render a document to Markdown with statistics.
    ///
    /// Word and character counts cover the body only, not the frontmatter.
    pub fn render_with_stats(mut self, doc: &Document) -> Result<RenderResult> {
        self.options.collect_stats = true;
        let body = self.render_body(doc)?;
        self.stats.count_text(&body);

        let content = self.with_header(doc, body);
        Ok(RenderResult::new(content, doc.title.clone(), self.stats))
    }

    fn render_body(&mut self, doc: &Document) -> Result<String> {
        let mut body = String::new();
        for block in &doc.blocks {
            self.render_block(&mut body, block, 0, &doc.id)?;
        }

        if self.options.normalize {
            body = normalize(&body);
        }
        Ok(body)
    }

    fn with_header(&self, doc: &Document, body: String) -> String {
        if !self.options.include_frontmatter {
            return body;
        }
        let mut output = doc.frontmatter.to_header();
        output.push_str(&body);
        output
    }

    fn render_block(
        &mut self,
        output: &mut String,
        block: &Block,
        depth: usize,
        document_id: &str,
    ) -> Result<()> {
        if self.options.collect_stats {
            self.stats.add_block(&block.kind);
        }

        let mut rendered = format_block(block)?;
        rendered.push_str("\n\n");

        if let BlockKind::Code(_) = block.kind {
            rendered = reindent(&rendered, depth);
        }

        if block.kind.is_subpage() {
            log::debug!(
                "Skipping body of sub-page {} in document {}",
                block.id,
                document_id
            );
        } else if !block.children.is_empty() {
            if let BlockKind::Table(_) = block.kind {
                rendered = self.render_table(block)?;
            } else {
                let mut child_depth = depth + 1;
                for child in &block.children {
                    child_depth = self.depth_for(child, child_depth, document_id);
                    self.render_block(&mut rendered, child, child_depth, document_id)?;
                }
            }
        } else if block.has_children {
            log::warn!(
                "Block {} in document {} has children that were not fetched",
                block.id,
                document_id
            );
        }

        output.push_str(&rendered);
        Ok(())
    }

    /// Depth for the next child. A level 1 heading nested under another block
    /// is moved back to the top level together with every later sibling.
    fn depth_for(&mut self, child: &Block, depth: usize, document_id: &str) -> usize {
        if !child.kind.is_heading_1() || depth == 0 {
            return depth;
        }

        log::debug!(
            "Heading {} nested at depth {} in document {}, resetting to top level",
            child.id,
            depth,
            document_id
        );
        if self.options.collect_stats {
            self.stats.add_depth_reset();
        }
        0
    }

    fn render_table(&mut self, table: &Block) -> Result<String> {
        let mut output = String::new();

        for (i, row) in table.children.iter().enumerate() {
            if self.options.collect_stats {
                self.stats.add_block(&row.kind);
            }
            let cells = match row.kind {
                BlockKind::TableRow(ref r) => render_cells(r),
                _ => {
                    return Err(Error::MalformedTable {
                        block_id: row.id.clone(),
                    })
                }
            };

            push_table_line(&mut output, &cells);

            // Separator after header row
            if i == 0 {
                let separator = vec!["----".to_string(); cells.len()];
                push_table_line(&mut output, &separator);
            }
        }

        output.push('\n');
        Ok(output)
    }
}

/// Render one block, without children, according to its type.
fn format_block(block: &Block) -> Result<String> {
    let text = match block.kind {
        BlockKind::Paragraph(ref b) => render_rich_text(&b.rich_text, false),
        BlockKind::Heading1(ref b) => format!("# {}", render_rich_text(&b.rich_text, false)),
        BlockKind::Heading2(ref b) => format!("## {}", render_rich_text(&b.rich_text, false)),
        BlockKind::Heading3(ref b) => format!("### {}", render_rich_text(&b.rich_text, false)),
        BlockKind::Callout(ref c) => {
            let text = render_rich_text(&c.rich_text, false);
            match c.emoji() {
                Some(icon) => format!("{} {}", icon, text),
                None => text,
            }
        }
        BlockKind::Quote(ref b) => format!("> {}", render_rich_text(&b.rich_text, false)),
        BlockKind::BulletedListItem(ref b) | BlockKind::Toggle(ref b) => {
            format!("* {}", render_rich_text(&b.rich_text, false))
        }
        BlockKind::NumberedListItem(ref b) => {
            format!("1. {}", render_rich_text(&b.rich_text, false))
        }
        BlockKind::ToDo(ref t) => format!(
            "- {} {}",
            if t.checked { "[x]" } else { "[ ]" },
            render_rich_text(&t.rich_text, false)
        ),
        BlockKind::Code(ref c) => format!(
            "```{}\n{}\n```",
            c.language.replace(' ', "_"),
            render_rich_text(&c.rich_text, false)
        ),
        BlockKind::Embed(ref m) | BlockKind::Video(ref m) => embed_html(require_url(block, m)?),
        BlockKind::Image(ref m) | BlockKind::Bookmark(ref m) => {
            let url = require_url(block, m)?;
            format!("![{}]({})", render_rich_text(&m.caption, false), url)
        }
        BlockKind::Equation(ref e) => format!("$$ {} $$", e.expression),
        BlockKind::Divider => "---".to_string(),
        BlockKind::File(ref m) => {
            let url = require_url(block, m)?;
            format!("[📎 {}]({})", file_name(url), url)
        }
        BlockKind::Table(_) | BlockKind::TableRow(_) | BlockKind::Unsupported(_) => {
            if let BlockKind::Unsupported(ref name) = block.kind {
                log::warn!("Unsupported block type {} ({})", name, block.id);
            }
            format!("<!-- {} {} -->", block.type_name(), block.id)
        }
    };
    Ok(text)
}

fn require_url<'a>(block: &Block, media: &'a Media) -> Result<&'a str> {
    media.target().ok_or_else(|| Error::MissingField {
        block_id: block.id.clone(),
        field: "url",
    })
}

fn render_cells(row: &TableRow) -> Vec<String> {
    row.cells
        .iter()
        .map(|cell| render_rich_text(cell, false))
        .collect()
}

fn push_table_line(output: &mut String, cells: &[String]) {
    output.push_str(" | ");
    output.push_str(&cells.join(" | "));
    output.push_str(" | \n");
}

/// Indent every line after the first by one tab per depth level.
fn reindent(rendered: &str, depth: usize) -> String {
    let indent = format!("\n{}", "\t".repeat(depth));
    let mut out = rendered.trim_end_matches('\n').replace('\n', &indent);
    out.push_str("\n\n");
    out
}

/// HTML for embedded content: a looping video for `.webm` files, otherwise
/// an iframe served over https.
fn embed_html(url: &str) -> String {
    if url_path(url).ends_with(".webm") {
        format!(
            "<p><video playsinline autoplay muted loop controls src=\"{}\"></video></p>",
            url
        )
    } else {
        format!(
            "<p><div class=\"res_emb_block\">\n\
             <iframe width=\"640\" height=\"480\" src=\"{}\" frameborder=\"0\" allowfullscreen></iframe>\n\
             </div></p>",
            url.replace("http://", "https://")
        )
    }
}

/// URL without query string or fragment.
fn url_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .to_string(),
    }
}

/// Percent-decoded last path segment of a URL.
fn file_name(url: &str) -> String {
    let path = url_path(url);
    let name = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    percent_decode_str(name).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Callout, Code, Equation, Icon, TextBlock, ToDo};

    fn block(id: &str, kind: BlockKind) -> Block {
        Block::new(id, kind)
    }

    fn text(id: &str, kind: fn(TextBlock) -> BlockKind, content: &str) -> Block {
        block(id, kind(TextBlock::plain(content)))
    }

    fn render(blocks: &[Block]) -> String {
        render_blocks(blocks, "doc").unwrap()
    }

    #[test]
    fn test_simple_blocks() {
        let blocks = [
            text("1", BlockKind::Heading1, "Title"),
            text("2", BlockKind::Heading2, "Sub"),
            text("3", BlockKind::Heading3, "Minor"),
            text("4", BlockKind::Paragraph, "Body"),
            text("5", BlockKind::Quote, "Wise"),
            block("6", BlockKind::Divider),
        ];
        assert_eq!(
            render(&blocks),
            "# Title\n\n## Sub\n\n### Minor\n\nBody\n\n> Wise\n\n---\n\n"
        );
    }

    #[test]
    fn test_list_markers() {
        let blocks = [
            text("1", BlockKind::BulletedListItem, "a"),
            text("2", BlockKind::Toggle, "b"),
            text("3", BlockKind::NumberedListItem, "c"),
            text("4", BlockKind::NumberedListItem, "d"),
        ];
        assert_eq!(render(&blocks), "* a\n\n* b\n\n1. c\n\n1. d\n\n");
    }

    #[test]
    fn test_to_do() {
        let done = block(
            "1",
            BlockKind::ToDo(ToDo {
                rich_text: TextBlock::plain("Ship").rich_text,
                checked: true,
            }),
        );
        let open = block(
            "2",
            BlockKind::ToDo(ToDo {
                rich_text: TextBlock::plain("Test").rich_text,
                checked: false,
            }),
        );
        assert_eq!(render(&[done, open]), "- [x] Ship\n\n- [ ] Test\n\n");
    }

    #[test]
    fn test_callout() {
        let with_icon = block(
            "1",
            BlockKind::Callout(Callout {
                rich_text: TextBlock::plain("Note").rich_text,
                icon: Some(Icon {
                    emoji: Some("💡".to_string()),
                    ..Default::default()
                }),
            }),
        );
        let bare = block(
            "2",
            BlockKind::Callout(Callout {
                rich_text: TextBlock::plain("Plain").rich_text,
                icon: None,
            }),
        );
        assert_eq!(render(&[with_icon, bare]), "💡 Note\n\nPlain\n\n");
    }

    #[test]
    fn test_code_language_and_reindent() {
        let code = block(
            "code",
            BlockKind::Code(Code {
                rich_text: TextBlock::plain("int main() {\n  return 0;\n}").rich_text,
                language: "c plus plus".to_string(),
                caption: Vec::new(),
            }),
        );
        assert_eq!(
            render(&[code.clone()]),
            "```c_plus_plus\nint main() {\n  return 0;\n}\n```\n\n"
        );

        let parent = text("p", BlockKind::BulletedListItem, "step").with_children(vec![code]);
        assert_eq!(
            render(&[parent]),
            "* step\n\n```c_plus_plus\n\tint main() {\n\t  return 0;\n\t}\n\t```\n\n"
        );
    }

    #[test]
    fn test_equation_block() {
        let eq = block(
            "1",
            BlockKind::Equation(Equation {
                expression: "E = mc^2".to_string(),
            }),
        );
        assert_eq!(render(&[eq]), "$$ E = mc^2 $$\n\n");
    }

    #[test]
    fn test_media_blocks() {
        let mut captioned = Media::external("https://img.example/cat.png");
        captioned.caption = TextBlock::plain("A cat").rich_text;
        let blocks = [
            block("1", BlockKind::Image(captioned)),
            block("2", BlockKind::Bookmark(Media {
                url: Some("https://example.com".to_string()),
                ..Default::default()
            })),
            block(
                "3",
                BlockKind::File(Media::external(
                    "https://files.example/dir/My%20Report.pdf?X-Amz-Signature=abc",
                )),
            ),
        ];
        assert_eq!(
            render(&blocks),
            "![A cat](https://img.example/cat.png)\n\n\
             ![](https://example.com)\n\n\
             [📎 My Report.pdf](https://files.example/dir/My%20Report.pdf?X-Amz-Signature=abc)\n\n"
        );
    }

    #[test]
    fn test_embed_and_video() {
        let webm = block(
            "1",
            BlockKind::Video(Media::external("https://cdn.example/clip.webm?token=1")),
        );
        let iframe = block(
            "2",
            BlockKind::Embed(Media {
                url: Some("http://player.example/v/42".to_string()),
                ..Default::default()
            }),
        );

        let out = render(&[webm, iframe]);
        assert!(out.starts_with(
            "<p><video playsinline autoplay muted loop controls \
             src=\"https://cdn.example/clip.webm?token=1\"></video></p>\n\n"
        ));
        assert!(out.contains("src=\"https://player.example/v/42\""));
        assert!(out.contains("<p><div class=\"res_emb_block\">\n<iframe width=\"640\""));
    }

    #[test]
    fn test_missing_url_is_fatal() {
        let image = block("img-1", BlockKind::Image(Media::default()));
        let err = render_blocks(&[image], "doc").unwrap_err();
        assert!(matches!(err, Error::MissingField { ref block_id, field: "url" } if block_id == "img-1"));
    }

    #[test]
    fn test_unsupported_block_comment() {
        let unknown = block("abc-123", BlockKind::Unsupported("child_database".to_string()));
        assert_eq!(render(&[unknown]), "<!-- child_database abc-123 -->\n\n");
    }

    #[test]
    fn test_subpage_body_not_inlined() {
        let sub = block("sub", BlockKind::Unsupported("child_page".to_string()))
            .with_children(vec![text("s1", BlockKind::Paragraph, "Sub-page body")]);
        let blocks = [text("p", BlockKind::Paragraph, "Parent body"), sub];

        assert_eq!(
            render(&blocks),
            "Parent body\n\n<!-- child_page sub -->\n\n"
        );
    }

    #[test]
    fn test_table() {
        let table = block("t", BlockKind::Table(Default::default())).with_children(vec![
            block("r1", BlockKind::TableRow(TableRow::from_strings(["A", "B"]))),
            block("r2", BlockKind::TableRow(TableRow::from_strings(["1", "2"]))),
        ]);
        assert_eq!(
            render(&[table]),
            " | A | B | \n | ---- | ---- | \n | 1 | 2 | \n\n"
        );
    }

    #[test]
    fn test_table_with_foreign_child_is_fatal() {
        let table = block("t", BlockKind::Table(Default::default())).with_children(vec![
            block("r1", BlockKind::TableRow(TableRow::from_strings(["A"]))),
            text("p1", BlockKind::Paragraph, "oops"),
        ]);
        let err = render_blocks(&[table], "doc").unwrap_err();
        assert_eq!(err.block_id(), Some("p1"));
    }

    #[test]
    fn test_empty_table_falls_back_to_comment() {
        let table = block("t", BlockKind::Table(Default::default()));
        assert_eq!(render(&[table]), "<!-- table t -->\n\n");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("https://a.example/x/y%C3%A9.txt?sig=1#frag"), "yé.txt");
        assert_eq!(file_name("not a url/report.pdf?x"), "report.pdf");
    }

    #[test]
    fn test_stats_collection() {
        let doc = Document::new(
            "d",
            vec![
                text("1", BlockKind::Heading1, "T"),
                text("2", BlockKind::BulletedListItem, "a"),
                block("3", BlockKind::Unsupported("pdf".to_string())),
            ],
        );
        let result = to_markdown_with_stats(&doc, &RenderOptions::new()).unwrap();
        assert_eq!(result.stats.block_count, 3);
        assert_eq!(result.stats.heading_count, 1);
        assert_eq!(result.stats.list_item_count, 1);
        assert_eq!(result.stats.unsupported_count, 1);
    }

    #[test]
    fn test_text_counts_exclude_frontmatter() {
        let mut doc = Document::new("d", vec![text("1", BlockKind::Paragraph, "Hello world")]);
        doc.frontmatter.insert("Status", "In review today");

        let result = to_markdown_with_stats(&doc, &RenderOptions::new()).unwrap();
        assert!(result.content.starts_with("---\nstatus: In review today\n---\n"));
        assert!(result.content.ends_with("Hello world\n"));
        assert_eq!(result.stats.word_count, 2);
        assert_eq!(result.stats.char_count, 10);
    }
}
