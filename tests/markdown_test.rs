//! Integration tests for Markdown rendering of decoded block trees.

use serde_json::{json, Value};
use unnotion::render::{render_blocks, to_markdown, to_markdown_batch, to_markdown_with_stats};
use unnotion::{blocks_from_str, Block, Document, Error, Page, RenderOptions};

fn text(content: &str) -> Value {
    json!({ "type": "text", "plain_text": content, "text": { "content": content } })
}

fn block(id: &str, kind: &str, payload: Value) -> Value {
    let mut value = json!({ "object": "block", "id": id, "type": kind, "has_children": false });
    value[kind] = payload;
    value
}

fn text_block(id: &str, kind: &str, content: &str) -> Value {
    block(id, kind, json!({ "rich_text": [text(content)] }))
}

fn with_children(mut parent: Value, children: Vec<Value>) -> Value {
    parent["has_children"] = json!(true);
    parent["children"] = Value::Array(children);
    parent
}

fn decode(blocks: Vec<Value>) -> Vec<Block> {
    blocks_from_str(&Value::Array(blocks).to_string()).unwrap()
}

fn sample_page() -> Page {
    serde_json::from_value(json!({
        "object": "page",
        "id": "page-1",
        "properties": {
            "Name": { "id": "title", "type": "title", "title": [text("Weekly")] },
            "Publish Date": { "id": "a", "type": "date", "date": { "start": "2024-01-05", "end": null } },
            "Tags": { "id": "b", "type": "multi_select",
                      "multi_select": [{ "name": "rust" }, { "name": "notes" }] }
        }
    }))
    .unwrap()
}

fn sample_blocks() -> Vec<Block> {
    let link = json!({
        "type": "text",
        "plain_text": "docs",
        "href": "https://docs.rs",
        "text": { "content": "docs", "link": { "url": "https://docs.rs" } },
        "annotations": { "bold": true, "color": "default" }
    });

    decode(vec![
        text_block("h1", "heading_1", "Notes"),
        block("p1", "paragraph", json!({ "rich_text": [text("See "), link] })),
        text_block("b1", "bulleted_list_item", "one"),
        text_block("b2", "bulleted_list_item", "two"),
        text_block("n1", "numbered_list_item", "first"),
        block("t1", "to_do", json!({ "rich_text": [text("done")], "checked": true })),
        with_children(
            block("tbl", "table", json!({ "table_width": 2, "has_column_header": true })),
            vec![
                block("r1", "table_row", json!({ "cells": [[text("A")], [text("B")]] })),
                block("r2", "table_row", json!({ "cells": [[text("1")], [text("2")]] })),
            ],
        ),
        block("cd1", "child_database", json!({ "title": "Tasks" })),
    ])
}

#[test]
fn test_full_document() {
    let doc = Document::from_page(&sample_page(), sample_blocks());
    let markdown = to_markdown(&doc, &RenderOptions::default()).unwrap();

    let expected = "---\n\
                    publish_date: 2024-01-05\n\
                    tags: rust, notes\n\
                    ---\n\n\
                    # Notes\n\n\
                    See **[docs](https://docs.rs)**\n\n\
                    * one\n\
                    * two\n\n\
                    1. first\n\n\
                    - [x] done\n\n \
                    | A | B | \n \
                    | ---- | ---- | \n \
                    | 1 | 2 | \n\n\
                    <!-- child_database cd1 -->\n";
    assert_eq!(markdown, expected);
    assert_eq!(doc.title.as_deref(), Some("Weekly"));
}

#[test]
fn test_raw_rendering_keeps_block_separators() {
    let blocks = decode(vec![
        text_block("b1", "bulleted_list_item", "one"),
        text_block("b2", "bulleted_list_item", "two"),
    ]);
    assert_eq!(render_blocks(&blocks, "doc").unwrap(), "* one\n\n* two\n\n");

    let doc = Document::new("doc", blocks);
    let raw = to_markdown(&doc, &RenderOptions::raw()).unwrap();
    assert_eq!(raw, "* one\n\n* two\n\n");
}

#[test]
fn test_nested_heading_resets_depth() {
    let code = |id: &str, content: &str| {
        block(id, "code", json!({ "rich_text": [text(content)], "language": "plain text" }))
    };

    let tree = decode(vec![with_children(
        text_block("a", "bulleted_list_item", "a"),
        vec![with_children(
            text_block("b", "bulleted_list_item", "b"),
            vec![with_children(
                text_block("c", "bulleted_list_item", "c"),
                vec![
                    code("before", "x\ny"),
                    text_block("h", "heading_1", "Top"),
                    code("after", "p\nq"),
                ],
            )],
        )],
    )]);

    let rendered = render_blocks(&tree, "doc").unwrap();
    assert_eq!(
        rendered,
        "* a\n\n* b\n\n* c\n\n\
         ```plain_text\n\t\t\tx\n\t\t\ty\n\t\t\t```\n\n\
         # Top\n\n\
         ```plain_text\np\nq\n```\n\n"
    );

    let doc = Document::new("doc", tree);
    let result = to_markdown_with_stats(&doc, &RenderOptions::raw()).unwrap();
    assert_eq!(result.stats.depth_reset_count, 1);
    assert_eq!(result.stats.block_count, 6);
    assert_eq!(result.stats.code_count, 2);
}

#[test]
fn test_unknown_mention_is_dropped() {
    let blocks = decode(vec![block(
        "p",
        "paragraph",
        json!({ "rich_text": [
            text("Due "),
            { "type": "mention", "plain_text": "@Today",
              "mention": { "type": "template_mention", "template_mention": {} } },
            text("!")
        ]}),
    )]);
    assert_eq!(render_blocks(&blocks, "doc").unwrap(), "Due !\n\n");
}

#[test]
fn test_malformed_table_reports_block() {
    let blocks = decode(vec![with_children(
        block("tbl", "table", json!({ "table_width": 1 })),
        vec![
            block("r1", "table_row", json!({ "cells": [[text("A")]] })),
            text_block("stray", "paragraph", "oops"),
        ],
    )]);

    let err = render_blocks(&blocks, "doc").unwrap_err();
    assert!(matches!(err, Error::MalformedTable { .. }));
    assert_eq!(err.block_id(), Some("stray"));
}

#[test]
fn test_batch_isolates_failures() {
    let good = Document::new("good", decode(vec![text_block("p", "paragraph", "ok")]));
    let bad = Document::new("bad", decode(vec![block("img", "image", json!({ "caption": [] }))]));
    let also_good = Document::new("also", decode(vec![block("d", "divider", json!({}))]));

    let options = RenderOptions::new().with_frontmatter(false);
    let results = to_markdown_batch(&[good, bad, also_good], &options);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_deref().unwrap(), "ok\n");
    assert!(matches!(
        results[1],
        Err(Error::MissingField { field: "url", .. })
    ));
    assert_eq!(results[2].as_deref().unwrap(), "---\n");
}

#[test]
fn test_rendering_is_deterministic() {
    let doc = Document::from_page(&sample_page(), sample_blocks());
    let first = to_markdown(&doc, &RenderOptions::default()).unwrap();
    let second = to_markdown(&doc, &RenderOptions::default()).unwrap();
    assert_eq!(first, second);
}
