//! # unnotion
//!
//! Block-based Notion document export to Markdown.
//!
//! This library decodes block trees and page objects returned by the Notion
//! API and renders them to Markdown with a frontmatter header built from the
//! page's properties.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unnotion::{document_from_files, render};
//!
//! fn main() -> unnotion::Result<()> {
//!     // Load an exported page and its block tree
//!     let doc = document_from_files(Some("page.json"), "blocks.json")?;
//!
//!     // Convert to Markdown
//!     let options = render::RenderOptions::default();
//!     let markdown = render::to_markdown(&doc, &options)?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typed block model**: closed enums with a catch-all for unknown types
//! - **Rich text**: annotations, links, equations and mentions
//! - **Frontmatter**: page properties as `snake_case` key-value pairs
//! - **Parallel processing**: Uses Rayon for batch rendering
//! - **Remote fetch** (`fetch` feature): paginated tree retrieval with
//!   bounded concurrency

pub mod error;
pub mod load;
pub mod model;
pub mod properties;
pub mod render;
pub mod slug;

#[cfg(feature = "fetch")]
pub mod fetch;

// Re-export commonly used types
pub use error::{Error, Result};
pub use load::{blocks_from_str, document_from_files, page_from_str, Listing};
pub use model::{
    Annotations, Block, BlockKind, Document, Frontmatter, MentionKind, Page, PropertyValue,
    RichText, SpanKind,
};
pub use properties::format_property;
pub use render::{RenderOptions, RenderResult, RenderStats};
pub use slug::slugify;

#[cfg(feature = "fetch")]
pub use fetch::NotionClient;

/// Convert a block listing (or bare block array) to Markdown.
///
/// No page is available, so the frontmatter header is empty.
///
/// # Example
///
/// ```
/// let json = r#"[{"id": "a", "type": "divider", "divider": {}}]"#;
/// let markdown = unnotion::to_markdown(json).unwrap();
/// assert_eq!(markdown, "---\n---\n\n---\n");
/// ```
pub fn to_markdown(blocks_json: &str) -> Result<String> {
    to_markdown_with_options(blocks_json, &RenderOptions::default())
}

/// Convert a block listing to Markdown with custom options.
///
/// # Example
///
/// ```
/// use unnotion::{to_markdown_with_options, RenderOptions};
///
/// let json = r#"{"results": [{"id": "a", "type": "divider", "divider": {}}]}"#;
/// let options = RenderOptions::new().with_frontmatter(false);
/// assert_eq!(to_markdown_with_options(json, &options).unwrap(), "---\n");
/// ```
pub fn to_markdown_with_options(blocks_json: &str, options: &RenderOptions) -> Result<String> {
    let doc = Document::new("", blocks_from_str(blocks_json)?);
    render::to_markdown(&doc, options)
}

/// Convert a page object and its block listing to Markdown.
pub fn page_to_markdown(page_json: &str, blocks_json: &str) -> Result<String> {
    let page = page_from_str(page_json)?;
    let doc = Document::from_page(&page, blocks_from_str(blocks_json)?);
    render::to_markdown(&doc, &RenderOptions::default())
}
