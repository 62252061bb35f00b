//! Loading exported API responses from JSON.
//!
//! Block trees can be read either as the API's children listing
//! (`{"object": "list", "results": [...]}`) or as a bare array of blocks.
//! Blocks may carry their resolved `children` inline.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{Block, Document, Page};

/// One page of a paginated API listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    /// Items on this page
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,

    /// Cursor for the next page
    #[serde(default)]
    pub next_cursor: Option<String>,

    /// Whether more pages follow
    #[serde(default)]
    pub has_more: bool,
}

/// Parse root blocks from a children listing or a bare array.
pub fn blocks_from_str(json: &str) -> Result<Vec<Block>> {
    let value: Value = serde_json::from_str(json)?;
    blocks_from_value(value)
}

/// Parse root blocks from an already decoded JSON value.
pub fn blocks_from_value(value: Value) -> Result<Vec<Block>> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(ref map) if map.contains_key("results") => {
            let listing: Listing<Block> = serde_json::from_value(value)?;
            if listing.has_more {
                log::warn!("Block listing is truncated; only the first page is used");
            }
            Ok(listing.results)
        }
        _ => Err(Error::Other(
            "Expected a JSON array of blocks or an object with `results`".to_string(),
        )),
    }
}

/// Parse a page object.
pub fn page_from_str(json: &str) -> Result<Page> {
    Ok(serde_json::from_str(json)?)
}

/// Build a document from exported files.
///
/// With a page file the document takes its id, title and frontmatter from
/// the page; otherwise the id is the blocks file stem and there is no
/// metadata.
pub fn document_from_files<P, Q>(page_path: Option<P>, blocks_path: Q) -> Result<Document>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let blocks_path = blocks_path.as_ref();
    let blocks = blocks_from_str(&fs::read_to_string(blocks_path)?)?;
    log::debug!("Loaded {} root blocks from {}", blocks.len(), blocks_path.display());

    match page_path {
        Some(path) => {
            let page = page_from_str(&fs::read_to_string(path.as_ref())?)?;
            Ok(Document::from_page(&page, blocks))
        }
        None => {
            let id = blocks_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Document::new(id, blocks))
        }
    }
}
