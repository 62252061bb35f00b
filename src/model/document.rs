//! Document-level types.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Block, Page};
use crate::properties::format_property;

static KEY_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s\-]+").expect("valid key separator regex")
});

/// A document ready to be rendered: metadata plus a fully materialized
/// block tree.
#[derive(Debug, Clone)]
pub struct Document {
    /// Source page id
    pub id: String,

    /// Page title, if any
    pub title: Option<String>,

    /// Key-value header written before the body
    pub frontmatter: Frontmatter,

    /// Root blocks with children resolved
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a document without metadata.
    pub fn new(id: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            id: id.into(),
            title: None,
            frontmatter: Frontmatter::new(),
            blocks,
        }
    }

    /// Build a document from a page object and its root blocks.
    pub fn from_page(page: &Page, blocks: Vec<Block>) -> Self {
        Self {
            id: page.id.clone(),
            title: page.title(),
            frontmatter: Frontmatter::from_page(page),
            blocks,
        }
    }

    /// Set the title and return self.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Total number of blocks, including nested ones.
    pub fn block_count(&self) -> usize {
        self.blocks.iter().map(Block::total_blocks).sum()
    }

    /// Check if the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Ordered key → scalar mapping rendered as a `---` delimited header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontmatter {
    entries: Vec<(String, String)>,
}

impl Frontmatter {
    /// Create an empty frontmatter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every formattable property of a page. Title properties are
    /// skipped; the title is exposed on [`Document`] instead.
    pub fn from_page(page: &Page) -> Self {
        let mut frontmatter = Self::new();
        for (name, value) in &page.properties {
            if let Some(scalar) = format_property(value) {
                frontmatter.insert(name, scalar);
            }
        }
        frontmatter
    }

    /// Insert or replace an entry, keeping first-insertion order.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a value by its original key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the header block, keys in snake_case, followed by one blank
    /// line.
    pub fn to_header(&self) -> String {
        let mut out = String::from("---\n");
        for (key, value) in &self.entries {
            out.push_str(&snake_case(key));
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out.push_str("---\n\n");
        out
    }
}

/// Lowercase a property name and join its words with underscores.
pub fn snake_case(key: &str) -> String {
    KEY_SEPARATOR
        .replace_all(key.trim(), "_")
        .to_lowercase()
}
