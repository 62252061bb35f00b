//! Rendering result with statistics.

use serde::{Deserialize, Serialize};

use crate::model::BlockKind;

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered Markdown
    pub content: String,

    /// Document title, if any
    pub title: Option<String>,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, title: Option<String>, stats: RenderStats) -> Self {
        Self {
            content,
            title,
            stats,
        }
    }
}

/// Statistics collected while rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderStats {
    /// Blocks visited, including table rows
    pub block_count: u32,

    /// Headings of any level
    pub heading_count: u32,

    /// Bulleted, numbered, toggle and to-do items
    pub list_item_count: u32,

    /// Tables
    pub table_count: u32,

    /// Images
    pub image_count: u32,

    /// Code blocks
    pub code_count: u32,

    /// Blocks rendered as comment markers
    pub unsupported_count: u32,

    /// Level 1 headings moved back to the top level
    pub depth_reset_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one rendered block.
    pub fn add_block(&mut self, kind: &BlockKind) {
        self.block_count += 1;
        match kind {
            BlockKind::Heading1(_) | BlockKind::Heading2(_) | BlockKind::Heading3(_) => {
                self.heading_count += 1
            }
            BlockKind::BulletedListItem(_)
            | BlockKind::NumberedListItem(_)
            | BlockKind::Toggle(_)
            | BlockKind::ToDo(_) => self.list_item_count += 1,
            BlockKind::Table(_) => self.table_count += 1,
            BlockKind::Image(_) => self.image_count += 1,
            BlockKind::Code(_) => self.code_count += 1,
            BlockKind::Unsupported(_) => self.unsupported_count += 1,
            _ => {}
        }
    }

    /// Count one heading depth reset.
    pub fn add_depth_reset(&mut self) {
        self.depth_reset_count += 1;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}
