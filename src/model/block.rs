//! Content block types.
//!
//! The remote API encodes a block as an object carrying a `type` name and a
//! payload stored under a key of the same name:
//!
//! ```json
//! { "id": "…", "type": "to_do", "has_children": false,
//!   "to_do": { "rich_text": [], "checked": true } }
//! ```
//!
//! [`Block`] deserializes that shape into the closed [`BlockKind`] enum.
//! Unknown type names become [`BlockKind::Unsupported`] instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RichText;

/// A node of the document tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    /// Opaque stable identifier
    pub id: String,

    /// Whether the remote tree reports children for this block
    pub has_children: bool,

    /// Child blocks, populated before rendering
    pub children: Vec<Block>,

    /// Type tag and type-specific payload
    pub kind: BlockKind,
}

impl Block {
    /// Create a childless block.
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            has_children: false,
            children: Vec::new(),
            kind,
        }
    }

    /// Attach children and return self.
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.has_children = !children.is_empty();
        self.children = children;
        self
    }

    /// API name of this block's type.
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    /// Count this block and all of its descendants.
    pub fn total_blocks(&self) -> usize {
        1 + self.children.iter().map(Block::total_blocks).sum::<usize>()
    }
}

/// Block type with its payload.
#[derive(Debug, Clone)]
pub enum BlockKind {
    /// Plain paragraph
    Paragraph(TextBlock),
    /// Level 1 heading
    Heading1(TextBlock),
    /// Level 2 heading
    Heading2(TextBlock),
    /// Level 3 heading
    Heading3(TextBlock),
    /// Callout with an optional emoji icon
    Callout(Callout),
    /// Block quote
    Quote(TextBlock),
    /// Bulleted list item
    BulletedListItem(TextBlock),
    /// Numbered list item
    NumberedListItem(TextBlock),
    /// Toggle, rendered like a bulleted item
    Toggle(TextBlock),
    /// Checkbox item
    ToDo(ToDo),
    /// Fenced code
    Code(Code),
    /// Embedded external content
    Embed(Media),
    /// Image
    Image(Media),
    /// Bookmark
    Bookmark(Media),
    /// Block-level equation
    Equation(Equation),
    /// Horizontal rule
    Divider,
    /// Attached file
    File(Media),
    /// Video
    Video(Media),
    /// Table; its children are table rows
    Table(TableInfo),
    /// One table row
    TableRow(TableRow),
    /// A block type without a formatting rule, by API name
    Unsupported(String),
}

impl BlockKind {
    /// Every block type with a formatting rule, by API name.
    pub const SUPPORTED_TYPES: &'static [&'static str] = &[
        "paragraph",
        "heading_1",
        "heading_2",
        "heading_3",
        "callout",
        "quote",
        "bulleted_list_item",
        "numbered_list_item",
        "toggle",
        "to_do",
        "code",
        "embed",
        "image",
        "bookmark",
        "equation",
        "divider",
        "file",
        "video",
        "table",
        "table_row",
    ];

    /// API name of the block type.
    pub fn type_name(&self) -> &str {
        match self {
            BlockKind::Paragraph(_) => "paragraph",
            BlockKind::Heading1(_) => "heading_1",
            BlockKind::Heading2(_) => "heading_2",
            BlockKind::Heading3(_) => "heading_3",
            BlockKind::Callout(_) => "callout",
            BlockKind::Quote(_) => "quote",
            BlockKind::BulletedListItem(_) => "bulleted_list_item",
            BlockKind::NumberedListItem(_) => "numbered_list_item",
            BlockKind::Toggle(_) => "toggle",
            BlockKind::ToDo(_) => "to_do",
            BlockKind::Code(_) => "code",
            BlockKind::Embed(_) => "embed",
            BlockKind::Image(_) => "image",
            BlockKind::Bookmark(_) => "bookmark",
            BlockKind::Equation(_) => "equation",
            BlockKind::Divider => "divider",
            BlockKind::File(_) => "file",
            BlockKind::Video(_) => "video",
            BlockKind::Table(_) => "table",
            BlockKind::TableRow(_) => "table_row",
            BlockKind::Unsupported(name) => name,
        }
    }

    /// Check if this is a level 1 heading.
    pub fn is_heading_1(&self) -> bool {
        matches!(self, BlockKind::Heading1(_))
    }

    /// Check if this block links to a separate page or database. Its body
    /// belongs to that page and is never inlined.
    pub fn is_subpage(&self) -> bool {
        matches!(self, BlockKind::Unsupported(name) if name == "child_page" || name == "child_database")
    }

    /// Decode a payload for the named type.
    fn from_payload(type_name: &str, payload: Value) -> serde_json::Result<Self> {
        use serde_json::from_value as de;

        let kind = match type_name {
            "paragraph" => BlockKind::Paragraph(de(payload)?),
            "heading_1" => BlockKind::Heading1(de(payload)?),
            "heading_2" => BlockKind::Heading2(de(payload)?),
            "heading_3" => BlockKind::Heading3(de(payload)?),
            "callout" => BlockKind::Callout(de(payload)?),
            "quote" => BlockKind::Quote(de(payload)?),
            "bulleted_list_item" => BlockKind::BulletedListItem(de(payload)?),
            "numbered_list_item" => BlockKind::NumberedListItem(de(payload)?),
            "toggle" => BlockKind::Toggle(de(payload)?),
            "to_do" => BlockKind::ToDo(de(payload)?),
            "code" => BlockKind::Code(de(payload)?),
            "embed" => BlockKind::Embed(de(payload)?),
            "image" => BlockKind::Image(de(payload)?),
            "bookmark" => BlockKind::Bookmark(de(payload)?),
            "equation" => BlockKind::Equation(de(payload)?),
            "divider" => BlockKind::Divider,
            "file" => BlockKind::File(de(payload)?),
            "video" => BlockKind::Video(de(payload)?),
            "table" => BlockKind::Table(de(payload)?),
            "table_row" => BlockKind::TableRow(de(payload)?),
            other => BlockKind::Unsupported(other.to_string()),
        };
        Ok(kind)
    }
}

/// Payload made of rich text only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextBlock {
    /// Text content
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

impl TextBlock {
    /// Create a payload holding one unstyled span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            rich_text: vec![RichText::plain(text)],
        }
    }
}

/// Callout payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Callout {
    /// Text content
    #[serde(default)]
    pub rich_text: Vec<RichText>,

    /// Icon shown before the text
    #[serde(default)]
    pub icon: Option<Icon>,
}

impl Callout {
    /// Emoji icon, if the callout has one.
    pub fn emoji(&self) -> Option<&str> {
        self.icon.as_ref().and_then(|icon| icon.emoji.as_deref())
    }
}

/// Block or page icon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Icon {
    /// Emoji character, for emoji icons
    #[serde(default)]
    pub emoji: Option<String>,

    /// Hosted icon file
    #[serde(default)]
    pub file: Option<FileUrl>,

    /// External icon
    #[serde(default)]
    pub external: Option<FileUrl>,
}

/// To-do payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToDo {
    /// Text content
    #[serde(default)]
    pub rich_text: Vec<RichText>,

    /// Checked state
    #[serde(default)]
    pub checked: bool,
}

/// Code payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Code {
    /// Code content
    #[serde(default)]
    pub rich_text: Vec<RichText>,

    /// Language tag, may contain spaces ("c plus plus")
    #[serde(default)]
    pub language: String,

    /// Caption
    #[serde(default)]
    pub caption: Vec<RichText>,
}

/// Payload shared by URL-bearing blocks (image, file, embed, bookmark, video).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Media {
    /// Direct URL (embed, bookmark)
    #[serde(default)]
    pub url: Option<String>,

    /// Externally hosted file
    #[serde(default)]
    pub external: Option<FileUrl>,

    /// File hosted by the remote service
    #[serde(default)]
    pub file: Option<FileUrl>,

    /// Caption
    #[serde(default)]
    pub caption: Vec<RichText>,
}

impl Media {
    /// Create a payload with an external URL.
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            external: Some(FileUrl { url: url.into() }),
            ..Default::default()
        }
    }

    /// Resolved target URL. A hosted file wins over an external one, which
    /// wins over a direct URL.
    pub fn target(&self) -> Option<&str> {
        self.file
            .as_ref()
            .or(self.external.as_ref())
            .map(|f| f.url.as_str())
            .or(self.url.as_deref())
    }
}

/// URL wrapper used by hosted and external files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUrl {
    /// Target URL
    pub url: String,
}

/// Block equation payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equation {
    /// LaTeX expression
    #[serde(default)]
    pub expression: String,
}

/// Table payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableInfo {
    /// Number of columns
    #[serde(default)]
    pub table_width: usize,

    /// Whether the first row is a header
    #[serde(default)]
    pub has_column_header: bool,

    /// Whether the first column is a header
    #[serde(default)]
    pub has_row_header: bool,
}

/// Table row payload: one rich-text sequence per column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in column order
    #[serde(default)]
    pub cells: Vec<Vec<RichText>>,
}

impl TableRow {
    /// Create a row from unstyled cell texts.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            cells: values
                .into_iter()
                .map(|v| vec![RichText::plain(v)])
                .collect(),
        }
    }
}

/// Wire shape of a block.
#[derive(Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    has_children: bool,
    #[serde(default)]
    children: Vec<Block>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl TryFrom<RawBlock> for Block {
    type Error = serde_json::Error;

    fn try_from(mut raw: RawBlock) -> Result<Self, Self::Error> {
        let payload = match raw.rest.remove(&raw.type_name) {
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(value) => value,
        };
        let kind = BlockKind::from_payload(&raw.type_name, payload)?;

        Ok(Block {
            id: raw.id,
            has_children: raw.has_children,
            children: raw.children,
            kind,
        })
    }
}
