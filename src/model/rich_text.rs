//! Inline rich-text types.

use serde::{Deserialize, Serialize};

/// An inline unit of styled text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RichText {
    /// Span kind (text, mention or equation)
    #[serde(rename = "type", default)]
    pub kind: SpanKind,

    /// Unformatted text of the span
    #[serde(default)]
    pub plain_text: String,

    /// Hyperlink target, if any
    #[serde(default)]
    pub href: Option<String>,

    /// Inline styling flags
    #[serde(default)]
    pub annotations: Annotations,

    /// Text payload (present for `text` spans)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,

    /// Mention payload (present for `mention` spans)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mention: Option<Mention>,
}

impl RichText {
    /// Create an unstyled text span.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: SpanKind::Text,
            plain_text: text.clone(),
            href: None,
            annotations: Annotations::default(),
            text: Some(TextContent {
                content: text,
                link: None,
            }),
            mention: None,
        }
    }

    /// Create a text span linking to `url`.
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        let mut span = Self::plain(text);
        span.href = Some(url.clone());
        if let Some(ref mut content) = span.text {
            content.link = Some(Link { url });
        }
        span
    }

    /// Create an inline equation span.
    pub fn equation(expression: impl Into<String>) -> Self {
        Self {
            kind: SpanKind::Equation,
            plain_text: expression.into(),
            href: None,
            annotations: Annotations::default(),
            text: None,
            mention: None,
        }
    }

    /// Create a mention span.
    pub fn mention(kind: MentionKind, text: impl Into<String>, href: Option<String>) -> Self {
        Self {
            kind: SpanKind::Mention,
            plain_text: text.into(),
            href,
            annotations: Annotations::default(),
            text: None,
            mention: Some(Mention { kind }),
        }
    }

    /// Replace the annotations and return self.
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }
}

/// Kind of an inline span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// Literal text
    #[default]
    Text,
    /// Reference to another entity
    Mention,
    /// Inline LaTeX expression
    Equation,
    /// Any span type this crate does not know
    #[serde(other)]
    Unsupported,
}

/// Text payload of a `text` span.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextContent {
    /// Raw text content
    #[serde(default)]
    pub content: String,

    /// Link attached to the text
    #[serde(default)]
    pub link: Option<Link>,
}

/// Hyperlink target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    /// Target URL
    pub url: String,
}

/// Independent inline style flags plus a color name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    /// Bold text
    #[serde(default)]
    pub bold: bool,

    /// Italic text
    #[serde(default)]
    pub italic: bool,

    /// Strikethrough text
    #[serde(default)]
    pub strikethrough: bool,

    /// Underlined text
    #[serde(default)]
    pub underline: bool,

    /// Inline code
    #[serde(default)]
    pub code: bool,

    /// Color name ("default" when unset)
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// Color name meaning "no color".
pub const DEFAULT_COLOR: &str = "default";

impl Annotations {
    /// Non-default color, if any.
    pub fn color(&self) -> Option<&str> {
        if self.color.is_empty() || self.color == DEFAULT_COLOR {
            None
        } else {
            Some(&self.color)
        }
    }
}

impl Default for Annotations {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: default_color(),
        }
    }
}

/// Mention payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    /// What the mention refers to
    #[serde(rename = "type", default)]
    pub kind: MentionKind,
}

/// Entity kind referenced by a mention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionKind {
    /// A workspace user
    User,
    /// Another page
    Page,
    /// A database
    Database,
    /// A date or date range
    Date,
    /// An unfurled external link
    LinkPreview,
    /// Any mention type this crate does not know
    #[default]
    #[serde(other)]
    Unsupported,
}

impl MentionKind {
    /// Every mention kind with a rendering rule, by API name.
    pub const SUPPORTED: &'static [&'static str] =
        &["user", "page", "database", "date", "link_preview"];
}
