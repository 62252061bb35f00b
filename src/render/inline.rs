//! Inline rich-text rendering.

use url::Url;

use crate::model::{Annotations, MentionKind, RichText, SpanKind};

/// Host whose links render as repository badges instead of Markdown links.
const CODE_HOST_PREFIX: &str = "https://github.com/";

/// Placeholder title the remote service gives unnamed pages.
const UNTITLED: &str = "Untitled";

/// Render a sequence of spans into one Markdown fragment.
///
/// In `title_mode` spans are emitted without links or annotations.
/// Mentions of an unknown kind contribute nothing and are logged.
pub fn render_rich_text(spans: &[RichText], title_mode: bool) -> String {
    let mut output = String::new();
    for span in spans {
        match render_span(span, title_mode) {
            Some(rendered) => output.push_str(&rendered),
            None => log::warn!(
                "Skipping unsupported mention {:?} ({:?})",
                span.plain_text,
                span.mention.as_ref().map(|m| m.kind)
            ),
        }
    }
    output
}

/// Render one span. Returns `None` for a mention without a rendering rule.
pub fn render_span(span: &RichText, title_mode: bool) -> Option<String> {
    match span.kind {
        SpanKind::Equation => Some(format!("$ {} $", span.plain_text)),
        SpanKind::Mention => render_mention(span),
        SpanKind::Text | SpanKind::Unsupported => {
            if title_mode {
                return Some(span.plain_text.clone());
            }
            let text = match span.href {
                Some(ref href) => text_link(span, href),
                None => span.plain_text.clone(),
            };
            Some(apply_annotations(text, &span.annotations))
        }
    }
}

fn text_link(span: &RichText, href: &str) -> String {
    let (content, url) = match span.text {
        Some(ref text) => (
            text.content.as_str(),
            text.link.as_ref().map(|l| l.url.as_str()).unwrap_or(href),
        ),
        None => (span.plain_text.as_str(), href),
    };
    format!("[{}]({})", content, url)
}

/// Wrap text in every active annotation, innermost first: bold, italic,
/// strikethrough, underline, code, then color.
pub fn apply_annotations(text: String, annotations: &Annotations) -> String {
    let mut result = text;

    if annotations.bold {
        result = format!("**{}**", result);
    }
    if annotations.italic {
        result = format!("*{}*", result);
    }
    if annotations.strikethrough {
        result = format!("~~{}~~", result);
    }
    if annotations.underline {
        result = format!("<u>{}</u>", result);
    }
    if annotations.code {
        result = format!("`{}`", result);
    }
    if let Some(color) = annotations.color() {
        result = format!("<span style='color:{}'>{}</span>", color, result);
    }

    result
}

fn render_mention(span: &RichText) -> Option<String> {
    let kind = span.mention.as_ref().map(|m| m.kind)?;

    // Unnamed pages show their URL instead of the placeholder title.
    let content = match span.href {
        Some(ref href) if span.plain_text == UNTITLED => href.as_str(),
        _ => span.plain_text.as_str(),
    };

    match kind {
        MentionKind::User | MentionKind::Date => Some(format!("({})", content)),
        MentionKind::Page | MentionKind::Database | MentionKind::LinkPreview => {
            Some(match span.href {
                Some(ref url) => mention_link(content, url),
                None => content.to_string(),
            })
        }
        MentionKind::Unsupported => None,
    }
}

fn mention_link(content: &str, url: &str) -> String {
    if url.contains(CODE_HOST_PREFIX) {
        let repo = repository_name(url).unwrap_or_else(|| content.to_string());
        format!(
            "<a href=\"{}\" target=\"_blank\"> <i class=\"fa fa-lg fa-github\"> </i> {} </a>",
            url, repo
        )
    } else {
        format!("[{}]({})", content, url)
    }
}

fn repository_name(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let name = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    Some(name.to_string())
}
