//! Rendering module for converting block trees to Markdown.

mod inline;
mod markdown;
mod normalize;
mod options;
mod result;

pub use inline::{apply_annotations, render_rich_text, render_span};
pub use markdown::{
    render_blocks, to_markdown, to_markdown_batch, to_markdown_with_stats, MarkdownRenderer,
};
pub use normalize::{normalize, LineClass};
pub use options::RenderOptions;
pub use result::{RenderResult, RenderStats};
