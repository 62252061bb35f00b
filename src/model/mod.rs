//! Document model types for block-tree content.
//!
//! This module defines the typed tree the remote content API is decoded into
//! and the renderer consumes. Blocks and spans are closed enums with an
//! `Unsupported` catch-all so unknown API types never abort decoding.

mod block;
mod document;
mod page;
mod rich_text;

pub use block::{
    Block, BlockKind, Callout, Code, Equation, FileUrl, Icon, Media, TableInfo, TableRow,
    TextBlock, ToDo,
};
pub use document::{snake_case, Document, Frontmatter};
pub use page::{DateRange, Page, Parent, Person, PropertyValue, SelectOption};
pub use rich_text::{
    Annotations, Link, Mention, MentionKind, RichText, SpanKind, TextContent, DEFAULT_COLOR,
};
