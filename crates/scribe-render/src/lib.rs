//! # scribe-render
//!
//! Presentation layer: resolves inline entity references against the guild
//! timelines as of each message's send time, renders message bodies through
//! a restricted markup pipeline, and serializes the transcript as plain
//! text or an HTML fragment.

pub mod assets;
pub mod author;
pub mod emoji;
pub mod error;
pub mod escape;
pub mod html;
pub mod markup;
pub mod mention;
pub mod text;

pub use assets::{AssetKind, AssetResolver};
pub use author::{author_view, group_by_author, AuthorView};
pub use emoji::EmojiRewriter;
pub use error::RenderError;
pub use escape::escape_html;
pub use html::HtmlRenderer;
pub use markup::MarkupPipeline;
pub use mention::ReferenceResolver;
pub use text::{TextRenderer, DEFAULT_CDN_BASE};
