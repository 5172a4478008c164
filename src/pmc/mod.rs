//! PubMed Central article pages and their conversion to markdown

pub mod client;
pub mod content;
pub mod dom;
pub mod inline;
pub mod markdown;
pub mod media;
pub mod metadata;
pub mod models;
pub mod patterns;
pub mod reformat;

pub use client::ArticleFetcher;
pub use markdown::{assemble_markdown, html_to_markdown, ParsedArticle, PmcHtmlParser};
pub use media::extract_media;
pub use models::{
    ArticleMetadata, ContentFragment, FigureRecord, FragmentKind, InlineRun, InlineSpan,
    MediaInventory, TableRecord,
};
pub use reformat::format_academic_markdown;
