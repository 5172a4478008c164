//! Value types produced by one extraction pass

use serde::{Deserialize, Serialize};

/// Identifiers, title and authors found in an article page
///
/// Every field is best-effort; a missing value only omits its markdown line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    /// PMC ID including the prefix (e.g. "PMC1234567")
    pub pmcid: Option<String>,
    /// PubMed ID
    pub pmid: Option<String>,
    /// Article title
    pub title: Option<String>,
    /// Authors in document order, duplicates preserved
    pub authors: Vec<String>,
}

/// Where a content fragment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FragmentKind {
    Abstract,
    Section,
    References,
}

/// One rendered markdown block group, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFragment {
    pub kind: FragmentKind,
    pub markdown: String,
}

impl ContentFragment {
    pub fn new(kind: FragmentKind, markdown: String) -> Self {
        Self { kind, markdown }
    }
}

/// A styled piece of text inside one block element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSpan {
    Plain(String),
    Emphasis(String),
    Strong(String),
    Superscript(String),
    Subscript(String),
    Link { text: String, url: String },
}

impl InlineSpan {
    pub fn render(&self) -> String {
        match self {
            InlineSpan::Plain(text) => text.clone(),
            InlineSpan::Emphasis(text) => format!("*{text}*"),
            InlineSpan::Strong(text) => format!("**{text}**"),
            InlineSpan::Superscript(text) => format!("^{text}^"),
            InlineSpan::Subscript(text) => format!("_{text}_"),
            InlineSpan::Link { text, url } => format!("[{text}]({url})"),
        }
    }
}

/// Ordered spans of a block element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineRun {
    pub spans: Vec<InlineSpan>,
}

impl InlineRun {
    /// Concatenate the spans and trim the outer whitespace
    pub fn render(&self) -> String {
        let joined: String = self.spans.iter().map(InlineSpan::render).collect();
        joined.trim().to_string()
    }
}

/// An image found in an article, with its optional caption
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureRecord {
    /// Absolute image URL, when one could be resolved
    pub src: Option<String>,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// A data table found in an article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Tables and figure-like images of one article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaInventory {
    pub tables: Vec<TableRecord>,
    pub images: Vec<FigureRecord>,
}
