//! Final markdown document layout

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pmc::content::{extract_content, join_fragments};
use crate::pmc::metadata::extract_metadata;
use crate::pmc::models::{ArticleMetadata, ContentFragment};

/// Article page URL linked from the metadata block
pub const ARTICLE_URL_BASE: &str = "https://www.ncbi.nlm.nih.gov/pmc/articles";

/// Metadata and content of one article page, ready to be rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArticle {
    pub metadata: ArticleMetadata,
    pub fragments: Vec<ContentFragment>,
}

impl ParsedArticle {
    /// Render the fixed markdown layout
    pub fn to_markdown(&self) -> String {
        assemble_markdown(&self.metadata, &self.fragments)
    }
}

/// HTML parser for PMC article pages
///
/// Parsing is lenient and never fails: anything missing from the page is
/// simply absent from the result.
pub struct PmcHtmlParser;

impl PmcHtmlParser {
    /// Parse a raw article page
    pub fn parse(html: &str) -> ParsedArticle {
        let document = Html::parse_document(html);
        let metadata = extract_metadata(&document);
        let fragments = extract_content(&document);

        debug!(
            pmcid = metadata.pmcid.as_deref().unwrap_or(""),
            fragments = fragments.len(),
            "Parsed article HTML"
        );

        ParsedArticle {
            metadata,
            fragments,
        }
    }
}

/// Convert a PMC article page to markdown
///
/// # Example
///
/// ```
/// use pmc_markdown::html_to_markdown;
///
/// let html = r#"<html><head>
///     <meta name="citation_title" content="Foo">
///     <link rel="canonical" href="https://www.ncbi.nlm.nih.gov/pmc/articles/PMC123/">
/// </head><body><article>
///     <section id="sec1"><p>Hello <em>world</em></p></section>
/// </article></body></html>"#;
///
/// let markdown = html_to_markdown(html);
/// assert!(markdown.starts_with("# Foo\n\n## Metadata\n\n**PMCID:** PMC123\n\n"));
/// assert!(markdown.contains("Hello *world*"));
/// ```
pub fn html_to_markdown(html: &str) -> String {
    PmcHtmlParser::parse(html).to_markdown()
}

/// Lay out title, metadata block, authors and content
pub fn assemble_markdown(metadata: &ArticleMetadata, fragments: &[ContentFragment]) -> String {
    let mut markdown = String::new();

    if let Some(title) = &metadata.title {
        markdown.push_str(&format!("# {title}\n\n"));
    }

    markdown.push_str("## Metadata\n\n");

    if let Some(pmcid) = &metadata.pmcid {
        markdown.push_str(&format!("**PMCID:** {pmcid}\n\n"));
        markdown.push_str(&format!("**URL:** {ARTICLE_URL_BASE}/{pmcid}/\n\n"));
    }

    if let Some(pmid) = &metadata.pmid {
        markdown.push_str(&format!("**PMID:** {pmid}\n\n"));
    }

    if !metadata.authors.is_empty() {
        markdown.push_str(&format!("**Authors:** {}\n\n", metadata.authors.join(", ")));
    }

    markdown.push_str(&join_fragments(fragments));
    markdown
}
