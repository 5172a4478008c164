//! # PMC Markdown
//!
//! Turns PubMed IDs into archival markdown documents built from PubMed
//! Central article pages.
//!
//! ## Features
//!
//! - **HTML to markdown**: a rule-based extractor for PMC article pages
//!   (metadata, abstract, numbered sections, figures, lists, references)
//! - **ID resolution**: batched PMID → PMCID lookups through the NCBI ID converter
//! - **Article fetching**: rate-limited, retry-free retrieval of article pages
//! - **Local archive**: cached HTML and markdown on disk, with a CSV ledger
//! - **Media inventory**: tables and figure images as typed records
//!
//! ## Quick Start
//!
//! ### Converting a page you already have
//!
//! ```
//! use pmc_markdown::html_to_markdown;
//!
//! let html = r#"<html><head><title>Foo - PMC</title></head>
//! <body><article><section class="abstract"><p>Short abstract.</p></section></article></body></html>"#;
//!
//! let markdown = html_to_markdown(html);
//! assert_eq!(markdown, "# Foo\n\n## Metadata\n\n## Abstract\n\nShort abstract.\n");
//! ```
//!
//! ### From PMID to a markdown file
//!
//! ```no_run
//! use pmc_markdown::{ArticleStore, ClientConfig, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new().with_email("researcher@university.edu");
//!     let pipeline = Pipeline::new(config, ArticleStore::new("data"));
//!
//!     if let Some(conversion) = pipeline.pmid_to_markdown("33594324").await? {
//!         println!("Saved {}", conversion.pmcid);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod common;
pub mod config;
pub mod error;
pub mod idconv;
pub mod pipeline;
pub mod pmc;
pub mod rate_limit;
pub mod records;
pub mod storage;

// Re-export main types for convenience
pub use common::{PmcId, PubMedId};
pub use config::ClientConfig;
pub use error::{PmcError, Result};
pub use idconv::{IdConverterClient, IdMapping};
pub use pipeline::{read_pmid_file, BatchReport, Conversion, Pipeline};
pub use pmc::{
    extract_media, format_academic_markdown, html_to_markdown, ArticleFetcher, ArticleMetadata,
    FigureRecord, MediaInventory, ParsedArticle, PmcHtmlParser, TableRecord,
};
pub use rate_limit::RateLimiter;
pub use records::{parse_markdown_metadata, Record, RecordMap};
pub use storage::ArticleStore;
