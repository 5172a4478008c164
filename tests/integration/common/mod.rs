//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use pmc_markdown::ClientConfig;

/// Directory holding the recorded article pages and their expected markdown
pub fn test_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/integration/test_data")
}

/// Read a fixture file or panic with a descriptive message
pub fn read_fixture(name: &str) -> String {
    let path = test_data_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read fixture: {path:?}"))
}

/// Configuration pointing both NCBI endpoints at a mock server
pub fn mock_config(origin: &str) -> ClientConfig {
    ClientConfig::new()
        .with_base_url(origin)
        .with_email("tests@example.org")
        .with_rate_limit(100.0) // High rate limit for tests
}

/// Builder for small article pages
#[derive(Debug, Default, Clone)]
pub struct ArticlePage {
    head: Vec<String>,
    front: Vec<String>,
    body: Vec<String>,
    container: Option<&'static str>,
}

impl ArticlePage {
    pub fn new() -> Self {
        Self {
            container: Some("article"),
            ..Self::default()
        }
    }

    /// Page without any `article` or `main` container
    pub fn without_container() -> Self {
        Self::default()
    }

    pub fn in_main(mut self) -> Self {
        self.container = Some("main");
        self
    }

    pub fn title_element(mut self, title: &str) -> Self {
        self.head.push(format!("<title>{title}</title>"));
        self
    }

    pub fn citation_title(mut self, title: &str) -> Self {
        self.head
            .push(format!(r#"<meta name="citation_title" content="{title}">"#));
        self
    }

    pub fn author(mut self, name: &str) -> Self {
        self.head
            .push(format!(r#"<meta name="citation_author" content="{name}">"#));
        self
    }

    pub fn canonical(mut self, pmcid: &str) -> Self {
        self.head.push(format!(
            r#"<link rel="canonical" href="https://www.ncbi.nlm.nih.gov/pmc/articles/{pmcid}/">"#
        ));
        self
    }

    pub fn pubmed_link(mut self, pmid: &str) -> Self {
        self.front.push(format!(
            r#"<a href="https://pubmed.ncbi.nlm.nih.gov/{pmid}/">PubMed</a>"#
        ));
        self
    }

    /// Free text placed before the container
    pub fn text(mut self, text: &str) -> Self {
        self.front.push(format!("<p>{text}</p>"));
        self
    }

    pub fn abstract_section(mut self, inner: &str) -> Self {
        self.body
            .push(format!(r#"<section class="abstract">{inner}</section>"#));
        self
    }

    pub fn section(mut self, id: &str, inner: &str) -> Self {
        self.body
            .push(format!(r#"<section id="{id}">{inner}</section>"#));
        self
    }

    pub fn references(mut self, items: &[&str]) -> Self {
        let items: String = items.iter().map(|item| format!("<li>{item}</li>")).collect();
        self.body.push(format!(
            r#"<section class="ref-list"><h2>References</h2><ul class="ref-list">{items}</ul></section>"#
        ));
        self
    }

    pub fn build(&self) -> String {
        let body = self.body.concat();
        let content = match self.container {
            Some(tag) => format!("<{tag}>{body}</{tag}>"),
            None => format!("<div>{body}</div>"),
        };
        format!(
            "<!DOCTYPE html><html><head>{}</head><body>{}{content}</body></html>",
            self.head.concat(),
            self.front.concat(),
        )
    }
}
