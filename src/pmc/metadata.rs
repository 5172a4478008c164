//! Article metadata lookup
//!
//! Every field has an ordered list of strategies. The first strategy that
//! yields a non-empty value wins; later ones are not evaluated.

use scraper::Html;
use tracing::debug;

use crate::pmc::dom::{attr_trimmed, find_all, find_first, find_in_text, text_of, Matcher};
use crate::pmc::models::ArticleMetadata;
use crate::pmc::patterns::{
    canonical_pmcid, capture_first, pmcid_text, pmid_text, pubmed_link, title_pmc_suffix,
};

/// A named lookup for one metadata field
type Strategy = (&'static str, fn(&Html) -> Option<String>);

const PMCID_STRATEGIES: &[Strategy] = &[
    ("canonical_link", pmcid_from_canonical_link),
    ("text", pmcid_from_text),
];

const PMID_STRATEGIES: &[Strategy] = &[
    ("pubmed_link", pmid_from_pubmed_link),
    ("text", pmid_from_text),
];

const TITLE_STRATEGIES: &[Strategy] = &[
    ("citation_title", title_from_citation_meta),
    ("title_element", title_from_title_element),
];

/// Extract identifiers, title and authors; never fails
pub fn extract_metadata(document: &Html) -> ArticleMetadata {
    ArticleMetadata {
        pmcid: first_success("pmcid", PMCID_STRATEGIES, document),
        pmid: first_success("pmid", PMID_STRATEGIES, document),
        title: first_success("title", TITLE_STRATEGIES, document),
        authors: citation_authors(document),
    }
}

fn first_success(field: &str, strategies: &[Strategy], document: &Html) -> Option<String> {
    strategies.iter().find_map(|(name, strategy)| {
        let value = strategy(document).filter(|v| !v.trim().is_empty())?;
        debug!(field, strategy = name, value = %value, "Metadata field resolved");
        Some(value)
    })
}

fn meta_named(name: &str) -> Matcher<'_> {
    Matcher::Tag("meta").and(Matcher::AttrEquals {
        name: "name",
        value: name,
    })
}

fn pmcid_from_canonical_link(document: &Html) -> Option<String> {
    let matcher = Matcher::Tag("link").and(Matcher::AttrToken {
        name: "rel",
        token: "canonical",
    });
    let link = find_first(document.root_element(), &matcher)?;
    let href = attr_trimmed(link, "href")?;
    capture_first(canonical_pmcid(), &href).map(|digits| format!("PMC{digits}"))
}

fn pmcid_from_text(document: &Html) -> Option<String> {
    find_in_text(document, |text| capture_first(pmcid_text(), text))
}

fn pmid_from_pubmed_link(document: &Html) -> Option<String> {
    let matcher = Matcher::Tag("a").and(Matcher::AttrPattern {
        name: "href",
        pattern: pubmed_link(),
    });
    let anchor = find_first(document.root_element(), &matcher)?;
    let href = anchor.value().attr("href")?;
    capture_first(pubmed_link(), href)
}

fn pmid_from_text(document: &Html) -> Option<String> {
    find_in_text(document, |text| capture_first(pmid_text(), text))
}

fn title_from_citation_meta(document: &Html) -> Option<String> {
    let meta = find_first(document.root_element(), &meta_named("citation_title"))?;
    attr_trimmed(meta, "content")
}

fn title_from_title_element(document: &Html) -> Option<String> {
    let title = find_first(document.root_element(), &Matcher::Tag("title"))?;
    let text = text_of(title);
    Some(title_pmc_suffix().replace(text.trim(), "").into_owned())
}

fn citation_authors(document: &Html) -> Vec<String> {
    find_all(document.root_element(), &meta_named("citation_author"))
        .into_iter()
        .filter_map(|meta| attr_trimmed(meta, "content"))
        .collect()
}
