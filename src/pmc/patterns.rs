//! Named text patterns used by the extractor
//!
//! Each pattern is compiled once on first use. Where a field has both a
//! structured source and a text fallback, the structured pattern is listed
//! first here and tried first by [`crate::pmc::metadata`].

use regex::Regex;
use std::sync::OnceLock;

/// `PMC<digits>` inside a canonical link URL; group 1 is the numeric part
pub fn canonical_pmcid() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"PMC(\d+)").expect("Failed to compile canonical PMCID regex"))
}

/// `PMCID: PMC<digits>` in running text; group 1 is the prefixed id
pub fn pmcid_text() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"PMCID:\s*(PMC\d+)").expect("Failed to compile PMCID text regex")
    })
}

/// PubMed article link; group 1 is the PMID
pub fn pubmed_link() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"pubmed\.ncbi\.nlm\.nih\.gov/(\d+)").expect("Failed to compile PubMed link regex")
    })
}

/// `PMID: <digits>` in running text; group 1 is the PMID
pub fn pmid_text() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"PMID:\s*(\d+)").expect("Failed to compile PMID text regex"))
}

/// Trailing ` - PMC` on document titles
pub fn title_pmc_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*-\s*PMC$").expect("Failed to compile title suffix regex"))
}

/// Ids of numbered body sections (`sec1`, `sec12`, ...)
pub fn body_section_id() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^sec\d+$").expect("Failed to compile section id regex"))
}

pub fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"))
}

/// Group 1 of the first match of `pattern` in `text`
pub fn capture_first(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Collapse whitespace runs to one space and trim
pub fn collapse_whitespace(text: &str) -> String {
    whitespace_run().replace_all(text, " ").trim().to_string()
}
