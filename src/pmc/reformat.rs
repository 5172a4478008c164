//! Line-based restructuring of crawler-style markdown
//!
//! This is a best-effort mode for markdown produced by generic page crawlers:
//! a flat dump of the page text with no reliable structure. Lines are
//! classified one at a time with simple heuristics (title, authors, abstract
//! parts, keywords, section headings). The thresholds are tuned for PMC pages
//! and carry no guarantees on anything else.

use regex::Regex;
use std::sync::OnceLock;

use crate::pmc::markdown::ARTICLE_URL_BASE;

/// Lines containing any of these (lowercased) are site navigation
const NAVIGATION_MARKERS: &[&str] = &[
    "skip to main content",
    "official website",
    "here's how you know",
    ".gov website",
    "ncbi home page",
    "search database",
    "log in",
    "dashboard",
    "publications",
    "account settings",
    "pubmed",
    "pmc",
    "mesh",
    "download pdf",
    "cite this",
    "share this",
];

/// Words that mark an affiliation line, which also carries the author names
const INSTITUTION_MARKERS: &[&str] = &[
    "university",
    "institute",
    "hospital",
    "college",
    "department",
    "center",
    "school",
];

/// Lines that end an abstract when met on their own
const ABSTRACT_TERMINATORS: &[&str] = &[
    "introduction",
    "background",
    "methods",
    "results",
    "discussion",
    "conclusions",
];

const PDF_URL_BASE: &str = "https://pmc.ncbi.nlm.nih.gov/articles";

fn section_headers() -> &'static [(Regex, &'static str)] {
    static HEADERS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    HEADERS.get_or_init(|| {
        [
            (r"^\s*abstract\s*$", "## Abstract"),
            (r"^\s*introduction\s*$", "## Introduction"),
            (r"^\s*background\s*$", "### Background"),
            (r"^\s*methods?\s*$", "## Methods"),
            (r"^\s*methodology\s*$", "## Methodology"),
            (r"^\s*materials?\s+and\s+methods?\s*$", "## Materials and Methods"),
            (r"^\s*results?\s*$", "## Results"),
            (r"^\s*discussion\s*$", "## Discussion"),
            (r"^\s*conclusions?\s*$", "### Conclusions"),
            (r"^\s*acknowledgments?\s*$", "## Acknowledgments"),
            (r"^\s*acknowledgements?\s*$", "## Acknowledgements"),
            (r"^\s*references?\s*$", "## References"),
            (r"^\s*bibliography\s*$", "## References"),
            (r"^\s*funding\s*$", "## Funding"),
            (r"^\s*conflicts?\s+of\s+interest\s*$", "## Conflicts of Interest"),
            (r"^\s*data\s+availability\s*$", "## Data Availability"),
            (r"^\s*supplementary\s+materials?\s*$", "## Supplementary Materials"),
            (r"^\s*ethics\s+statement\s*$", "## Ethics Statement"),
            (r"^\s*author\s+contributions?\s*$", "## Author Contributions"),
            (r"^\s*keywords?\s*[:.]?\s*$", "Keywords:"),
        ]
        .into_iter()
        .map(|(pattern, header)| {
            (
                Regex::new(pattern).expect("Failed to compile section header regex"),
                header,
            )
        })
        .collect()
    })
}

fn doi_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"doi:\s*([^\s]+)|doi\.org/([^\s\)]+)").expect("Failed to compile DOI regex")
    })
}

fn pmid_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"pmid:\s*(\d+)").expect("Failed to compile PMID regex"))
}

fn numbered_section() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\d+\.?\d*\.?)\s+(.+)$").expect("Failed to compile numbered section regex")
    })
}

/// Whitespace cleanup passes applied to the body, in order
///
/// Blank runs are collapsed again last, since spacing out headings can leave
/// two blank lines before one.
fn body_cleanups() -> &'static [(Regex, &'static str)] {
    static CLEANUPS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    CLEANUPS.get_or_init(|| {
        [
            (r"\n\s*\n\s*\n+", "\n\n"),
            (r"^\s*\n+", ""),
            (r"\n(#{1,6}\s)", "\n\n${1}"),
            (r"(#{1,6}\s[^\n]+)\n([^\n#])", "${1}\n\n${2}"),
            (r"\n\s*\n\s*\n+", "\n\n"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("Failed to compile cleanup regex"),
                replacement,
            )
        })
        .collect()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AbstractPart {
    Background,
    MethodsAndResults,
    Conclusions,
}

#[derive(Debug, Default)]
struct AcademicDocument {
    title: Option<String>,
    authors: Option<String>,
    doi: Option<String>,
    pmid: Option<String>,
    keywords: Option<String>,
    background: String,
    methods_and_results: String,
    conclusions: String,
    body: Vec<String>,
}

impl AcademicDocument {
    fn abstract_part_mut(&mut self, part: AbstractPart) -> &mut String {
        match part {
            AbstractPart::Background => &mut self.background,
            AbstractPart::MethodsAndResults => &mut self.methods_and_results,
            AbstractPart::Conclusions => &mut self.conclusions,
        }
    }

    fn append_to(&mut self, part: AbstractPart, text: &str) {
        let target = self.abstract_part_mut(part);
        if !target.is_empty() {
            target.push(' ');
        }
        target.push_str(text);
    }
}

/// Title-case every alphabetic run (`"MATERIALS AND METHODS"` → `"Materials And Methods"`)
fn title_case(text: &str) -> String {
    let mut previous_alpha = false;
    text.chars()
        .map(|c| {
            let mapped: String = if previous_alpha {
                c.to_lowercase().collect()
            } else {
                c.to_uppercase().collect()
            };
            previous_alpha = c.is_alphabetic();
            mapped
        })
        .collect()
}

fn is_shouted_heading(line: &str) -> bool {
    let length = line.chars().count();
    let letters: Vec<char> = line.chars().filter(|c| *c != ' ').collect();
    3 < length
        && length < 50
        && !letters.is_empty()
        && letters.iter().all(|c| c.is_alphabetic())
        && letters.iter().any(|c| c.is_uppercase())
        && !letters.iter().any(|c| c.is_lowercase())
}

fn strip_labels(line: &str, labels: &[&str]) -> String {
    labels
        .iter()
        .fold(line.to_string(), |acc, label| acc.replace(label, ""))
        .trim()
        .to_string()
}

/// Restructure crawler markdown into the academic article layout
///
/// # Example
///
/// ```
/// use pmc_markdown::format_academic_markdown;
///
/// let crawled = "Effects of exercise on sleep quality\n\nINTRODUCTION\nSleep matters.";
/// let formatted = format_academic_markdown(crawled, "PMC123");
///
/// assert!(formatted.starts_with("# Effects of exercise on sleep quality\n\n## Metadata\n"));
/// assert!(formatted.contains("**PMCID:** PMC123"));
/// assert!(formatted.contains("## Introduction\n\nSleep matters."));
/// ```
pub fn format_academic_markdown(text: &str, pmcid: &str) -> String {
    let document = classify_lines(text);
    render_academic(&document, pmcid)
}

fn classify_lines(text: &str) -> AcademicDocument {
    let mut doc = AcademicDocument::default();
    let mut awaiting_title = true;
    let mut in_abstract = false;
    let mut abstract_part: Option<AbstractPart> = None;

    for line in text.split('\n') {
        let lowered = line.to_lowercase();
        if NAVIGATION_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            continue;
        }

        if lowered.contains("doi:") || lowered.contains("doi.org") {
            if let Some(caps) = doi_pattern().captures(&lowered) {
                if let Some(doi) = caps.get(1).or_else(|| caps.get(2)) {
                    doc.doi = Some(doi.as_str().to_string());
                }
            }
        }

        if lowered.contains("pmid:") {
            if let Some(caps) = pmid_pattern().captures(&lowered) {
                doc.pmid = Some(caps[1].to_string());
            }
        }

        let trimmed = line.trim();

        if awaiting_title {
            if trimmed.chars().count() > 10
                && !line.starts_with('!')
                && !line.starts_with('[')
                && !line.starts_with("http")
            {
                awaiting_title = false;
                doc.title = Some(trimmed.to_string());
            }
            continue;
        }

        let key = trimmed.to_lowercase();

        if key == "abstract" {
            in_abstract = true;
            continue;
        }

        if in_abstract {
            if ABSTRACT_TERMINATORS.contains(&key.as_str()) {
                in_abstract = false;
            } else if key.starts_with("background") {
                abstract_part = Some(AbstractPart::Background);
                doc.background = strip_labels(line, &["Background:", "background:"]);
                continue;
            } else if key.starts_with("method") {
                abstract_part = Some(AbstractPart::MethodsAndResults);
                doc.methods_and_results =
                    strip_labels(line, &["Methods:", "methods:", "Method:", "method:"]);
                continue;
            } else if key.starts_with("result") {
                abstract_part = Some(AbstractPart::MethodsAndResults);
                let results = strip_labels(line, &["Results:", "results:", "Result:", "result:"]);
                doc.append_to(AbstractPart::MethodsAndResults, &results);
                continue;
            } else if key.starts_with("conclusion") {
                abstract_part = Some(AbstractPart::Conclusions);
                doc.conclusions = strip_labels(
                    line,
                    &["Conclusions:", "conclusions:", "Conclusion:", "conclusion:"],
                );
                continue;
            } else if let Some(part) = abstract_part.filter(|_| !trimmed.is_empty()) {
                doc.append_to(part, trimmed);
                continue;
            }
        }

        if key.contains("keywords") {
            if let Some((_, keywords)) = line.split_once(':') {
                doc.keywords = Some(keywords.trim().to_string());
                continue;
            }
        }

        if doc.authors.is_none()
            && !in_abstract
            && trimmed.chars().count() > 5
            && line.contains(',')
            && !line.starts_with('#')
            && INSTITUTION_MARKERS.iter().any(|marker| lowered.contains(marker))
        {
            doc.authors = Some(trimmed.to_string());
            continue;
        }

        if let Some((_, header)) = section_headers()
            .iter()
            .find(|(pattern, _)| pattern.is_match(&key))
        {
            doc.body.push(format!("\n{header}\n"));
            in_abstract = false;
            continue;
        }

        if in_abstract {
            continue;
        }

        match numbered_section().captures(trimmed) {
            Some(caps) if caps[2].chars().count() > 3 => {
                doc.body.push(format!("\n## {}\n", title_case(&caps[2])));
            }
            _ if is_shouted_heading(trimmed) => {
                doc.body.push(format!("\n### {}\n", title_case(trimmed)));
            }
            _ => doc.body.push(line.to_string()),
        }
    }

    doc
}

fn render_academic(doc: &AcademicDocument, pmcid: &str) -> String {
    let mut out: Vec<String> = Vec::new();

    match &doc.title {
        Some(title) => out.push(format!("# {title}")),
        None => out.push("# Research Article".to_string()),
    }
    out.push(String::new());

    out.push("## Metadata".to_string());
    if let Some(authors) = &doc.authors {
        out.push(format!("**Authors:** {authors}"));
    }
    if let Some(doi) = &doc.doi {
        out.push(format!("**DOI:** [https://doi.org/{doi}](https://doi.org/{doi})"));
    }
    if let Some(pmid) = &doc.pmid {
        out.push(format!("**PMID:** {pmid}"));
    }
    out.push(format!("**PMCID:** {pmcid}"));
    out.push(format!("**URL:** {ARTICLE_URL_BASE}/{pmcid}/"));
    out.push(format!(
        "**PDF:** [{PDF_URL_BASE}/{pmcid}/pdf/]({PDF_URL_BASE}/{pmcid}/pdf/)"
    ));
    out.push(String::new());

    let parts = [
        ("Background", &doc.background),
        ("Methods and Results", &doc.methods_and_results),
        ("Conclusions", &doc.conclusions),
    ];
    if parts.iter().any(|(_, text)| !text.is_empty()) {
        out.push("## Abstract".to_string());
        out.push(String::new());
        for (label, text) in parts.iter().filter(|(_, text)| !text.is_empty()) {
            out.push(format!("**{label}:** {text}"));
            out.push(String::new());
        }
    }

    if let Some(keywords) = &doc.keywords {
        out.push(format!("Keywords: {keywords}"));
        out.push(String::new());
    }

    if !doc.body.is_empty() {
        let body = body_cleanups()
            .iter()
            .fold(doc.body.join("\n"), |text, (pattern, replacement)| {
                pattern.replace_all(&text, *replacement).into_owned()
            });
        out.push(body.trim().to_string());
    }

    out.join("\n")
}
