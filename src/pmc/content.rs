//! Article body extraction
//!
//! The article container (`article`, else `main`) is walked for an abstract,
//! numbered body sections and a reference list. Each becomes one
//! [`ContentFragment`]; structural children are rendered by
//! [`convert_block`].

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::pmc::dom::{child_elements, find_all, find_first, text_of, Matcher};
use crate::pmc::inline::render_inline;
use crate::pmc::models::{ContentFragment, FragmentKind};
use crate::pmc::patterns::{body_section_id, collapse_whitespace};

/// Origin serving PMC figure images
pub const CDN_ORIGIN: &str = "https://cdn.ncbi.nlm.nih.gov";

const ABSTRACT_HEADING: &str = "## Abstract";
const REFERENCES_HEADING: &str = "## References";

/// Locate the article container and extract its fragments in document order
///
/// A page without an `article` or `main` element yields no fragments.
pub fn extract_content(document: &Html) -> Vec<ContentFragment> {
    let root = document.root_element();
    let Some(container) = find_first(root, &Matcher::Tag("article"))
        .or_else(|| find_first(root, &Matcher::Tag("main")))
    else {
        debug!("No article container found");
        return Vec::new();
    };

    let mut fragments = Vec::new();

    let abstract_matcher = Matcher::Tag("section").and(Matcher::Class("abstract"));
    if let Some(section) = find_first(container, &abstract_matcher) {
        fragments.push(ContentFragment::new(
            FragmentKind::Abstract,
            abstract_markdown(section),
        ));
    }

    let body_matcher = Matcher::Tag("section").and(Matcher::IdPattern(body_section_id()));
    for section in find_all(container, &body_matcher) {
        let markdown = convert_block(section);
        if markdown.trim().is_empty() {
            continue;
        }
        fragments.push(ContentFragment::new(FragmentKind::Section, markdown));
    }

    let references_matcher = Matcher::Tag("section").and(Matcher::Class("ref-list"));
    if let Some(section) = find_first(container, &references_matcher) {
        fragments.push(ContentFragment::new(
            FragmentKind::References,
            references_markdown(section),
        ));
    }

    debug!(fragments = fragments.len(), "Extracted article content");
    fragments
}

/// Join fragments with exactly one blank line between them
pub fn join_fragments(fragments: &[ContentFragment]) -> String {
    fragments
        .iter()
        .map(|fragment| format!("{}\n", fragment.markdown.trim_end()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn abstract_markdown(section: ElementRef<'_>) -> String {
    let converted = convert_block(section);
    if converted.trim().starts_with(ABSTRACT_HEADING) {
        converted
    } else {
        format!("{ABSTRACT_HEADING}\n\n{converted}")
    }
}

fn references_markdown(section: ElementRef<'_>) -> String {
    let list_matcher = Matcher::Tag("ul").and(Matcher::Class("ref-list"));
    let scope = find_first(section, &list_matcher).unwrap_or(section);

    let entries: Vec<String> = find_all(scope, &Matcher::Tag("li"))
        .into_iter()
        .map(|li| collapse_whitespace(&text_of(li)))
        .filter(|text| !text.is_empty())
        .map(|text| format!("- {text}"))
        .collect();

    if entries.is_empty() {
        format!("{REFERENCES_HEADING}\n")
    } else {
        format!("{REFERENCES_HEADING}\n\n{}\n", entries.join("\n"))
    }
}

/// Render the direct element children of `container` as markdown blocks
///
/// Every emitted block ends with a blank line. Unknown tags and bare text are
/// skipped.
pub fn convert_block(container: ElementRef<'_>) -> String {
    let mut markdown = String::new();

    for child in child_elements(container) {
        let block = match child.value().name() {
            "h2" => Some(format!("## {}", text_of(child).trim())),
            "h3" => Some(format!("### {}", text_of(child).trim())),
            "p" => non_blank(render_inline(child)),
            "figure" => non_blank(figure_markdown(child)),
            "ul" => non_blank(list_markdown(child, false)),
            "ol" => non_blank(list_markdown(child, true)),
            _ => None,
        };

        if let Some(block) = block {
            markdown.push_str(&block);
            markdown.push_str("\n\n");
        }
    }

    markdown
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Image line and italic caption of a `figure`
pub fn figure_markdown(figure: ElementRef<'_>) -> String {
    let mut lines = Vec::new();

    if let Some(img) = find_first(figure, &Matcher::Tag("img")) {
        let alt = img.value().attr("alt").unwrap_or_default();
        if let Some(src) = img.value().attr("src").and_then(normalize_image_src) {
            lines.push(format!("![{alt}]({src})"));
        }
    }

    if let Some(caption) = find_first(figure, &Matcher::Tag("figcaption")) {
        let text = render_inline(caption);
        if !text.is_empty() {
            lines.push(format!("*{text}*"));
        }
    }

    lines.join("\n\n")
}

/// Absolute CDN URL for an image source
///
/// Site-relative paths are prefixed with [`CDN_ORIGIN`], protocol-relative
/// CDN URLs get `https:`, URLs already on the CDN are kept. Anything else,
/// other hosts included, is dropped.
pub fn normalize_image_src(src: &str) -> Option<String> {
    let src = src.trim();
    let absolute = if let Some(host_and_path) = src.strip_prefix("//") {
        format!("https://{host_and_path}")
    } else if src.starts_with('/') {
        format!("{CDN_ORIGIN}{src}")
    } else {
        src.to_string()
    };

    let on_cdn = absolute
        .strip_prefix(CDN_ORIGIN)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
    on_cdn.then_some(absolute)
}

/// Render the direct `li` children of a list with fresh numbering
///
/// Nested lists are not expanded; their text folds into the parent item.
pub fn list_markdown(list: ElementRef<'_>, ordered: bool) -> String {
    child_elements(list)
        .filter(|child| child.value().name() == "li")
        .enumerate()
        .map(|(index, item)| {
            let text = render_inline(item);
            if ordered {
                format!("{}. {text}", index + 1)
            } else {
                format!("- {text}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
