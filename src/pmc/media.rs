//! Tables and figure images of an article page
//!
//! Page chrome (banners, navigation, headers, footers, scripts) is excluded
//! before anything is collected. Images are then filtered down to the ones
//! that look like figures rather than icons.

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::pmc::content::normalize_image_src;
use crate::pmc::dom::{attr_trimmed, child_elements, find_all, find_first, text_of, Matcher};
use crate::pmc::models::{FigureRecord, MediaInventory, TableRecord};
use crate::pmc::patterns::collapse_whitespace;

const CHROME_TAGS: &[&str] = &["header", "nav", "footer", "aside", "script", "style"];
const CHROME_CLASSES: &[&str] = &["usa-banner", "skip-link", "ncbi-header", "header", "footer"];
const CHROME_IDS: &[&str] = &["skip-to-main-content", "header", "footer"];

const DECORATIVE_TERMS: &[&str] = &["icon", "button", "logo", "arrow", "bullet"];
const FIGURE_TERMS: &[&str] = &["figure", "fig", "graph", "chart", "plot", "diagram", "image"];

/// Smallest side, in pixels, of an image that still counts as a figure
const MIN_FIGURE_SIDE: u32 = 100;

/// Collect tables and figure images from an article page
pub fn extract_media(html: &str) -> MediaInventory {
    let document = Html::parse_document(html);
    let root = media_root(&document);

    let tables: Vec<TableRecord> = find_all(root, &Matcher::Tag("table"))
        .into_iter()
        .filter(|table| !in_chrome(*table))
        .map(table_record)
        .collect();

    let images: Vec<FigureRecord> = find_all(root, &Matcher::Tag("img"))
        .into_iter()
        .filter(|img| !in_chrome(*img))
        .filter_map(figure_candidate)
        .collect();

    debug!(
        tables = tables.len(),
        images = images.len(),
        "Extracted media inventory"
    );

    MediaInventory { tables, images }
}

fn is_chrome(element: ElementRef<'_>) -> bool {
    let value = element.value();
    CHROME_TAGS.contains(&value.name())
        || value.classes().any(|class| CHROME_CLASSES.contains(&class))
        || value.id().is_some_and(|id| CHROME_IDS.contains(&id))
}

/// Whether the element or any of its ancestors is page chrome
fn in_chrome(element: ElementRef<'_>) -> bool {
    is_chrome(element) || element.ancestors().filter_map(ElementRef::wrap).any(is_chrome)
}

fn media_root(document: &Html) -> ElementRef<'_> {
    let root = document.root_element();
    let candidates = [
        Matcher::Tag("article"),
        Matcher::Class("article"),
        Matcher::Tag("main"),
        Matcher::AttrEquals {
            name: "id",
            value: "maincontent",
        },
        Matcher::Class("content"),
    ];

    candidates
        .iter()
        .find_map(|matcher| {
            find_all(root, matcher)
                .into_iter()
                .find(|element| !in_chrome(*element))
        })
        .unwrap_or(root)
}

fn cell_texts(row: ElementRef<'_>, cell_tag: &str) -> Vec<String> {
    child_elements(row)
        .filter(|cell| cell.value().name() == cell_tag)
        .map(|cell| collapse_whitespace(&text_of(cell)))
        .collect()
}

fn table_record(table: ElementRef<'_>) -> TableRecord {
    let mut headers = Vec::new();
    let mut rows = Vec::new();

    for row in find_all(table, &Matcher::Tag("tr")) {
        if headers.is_empty() {
            let header_cells = cell_texts(row, "th");
            if !header_cells.is_empty() {
                headers = header_cells;
                continue;
            }
        }

        let cells = cell_texts(row, "td");
        if !cells.is_empty() {
            rows.push(cells);
        }
    }

    TableRecord {
        headers,
        rows,
        caption: table_caption(table),
        summary: attr_trimmed(table, "summary"),
    }
}

fn table_caption(table: ElementRef<'_>) -> Option<String> {
    if let Some(caption) = find_first(table, &Matcher::Tag("caption")) {
        return non_empty(collapse_whitespace(&text_of(caption)));
    }

    let wrapper = table.ancestors().filter_map(ElementRef::wrap).find(|el| {
        el.value().name() == "figure" || el.value().classes().any(|c| c == "table-wrap")
    })?;

    [Matcher::Tag("figcaption"), Matcher::Class("caption")]
        .iter()
        .find_map(|matcher| find_first(wrapper, matcher))
        .and_then(|caption| non_empty(collapse_whitespace(&text_of(caption))))
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Parsed `width`/`height`; `Err` when present but not an integer
fn dimension(img: ElementRef<'_>, name: &str) -> Result<Option<u32>, ()> {
    match attr_trimmed(img, name) {
        None => Ok(None),
        Some(raw) => raw
            .trim_end_matches("px")
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ()),
    }
}

fn mentions_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

fn figure_candidate(img: ElementRef<'_>) -> Option<FigureRecord> {
    let raw_src = attr_trimmed(img, "src")?;
    let alt = img.value().attr("alt").unwrap_or_default().trim().to_string();
    let title = attr_trimmed(img, "title");

    let (width, height) = match (dimension(img, "width"), dimension(img, "height")) {
        (Ok(width), Ok(height)) => (width, height),
        _ => {
            // Unreadable sizes: keep only images with descriptive alt text
            if alt.chars().count() <= 3 {
                return None;
            }
            (None, None)
        }
    };

    let record = FigureRecord {
        src: Some(normalize_image_src(&raw_src).unwrap_or(raw_src)),
        alt,
        title,
        caption: figure_caption(img),
        width,
        height,
    };

    looks_like_figure(&record).then_some(record)
}

/// Size is unknown or large enough, and alt or title text is not decorative
pub fn looks_like_figure(record: &FigureRecord) -> bool {
    let alt = record.alt.to_lowercase();
    let title = record.title.as_deref().unwrap_or_default().to_lowercase();

    let width = record.width.unwrap_or(0);
    let height = record.height.unwrap_or(0);
    let size_ok = width >= MIN_FIGURE_SIDE || height >= MIN_FIGURE_SIDE || width == 0 || height == 0;

    (size_ok && !alt.is_empty() && !mentions_any(&alt, DECORATIVE_TERMS))
        || (!title.is_empty() && !mentions_any(&title, DECORATIVE_TERMS))
        || mentions_any(&alt, FIGURE_TERMS)
}

fn figure_caption(img: ElementRef<'_>) -> Option<String> {
    let figure = img
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "figure")?;
    let caption = find_first(figure, &Matcher::Tag("figcaption"))?;
    non_empty(collapse_whitespace(&text_of(caption)))
}
