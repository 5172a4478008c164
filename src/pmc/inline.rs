//! Inline formatting inside one block element
//!
//! Only the element's direct children carry style. Anything nested below a
//! styled child is flattened to its text.

use scraper::{ElementRef, Node};

use crate::pmc::dom::text_of;
use crate::pmc::models::{InlineRun, InlineSpan};

/// Split the children of `element` into styled spans
pub fn inline_run(element: ElementRef<'_>) -> InlineRun {
    let spans = element
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => {
                let content: &str = text;
                Some(InlineSpan::Plain(content.to_string()))
            }
            Node::Element(_) => ElementRef::wrap(child).map(styled_span),
            _ => None,
        })
        .collect();

    InlineRun { spans }
}

/// Render the children of `element` as trimmed markdown inline text
pub fn render_inline(element: ElementRef<'_>) -> String {
    inline_run(element).render()
}

fn styled_span(child: ElementRef<'_>) -> InlineSpan {
    let text = text_of(child);
    match child.value().name() {
        "em" | "i" => InlineSpan::Emphasis(text),
        "strong" | "b" => InlineSpan::Strong(text),
        "sup" => InlineSpan::Superscript(text),
        "sub" => InlineSpan::Subscript(text),
        "a" => match child.value().attr("href") {
            Some(href) if href.starts_with("http") => InlineSpan::Link {
                text,
                url: href.to_string(),
            },
            _ => InlineSpan::Plain(text),
        },
        _ => InlineSpan::Plain(text),
    }
}
