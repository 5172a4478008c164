//! Typed queries over a parsed HTML tree
//!
//! Lookups are expressed as [`Matcher`] values and run with [`find_first`] or
//! [`find_all`]. Both walk the descendants of a root element in document
//! order and never return the root itself.

use regex::Regex;
use scraper::{ElementRef, Html, Node};

/// A predicate on a single element
#[derive(Debug, Clone)]
pub enum Matcher<'a> {
    /// Tag name, lowercase
    Tag(&'a str),
    /// Membership in the `class` list
    Class(&'a str),
    /// `id` attribute matching a pattern
    IdPattern(&'a Regex),
    /// Attribute equal to a value
    AttrEquals { name: &'a str, value: &'a str },
    /// Attribute containing a whitespace-separated token (`rel="canonical"`)
    AttrToken { name: &'a str, token: &'a str },
    /// Attribute matching a pattern
    AttrPattern { name: &'a str, pattern: &'a Regex },
    /// Every inner matcher holds
    All(Vec<Matcher<'a>>),
}

impl<'a> Matcher<'a> {
    /// Conjunction with another matcher
    pub fn and(self, other: Matcher<'a>) -> Matcher<'a> {
        match self {
            Matcher::All(mut inner) => {
                inner.push(other);
                Matcher::All(inner)
            }
            first => Matcher::All(vec![first, other]),
        }
    }

    pub fn matches(&self, element: ElementRef<'_>) -> bool {
        let value = element.value();
        match self {
            Matcher::Tag(name) => value.name().eq_ignore_ascii_case(name),
            Matcher::Class(class) => value.classes().any(|c| c == *class),
            Matcher::IdPattern(pattern) => value.id().is_some_and(|id| pattern.is_match(id)),
            Matcher::AttrEquals { name, value: expected } => {
                value.attr(name).is_some_and(|v| v == *expected)
            }
            Matcher::AttrToken { name, token } => value
                .attr(name)
                .is_some_and(|v| v.split_whitespace().any(|t| t.eq_ignore_ascii_case(token))),
            Matcher::AttrPattern { name, pattern } => {
                value.attr(name).is_some_and(|v| pattern.is_match(v))
            }
            Matcher::All(inner) => inner.iter().all(|m| m.matches(element)),
        }
    }
}

fn strict_descendants<'d>(root: ElementRef<'d>) -> impl Iterator<Item = ElementRef<'d>> {
    root.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// First descendant of `root` matching `matcher`
pub fn find_first<'d>(root: ElementRef<'d>, matcher: &Matcher<'_>) -> Option<ElementRef<'d>> {
    strict_descendants(root).find(|element| matcher.matches(*element))
}

/// Every descendant of `root` matching `matcher`, in document order
pub fn find_all<'d>(root: ElementRef<'d>, matcher: &Matcher<'_>) -> Vec<ElementRef<'d>> {
    strict_descendants(root)
        .filter(|element| matcher.matches(*element))
        .collect()
}

/// Direct element children, skipping text and comments
pub fn child_elements<'d>(element: ElementRef<'d>) -> impl Iterator<Item = ElementRef<'d>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Concatenated text of every descendant text node
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Trimmed attribute value, `None` when missing or blank
pub fn attr_trimmed(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// First text node anywhere in the document for which `extract` yields a value
///
/// Comments are not text nodes and are never searched.
pub fn find_in_text<F>(document: &Html, mut extract: F) -> Option<String>
where
    F: FnMut(&str) -> Option<String>,
{
    document.tree.root().descendants().find_map(|node| match node.value() {
        Node::Text(text) => {
            let content: &str = text;
            extract(content)
        }
        _ => None,
    })
}
