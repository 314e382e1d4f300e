//! Small navigation helpers over the parsed tree
//!
//! The heuristic stage needs upward walks and normalized subtree text;
//! keeping those as plain functions over [`ElementRef`] makes the
//! depth-bounded ancestor search testable against in-memory fixtures.

use scraper::{ElementRef, Selector};

/// Collapse every whitespace run (spaces, newlines, tabs) to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of a subtree with inter-element boundaries normalized to
/// single spaces.
pub fn element_text(element: ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Ancestor elements of `element`, nearest first.
pub fn ancestor_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.ancestors().filter_map(ElementRef::wrap)
}

/// First `<img>` in the subtree.
pub fn first_image(element: ElementRef) -> Option<ElementRef> {
    let selector = Selector::parse("img").unwrap();
    element.select(&selector).next()
}

/// Normalized text of the first heading-like descendant.
pub fn first_heading_text(element: ElementRef) -> Option<String> {
    let selector = Selector::parse("h1, h2, h3, h4, h5, h6").unwrap();
    element
        .select(&selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}
