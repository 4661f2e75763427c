//! DOM helpers shared by the page extractors
//!
//! Small, independent heuristics over a parsed document: container lookup by
//! class-name substrings, text extraction, image lookup and URL resolution.

use crate::coin::GENERIC_IMAGE_URL;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Parses a selector written in source code
///
/// Only used with literal CSS, so a parse failure is a programming error.
pub fn parse_selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Returns true if the element's class attribute contains any of the patterns
///
/// Matching is case-insensitive and by substring, so `coin` matches
/// `coin-box` and `CommemorativeCoin`.
pub fn has_class_matching(element: &ElementRef, patterns: &[&str]) -> bool {
    element
        .value()
        .attr("class")
        .map(|class| {
            let class = class.to_ascii_lowercase();
            patterns.iter().any(|pattern| class.contains(pattern))
        })
        .unwrap_or(false)
}

/// Finds the coin containers among elements matching `tags` whose class
/// matches a pattern
///
/// Nested matches normally collapse to the outermost one, so a `coin-box`
/// holding a `coin-image` yields a single container. A match that holds two
/// or more separate image-bearing matches is a listing wrapper instead
/// (`entry-content` around several `post` articles) and is replaced by those
/// inner containers, recursively.
pub fn coin_containers<'a>(
    document: &'a Html,
    tags: &Selector,
    patterns: &[&str],
) -> Vec<ElementRef<'a>> {
    let images = parse_selector("img");
    let mut containers = Vec::new();

    let matching = document
        .select(tags)
        .filter(|element| has_class_matching(element, patterns));
    for element in outermost(matching) {
        split_wrappers(element, tags, patterns, &images, &mut containers);
    }

    containers
}

fn split_wrappers<'a>(
    element: ElementRef<'a>,
    tags: &Selector,
    patterns: &[&str],
    images: &Selector,
    containers: &mut Vec<ElementRef<'a>>,
) {
    let inner = outermost(element.select(tags).filter(|inner| {
        inner.id() != element.id()
            && has_class_matching(inner, patterns)
            && inner.select(images).next().is_some()
    }));

    if inner.len() < 2 {
        containers.push(element);
        return;
    }

    for child in inner {
        split_wrappers(child, tags, patterns, images, containers);
    }
}

/// Keeps the elements not nested inside an earlier kept one
///
/// Expects document order, where ancestors come first.
fn outermost<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Vec<ElementRef<'a>> {
    let mut kept: Vec<ElementRef<'a>> = Vec::new();

    for element in elements {
        let nested = element
            .ancestors()
            .any(|ancestor| kept.iter().any(|container| container.id() == ancestor.id()));

        if !nested {
            kept.push(element);
        }
    }

    kept
}

/// Collects the text of an element with whitespace collapsed
///
/// Text nodes are joined with a space so `<strong>Label:</strong>5` reads as
/// `Label: 5`.
pub fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the text of the first element under `element` matching `selector`
/// that has non-empty text
pub fn first_text(element: &ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .map(|found| element_text(&found))
        .find(|text| !text.is_empty())
}

/// Returns the source of an `img` element (`src`, else `data-src`)
pub fn img_source<'a>(img: &ElementRef<'a>) -> Option<&'a str> {
    ["src", "data-src"]
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .map(str::trim)
        .find(|src| !src.is_empty())
}

/// Returns the source of the first `img` under `element` that has one
pub fn image_source<'a>(element: &ElementRef<'a>, img_selector: &Selector) -> Option<&'a str> {
    element
        .select(img_selector)
        .find_map(|img| img_source(&img))
}

/// Resolves an image reference against the source's base URL
///
/// Returns the generic stock picture when the reference cannot be turned
/// into an absolute http(s) URL.
pub fn resolve_url(href: &str, base_url: &Url) -> String {
    match base_url.join(href.trim()) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => url.to_string(),
        _ => GENERIC_IMAGE_URL.to_string(),
    }
}
