use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::extractor::errors::ExtractError;

pub(crate) static PRIMARY_TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table[id]").unwrap());

pub(crate) static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").unwrap());

pub(crate) static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").unwrap());

static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// All descendant text, untouched.
pub fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Descendant text nodes trimmed and glued together without separator.
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Descendant text nodes trimmed and joined with single spaces.
pub fn spaced_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}

pub fn first_image<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.select(&IMAGE_SELECTOR).next()
}

/// Non-blank `src` of an `<img>`.
pub fn image_src<'a>(img: ElementRef<'a>) -> Option<&'a str> {
    img.value().attr("src").filter(|src| !src.trim().is_empty())
}

/// `src` of the first descendant `<img>`. Later images are never consulted,
/// even when the first one has no usable source.
pub fn first_image_src<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    first_image(element).and_then(image_src)
}

/// Resolve an image reference against the site origin.
pub fn resolve_image(base_url: &Url, src: &str) -> Result<String, ExtractError> {
    base_url
        .join(src.trim())
        .map(String::from)
        .map_err(|source| ExtractError::InvalidImageUrl {
            src: src.to_string(),
            source,
        })
}
