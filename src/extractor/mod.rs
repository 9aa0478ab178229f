pub mod builder;
pub mod errors;
pub mod fields;
pub mod html;
pub mod model;
pub mod rules;
pub mod tables;

#[cfg(test)]
mod tests;

pub use builder::RecordBuilder;
pub use errors::{BuildError, ExtractError};
pub use model::Record;
pub use rules::{Accumulator, RuleContext};
pub use tables::{Records, TableExtractor};

use crate::fetcher::types::FetchedPage;

/// Extract every record held by a fetched page.
///
/// Parsing and extraction are synchronous; the parsed document never leaves
/// this call.
pub fn extract(page: &FetchedPage, extractor: &TableExtractor) -> Vec<Record> {
    extractor.extract_all(&page.body_utf8, page.url_final.as_str())
}
