use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::export::Flatten;
use crate::extractor::fields;

/// One entry recovered from a primary table.
///
/// Built through [`RecordBuilder`](super::RecordBuilder); immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    identifier: String,
    name: String,
    categories: Vec<String>,
    primary_image: Option<String>,
    attributes: BTreeMap<String, String>,
}

impl Record {
    pub(crate) fn new(
        identifier: String,
        name: String,
        categories: Vec<String>,
        primary_image: Option<String>,
        attributes: BTreeMap<String, String>,
    ) -> Self {
        Self {
            identifier,
            name,
            categories,
            primary_image,
            attributes,
        }
    }

    /// Zero-padded entry number, e.g. `"025"`.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Categories in page order, duplicates kept.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Absolute URL of the first image found in column 0.
    pub fn primary_image(&self) -> Option<&str> {
        self.primary_image.as_deref()
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

impl Flatten for Record {
    fn flatten(&self) -> BTreeMap<String, String> {
        let mut row = BTreeMap::new();
        row.insert(fields::IDENTIFIER.to_string(), self.identifier.clone());
        row.insert(fields::NAME.to_string(), self.name.clone());
        row.insert(
            fields::CATEGORY.to_string(),
            self.categories.join(fields::CATEGORY_SEPARATOR),
        );
        row.insert(
            fields::PRIMARY_IMAGE.to_string(),
            self.primary_image.clone().unwrap_or_default(),
        );
        for (key, value) in &self.attributes {
            row.insert(key.clone(), value.clone());
        }
        row
    }
}
