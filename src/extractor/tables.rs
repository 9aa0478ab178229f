use std::iter::Enumerate;

use scraper::{ElementRef, Html, html::Select};
use tracing::{debug, error};
use url::Url;

use crate::extractor::{
    builder::RecordBuilder,
    errors::{BuildError, ExtractError},
    fields,
    html::{PRIMARY_TABLE_SELECTOR, ROW_SELECTOR},
    model::Record,
    rules::{Accumulator, Row, RuleContext, apply_rules},
};

/// Turns the primary tables of a page into [`Record`]s.
#[derive(Debug, Clone)]
pub struct TableExtractor {
    context: RuleContext,
}

impl TableExtractor {
    pub fn new(base_url: Url) -> Self {
        Self {
            context: RuleContext::new(base_url),
        }
    }

    /// Lazily yield one record per primary table of `document`.
    ///
    /// Tables that fail to extract are logged with `page_url` and their
    /// ordinal, then skipped.
    pub fn records<'a>(&'a self, document: &'a Html, page_url: &'a str) -> Records<'a> {
        Records {
            extractor: self,
            tables: document.select(&PRIMARY_TABLE_SELECTOR).enumerate(),
            page_url,
            builder: RecordBuilder::new(),
        }
    }

    /// Parse `html` and collect every record it holds.
    pub fn extract_all(&self, html: &str, page_url: &str) -> Vec<Record> {
        let document = Html::parse_document(html);
        self.records(&document, page_url).collect()
    }

    /// Reduce a single table to a record.
    pub fn extract_table(
        &self,
        table: ElementRef<'_>,
        builder: &mut RecordBuilder,
    ) -> Result<Record, ExtractError> {
        let acc = scan_table(table, &self.context)?;
        Ok(assemble(acc, builder)?)
    }
}

/// Stream every row of `table` through the rules.
pub fn scan_table(table: ElementRef<'_>, context: &RuleContext) -> Result<Accumulator, ExtractError> {
    let rows: Vec<ElementRef<'_>> = table.select(&ROW_SELECTOR).collect();
    let mut acc = Accumulator::new();

    for (index, element) in rows.iter().enumerate() {
        let row = Row::new(index, *element, rows.get(index + 1).copied());
        if row.is_empty() {
            continue;
        }
        apply_rules(&row, context, &mut acc)?;
    }

    Ok(acc)
}

/// Route canonical labels to their fields and everything else to attributes.
pub fn assemble(mut acc: Accumulator, builder: &mut RecordBuilder) -> Result<Record, BuildError> {
    if let Some(identifier) = acc.take(fields::IDENTIFIER) {
        builder.set_identifier(identifier);
    }
    if let Some(name) = acc.take(fields::NAME) {
        builder.set_name(name);
    }
    if let Some(categories) = acc.take(fields::CATEGORY) {
        for category in categories.split(fields::CATEGORY_SEPARATOR) {
            builder.add_category(category.trim());
        }
    }
    if let Some(image) = acc.take(fields::PRIMARY_IMAGE) {
        builder.set_primary_image(image);
    }
    for (label, value) in acc {
        builder.set_attribute(label, value);
    }
    builder.build()
}

/// Iterator returned by [`TableExtractor::records`].
pub struct Records<'a> {
    extractor: &'a TableExtractor,
    tables: Enumerate<Select<'a, 'static>>,
    page_url: &'a str,
    builder: RecordBuilder,
}

impl Iterator for Records<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        loop {
            let (index, table) = self.tables.next()?;
            match self.extractor.extract_table(table, &mut self.builder) {
                Ok(record) => {
                    debug!(
                        page = self.page_url,
                        table = index,
                        identifier = record.identifier(),
                        "extracted record"
                    );
                    return Some(record);
                }
                Err(err) => {
                    error!(
                        page = self.page_url,
                        table = index,
                        error = %err,
                        "error parsing table, skipping it"
                    );
                }
            }
        }
    }
}
