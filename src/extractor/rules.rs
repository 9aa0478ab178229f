//! Row heuristics.
//!
//! Each rule looks at one table row and writes what it recognises into the
//! table's [`Accumulator`]. Rules run in the order of [`RULES`]; a rule may end
//! the row early by returning [`Flow::SkipRow`].

use std::collections::BTreeMap;

use scraper::ElementRef;
use tracing::trace;
use url::Url;

use crate::extractor::{
    errors::ExtractError,
    fields,
    html::{
        CELL_SELECTOR, collapse_whitespace, first_image, first_image_src, image_src, raw_text,
        resolve_image, spaced_text, stripped_text,
    },
};

/// Settings shared by every rule.
#[derive(Debug, Clone)]
pub struct RuleContext {
    base_url: Url,
}

impl RuleContext {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Origin images are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// Label/value pairs collected while scanning one table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Accumulator {
    entries: BTreeMap<String, String>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Last write wins.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(label.into(), value.into());
    }

    pub fn take(&mut self, label: &str) -> Option<String> {
        self.entries.remove(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Accumulator {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A `<tr>` with its `<td>` cells and the row that follows it.
#[derive(Debug, Clone)]
pub struct Row<'a> {
    index: usize,
    element: ElementRef<'a>,
    cells: Vec<ElementRef<'a>>,
    next: Option<ElementRef<'a>>,
}

impl<'a> Row<'a> {
    pub fn new(index: usize, element: ElementRef<'a>, next: Option<ElementRef<'a>>) -> Self {
        Self {
            index,
            element,
            cells: element.select(&CELL_SELECTOR).collect(),
            next,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, index: usize) -> Result<ElementRef<'a>, ExtractError> {
        self.cells
            .get(index)
            .copied()
            .ok_or(ExtractError::MissingCell {
                row: self.index,
                index,
            })
    }
}

/// Whether the remaining rules still see the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    SkipRow,
}

pub type Rule = fn(&Row<'_>, &RuleContext, &mut Accumulator) -> Result<Flow, ExtractError>;

pub const RULES: [(&str, Rule); 4] = [
    ("primary_image", primary_image),
    ("identifier", identifier),
    ("variant_image", variant_image),
    ("label_value_pairs", label_value_pairs),
];

/// Run every rule over `row`, stopping early when one asks to.
pub fn apply_rules(
    row: &Row<'_>,
    context: &RuleContext,
    acc: &mut Accumulator,
) -> Result<(), ExtractError> {
    for (name, rule) in RULES {
        if rule(row, context, acc)? == Flow::SkipRow {
            trace!(rule = name, row = row.index(), "rule ended row early");
            break;
        }
    }
    Ok(())
}

/// First image in column 0 becomes the primary image. Later ones are ignored.
pub fn primary_image(
    row: &Row<'_>,
    context: &RuleContext,
    acc: &mut Accumulator,
) -> Result<Flow, ExtractError> {
    if acc.contains(fields::PRIMARY_IMAGE) {
        return Ok(Flow::Continue);
    }

    if let Some(src) = first_image_src(row.cell(0)?) {
        acc.insert(fields::PRIMARY_IMAGE, resolve_image(context.base_url(), src)?);
    }
    Ok(Flow::Continue)
}

/// `[_, "Nº:", value]` or `[".. Nº ..", value]`; the last matching row wins.
pub fn identifier(
    row: &Row<'_>,
    _context: &RuleContext,
    acc: &mut Accumulator,
) -> Result<Flow, ExtractError> {
    let label = format!("{}:", fields::IDENTIFIER);

    if row.len() >= 3 && stripped_text(row.cell(1)?) == label {
        acc.insert(fields::IDENTIFIER, stripped_text(row.cell(2)?));
    } else if row.len() >= 2 && raw_text(row.cell(0)?).contains(fields::IDENTIFIER) {
        acc.insert(fields::IDENTIFIER, stripped_text(row.cell(1)?));
    }
    Ok(Flow::Continue)
}

/// Alternate coloration image.
///
/// A row mentioning the variant marker takes its own first image, or the
/// next row's when it has none, and is not scanned for label/value pairs. A row whose first cell
/// holds `Nome:` and which carries an image also provides the variant image.
pub fn variant_image(
    row: &Row<'_>,
    context: &RuleContext,
    acc: &mut Accumulator,
) -> Result<Flow, ExtractError> {
    let line = spaced_text(row.element).to_lowercase();

    if line.contains(fields::VARIANT_MARKER) {
        let src = match first_image(row.element) {
            Some(img) => image_src(img),
            None => row.next.and_then(first_image_src),
        };
        if let Some(src) = src {
            acc.insert(fields::VARIANT_IMAGE, resolve_image(context.base_url(), src)?);
        }
        return Ok(Flow::SkipRow);
    }

    if row.len() >= 2
        && raw_text(row.cell(0)?).contains(fields::NAME_MARKER)
        && let Some(src) = first_image_src(row.element)
    {
        acc.insert(fields::VARIANT_IMAGE, resolve_image(context.base_url(), src)?);
    }
    Ok(Flow::Continue)
}

/// Cells `(0,1)`, `(2,3)`, … whose left cell ends with a colon.
pub fn label_value_pairs(
    row: &Row<'_>,
    _context: &RuleContext,
    acc: &mut Accumulator,
) -> Result<Flow, ExtractError> {
    for pair in row.cells.chunks_exact(2) {
        let text = stripped_text(pair[0]);
        if !text.ends_with(':') {
            continue;
        }
        let label = text.trim_end_matches(':');
        acc.insert(label, collapse_whitespace(&spaced_text(pair[1])));
    }
    Ok(Flow::Continue)
}
