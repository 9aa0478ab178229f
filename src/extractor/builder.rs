use std::collections::BTreeMap;
use std::mem;

use crate::extractor::{errors::BuildError, fields, model::Record};

/// Accumulates the fields of one table and produces a [`Record`].
///
/// Setters can be chained and called in any order. [`build`](Self::build)
/// always clears the pending state, so one builder can be reused table after
/// table without leaking fields between records.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    identifier: Option<String>,
    name: Option<String>,
    categories: Vec<String>,
    primary_image: Option<String>,
    attributes: BTreeMap<String, String>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_identifier(&mut self, value: impl Into<String>) -> &mut Self {
        self.identifier = Some(value.into());
        self
    }

    pub fn set_name(&mut self, value: impl Into<String>) -> &mut Self {
        self.name = Some(value.into());
        self
    }

    pub fn add_category(&mut self, value: impl Into<String>) -> &mut Self {
        self.categories.push(value.into());
        self
    }

    pub fn set_primary_image(&mut self, url: impl Into<String>) -> &mut Self {
        self.primary_image = Some(url.into());
        self
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Drop every pending field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Finalize the pending fields into a [`Record`].
    ///
    /// Fails when the identifier or the name was never set, or when an
    /// attribute uses a canonical label as key. Pending state is cleared
    /// either way.
    pub fn build(&mut self) -> Result<Record, BuildError> {
        let pending = mem::take(self);

        let identifier = pending.identifier.ok_or(BuildError::MissingIdentifier)?;
        let name = pending.name.ok_or(BuildError::MissingName)?;
        if let Some(key) = pending.attributes.keys().find(|k| fields::is_canonical(k)) {
            return Err(BuildError::ReservedAttribute(key.clone()));
        }

        Ok(Record::new(
            identifier,
            name,
            pending.categories,
            pending.primary_image,
            pending.attributes,
        ))
    }
}
