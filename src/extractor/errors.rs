use thiserror::Error;

/// Validation failures raised by [`RecordBuilder::build`](super::RecordBuilder::build).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("record has no identifier")]
    MissingIdentifier,

    #[error("record has no name")]
    MissingName,

    #[error("attribute key '{0}' is reserved for a canonical field")]
    ReservedAttribute(String),
}

/// Failures that drop a single table's record.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("row {row} has no cell at index {index}")]
    MissingCell { row: usize, index: usize },

    #[error("image source '{src}' cannot be resolved: {source}")]
    InvalidImageUrl {
        src: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Build(#[from] BuildError),
}
