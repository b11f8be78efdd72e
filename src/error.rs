//! Error types for DynaSQL.

use thiserror::Error;

/// The main error type for DynaSQL operations.
#[derive(Debug, Error)]
pub enum DynaError {
    /// A builder method received an argument it cannot accept.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// `and` / `or` was called on a join that has no ON comparison yet.
    #[error("There is no existing comparison to combine with; call `on` first")]
    NoExistingComparison,

    /// `default_value` was called on a table definition whose last item is not a column.
    #[error("The last item added to the table is not a column")]
    LastItemNotColumn,

    /// `end` was called on a script without an open block.
    #[error("There is no open block to end in this script")]
    NoOpenBlock,

    /// A hint or option was added twice to the same set.
    #[error("Duplicate hint: '{0}' is already present")]
    DuplicateHint(String),

    /// A required part of a clause was never set.
    #[error("Cannot build {clause}: the {part} has not been set")]
    MissingClause {
        clause: &'static str,
        part: &'static str,
    },

    /// The target dialect cannot express a construct.
    #[error("Unsupported: {feature} is not supported in {dialect}")]
    Unsupported { feature: String, dialect: String },

    /// A typed XML slot contained the wrong element.
    #[error("XML type mismatch: expected {expected} but found <{found}>")]
    XmlTypeMismatch { expected: String, found: String },

    /// The XML document is structurally invalid for a statement tree.
    #[error("XML format error: {0}")]
    XmlFormat(String),

    /// Underlying XML reader/writer failure.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed XML attribute.
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid TOML configuration file.
    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DynaError {
    /// Create an invalid argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a missing clause error.
    pub fn missing(clause: &'static str, part: &'static str) -> Self {
        Self::MissingClause { clause, part }
    }

    /// Create an unsupported-feature error.
    pub fn unsupported(feature: impl Into<String>, dialect: impl Into<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
            dialect: dialect.into(),
        }
    }

    /// Create an XML type mismatch error.
    pub fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::XmlTypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an XML format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::XmlFormat(message.into())
    }
}

/// Result type alias for DynaSQL operations.
pub type DynaResult<T> = Result<T, DynaError>;
