//! Error types for the construction/configuration boundary.
//!
//! Runtime deck operations never fail: out-of-range requests and calls made
//! while a transition is in flight are ignored instead.

/// Errors surfaced when building a deck from configuration.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum DeckError {
    /// A configuration value is outside its allowed range.
    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// The configuration JSON could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl DeckError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
