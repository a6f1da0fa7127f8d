use thiserror::Error;

use crate::extension::georss::GeometryError;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while building or serializing a feed.
///
/// Construction errors (`ElementRequired`, `EitherElementRequired`,
/// `InvalidExtension`) are returned by `build()` before any field is stored.
/// Serialization errors (`Geometry`, `Xml`, `Encoding`) are returned by
/// [`Feed::to_xml`](crate::Feed::to_xml) and no partial document is produced.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A single required field was not provided.
    #[error("The element \"{0}\" is required and can't be missing")]
    ElementRequired(&'static str),

    /// Neither of two alternative fields was provided.
    #[error("Either \"{0}\" or \"{1}\" must be provided")]
    EitherElementRequired(&'static str, &'static str),

    /// An extension was registered where it cannot be published.
    #[error("Invalid extension: {0}")]
    InvalidExtension(String),

    /// Geometry of a GeoRSS extension is malformed for its kind.
    #[error("GeoRSS validation failed: {0}")]
    Geometry(#[from] GeometryError),

    /// The underlying XML writer failed.
    #[error("XML write error: {0}")]
    Xml(String),

    /// The produced document was not valid UTF-8.
    #[error("Generated XML contains invalid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl FeedError {
    /// Names of the missing fields for the two required-field shapes.
    ///
    /// Empty for every other variant.
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            Self::ElementRequired(field) => vec![*field],
            Self::EitherElementRequired(first, second) => vec![*first, *second],
            _ => Vec::new(),
        }
    }
}

/// Fails with [`FeedError::ElementRequired`] when `value` is `None`.
pub(crate) fn require<T>(value: Option<T>, field: &'static str) -> Result<T, FeedError> {
    value.ok_or(FeedError::ElementRequired(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field_message_names_field() {
        let err = FeedError::ElementRequired("title");
        assert!(err.to_string().contains("\"title\""));
        assert_eq!(err.fields(), vec!["title"]);
    }

    #[test]
    fn test_either_message_names_both_fields() {
        let err = FeedError::EitherElementRequired("title", "description");
        let msg = err.to_string();
        assert!(msg.contains("title"));
        assert!(msg.contains("description"));
        assert!(msg.starts_with("Either"));
        assert_eq!(err.fields(), vec!["title", "description"]);
    }

    #[test]
    fn test_require_passes_value_through() {
        assert_eq!(require(Some(3), "ttl").unwrap(), 3);
        let err = require::<u32>(None, "ttl").unwrap_err();
        assert!(matches!(err, FeedError::ElementRequired("ttl")));
    }

    #[test]
    fn test_other_variants_have_no_fields() {
        assert!(FeedError::Xml("boom".to_string()).fields().is_empty());
    }
}
