//! Error types for texture processing
//!
//! `TextureError` covers the pipeline's own failure modes plus the
//! collaborator failures (container decode/encode, block encoders, I/O)
//! that the pipeline wraps and reports.

use crate::platform::Platform;

/// Errors raised while validating options, converting pixels or running the pipeline
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// Malformed argument: non-positive epsilon or gamma, out-of-range reference alpha
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Pixel layout or target combination with no defined conversion path
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Any failure during the ordered transform sequence
    #[error("Failed to process texture '{asset}': {source}")]
    ProcessingFailed {
        asset: String,
        #[source]
        source: Box<TextureError>,
    },

    /// A platform compression precondition is not met
    #[error("{platform} constraint violated: {reason}")]
    PlatformConstraintViolation { platform: Platform, reason: String },

    /// Container or pixel data could not be decoded
    #[error("Decode failed: {0}")]
    Decode(String),

    /// Container or pixel data could not be encoded
    #[error("Encode failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TextureError {
    /// Wrap an error as `ProcessingFailed` for the given asset.
    ///
    /// Errors that already carry an asset identity are returned unchanged.
    pub fn processing_failed(asset: &str, err: TextureError) -> Self {
        match err {
            TextureError::ProcessingFailed { .. } => err,
            other => TextureError::ProcessingFailed {
                asset: asset.to_string(),
                source: Box::new(other),
            },
        }
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, TextureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_argument() {
        let err = TextureError::InvalidArgument("gamma must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid argument: gamma must be positive");
    }

    #[test]
    fn test_processing_failed_carries_asset_and_cause() {
        let err = TextureError::processing_failed(
            "textures/rock.dds",
            TextureError::UnsupportedFormat("ETC1 decode".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Failed to process texture 'textures/rock.dds': Unsupported format: ETC1 decode"
        );

        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Unsupported format: ETC1 decode"));
    }

    #[test]
    fn test_processing_failed_is_not_wrapped_twice() {
        let inner = TextureError::processing_failed("a.dds", TextureError::Encode("x".into()));
        let outer = TextureError::processing_failed("b.dds", inner);
        match outer {
            TextureError::ProcessingFailed { asset, .. } => assert_eq!(asset, "a.dds"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_platform_violation_display() {
        let err = TextureError::PlatformConstraintViolation {
            platform: Platform::Ios,
            reason: "texture must be square".to_string(),
        };
        assert_eq!(err.to_string(), "ios constraint violated: texture must be square");
    }
}
