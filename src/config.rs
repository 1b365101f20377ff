//! Conversion job configuration
//!
//! Defines the configuration structure for one texture conversion.

use std::path::PathBuf;

use crate::container::ContainerKind;
use crate::error::TextureError;
use crate::options::Options;
use crate::platform::Platform;

/// Configuration for converting one texture file
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Source texture (.dds or .tga)
    pub input: PathBuf,

    /// Output path; derived from the input and platform when unset
    pub output: Option<PathBuf>,

    /// Deployment target that picks the compressed format and container
    pub platform: Platform,

    /// Pipeline options
    pub options: Options,
}

impl ConvertConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            platform: Platform::default(),
            options: Options::default(),
        }
    }

    /// Get the output path: the explicit one, or the input with the
    /// platform container's extension
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension(self.platform.extension()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.input.is_file() {
            return Err(ConfigError::InputNotFound(self.input.clone()));
        }

        match ContainerKind::from_path(&self.input) {
            Some(kind) if kind.can_read() => {}
            _ => return Err(ConfigError::UnreadableContainer(self.input.clone())),
        }

        let output = self.output_path();
        match ContainerKind::from_path(&output) {
            Some(kind) if kind.can_write() => {}
            _ => return Err(ConfigError::UnwritableContainer(output)),
        }

        self.options.validate().map_err(ConfigError::InvalidOptions)?;

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Input texture not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Cannot read texture container: {0} (expected .dds or .tga)")]
    UnreadableContainer(PathBuf),

    #[error("Cannot write texture container: {0} (expected .dds or .ktx)")]
    UnwritableContainer(PathBuf),

    #[error(transparent)]
    InvalidOptions(TextureError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_output_path_follows_platform() {
        let mut config = ConvertConfig::new("art/rock.tga");
        assert_eq!(config.output_path(), Path::new("art/rock.dds"));

        config.platform = Platform::Android;
        assert_eq!(config.output_path(), Path::new("art/rock.ktx"));

        config.output = Some(PathBuf::from("out/x.dds"));
        assert_eq!(config.output_path(), Path::new("out/x.dds"));
    }

    #[test]
    fn test_validate_missing_input() {
        let config = ConvertConfig::new("/definitely/not/here.dds");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InputNotFound(_))
        ));
    }

    #[test]
    fn test_validate_containers() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("a.png");
        std::fs::write(&png, b"x").unwrap();
        assert!(matches!(
            ConvertConfig::new(&png).validate(),
            Err(ConfigError::UnreadableContainer(_))
        ));

        let tga = dir.path().join("a.tga");
        std::fs::write(&tga, b"x").unwrap();
        let mut config = ConvertConfig::new(&tga);
        assert!(config.validate().is_ok());

        config.output = Some(dir.path().join("b.tga"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnwritableContainer(_))
        ));
    }

    #[test]
    fn test_validate_allows_dds_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let dds = dir.path().join("a.dds");
        std::fs::write(&dds, b"x").unwrap();
        let config = ConvertConfig::new(&dds);
        assert_eq!(config.output_path(), dds);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_options() {
        let dir = tempfile::tempdir().unwrap();
        let tga = dir.path().join("a.tga");
        std::fs::write(&tga, b"x").unwrap();
        let mut config = ConvertConfig::new(&tga);
        config.options.reference_alpha = 2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOptions(TextureError::InvalidArgument(_)))
        ));
    }
}
