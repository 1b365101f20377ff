//! texpipe - texture processing pipeline
//!
//! Converts decoded DDS/TGA textures into GPU-ready assets: color keying,
//! gamma handling, power-of-two and block alignment resizes, mip chain
//! generation, alpha coverage scaling, premultiplication and a per-platform
//! choice of the final (block-compressed) pixel format.

pub mod codec;
pub mod config;
pub mod container;
pub mod convert;
pub mod error;
pub mod math;
pub mod options;
pub mod pipeline;
pub mod platform;
pub mod texture;

pub use config::{ConfigError, ConvertConfig};
pub use convert::{convert_batch, convert_file, ConvertOutcome};
pub use error::{Result, TextureError};
pub use options::{Options, TargetFormat};
pub use pipeline::{Pipeline, ProcessReport, ProcessedTexture, Step};
pub use platform::{CompressionSelector, FormatDecision, Platform};
pub use texture::{PixelFormat, Texture, TextureKind};
