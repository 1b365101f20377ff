//! Texture file containers
//!
//! DDS is read and written, TGA is input only, KTX is output only.

mod dds;
mod ktx;
mod tga;

pub use ktx::KtxHeader;

use std::fmt;
use std::path::Path;

use crate::error::{Result, TextureError};
use crate::texture::Texture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Dds,
    Tga,
    Ktx,
}

impl ContainerKind {
    /// Infer the container from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "dds" => Some(ContainerKind::Dds),
            "tga" => Some(ContainerKind::Tga),
            "ktx" => Some(ContainerKind::Ktx),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ContainerKind::Dds => "dds",
            ContainerKind::Tga => "tga",
            ContainerKind::Ktx => "ktx",
        }
    }

    pub fn can_read(self) -> bool {
        matches!(self, ContainerKind::Dds | ContainerKind::Tga)
    }

    pub fn can_write(self) -> bool {
        matches!(self, ContainerKind::Dds | ContainerKind::Ktx)
    }

    /// Decode container bytes into a texture
    pub fn decode(self, bytes: &[u8]) -> Result<Texture> {
        match self {
            ContainerKind::Dds => dds::read(bytes),
            ContainerKind::Tga => tga::read(bytes),
            ContainerKind::Ktx => Err(TextureError::UnsupportedFormat(
                "KTX is an output-only container".to_string(),
            )),
        }
    }

    /// Encode a texture into container bytes
    pub fn encode(self, texture: &Texture) -> Result<Vec<u8>> {
        match self {
            ContainerKind::Dds => dds::write(texture),
            ContainerKind::Ktx => ktx::write(texture),
            ContainerKind::Tga => Err(TextureError::UnsupportedFormat(
                "TGA is an input-only container".to_string(),
            )),
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

fn kind_for(path: &Path) -> Result<ContainerKind> {
    ContainerKind::from_path(path).ok_or_else(|| {
        TextureError::UnsupportedFormat(format!("unknown container for {}", path.display()))
    })
}

/// Read a texture file, choosing the container from its extension
pub fn read_texture(path: &Path) -> Result<Texture> {
    let kind = kind_for(path)?;
    let bytes = std::fs::read(path)?;
    kind.decode(&bytes)
}

/// Write a texture file, choosing the container from its extension
pub fn write_texture(path: &Path, texture: &Texture) -> Result<()> {
    let kind = kind_for(path)?;
    let bytes = kind.encode(texture)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
