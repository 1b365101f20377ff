//! DDS read/write through image_dds' ddsfile re-export

use std::io::Cursor;

use image_dds::ddsfile::{
    AlphaMode, Caps2, D3D10ResourceDimension, Dds, MiscFlag, NewDxgiParams,
};
use tracing::debug;

use crate::error::{Result, TextureError};
use crate::texture::{mip_extent, Image, PixelFormat, Texture, TextureKind};

fn detect_format(dds: &Dds) -> PixelFormat {
    if let Ok(format) = image_dds::dds_image_format(dds) {
        let format = PixelFormat::from_image_format(format);
        if format.is_classified() {
            return format;
        }
    }
    dds.header10
        .as_ref()
        .map(|h| PixelFormat::from_dxgi(h.dxgi_format))
        .unwrap_or(PixelFormat::Unknown)
}

fn detect_kind(dds: &Dds) -> TextureKind {
    let header10 = dds.header10.as_ref();
    let cube = dds.header.caps2.contains(Caps2::CUBEMAP)
        || header10.is_some_and(|h| h.misc_flag.contains(MiscFlag::TEXTURECUBE));
    let volume = dds.header.caps2.contains(Caps2::VOLUME)
        || header10.is_some_and(|h| h.resource_dimension == D3D10ResourceDimension::Texture3D);

    if cube {
        TextureKind::Cube
    } else if volume {
        TextureKind::Volume
    } else {
        TextureKind::Texture2D
    }
}

/// Parse a DDS file into a texture, keeping its stored pixel format
pub fn read(bytes: &[u8]) -> Result<Texture> {
    let dds = Dds::read(Cursor::new(bytes))
        .map_err(|e| TextureError::Decode(format!("failed to parse DDS: {e}")))?;

    let format = detect_format(&dds);
    if !format.is_classified() {
        return Err(TextureError::UnsupportedFormat(format!(
            "DDS pixel format of {}x{} image is not recognized",
            dds.header.width, dds.header.height
        )));
    }

    let kind = detect_kind(&dds);
    let width = dds.header.width;
    let height = dds.header.height;
    let depth = match kind {
        TextureKind::Volume => dds.header.depth.unwrap_or(1).max(1),
        _ => 1,
    };
    let mip_levels = dds.header.mip_map_count.unwrap_or(1).max(1);
    debug!(
        "DDS {:?} {}x{}x{} {} with {} mips",
        kind, width, height, depth, format, mip_levels
    );

    let mut images = Vec::new();
    let mut offset = 0usize;
    for _face in 0..kind.faces() {
        for mip in 0..mip_levels {
            let w = mip_extent(width, mip);
            let h = mip_extent(height, mip);
            let slices = match kind {
                TextureKind::Volume => mip_extent(depth, mip),
                _ => 1,
            };
            let size = format.image_size(w, h);
            for _ in 0..slices {
                let data = dds.data.get(offset..offset + size).ok_or_else(|| {
                    TextureError::Decode(format!(
                        "DDS data ends at {} bytes, mip {mip} needs {}",
                        dds.data.len(),
                        offset + size
                    ))
                })?;
                images.push(Image::new(w, h, data.to_vec()));
                offset += size;
            }
        }
    }

    Texture::new(kind, format, width, height, depth, mip_levels, images)
}

/// Serialize a texture as a DX10 DDS file
pub fn write(texture: &Texture) -> Result<Vec<u8>> {
    let format = texture.format();
    let dxgi = format.to_dxgi().ok_or_else(|| {
        TextureError::UnsupportedFormat(format!("{format} cannot be stored in DDS"))
    })?;

    let params = NewDxgiParams {
        width: texture.width(),
        height: texture.height(),
        depth: texture.is_volume().then_some(texture.depth()),
        format: dxgi,
        mipmap_levels: Some(texture.mip_levels()),
        array_layers: None,
        caps2: None,
        is_cubemap: texture.kind() == TextureKind::Cube,
        resource_dimension: if texture.is_volume() {
            D3D10ResourceDimension::Texture3D
        } else {
            D3D10ResourceDimension::Texture2D
        },
        alpha_mode: AlphaMode::Straight,
    };

    let mut dds = Dds::new_dxgi(params)
        .map_err(|e| TextureError::Encode(format!("failed to create DDS header: {e}")))?;

    let total_size: usize = texture.images().iter().map(|i| i.data.len()).sum();
    let mut combined = Vec::with_capacity(total_size);
    for image in texture.images() {
        combined.extend_from_slice(&image.data);
    }
    dds.data = combined;

    let mut output = Vec::new();
    dds.write(&mut output)
        .map_err(|e| TextureError::Encode(format!("failed to write DDS: {e}")))?;
    Ok(output)
}
