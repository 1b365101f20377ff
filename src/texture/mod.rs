//! In-memory texture representation
//!
//! A [`Texture`] owns one [`Image`] per (face, mip level, depth slice),
//! stored face-major, then by mip level, then by slice. This is the same
//! order DDS files use, so containers can concatenate images directly.
//!
//! Every transform takes `&Texture` and returns a new `Texture`. The pixel
//! format only changes as a whole: a conversion produces a texture whose
//! images all carry the new format.

mod alpha;
mod format;
mod ops;
mod resample;

pub use alpha::AlphaInfo;
pub use format::PixelFormat;
pub use resample::{Filter, WrapMode};

use crate::error::{Result, TextureError};

/// Working texel: linear RGBA in 32-bit float
pub type Texel = [f32; 4];

/// Texture topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Texture2D,
    /// Six faces, each with its own mip chain
    Cube,
    /// 3D texture; depth halves with every mip level
    Volume,
}

impl TextureKind {
    pub fn faces(self) -> u32 {
        match self {
            TextureKind::Cube => 6,
            TextureKind::Texture2D | TextureKind::Volume => 1,
        }
    }
}

/// A single 2D slice of pixel data
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Image {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Build an `Rgba32Float` image from texels
    pub fn from_texels(width: u32, height: u32, texels: &[Texel]) -> Self {
        Self::new(width, height, bytemuck::cast_slice(texels).to_vec())
    }

    /// Read the image as float texels; the data must be `Rgba32Float`
    pub fn texels(&self) -> Vec<Texel> {
        bytemuck::pod_collect_to_vec(&self.data)
    }
}

/// Dimensions of mip level `mip`: each level halves, floor-rounded, minimum 1
pub fn mip_extent(size: u32, mip: u32) -> u32 {
    size.checked_shr(mip).unwrap_or(0).max(1)
}

/// Number of levels in a full mip chain down to 1×1×1
pub fn full_mip_count(width: u32, height: u32, depth: u32) -> u32 {
    32 - width.max(height).max(depth).max(1).leading_zeros()
}

/// A texture with all of its faces, mip levels and depth slices
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    format: PixelFormat,
    kind: TextureKind,
    width: u32,
    height: u32,
    depth: u32,
    mip_levels: u32,
    images: Vec<Image>,
}

impl Texture {
    /// Assemble a texture, checking the per-mip dimension and size invariants
    pub fn new(
        kind: TextureKind,
        format: PixelFormat,
        width: u32,
        height: u32,
        depth: u32,
        mip_levels: u32,
        images: Vec<Image>,
    ) -> Result<Self> {
        if width == 0 || height == 0 || depth == 0 || mip_levels == 0 {
            return Err(TextureError::InvalidArgument(format!(
                "invalid texture shape {width}x{height}x{depth} with {mip_levels} mips"
            )));
        }
        if kind != TextureKind::Volume && depth != 1 {
            return Err(TextureError::InvalidArgument(format!(
                "{kind:?} textures must have depth 1, got {depth}"
            )));
        }
        if mip_levels > full_mip_count(width, height, depth) {
            return Err(TextureError::InvalidArgument(format!(
                "{mip_levels} mips exceed the full chain for {width}x{height}x{depth}"
            )));
        }

        let texture = Self {
            format,
            kind,
            width,
            height,
            depth,
            mip_levels,
            images,
        };

        let expected = texture.image_count();
        if texture.images.len() != expected {
            return Err(TextureError::InvalidArgument(format!(
                "expected {expected} images, got {}",
                texture.images.len()
            )));
        }

        for (face, mip, slice) in texture.subresources() {
            let (w, h, _) = texture.mip_dimensions(mip);
            let image = &texture.images[texture.index(face, mip, slice)];
            if image.width != w || image.height != h {
                return Err(TextureError::InvalidArgument(format!(
                    "image (face {face}, mip {mip}, slice {slice}) is {}x{}, expected {w}x{h}",
                    image.width, image.height
                )));
            }
            if format.is_classified() && image.data.len() != format.image_size(w, h) {
                return Err(TextureError::InvalidArgument(format!(
                    "image (face {face}, mip {mip}, slice {slice}) holds {} bytes, {format} {w}x{h} needs {}",
                    image.data.len(),
                    format.image_size(w, h)
                )));
            }
        }

        Ok(texture)
    }

    /// Single-level 2D texture from tightly packed RGBA8 data
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(
            TextureKind::Texture2D,
            PixelFormat::Rgba8Unorm,
            width,
            height,
            1,
            1,
            vec![Image::new(width, height, data)],
        )
    }

    /// Single-level 2D texture from float texels
    pub fn from_texels(width: u32, height: u32, texels: &[Texel]) -> Result<Self> {
        Self::new(
            TextureKind::Texture2D,
            PixelFormat::Rgba32Float,
            width,
            height,
            1,
            1,
            vec![Image::from_texels(width, height, texels)],
        )
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn faces(&self) -> u32 {
        self.kind.faces()
    }

    pub fn mip_levels(&self) -> u32 {
        self.mip_levels
    }

    pub fn is_volume(&self) -> bool {
        self.kind == TextureKind::Volume
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// (width, height, depth) of the given mip level
    pub fn mip_dimensions(&self, mip: u32) -> (u32, u32, u32) {
        (
            mip_extent(self.width, mip),
            mip_extent(self.height, mip),
            self.slices_at(mip),
        )
    }

    /// Depth slices stored for a mip level
    pub fn slices_at(&self, mip: u32) -> u32 {
        match self.kind {
            TextureKind::Volume => mip_extent(self.depth, mip),
            _ => 1,
        }
    }

    pub fn image(&self, face: u32, mip: u32, slice: u32) -> Option<&Image> {
        if face >= self.faces() || mip >= self.mip_levels || slice >= self.slices_at(mip) {
            return None;
        }
        self.images.get(self.index(face, mip, slice))
    }

    /// Images of one face's mip level (one per depth slice)
    pub fn level(&self, face: u32, mip: u32) -> &[Image] {
        let start = self.index(face, mip, 0);
        &self.images[start..start + self.slices_at(mip) as usize]
    }

    /// Every (face, mip, slice) triple in storage order
    pub fn subresources(&self) -> Vec<(u32, u32, u32)> {
        let mut out = Vec::with_capacity(self.image_count());
        for face in 0..self.faces() {
            for mip in 0..self.mip_levels {
                for slice in 0..self.slices_at(mip) {
                    out.push((face, mip, slice));
                }
            }
        }
        out
    }

    fn images_per_face(&self) -> usize {
        (0..self.mip_levels)
            .map(|mip| self.slices_at(mip) as usize)
            .sum()
    }

    fn image_count(&self) -> usize {
        self.faces() as usize * self.images_per_face()
    }

    fn index(&self, face: u32, mip: u32, slice: u32) -> usize {
        let before_mip: usize = (0..mip).map(|m| self.slices_at(m) as usize).sum();
        face as usize * self.images_per_face() + before_mip + slice as usize
    }

    /// Replace every image, switching the whole texture to `format` at once
    pub fn map_images<F>(&self, format: PixelFormat, mut f: F) -> Result<Texture>
    where
        F: FnMut(&Image) -> Result<Image>,
    {
        let images = self.images.iter().map(&mut f).collect::<Result<Vec<_>>>()?;
        Texture::new(
            self.kind,
            format,
            self.width,
            self.height,
            self.depth,
            self.mip_levels,
            images,
        )
    }

    /// Apply `f` to every float texel; requires `Rgba32Float`
    pub fn map_texels<F>(&self, f: F) -> Result<Texture>
    where
        F: Fn(Texel) -> Texel,
    {
        self.require_float("texel transform")?;
        self.map_images(PixelFormat::Rgba32Float, |image| {
            let texels: Vec<Texel> = image.texels().into_iter().map(&f).collect();
            Ok(Image::from_texels(image.width, image.height, &texels))
        })
    }

    /// Rebuild this texture with a new shape from per-face mip chains
    ///
    /// `levels[face][mip]` holds the slices of that level.
    pub(crate) fn from_levels(
        kind: TextureKind,
        format: PixelFormat,
        (width, height, depth): (u32, u32, u32),
        levels: Vec<Vec<Vec<Image>>>,
    ) -> Result<Texture> {
        let mip_levels = levels.first().map(|l| l.len()).unwrap_or(0) as u32;
        let images = levels.into_iter().flatten().flatten().collect();
        Texture::new(kind, format, width, height, depth, mip_levels, images)
    }

    pub(crate) fn require_float(&self, what: &str) -> Result<()> {
        if self.format != PixelFormat::Rgba32Float {
            return Err(TextureError::UnsupportedFormat(format!(
                "{what} needs {}, texture is {}",
                PixelFormat::Rgba32Float,
                self.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texels(n: usize, value: Texel) -> Vec<Texel> {
        vec![value; n]
    }

    #[test]
    fn test_mip_extent() {
        assert_eq!(mip_extent(8, 0), 8);
        assert_eq!(mip_extent(8, 3), 1);
        assert_eq!(mip_extent(5, 1), 2);
        assert_eq!(mip_extent(5, 10), 1);
        assert_eq!(mip_extent(5, 40), 1);
    }

    #[test]
    fn test_full_mip_count() {
        assert_eq!(full_mip_count(8, 8, 1), 4);
        assert_eq!(full_mip_count(1, 1, 1), 1);
        assert_eq!(full_mip_count(5, 3, 1), 3);
        assert_eq!(full_mip_count(4, 4, 16), 5);
    }

    #[test]
    fn test_from_rgba8_validates_size() {
        assert!(Texture::from_rgba8(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            Texture::from_rgba8(2, 2, vec![0; 15]),
            Err(TextureError::InvalidArgument(_))
        ));
        assert!(Texture::from_rgba8(0, 2, vec![]).is_err());
    }

    #[test]
    fn test_texel_round_trip_through_bytes() {
        let data = vec![[0.25, 0.5, 0.75, 1.0], [1.0, 0.0, -1.0, 0.5]];
        let image = Image::from_texels(2, 1, &data);
        assert_eq!(image.data.len(), 32);
        assert_eq!(image.texels(), data);
    }

    #[test]
    fn test_cube_indexing() {
        let mut images = Vec::new();
        for face in 0..6u8 {
            images.push(Image::new(2, 2, vec![face; 16]));
            images.push(Image::new(1, 1, vec![face + 10; 4]));
        }
        let tex = Texture::new(
            TextureKind::Cube,
            PixelFormat::Rgba8Unorm,
            2,
            2,
            1,
            2,
            images,
        )
        .unwrap();

        assert_eq!(tex.faces(), 6);
        assert_eq!(tex.image(3, 0, 0).unwrap().data[0], 3);
        assert_eq!(tex.image(3, 1, 0).unwrap().data[0], 13);
        assert!(tex.image(6, 0, 0).is_none());
        assert_eq!(tex.subresources().len(), 12);
    }

    #[test]
    fn test_volume_slices_halve_per_mip() {
        let images = vec![
            Image::new(4, 4, vec![0; 64]),
            Image::new(4, 4, vec![0; 64]),
            Image::new(2, 2, vec![0; 16]),
        ];
        let tex = Texture::new(
            TextureKind::Volume,
            PixelFormat::Rgba8Unorm,
            4,
            4,
            2,
            2,
            images,
        )
        .unwrap();
        assert_eq!(tex.mip_dimensions(0), (4, 4, 2));
        assert_eq!(tex.mip_dimensions(1), (2, 2, 1));
        assert_eq!(tex.level(0, 0).len(), 2);
        assert_eq!(tex.level(0, 1).len(), 1);
    }

    #[test]
    fn test_new_rejects_wrong_mip_dimensions() {
        let images = vec![Image::new(4, 4, vec![0; 64]), Image::new(1, 1, vec![0; 4])];
        let result = Texture::new(
            TextureKind::Texture2D,
            PixelFormat::Rgba8Unorm,
            4,
            4,
            1,
            2,
            images,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_map_texels_requires_float() {
        let tex = Texture::from_rgba8(1, 1, vec![1, 2, 3, 4]).unwrap();
        assert!(matches!(
            tex.map_texels(|t| t),
            Err(TextureError::UnsupportedFormat(_))
        ));

        let tex = Texture::from_texels(2, 1, &texels(2, [0.5; 4])).unwrap();
        let doubled = tex.map_texels(|t| t.map(|c| c * 2.0)).unwrap();
        assert_eq!(doubled.images()[0].texels(), texels(2, [1.0; 4]));
    }
}
