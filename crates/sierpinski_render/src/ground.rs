//! Textured ground plane
//!
//! The ground is a flat grid of square tiles at y = 0, each tile mapping the
//! full texture once. The texture is decoded with the `image` crate; a
//! missing or unreadable file degrades to a plain white texture.

use std::path::Path;

use sierpinski_math::Vec3;

use crate::pipeline::Vertex3D;

/// Errors raised while loading the ground texture
#[derive(Debug)]
pub enum TextureError {
    /// The file could not be read
    Io(std::io::Error),
    /// The file was read but is not a decodable image
    Decode(String),
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureError::Io(e) => write!(f, "Failed to read texture: {}", e),
            TextureError::Decode(msg) => write!(f, "Failed to decode texture: {}", msg),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Io(e) => Some(e),
            TextureError::Decode(_) => None,
        }
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => TextureError::Io(io),
            other => TextureError::Decode(other.to_string()),
        }
    }
}

/// Decoded RGBA8 pixels ready for upload
#[derive(Clone, Debug, PartialEq)]
pub struct GroundTexture {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA rows, `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

impl GroundTexture {
    /// Decode an image file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let img = image::open(path.as_ref())?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }

    /// A single white texel
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }

    /// Decode an image file, falling back to [`GroundTexture::white`]
    ///
    /// The failure is logged and the scene keeps running untextured.
    pub fn load_or_fallback(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(texture) => {
                log::info!(
                    "Loaded ground texture {} ({}x{})",
                    path.display(),
                    texture.width,
                    texture.height
                );
                texture
            }
            Err(e) => {
                log::error!("Ground texture {}: {}; drawing untextured ground", path.display(), e);
                Self::white()
            }
        }
    }

    /// Shrink the texture so neither side exceeds `max_dimension`
    ///
    /// Aspect ratio is kept. GPUs reject textures above their 2D limit, so
    /// this runs before upload.
    pub fn fit_within(self, max_dimension: u32) -> Self {
        let (width, height) = (self.width, self.height);
        if width <= max_dimension && height <= max_dimension {
            return self;
        }
        if max_dimension == 0 {
            return Self::white();
        }

        let scale = max_dimension as f64 / width.max(height) as f64;
        let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_dimension);
        let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_dimension);

        let Some(img) = image::RgbaImage::from_raw(width, height, self.rgba) else {
            log::error!("Ground texture buffer does not match {}x{}; drawing untextured ground", width, height);
            return Self::white();
        };

        log::warn!(
            "Ground texture {}x{} exceeds the GPU limit of {}, resizing to {}x{}",
            width,
            height,
            max_dimension,
            new_width,
            new_height
        );
        let resized = image::imageops::resize(
            &img,
            new_width,
            new_height,
            image::imageops::FilterType::Triangle,
        );
        Self {
            width: new_width,
            height: new_height,
            rgba: resized.into_raw(),
        }
    }

    /// Bytes per row of pixels
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

/// Ground grid geometry
#[derive(Clone, Debug, PartialEq)]
pub struct GroundMesh {
    /// Triangle list, two triangles per tile
    pub vertices: Vec<Vertex3D>,
}

impl GroundMesh {
    /// Default half-width of the grid
    pub const EXTENT: f32 = 30.0;
    /// Default tile edge length
    pub const TILE: f32 = 10.0;
    /// Upper bound on tiles along each axis
    pub const MAX_TILES_PER_SIDE: u32 = 256;

    /// Grid covering `[-extent, extent]` on X and Z with square tiles
    ///
    /// When `tile` does not divide the span, the last row and column are
    /// partial tiles with proportionally cropped UVs. A non-positive tile size
    /// yields an empty mesh.
    pub fn new(extent: f32, tile: f32) -> Self {
        let mut vertices = Vec::new();
        if !(tile > 0.0 && extent > 0.0) {
            return Self { vertices };
        }

        let span = 2.0 * extent;
        let (tiles, tile) = match Self::tiles_per_side(span, tile) {
            Some(tiles) => (tiles, tile),
            None => {
                log::warn!(
                    "Ground tile size {} gives more than {} tiles per side, using {}",
                    tile,
                    Self::MAX_TILES_PER_SIDE,
                    span / Self::MAX_TILES_PER_SIDE as f32
                );
                (Self::MAX_TILES_PER_SIDE, span / Self::MAX_TILES_PER_SIDE as f32)
            }
        };

        let normal = Vec3::Y.to_array();
        let color = [1.0; 4];
        let edge = |i: u32| -> (f32, f32) {
            let start = -extent + i as f32 * tile;
            (start, (start + tile).min(extent))
        };

        for i in 0..tiles {
            let (x0, x1) = edge(i);
            let u1 = (x1 - x0) / tile;
            for j in 0..tiles {
                let (z0, z1) = edge(j);
                let v1 = (z1 - z0) / tile;

                let corner = |x: f32, z: f32, u: f32, v: f32| Vertex3D {
                    position: [x, 0.0, z],
                    normal,
                    color,
                    uv: [u, v],
                };

                let a = corner(x0, z0, 0.0, 0.0);
                let b = corner(x1, z0, u1, 0.0);
                let c = corner(x1, z1, u1, v1);
                let d = corner(x0, z1, 0.0, v1);
                vertices.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }

        Self { vertices }
    }

    /// Tiles needed along one side, or `None` above [`Self::MAX_TILES_PER_SIDE`]
    fn tiles_per_side(span: f32, tile: f32) -> Option<u32> {
        // slack keeps an exact fit from growing a sliver tile
        let tiles = (span / tile - 1e-4).ceil().max(1.0);
        if tiles > Self::MAX_TILES_PER_SIDE as f32 {
            None
        } else {
            Some(tiles as u32)
        }
    }

    /// Number of tiles in the grid
    pub fn tile_count(&self) -> usize {
        self.vertices.len() / 6
    }
}

impl Default for GroundMesh {
    fn default() -> Self {
        Self::new(Self::EXTENT, Self::TILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_is_six_by_six() {
        let mesh = GroundMesh::default();
        assert_eq!(mesh.tile_count(), 36);
        assert_eq!(mesh.vertices.len(), 216);
    }

    #[test]
    fn test_grid_lies_flat_and_faces_up() {
        let mesh = GroundMesh::default();
        for v in &mesh.vertices {
            assert_eq!(v.position[1], 0.0);
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
            assert!(v.position[0] >= -30.0 && v.position[0] <= 30.0);
            assert!(v.position[2] >= -30.0 && v.position[2] <= 30.0);
        }
    }

    #[test]
    fn test_each_tile_maps_full_texture() {
        let mesh = GroundMesh::new(5.0, 10.0);
        assert_eq!(mesh.tile_count(), 1);
        let uvs: Vec<[f32; 2]> = mesh.vertices.iter().map(|v| v.uv).collect();
        assert!(uvs.contains(&[0.0, 0.0]));
        assert!(uvs.contains(&[1.0, 1.0]));
    }

    #[test]
    fn test_uneven_tile_stays_inside_extent() {
        let mesh = GroundMesh::new(30.0, 25.0);
        assert_eq!(mesh.tile_count(), 9);
        for v in &mesh.vertices {
            assert!(v.position[0] >= -30.0 && v.position[0] <= 30.0, "{:?}", v.position);
            assert!(v.position[2] >= -30.0 && v.position[2] <= 30.0, "{:?}", v.position);
        }
        // last column covers 10 of 25 units
        let max_u = mesh.vertices.iter().map(|v| v.uv[0]).fold(0.0, f32::max);
        assert_eq!(max_u, 1.0);
        assert!(mesh.vertices.iter().any(|v| (v.uv[0] - 0.4).abs() < 1e-5));
    }

    #[test]
    fn test_tiny_tile_capped() {
        let mesh = GroundMesh::new(30.0, 1e-6);
        let side = GroundMesh::MAX_TILES_PER_SIDE as usize;
        assert_eq!(mesh.tile_count(), side * side);
        for v in &mesh.vertices {
            assert!(v.position[0] <= 30.0 + 1e-3);
        }
    }

    #[test]
    fn test_degenerate_tile_is_empty() {
        assert_eq!(GroundMesh::new(30.0, 0.0).tile_count(), 0);
    }

    #[test]
    fn test_white_texture() {
        let tex = GroundTexture::white();
        assert_eq!((tex.width, tex.height), (1, 1));
        assert_eq!(tex.rgba, vec![255, 255, 255, 255]);
        assert_eq!(tex.bytes_per_row(), 4);
    }

    fn solid(width: u32, height: u32) -> GroundTexture {
        GroundTexture {
            width,
            height,
            rgba: vec![200; (width * height * 4) as usize],
        }
    }

    #[test]
    fn test_fit_within_keeps_small_texture() {
        let tex = solid(16, 8);
        assert_eq!(tex.clone().fit_within(16), tex);
    }

    #[test]
    fn test_fit_within_shrinks_oversized_texture() {
        let tex = solid(100, 50).fit_within(20);
        assert_eq!((tex.width, tex.height), (20, 10));
        assert_eq!(tex.rgba.len(), 20 * 10 * 4);
        assert!(tex.rgba.iter().all(|&b| (199..=201).contains(&b)));
    }

    #[test]
    fn test_fit_within_tall_texture() {
        let tex = solid(3, 300).fit_within(100);
        assert_eq!((tex.width, tex.height), (1, 100));
    }

    #[test]
    fn test_fit_within_mismatched_buffer_falls_back() {
        let tex = GroundTexture {
            width: 64,
            height: 64,
            rgba: vec![0; 16],
        };
        assert_eq!(tex.fit_within(32), GroundTexture::white());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GroundTexture::load("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, TextureError::Io(_)), "got {:?}", err);
    }

    #[test]
    fn test_missing_file_falls_back_to_white() {
        let tex = GroundTexture::load_or_fallback("definitely/not/here.png");
        assert_eq!(tex, GroundTexture::white());
    }
}
