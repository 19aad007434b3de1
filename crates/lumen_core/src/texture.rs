//! Image loading for textures.
//!
//! Images are located through a short search path so scenes can name a file
//! without caring where the binary was launched from, decoded with the
//! `image` crate into linear RGB and stored as quantised bytes.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable naming a directory that is searched first.
pub const IMAGE_DIR_ENV: &str = "LUMEN_IMAGES";

/// How many parent directories are searched for an `images/` folder.
const MAX_PARENT_LEVELS: usize = 6;

/// Returned for lookups into an image that failed to load.
pub const MISSING_PIXEL: [u8; 3] = [255, 0, 255];

/// Errors that can occur while loading an image.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("could not find image '{name}' (searched {} locations)", searched.len())]
    NotFound { name: String, searched: Vec<PathBuf> },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{width}x{height} image needs {} pixels, got {pixels}", *width as u64 * *height as u64)]
    Dimensions { width: u32, height: u32, pixels: usize },
}

pub type ImageResult<T> = Result<T, ImageError>;

/// Decoded RGB image data.
///
/// An empty image (width 0) is a valid value: it is what a failed load
/// degrades to, and every pixel lookup then returns `MISSING_PIXEL`.
#[derive(Clone, Debug, Default)]
pub struct ImageData {
    width: u32,
    height: u32,
    /// Row-major RGB bytes, 3 per pixel
    bytes: Vec<u8>,
}

impl ImageData {
    /// Build an image from linear float RGB pixels (row-major).
    ///
    /// `pixels` must hold exactly `width * height` entries and neither
    /// dimension may be zero.
    pub fn from_linear(width: u32, height: u32, pixels: &[[f32; 3]]) -> ImageResult<Self> {
        if width == 0 || height == 0 || pixels.len() as u64 != width as u64 * height as u64 {
            return Err(ImageError::Dimensions {
                width,
                height,
                pixels: pixels.len(),
            });
        }

        let bytes = pixels
            .iter()
            .flat_map(|p| p.iter().map(|&c| float_to_byte(c)))
            .collect();
        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    /// An image with no pixel data.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Find and decode `name` using the search path.
    pub fn load(name: &str) -> ImageResult<Self> {
        let searched = candidate_paths(name);

        match searched.iter().find(|p| p.is_file()) {
            Some(path) => decode_file(path),
            None => Err(ImageError::NotFound {
                name: name.to_string(),
                searched,
            }),
        }
    }

    /// Like `load`, but a failure is reported and replaced by an empty image.
    pub fn load_or_fallback(name: &str) -> Self {
        match Self::load(name) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("{}; using placeholder colour", e);
                Self::empty()
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// RGB bytes of pixel (x, y); coordinates are clamped to the image.
    pub fn pixel(&self, x: i64, y: i64) -> [u8; 3] {
        if self.width == 0 || self.height == 0 {
            return MISSING_PIXEL;
        }

        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let idx = (y * self.width as usize + x) * 3;

        match self.bytes.get(idx..idx + 3) {
            Some(rgb) => [rgb[0], rgb[1], rgb[2]],
            None => MISSING_PIXEL,
        }
    }
}

/// Search order: `$LUMEN_IMAGES/name`, `name`, then `images/name` in the
/// current directory and each parent up to `MAX_PARENT_LEVELS` levels.
fn candidate_paths(name: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(dir) = env::var_os(IMAGE_DIR_ENV) {
        paths.push(Path::new(&dir).join(name));
    }
    paths.push(PathBuf::from(name));

    let mut prefix = PathBuf::new();
    for _ in 0..=MAX_PARENT_LEVELS {
        paths.push(prefix.join("images").join(name));
        prefix.push("..");
    }

    paths
}

fn decode_file(path: &Path) -> ImageResult<ImageData> {
    let img = image::open(path).map_err(|source| ImageError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let pixels: Vec<[f32; 3]> = rgb
        .pixels()
        .map(|p| [srgb_to_linear(p[0]), srgb_to_linear(p[1]), srgb_to_linear(p[2])])
        .collect();

    log::debug!("Loaded image: {} ({}x{})", path.display(), width, height);

    ImageData::from_linear(width, height, &pixels)
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

fn float_to_byte(value: f32) -> u8 {
    if value <= 0.0 {
        0
    } else if value >= 1.0 {
        255
    } else {
        (256.0 * value) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_image_returns_sentinel() {
        let img = ImageData::empty();
        assert!(img.is_empty());
        assert_eq!(img.pixel(0, 0), MISSING_PIXEL);
        assert_eq!(img.pixel(-4, 100), MISSING_PIXEL);
    }

    #[test]
    fn test_pixel_lookup_clamps() {
        let img = ImageData::from_linear(
            2,
            1,
            &[[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
        )
        .unwrap();
        assert_eq!(img.pixel(0, 0), [255, 0, 0]);
        assert_eq!(img.pixel(1, 0), [0, 0, 255]);
        assert_eq!(img.pixel(-1, 0), [255, 0, 0]);
        assert_eq!(img.pixel(7, 3), [0, 0, 255]);
    }

    #[test]
    fn test_mismatched_dimensions_rejected() {
        // Too few pixels for the stated size
        let err = ImageData::from_linear(2, 2, &[[0.5; 3]; 3]).unwrap_err();
        assert!(matches!(
            err,
            ImageError::Dimensions {
                width: 2,
                height: 2,
                pixels: 3
            }
        ));

        assert!(ImageData::from_linear(0, 1, &[[0.5; 3]]).is_err());
        assert!(ImageData::from_linear(1, 0, &[]).is_err());
        assert!(ImageData::from_linear(1, 1, &[[0.5; 3]; 2]).is_err());
    }

    #[test]
    fn test_pixel_lookup_never_reads_past_data() {
        let short = ImageData {
            width: 2,
            height: 2,
            bytes: vec![10, 20, 30],
        };
        assert_eq!(short.pixel(0, 0), [10, 20, 30]);
        assert_eq!(short.pixel(1, 1), MISSING_PIXEL);

        let zero_width = ImageData {
            width: 0,
            height: 1,
            bytes: vec![1, 2, 3],
        };
        assert_eq!(zero_width.pixel(0, 0), MISSING_PIXEL);
        assert_eq!(zero_width.pixel(5, -5), MISSING_PIXEL);
    }

    #[test]
    fn test_float_to_byte() {
        assert_eq!(float_to_byte(-1.0), 0);
        assert_eq!(float_to_byte(0.5), 128);
        assert_eq!(float_to_byte(0.999), 255);
        assert_eq!(float_to_byte(3.0), 255);
    }

    #[test]
    fn test_srgb_to_linear() {
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }

    #[test]
    fn test_search_path_walks_parents() {
        let paths = candidate_paths("earth.jpg");
        assert!(paths.contains(&PathBuf::from("earth.jpg")));
        assert!(paths.contains(&PathBuf::from("images/earth.jpg")));
        assert!(paths.contains(&Path::new("..").join("images").join("earth.jpg")));
        assert_eq!(
            paths.last(),
            Some(&Path::new("../../../../../..").join("images").join("earth.jpg"))
        );
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = ImageData::load("definitely-not-a-real-image-7f3a.png").unwrap_err();
        assert!(matches!(err, ImageError::NotFound { .. }));

        let img = ImageData::load_or_fallback("definitely-not-a-real-image-7f3a.png");
        assert!(img.is_empty());
    }
}
