//! Pixel sinks and image encoding.
//!
//! The render drivers hand out averaged linear colours; everything that turns
//! them into bytes (gamma, clamping, quantisation, file formats) lives here.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lumen_math::Interval;
use thiserror::Error;

use crate::material::Color;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Buffer holds {actual} pixels, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Receives one linear colour per pixel, in raster order.
pub trait PixelSink {
    fn put(&mut self, x: u32, y: u32, color: Color);
}

/// An in-memory linear RGB frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Gamma-encoded 8-bit RGB, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgb(*c)).collect()
    }

    /// Write the frame as plain-text PPM (P3).
    pub fn write_ppm<W: Write>(&self, out: W) -> OutputResult<()> {
        write_ppm(out, self.width, self.height, &self.pixels)
    }
}

impl PixelSink for ImageBuffer {
    fn put(&mut self, x: u32, y: u32, color: Color) {
        self.set(x, y, color);
    }
}

/// Gamma 2 transfer curve. Non-positive input maps to 0.
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Gamma-encode, clamp to [0, 0.999] and quantise a linear colour.
///
/// NaN channels (a degenerate sample) come out as 0.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.0, 0.999);
    let quantise = |c: f64| {
        let c = if c.is_nan() { 0.0 } else { c };
        (256.0 * intensity.clamp(linear_to_gamma(c))) as u8
    };
    [quantise(color.x), quantise(color.y), quantise(color.z)]
}

/// Write linear pixels as a P3 PPM stream.
pub fn write_ppm<W: Write>(out: W, width: u32, height: u32, pixels: &[Color]) -> OutputResult<()> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(OutputError::SizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let mut out = BufWriter::new(out);
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", width, height)?;
    writeln!(out, "255")?;
    for color in pixels {
        let [r, g, b] = color_to_rgb(*color);
        writeln!(out, "{} {} {}", r, g, b)?;
    }
    out.flush()?;
    Ok(())
}

/// Save a frame to disk. `.ppm` is written as P3 text; any other extension is
/// encoded by the `image` crate (PNG, JPEG, ...).
pub fn save_image(buffer: &ImageBuffer, path: impl AsRef<Path>) -> OutputResult<()> {
    let path = path.as_ref();
    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        buffer.write_ppm(File::create(path)?)?;
    } else {
        image::save_buffer(
            path,
            &buffer.to_rgb8(),
            buffer.width,
            buffer.height,
            image::ColorType::Rgb8,
        )?;
    }

    log::info!("Wrote {}x{} image to {}", buffer.width, buffer.height, path.display());
    Ok(())
}
