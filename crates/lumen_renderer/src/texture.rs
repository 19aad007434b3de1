//! Textures: colour as a function of surface coordinates and position.

use std::sync::Arc;

use lumen_core::ImageData;
use lumen_math::{Interval, Point3};

use crate::material::Color;

pub trait Texture: Send + Sync {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color;
}

#[derive(Debug, Clone)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.albedo
    }
}

/// Solid 3-D checker pattern alternating between two textures.
#[derive(Clone)]
pub struct CheckerTexture {
    inv_scale: f64,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f64, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f64, even: Color, odd: Color) -> Self {
        Self::new(scale, Arc::new(SolidColor::new(even)), Arc::new(SolidColor::new(odd)))
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let parity = (cell.x as i64 + cell.y as i64 + cell.z as i64).rem_euclid(2);

        if parity == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Texture backed by an image, addressed by (u, v).
#[derive(Debug, Clone)]
pub struct ImageTexture {
    image: ImageData,
}

impl ImageTexture {
    pub fn new(image: ImageData) -> Self {
        Self { image }
    }

    /// Load through the image search path; a missing file degrades to the
    /// debug colour instead of failing.
    pub fn load(name: &str) -> Self {
        Self::new(ImageData::load_or_fallback(name))
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Point3) -> Color {
        // No texture data: solid cyan as a debugging aid.
        if self.image.width() == 0 || self.image.height() == 0 {
            return Color::new(0.0, 1.0, 1.0);
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        // Image rows run top to bottom
        let v = 1.0 - unit.clamp(v);

        let i = (u * self.image.width() as f64) as i64;
        let j = (v * self.image.height() as f64) as i64;
        let pixel = self.image.pixel(i, j);

        Color::new(
            pixel[0] as f64 / 255.0,
            pixel[1] as f64 / 255.0,
            pixel[2] as f64 / 255.0,
        )
    }
}
