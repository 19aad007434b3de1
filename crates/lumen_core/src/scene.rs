//! Scene description types.
//!
//! A scene file is plain JSON: a camera block, named textures, named
//! materials and a list of objects that refer to materials by name. These
//! types carry no rendering behaviour; the renderer turns them into
//! hittables and materials.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lumen_math::{Point3, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or validating a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("object {index} refers to unknown material '{name}'")]
    UnknownMaterial { index: usize, name: String },

    #[error("material '{material}' refers to unknown texture '{name}'")]
    UnknownTexture { material: String, name: String },

    #[error("invalid scene: {0}")]
    Invalid(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Largest frame `validate` accepts (8192 x 8192).
pub const MAX_IMAGE_PIXELS: u64 = 1 << 26;

/// User-facing camera and sampling configuration.
///
/// Everything the camera derives its per-render state from. Fields omitted
/// from a scene file keep the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Ratio of image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixels
    pub image_width: u32,
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,
    /// Radiance returned by rays that escape the scene
    pub background: Vec3,

    /// Vertical field of view in degrees
    pub vfov: f64,
    pub lookfrom: Point3,
    pub lookat: Point3,
    /// Camera-relative "up" direction
    pub vup: Vec3,

    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f64,
    /// Distance from `lookfrom` to the plane of perfect focus
    pub focus_dist: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            background: Vec3::ZERO,
            vfov: 90.0,
            lookfrom: Point3::ZERO,
            lookat: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
        }
    }
}

impl CameraConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set image width and aspect ratio.
    pub fn with_resolution(mut self, image_width: u32, aspect_ratio: f64) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, lookfrom: Point3, lookat: Point3, vup: Vec3) -> Self {
        self.lookfrom = lookfrom;
        self.lookat = lookat;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    pub fn with_background(mut self, background: Vec3) -> Self {
        self.background = background;
        self
    }

    /// Total pixel count of the output frame.
    pub fn pixel_count(&self) -> u64 {
        self.image_width as u64 * self.image_height() as u64
    }

    /// Image height derived from width and aspect ratio, never below 1.
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f64 / self.aspect_ratio) as u32).max(1)
    }

    /// Reject configurations the camera cannot derive a viewport from.
    pub fn validate(&self) -> SceneResult<()> {
        if self.image_width == 0 {
            return Err(SceneError::Invalid("image_width must be at least 1".into()));
        }
        if self.samples_per_pixel == 0 {
            return Err(SceneError::Invalid("samples_per_pixel must be at least 1".into()));
        }
        if !(self.aspect_ratio > 0.0) || !self.aspect_ratio.is_finite() {
            return Err(SceneError::Invalid(format!(
                "aspect_ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(SceneError::Invalid(format!(
                "vfov must be in (0, 180) degrees, got {}",
                self.vfov
            )));
        }
        if self.pixel_count() > MAX_IMAGE_PIXELS {
            return Err(SceneError::Invalid(format!(
                "{}x{} image exceeds the {} pixel limit",
                self.image_width,
                self.image_height(),
                MAX_IMAGE_PIXELS
            )));
        }
        let view = self.lookfrom - self.lookat;
        if view.length_squared() == 0.0 {
            return Err(SceneError::Invalid("lookfrom and lookat coincide".into()));
        }
        if self.vup.cross(view).length_squared() == 0.0 {
            return Err(SceneError::Invalid(format!(
                "vup {} is zero or parallel to the view direction",
                self.vup
            )));
        }
        Ok(())
    }
}

/// A texture definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextureDesc {
    Solid { color: Vec3 },
    /// 3-D checker pattern with cells of size `scale`
    Checker { scale: f64, even: TextureRef, odd: TextureRef },
    /// Image file located through the image search path
    Image { file: String },
}

/// Either an inline colour or the name of a texture in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextureRef {
    Color(Vec3),
    Named(String),
}

/// A material definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Lambertian { albedo: TextureRef },
    Metal { albedo: Vec3, fuzz: f64 },
    Dielectric { refraction_index: f64 },
    DiffuseLight { emit: TextureRef },
    Isotropic { albedo: TextureRef },
}

impl MaterialDesc {
    fn texture_refs(&self) -> Vec<&TextureRef> {
        match self {
            MaterialDesc::Lambertian { albedo } | MaterialDesc::Isotropic { albedo } => vec![albedo],
            MaterialDesc::DiffuseLight { emit } => vec![emit],
            MaterialDesc::Metal { .. } | MaterialDesc::Dielectric { .. } => Vec::new(),
        }
    }
}

/// A geometric object definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDesc {
    /// Static sphere, or a moving one when `center_end` is set
    Sphere {
        center: Point3,
        #[serde(default)]
        center_end: Option<Point3>,
        radius: f64,
        material: String,
    },
    Quad { q: Point3, u: Vec3, v: Vec3, material: String },
    Triangle { q: Point3, u: Vec3, v: Vec3, material: String },
    Disk { q: Point3, u: Vec3, v: Vec3, material: String },
    /// Closed box spanning two opposite corners
    Box { a: Point3, b: Point3, material: String },
}

impl ObjectDesc {
    pub fn material(&self) -> &str {
        match self {
            ObjectDesc::Sphere { material, .. }
            | ObjectDesc::Quad { material, .. }
            | ObjectDesc::Triangle { material, .. }
            | ObjectDesc::Disk { material, .. }
            | ObjectDesc::Box { material, .. } => material,
        }
    }
}

/// A complete scene: camera, textures, materials and objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub camera: CameraConfig,
    pub textures: BTreeMap<String, TextureDesc>,
    pub materials: BTreeMap<String, MaterialDesc>,
    pub objects: Vec<ObjectDesc>,
}

impl SceneDescription {
    /// Parse and validate a scene from a JSON string.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let scene: SceneDescription = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Load and validate a scene from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let scene = Self::from_json_str(&json)?;

        log::info!(
            "Loaded scene {}: {} objects, {} materials, {} textures",
            path.display(),
            scene.objects.len(),
            scene.materials.len(),
            scene.textures.len()
        );

        Ok(scene)
    }

    /// Check the camera and that every name reference resolves.
    pub fn validate(&self) -> SceneResult<()> {
        self.camera.validate()?;

        for (material, desc) in &self.materials {
            for tex in desc.texture_refs() {
                if let TextureRef::Named(name) = tex {
                    if !self.textures.contains_key(name) {
                        return Err(SceneError::UnknownTexture {
                            material: material.clone(),
                            name: name.clone(),
                        });
                    }
                }
            }
        }

        for (name, desc) in &self.textures {
            if let TextureDesc::Checker { even, odd, .. } = desc {
                for tex in [even, odd] {
                    if let TextureRef::Named(inner) = tex {
                        if inner == name || !self.textures.contains_key(inner) {
                            return Err(SceneError::Invalid(format!(
                                "checker texture '{}' refers to unusable texture '{}'",
                                name, inner
                            )));
                        }
                    }
                }
            }
        }

        for (index, object) in self.objects.iter().enumerate() {
            if !self.materials.contains_key(object.material()) {
                return Err(SceneError::UnknownMaterial {
                    index,
                    name: object.material().to_string(),
                });
            }
        }

        Ok(())
    }
}
