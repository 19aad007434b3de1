//! Lumen Core - renderer-agnostic scene description and asset loading.
//!
//! This crate provides:
//!
//! - **Scene description types**: `SceneDescription`, `CameraConfig`,
//!   `MaterialDesc`, `TextureDesc`, `ObjectDesc`, deserialized from JSON
//! - **Image loading**: `ImageData`, decoded with the `image` crate and found
//!   through a small search path
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::SceneDescription;
//!
//! let scene = SceneDescription::load("cornell.json")?;
//! println!("{} objects, {} materials",
//!     scene.objects.len(),
//!     scene.materials.len());
//! ```

pub mod scene;
pub mod texture;

pub use scene::{
    CameraConfig, MaterialDesc, ObjectDesc, SceneDescription, SceneError, SceneResult, TextureDesc,
    TextureRef, MAX_IMAGE_PIXELS,
};
pub use texture::{ImageData, ImageError, ImageResult};
