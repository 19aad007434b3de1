//! Lumen Renderer - CPU path tracing.
//!
//! A Monte Carlo path tracer: the camera shoots jittered primary rays, the
//! scene answers nearest-hit queries through the `Hittable` contract, and
//! materials decide whether a path scatters, emits, or is absorbed.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod material;
mod output;
mod quad;
mod renderer;
mod sampling;
mod scene_builder;
mod sphere;
mod texture;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterRecord,
};
pub use output::{
    color_to_rgb, linear_to_gamma, save_image, write_ppm, ImageBuffer, OutputError, OutputResult,
    PixelSink,
};
pub use quad::{box_prism, PlanarShape, Quad};
pub use renderer::{render, render_parallel, RenderError, RenderOutcome, RenderSettings};
pub use scene_builder::build_world;
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, SolidColor, Texture};

/// Re-export the math types the public API is written in.
pub use lumen_math::{Aabb, Interval, Point3, Ray, Vec3};
