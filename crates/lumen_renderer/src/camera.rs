//! Camera for ray generation and radiance estimation.
//!
//! A `Camera` is built once from a `CameraConfig` and is immutable afterwards,
//! so a single instance can be shared by every render worker.

use lumen_core::CameraConfig;
use lumen_math::{Interval, Point3, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::material::Color;
use crate::sampling::{random_f64, random_in_unit_disk, sample_square};

/// Secondary rays start this far along the ray to skip self-intersection.
const SHADOW_ACNE_EPSILON: f64 = 0.001;

/// Camera state derived from a `CameraConfig`.
#[derive(Debug, Clone)]
pub struct Camera {
    image_width: u32,
    image_height: u32,
    samples_per_pixel: u32,
    max_depth: u32,
    background: Color,
    defocus_angle: f64,

    // Derived by initialize()
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f64,
}

impl Camera {
    /// Derive the camera basis, viewport and defocus disk from configuration.
    ///
    /// `config` should have passed `CameraConfig::validate`; a degenerate up
    /// vector would otherwise leave the basis as NaN.
    pub fn initialize(config: &CameraConfig) -> Self {
        let image_width = config.image_width.max(1);
        let image_height = config.image_height();
        let samples_per_pixel = config.samples_per_pixel.max(1);

        let center = config.lookfrom;

        // Viewport dimensions
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * config.focus_dist;
        let viewport_width = viewport_height * (image_width as f64 / image_height as f64);

        // Orthonormal camera basis
        let w = (config.lookfrom - config.lookat).normalize();
        let u = config.vup.cross(w).normalize();
        let v = w.cross(u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * u;
        let viewport_v = viewport_height * -v;

        let pixel_delta_u = viewport_u / image_width as f64;
        let pixel_delta_v = viewport_v / image_height as f64;

        let viewport_upper_left = center - config.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        let defocus_radius = config.focus_dist * (config.defocus_angle / 2.0).to_radians().tan();

        log::debug!(
            "Camera initialized: {}x{}, {} spp, max depth {}",
            image_width,
            image_height,
            samples_per_pixel,
            config.max_depth
        );

        Self {
            image_width,
            image_height,
            samples_per_pixel,
            max_depth: config.max_depth,
            background: config.background,
            defocus_angle: config.defocus_angle,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
            samples_scale: 1.0 / samples_per_pixel as f64,
        }
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Camera frame: `u` right, `v` up, `w` opposite the view direction.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The ray originates on the defocus disk (or at the camera center when
    /// defocus is disabled) and passes through a random point of the pixel
    /// square. Its time is uniform in [0, 1).
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + (i as f64 + offset.x) * self.pixel_delta_u
            + (j as f64 + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = random_f64(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Radiance arriving along `ray`, estimated with at most `depth` bounces.
    pub fn ray_color(&self, ray: &Ray, depth: u32, world: &dyn Hittable, rng: &mut dyn RngCore) -> Color {
        // Bounce budget exhausted: no more light is gathered.
        if depth == 0 {
            return Color::ZERO;
        }

        let mut rec = HitRecord::default();
        if !world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f64::INFINITY), &mut rec) {
            return self.background;
        }

        let color_from_emission = rec.material.emitted(rec.u, rec.v, rec.p);

        match rec.material.scatter(ray, &rec, rng) {
            Some(scatter) => {
                let color_from_scatter =
                    scatter.attenuation * self.ray_color(&scatter.scattered, depth - 1, world, rng);
                color_from_emission + color_from_scatter
            }
            None => color_from_emission,
        }
    }

    /// Mean of `samples_per_pixel` radiance estimates for pixel (i, j).
    ///
    /// The result is linear and not clamped.
    pub fn render_pixel(&self, i: u32, j: u32, world: &dyn Hittable, rng: &mut dyn RngCore) -> Color {
        let mut pixel_color = Color::ZERO;
        for _ in 0..self.samples_per_pixel {
            let ray = self.get_ray(i, j, rng);
            pixel_color += self.ray_color(&ray, self.max_depth, world, rng);
        }
        pixel_color * self.samples_scale
    }
}
