//! Material trait for surface scattering.
//!
//! The integrator only ever asks a material two things: what it emits at a
//! surface point, and whether (and how) an incoming ray scatters.

use std::sync::Arc;

use lumen_math::{Point3, Ray, Vec3};
use rand::RngCore;

use crate::hittable::HitRecord;
use crate::sampling::{random_f64, random_unit_vector};
use crate::texture::{SolidColor, Texture};

/// Linear RGB radiance or reflectance.
pub type Color = Vec3;

/// Result of a successful scatter.
#[derive(Debug, Clone, Copy)]
pub struct ScatterRecord {
    /// Per-channel throughput applied to the scattered path
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray, or return None if it is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord>;

    /// Light emitted at the given surface coordinates and point.
    fn emitted(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    tex: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(albedo)))
    }

    pub fn from_texture(tex: Arc<dyn Texture>) -> Self {
        Self { tex }
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterRecord {
            attenuation: self.tex.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// `fuzz` is clamped to [0, 1]: 0 is a perfect mirror.
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction(), rec.normal).normalize();
        let scattered_dir = reflected + self.fuzz * random_unit_vector(rng);

        // Fuzz can push the ray below the surface; those are absorbed.
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterRecord {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Refractive index in vacuum or air, or the ratio of the material's
    /// index over the index of the enclosing medium
    refraction_index: f64,
}

impl Dielectric {
    pub fn new(refraction_index: f64) -> Self {
        Self { refraction_index }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, refraction_index: f64) -> f64 {
        let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let ri = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = ri * sin_theta > 1.0;
        let direction = if cannot_refract || Self::reflectance(cos_theta, ri) > random_f64(rng) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, ri)
        };

        Some(ScatterRecord {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Diffuse light emitter. Never scatters.
#[derive(Clone)]
pub struct DiffuseLight {
    tex: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Color) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(emit)))
    }

    pub fn from_texture(tex: Arc<dyn Texture>) -> Self {
        Self { tex }
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        None
    }

    fn emitted(&self, u: f64, v: f64, p: Point3) -> Color {
        self.tex.value(u, v, p)
    }
}

/// Scatters uniformly in every direction, regardless of the normal.
#[derive(Clone)]
pub struct Isotropic {
    tex: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(albedo)))
    }

    pub fn from_texture(tex: Arc<dyn Texture>) -> Self {
        Self { tex }
    }
}

impl Material for Isotropic {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        Some(ScatterRecord {
            attenuation: self.tex.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_unit_vector(rng), ray_in.time()),
        })
    }
}

// =============================================================================
// Helper functions
// =============================================================================

#[inline]
fn near_zero(v: Vec3) -> bool {
    const S: f64 = 1e-8;
    v.x.abs() < S && v.y.abs() < S && v.z.abs() < S
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record_facing_up(material: &dyn Material) -> HitRecord<'_> {
        HitRecord {
            p: Point3::ZERO,
            normal: Vec3::Y,
            material,
            u: 0.25,
            v: 0.75,
            t: 1.0,
            front_face: true,
        }
    }

    #[test]
    fn test_lambertian_scatters_into_hemisphere() {
        let mat = Lambertian::new(Color::new(0.8, 0.3, 0.1));
        let rec = record_facing_up(&mat);
        let ray_in = Ray::new(Point3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.4);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let s = mat.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert_eq!(s.attenuation, Color::new(0.8, 0.3, 0.1));
            assert!(s.scattered.direction().dot(rec.normal) >= 0.0);
            assert_eq!(s.scattered.time(), 0.4);
            assert_eq!(s.scattered.origin(), rec.p);
        }
    }

    #[test]
    fn test_perfect_mirror() {
        let mat = Metal::new(Color::ONE, 0.0);
        let rec = record_facing_up(&mat);
        let ray_in = Ray::new_simple(Point3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(7);

        let s = mat.scatter(&ray_in, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((s.scattered.direction() - expected).length() < 1e-12);
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz, 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz, 0.0);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mat = Dielectric::new(1.5);
        let mut rec = record_facing_up(&mat);
        rec.front_face = false;

        // Grazing ray from inside the glass must reflect.
        let ray_in = Ray::new_simple(Point3::ZERO, Vec3::new(1.0, -0.1, 0.0));
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..50 {
            let s = mat.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert_eq!(s.attenuation, Color::ONE);
            assert!(s.scattered.direction().y > 0.0);
        }
    }

    #[test]
    fn test_diffuse_light_emits_without_scattering() {
        let mat = DiffuseLight::new(Color::new(4.0, 4.0, 4.0));
        let rec = record_facing_up(&mat);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(mat.scatter(&Ray::default(), &rec, &mut rng).is_none());
        assert_eq!(mat.emitted(0.0, 0.0, Point3::ZERO), Color::splat(4.0));
    }

    #[test]
    fn test_non_emitters_are_black() {
        assert_eq!(Lambertian::new(Color::ONE).emitted(0.5, 0.5, Point3::ONE), Color::ZERO);
        assert_eq!(Dielectric::new(1.5).emitted(0.5, 0.5, Point3::ONE), Color::ZERO);
    }

    #[test]
    fn test_isotropic_scatters_unit_directions() {
        let mat = Isotropic::new(Color::splat(0.5));
        let rec = record_facing_up(&mat);
        let mut rng = StdRng::seed_from_u64(11);

        let s = mat.scatter(&Ray::default(), &rec, &mut rng).unwrap();
        assert!((s.scattered.direction().length() - 1.0).abs() < 1e-9);
        assert_eq!(s.attenuation, Color::splat(0.5));
    }
}
