//! Sphere primitive for ray tracing.

use std::f64::consts::PI;
use std::sync::Arc;

use lumen_math::{Aabb, Interval, Point3, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;

/// A sphere, either static or moving linearly over the shutter interval.
pub struct Sphere {
    /// Center as a function of time: `center.at(t)` for t in [0, 1)
    center: Ray,
    radius: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a stationary sphere. Negative radii are clamped to zero.
    pub fn new(center: Point3, radius: f64, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center: Ray::new_simple(center, Vec3::ZERO),
            radius,
            material,
            bbox,
        }
    }

    /// Create a sphere that moves from `center1` at time 0 to `center2` at time 1.
    pub fn moving(center1: Point3, center2: Point3, radius: f64, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let center = Ray::new_simple(center1, center2 - center1);

        let rvec = Vec3::splat(radius);
        let box1 = Aabb::from_points(center.at(0.0) - rvec, center.at(0.0) + rvec);
        let box2 = Aabb::from_points(center.at(1.0) - rvec, center.at(1.0) + rvec);

        Self {
            center,
            radius,
            material,
            bbox: Aabb::surrounding(&box1, &box2),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Center of the sphere at the given time.
    pub fn center_at(&self, time: f64) -> Point3 {
        self.center.at(time)
    }

    /// UV coordinates of a point on the unit sphere centered at the origin.
    ///
    /// u: angle around the Y axis from X = -1, v: angle from Y = -1 to Y = +1,
    /// both mapped to [0, 1].
    fn sphere_uv(p: Point3) -> (f64, f64) {
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let current_center = self.center.at(ray.time());
        let oc = current_center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - current_center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::sphere_uv(outward_normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Vec3::splat(0.5)))
    }

    fn forward() -> Interval {
        Interval::new(0.001, f64::INFINITY)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, forward(), &mut rec));
        assert!((rec.t - 0.5).abs() < 1e-12);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 1.0, 0.0));

        let mut rec = HitRecord::default();
        assert!(!sphere.hit(&ray, forward(), &mut rec));
    }

    #[test]
    fn test_hit_from_center_reproduces_surface_point() {
        let center = Point3::new(1.0, -2.0, 3.0);
        let radius = 2.5;
        let sphere = Sphere::new(center, radius, gray());

        let dirs = [
            Vec3::new(1.0, 2.0, -0.5).normalize(),
            Vec3::new(-0.3, 0.1, 0.9).normalize(),
            Vec3::Y,
        ];

        for dir in dirs {
            let surface = center + radius * dir;
            let ray = Ray::new_simple(center, surface - center);

            let mut rec = HitRecord::default();
            assert!(sphere.hit(&ray, forward(), &mut rec));
            assert!((rec.t - 1.0).abs() < 1e-12);
            assert!((rec.p - surface).length() < 1e-9);
            assert!((rec.normal.length() - 1.0).abs() < 1e-12);

            // From inside, the oriented normal faces back toward the center.
            assert!(!rec.front_face);
            assert!(rec.normal.dot(rec.p - center) < 0.0);
        }
    }

    #[test]
    fn test_hit_from_outside_has_outward_normal() {
        let center = Point3::new(0.0, 0.0, -4.0);
        let sphere = Sphere::new(center, 1.0, gray());

        let surface = center + Vec3::new(0.6, 0.8, 0.0);
        let origin = surface + 5.0 * Vec3::new(0.6, 0.8, 0.0);
        let ray = Ray::new_simple(origin, surface - origin);

        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, forward(), &mut rec));
        assert!((rec.p - surface).length() < 1e-9);
        assert!(rec.front_face);
        assert!(rec.normal.dot(rec.p - center) > 0.0);
        assert!((rec.normal.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_root_outside_interval_falls_back_to_far_root() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        // Near root t=0.5 excluded, far root t=1.5 accepted.
        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::new(0.6, 10.0), &mut rec));
        assert!((rec.t - 1.5).abs() < 1e-12);

        // Both roots excluded.
        assert!(!sphere.hit(&ray, Interval::new(0.001, 0.4), &mut HitRecord::default()));
        // Interval bounds are exclusive.
        assert!(!sphere.hit(&ray, Interval::new(0.5, 1.5), &mut HitRecord::default()));
    }

    #[test]
    fn test_sphere_uv() {
        let (u, v) = Sphere::sphere_uv(Point3::new(1.0, 0.0, 0.0));
        assert!((u - 0.5).abs() < 1e-12);
        assert!((v - 0.5).abs() < 1e-12);

        let (_, v) = Sphere::sphere_uv(Point3::new(0.0, 1.0, 0.0));
        assert!((v - 1.0).abs() < 1e-12);

        let (_, v) = Sphere::sphere_uv(Point3::new(0.0, -1.0, 0.0));
        assert!(v.abs() < 1e-12);

        let (u, _) = Sphere::sphere_uv(Point3::new(0.0, 0.0, 1.0));
        assert!((u - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_negative_radius_clamped() {
        let sphere = Sphere::new(Point3::ZERO, -3.0, gray());
        assert_eq!(sphere.radius(), 0.0);
    }

    #[test]
    fn test_moving_sphere() {
        let sphere = Sphere::moving(Point3::new(0.0, 0.0, -2.0), Point3::new(2.0, 0.0, -2.0), 0.5, gray());

        let bbox = sphere.bounding_box();
        assert_eq!(bbox.x, Interval::new(-0.5, 2.5));
        assert_eq!(sphere.center_at(0.5), Point3::new(1.0, 0.0, -2.0));

        // Aimed at x=2: misses at t=0, hits at t=1.
        let early = Ray::new(Point3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let late = Ray::new(Point3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.999);
        assert!(!sphere.hit(&early, forward(), &mut HitRecord::default()));
        assert!(sphere.hit(&late, forward(), &mut HitRecord::default()));
    }
}
