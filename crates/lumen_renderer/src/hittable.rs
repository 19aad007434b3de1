//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use lumen_math::{Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;

use crate::material::{Material, ScatterRecord};

/// Material used by `HitRecord::default()`.
/// Always absorbs light (returns None from scatter).
struct Absorber;

impl Material for Absorber {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        None
    }
}

static ABSORBER: Absorber = Absorber;

/// Record of a ray-object intersection.
///
/// Created empty by the caller, filled in only when a hit is reported, and
/// never kept past the bounce that produced it.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point3,
    /// Surface normal, unit length, always pointing against the incoming ray
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Surface coordinates
    pub u: f64,
    pub v: f64,
    /// Ray parameter of the intersection
    pub t: f64,
    /// Whether the ray hit the outside of the surface
    pub front_face: bool,
}

impl Default for HitRecord<'_> {
    fn default() -> Self {
        Self {
            p: Point3::ZERO,
            normal: Vec3::ZERO,
            material: &ABSORBER,
            u: 0.0,
            v: 0.0,
            t: 0.0,
            front_face: false,
        }
    }
}

impl HitRecord<'_> {
    /// Orient the stored normal against the ray.
    ///
    /// `outward_normal` must be unit length.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can be tested against.
///
/// `hit` reports whether an intersection exists with `t` inside `ray_t` and
/// fills `rec` with the closest one. Aggregates shrink `ray_t.max` to the
/// best `t` found so far, which gives nearest-hit semantics for free.
pub trait Hittable: Send + Sync {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;

    /// Bounding box, computed once at construction.
    fn bounding_box(&self) -> Aabb;
}

/// A flat list of hittable objects.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Move every object of `other` into this list.
    pub fn extend(&mut self, other: HittableList) {
        for object in other.objects {
            self.add(object);
        }
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<Arc<dyn Hittable>> {
        self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if object.hit(ray, Interval::new(ray_t.min, closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};

    fn sphere_at(z: f64) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(
            Point3::new(0.0, 0.0, z),
            0.5,
            Arc::new(Lambertian::new(Vec3::splat(0.5))),
        ))
    }

    #[test]
    fn test_default_record_absorbs() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let rec = HitRecord::default();
        let ray = Ray::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(rec.material.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(rec.material.emitted(0.0, 0.0, Point3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_set_face_normal() {
        let mut rec = HitRecord::default();
        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        rec.set_face_normal(&ray, Vec3::Z);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);

        rec.set_face_normal(&ray, -Vec3::Z);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_list_returns_closest_hit() {
        let mut list = HittableList::new();
        // Farther sphere added first so the list has to narrow the interval.
        list.add(sphere_at(-5.0));
        list.add(sphere_at(-2.0));
        list.add(sphere_at(-9.0));

        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(list.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_list_bbox_is_union() {
        let mut list = HittableList::new();
        assert!(list.is_empty());
        list.add(sphere_at(-5.0));
        list.add(sphere_at(-2.0));

        let bbox = list.bounding_box();
        assert_eq!(bbox.z, Interval::new(-5.5, -1.5));
        assert_eq!(list.len(), 2);

        list.clear();
        assert_eq!(list.bounding_box(), Aabb::EMPTY);
    }

    #[test]
    fn test_empty_list_never_hits() {
        let list = HittableList::new();
        let ray = Ray::new_simple(Point3::ZERO, Vec3::X);
        let mut rec = HitRecord::default();
        assert!(!list.hit(&ray, Interval::UNIVERSE, &mut rec));
    }
}
