//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shared primitives. Every node caches the union of its
//! children's boxes and is skipped whole when the ray misses that box.

use std::cmp::Ordering;
use std::sync::Arc;

use lumen_math::{Aabb, Interval, Ray};

use crate::hittable::{HitRecord, Hittable, HittableList};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf {
        objects: Vec<Arc<dyn Hittable>>,
        bbox: Aabb,
    },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(objects)
    }

    pub fn from_list(list: HittableList) -> Self {
        Self::new(list.into_objects())
    }

    /// Recursive BVH construction.
    ///
    /// Median split: sort objects by centroid on the longest axis of the
    /// centroid bounds, split in half, recurse.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let n = objects.len();

        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects,
                bbox: bounds,
            };
        }

        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        objects.sort_unstable_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.partial_cmp(&b_val).unwrap_or(Ordering::Equal)
        });

        let right_objects = objects.split_off(n / 2);
        let left = Self::build(objects);
        let right = Self::build(right_objects);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }

    /// Number of levels in the tree; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of primitives stored in the leaves.
    pub fn primitive_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { objects, .. } => objects.len(),
            BvhNode::Branch { left, right, .. } => left.primitive_count() + right.primitive_count(),
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let mut hit_anything = false;
                let mut closest = ray_t.max;

                for obj in objects {
                    if obj.hit(ray, Interval::new(ray_t.min, closest), rec) {
                        hit_anything = true;
                        closest = rec.t;
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec);

                // Only check right up to closest hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Lambertian, Material};
    use crate::sphere::Sphere;
    use lumen_math::{Point3, Vec3};

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Vec3::splat(0.5)))
    }

    fn row_of_spheres(n: usize) -> Vec<Arc<dyn Hittable>> {
        let mat = gray();
        (0..n)
            .map(|i| Arc::new(Sphere::new(Point3::new(i as f64, 0.0, -5.0), 0.4, mat.clone())) as Arc<dyn Hittable>)
            .collect()
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));
        assert_eq!(bvh.depth(), 0);

        let ray = Ray::new_simple(Point3::ZERO, -Vec3::Z);
        assert!(!bvh.hit(&ray, Interval::UNIVERSE, &mut HitRecord::default()));
    }

    #[test]
    fn test_bvh_single_sphere() {
        let bvh = BvhNode::new(row_of_spheres(1));
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let bvh = BvhNode::new(row_of_spheres(10));
        assert!(matches!(bvh, BvhNode::Branch { .. }));
        assert_eq!(bvh.primitive_count(), 10);
        assert!(bvh.depth() > 1);

        // Ray that hits sphere at x=5
        let ray = Ray::new_simple(Point3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.p.z - (-4.6)).abs() < 1e-9);

        // Between two spheres
        let ray = Ray::new_simple(Point3::new(5.5, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!bvh.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut HitRecord::default()));
    }

    #[test]
    fn test_bvh_matches_flat_list() {
        let mut list = HittableList::new();
        let mat = gray();
        for i in 0..7 {
            for j in 0..7 {
                let center = Point3::new(i as f64 - 3.0, j as f64 - 3.0, -4.0 - (i + j) as f64 * 0.3);
                list.add(Arc::new(Sphere::new(center, 0.35, mat.clone())));
            }
        }
        let bvh = BvhNode::new(list.objects().to_vec());
        assert_eq!(bvh.bounding_box(), list.bounding_box());

        let ray_t = Interval::new(0.001, f64::INFINITY);
        for k in 0..40 {
            let x = -3.5 + k as f64 * 0.18;
            let ray = Ray::new_simple(Point3::new(0.0, 0.0, 2.0), Vec3::new(x, x * 0.5, -6.0) - Vec3::new(0.0, 0.0, 2.0));

            let mut flat = HitRecord::default();
            let mut tree = HitRecord::default();
            let hit_flat = list.hit(&ray, ray_t, &mut flat);
            let hit_tree = bvh.hit(&ray, ray_t, &mut tree);

            assert_eq!(hit_flat, hit_tree);
            if hit_flat {
                assert_eq!(flat.t, tree.t);
            }
        }
    }

    #[test]
    fn test_from_list() {
        let mut list = HittableList::new();
        for obj in row_of_spheres(3) {
            list.add(obj);
        }
        let bvh = BvhNode::from_list(list);
        assert_eq!(bvh.primitive_count(), 3);
        assert_eq!(bvh.depth(), 1);
    }
}
