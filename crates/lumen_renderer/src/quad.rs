//! Planar primitives: parallelograms, triangles and disks.
//!
//! All three share the plane math. A shape is anchored at `q` and spanned by
//! edge vectors `u` and `v`; a hit point is decomposed into planar
//! coordinates (alpha, beta) with `P = q + alpha * u + beta * v`, and only the
//! interior test differs between shapes.

use std::sync::Arc;

use lumen_math::{Aabb, Interval, Point3, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::material::Material;

/// Rays whose direction is this close to parallel with the plane are ignored.
const PARALLEL_EPSILON: f64 = 1e-8;

/// Which region of the plane, in (alpha, beta) coordinates, is solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanarShape {
    /// `[0, 1] x [0, 1]`, inclusive
    #[default]
    Parallelogram,
    /// alpha > 0, beta > 0, alpha + beta < 1
    Triangle,
    /// Ellipse centred on `q` with semi-axes `u` and `v`
    Disk,
}

impl PlanarShape {
    /// Returns the surface (u, v) coordinates if (alpha, beta) is inside.
    pub fn is_interior(&self, alpha: f64, beta: f64) -> Option<(f64, f64)> {
        match self {
            PlanarShape::Parallelogram => {
                let unit = Interval::new(0.0, 1.0);
                if !unit.contains(alpha) || !unit.contains(beta) {
                    return None;
                }
                Some((alpha, beta))
            }
            PlanarShape::Triangle => {
                if alpha <= 0.0 || beta <= 0.0 || alpha + beta >= 1.0 {
                    return None;
                }
                Some((alpha, beta))
            }
            PlanarShape::Disk => {
                if (alpha * alpha + beta * beta).sqrt() >= 1.0 {
                    return None;
                }
                Some((alpha / 2.0 + 0.5, beta / 2.0 + 0.5))
            }
        }
    }

    fn bounding_box(&self, q: Point3, u: Vec3, v: Vec3) -> Aabb {
        match self {
            PlanarShape::Parallelogram => {
                let diagonal1 = Aabb::from_points(q, q + u + v);
                let diagonal2 = Aabb::from_points(q + u, q + v);
                Aabb::surrounding(&diagonal1, &diagonal2)
            }
            PlanarShape::Triangle => {
                let edge1 = Aabb::from_points(q, q + u);
                let edge2 = Aabb::from_points(q, q + v);
                Aabb::surrounding(&edge1, &edge2)
            }
            PlanarShape::Disk => {
                let diagonal1 = Aabb::from_points(q - u - v, q + u + v);
                let diagonal2 = Aabb::from_points(q - u + v, q + u - v);
                Aabb::surrounding(&diagonal1, &diagonal2)
            }
        }
    }
}

/// A planar primitive. Named after its default shape, the parallelogram.
pub struct Quad {
    q: Point3,
    u: Vec3,
    v: Vec3,
    /// `n / dot(n, n)`, used to recover planar coordinates
    w: Vec3,
    /// Unit plane normal
    normal: Vec3,
    /// Plane offset: `dot(normal, P) = d` for every P on the plane
    d: f64,
    shape: PlanarShape,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    /// Parallelogram with corner `q` and edges `u`, `v`.
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::with_shape(q, u, v, PlanarShape::Parallelogram, material)
    }

    /// Triangle with vertices `q`, `q + u` and `q + v`.
    pub fn triangle(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::with_shape(q, u, v, PlanarShape::Triangle, material)
    }

    /// Ellipse centred at `q` with semi-axes `u` and `v`.
    pub fn disk(center: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::with_shape(center, u, v, PlanarShape::Disk, material)
    }

    pub fn with_shape(q: Point3, u: Vec3, v: Vec3, shape: PlanarShape, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            shape,
            material,
            bbox: shape.bounding_box(q, u, v),
        }
    }

    pub fn shape(&self) -> PlanarShape {
        self.shape
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let denom = self.normal.dot(ray.direction());

        // Parallel to the plane
        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        // Also false for NaN, which is what a zero-area shape produces.
        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        let intersection = ray.at(t);
        let planar_hitpt_vector = intersection - self.q;
        let alpha = self.w.dot(planar_hitpt_vector.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hitpt_vector));

        let Some((u, v)) = self.shape.is_interior(alpha, beta) else {
            return false;
        };

        rec.t = t;
        rec.p = intersection;
        rec.u = u;
        rec.v = v;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The six axis-aligned quads of a closed box spanning opposite corners `a` and `b`.
pub fn box_prism(a: Point3, b: Point3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Point3::new(min.x, min.y, max.z), dx, dy),  // front
        (Point3::new(max.x, min.y, max.z), -dz, dy), // right
        (Point3::new(max.x, min.y, min.z), -dx, dy), // back
        (Point3::new(min.x, min.y, min.z), dz, dy),  // left
        (Point3::new(min.x, max.y, max.z), dx, -dz), // top
        (Point3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];

    for (q, u, v) in faces {
        sides.add(Arc::new(Quad::new(q, u, v, material.clone())));
    }

    sides
}
