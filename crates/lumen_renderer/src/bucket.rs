//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::material::Color;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's private random stream.
    ///
    /// Depends only on the base seed and the bucket's position, never on the
    /// order in which buckets are scheduled. `StdRng::seed_from_u64` spreads
    /// the bits, so a plain combination is enough here.
    pub fn seed(&self, base_seed: u64) -> u64 {
        base_seed ^ (((self.y as u64) << 32) | self.x as u64)
    }

    /// Squared distance from this bucket's centre to the frame centre, in
    /// half-pixel units so it stays exact.
    fn center_distance(&self, width: u32, height: u32) -> i128 {
        let dx = 2 * self.x as i128 + self.width as i128 - width as i128;
        let dy = 2 * self.y as i128 + self.height as i128 - height as i128;
        dx * dx + dy * dy
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Split a `width` x `height` frame into tiles of at most `bucket_size`.
///
/// Tiles nearest the middle of the frame come first; ties keep raster order.
/// `index` is the position in the returned order.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);

    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(size as usize)
        .flat_map(move |y| {
            (0..width)
                .step_by(size as usize)
                .map(move |x| Bucket::new(x, y, size.min(width - x), size.min(height - y), 0))
        })
        .collect();

    // Stable, so equidistant tiles stay in raster order.
    buckets.sort_by_cached_key(|b| b.center_distance(width, height));

    for (index, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = index;
    }
    buckets
}

/// Render a single bucket with a random stream derived from `base_seed`.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(bucket: &Bucket, camera: &Camera, world: &dyn Hittable, base_seed: u64) -> BucketResult {
    let mut rng = StdRng::seed_from_u64(bucket.seed(base_seed));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = camera.render_pixel(bucket.x + local_x, bucket.y + local_y, world, &mut rng);
            pixels.push(color);
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    /// Iterate `(x, y, color)` in image coordinates.
    pub fn iter_pixels(&self) -> impl Iterator<Item = (u32, u32, Color)> + '_ {
        let width = self.bucket.width.max(1);
        self.pixels.iter().enumerate().map(move |(i, color)| {
            let local_x = i as u32 % width;
            let local_y = i as u32 / width;
            (self.bucket.x + local_x, self.bucket.y + local_y, *color)
        })
    }
}
