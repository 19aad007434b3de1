//! Render drivers.
//!
//! Both drivers split the frame into buckets and give each bucket its own
//! random stream derived from the base seed and the bucket position, so a
//! serial and a parallel render of the same scene are pixel-identical.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::output::{ImageBuffer, PixelSink};

/// Errors raised by the render drivers.
///
/// Intersection and shading never fail; only the worker pool can.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// How a render is scheduled.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Worker threads; 0 lets rayon decide
    pub threads: usize,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Base seed for every bucket's random stream
    pub seed: u64,
    /// Checked before each bucket starts
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            threads: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            seed: 0,
            cancel: None,
        }
    }
}

impl RenderSettings {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = bucket_size;
        self
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// How a render ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Completed,
    /// Stopped early; buckets that never started are black.
    Cancelled { buckets_done: usize, buckets_total: usize },
}

/// Render on the calling thread, bucket by bucket.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    settings: &RenderSettings,
    sink: &mut dyn PixelSink,
) -> RenderOutcome {
    let start = Instant::now();
    let buckets = generate_buckets(camera.image_width(), camera.image_height(), settings.bucket_size);
    log::info!(
        "Rendering {}x{} ({} buckets) on 1 thread",
        camera.image_width(),
        camera.image_height(),
        buckets.len()
    );

    let mut results = Vec::with_capacity(buckets.len());
    for bucket in &buckets {
        if settings.is_cancelled() {
            break;
        }
        results.push(render_bucket(bucket, camera, world, settings.seed));
        log::debug!("Bucket {}/{} done", bucket.index + 1, buckets.len());
    }

    finish(camera, &buckets, results, sink, start)
}

/// Render buckets on a rayon pool with `settings.threads` workers.
pub fn render_parallel(
    camera: &Camera,
    world: &dyn Hittable,
    settings: &RenderSettings,
    sink: &mut dyn PixelSink,
) -> Result<RenderOutcome, RenderError> {
    let start = Instant::now();
    let buckets = generate_buckets(camera.image_width(), camera.image_height(), settings.bucket_size);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.threads)
        .build()?;
    log::info!(
        "Rendering {}x{} ({} buckets) on {} threads",
        camera.image_width(),
        camera.image_height(),
        buckets.len(),
        pool.current_num_threads()
    );

    let completed = AtomicUsize::new(0);
    let results: Vec<BucketResult> = pool.install(|| {
        buckets
            .par_iter()
            .filter_map(|bucket| {
                if settings.is_cancelled() {
                    return None;
                }
                let result = render_bucket(bucket, camera, world, settings.seed);
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                log::debug!("Bucket {}/{} done", done, buckets.len());
                Some(result)
            })
            .collect()
    });

    Ok(finish(camera, &buckets, results, sink, start))
}

/// Assemble finished buckets into a frame and stream it to the sink.
fn finish(
    camera: &Camera,
    buckets: &[Bucket],
    results: Vec<BucketResult>,
    sink: &mut dyn PixelSink,
    start: Instant,
) -> RenderOutcome {
    let mut frame = ImageBuffer::new(camera.image_width(), camera.image_height());
    for result in &results {
        for (x, y, color) in result.iter_pixels() {
            frame.set(x, y, color);
        }
    }

    for y in 0..frame.height {
        for x in 0..frame.width {
            sink.put(x, y, frame.get(x, y));
        }
    }

    let elapsed = start.elapsed();
    if results.len() == buckets.len() {
        log::info!("Render completed in {:.2?}", elapsed);
        RenderOutcome::Completed
    } else {
        log::info!(
            "Render cancelled after {:.2?} ({}/{} buckets)",
            elapsed,
            results.len(),
            buckets.len()
        );
        RenderOutcome::Cancelled {
            buckets_done: results.len(),
            buckets_total: buckets.len(),
        }
    }
}
