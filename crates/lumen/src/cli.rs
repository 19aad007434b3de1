use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneChoice {
    /// Ground plane, three material spheres and a moving sphere
    Spheres,
    /// Five coloured quads
    Quads,
    /// Cornell box with an area light and two boxes
    Cornell,
    /// Two checkered spheres
    Checker,
    /// Image-textured globe
    Earth,
}

#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "Offline CPU path tracer")]
pub struct Args {
    /// Built-in scene to render
    #[arg(long, value_enum, default_value = "cornell")]
    pub scene: SceneChoice,

    /// JSON scene file; takes precedence over --scene
    #[arg(long)]
    pub scene_file: Option<PathBuf>,

    /// Output image (.ppm is written as text, .png/.jpg through the image encoder)
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Override the image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Override the samples per pixel
    #[arg(long, short = 's')]
    pub spp: Option<u32>,

    /// Override the maximum bounce depth
    #[arg(long)]
    pub depth: Option<u32>,

    /// Worker threads (0 = one per core)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Bucket edge length in pixels
    #[arg(long, default_value_t = lumen_renderer::DEFAULT_BUCKET_SIZE)]
    pub bucket_size: u32,

    /// Base random seed; equal seeds give identical images
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Write the selected scene as JSON to this path and exit
    #[arg(long)]
    pub dump_scene: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["lumen"]);
        assert_eq!(args.scene, SceneChoice::Cornell);
        assert_eq!(args.output, PathBuf::from("output.png"));
        assert_eq!(args.threads, 0);
        assert!(args.width.is_none());
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Info);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "lumen",
            "--scene",
            "quads",
            "--width",
            "320",
            "-s",
            "16",
            "--depth",
            "8",
            "--seed",
            "42",
            "--log-level",
            "debug",
            "-o",
            "out.ppm",
        ]);
        assert_eq!(args.scene, SceneChoice::Quads);
        assert_eq!(args.width, Some(320));
        assert_eq!(args.spp, Some(16));
        assert_eq!(args.depth, Some(8));
        assert_eq!(args.seed, 42);
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
        assert_eq!(args.output, PathBuf::from("out.ppm"));
    }
}
