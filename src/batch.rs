//! Batch coordinator: runs one pipeline pass per image in a directory.
//!
//! For each eligible file the coordinator decodes the image, runs the
//! slicer and worker pool, reassembles the result and writes it as
//! `processed_<name>` into the destination directory. A file that fails
//! at any stage is logged and skipped; the batch always continues.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::codec::{Codec, ImageCodec};
use crate::config::PipelineConfig;
use crate::error::BatchError;
use crate::filters::Filter;
use crate::pipeline::run_pipeline;

/// File extensions picked up from the source directory (exact case).
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Prefix prepended to every output file name.
pub const OUTPUT_PREFIX: &str = "processed_";

/// Whether `path` carries one of [`SUPPORTED_EXTENSIONS`].
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// List the eligible image files directly inside `dir`, sorted by name.
///
/// Symlinks are followed. Entries that cannot be read are logged and
/// skipped.
///
/// # Errors
/// Only if `dir` is not a directory or cannot be opened.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::SourceNotDirectory(dir.to_path_buf()));
    }

    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Unreadable directory entry, skipping");
                continue;
            }
        };
        // Follows symlinks; a dangling link is not a file
        if !path.is_file() {
            debug!(path = %path.display(), "Skipping non-file entry");
            continue;
        }
        if is_supported(&path) {
            images.push(path);
        } else {
            debug!(path = %path.display(), "Skipping unsupported file");
        }
    }

    images.sort();
    Ok(images)
}

/// Output location for `source` inside `dest_dir`.
///
/// Returns `None` if `source` has no file name.
pub fn output_path(dest_dir: &Path, source: &Path) -> Option<PathBuf> {
    let name = source.file_name()?.to_string_lossy();
    Some(dest_dir.join(format!("{OUTPUT_PREFIX}{name}")))
}

/// What happened to one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Filtered image was written to this path
    Written(PathBuf),
    /// Pipeline produced no fragments; nothing written
    Empty,
    /// File could not be decoded; skipped
    DecodeFailed(String),
    /// Filtering, reassembly or writing failed; nothing written
    Failed(String),
}

/// Per-file entry of a [`BatchReport`].
#[derive(Debug, Clone)]
pub struct ImageReport {
    pub source: PathBuf,
    pub outcome: ImageOutcome,
    pub elapsed: Duration,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub images: Vec<ImageReport>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, ImageOutcome::Written(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ImageOutcome::DecodeFailed(_) | ImageOutcome::Empty))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ImageOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&ImageOutcome) -> bool) -> usize {
        self.images.iter().filter(|r| pred(&r.outcome)).count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} written, {} skipped, {} failed in {:.3} seconds",
            self.written(),
            self.skipped(),
            self.failed(),
            self.elapsed.as_secs_f64()
        )
    }
}

/// Runs a filter over every image in a directory.
///
/// The configuration and filter are fixed when the runner is built, so
/// every pass of the batch sees the same values.
pub struct BatchRunner<C = ImageCodec> {
    config: PipelineConfig,
    filter: Filter,
    codec: C,
}

impl BatchRunner<ImageCodec> {
    pub fn new(config: PipelineConfig, filter: Filter) -> Self {
        Self::with_codec(config, filter, ImageCodec)
    }
}

impl<C: Codec> BatchRunner<C> {
    pub fn with_codec(config: PipelineConfig, filter: Filter, codec: C) -> Self {
        Self {
            config,
            filter,
            codec,
        }
    }

    /// Process every eligible image in `source_dir` into `dest_dir`.
    ///
    /// # Errors
    /// Only if `source_dir` cannot be listed. Per-image failures are
    /// reported in the returned [`BatchReport`].
    pub fn run(&self, source_dir: &Path, dest_dir: &Path) -> Result<BatchReport, BatchError> {
        let started = Instant::now();
        let files = list_images(source_dir)?;
        info!(
            source = %source_dir.display(),
            images = files.len(),
            workers = self.config.workers(),
            slice_width = self.config.slice_width(),
            "Starting batch"
        );

        let mut report = BatchReport::default();
        for path in files {
            let image_started = Instant::now();
            let outcome = self.process_image(&path, dest_dir);
            report.images.push(ImageReport {
                source: path,
                outcome,
                elapsed: image_started.elapsed(),
            });
        }

        report.elapsed = started.elapsed();
        info!("All images processed: {report}");
        Ok(report)
    }

    /// One pass: decode, filter, reassemble, write.
    pub fn process_image(&self, path: &Path, dest_dir: &Path) -> ImageOutcome {
        let name = path.display();

        let image = match self.codec.decode(path) {
            Ok(image) => image,
            Err(e) => {
                warn!(file = %name, error = %e, "Failed to load image, skipping");
                return ImageOutcome::DecodeFailed(e.to_string());
            }
        };

        let output = match run_pipeline(image.view(), &self.filter, &self.config) {
            Ok(Some(output)) => output,
            Ok(None) => {
                debug!(file = %name, "No fragments produced, nothing written");
                return ImageOutcome::Empty;
            }
            Err(e) => {
                warn!(file = %name, error = %e, "Image not written");
                return ImageOutcome::Failed(e.to_string());
            }
        };

        let Some(target) = output_path(dest_dir, path) else {
            return ImageOutcome::Failed(format!("'{name}' has no file name"));
        };

        if let Err(e) = fs::create_dir_all(dest_dir) {
            warn!(dir = %dest_dir.display(), error = %e, "Failed to create output directory");
            return ImageOutcome::Failed(e.to_string());
        }

        match self.codec.encode(output.view(), &target) {
            Ok(()) => {
                info!(file = %target.display(), "Saved");
                ImageOutcome::Written(target)
            }
            Err(e) => {
                warn!(file = %target.display(), error = %e, "Failed to write image");
                ImageOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::filters::FilterKind;
    use ndarray::{Array3, ArrayView3};
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// In-memory codec keyed by file name.
    #[derive(Default)]
    struct MemoryCodec {
        inputs: HashMap<String, Array3<u8>>,
        written: Mutex<HashMap<PathBuf, Array3<u8>>>,
    }

    impl Codec for MemoryCodec {
        fn decode(&self, path: &Path) -> Result<Array3<u8>, CodecError> {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            self.inputs
                .get(&name)
                .cloned()
                .ok_or_else(|| CodecError::Buffer(format!("no such image {name}")))
        }

        fn encode(&self, image: ArrayView3<u8>, path: &Path) -> Result<(), CodecError> {
            self.written.lock().insert(path.to_path_buf(), image.to_owned());
            Ok(())
        }
    }

    #[test]
    fn test_is_supported_exact_case() {
        assert!(is_supported(Path::new("a.jpg")));
        assert!(is_supported(Path::new("a.jpeg")));
        assert!(is_supported(Path::new("dir/a.png")));
        assert!(is_supported(Path::new("a.bmp")));
        assert!(!is_supported(Path::new("a.PNG")));
        assert!(!is_supported(Path::new("a.gif")));
        assert!(!is_supported(Path::new("png")));
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("results"), Path::new("in/cat.png")),
            Some(PathBuf::from("results/processed_cat.png"))
        );
    }

    #[test]
    fn test_list_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.jpg", "notes.txt", "c.JPG", "d.bmp"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::symlink;
            symlink(dir.path().join("b.png"), dir.path().join("linked.png")).unwrap();
            symlink(dir.path().join("gone.png"), dir.path().join("dangling.png")).unwrap();
        }

        let names: Vec<_> = list_images(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        #[cfg(unix)]
        assert_eq!(names, vec!["a.jpg", "b.png", "d.bmp", "linked.png"]);
        #[cfg(not(unix))]
        assert_eq!(names, vec!["a.jpg", "b.png", "d.bmp"]);
    }

    #[test]
    fn test_list_images_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            list_images(&missing),
            Err(BatchError::SourceNotDirectory(_))
        ));
    }

    #[test]
    fn test_run_with_memory_codec() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        for name in ["one.png", "two.png", "broken.png"] {
            fs::write(src.path().join(name), b"").unwrap();
        }

        let mut codec = MemoryCodec::default();
        let one = Array3::from_shape_fn((3, 40, 3), |(y, x, c)| (y + x + c) as u8);
        let two = Array3::from_elem((2, 7, 3), 9u8);
        codec.inputs.insert("one.png".into(), one.clone());
        codec.inputs.insert("two.png".into(), two.clone());

        let config = PipelineConfig::new(3, 16, 5).unwrap();
        let runner = BatchRunner::with_codec(config, FilterKind::Invert.build(&config), codec);

        let report = runner.run(src.path(), dest.path()).unwrap();

        assert_eq!(report.images.len(), 3);
        assert_eq!(report.written(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 0);
        // sorted: broken, one, two
        assert!(matches!(report.images[0].outcome, ImageOutcome::DecodeFailed(_)));

        let written = runner.codec.written.lock();
        let out_one = &written[&dest.path().join("processed_one.png")];
        assert_eq!(out_one, &one.mapv(|v| 255 - v));
        let out_two = &written[&dest.path().join("processed_two.png")];
        assert_eq!(out_two, &two.mapv(|v| 255 - v));
    }

    #[test]
    fn test_failed_fragment_writes_nothing() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::write(src.path().join("img.png"), b"").unwrap();

        let mut codec = MemoryCodec::default();
        codec.inputs.insert("img.png".into(), Array3::zeros((2, 30, 3)));

        let config = PipelineConfig::new(2, 10, 5).unwrap();
        let filter = Filter::from_fn(|_| Err(crate::error::FilterError::Failed("nope".into())));
        let runner = BatchRunner::with_codec(config, filter, codec);

        let report = runner.run(src.path(), dest.path()).unwrap();

        assert_eq!(report.failed(), 1);
        assert!(runner.codec.written.lock().is_empty());
    }

    #[test]
    fn test_report_display() {
        let report = BatchReport {
            images: vec![ImageReport {
                source: PathBuf::from("a.png"),
                outcome: ImageOutcome::Written(PathBuf::from("out/processed_a.png")),
                elapsed: Duration::from_millis(5),
            }],
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(report.to_string(), "1 written, 0 skipped, 0 failed in 1.500 seconds");
    }
}
