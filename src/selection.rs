use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::batch::{BatchJob, DedupMode};
use crate::watermark::Placement;

/// Extensions accepted from pickers and dropped files
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// The running list of images the user has picked, in the order they were added
#[derive(Debug, Clone, Default)]
pub struct Selection {
    paths: Vec<PathBuf>,
    recursive: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descend into sub-folders when a directory is added
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Add files and folders; returns how many image paths were added.
    ///
    /// Files with unsupported extensions are skipped. Folders contribute the
    /// images inside them, sorted by file name.
    pub fn add_paths<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let before = self.paths.len();
        for path in paths {
            let path = path.as_ref();
            if path.is_dir() {
                self.add_directory(path);
            } else if is_supported_image(path) {
                self.paths.push(path.to_path_buf());
            } else {
                debug!("Skipping unsupported file {:?}", path);
            }
        }
        self.paths.len() - before
    }

    fn add_directory(&mut self, dir: &Path) {
        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name();

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() && is_supported_image(entry.path()) => {
                    self.paths.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => warn!("Failed to read entry under {:?}: {}", dir, e),
            }
        }
    }

    /// Number of distinct images, as shown in the "N images ready" status
    pub fn ready_count(&self) -> usize {
        self.paths.iter().collect::<HashSet<_>>().len()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn status_line(&self) -> String {
        match self.ready_count() {
            0 => "No images selected".to_string(),
            1 => "1 image ready".to_string(),
            n => format!("{} images ready", n),
        }
    }

    pub fn to_job(&self, output_dir: PathBuf, placement: Placement, dedup: DedupMode) -> BatchJob {
        BatchJob::new(self.paths.iter().cloned(), output_dir, placement, dedup)
    }
}
