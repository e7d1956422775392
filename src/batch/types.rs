use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::watermark::{ItemError, Placement, formats::jpeg};

/// How duplicate input paths are recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DedupMode {
    /// Raw path identity
    #[default]
    Exact,
    /// Resolved absolute paths; falls back to the raw path when resolution fails
    Canonical,
}

/// What the batch does after an item fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failure and report it
    #[default]
    FailFast,
    /// Record the failure and move on to the next item
    Continue,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Appended to the file stem of every output file
    pub suffix: String,
    pub jpeg_quality: u8,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            suffix: "_wm".to_string(),
            jpeg_quality: jpeg::DEFAULT_QUALITY,
        }
    }
}

impl OutputSettings {
    /// `{stem}{suffix}.{ext}` inside `output_dir`, keeping the original extension
    pub fn output_path_for(&self, input: &Path, output_dir: &Path) -> Result<PathBuf, ItemError> {
        let stem = input
            .file_stem()
            .filter(|stem| !stem.is_empty())
            .ok_or(ItemError::InvalidFileName)?;

        let mut name = stem.to_os_string();
        name.push(&self.suffix);
        if let Some(ext) = input.extension() {
            name.push(".");
            name.push(ext);
        }

        Ok(output_dir.join(name))
    }
}

/// One apply invocation: distinct inputs, where to write, and which mark to use
#[derive(Debug, Clone)]
pub struct BatchJob {
    inputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub placement: Placement,
}

impl BatchJob {
    /// Duplicates are collapsed, keeping the first occurrence's position
    pub fn new<I, P>(inputs: I, output_dir: PathBuf, placement: Placement, dedup: DedupMode) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut seen = HashSet::new();
        let mut distinct = Vec::new();

        for input in inputs {
            let input = input.into();
            let key = match dedup {
                DedupMode::Exact => input.clone(),
                DedupMode::Canonical => input.canonicalize().unwrap_or_else(|_| input.clone()),
            };
            if seen.insert(key) {
                distinct.push(input);
            } else {
                debug!("Skipping duplicate input {:?}", input);
            }
        }

        Self {
            inputs: distinct,
            output_dir,
            placement,
        }
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Outcome for a single input
#[derive(Debug)]
pub enum ItemResult {
    Written { input: PathBuf, output: PathBuf },
    Failed { input: PathBuf, error: ItemError },
}

impl ItemResult {
    pub fn input(&self) -> &Path {
        match self {
            ItemResult::Written { input, .. } | ItemResult::Failed { input, .. } => input,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, ItemResult::Written { .. })
    }
}

#[derive(Debug)]
pub struct BatchReport {
    /// Number of images successfully written
    pub processed: usize,
    /// The output directory as resolved before the first write
    pub output_dir: PathBuf,
    /// Per-item outcomes in processing order
    pub results: Vec<ItemResult>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = &ItemResult> {
        self.results.iter().filter(|result| !result.is_written())
    }
}
