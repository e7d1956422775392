use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::progress::ProgressReporter;
use super::types::{BatchJob, BatchReport, FailurePolicy, ItemResult, OutputSettings};
use crate::watermark::{
    ItemError, LayoutSettings, Placement, WatermarkAssets, WatermarkError, composite, formats,
};

/// Drives the compositor over every image of a `BatchJob`, one at a time
pub struct BatchProcessor<'a> {
    assets: &'a WatermarkAssets,
    layout: LayoutSettings,
    output: OutputSettings,
    policy: FailurePolicy,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(assets: &'a WatermarkAssets) -> Self {
        Self {
            assets,
            layout: LayoutSettings::default(),
            output: OutputSettings::default(),
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_layout(mut self, layout: LayoutSettings) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_output(mut self, output: OutputSettings) -> Self {
        self.output = output;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Watermark every input of `job` into its output directory.
    ///
    /// Under `FailFast` the first failing item ends the batch with
    /// `WatermarkError::ItemProcess`; files written before it stay on disk.
    pub fn apply_all(
        &self,
        job: &BatchJob,
        progress: &mut dyn ProgressReporter,
    ) -> Result<BatchReport, WatermarkError> {
        if job.is_empty() {
            return Err(WatermarkError::NoInput);
        }

        let output_dir = resolve_output_dir(&job.output_dir)?;
        let total = job.len();
        info!(
            "Watermarking {} images ({} placement) into {:?}",
            total, job.placement, output_dir
        );

        let mut results = Vec::with_capacity(total);
        let mut written_paths = HashSet::new();
        let mut processed = 0;

        for (index, input) in job.inputs().iter().enumerate() {
            let result = match self.process_one(input, &output_dir, job.placement) {
                Ok(output) => {
                    if !written_paths.insert(output.clone()) {
                        warn!(
                            "{:?} overwrites an output already written in this batch: {:?}",
                            input, output
                        );
                    }
                    processed += 1;
                    ItemResult::Written {
                        input: input.clone(),
                        output,
                    }
                }
                Err(e) => {
                    error!("Failed to watermark {:?}: {}", input, e);
                    ItemResult::Failed {
                        input: input.clone(),
                        error: e,
                    }
                }
            };

            progress.on_item(index + 1, total, &result);

            match result {
                ItemResult::Failed { input, error } if self.policy == FailurePolicy::FailFast => {
                    return Err(WatermarkError::ItemProcess {
                        path: input,
                        source: error,
                    });
                }
                result => results.push(result),
            }
        }

        info!("Watermarked {} of {} images", processed, total);
        Ok(BatchReport {
            processed,
            output_dir,
            results,
        })
    }

    fn process_one(
        &self,
        input: &Path,
        output_dir: &Path,
        placement: Placement,
    ) -> Result<PathBuf, ItemError> {
        let output_path = self.output.output_path_for(input, output_dir)?;
        if output_path.exists() && same_file(input, &output_path) {
            return Err(ItemError::OverwritesSource);
        }
        let decoded = formats::decode_with_profile(input)?;

        let watermarked = composite(
            &decoded.image,
            self.assets.get(placement),
            placement,
            &self.layout,
        );

        let format = formats::save(
            &watermarked,
            &output_path,
            self.output.jpeg_quality,
            decoded.icc_profile.as_deref(),
        )?;
        debug!("Wrote {:?} as {:?}", output_path, format);

        Ok(output_path)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Create the output directory if needed; it must exist before any write
pub fn resolve_output_dir(path: &Path) -> Result<PathBuf, WatermarkError> {
    let to_error = |source: std::io::Error| WatermarkError::OutputDir {
        path: path.to_path_buf(),
        source,
    };

    if !path.exists() {
        info!("Output directory does not exist, creating: {:?}", path);
    }
    std::fs::create_dir_all(path).map_err(to_error)?;

    if !path.is_dir() {
        return Err(to_error(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "path exists and is not a directory",
        )));
    }

    Ok(path.to_path_buf())
}
