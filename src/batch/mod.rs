pub mod core;
pub mod progress;
pub mod types;

pub use self::core::{BatchProcessor, resolve_output_dir};
pub use progress::{NoProgress, ProgressReporter};
pub use types::{BatchJob, BatchReport, DedupMode, FailurePolicy, ItemResult, OutputSettings};
