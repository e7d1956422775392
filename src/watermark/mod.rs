// Watermark module - asset loading, layout arithmetic, compositing and encoding
mod assets;
mod compositor;
mod error;
pub mod formats;
mod layout;
mod types;

pub use assets::{WatermarkAssets, default_asset_directory};
pub use compositor::composite;
pub use error::{ItemError, WatermarkError};
pub use layout::{LayoutSettings, WatermarkLayout};
pub use types::{Orientation, OutputFormat, Placement};
