//! CLI command implementations

pub mod config;
pub mod register;
pub mod session;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use facevault_core::adapters::FileCaptureProvider;
use facevault_core::{CaptureProvider, FacevaultContext};

/// Get the facevault directory from environment or default
pub fn get_facevault_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FACEVAULT_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".facevault")
    }
}

/// Build the capture provider for this invocation. The CLI captures from an
/// image file supplied with --image.
pub fn get_capture(image: &Path) -> Arc<dyn CaptureProvider> {
    Arc::new(FileCaptureProvider::new(image))
}

/// Get or create the facevault context
pub fn get_context(capture: Arc<dyn CaptureProvider>) -> Result<FacevaultContext> {
    let facevault_dir = get_facevault_dir();

    std::fs::create_dir_all(&facevault_dir)
        .with_context(|| format!("Failed to create facevault directory: {:?}", facevault_dir))?;

    let config = facevault_core::config::Config::load(&facevault_dir)?;
    if config.api_base_url.is_empty() {
        anyhow::bail!("No API URL configured. Run 'fv config --api-url <url>' first.");
    }

    FacevaultContext::new(config, capture).context("Failed to initialize facevault context")
}
