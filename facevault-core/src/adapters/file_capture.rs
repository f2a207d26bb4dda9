//! File-backed frame capture
//!
//! Stands in for a live camera in terminal environments: each snapshot reads
//! a still JPEG from disk and base64-encodes it. The real device APIs live
//! outside this crate; anything that can produce one encoded frame satisfies
//! the [`CaptureProvider`] port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;

use crate::domain::result::{Error, Result};
use crate::ports::{ActiveCapture, CaptureGuard, CaptureProvider, CapturedFrame};

/// Capture provider that reads frames from a fixed image file
#[derive(Debug, Clone)]
pub struct FileCaptureProvider {
    path: PathBuf,
}

impl FileCaptureProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CaptureProvider for FileCaptureProvider {
    async fn acquire(&self) -> Result<CaptureGuard> {
        if !self.path.exists() {
            return Err(Error::capture(format!(
                "image file not found: {}",
                self.path.display()
            )));
        }
        Ok(CaptureGuard::new(Box::new(FileCapture {
            path: self.path.clone(),
        })))
    }
}

struct FileCapture {
    path: PathBuf,
}

impl ActiveCapture for FileCapture {
    fn snapshot(&mut self) -> Result<CapturedFrame> {
        let bytes = read_image(&self.path)?;
        Ok(CapturedFrame::new(
            base64::engine::general_purpose::STANDARD.encode(bytes),
        ))
    }

    fn release(&mut self) {
        // Nothing to stop; the file handle is not held between snapshots.
    }
}

fn read_image(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::capture(format!("failed to read {}: {}", path.display(), e)))?;
    if bytes.is_empty() {
        return Err(Error::capture(format!(
            "image file is empty: {}",
            path.display()
        )));
    }
    Ok(bytes)
}
