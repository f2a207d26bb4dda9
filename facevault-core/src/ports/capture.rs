//! Frame capture port
//!
//! The camera is a singleton device resource. Workflows acquire it through
//! [`CaptureProvider::acquire`], which hands back a [`CaptureGuard`]; the
//! underlying stream is released when the guard drops, on every exit path.

use async_trait::async_trait;

use crate::domain::result::{Error, Result};

/// One still image taken from a live feed, base64 JPEG without the data-URL
/// prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame(String);

impl CapturedFrame {
    pub fn new(base64: impl Into<String>) -> Self {
        Self(base64.into())
    }

    pub fn as_base64(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An acquired, running capture stream
pub trait ActiveCapture: Send {
    /// Take one still image from the stream
    fn snapshot(&mut self) -> Result<CapturedFrame>;

    /// Stop the stream. Called by [`CaptureGuard`] on drop.
    fn release(&mut self);
}

/// Frame capture capability (a camera, in production)
#[async_trait]
pub trait CaptureProvider: Send + Sync {
    /// Start the device and return a scoped handle to it
    async fn acquire(&self) -> Result<CaptureGuard>;
}

/// Scoped ownership of an active capture; releases the stream on drop
pub struct CaptureGuard {
    stream: Option<Box<dyn ActiveCapture>>,
}

impl CaptureGuard {
    pub fn new(stream: Box<dyn ActiveCapture>) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    /// Take one snapshot, failing fast when no frame is available
    pub fn snapshot(&mut self) -> Result<CapturedFrame> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| Error::capture("capture stream already released"))?;
        let frame = stream.snapshot()?;
        if frame.is_empty() {
            return Err(Error::capture("no frame available"));
        }
        Ok(frame)
    }

    /// Release the stream early, ahead of drop
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
        }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.release();
    }
}
