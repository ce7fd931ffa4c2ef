//! Source file loading
//!
//! Reads a user-selected file as text, once, asynchronously. Bytes that are
//! not valid UTF-8 are replaced rather than rejected, so binary files load
//! as garbled text instead of failing.

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// Capability to read a chosen file as text
#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Read the whole file at `path`
    async fn read_text(&self, path: &Path) -> Result<String>;
}

/// Reader over the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSourceReader;

#[async_trait]
impl SourceReader for FsSourceReader {
    async fn read_text(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(decode_lossy(bytes))
    }
}

fn decode_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
