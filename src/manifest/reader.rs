//! Bounded manifest reads
//!
//! Every read is capped in size and, for async reads, in time, so a single
//! oversized or stalled file surfaces as a [`ManifestError`] instead of
//! holding up the whole run.

use super::{ManifestFile, ManifestInfo};
use crate::error::ManifestError;
use std::path::Path;
use std::time::Duration;

/// Default per-file read timeout
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Default per-file size cap (1 MiB)
pub const DEFAULT_MAX_MANIFEST_BYTES: u64 = 1024 * 1024;

/// Limits applied to each manifest read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    pub timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_READ_TIMEOUT,
            max_bytes: DEFAULT_MAX_MANIFEST_BYTES,
        }
    }
}

impl ReadLimits {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn check_size(&self, path: &Path, size: u64) -> Result<(), ManifestError> {
        if size > self.max_bytes {
            return Err(ManifestError::too_large(path, size, self.max_bytes));
        }
        Ok(())
    }
}

/// Read one manifest, bounded by `limits`
pub async fn read_manifest(path: &Path, limits: ReadLimits) -> Result<ManifestFile, ManifestError> {
    let read = async {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ManifestError::read_error(path, e))?;
        limits.check_size(path, metadata.len())?;

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ManifestError::read_error(path, e))?;
        // The file may have grown since it was stat'ed
        limits.check_size(path, content.len() as u64)?;

        Ok(ManifestFile::new(path, content))
    };

    tokio::time::timeout(limits.timeout, read)
        .await
        .map_err(|_| ManifestError::timeout(path, limits.timeout))?
}

/// Read a list of detected manifests in order, stopping at the first failure
pub async fn read_manifests(
    manifests: &[ManifestInfo],
    limits: ReadLimits,
) -> Result<Vec<ManifestFile>, ManifestError> {
    let mut files = Vec::with_capacity(manifests.len());
    for info in manifests {
        files.push(read_manifest(&info.path, limits).await?);
    }
    Ok(files)
}

/// Blocking read with the same size cap, for synchronous callers
pub fn read_manifest_blocking(path: &Path, max_bytes: u64) -> Result<ManifestFile, ManifestError> {
    let limits = ReadLimits::default().with_max_bytes(max_bytes);
    let metadata = std::fs::metadata(path).map_err(|e| ManifestError::read_error(path, e))?;
    limits.check_size(path, metadata.len())?;

    let content = std::fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
    limits.check_size(path, content.len() as u64)?;

    Ok(ManifestFile::new(path, content))
}
