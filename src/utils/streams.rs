// src/utils/streams.rs
use std::path::{Path, PathBuf};
use log::{debug, warn};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{self, AsyncWriteExt, BufWriter};
use crate::config::defs::PipelineError;


/// Byte-concatenates `sources`, in order, into a new file at `destination`.
/// Gzip members stay intact, so concatenated .gz files remain valid gzip.
/// An existing destination is never overwritten; a partial one is removed on failure.
///
/// # Arguments
///
/// * `sources` - Files to concatenate, in output order.
/// * `destination` - Path of the file to create.
///
/// # Returns
/// Number of bytes written.
///
pub async fn concat_files(sources: &[PathBuf], destination: &Path) -> Result<u64, PipelineError> {
    let out = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .await
        .map_err(|e| PipelineError::IOError(format!("Failed to create {}: {}", destination.display(), e)))?;

    match copy_all(sources, out).await {
        Ok(bytes) => {
            debug!("Wrote {} bytes to {}", bytes, destination.display());
            Ok(bytes)
        }
        Err(e) => {
            if let Err(rm) = fs::remove_file(destination).await {
                warn!("Failed to remove partial {}: {}", destination.display(), rm);
            }
            Err(e)
        }
    }
}

async fn copy_all(sources: &[PathBuf], out: File) -> Result<u64, PipelineError> {
    let mut writer = BufWriter::new(out);
    let mut total = 0u64;
    for source in sources {
        let mut reader = File::open(source)
            .await
            .map_err(|e| PipelineError::IOError(format!("Failed to open {}: {}", source.display(), e)))?;
        total += io::copy(&mut reader, &mut writer)
            .await
            .map_err(|e| PipelineError::IOError(format!("Failed to copy {}: {}", source.display(), e)))?;
    }
    writer.flush().await?;
    writer.into_inner().sync_all().await?;
    Ok(total)
}
