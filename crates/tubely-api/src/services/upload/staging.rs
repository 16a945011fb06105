use super::types::UploadError;
use std::io::SeekFrom;
use std::path::Path;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

/// Request-scoped temporary file holding an upload body
///
/// The file is uniquely named inside the staging directory and removed when the
/// value is dropped, whether the request succeeded, failed or was cancelled.
pub struct StagingFile {
    file: File,
    path: TempPath,
    size: u64,
}

impl StagingFile {
    /// Create an empty staging file in `dir`.
    pub fn create(dir: &Path, prefix: &str) -> std::io::Result<Self> {
        let (file, path) = tempfile::Builder::new()
            .prefix(prefix)
            .tempfile_in(dir)?
            .into_parts();

        Ok(Self {
            file: File::from_std(file),
            path,
            size: 0,
        })
    }

    /// Copy `reader` into the file, failing once more than `max_bytes` arrive.
    pub async fn fill<R>(&mut self, reader: R, max_bytes: u64) -> Result<u64, UploadError>
    where
        R: AsyncRead + Unpin,
    {
        let mut limited = reader.take(max_bytes.saturating_add(1));
        let written = tokio::io::copy(&mut limited, &mut self.file).await?;

        if written > max_bytes {
            return Err(UploadError::TooLarge { max: max_bytes });
        }
        if written == 0 {
            return Err(UploadError::EmptyFile);
        }

        self.file.flush().await?;
        self.size = written;
        Ok(written)
    }

    /// Seek back to the start of the staged bytes.
    pub async fn rewind(&mut self) -> std::io::Result<()> {
        self.file.seek(SeekFrom::Start(0)).await?;
        Ok(())
    }

    /// Reader over the staged bytes from the start. Shares the file cursor.
    pub async fn reader(&mut self) -> std::io::Result<File> {
        self.rewind().await?;
        self.file.try_clone().await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}
