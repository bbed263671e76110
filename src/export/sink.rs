use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::TcxArtifact;
use crate::util::write_atomically;

/// Destination for exported artifacts
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Deliver the artifact, returning where it ended up.
    async fn deliver(&self, artifact: &TcxArtifact) -> io::Result<PathBuf>;
}

/// Writes artifacts into a directory, replacing files of the same name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn deliver(&self, artifact: &TcxArtifact) -> io::Result<PathBuf> {
        // Only a bare file name may be joined onto the directory
        let file_name = Path::new(&artifact.filename)
            .file_name()
            .filter(|name| *name == artifact.filename.as_str())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("invalid export file name: {}", artifact.filename),
                )
            })?;
        let path = self.dir.join(file_name);
        let content = artifact.content.clone();

        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&target, content.as_bytes()))
            .await
            .map_err(io::Error::other)??;

        Ok(path)
    }
}
