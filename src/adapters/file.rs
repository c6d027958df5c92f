use crate::core::ResponseSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// A raw response saved to disk, or piped on stdin when the path is `-`.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn read(&self) -> Result<String> {
        if self.path.as_os_str() == "-" {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            return Ok(buffer);
        }

        tracing::debug!("Reading raw response from {}", self.path.display());
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

#[async_trait]
impl ResponseSource for FileSource {
    /// Replays the saved response whatever the theme.
    async fn fetch(&self, _theme: &str) -> Result<String> {
        self.read().await
    }
}
