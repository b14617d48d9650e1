use super::FileSystem;
use crate::error::PlatformError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Document area backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    documents: PathBuf,
}

impl LocalFileSystem {
    pub fn new(documents: impl Into<PathBuf>) -> Self {
        Self {
            documents: documents.into(),
        }
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    fn document_directory(&self) -> PathBuf {
        self.documents.clone()
    }

    async fn write_text_file(&self, path: &Path, contents: &str) -> Result<(), PlatformError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
        log::debug!("[fs] wrote {} bytes to {}", contents.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let files = LocalFileSystem::new(dir.path().join("documents"));
        let path = files.document_directory().join("out.txt");

        files.write_text_file(&path, "first").await.unwrap();
        files.write_text_file(&path, "second").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }
}
