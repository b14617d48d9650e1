use super::{Album, Asset, MediaLibrary};
use crate::error::PlatformError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Media library laid out on shared storage.
///
/// Registering an asset copies the file into the media root; albums are
/// subdirectories of the root, and placing an asset in an album moves its file
/// there. Existing album contents are never touched.
#[derive(Debug, Clone)]
pub struct DirectoryMediaLibrary {
    root: PathBuf,
}

impl DirectoryMediaLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn album_dir(&self, name: &str) -> Result<PathBuf, PlatformError> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(PlatformError::MediaLibrary(format!(
                "invalid album name {:?}",
                name
            )));
        }
        Ok(self.root.join(name))
    }

    async fn move_into(&self, asset: &Asset, dir: &Path) -> Result<(), PlatformError> {
        let target = dir.join(&asset.filename);
        // rename() would silently replace an asset already in the album
        if tokio::fs::try_exists(&target).await? {
            return Err(PlatformError::MediaLibrary(format!(
                "{} already holds {}",
                dir.display(),
                asset.filename
            )));
        }
        tokio::fs::rename(&asset.uri, &target).await.map_err(|e| {
            PlatformError::MediaLibrary(format!(
                "failed to move {} into {}: {}",
                asset.uri.display(),
                dir.display(),
                e
            ))
        })
    }
}

async fn count_files(dir: &Path) -> Result<usize, PlatformError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut count = 0;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            count += 1;
        }
    }
    Ok(count)
}

#[async_trait]
impl MediaLibrary for DirectoryMediaLibrary {
    async fn create_asset(&self, path: &Path) -> Result<Asset, PlatformError> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                PlatformError::MediaLibrary(format!("{} is not a file", path.display()))
            })?;

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            PlatformError::MediaLibrary(format!("media root unavailable: {}", e))
        })?;

        let uri = self.root.join(&filename);
        tokio::fs::copy(path, &uri).await.map_err(|e| {
            PlatformError::MediaLibrary(format!("failed to register {}: {}", path.display(), e))
        })?;

        log::info!("[media] registered asset {}", uri.display());
        Ok(Asset {
            id: filename.clone(),
            filename,
            uri,
        })
    }

    async fn get_album(&self, name: &str) -> Result<Option<Album>, PlatformError> {
        let dir = self.album_dir(name)?;
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(Some(Album {
                title: name.to_string(),
                asset_count: count_files(&dir).await?,
                uri: dir,
            })),
            Ok(_) => Err(PlatformError::MediaLibrary(format!(
                "{} exists but is not an album",
                dir.display()
            ))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_album(&self, name: &str, seed: &Asset) -> Result<Album, PlatformError> {
        let dir = self.album_dir(name)?;
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            PlatformError::MediaLibrary(format!("failed to create album {}: {}", name, e))
        })?;
        self.move_into(seed, &dir).await?;

        log::info!("[media] created album {} with {}", name, seed.filename);
        Ok(Album {
            title: name.to_string(),
            asset_count: count_files(&dir).await?,
            uri: dir,
        })
    }

    async fn add_assets_to_album(
        &self,
        assets: &[Asset],
        album: &Album,
    ) -> Result<(), PlatformError> {
        for asset in assets {
            self.move_into(asset, &album.uri).await?;
            log::info!("[media] added {} to album {}", asset.filename, album.title);
        }
        Ok(())
    }
}
