//! Request/response contracts for the device services the logger relies on,
//! plus the backends shipped with the binary.

pub mod fs;
pub mod media;
pub mod permissions;
pub mod simulated;
pub mod termux;
#[cfg(test)]
pub mod testing;

use crate::error::PlatformError;
use crate::position::{Accuracy, PositionReading};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use fs::LocalFileSystem;
pub use media::DirectoryMediaLibrary;
pub use permissions::PolicyPermissions;
pub use simulated::SimulatedSensor;
pub use termux::TermuxSensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionResponse {
    pub granted: bool,
}

impl PermissionResponse {
    pub fn granted() -> Self {
        Self { granted: true }
    }

    pub fn denied() -> Self {
        Self { granted: false }
    }
}

/// Media-library reference to a registered file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub filename: String,
    pub uri: PathBuf,
}

/// Named collection of assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub title: String,
    pub uri: PathBuf,
    pub asset_count: usize,
}

#[async_trait]
pub trait PermissionService: Send + Sync {
    async fn request_foreground_location(&self) -> PermissionResponse;
    async fn request_media_library(&self) -> PermissionResponse;
}

#[async_trait]
pub trait PositionSensor: Send + Sync {
    async fn get_current_position(
        &self,
        accuracy: Accuracy,
    ) -> Result<PositionReading, PlatformError>;
}

#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Application-private document area
    fn document_directory(&self) -> PathBuf;

    /// Write `contents` as the complete contents of `path`, replacing any existing file
    async fn write_text_file(&self, path: &Path, contents: &str) -> Result<(), PlatformError>;
}

#[async_trait]
pub trait MediaLibrary: Send + Sync {
    async fn create_asset(&self, path: &Path) -> Result<Asset, PlatformError>;
    async fn get_album(&self, name: &str) -> Result<Option<Album>, PlatformError>;
    async fn create_album(&self, name: &str, seed: &Asset) -> Result<Album, PlatformError>;
    async fn add_assets_to_album(&self, assets: &[Asset], album: &Album)
        -> Result<(), PlatformError>;
}

/// The full set of services an application session talks to
#[derive(Clone)]
pub struct Platform {
    pub permissions: Arc<dyn PermissionService>,
    pub sensor: Arc<dyn PositionSensor>,
    pub files: Arc<dyn FileSystem>,
    pub media: Arc<dyn MediaLibrary>,
}
