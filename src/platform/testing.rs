//! In-memory platform doubles that record every call they receive.

use super::{
    Album, Asset, FileSystem, MediaLibrary, PermissionResponse, PermissionService, Platform,
    PositionSensor,
};
use crate::error::PlatformError;
use crate::position::{Accuracy, PositionReading};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    LocationPermission,
    MediaPermission,
    GetPosition(Accuracy),
    WriteFile(PathBuf),
    CreateAsset(PathBuf),
    GetAlbum(String),
    CreateAlbum(String, String),
    AddAssets(Vec<String>, String),
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn reading(latitude: f64, longitude: f64) -> PositionReading {
    PositionReading::new(
        latitude,
        longitude,
        5.0,
        Utc.with_ymd_and_hms(2025, 11, 19, 12, 0, 0).unwrap(),
    )
}

pub struct FakePermissions {
    pub location: AtomicBool,
    pub media: AtomicBool,
    calls: CallLog,
}

#[async_trait]
impl PermissionService for FakePermissions {
    async fn request_foreground_location(&self) -> PermissionResponse {
        self.calls.lock().unwrap().push(Call::LocationPermission);
        PermissionResponse {
            granted: self.location.load(Ordering::SeqCst),
        }
    }

    async fn request_media_library(&self) -> PermissionResponse {
        self.calls.lock().unwrap().push(Call::MediaPermission);
        PermissionResponse {
            granted: self.media.load(Ordering::SeqCst),
        }
    }
}

/// Sensor returning scripted results in order, then drifting fixes
pub struct FakeSensor {
    script: Mutex<VecDeque<Result<PositionReading, PlatformError>>>,
    /// When set, every request waits for a permit before answering
    pub gate: Option<Arc<tokio::sync::Semaphore>>,
    issued: Mutex<u32>,
    calls: CallLog,
}

impl FakeSensor {
    pub fn push(&self, result: Result<PositionReading, PlatformError>) {
        self.script.lock().unwrap().push_back(result);
    }
}

#[async_trait]
impl PositionSensor for FakeSensor {
    async fn get_current_position(
        &self,
        accuracy: Accuracy,
    ) -> Result<PositionReading, PlatformError> {
        self.calls.lock().unwrap().push(Call::GetPosition(accuracy));
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        if let Some(result) = self.script.lock().unwrap().pop_front() {
            return result;
        }
        let mut issued = self.issued.lock().unwrap();
        *issued += 1;
        Ok(reading(40.0 + *issued as f64 * 0.001, -120.0))
    }
}

#[derive(Default)]
pub struct FakeFileSystem {
    pub files: Mutex<BTreeMap<PathBuf, String>>,
    pub fail_writes: AtomicBool,
    /// When set, every write waits for a permit before landing
    pub gate: Option<Arc<tokio::sync::Semaphore>>,
    calls: CallLog,
}

#[async_trait]
impl FileSystem for FakeFileSystem {
    fn document_directory(&self) -> PathBuf {
        PathBuf::from("/data/documents")
    }

    async fn write_text_file(&self, path: &Path, contents: &str) -> Result<(), PlatformError> {
        self.calls.lock().unwrap().push(Call::WriteFile(path.to_path_buf()));
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PlatformError::Filesystem("disk full".to_string()));
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeMediaLibrary {
    pub albums: Mutex<BTreeMap<String, Vec<String>>>,
    pub fail_assets: AtomicBool,
    calls: CallLog,
}

#[async_trait]
impl MediaLibrary for FakeMediaLibrary {
    async fn create_asset(&self, path: &Path) -> Result<Asset, PlatformError> {
        self.calls.lock().unwrap().push(Call::CreateAsset(path.to_path_buf()));
        if self.fail_assets.load(Ordering::SeqCst) {
            return Err(PlatformError::MediaLibrary("scanner offline".to_string()));
        }
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Asset {
            id: filename.clone(),
            filename: filename.clone(),
            uri: PathBuf::from("/media").join(filename),
        })
    }

    async fn get_album(&self, name: &str) -> Result<Option<Album>, PlatformError> {
        self.calls.lock().unwrap().push(Call::GetAlbum(name.to_string()));
        Ok(self.albums.lock().unwrap().get(name).map(|assets| Album {
            title: name.to_string(),
            uri: PathBuf::from("/media").join(name),
            asset_count: assets.len(),
        }))
    }

    async fn create_album(&self, name: &str, seed: &Asset) -> Result<Album, PlatformError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::CreateAlbum(name.to_string(), seed.id.clone()));
        self.albums
            .lock()
            .unwrap()
            .insert(name.to_string(), vec![seed.id.clone()]);
        Ok(Album {
            title: name.to_string(),
            uri: PathBuf::from("/media").join(name),
            asset_count: 1,
        })
    }

    async fn add_assets_to_album(
        &self,
        assets: &[Asset],
        album: &Album,
    ) -> Result<(), PlatformError> {
        let ids: Vec<String> = assets.iter().map(|a| a.id.clone()).collect();
        self.calls
            .lock()
            .unwrap()
            .push(Call::AddAssets(ids.clone(), album.title.clone()));
        self.albums
            .lock()
            .unwrap()
            .entry(album.title.clone())
            .or_default()
            .extend(ids);
        Ok(())
    }
}

/// A wired set of doubles sharing one call log
pub struct FakePlatform {
    pub permissions: Arc<FakePermissions>,
    pub sensor: Arc<FakeSensor>,
    pub files: Arc<FakeFileSystem>,
    pub media: Arc<FakeMediaLibrary>,
    pub calls: CallLog,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::build(None, None)
    }

    /// Sensor requests block until the returned semaphore hands out a permit
    pub fn gated() -> (Self, Arc<tokio::sync::Semaphore>) {
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        (Self::build(Some(Arc::clone(&gate)), None), gate)
    }

    /// File writes block until the returned semaphore hands out a permit
    pub fn gated_writes() -> (Self, Arc<tokio::sync::Semaphore>) {
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        (Self::build(None, Some(Arc::clone(&gate))), gate)
    }

    fn build(
        sensor_gate: Option<Arc<tokio::sync::Semaphore>>,
        write_gate: Option<Arc<tokio::sync::Semaphore>>,
    ) -> Self {
        let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
        Self {
            permissions: Arc::new(FakePermissions {
                location: AtomicBool::new(true),
                media: AtomicBool::new(true),
                calls: Arc::clone(&calls),
            }),
            sensor: Arc::new(FakeSensor {
                script: Mutex::new(VecDeque::new()),
                gate: sensor_gate,
                issued: Mutex::new(0),
                calls: Arc::clone(&calls),
            }),
            files: Arc::new(FakeFileSystem {
                gate: write_gate,
                calls: Arc::clone(&calls),
                ..Default::default()
            }),
            media: Arc::new(FakeMediaLibrary {
                calls: Arc::clone(&calls),
                ..Default::default()
            }),
            calls,
        }
    }

    pub fn platform(&self) -> Platform {
        Platform {
            permissions: self.permissions.clone(),
            sensor: self.sensor.clone(),
            files: self.files.clone(),
            media: self.media.clone(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}
