use crate::acquirer::acquire_position;
use crate::error::{AcquireError, ActionError, ExportError};
use crate::exporter::{export_history, ExportReceipt};
use crate::history::History;
use crate::platform::Platform;
use crate::position::{HistoryEntry, PositionReading};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{watch, RwLock};

/// Modal message shown after an export attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
        }
    }

    fn from_export(result: &Result<ExportReceipt, ExportError>) -> Self {
        match result {
            Ok(_) => Alert::new("Success", "File saved to Downloads folder!"),
            Err(ExportError::PermissionDenied) => {
                Alert::new("Permission Denied", ExportError::PermissionDenied.to_string())
            }
            Err(e) => Alert::new("Error", e.to_string()),
        }
    }
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, Default, Serialize)]
pub struct UiState {
    pub current_position: Option<PositionReading>,
    pub error: Option<String>,
    pub alert: Option<Alert>,
    pub history: History,
}

impl UiState {
    pub fn apply_acquired(&mut self, entry: HistoryEntry) {
        self.current_position = Some(entry.reading.clone());
        self.error = None;
        self.history.append(entry);
    }

    /// Replaces any earlier error; position and history are left alone
    pub fn apply_acquire_failed(&mut self, err: &AcquireError) {
        self.error = Some(err.to_string());
    }

    pub fn apply_export_result(&mut self, result: &Result<ExportReceipt, ExportError>) {
        self.alert = Some(Alert::from_export(result));
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn can_export(&self) -> bool {
        !self.history.is_empty()
    }
}

/// Point-in-time view of the application for rendering
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub revision: u64,
    #[serde(flatten)]
    pub state: UiState,
    pub acquiring: bool,
    pub exporting: bool,
}

/// Clears an in-flight flag when the action finishes or is dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn begin(flag: &'a AtomicBool, action: &'static str) -> Result<Self, ActionError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ActionError::Busy(action))?;
        Ok(InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Session state holder: owns the UI state and runs the two user actions
pub struct App {
    platform: Platform,
    fix_timeout: Option<Duration>,
    state: RwLock<UiState>,
    acquiring: AtomicBool,
    exporting: AtomicBool,
    revisions: watch::Sender<u64>,
}

impl App {
    pub fn new(platform: Platform, fix_timeout: Option<Duration>) -> Self {
        let (revisions, _) = watch::channel(0);
        Self {
            platform,
            fix_timeout,
            state: RwLock::new(UiState::default()),
            acquiring: AtomicBool::new(false),
            exporting: AtomicBool::new(false),
            revisions,
        }
    }

    /// Receiver that observes every state change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revisions.subscribe()
    }

    fn publish(&self) {
        self.revisions.send_modify(|revision| *revision += 1);
    }

    pub async fn snapshot(&self) -> Snapshot {
        // Revision first: a change landing in between then forces a re-render
        let revision = *self.revisions.borrow();
        let state = self.state.read().await.clone();
        Snapshot {
            revision,
            state,
            acquiring: self.acquiring.load(Ordering::Acquire),
            exporting: self.exporting.load(Ordering::Acquire),
        }
    }

    /// "Get location": acquire one fix and record it, or record the error.
    ///
    /// Rejected with `ActionError::Busy` while a previous acquisition is pending.
    pub async fn get_location(&self) -> Result<Result<HistoryEntry, AcquireError>, ActionError> {
        let guard = InFlight::begin(&self.acquiring, "Location request")?;
        self.publish();

        let result = acquire_position(
            self.platform.permissions.as_ref(),
            self.platform.sensor.as_ref(),
            self.fix_timeout,
        )
        .await;

        {
            let mut state = self.state.write().await;
            match &result {
                Ok(entry) => state.apply_acquired(entry.clone()),
                Err(e) => state.apply_acquire_failed(e),
            }
        }
        drop(guard);
        self.publish();

        Ok(result)
    }

    /// "Save locations to file": export the history as it stands right now.
    ///
    /// Rejected with `ActionError::Busy` while a previous export is pending.
    pub async fn save_to_file(&self) -> Result<Result<ExportReceipt, ExportError>, ActionError> {
        let guard = InFlight::begin(&self.exporting, "Export")?;
        self.publish();

        let entries = self.state.read().await.history.snapshot();
        let result = export_history(
            &entries,
            self.platform.permissions.as_ref(),
            self.platform.files.as_ref(),
            self.platform.media.as_ref(),
        )
        .await;

        self.state.write().await.apply_export_result(&result);
        drop(guard);
        self.publish();

        Ok(result)
    }

    pub async fn dismiss_alert(&self) {
        self.state.write().await.dismiss_alert();
        self.publish();
    }
}
