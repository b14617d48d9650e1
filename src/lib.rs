//! Location logger: take single position fixes on request, keep them in a
//! session history and export that history as a text file into the shared
//! `Download` album.

pub mod acquirer;
pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod exporter;
pub mod history;
pub mod platform;
pub mod position;

pub use app::{Alert, App, Snapshot, UiState};
pub use error::{AcquireError, ActionError, ExportError, PlatformError};
pub use history::History;
pub use position::{Accuracy, HistoryEntry, PositionReading};
