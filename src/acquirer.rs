use crate::error::{AcquireError, PlatformError};
use crate::platform::{PermissionService, PositionSensor};
use crate::position::{Accuracy, HistoryEntry};
use chrono::Utc;
use std::time::Duration;

/// Ask for foreground location permission, then take one high-accuracy fix.
///
/// The returned entry is stamped with the wall-clock instant the fix arrived.
/// With `timeout` unset the call waits as long as the sensor does.
pub async fn acquire_position(
    permissions: &dyn PermissionService,
    sensor: &dyn PositionSensor,
    timeout: Option<Duration>,
) -> Result<HistoryEntry, AcquireError> {
    let response = permissions.request_foreground_location().await;
    if !response.granted {
        log::warn!("[acquire] foreground location permission denied");
        return Err(AcquireError::PermissionDenied);
    }

    let request = sensor.get_current_position(Accuracy::High);
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .unwrap_or(Err(PlatformError::Timeout(limit))),
        None => request.await,
    };

    match result {
        Ok(reading) => {
            log::info!(
                "[acquire] location obtained: lat={} lon={} accuracy={}m",
                reading.latitude,
                reading.longitude,
                reading.accuracy
            );
            Ok(HistoryEntry::new(reading, Utc::now()))
        }
        Err(e) => {
            log::error!("[acquire] error getting location: {}", e);
            Err(e.into())
        }
    }
}
