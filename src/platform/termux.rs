use super::PositionSensor;
use crate::error::PlatformError;
use crate::position::{Accuracy, PositionReading};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::process::Command;

/// Reads a single fix through Termux:API's `termux-location`
#[derive(Debug, Clone)]
pub struct TermuxSensor {
    program: String,
}

impl TermuxSensor {
    pub fn new() -> Self {
        Self::with_program("termux-location")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for TermuxSensor {
    fn default() -> Self {
        Self::new()
    }
}

fn provider_for(accuracy: Accuracy) -> &'static str {
    match accuracy {
        Accuracy::High => "gps",
        Accuracy::Balanced => "network",
        Accuracy::Low => "passive",
    }
}

/// JSON object printed by `termux-location`
#[derive(Debug, Deserialize)]
struct TermuxLocation {
    latitude: f64,
    longitude: f64,
    altitude: Option<f64>,
    accuracy: f64,
    speed: Option<f64>,
    bearing: Option<f64>,
    #[serde(rename = "elapsedMs")]
    elapsed_ms: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TermuxApiError {
    #[serde(rename = "API_ERROR")]
    message: String,
}

/// Parse `termux-location` stdout. `now` anchors the fix age reported in `elapsedMs`.
pub fn parse_location_output(
    output: &str,
    now: DateTime<Utc>,
) -> Result<PositionReading, PlatformError> {
    let text = output.trim();
    if text.is_empty() {
        return Err(PlatformError::SensorUnavailable(
            "no fix reported".to_string(),
        ));
    }

    if let Ok(api_error) = serde_json::from_str::<TermuxApiError>(text) {
        return Err(PlatformError::SensorUnavailable(api_error.message));
    }

    let location: TermuxLocation = serde_json::from_str(text)
        .map_err(|e| PlatformError::SensorUnavailable(format!("unreadable fix: {}", e)))?;

    let age = Duration::milliseconds(location.elapsed_ms.unwrap_or(0).max(0));

    Ok(PositionReading {
        latitude: location.latitude,
        longitude: location.longitude,
        altitude: location.altitude,
        accuracy: location.accuracy,
        speed: location.speed,
        heading: location.bearing,
        timestamp: now - age,
    })
}

#[async_trait]
impl PositionSensor for TermuxSensor {
    async fn get_current_position(
        &self,
        accuracy: Accuracy,
    ) -> Result<PositionReading, PlatformError> {
        let output = Command::new(&self.program)
            .arg("-p")
            .arg(provider_for(accuracy))
            .arg("-r")
            .arg("once")
            // A timed-out request must not leave termux-location running
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                PlatformError::SensorUnavailable(format!("failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PlatformError::SensorUnavailable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        parse_location_output(&text, Utc::now())
    }
}
