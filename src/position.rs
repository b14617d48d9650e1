use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Sensor accuracy mode requested for a single fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accuracy {
    /// Passive provider, whatever fix the device already has
    Low,
    /// Network/cell based positioning
    Balanced,
    /// Satellite positioning, favours precision over power and latency
    High,
}

/// One platform-reported fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReading {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above the WGS84 ellipsoid
    pub altitude: Option<f64>,
    /// Horizontal accuracy radius in meters
    pub accuracy: f64,
    /// Meters per second
    pub speed: Option<f64>,
    /// Degrees clockwise from true north
    pub heading: Option<f64>,
    /// Instant the sensor produced the fix
    pub timestamp: DateTime<Utc>,
}

impl PositionReading {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            accuracy,
            speed: None,
            heading: None,
            timestamp,
        }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }
}

/// A fix plus the wall-clock instant it was recorded into the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub reading: PositionReading,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(reading: PositionReading, recorded_at: DateTime<Utc>) -> Self {
        Self {
            reading,
            recorded_at,
        }
    }

    /// ISO-8601 with millisecond precision, e.g. `2025-11-19T12:00:00.000Z`
    pub fn iso_timestamp(&self) -> String {
        iso_timestamp(&self.recorded_at)
    }

    /// Local wall-clock time for list display, e.g. `3:04:05 PM`
    pub fn display_time(&self) -> String {
        self.recorded_at
            .with_timezone(&Local)
            .format("%-I:%M:%S %p")
            .to_string()
    }
}

pub fn iso_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fixed six-decimal coordinate for display; stored values keep full precision
pub fn display_coordinate(value: f64) -> String {
    format!("{:.6}", value)
}
