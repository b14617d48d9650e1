use super::PositionSensor;
use crate::error::PlatformError;
use crate::position::{Accuracy, PositionReading};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Deterministic drifting fix for machines without a location provider
#[derive(Debug)]
pub struct SimulatedSensor {
    origin: (f64, f64),
    counter: AtomicU64,
}

impl SimulatedSensor {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            origin: (latitude, longitude),
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        // San Francisco
        Self::new(37.7749, -122.4194)
    }
}

#[async_trait]
impl PositionSensor for SimulatedSensor {
    async fn get_current_position(
        &self,
        accuracy: Accuracy,
    ) -> Result<PositionReading, PlatformError> {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed) as f64;

        let base_accuracy = match accuracy {
            Accuracy::High => 5.0,
            Accuracy::Balanced => 20.0,
            Accuracy::Low => 100.0,
        };

        let reading = PositionReading::new(
            self.origin.0 + seq * 0.00001,
            self.origin.1 + seq * 0.00001,
            base_accuracy + (seq * 0.1).sin() * 2.0,
            Utc::now(),
        )
        .with_altitude(16.0 + (seq * 0.3).cos())
        .with_speed(1.4 + (seq * 0.5).sin() * 0.5)
        .with_heading(45.0);

        Ok(reading)
    }
}
