use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::measurement::{CategoryDescriptor, MeasurementQuery, TimeSeriesRecord, WeightEntry};
use crate::models::workout::{WorkoutRoutine, WorkoutSession};

/// Read access to the time-series store the report is built from.
///
/// The engine only talks to this trait, so a different store (or an
/// in-memory fixture in tests) can be dropped in without touching the
/// derivation code. Every call is attempted once; retries are the
/// implementation's business.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TimeSeriesSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Measurement records matching the query, in the order the store returns them.
    async fn fetch_measurements(
        &self,
        query: &MeasurementQuery,
    ) -> Result<Vec<TimeSeriesRecord>, CoreError>;

    /// Category id → (name, unit) directory.
    async fn fetch_categories(&self, limit: usize) -> Result<Vec<CategoryDescriptor>, CoreError>;

    /// Weigh-ins, newest first.
    async fn fetch_weight_entries(&self, limit: usize) -> Result<Vec<WeightEntry>, CoreError>;

    /// Workout routines defined upstream.
    async fn fetch_workouts(&self) -> Result<Vec<WorkoutRoutine>, CoreError>;

    /// Sessions logged on `date`.
    async fn fetch_sessions(&self, date: NaiveDate) -> Result<Vec<WorkoutSession>, CoreError>;

    /// A single routine by id.
    async fn fetch_workout(&self, id: u32) -> Result<WorkoutRoutine, CoreError>;
}
