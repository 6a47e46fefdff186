//! Shared fixtures: an in-memory time-series source with scripted failures
//! and a call log, plus a realistic one-day data set.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Mutex;

use health_report_core::errors::{CoreError, ErrorKind};
use health_report_core::models::measurement::{
    CategoryDescriptor, Dated, MeasurementQuery, TimeSeriesRecord, WeightEntry,
};
use health_report_core::models::settings::{CategoryIds, ReportSettings};
use health_report_core::models::workout::{WorkoutRoutine, WorkoutSession};
use health_report_core::providers::traits::TimeSeriesSource;

// ── Category ids used by the fixture ────────────────────────────────

pub const CALORIES: u32 = 18;
pub const PROTEIN: u32 = 19;
pub const CARBS: u32 = 20;
pub const FAT: u32 = 21;
pub const EXERCISE: u32 = 22;
pub const STEPS_K: u32 = 30;
pub const STEPS_RAW: u32 = 31;
pub const DISTANCE: u32 = 32;
pub const DEVICE_CAL: u32 = 33;
pub const SODIUM: u32 = 34;
pub const BODY_FAT: u32 = 40;
pub const MUSCLE: u32 = 41;
pub const BONE: u32 = 42;
pub const HYDRATION: u32 = 43;
pub const SLEEP_DURATION: u32 = 50;
pub const SLEEP_SCORE: u32 = 51;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

pub fn error_of(kind: ErrorKind) -> CoreError {
    match kind {
        ErrorKind::SourceUnavailable => CoreError::SourceUnavailable("connection refused".into()),
        ErrorKind::SourceProtocol => CoreError::SourceProtocol {
            status: 404,
            message: "GET /api/v2/workout/ failed".into(),
        },
        ErrorKind::SourceFormat => CoreError::SourceFormat("expected value at line 1".into()),
        ErrorKind::MissingRequiredInput => CoreError::MissingRequiredInput("nothing".into()),
        ErrorKind::Configuration => CoreError::Configuration("bad".into()),
    }
}

/// In-memory source. Measurement queries are answered by filtering
/// `measurements` the way the real store filters.
#[derive(Default)]
pub struct MockSource {
    pub weights: Vec<WeightEntry>,
    pub categories: Vec<CategoryDescriptor>,
    pub measurements: Vec<TimeSeriesRecord>,
    pub routines: Vec<WorkoutRoutine>,
    pub sessions: Vec<WorkoutSession>,

    pub fail_weights: Option<ErrorKind>,
    pub fail_categories: Option<ErrorKind>,
    pub fail_workouts: Option<ErrorKind>,
    /// Any measurement query filtered on one of these categories fails
    pub fail_category_ids: Vec<u32>,
    /// Unfiltered-by-category day listings fail
    pub fail_day_listing: Option<ErrorKind>,

    pub calls: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TimeSeriesSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_measurements(
        &self,
        query: &MeasurementQuery,
    ) -> Result<Vec<TimeSeriesRecord>, CoreError> {
        self.log(format!(
            "measurements category={:?} date={:?} newest_first={} limit={}",
            query.category, query.date, query.newest_first, query.limit
        ));

        if let Some(category) = query.category {
            if self.fail_category_ids.contains(&category) {
                return Err(error_of(ErrorKind::SourceUnavailable));
            }
        } else if let Some(kind) = self.fail_day_listing {
            return Err(error_of(kind));
        }

        let target = query.date.map(|d| d.format("%Y-%m-%d").to_string());
        let mut rows: Vec<TimeSeriesRecord> = self
            .measurements
            .iter()
            .filter(|r| query.category.map_or(true, |c| r.category == c))
            .filter(|r| target.as_ref().map_or(true, |t| &r.aligned_date() == t))
            .cloned()
            .collect();

        if query.newest_first {
            rows.sort_by(|a, b| b.aligned_date().cmp(&a.aligned_date()));
        }
        rows.truncate(query.limit);
        Ok(rows)
    }

    async fn fetch_categories(&self, limit: usize) -> Result<Vec<CategoryDescriptor>, CoreError> {
        self.log("categories".into());
        if let Some(kind) = self.fail_categories {
            return Err(error_of(kind));
        }
        Ok(self.categories.iter().take(limit).cloned().collect())
    }

    async fn fetch_weight_entries(&self, limit: usize) -> Result<Vec<WeightEntry>, CoreError> {
        self.log("weights".into());
        if let Some(kind) = self.fail_weights {
            return Err(error_of(kind));
        }
        Ok(self.weights.iter().take(limit).cloned().collect())
    }

    async fn fetch_workouts(&self) -> Result<Vec<WorkoutRoutine>, CoreError> {
        self.log("workouts".into());
        if let Some(kind) = self.fail_workouts {
            return Err(error_of(kind));
        }
        Ok(self.routines.clone())
    }

    async fn fetch_sessions(&self, date: NaiveDate) -> Result<Vec<WorkoutSession>, CoreError> {
        self.log(format!("sessions date={date}"));
        let target = date.format("%Y-%m-%d").to_string();
        Ok(self
            .sessions
            .iter()
            .filter(|s| s.date.starts_with(&target))
            .cloned()
            .collect())
    }

    async fn fetch_workout(&self, id: u32) -> Result<WorkoutRoutine, CoreError> {
        self.log(format!("workout id={id}"));
        self.routines
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| CoreError::SourceProtocol {
                status: 404,
                message: format!("GET /api/v2/workout/{id}/ failed"),
            })
    }
}

// ── Fixture data ────────────────────────────────────────────────────

pub fn settings() -> ReportSettings {
    let mut s = ReportSettings::default();
    s.source.base_url = "https://wger.example".into();
    s.source.token = "test-token".into();
    s.categories = CategoryIds {
        body_fat: Some(BODY_FAT),
        muscle_mass: Some(MUSCLE),
        bone_mass: Some(BONE),
        hydration: Some(HYDRATION),
        ..CategoryIds::default()
    };
    s
}

pub fn categories() -> Vec<CategoryDescriptor> {
    vec![
        CategoryDescriptor::new(CALORIES, "Daily Calories", "kcal"),
        CategoryDescriptor::new(PROTEIN, "Daily Protein", "g"),
        CategoryDescriptor::new(CARBS, "Daily Carbs", "g"),
        CategoryDescriptor::new(FAT, "Daily Fat", "g"),
        CategoryDescriptor::new(EXERCISE, "MFP Exercise Calories", "kcal"),
        CategoryDescriptor::new(STEPS_K, "Steps", "ksteps"),
        CategoryDescriptor::new(STEPS_RAW, "Steps", "steps"),
        CategoryDescriptor::new(DISTANCE, "Distance", "km"),
        CategoryDescriptor::new(DEVICE_CAL, "Calories", "kcal"),
        CategoryDescriptor::new(SODIUM, "Daily Sodium", "mg"),
        CategoryDescriptor::new(BODY_FAT, "Body Fat", "%"),
        CategoryDescriptor::new(MUSCLE, "Muscle Mass", "kg"),
        CategoryDescriptor::new(BONE, "Bone Mass", "kg"),
        CategoryDescriptor::new(HYDRATION, "Hydration", "%"),
        CategoryDescriptor::new(SLEEP_DURATION, "Sleep Duration", "hours"),
        CategoryDescriptor::new(SLEEP_SCORE, "Sleep Score", "score"),
    ]
}

/// Newest first, as the store returns them.
pub fn weights() -> Vec<WeightEntry> {
    vec![
        WeightEntry::new("2025-01-15", 196.22),
        WeightEntry::new("2025-01-14", 197.0),
        WeightEntry::new("2025-01-10", 198.0),
        WeightEntry::new("2024-12-01", 205.0),
        WeightEntry::new("2024-10-01", 210.0),
    ]
}

/// A full day of measurements on `date`.
pub fn day(date: &str) -> Vec<TimeSeriesRecord> {
    vec![
        TimeSeriesRecord::new(date, CALORIES, 930.0),
        TimeSeriesRecord::new(date, PROTEIN, 120.0),
        TimeSeriesRecord::new(date, CARBS, 80.0),
        TimeSeriesRecord::new(date, FAT, 30.0),
        TimeSeriesRecord::new(date, EXERCISE, 804.0),
        TimeSeriesRecord::new(date, STEPS_K, 13.57),
        TimeSeriesRecord::new(date, STEPS_RAW, 273.0),
        TimeSeriesRecord::new(date, DISTANCE, 9.8),
        TimeSeriesRecord::new(date, DEVICE_CAL, 420.0),
        TimeSeriesRecord::new(date, SODIUM, 2100.0),
        TimeSeriesRecord::new(date, BODY_FAT, 28.24),
        TimeSeriesRecord::new(date, MUSCLE, 60.5),
        TimeSeriesRecord::new(date, BONE, 3.4),
        TimeSeriesRecord::new(date, HYDRATION, 55.1),
        TimeSeriesRecord::new(date, SLEEP_DURATION, 7.5),
        TimeSeriesRecord::new(date, SLEEP_SCORE, 82.0),
    ]
}

/// Older body-fat readings for the trend windows.
pub fn body_fat_history() -> Vec<TimeSeriesRecord> {
    vec![
        TimeSeriesRecord::new("2025-01-01", BODY_FAT, 28.8),
        TimeSeriesRecord::new("2024-11-01", BODY_FAT, 29.5),
    ]
}

pub fn routines() -> Vec<WorkoutRoutine> {
    vec![
        WorkoutRoutine { id: 7, name: "Push day".into() },
        WorkoutRoutine { id: 8, name: "Pull day".into() },
    ]
}

pub fn sessions() -> Vec<WorkoutSession> {
    vec![WorkoutSession {
        id: 101,
        workout_id: Some(7),
        date: "2025-01-15".into(),
        impression: Some("good".into()),
        time_start: Some("06:30".into()),
        time_end: Some("07:25".into()),
        notes: None,
    }]
}

/// Source holding one complete day (2025-01-15) plus history.
pub fn sample_source() -> MockSource {
    let mut measurements = day("2025-01-15");
    measurements.extend(body_fat_history());
    MockSource {
        weights: weights(),
        categories: categories(),
        measurements,
        routines: routines(),
        sessions: sessions(),
        ..MockSource::default()
    }
}
