use serde::{Deserialize, Serialize};

/// A workout routine as listed upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutRoutine {
    pub id: u32,
    pub name: String,
}

/// A logged training session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: u32,
    /// Routine this session belongs to, if any
    pub workout_id: Option<u32>,
    pub date: String,
    pub impression: Option<String>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub notes: Option<String>,
}

/// A session as it appears in a report, with its routine name resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: u32,
    pub workout_id: Option<u32>,
    pub workout_name: Option<String>,
    pub impression: Option<String>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub notes: Option<String>,
}

/// Training activity for the report date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    /// Number of routines defined upstream
    pub routines: usize,

    /// Sessions logged on the report date
    pub sessions: Vec<SessionSummary>,
}
