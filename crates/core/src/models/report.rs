use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::measurement::Measurement;
use super::section::Section;
use super::workout::WorkoutSummary;

/// The unified read model for one day.
///
/// `date` is the effective date the figures reflect. It differs from
/// `requested_date` only when `using_most_recent` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    /// Effective date of every figure below
    pub date: NaiveDate,

    /// Date the caller asked for
    pub requested_date: NaiveDate,

    /// True when the report was moved back to the most recent day with nutrition data
    pub using_most_recent: bool,

    pub weight: Section<WeightSummary>,
    pub nutrition: NutritionSummary,
    pub activity: Section<ActivitySummary>,
    pub metabolism: Section<Metabolism>,
    pub bodycomp: Section<BodyComposition>,
    pub bodycomp_trend: Section<BodyCompositionTrend>,
    pub macros: Macros,

    /// Named category → normalized value for the effective date
    pub measurements: Section<BTreeMap<String, Measurement>>,

    /// Water intake in millilitres, taken from the first water/hydration category
    pub hydration_ml: Option<f64>,

    pub energy: EnergyBalance,
    pub sleep: Section<SleepSummary>,
    pub workouts: Section<WorkoutSummary>,
}

/// Weight history summary. All values in pounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightSummary {
    pub current_lb: f64,

    /// Day the current reading was taken (may precede the report date)
    pub reading_date: String,

    pub trend: WeightTrend,

    /// Total number of weigh-ins fetched
    pub entries: usize,

    /// Current reading minus the earliest reading
    pub total_change_lb: f64,
}

/// Rolling averages ending at the report date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeightTrend {
    pub avg_7d_lb: Option<f64>,
    pub avg_30d_lb: Option<f64>,
    pub avg_90d_lb: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NutritionSummary {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub exercise_kcal: f64,
    pub goal_kcal: f64,
    /// goal − calories + exercise
    pub remaining_kcal: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub steps: Option<u64>,
    pub distance_km: Option<f64>,
    /// Active calories reported by the scale vendor's tracker
    pub device_kcal: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metabolism {
    pub bmr_kcal: f64,
    pub tdee_kcal: f64,
}

/// Body composition on the report date. Weight in pounds, masses in kilograms.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BodyComposition {
    pub weight_lb: Option<f64>,
    pub fat_mass_kg: Option<f64>,
    pub lean_mass_kg: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
    pub bone_mass_kg: Option<f64>,
    pub hydration_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BodyCompositionTrend {
    pub body_fat_pct_30d: Option<f64>,
    pub body_fat_pct_90d: Option<f64>,
    pub lean_mass_kg_30d: Option<f64>,
    pub lean_mass_kg_90d: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Macros {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub sodium_mg: Option<f64>,
}

/// Net energy balance against the calorie goal and against TDEE.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnergyBalance {
    pub intake_kcal: f64,
    pub exercise_kcal: f64,
    pub device_kcal: Option<f64>,
    pub goal_kcal: f64,
    pub tdee_kcal: Option<f64>,
    /// intake − goal + exercise
    pub net_kcal_vs_goal: i64,
    /// intake + exercise − TDEE
    pub net_kcal_vs_tdee: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SleepSummary {
    pub duration_hours: Option<f64>,
    pub score: Option<f64>,
    pub heart_rate_bpm: Option<f64>,
    pub hrv_ms: Option<f64>,
    pub respiratory_rate: Option<f64>,
}
