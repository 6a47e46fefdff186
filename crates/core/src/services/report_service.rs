use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::measurement::{
    CategoryDescriptor, Measurement, MeasurementQuery, TimeSeriesRecord, WeightEntry,
};
use crate::models::report::{
    ActivitySummary, BodyComposition, DailyReport, EnergyBalance, Macros, Metabolism,
    NutritionSummary, SleepSummary, WeightSummary, WeightTrend,
};
use crate::models::section::{Section, Unavailable};
use crate::models::settings::ReportSettings;
use crate::models::workout::{SessionSummary, WorkoutSummary};
use crate::providers::traits::TimeSeriesSource;
use crate::services::alignment::select_for_date;
use crate::services::fallback::{self, NutritionValues, ReportDraft, DAY_MEASUREMENT_LIMIT};
use crate::services::metrics::{self, lb_to_kg, round_to};
use crate::services::normalization::{self as norm, normalize_measurements};

/// Weigh-ins fetched per report (newest first).
pub const WEIGHT_HISTORY_LIMIT: usize = 365;
/// Size of the category directory listing.
pub const CATEGORY_LIMIT: usize = 200;
/// Body-fat readings fetched for the trend windows.
pub const HISTORY_LIMIT: usize = 500;
/// Records read per single-category, single-day lookup.
const DAY_CATEGORY_LIMIT: usize = 10;

/// Body-composition readings fetched by configured category id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyReadings {
    pub body_fat_pct: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
    pub bone_mass_kg: Option<f64>,
    pub hydration_pct: Option<f64>,
}

/// Everything besides the draft that goes into a report.
#[derive(Debug, Clone)]
pub struct ReportInputs<'a> {
    pub weights: &'a [WeightEntry],
    pub categories: Section<Vec<CategoryDescriptor>>,
    pub body: Section<BodyReadings>,
    pub body_fat_history: Section<Vec<TimeSeriesRecord>>,
    pub workouts: Section<WorkoutSummary>,
}

/// Builds a [`DailyReport`] for one requested date.
///
/// Pipeline: weight history (mandatory) → category directory → nutrition for
/// the requested date (mandatory) → fallback to the most recent nutrition day
/// → body composition, body-fat history and workouts for the effective date →
/// pure assembly.
///
/// Optional sections that fail degrade to [`Section::Unavailable`]; failures on
/// the weight or nutrition path abort the whole report.
pub struct ReportService {
    settings: ReportSettings,
}

impl ReportService {
    pub fn new(settings: ReportSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    pub async fn generate(
        &self,
        source: &dyn TimeSeriesSource,
        requested: NaiveDate,
        today: NaiveDate,
    ) -> Result<DailyReport, CoreError> {
        info!(source = source.name(), date = %requested, "building daily report");
        let ids = &self.settings.categories;

        let weights = source.fetch_weight_entries(WEIGHT_HISTORY_LIMIT).await?;
        let categories = optional("categories", source.fetch_categories(CATEGORY_LIMIT).await);

        let nutrition = self.fetch_nutrition(source, requested).await?;
        let day_records = optional(
            "measurements",
            source
                .fetch_measurements(&MeasurementQuery::new(DAY_MEASUREMENT_LIMIT).on(requested))
                .await,
        );

        let draft = ReportDraft::new(requested, nutrition, day_records);
        let draft = fallback::resolve(source, draft, today, ids).await?;
        let date = draft.date;

        let body = optional("body composition", self.fetch_body_readings(source, date).await);
        let body_fat_history = match ids.body_fat {
            Some(id) => optional(
                "body-fat history",
                source
                    .fetch_measurements(&MeasurementQuery::new(HISTORY_LIMIT).category(id).newest_first())
                    .await,
            ),
            None => Section::Unavailable(Unavailable::missing("no body-fat category configured")),
        };
        let workouts = optional("workouts", fetch_workouts(source, date).await);

        let report = assemble(
            &self.settings,
            draft,
            ReportInputs {
                weights: &weights,
                categories,
                body,
                body_fat_history,
                workouts,
            },
        );

        info!(
            date = %report.date,
            using_most_recent = report.using_most_recent,
            "daily report ready"
        );
        Ok(report)
    }

    /// One lookup per nutrition category for `date`; a missing value reads as zero.
    async fn fetch_nutrition(
        &self,
        source: &dyn TimeSeriesSource,
        date: NaiveDate,
    ) -> Result<NutritionValues, CoreError> {
        let mut values = [0.0; 5];
        for (slot, id) in values.iter_mut().zip(self.settings.categories.nutrition()) {
            *slot = fetch_day_value(source, id, date).await?.unwrap_or(0.0);
        }
        let [calories, protein_g, carbs_g, fat_g, exercise_kcal] = values;

        Ok(NutritionValues {
            calories,
            protein_g,
            carbs_g,
            fat_g,
            exercise_kcal,
        })
    }

    async fn fetch_body_readings(
        &self,
        source: &dyn TimeSeriesSource,
        date: NaiveDate,
    ) -> Result<BodyReadings, CoreError> {
        let ids = &self.settings.categories;
        Ok(BodyReadings {
            body_fat_pct: fetch_configured_value(source, ids.body_fat, date).await?,
            muscle_mass_kg: fetch_configured_value(source, ids.muscle_mass, date).await?,
            bone_mass_kg: fetch_configured_value(source, ids.bone_mass, date).await?,
            hydration_pct: fetch_configured_value(source, ids.hydration, date).await?,
        })
    }
}

/// Value of one category on one day, if recorded.
async fn fetch_day_value(
    source: &dyn TimeSeriesSource,
    category: u32,
    date: NaiveDate,
) -> Result<Option<f64>, CoreError> {
    let records = source
        .fetch_measurements(&MeasurementQuery::new(DAY_CATEGORY_LIMIT).category(category).on(date))
        .await?;
    Ok(select_for_date(&records, date).map(|r| r.value))
}

/// Like [`fetch_day_value`], for a category id that may not be configured.
async fn fetch_configured_value(
    source: &dyn TimeSeriesSource,
    category: Option<u32>,
    date: NaiveDate,
) -> Result<Option<f64>, CoreError> {
    match category {
        Some(id) => fetch_day_value(source, id, date).await,
        None => Ok(None),
    }
}

/// Routine count plus the sessions on `date`, each with its routine name
/// looked up individually.
async fn fetch_workouts(
    source: &dyn TimeSeriesSource,
    date: NaiveDate,
) -> Result<WorkoutSummary, CoreError> {
    let routines = source.fetch_workouts().await?;
    let sessions = source.fetch_sessions(date).await?;

    let mut summaries = Vec::with_capacity(sessions.len());
    for session in sessions {
        let workout_name = match session.workout_id {
            Some(id) => Some(source.fetch_workout(id).await?.name),
            None => None,
        };
        summaries.push(SessionSummary {
            id: session.id,
            workout_id: session.workout_id,
            workout_name,
            impression: session.impression,
            time_start: session.time_start,
            time_end: session.time_end,
            notes: session.notes,
        });
    }

    Ok(WorkoutSummary {
        routines: routines.len(),
        sessions: summaries,
    })
}

/// Turn an optional section's fetch result into a [`Section`], logging degradation.
fn optional<T>(section: &str, result: Result<T, CoreError>) -> Section<T> {
    if let Err(e) = &result {
        warn!(section, kind = %e.kind(), error = %e, "optional section unavailable");
    }
    result.into()
}

/// Derive every report figure from an aligned draft. Performs no I/O.
pub fn assemble(settings: &ReportSettings, draft: ReportDraft, inputs: ReportInputs<'_>) -> DailyReport {
    let date = draft.date;
    let profile = &settings.profile;

    // ── Weight & metabolism ─────────────────────────────────────────
    let weight: Section<WeightSummary> = match metrics::weight_summary(inputs.weights, date) {
        Some(w) => Section::Present(w),
        None => Section::Unavailable(Unavailable::missing("no weight entries")),
    };
    let current_lb = weight.present().map(|w| w.current_lb);
    let weight_trend = weight
        .present()
        .map(|w| w.trend.clone())
        .unwrap_or_else(WeightTrend::default);

    let exact = current_lb.map(|lb| metrics::metabolism(lb, profile));
    let tdee = exact.as_ref().map(|m| m.tdee_kcal);
    let metabolism = match &exact {
        Some(m) => Section::Present(Metabolism {
            bmr_kcal: m.bmr_kcal.round(),
            tdee_kcal: m.tdee_kcal.round(),
        }),
        None => Section::Unavailable(Unavailable::missing("no weight reading for BMR")),
    };

    // ── Nutrition & energy ──────────────────────────────────────────
    let n = &draft.nutrition;
    let goal = profile.calorie_goal;
    let nutrition = NutritionSummary {
        calories: n.calories,
        protein_g: n.protein_g,
        carbs_g: n.carbs_g,
        fat_g: n.fat_g,
        exercise_kcal: n.exercise_kcal,
        goal_kcal: goal,
        remaining_kcal: metrics::remaining_calories(goal, n.calories, n.exercise_kcal),
    };

    // ── Named measurements ──────────────────────────────────────────
    let measurements: Section<BTreeMap<String, Measurement>> =
        match (&draft.day_records, &inputs.categories) {
            (Section::Present(records), Section::Present(categories)) => {
                Section::Present(normalize_measurements(records, categories))
            }
            (Section::Unavailable(u), _) | (_, Section::Unavailable(u)) => {
                Section::Unavailable(u.clone())
            }
        };
    let named = measurements.present();
    let hydration_ml = match (&draft.day_records, &inputs.categories) {
        (Section::Present(records), Section::Present(categories)) => {
            norm::hydration_ml(records, categories)
        }
        _ => None,
    };

    let activity = measurements.as_ref().map(|m| ActivitySummary {
        steps: norm::steps(m),
        distance_km: norm::value_of(m, norm::DISTANCE),
        device_kcal: norm::value_of(m, norm::DEVICE_CALORIES),
    });
    let sleep = measurements.as_ref().map(|m| SleepSummary {
        duration_hours: norm::value_of(m, norm::SLEEP_DURATION),
        score: norm::value_of(m, norm::SLEEP_SCORE),
        heart_rate_bpm: norm::value_of(m, norm::SLEEP_HEART_RATE),
        hrv_ms: norm::value_of(m, norm::SLEEP_HRV),
        respiratory_rate: norm::value_of(m, norm::SLEEP_RESPIRATORY_RATE),
    });
    let device_kcal = named.and_then(|m| norm::value_of(m, norm::DEVICE_CALORIES));

    let macros = Macros {
        protein_g: n.protein_g,
        carbs_g: n.carbs_g,
        fat_g: n.fat_g,
        sodium_mg: named.and_then(|m| norm::value_of(m, norm::SODIUM)),
    };

    let energy = EnergyBalance {
        intake_kcal: n.calories,
        exercise_kcal: n.exercise_kcal,
        device_kcal,
        goal_kcal: goal,
        tdee_kcal: tdee.map(f64::round),
        net_kcal_vs_goal: metrics::net_vs_goal(n.calories, goal, n.exercise_kcal),
        net_kcal_vs_tdee: metrics::net_vs_tdee(n.calories, n.exercise_kcal, tdee),
    };

    // ── Body composition ────────────────────────────────────────────
    let bodycomp = inputs.body.map(|b| {
        let split = metrics::mass_split(b.body_fat_pct, current_lb.map(lb_to_kg));
        BodyComposition {
            weight_lb: current_lb,
            fat_mass_kg: split.map(|(fat, _)| round_to(fat, 2)),
            lean_mass_kg: split.map(|(_, lean)| round_to(lean, 2)),
            body_fat_pct: b.body_fat_pct,
            muscle_mass_kg: b.muscle_mass_kg,
            bone_mass_kg: b.bone_mass_kg,
            hydration_pct: b.hydration_pct,
        }
    });
    let bodycomp_trend = inputs
        .body_fat_history
        .map(|history| metrics::body_composition_trend(&history, &weight_trend, date));

    DailyReport {
        date,
        requested_date: draft.requested_date,
        using_most_recent: draft.using_most_recent,
        hydration_ml,
        weight,
        nutrition,
        activity,
        metabolism,
        bodycomp,
        bodycomp_trend,
        macros,
        energy,
        sleep,
        workouts: inputs.workouts,
        measurements,
    }
}
