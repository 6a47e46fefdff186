use chrono::NaiveDate;
use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::measurement::{Dated, MeasurementQuery, TimeSeriesRecord};
use crate::models::section::Section;
use crate::models::settings::CategoryIds;
use crate::providers::traits::TimeSeriesSource;
use crate::services::alignment::aligned_day;

/// Cap for a full single-day measurement listing.
pub const DAY_MEASUREMENT_LIMIT: usize = 500;

/// The five nutrition figures read by category id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NutritionValues {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub exercise_kcal: f64,
}

impl NutritionValues {
    /// Pick each nutrition category's value for `date` out of a mixed record set.
    /// A category with no record on that day reads as zero.
    pub fn from_records(records: &[TimeSeriesRecord], date: NaiveDate, ids: &CategoryIds) -> Self {
        let target = date.format("%Y-%m-%d").to_string();
        let value = |category: u32| {
            records
                .iter()
                .find(|r| r.category == category && r.aligned_date() == target)
                .map(|r| r.value)
                .unwrap_or(0.0)
        };

        Self {
            calories: value(ids.calories),
            protein_g: value(ids.protein),
            carbs_g: value(ids.carbs),
            fat_g: value(ids.fat),
            exercise_kcal: value(ids.exercise),
        }
    }
}

/// Date-dependent part of a report, before metrics are derived.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub requested_date: NaiveDate,

    /// Effective date
    pub date: NaiveDate,

    pub using_most_recent: bool,
    pub nutrition: NutritionValues,

    /// Every measurement record for the effective date
    pub day_records: Section<Vec<TimeSeriesRecord>>,
}

impl ReportDraft {
    pub fn new(
        requested_date: NaiveDate,
        nutrition: NutritionValues,
        day_records: Section<Vec<TimeSeriesRecord>>,
    ) -> Self {
        Self {
            requested_date,
            date: requested_date,
            using_most_recent: false,
            nutrition,
            day_records,
        }
    }
}

/// True only for a request about today that found no calorie intake.
pub fn should_fall_back(requested: NaiveDate, today: NaiveDate, calories: f64) -> bool {
    requested == today && calories == 0.0
}

/// Move a draft to `new_date` using that day's full measurement set.
///
/// Nutrition is re-derived from `records`, so every figure in the result
/// belongs to the same day. A draft that has already been moved is
/// returned as is.
pub fn realign(
    draft: ReportDraft,
    new_date: NaiveDate,
    records: Vec<TimeSeriesRecord>,
    ids: &CategoryIds,
) -> ReportDraft {
    if draft.using_most_recent {
        return draft;
    }

    ReportDraft {
        requested_date: draft.requested_date,
        date: new_date,
        using_most_recent: true,
        nutrition: NutritionValues::from_records(&records, new_date, ids),
        day_records: Section::Present(records),
    }
}

/// Walk a today-with-no-calories draft back to the most recent day that has
/// calorie data. At most one hop is made.
///
/// Failures here sit on the nutrition path and propagate.
pub async fn resolve(
    source: &dyn TimeSeriesSource,
    draft: ReportDraft,
    today: NaiveDate,
    ids: &CategoryIds,
) -> Result<ReportDraft, CoreError> {
    if draft.using_most_recent || !should_fall_back(draft.requested_date, today, draft.nutrition.calories) {
        return Ok(draft);
    }

    let latest = source
        .fetch_measurements(&MeasurementQuery::new(1).category(ids.calories).newest_first())
        .await?;

    let Some(latest_date) = latest.first().and_then(aligned_day) else {
        debug!("no calorie history to fall back to");
        return Ok(draft);
    };
    if latest_date == draft.requested_date {
        return Ok(draft);
    }

    info!(
        requested = %draft.requested_date,
        effective = %latest_date,
        "no nutrition logged today, using most recent day"
    );

    let records = source
        .fetch_measurements(&MeasurementQuery::new(DAY_MEASUREMENT_LIMIT).on(latest_date))
        .await?;

    Ok(realign(draft, latest_date, records, ids))
}
