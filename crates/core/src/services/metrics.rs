use chrono::NaiveDate;

use crate::models::measurement::{Dated, TimeSeriesRecord, WeightEntry};
use crate::models::report::{BodyCompositionTrend, Metabolism, WeightSummary, WeightTrend};
use crate::models::settings::{ProfileSettings, Sex};
use crate::services::alignment::{aligned_day, newest, oldest, select_for_date, trend};

pub const LB_PER_KG: f64 = 2.20462;

pub fn lb_to_kg(lb: f64) -> f64 {
    lb / LB_PER_KG
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Basal Metabolic Rate, Mifflin-St Jeor:
/// 10 × kg + 6.25 × cm − 5 × age, +5 for men, −161 for women.
pub fn bmr_mifflin(weight_kg: f64, height_cm: f64, age_years: u32, sex: Sex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years);
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

pub fn tdee(bmr: f64, activity_factor: f64) -> f64 {
    bmr * activity_factor
}

/// BMR and TDEE for the profile at the given body weight (lb).
///
/// Returns unrounded values so downstream balances do not compound rounding.
pub fn metabolism(weight_lb: f64, profile: &ProfileSettings) -> Metabolism {
    let bmr = bmr_mifflin(lb_to_kg(weight_lb), profile.height_cm, profile.age_years, profile.sex);
    Metabolism {
        bmr_kcal: bmr,
        tdee_kcal: tdee(bmr, profile.activity_factor),
    }
}

/// goal − intake + exercise
pub fn remaining_calories(goal: f64, intake: f64, exercise: f64) -> f64 {
    goal - intake + exercise
}

/// intake − goal + exercise, to the nearest kcal
pub fn net_vs_goal(intake: f64, goal: f64, exercise: f64) -> i64 {
    (intake - goal + exercise).round() as i64
}

/// intake + exercise − TDEE, to the nearest kcal
pub fn net_vs_tdee(intake: f64, exercise: f64, tdee: Option<f64>) -> Option<i64> {
    tdee.map(|t| (intake + exercise - t).round() as i64)
}

/// Split body weight into (fat mass, lean mass), both in kg.
pub fn mass_split(body_fat_pct: Option<f64>, weight_kg: Option<f64>) -> Option<(f64, f64)> {
    let fat = (body_fat_pct? / 100.0) * weight_kg?;
    Some((fat, weight_kg? - fat))
}

/// Weight summary for `date`: the reading on that day, else the newest one.
///
/// Returns `None` when there is no usable weigh-in at all.
pub fn weight_summary(entries: &[WeightEntry], date: NaiveDate) -> Option<WeightSummary> {
    let current = select_for_date(entries, date).or_else(|| newest(entries))?;
    let earliest = oldest(entries).unwrap_or(current);

    Some(WeightSummary {
        current_lb: current.weight_lb,
        reading_date: current.aligned_date(),
        trend: weight_trend(entries, date),
        entries: entries.len(),
        total_change_lb: round_to(current.weight_lb - earliest.weight_lb, 2),
    })
}

pub fn weight_trend(entries: &[WeightEntry], date: NaiveDate) -> WeightTrend {
    let avg = |days| trend(entries, date, days, |e: &WeightEntry| Some(e.weight_lb));
    WeightTrend {
        avg_7d_lb: avg(7),
        avg_30d_lb: avg(30),
        avg_90d_lb: avg(90),
    }
}

/// Mean body-fat % over records dated 0..=`window_days` whole days before
/// `effective`. Future-dated records are excluded.
pub fn body_fat_trend(records: &[TimeSeriesRecord], effective: NaiveDate, window_days: i64) -> Option<f64> {
    let (sum, count) = records
        .iter()
        .filter(|r| {
            aligned_day(*r).is_some_and(|d| {
                let diff = (effective - d).num_days();
                (0..=window_days).contains(&diff)
            })
        })
        .fold((0.0, 0usize), |(sum, count), r| (sum + r.value, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Lean mass implied by averaged body fat applied to the averaged weight.
pub fn lean_mass_trend(weight_trend_lb: Option<f64>, body_fat_trend_pct: Option<f64>) -> Option<f64> {
    Some(lb_to_kg(weight_trend_lb?) * (1.0 - body_fat_trend_pct? / 100.0))
}

/// 30- and 90-day body-composition averages ending at `effective`.
pub fn body_composition_trend(
    body_fat_history: &[TimeSeriesRecord],
    weight: &WeightTrend,
    effective: NaiveDate,
) -> BodyCompositionTrend {
    let bf_30 = body_fat_trend(body_fat_history, effective, 30);
    let bf_90 = body_fat_trend(body_fat_history, effective, 90);

    BodyCompositionTrend {
        body_fat_pct_30d: bf_30.map(|v| round_to(v, 2)),
        body_fat_pct_90d: bf_90.map(|v| round_to(v, 2)),
        lean_mass_kg_30d: lean_mass_trend(weight.avg_30d_lb, bf_30).map(|v| round_to(v, 2)),
        lean_mass_kg_90d: lean_mass_trend(weight.avg_90d_lb, bf_90).map(|v| round_to(v, 2)),
    }
}
