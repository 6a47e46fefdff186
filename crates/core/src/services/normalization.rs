use std::collections::{BTreeMap, HashMap};

use crate::models::measurement::{CategoryDescriptor, Measurement, TimeSeriesRecord};

/// Category names the report reads by name.
pub const STEPS: &str = "Steps";
pub const DISTANCE: &str = "Distance";
pub const DEVICE_CALORIES: &str = "Calories";
pub const SODIUM: &str = "Daily Sodium";
pub const SLEEP_DURATION: &str = "Sleep Duration";
pub const SLEEP_SCORE: &str = "Sleep Score";
pub const SLEEP_HEART_RATE: &str = "Sleep Heart Rate";
pub const SLEEP_HRV: &str = "Sleep HRV";
pub const SLEEP_RESPIRATORY_RATE: &str = "Sleep Respiratory Rate";

const UNIT_STEPS: &str = "steps";
const UNIT_KSTEPS: &str = "ksteps";

/// Apply the unit contract to one named upstream value.
///
/// - `Steps` in raw `steps` is dropped; the `ksteps` series supersedes it.
/// - `Steps` in `ksteps` is scaled by 1000 and relabelled `steps`.
/// - Everything else keeps its declared unit.
///
/// Input is always an upstream (category, value) pair; a [`Measurement`]
/// never goes back through here, so the ksteps scaling is applied once.
pub fn normalize_entry(name: &str, unit: &str, value: f64) -> Option<Measurement> {
    if name == STEPS && unit == UNIT_STEPS {
        return None;
    }
    if name == STEPS && unit == UNIT_KSTEPS {
        return Some(Measurement {
            value: (value * 1000.0).round(),
            unit: UNIT_STEPS.to_string(),
        });
    }
    Some(Measurement {
        value,
        unit: unit.to_string(),
    })
}

/// Resolve raw records against the category directory into a name-keyed map.
///
/// Records whose category is not in the directory are skipped. When two
/// categories share a name, the later record wins.
pub fn normalize_measurements(
    records: &[TimeSeriesRecord],
    categories: &[CategoryDescriptor],
) -> BTreeMap<String, Measurement> {
    let directory: HashMap<u32, &CategoryDescriptor> =
        categories.iter().map(|c| (c.id, c)).collect();

    let mut out = BTreeMap::new();
    for record in records {
        let Some(category) = directory.get(&record.category) else {
            continue;
        };
        if let Some(m) = normalize_entry(&category.name, &category.unit, record.value) {
            out.insert(category.name.clone(), m);
        }
    }
    out
}

/// Water intake in millilitres.
///
/// Scans the day's records in the order the source returned them and takes
/// the first whose category name contains "water" or "hydration",
/// case-insensitively. The unit is not checked.
pub fn hydration_ml(records: &[TimeSeriesRecord], categories: &[CategoryDescriptor]) -> Option<f64> {
    let directory: HashMap<u32, &CategoryDescriptor> =
        categories.iter().map(|c| (c.id, c)).collect();

    records.iter().find_map(|record| {
        let category = directory.get(&record.category)?;
        let lower = category.name.to_lowercase();
        if !(lower.contains("water") || lower.contains("hydration")) {
            return None;
        }
        normalize_entry(&category.name, &category.unit, record.value).map(|m| m.value)
    })
}

/// Whole-number step count from a normalized map.
pub fn steps(measurements: &BTreeMap<String, Measurement>) -> Option<u64> {
    measurements
        .get(STEPS)
        .filter(|m| m.value.is_finite() && m.value >= 0.0)
        .map(|m| m.value.round() as u64)
}

/// Value of a named category, if present.
pub fn value_of(measurements: &BTreeMap<String, Measurement>, name: &str) -> Option<f64> {
    measurements.get(name).map(|m| m.value)
}
