use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::alignment::extract_date;

/// Anything that carries an upstream timestamp and can be aligned to a calendar day.
pub trait Dated {
    /// The raw upstream timestamp (ISO-8601 date or datetime).
    fn timestamp(&self) -> &str;

    /// The `YYYY-MM-DD` day this record belongs to.
    /// Non-date timestamps flow through unchanged.
    fn aligned_date(&self) -> String {
        extract_date(self.timestamp())
    }
}

/// A single scalar measurement as stored upstream: (date, category, value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRecord {
    pub timestamp: String,
    pub category: u32,
    pub value: f64,
}

impl TimeSeriesRecord {
    pub fn new(timestamp: impl Into<String>, category: u32, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            category,
            value,
        }
    }
}

impl Dated for TimeSeriesRecord {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// A weigh-in. The upstream store keeps body weight in pounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub timestamp: String,
    pub weight_lb: f64,
}

impl WeightEntry {
    pub fn new(timestamp: impl Into<String>, weight_lb: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            weight_lb,
        }
    }
}

impl Dated for WeightEntry {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Maps a numeric category id to its human name and unit string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    pub id: u32,
    pub name: String,
    pub unit: String,
}

impl CategoryDescriptor {
    pub fn new(id: u32, name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            unit: unit.into(),
        }
    }
}

/// A measurement after unit normalization, keyed by category name in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

/// Filter for a measurement listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementQuery {
    pub category: Option<u32>,
    pub date: Option<NaiveDate>,
    /// Order by date descending (`ordering=-date`).
    pub newest_first: bool,
    /// Maximum number of records to collect across pages.
    pub limit: usize,
}

impl MeasurementQuery {
    /// Unfiltered query in upstream order.
    pub fn new(limit: usize) -> Self {
        Self {
            category: None,
            date: None,
            newest_first: false,
            limit,
        }
    }

    pub fn category(mut self, category: u32) -> Self {
        self.category = Some(category);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }
}
