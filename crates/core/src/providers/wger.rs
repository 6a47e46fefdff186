use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::{redact_query, CoreError};
use crate::models::measurement::{CategoryDescriptor, MeasurementQuery, TimeSeriesRecord, WeightEntry};
use crate::models::settings::SourceSettings;
use crate::models::workout::{WorkoutRoutine, WorkoutSession};
use super::traits::TimeSeriesSource;

const MEASUREMENT_PATH: &str = "/api/v2/measurement/";
const CATEGORY_PATH: &str = "/api/v2/measurement-category/";
const WEIGHT_PATH: &str = "/api/v2/weightentry/";
const WORKOUT_PATH: &str = "/api/v2/workout/";
const SESSION_PATH: &str = "/api/v2/workoutsession/";

/// Upper bound on a routine or session listing.
const WORKOUT_LIMIT: usize = 100;

/// Client for a self-hosted wger instance.
///
/// - **Auth**: `Authorization: Token <token>`
/// - **Listings**: paginated `{count, next, results}`; `next` links are
///   followed until the requested number of records is collected.
/// - **Numbers**: decimals arrive as strings (`"196.22"`) or numbers.
pub struct WgerSource {
    client: Client,
    base_url: String,
    token: String,
}

impl WgerSource {
    pub fn new(settings: &SourceSettings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET one URL and decode its JSON body.
    ///
    /// Transport failures → `SourceUnavailable`, non-2xx → `SourceProtocol`,
    /// undecodable body → `SourceFormat`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, CoreError> {
        debug!(url = %redact_query(url), ?params, "wger request");

        let resp = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .header(ACCEPT, "application/json")
            .query(params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::SourceProtocol {
                status: status.as_u16(),
                message: format!("GET {} failed", redact_query(url)),
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            CoreError::SourceFormat(format!("{}: {e}", redact_query(url)))
        })
    }

    /// Collect up to `limit` results from a paginated listing.
    ///
    /// Stops early on an empty page or on a `next` link that repeats the
    /// page just fetched, so every followed page adds at least one record.
    async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        mut params: Vec<(&str, String)>,
        limit: usize,
    ) -> Result<Vec<T>, CoreError> {
        let mut results = Vec::new();
        if limit == 0 {
            return Ok(results);
        }

        params.push(("limit", limit.to_string()));
        let mut url = self.url(path);
        let mut page: Page<T> = self.get_json(&url, &params).await?;

        loop {
            let empty = page.results.is_empty();
            results.extend(page.results);
            if results.len() >= limit {
                results.truncate(limit);
                break;
            }
            let Some(next) = page.next else { break };

            if empty || next == url {
                warn!(url = %redact_query(&next), collected = results.len(), "pagination stalled, keeping partial listing");
                break;
            }

            // `next` already carries the full query
            page = self.get_json(&next, &[]).await?;
            url = next;
        }

        Ok(results)
    }
}

// ── wger API response types ─────────────────────────────────────────

#[derive(Deserialize)]
struct Page<T> {
    #[serde(default)]
    next: Option<String>,
    results: Vec<T>,
}

#[derive(Deserialize)]
struct MeasurementResponse {
    category: u32,
    date: String,
    #[serde(deserialize_with = "decimal")]
    value: f64,
}

#[derive(Deserialize)]
struct CategoryResponse {
    id: u32,
    name: String,
    unit: String,
}

#[derive(Deserialize)]
struct WeightResponse {
    date: String,
    #[serde(deserialize_with = "decimal")]
    weight: f64,
}

#[derive(Deserialize)]
struct WorkoutResponse {
    id: u32,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct SessionResponse {
    id: u32,
    #[serde(default)]
    workout: Option<u32>,
    date: String,
    #[serde(default)]
    impression: Option<String>,
    #[serde(default)]
    time_start: Option<String>,
    #[serde(default)]
    time_end: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

/// Accept a decimal encoded either as a JSON number or as a string.
fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(f64),
        Text(String),
    }

    match Decimal::deserialize(deserializer)? {
        Decimal::Number(n) => Ok(n),
        Decimal::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid decimal {s:?}"))),
    }
}

impl From<WorkoutResponse> for WorkoutRoutine {
    fn from(w: WorkoutResponse) -> Self {
        Self {
            id: w.id,
            name: w.name.unwrap_or_default(),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TimeSeriesSource for WgerSource {
    fn name(&self) -> &str {
        "wger"
    }

    async fn fetch_measurements(
        &self,
        query: &MeasurementQuery,
    ) -> Result<Vec<TimeSeriesRecord>, CoreError> {
        let mut params = Vec::new();
        if let Some(category) = query.category {
            params.push(("category", category.to_string()));
        }
        if let Some(date) = query.date {
            params.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        if query.newest_first {
            params.push(("ordering", "-date".to_string()));
        }

        let rows: Vec<MeasurementResponse> =
            self.get_paginated(MEASUREMENT_PATH, params, query.limit).await?;

        Ok(rows
            .into_iter()
            .map(|m| TimeSeriesRecord::new(m.date, m.category, m.value))
            .collect())
    }

    async fn fetch_categories(&self, limit: usize) -> Result<Vec<CategoryDescriptor>, CoreError> {
        let rows: Vec<CategoryResponse> = self.get_paginated(CATEGORY_PATH, Vec::new(), limit).await?;
        Ok(rows
            .into_iter()
            .map(|c| CategoryDescriptor::new(c.id, c.name, c.unit))
            .collect())
    }

    async fn fetch_weight_entries(&self, limit: usize) -> Result<Vec<WeightEntry>, CoreError> {
        let params = vec![("ordering", "-date".to_string())];
        let rows: Vec<WeightResponse> = self.get_paginated(WEIGHT_PATH, params, limit).await?;
        Ok(rows
            .into_iter()
            .map(|w| WeightEntry::new(w.date, w.weight))
            .collect())
    }

    async fn fetch_workouts(&self) -> Result<Vec<WorkoutRoutine>, CoreError> {
        let rows: Vec<WorkoutResponse> =
            self.get_paginated(WORKOUT_PATH, Vec::new(), WORKOUT_LIMIT).await?;
        Ok(rows.into_iter().map(WorkoutRoutine::from).collect())
    }

    async fn fetch_sessions(&self, date: NaiveDate) -> Result<Vec<WorkoutSession>, CoreError> {
        let params = vec![("date", date.format("%Y-%m-%d").to_string())];
        let rows: Vec<SessionResponse> = self.get_paginated(SESSION_PATH, params, WORKOUT_LIMIT).await?;
        Ok(rows
            .into_iter()
            .map(|s| WorkoutSession {
                id: s.id,
                workout_id: s.workout,
                date: s.date,
                impression: s.impression,
                time_start: s.time_start,
                time_end: s.time_end,
                notes: s.notes,
            })
            .collect())
    }

    async fn fetch_workout(&self, id: u32) -> Result<WorkoutRoutine, CoreError> {
        let url = self.url(&format!("{WORKOUT_PATH}{id}/"));
        let resp: WorkoutResponse = self.get_json(&url, &[]).await?;
        Ok(resp.into())
    }
}
