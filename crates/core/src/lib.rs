pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::NaiveDate;
use models::{report::DailyReport, settings::ReportSettings};
use providers::{traits::TimeSeriesSource, wger::WgerSource};
use services::{
    render_service::{RenderService, ReportFormat},
    report_service::ReportService,
};

use errors::CoreError;

/// Main entry point for the health-report core library.
/// Holds the settings, the time-series source and the services that turn
/// one request (date + format) into a report.
///
/// Nothing is cached between requests: every call fetches and derives anew.
#[must_use]
pub struct HealthReporter {
    source: Box<dyn TimeSeriesSource>,
    report_service: ReportService,
    render_service: RenderService,
}

impl std::fmt::Debug for HealthReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthReporter")
            .field("source", &self.source.name())
            .field("base_url", &self.report_service.settings().source.base_url)
            .field("profile", &self.report_service.settings().profile)
            .finish()
    }
}

impl HealthReporter {
    /// Create a reporter backed by the wger store named in `settings`.
    /// Fails with `CoreError::Configuration` before any network call if the
    /// settings are incomplete.
    pub fn new(settings: ReportSettings) -> Result<Self, CoreError> {
        settings.validate()?;
        let source = WgerSource::new(&settings.source);
        Ok(Self::build(settings, Box::new(source)))
    }

    /// Create a reporter on top of any [`TimeSeriesSource`].
    pub fn with_source(
        settings: ReportSettings,
        source: Box<dyn TimeSeriesSource>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self::build(settings, source))
    }

    fn build(settings: ReportSettings, source: Box<dyn TimeSeriesSource>) -> Self {
        Self {
            source,
            report_service: ReportService::new(settings),
            render_service: RenderService::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ReportSettings {
        self.report_service.settings()
    }

    // ── Reports ─────────────────────────────────────────────────────

    /// Build the report for `date` (default: today in UTC).
    pub async fn get_report(&self, date: Option<NaiveDate>) -> Result<DailyReport, CoreError> {
        let today = chrono::Utc::now().date_naive();
        self.get_report_as_of(date.unwrap_or(today), today).await
    }

    /// Build the report for `date` as if the current UTC day were `today`.
    /// Only a request for `today` can fall back to an earlier day.
    pub async fn get_report_as_of(
        &self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<DailyReport, CoreError> {
        self.report_service
            .generate(self.source.as_ref(), date, today)
            .await
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// Build and render the report for `date` in one step.
    pub async fn render_report(
        &self,
        date: Option<NaiveDate>,
        format: ReportFormat,
    ) -> Result<String, CoreError> {
        let report = self.get_report(date).await?;
        self.render(&report, format)
    }

    pub fn render(&self, report: &DailyReport, format: ReportFormat) -> Result<String, CoreError> {
        self.render_service.render(report, format)
    }

    /// Render a fatal error as the single structured failure result.
    #[must_use]
    pub fn render_error(&self, error: &CoreError, format: ReportFormat) -> String {
        self.render_service.render_error(error, format)
    }
}
