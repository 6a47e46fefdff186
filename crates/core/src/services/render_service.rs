use std::fmt::Write;
use std::str::FromStr;

use crate::errors::{CoreError, ErrorReport};
use crate::models::report::DailyReport;

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            other => Err(CoreError::Configuration(format!("unknown report format: {other}"))),
        }
    }
}

/// Serializes a [`DailyReport`] into one of the output formats.
///
/// JSON carries every field. Text and markdown are lossy projections that
/// print `n/a` wherever a value is absent.
pub struct RenderService;

impl RenderService {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, report: &DailyReport, format: ReportFormat) -> Result<String, CoreError> {
        match format {
            ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            ReportFormat::Text => Ok(self.render_lines(report, false)),
            ReportFormat::Markdown => Ok(self.render_lines(report, true)),
        }
    }

    pub fn render_error(&self, error: &CoreError, format: ReportFormat) -> String {
        let report = ErrorReport::from(error);
        match format {
            ReportFormat::Json => serde_json::to_string_pretty(&report)
                .unwrap_or_else(|_| format!("{{\"kind\":\"{}\"}}", report.kind)),
            ReportFormat::Text | ReportFormat::Markdown => {
                format!("error ({}): {}", report.kind, report.message)
            }
        }
    }

    fn render_lines(&self, r: &DailyReport, markdown: bool) -> String {
        let mut out = String::new();
        let heading = |out: &mut String, title: &str| {
            if markdown {
                let _ = writeln!(out, "\n## {title}\n");
            } else {
                let _ = writeln!(out, "\n{}\n{}", title.to_uppercase(), "-".repeat(title.len()));
            }
        };
        let line = |out: &mut String, label: &str, value: String| {
            if markdown {
                let _ = writeln!(out, "- **{label}:** {value}");
            } else {
                let _ = writeln!(out, "  {label:<18} {value}");
            }
        };

        if markdown {
            let _ = writeln!(out, "# Daily Health Report: {}", r.date);
        } else {
            let _ = writeln!(out, "DAILY HEALTH REPORT: {}", r.date);
        }
        if r.using_most_recent {
            let _ = writeln!(
                out,
                "(no data for {}, showing most recent day {})",
                r.requested_date, r.date
            );
        }

        heading(&mut out, "Weight");
        let w = r.weight.present();
        line(&mut out, "Current", opt(w.map(|w| w.current_lb), 1, "lb"));
        line(&mut out, "Reading date", w.map(|w| w.reading_date.clone()).unwrap_or_else(na));
        line(&mut out, "7-day avg", opt(w.and_then(|w| w.trend.avg_7d_lb), 1, "lb"));
        line(&mut out, "30-day avg", opt(w.and_then(|w| w.trend.avg_30d_lb), 1, "lb"));
        line(&mut out, "90-day avg", opt(w.and_then(|w| w.trend.avg_90d_lb), 1, "lb"));
        line(&mut out, "Total change", opt(w.map(|w| w.total_change_lb), 1, "lb"));

        heading(&mut out, "Nutrition");
        let n = &r.nutrition;
        line(&mut out, "Calories", num(n.calories, 0, "kcal"));
        line(&mut out, "Exercise", num(n.exercise_kcal, 0, "kcal"));
        line(&mut out, "Goal", num(n.goal_kcal, 0, "kcal"));
        line(&mut out, "Remaining", num(n.remaining_kcal, 0, "kcal"));
        line(&mut out, "Protein", num(r.macros.protein_g, 0, "g"));
        line(&mut out, "Carbs", num(r.macros.carbs_g, 0, "g"));
        line(&mut out, "Fat", num(r.macros.fat_g, 0, "g"));
        line(&mut out, "Sodium", opt(r.macros.sodium_mg, 0, "mg"));
        line(&mut out, "Water", opt(r.hydration_ml, 0, "ml"));

        heading(&mut out, "Activity");
        let a = r.activity.present();
        line(
            &mut out,
            "Steps",
            a.and_then(|a| a.steps).map(|s| s.to_string()).unwrap_or_else(na),
        );
        line(&mut out, "Distance", opt(a.and_then(|a| a.distance_km), 2, "km"));
        line(&mut out, "Device calories", opt(a.and_then(|a| a.device_kcal), 0, "kcal"));

        heading(&mut out, "Energy");
        let m = r.metabolism.present();
        line(&mut out, "BMR", opt(m.map(|m| m.bmr_kcal), 0, "kcal"));
        line(&mut out, "TDEE", opt(m.map(|m| m.tdee_kcal), 0, "kcal"));
        line(&mut out, "Net vs goal", format!("{:+} kcal", r.energy.net_kcal_vs_goal));
        line(
            &mut out,
            "Net vs TDEE",
            r.energy
                .net_kcal_vs_tdee
                .map(|v| format!("{v:+} kcal"))
                .unwrap_or_else(na),
        );

        heading(&mut out, "Body composition");
        let b = r.bodycomp.present();
        line(&mut out, "Body fat", opt(b.and_then(|b| b.body_fat_pct), 1, "%"));
        line(&mut out, "Fat mass", opt(b.and_then(|b| b.fat_mass_kg), 2, "kg"));
        line(&mut out, "Lean mass", opt(b.and_then(|b| b.lean_mass_kg), 2, "kg"));
        line(&mut out, "Muscle mass", opt(b.and_then(|b| b.muscle_mass_kg), 2, "kg"));
        line(&mut out, "Bone mass", opt(b.and_then(|b| b.bone_mass_kg), 2, "kg"));
        line(&mut out, "Hydration", opt(b.and_then(|b| b.hydration_pct), 1, "%"));
        let t = r.bodycomp_trend.present();
        line(&mut out, "Body fat 30d", opt(t.and_then(|t| t.body_fat_pct_30d), 1, "%"));
        line(&mut out, "Body fat 90d", opt(t.and_then(|t| t.body_fat_pct_90d), 1, "%"));
        line(&mut out, "Lean mass 30d", opt(t.and_then(|t| t.lean_mass_kg_30d), 2, "kg"));
        line(&mut out, "Lean mass 90d", opt(t.and_then(|t| t.lean_mass_kg_90d), 2, "kg"));

        if let Some(s) = r.sleep.present() {
            heading(&mut out, "Sleep");
            line(&mut out, "Duration", opt(s.duration_hours, 1, "h"));
            line(&mut out, "Score", opt(s.score, 0, ""));
            line(&mut out, "Heart rate", opt(s.heart_rate_bpm, 0, "bpm"));
            line(&mut out, "HRV", opt(s.hrv_ms, 0, "ms"));
            line(&mut out, "Respiratory rate", opt(s.respiratory_rate, 1, "brpm"));
        }

        if let Some(workouts) = r.workouts.present() {
            heading(&mut out, "Workouts");
            if workouts.sessions.is_empty() {
                line(&mut out, "Sessions", "none".to_string());
            }
            for s in &workouts.sessions {
                let name = s.workout_name.clone().unwrap_or_else(|| "Session".to_string());
                let detail = s.impression.clone().unwrap_or_else(na);
                line(&mut out, &name, detail);
            }
        }

        out
    }
}

impl Default for RenderService {
    fn default() -> Self {
        Self::new()
    }
}

fn na() -> String {
    "n/a".to_string()
}

fn num(value: f64, decimals: usize, unit: &str) -> String {
    if unit.is_empty() {
        format!("{value:.decimals$}")
    } else {
        format!("{value:.decimals$} {unit}")
    }
}

fn opt(value: Option<f64>, decimals: usize, unit: &str) -> String {
    value.map(|v| num(v, decimals, unit)).unwrap_or_else(na)
}
