use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::CoreError;

/// Everything the report engine needs that is not fetched per request.
///
/// Loaded once at startup and handed to the engine; nothing inside the
/// derivation reads the process environment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default)]
    pub source: SourceSettings,

    #[serde(default)]
    pub profile: ProfileSettings,

    #[serde(default)]
    pub categories: CategoryIds,
}

/// Connection details of the time-series store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    pub base_url: String,
    pub token: String,
    /// Per-call network timeout
    pub timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://localhost".to_string(),
            token: String::new(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

/// Static physiological profile used by the BMR/TDEE formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSettings {
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: Sex,
    /// TDEE multiplier applied to BMR
    pub activity_factor: f64,
    /// Daily calorie goal used for "remaining" and net-vs-goal
    pub calorie_goal: f64,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            height_cm: 172.0,
            age_years: 44,
            sex: Sex::Male,
            activity_factor: 1.55,
            calorie_goal: 1500.0,
        }
    }
}

/// Upstream category ids the engine reads by id rather than by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryIds {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    pub exercise: u32,
    #[serde(default)]
    pub body_fat: Option<u32>,
    #[serde(default)]
    pub muscle_mass: Option<u32>,
    #[serde(default)]
    pub bone_mass: Option<u32>,
    #[serde(default)]
    pub hydration: Option<u32>,
}

impl Default for CategoryIds {
    fn default() -> Self {
        Self {
            calories: 18,
            protein: 19,
            carbs: 20,
            fat: 21,
            exercise: 22,
            body_fat: None,
            muscle_mass: None,
            bone_mass: None,
            hydration: None,
        }
    }
}

impl CategoryIds {
    /// The five nutrition category ids, in calories/protein/carbs/fat/exercise order.
    pub fn nutrition(&self) -> [u32; 5] {
        [self.calories, self.protein, self.carbs, self.fat, self.exercise]
    }
}

impl ReportSettings {
    /// Load settings hierarchically:
    /// 1. Defaults
    /// 2. Optional TOML file
    /// 3. Environment variables with the `HEALTH` prefix and `__` separator
    ///    (e.g. `HEALTH__SOURCE__TOKEN`)
    /// 4. The flat `WGER_BASE_URL` / `WGER_TOKEN` variables, when set
    ///
    /// The result is validated before it is returned.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&ReportSettings::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("HEALTH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: ReportSettings = config.try_deserialize()?;

        if let Ok(url) = std::env::var("WGER_BASE_URL") {
            if !url.is_empty() {
                settings.source.base_url = url;
            }
        }
        if let Ok(token) = std::env::var("WGER_TOKEN") {
            if !token.is_empty() {
                settings.source.token = token;
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the engine cannot run with. Runs before any fetch.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.source.base_url.trim().is_empty() {
            return Err(CoreError::Configuration("source base URL is not set".into()));
        }
        if self.source.token.trim().is_empty() {
            return Err(CoreError::Configuration("source access token is not set".into()));
        }
        if !is_positive(self.profile.activity_factor) {
            return Err(CoreError::Configuration(format!(
                "activity factor must be positive, got {}",
                self.profile.activity_factor
            )));
        }
        if !is_positive(self.profile.height_cm) {
            return Err(CoreError::Configuration(format!(
                "height must be positive, got {}",
                self.profile.height_cm
            )));
        }
        if self.profile.age_years == 0 {
            return Err(CoreError::Configuration("age must be positive".into()));
        }
        Ok(())
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
