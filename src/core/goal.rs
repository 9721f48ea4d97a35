use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::PlannerError;
use super::types::CalculationMode;

const DAYS_PER_YEAR: f64 = 365.25;
const MILLIS_PER_DAY: f64 = 86_400_000.0;
const MIN_GOAL_YEARS: f64 = 0.1;

pub fn years_until(target_date: &str) -> Result<f64, PlannerError> {
    years_until_from(target_date, Utc::now())
}

pub fn years_until_from(target_date: &str, now: DateTime<Utc>) -> Result<f64, PlannerError> {
    let target = parse_target_date(target_date)?;
    let diff_millis = (target - now).num_milliseconds() as f64;
    let years = diff_millis / MILLIS_PER_DAY / DAYS_PER_YEAR;
    Ok(years.max(MIN_GOAL_YEARS))
}

fn parse_target_date(raw: &str) -> Result<DateTime<Utc>, PlannerError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| PlannerError::InvalidDate(raw.to_string()))
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStrategy {
    #[default]
    #[serde(alias = "CONTRIBUTION")]
    Contribution,
    #[serde(alias = "PRINCIPAL")]
    Principal,
}

impl GoalStrategy {
    pub fn mode(self) -> CalculationMode {
        match self {
            GoalStrategy::Contribution => CalculationMode::Contribution,
            GoalStrategy::Principal => CalculationMode::PresentValue,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoalSetup {
    pub name: String,
    pub target_amount: Option<f64>,
    pub target_date: String,
    pub current_savings: Option<f64>,
    pub planned_contribution: Option<f64>,
    pub strategy: GoalStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedGoal {
    pub name: String,
    pub target_amount: f64,
    pub years: f64,
    pub date: String,
    pub principal: f64,
    pub contribution: f64,
    pub mode: CalculationMode,
}

impl GoalSetup {
    pub fn apply(&self, now: DateTime<Utc>) -> Result<AppliedGoal, PlannerError> {
        let name = self.name.trim();
        let target_amount = self.target_amount.filter(|v| v.is_finite() && *v > 0.0);
        let (Some(target_amount), false, false) =
            (target_amount, name.is_empty(), self.target_date.trim().is_empty())
        else {
            return Err(PlannerError::IncompleteGoal);
        };

        let years = years_until_from(&self.target_date, now)?;
        Ok(AppliedGoal {
            name: name.to_string(),
            target_amount,
            years: (years * 100.0).round() / 100.0,
            date: self.target_date.trim().to_string(),
            principal: self.current_savings.unwrap_or(0.0),
            contribution: self.planned_contribution.unwrap_or(0.0),
            mode: self.strategy.mode(),
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub current_value: f64,
    pub target_value: f64,
    pub percentage: f64,
    pub met: bool,
    pub bar_width: f64,
}

impl GoalProgress {
    pub fn measure(current_value: f64, target_value: f64) -> Option<Self> {
        if target_value <= 0.0 {
            return None;
        }
        let percentage = current_value / target_value * 100.0;
        Some(Self {
            current_value,
            target_value,
            percentage,
            met: current_value >= target_value,
            bar_width: percentage.clamp(0.0, 100.0),
        })
    }
}
