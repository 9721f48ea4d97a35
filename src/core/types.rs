use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CalculationMode {
    #[serde(rename = "FV", alias = "fv", alias = "futureValue")]
    FutureValue,
    #[serde(rename = "PV", alias = "pv", alias = "presentValue", alias = "principal")]
    PresentValue,
    #[serde(rename = "PMT", alias = "pmt", alias = "contribution")]
    Contribution,
    #[serde(rename = "RATE", alias = "rate")]
    Rate,
    #[serde(rename = "TIME", alias = "time")]
    Time,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationParams {
    pub principal: f64,
    pub rate: f64,
    pub years: f64,
    pub compounds_per_year: u32,
    pub contribution: f64,
    #[serde(default)]
    pub inflation_rate: f64,
}

impl CalculationParams {
    pub fn new(principal: f64, rate: f64, years: f64, compounds_per_year: u32) -> Self {
        Self {
            principal,
            rate,
            years,
            compounds_per_year,
            contribution: 0.0,
            inflation_rate: 0.0,
        }
    }

    pub fn with_contribution(mut self, contribution: f64) -> Self {
        self.contribution = contribution;
        self
    }

    pub fn with_inflation(mut self, inflation_rate: f64) -> Self {
        self.inflation_rate = inflation_rate;
        self
    }

    pub(crate) fn periodic_rate(&self) -> f64 {
        (self.rate / 100.0) / self.compounds_per_year as f64
    }

    pub(crate) fn total_periods(&self) -> f64 {
        self.compounds_per_year as f64 * self.years
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearResult {
    pub year: f64,
    pub principal: f64,
    pub interest: f64,
    pub total: f64,
    pub real_value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub future_value: f64,
    pub total_interest: f64,
    pub future_value_real: f64,
    pub breakdown: Vec<YearResult>,
}

/// Outcome of an inverse solve that can degenerate.
///
/// `AlreadyMet` covers targets the starting balance reaches without growth, `Unreachable`
/// covers targets no non-negative rate or finite horizon can produce.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum SolveOutcome {
    Value(f64),
    AlreadyMet,
    Unreachable,
}

impl SolveOutcome {
    pub fn value_or_zero(self) -> f64 {
        match self {
            SolveOutcome::Value(v) => v,
            SolveOutcome::AlreadyMet | SolveOutcome::Unreachable => 0.0,
        }
    }
}
