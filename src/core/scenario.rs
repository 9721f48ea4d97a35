use super::engine::compute_future_value;
use super::solver::{
    solve_required_contribution, solve_required_principal, solve_required_rate_outcome,
    solve_required_time_outcome,
};
use super::types::{CalculationMode, CalculationParams, CalculationResult, SolveOutcome};

pub const MAX_HORIZON_YEARS: f64 = 1_000.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScenarioInputs {
    pub mode: CalculationMode,
    pub principal: f64,
    pub contribution: f64,
    pub rate: f64,
    pub years: f64,
    pub target_value: f64,
    pub compounds_per_year: u32,
    pub inflation_rate: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub mode: CalculationMode,
    pub params: CalculationParams,
    pub calculated_value: f64,
    pub outcome: SolveOutcome,
    pub result: CalculationResult,
}

pub fn run_scenario(inputs: &ScenarioInputs) -> Scenario {
    let mut params = CalculationParams {
        principal: inputs.principal,
        rate: inputs.rate,
        years: inputs.years,
        compounds_per_year: inputs.compounds_per_year,
        contribution: inputs.contribution,
        inflation_rate: inputs.inflation_rate,
    };

    let outcome = match inputs.mode {
        CalculationMode::FutureValue => {
            SolveOutcome::Value(compute_future_value(&params).future_value)
        }
        CalculationMode::PresentValue => {
            let principal = solve_required_principal(
                inputs.target_value,
                inputs.rate,
                inputs.years,
                inputs.compounds_per_year,
                inputs.contribution,
            );
            params.principal = principal;
            SolveOutcome::Value(principal)
        }
        CalculationMode::Contribution => {
            let contribution = solve_required_contribution(
                inputs.principal,
                inputs.target_value,
                inputs.rate,
                inputs.years,
                inputs.compounds_per_year,
            );
            params.contribution = contribution;
            SolveOutcome::Value(contribution)
        }
        CalculationMode::Rate => {
            let outcome = solve_required_rate_outcome(
                inputs.principal,
                inputs.target_value,
                inputs.years,
                inputs.compounds_per_year,
                inputs.contribution,
            );
            params.rate = outcome.value_or_zero();
            outcome
        }
        CalculationMode::Time => {
            let outcome = match solve_required_time_outcome(
                inputs.principal,
                inputs.target_value,
                inputs.rate,
                inputs.compounds_per_year,
                inputs.contribution,
            ) {
                SolveOutcome::Value(years)
                    if !years.is_finite() || years > MAX_HORIZON_YEARS =>
                {
                    SolveOutcome::Unreachable
                }
                outcome => outcome,
            };
            params.years = outcome.value_or_zero();
            outcome
        }
    };

    let result = compute_future_value(&params);
    Scenario {
        mode: inputs.mode,
        params,
        calculated_value: outcome.value_or_zero(),
        outcome,
        result,
    }
}
