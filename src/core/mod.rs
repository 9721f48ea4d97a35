mod engine;
mod error;
mod format;
mod goal;
mod insight;
mod scenario;
mod solver;
mod types;

pub use engine::compute_future_value;
pub use error::PlannerError;
pub use format::{
    contribution_label, format_currency, format_number, frequency_label, result_display,
    result_label,
};
pub use goal::{AppliedGoal, GoalProgress, GoalSetup, GoalStrategy, years_until, years_until_from};
pub use insight::InsightPrompt;
pub use scenario::{MAX_HORIZON_YEARS, Scenario, ScenarioInputs, run_scenario};
pub use solver::{
    solve_required_contribution, solve_required_principal, solve_required_rate,
    solve_required_rate_outcome, solve_required_time, solve_required_time_outcome,
};
pub use types::{CalculationMode, CalculationParams, CalculationResult, SolveOutcome, YearResult};
