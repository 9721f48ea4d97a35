use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ffi::OsString;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    AppliedGoal, CalculationMode, CalculationParams, GoalProgress, GoalSetup, InsightPrompt,
    MAX_HORIZON_YEARS, PlannerError, Scenario, ScenarioInputs, SolveOutcome, YearResult,
    contribution_label, frequency_label, result_display, result_label, run_scenario, years_until,
};

const MAX_COMPOUNDS_PER_YEAR: u32 = 365;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliMode {
    Fv,
    Pv,
    Pmt,
    Rate,
    Time,
}

impl From<CliMode> for CalculationMode {
    fn from(value: CliMode) -> Self {
        match value {
            CliMode::Fv => CalculationMode::FutureValue,
            CliMode::Pv => CalculationMode::PresentValue,
            CliMode::Pmt => CalculationMode::Contribution,
            CliMode::Rate => CalculationMode::Rate,
            CliMode::Time => CalculationMode::Time,
        }
    }
}

impl From<CalculationMode> for CliMode {
    fn from(value: CalculationMode) -> Self {
        match value {
            CalculationMode::FutureValue => CliMode::Fv,
            CalculationMode::PresentValue => CliMode::Pv,
            CalculationMode::Contribution => CliMode::Pmt,
            CalculationMode::Rate => CliMode::Rate,
            CalculationMode::Time => CliMode::Time,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    mode: Option<CalculationMode>,
    principal: Option<f64>,
    contribution: Option<f64>,
    rate: Option<f64>,
    years: Option<f64>,
    #[serde(alias = "target")]
    target_value: Option<f64>,
    #[serde(alias = "compounds")]
    compounds_per_year: Option<u32>,
    #[serde(alias = "inflation")]
    inflation_rate: Option<f64>,
    currency: Option<String>,
    goal_name: Option<String>,
    target_date: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "compound",
    about = "Compound interest planner: project growth or solve for principal, contribution, rate or time"
)]
struct Cli {
    #[arg(
        long,
        value_enum,
        default_value_t = CliMode::Fv,
        help = "Quantity to solve: future value, principal, contribution, rate or time"
    )]
    mode: CliMode,
    #[arg(long, default_value_t = 10000.0, help = "Initial lump sum")]
    principal: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Amount added at the end of every compounding period"
    )]
    contribution: f64,
    #[arg(long, default_value_t = 7.0, help = "Annual nominal rate in percent, e.g. 7")]
    rate: f64,
    #[arg(long, default_value_t = 10.0, help = "Time horizon in years")]
    years: f64,
    #[arg(
        long,
        default_value_t = 20000.0,
        help = "Target future value used by the pv, pmt, rate and time modes"
    )]
    target_value: f64,
    #[arg(long, default_value_t = 12, help = "Compounding periods per year")]
    compounds_per_year: u32,
    #[arg(long, default_value_t = 3.0, help = "Expected annual inflation in percent")]
    inflation_rate: f64,
    #[arg(long, default_value = "$", help = "Display currency symbol")]
    currency: String,
    #[arg(long, help = "Name of the goal being planned for")]
    goal_name: Option<String>,
    #[arg(
        long,
        help = "Goal date (YYYY-MM-DD); replaces --years with the time remaining until then"
    )]
    target_date: Option<String>,
}

#[derive(Debug)]
struct ApiRequest {
    inputs: ScenarioInputs,
    options: ApiOptions,
}

#[derive(Debug, Clone)]
struct ApiOptions {
    currency: String,
    goal_name: Option<String>,
    target_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateResponse {
    mode: CalculationMode,
    result_label: &'static str,
    calculated_value: f64,
    calculated_display: String,
    outcome: SolveOutcome,
    currency: String,
    contribution_label: &'static str,
    frequency_label: Cow<'static, str>,
    params: CalculationParams,
    future_value: f64,
    total_interest: f64,
    future_value_real: f64,
    breakdown: Vec<YearResult>,
    goal_name: Option<String>,
    target_date: Option<String>,
    progress: Option<GoalProgress>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<ApiRequest, PlannerError> {
    if cli.compounds_per_year == 0 || cli.compounds_per_year > MAX_COMPOUNDS_PER_YEAR {
        return Err(PlannerError::InvalidInput {
            field: "compoundsPerYear",
            requirement: "between 1 and 365",
        });
    }

    for (field, value) in [
        ("principal", cli.principal),
        ("contribution", cli.contribution),
        ("rate", cli.rate),
        ("years", cli.years),
        ("targetValue", cli.target_value),
        ("inflationRate", cli.inflation_rate),
    ] {
        if !value.is_finite() {
            return Err(PlannerError::InvalidInput {
                field,
                requirement: "a finite number",
            });
        }
    }

    if cli.rate <= -100.0 {
        return Err(PlannerError::InvalidInput {
            field: "rate",
            requirement: "greater than -100",
        });
    }

    if cli.inflation_rate <= -100.0 {
        return Err(PlannerError::InvalidInput {
            field: "inflationRate",
            requirement: "greater than -100",
        });
    }

    let target_date = cli
        .target_date
        .map(|date| date.trim().to_string())
        .filter(|date| !date.is_empty());
    let years = match target_date.as_deref() {
        Some(date) => years_until(date)?,
        None => cli.years,
    };
    if years > MAX_HORIZON_YEARS {
        return Err(PlannerError::InvalidInput {
            field: "years",
            requirement: "at most 1000",
        });
    }

    let currency = match cli.currency.trim() {
        "" => "$".to_string(),
        symbol => symbol.to_string(),
    };

    Ok(ApiRequest {
        inputs: ScenarioInputs {
            mode: cli.mode.into(),
            principal: cli.principal,
            contribution: cli.contribution,
            rate: cli.rate,
            years,
            target_value: cli.target_value,
            compounds_per_year: cli.compounds_per_year,
            inflation_rate: cli.inflation_rate,
        },
        options: ApiOptions {
            currency,
            goal_name: cli
                .goal_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            target_date,
        },
    })
}

pub fn run_cli<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let request = build_inputs(cli).map_err(|e| e.to_string())?;
    debug!(mode = ?request.inputs.mode, "running scenario from command line");

    let scenario = run_scenario(&request.inputs);
    let response = build_calculate_response(&request, &scenario);
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| format!("Failed to serialize response: {e}"))?;
    println!("{json}");
    Ok(())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .route(
            "/api/insight",
            get(insight_get_handler).post(insight_post_handler),
        )
        .route("/api/goal", post(goal_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "compound HTTP API listening");
    info!("Local access: http://127.0.0.1:{port}/api/calculate");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn calculate_get_handler(Query(payload): Query<CalculatePayload>) -> Response {
    calculate_handler_impl(payload).await
}

async fn calculate_post_handler(Json(payload): Json<CalculatePayload>) -> Response {
    calculate_handler_impl(payload).await
}

async fn calculate_handler_impl(payload: CalculatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => {
            warn!(%err, "rejected calculate request");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    let scenario = run_scenario(&request.inputs);
    debug!(
        mode = ?scenario.mode,
        calculated = scenario.calculated_value,
        "calculated scenario"
    );
    json_response(
        StatusCode::OK,
        build_calculate_response(&request, &scenario),
    )
}

async fn insight_get_handler(Query(payload): Query<CalculatePayload>) -> Response {
    insight_handler_impl(payload).await
}

async fn insight_post_handler(Json(payload): Json<CalculatePayload>) -> Response {
    insight_handler_impl(payload).await
}

async fn insight_handler_impl(payload: CalculatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => {
            warn!(%err, "rejected insight request");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    let scenario = run_scenario(&request.inputs);
    json_response(StatusCode::OK, build_insight_prompt(&request, &scenario))
}

async fn goal_handler(Json(setup): Json<GoalSetup>) -> Response {
    match apply_goal(&setup) {
        Ok(goal) => {
            debug!(name = %goal.name, years = goal.years, "applied goal");
            json_response(StatusCode::OK, goal)
        }
        Err(err) => {
            warn!(%err, "rejected goal");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

fn apply_goal(setup: &GoalSetup) -> Result<AppliedGoal, PlannerError> {
    setup.apply(Utc::now())
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<CalculatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload).map_err(|e| e.to_string())
}

fn api_request_from_payload(payload: CalculatePayload) -> Result<ApiRequest, PlannerError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.mode {
        cli.mode = v.into();
    }
    if let Some(v) = payload.principal {
        cli.principal = v;
    }
    if let Some(v) = payload.contribution {
        cli.contribution = v;
    }
    if let Some(v) = payload.rate {
        cli.rate = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.target_value {
        cli.target_value = v;
    }
    if let Some(v) = payload.compounds_per_year {
        cli.compounds_per_year = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.currency {
        cli.currency = v;
    }
    if let Some(v) = payload.goal_name {
        cli.goal_name = Some(v);
    }
    if let Some(v) = payload.target_date {
        cli.target_date = Some(v);
    }

    build_inputs(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        mode: CliMode::Fv,
        principal: 10_000.0,
        contribution: 0.0,
        rate: 7.0,
        years: 10.0,
        target_value: 20_000.0,
        compounds_per_year: 12,
        inflation_rate: 3.0,
        currency: "$".to_string(),
        goal_name: None,
        target_date: None,
    }
}

fn build_calculate_response(request: &ApiRequest, scenario: &Scenario) -> CalculateResponse {
    let options = &request.options;
    let result = &scenario.result;
    CalculateResponse {
        mode: scenario.mode,
        result_label: result_label(scenario.mode),
        calculated_value: scenario.calculated_value,
        calculated_display: result_display(
            scenario.mode,
            scenario.calculated_value,
            &options.currency,
        ),
        outcome: scenario.outcome,
        currency: options.currency.clone(),
        contribution_label: contribution_label(scenario.params.compounds_per_year),
        frequency_label: frequency_label(scenario.params.compounds_per_year),
        params: scenario.params,
        future_value: result.future_value,
        total_interest: result.total_interest,
        future_value_real: result.future_value_real,
        breakdown: result.breakdown.clone(),
        goal_name: options.goal_name.clone(),
        target_date: options.target_date.clone(),
        progress: GoalProgress::measure(result.future_value, request.inputs.target_value),
    }
}

fn build_insight_prompt(request: &ApiRequest, scenario: &Scenario) -> InsightPrompt {
    InsightPrompt::build(
        &scenario.params,
        &scenario.result,
        scenario.mode,
        &request.options.currency,
        request.options.goal_name.as_deref(),
    )
}
