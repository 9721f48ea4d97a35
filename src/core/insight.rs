use serde::Serialize;

use super::format::{format_currency, format_number};
use super::types::{CalculationMode, CalculationParams, CalculationResult};

pub const INSIGHT_MODEL: &str = "gemini-2.5-flash";
pub const INSIGHT_TEMPERATURE: f64 = 0.7;

const SYSTEM_INSTRUCTION: &str = "\
You are a savvy, professional, and encouraging financial advisor assistant.
Your goal is to explain investment calculation results clearly and concisely to a user.
Avoid jargon where possible, or explain it if necessary.
Focus on the power of compound interest, the impact of time, the rate of return, and the effects of inflation.
Do not give specific \"buy\" or \"sell\" advice for specific stocks.
Keep the tone educational and empowering.
Structure the response with a friendly opening, key takeaways (bullet points), and a brief conclusion.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightPrompt {
    pub model: &'static str,
    pub temperature: f64,
    pub system_instruction: &'static str,
    pub prompt: String,
}

impl InsightPrompt {
    pub fn build(
        params: &CalculationParams,
        result: &CalculationResult,
        mode: CalculationMode,
        currency: &str,
        goal_name: Option<&str>,
    ) -> Self {
        let goal_name = goal_name.map(str::trim).filter(|name| !name.is_empty());

        let mut context = String::new();
        if let Some(name) = goal_name {
            context.push_str(&format!(
                "The user is specifically planning for a goal named \"{name}\". "
            ));
        }
        context.push_str(mode_context(mode));

        let mut lines = vec![
            format!("Analyze the following investment scenario in {currency}:"),
            context,
            String::new(),
            "Parameters:".to_string(),
            format!(
                "- Initial Principal: {}",
                format_currency(params.principal, currency)
            ),
            format!(
                "- Recurring Contribution: {} per period",
                format_currency(params.contribution, currency)
            ),
            format!("- Annual Rate: {}%", format_number(params.rate, 2)),
            format!("- Time Period: {} years", format_number(params.years, 2)),
            format!("- Frequency: {} times/year", params.compounds_per_year),
            format!("- Inflation Rate: {}%", params.inflation_rate),
            String::new(),
            "Outcomes:".to_string(),
            format!(
                "- Future Value (Nominal): {}",
                format_currency(result.future_value, currency)
            ),
            format!(
                "- Future Value (Real/Adjusted for Inflation): {}",
                format_currency(result.future_value_real, currency)
            ),
            format!(
                "- Total Interest Earned: {}",
                format_currency(result.total_interest, currency)
            ),
            String::new(),
            "Please provide a concise analysis.".to_string(),
        ];
        if let Some(name) = goal_name {
            lines.push(format!("Refer to the goal \"{name}\" in your advice."));
        }
        if let Some(focus) = mode_focus(mode) {
            lines.push(focus.to_string());
        }
        lines.push(
            "Explain the role of compound interest, specifically mentioning the impact of \
             regular contributions if applicable, and how inflation affects the purchasing power."
                .to_string(),
        );

        Self {
            model: INSIGHT_MODEL,
            temperature: INSIGHT_TEMPERATURE,
            system_instruction: SYSTEM_INSTRUCTION,
            prompt: lines.join("\n"),
        }
    }
}

fn mode_context(mode: CalculationMode) -> &'static str {
    match mode {
        CalculationMode::PresentValue => {
            "The user wants to know how much to invest today (Lump Sum) to reach a target future value."
        }
        CalculationMode::Contribution => {
            "The user wants to know how much to contribute regularly to reach a target future value."
        }
        CalculationMode::Rate => {
            "The user wants to find the required interest rate to reach a target goal."
        }
        CalculationMode::Time => {
            "The user wants to know how long it will take to reach a financial goal."
        }
        CalculationMode::FutureValue => {
            "The user is projecting the future value of their current investment."
        }
    }
}

fn mode_focus(mode: CalculationMode) -> Option<&'static str> {
    match mode {
        CalculationMode::Time => Some("Comment specifically on the duration timeframe."),
        CalculationMode::Contribution => {
            Some("Comment on the feasibility of the required contribution amount.")
        }
        CalculationMode::Rate => {
            Some("Comment on the feasibility of finding an investment with this return rate.")
        }
        CalculationMode::FutureValue | CalculationMode::PresentValue => None,
    }
}
