use std::borrow::Cow;

use super::types::CalculationMode;

pub fn format_number(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    let rounds_to_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !rounds_to_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

// `-€12.00`: the sign goes before the symbol.
pub fn format_currency(value: f64, symbol: &str) -> String {
    let formatted = format_number(value, 2);
    match formatted.strip_prefix('-') {
        Some(magnitude) => format!("-{symbol}{magnitude}"),
        None => format!("{symbol}{formatted}"),
    }
}

pub fn result_label(mode: CalculationMode) -> &'static str {
    match mode {
        CalculationMode::FutureValue => "Future Value",
        CalculationMode::PresentValue => "Required Start Principal",
        CalculationMode::Contribution => "Required Contribution",
        CalculationMode::Rate => "Required Annual Rate",
        CalculationMode::Time => "Time Required",
    }
}

pub fn result_display(mode: CalculationMode, value: f64, currency: &str) -> String {
    match mode {
        CalculationMode::Rate => format!("{}%", format_number(value, 2)),
        CalculationMode::Time => format!("{} Years", format_number(value, 2)),
        CalculationMode::FutureValue
        | CalculationMode::PresentValue
        | CalculationMode::Contribution => format_currency(value, currency),
    }
}

pub fn contribution_label(compounds_per_year: u32) -> &'static str {
    match compounds_per_year {
        12 => "Monthly Contribution",
        1 => "Annual Contribution",
        4 => "Quarterly Contribution",
        _ => "Recurring Contribution",
    }
}

pub fn frequency_label(compounds_per_year: u32) -> Cow<'static, str> {
    match compounds_per_year {
        1 => Cow::Borrowed("Annually (1x/yr)"),
        2 => Cow::Borrowed("Semiannually (2x/yr)"),
        4 => Cow::Borrowed("Quarterly (4x/yr)"),
        12 => Cow::Borrowed("Monthly (12x/yr)"),
        365 => Cow::Borrowed("Daily (365x/yr)"),
        n => Cow::Owned(format!("{n} times/year")),
    }
}
