use super::types::{CalculationParams, CalculationResult, YearResult};

/// Lump sum plus an ordinary annuity: contributions land at the end of each period.
pub(crate) fn balance_after(
    principal: f64,
    contribution: f64,
    periodic_rate: f64,
    periods: f64,
) -> f64 {
    if periodic_rate == 0.0 {
        return principal + contribution * periods;
    }
    let factor = compound_factor(periodic_rate, periods);
    principal * factor + contribution * (factor - 1.0) / periodic_rate
}

pub(crate) fn compound_factor(periodic_rate: f64, periods: f64) -> f64 {
    (1.0 + periodic_rate).powf(periods)
}

fn deflate(amount: f64, inflation: f64, years: f64) -> f64 {
    amount / (1.0 + inflation).powf(years)
}

pub fn compute_future_value(params: &CalculationParams) -> CalculationResult {
    let n = params.compounds_per_year as f64;
    let t = params.years;
    let inflation = params.inflation_rate / 100.0;
    let i = if params.rate == 0.0 {
        0.0
    } else {
        params.periodic_rate()
    };
    let periods = params.total_periods();

    let future_value = balance_after(params.principal, params.contribution, i, periods);
    let total_invested = params.principal + params.contribution * periods;
    let total_interest = future_value - total_invested;
    let future_value_real = deflate(future_value, inflation, t);

    let expands = t > 0.0 && t.is_finite();
    let whole_years = if expands { t.ceil() as u64 } else { 0 };
    let mut breakdown = Vec::with_capacity(whole_years as usize + 2);
    breakdown.push(YearResult {
        year: 0.0,
        principal: params.principal,
        interest: 0.0,
        total: params.principal,
        real_value: params.principal,
    });

    for year in 1..=whole_years {
        let year = year as f64;
        let year_periods = n * year;
        let invested = params.principal + params.contribution * year_periods;
        let total = balance_after(params.principal, params.contribution, i, year_periods);
        breakdown.push(YearResult {
            year,
            principal: invested,
            interest: total - invested,
            total,
            real_value: deflate(total, inflation, year),
        });
    }

    if expands && t.fract() != 0.0 {
        if breakdown.last().is_some_and(|last| last.year > t) {
            breakdown.pop();
        }
        breakdown.push(YearResult {
            year: t,
            principal: total_invested,
            interest: total_interest,
            total: future_value,
            real_value: future_value_real,
        });
    }

    CalculationResult {
        future_value,
        total_interest,
        future_value_real,
        breakdown,
    }
}
