use tracing::trace;

use super::engine::{balance_after, compound_factor};
use super::types::SolveOutcome;

const RATE_SEARCH_MIN: f64 = 0.0;
const RATE_SEARCH_MAX: f64 = 10.0;
const RATE_SEARCH_TOLERANCE: f64 = 1e-6;
const RATE_SEARCH_MAX_ITERATIONS: u32 = 100;

pub fn solve_required_principal(
    future_value: f64,
    rate: f64,
    years: f64,
    compounds_per_year: u32,
    contribution: f64,
) -> f64 {
    if years <= 0.0 {
        return future_value;
    }
    let n = compounds_per_year as f64;
    let periods = n * years;
    if rate == 0.0 {
        return future_value - contribution * periods;
    }

    let i = (rate / 100.0) / n;
    let factor = compound_factor(i, periods);
    let annuity = contribution * (factor - 1.0) / i;
    (future_value - annuity) / factor
}

pub fn solve_required_contribution(
    principal: f64,
    future_value: f64,
    rate: f64,
    years: f64,
    compounds_per_year: u32,
) -> f64 {
    if years <= 0.0 {
        return 0.0;
    }
    let n = compounds_per_year as f64;
    let periods = n * years;
    if rate == 0.0 {
        return (future_value - principal) / periods;
    }

    let i = (rate / 100.0) / n;
    let factor = compound_factor(i, periods);
    (future_value - principal * factor) / ((factor - 1.0) / i)
}

/// Annual rate in percent that reaches `future_value`; 0 when met already or unreachable.
pub fn solve_required_rate(
    principal: f64,
    future_value: f64,
    years: f64,
    compounds_per_year: u32,
    contribution: f64,
) -> f64 {
    solve_required_rate_outcome(
        principal,
        future_value,
        years,
        compounds_per_year,
        contribution,
    )
    .value_or_zero()
}

pub fn solve_required_rate_outcome(
    principal: f64,
    future_value: f64,
    years: f64,
    compounds_per_year: u32,
    contribution: f64,
) -> SolveOutcome {
    if years <= 0.0 {
        return SolveOutcome::Unreachable;
    }
    if principal >= future_value && contribution >= 0.0 {
        return SolveOutcome::AlreadyMet;
    }

    let n = compounds_per_year as f64;
    let periods = n * years;

    if contribution == 0.0 {
        if principal <= 0.0 {
            return SolveOutcome::Unreachable;
        }
        let base = (future_value / principal).powf(1.0 / periods);
        return SolveOutcome::Value(n * (base - 1.0) * 100.0);
    }

    let mut lo = RATE_SEARCH_MIN;
    let mut hi = RATE_SEARCH_MAX;
    for _ in 0..RATE_SEARCH_MAX_ITERATIONS {
        let mid = (lo + hi) * 0.5;
        let guess = balance_after(principal, contribution, mid / n, periods);

        if (guess - future_value).abs() < RATE_SEARCH_TOLERANCE {
            return SolveOutcome::Value(mid * 100.0);
        }
        if guess < future_value {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    trace!(lo, hi, future_value, "rate search exhausted iterations");
    SolveOutcome::Value(lo * 100.0)
}

/// Years needed to reach `future_value`; 0 when met already or unreachable.
pub fn solve_required_time(
    principal: f64,
    future_value: f64,
    rate: f64,
    compounds_per_year: u32,
    contribution: f64,
) -> f64 {
    solve_required_time_outcome(
        principal,
        future_value,
        rate,
        compounds_per_year,
        contribution,
    )
    .value_or_zero()
}

pub fn solve_required_time_outcome(
    principal: f64,
    future_value: f64,
    rate: f64,
    compounds_per_year: u32,
    contribution: f64,
) -> SolveOutcome {
    if future_value <= principal && contribution >= 0.0 {
        return SolveOutcome::AlreadyMet;
    }

    let n = compounds_per_year as f64;
    if rate == 0.0 {
        if contribution <= 0.0 {
            return SolveOutcome::Unreachable;
        }
        return SolveOutcome::Value((future_value - principal) / contribution / n);
    }

    let i = (rate / 100.0) / n;
    let target_arg = future_value * i + contribution;
    let start_arg = principal * i + contribution;
    // Both log arguments must stay positive.
    if target_arg <= 0.0 || start_arg <= 0.0 {
        return SolveOutcome::Unreachable;
    }

    let periods = (target_arg / start_arg).ln() / (1.0 + i).ln();
    SolveOutcome::Value(periods / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CalculationParams, compute_future_value};
    use proptest::prelude::{prop_assert, prop_assume, proptest};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn assert_relative(actual: f64, expected: f64, rel: f64) {
        let tol = rel * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, relative tolerance {rel}"
        );
    }

    fn future_value_of(
        principal: f64,
        rate: f64,
        years: f64,
        compounds: u32,
        contribution: f64,
    ) -> f64 {
        compute_future_value(
            &CalculationParams::new(principal, rate, years, compounds).with_contribution(contribution),
        )
        .future_value
    }

    #[test]
    fn required_monthly_contribution_for_retirement_target() {
        // 100000 / (((1.005)^240 - 1) / 0.005) = 216.43
        let pmt = solve_required_contribution(0.0, 100_000.0, 6.0, 20.0, 12);
        assert_close(pmt, 216.43, 0.01);
        assert_close(pmt, 216.35, 1.0);
    }

    #[test]
    fn required_rate_without_contributions_uses_closed_form() {
        // 5^(1/15) - 1 = 11.326%
        let rate = solve_required_rate(10_000.0, 50_000.0, 15.0, 1, 0.0);
        assert_close(rate, 11.326, 0.01);
        assert_close(future_value_of(10_000.0, rate, 15.0, 1, 0.0), 50_000.0, 1e-6);
    }

    #[test]
    fn required_time_is_zero_when_goal_already_met() {
        assert_eq!(solve_required_time(1_000.0, 1_000.0, 5.0, 12, 0.0), 0.0);
        assert_eq!(
            solve_required_time_outcome(1_000.0, 1_000.0, 5.0, 12, 0.0),
            SolveOutcome::AlreadyMet
        );
    }

    #[test]
    fn required_time_without_rate_or_contribution_is_unreachable() {
        assert_eq!(
            solve_required_time_outcome(1_000.0, 2_000.0, 0.0, 12, 0.0),
            SolveOutcome::Unreachable
        );
        assert_eq!(solve_required_time(1_000.0, 2_000.0, 0.0, 12, 0.0), 0.0);
    }

    #[test]
    fn required_time_at_zero_rate_is_linear() {
        // (2200 - 1000) / 100 per month / 12 = 1 year
        let years = solve_required_time(1_000.0, 2_200.0, 0.0, 12, 100.0);
        assert_close(years, 1.0, 1e-12);
    }

    #[test]
    fn required_time_rejects_negative_log_arguments() {
        // Withdrawals larger than the interest earned drain the balance.
        assert_eq!(
            solve_required_time_outcome(1_000.0, 5_000.0, 12.0, 12, -50.0),
            SolveOutcome::Unreachable
        );
    }

    #[test]
    fn required_time_doubles_at_rule_of_72_pace() {
        let years = solve_required_time(1_000.0, 2_000.0, 7.2, 1, 0.0);
        assert_close(years, 10.0, 0.1);
        assert_close(future_value_of(1_000.0, 7.2, years, 1, 0.0), 2_000.0, 1e-6);
    }

    #[test]
    fn required_principal_degenerate_cases() {
        assert_eq!(solve_required_principal(5_000.0, 7.0, 0.0, 12, 100.0), 5_000.0);
        assert_eq!(solve_required_principal(5_000.0, 7.0, -1.0, 12, 100.0), 5_000.0);
        assert_close(
            solve_required_principal(5_000.0, 0.0, 2.0, 12, 100.0),
            5_000.0 - 2_400.0,
            1e-9,
        );
    }

    #[test]
    fn required_contribution_degenerate_cases() {
        assert_eq!(solve_required_contribution(1_000.0, 5_000.0, 7.0, 0.0, 12), 0.0);
        assert_close(
            solve_required_contribution(1_000.0, 3_400.0, 0.0, 2.0, 12),
            100.0,
            1e-9,
        );
    }

    #[test]
    fn required_rate_sentinels_are_distinguishable() {
        assert_eq!(
            solve_required_rate_outcome(5_000.0, 4_000.0, 10.0, 12, 0.0),
            SolveOutcome::AlreadyMet
        );
        assert_eq!(
            solve_required_rate_outcome(0.0, 4_000.0, 10.0, 12, 0.0),
            SolveOutcome::Unreachable
        );
        assert_eq!(
            solve_required_rate_outcome(1_000.0, 4_000.0, 0.0, 12, 10.0),
            SolveOutcome::Unreachable
        );
        assert_eq!(solve_required_rate(5_000.0, 4_000.0, 10.0, 12, 0.0), 0.0);
    }

    #[test]
    fn required_rate_bisection_matches_known_rate() {
        let fv = future_value_of(5_000.0, 8.0, 20.0, 12, 250.0);
        let rate = solve_required_rate(5_000.0, fv, 20.0, 12, 250.0);
        assert_relative(rate, 8.0, 1e-6);
    }

    #[test]
    fn required_rate_bisection_returns_upper_bracket_for_huge_targets() {
        let rate = solve_required_rate(0.0, 1e300, 1.0, 1, 1.0);
        assert_close(rate, 1_000.0, 1e-6);
    }

    #[test]
    fn required_rate_is_zero_percent_when_contributions_alone_suffice() {
        // 1000 + 100 * 12 = 2200 exactly at zero growth.
        let rate = solve_required_rate(1_000.0, 2_200.0, 1.0, 12, 100.0);
        assert_close(rate, 0.0, 1e-4);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_required_principal_round_trips(
            principal in 0u32..500_000,
            contribution in 0u32..3_000,
            rate_bp in 1u32..2_000,
            years in 1u32..40,
            compounds in proptest::sample::select(vec![1u32, 2, 4, 12, 365])
        ) {
            let rate = rate_bp as f64 / 100.0;
            let fv = future_value_of(principal as f64, rate, years as f64, compounds, contribution as f64);
            let solved = solve_required_principal(fv, rate, years as f64, compounds, contribution as f64);
            let tol = 1e-6 * (principal as f64).max(1.0);
            prop_assert!((solved - principal as f64).abs() <= tol, "solved {solved}, expected {principal}");
        }

        #[test]
        fn prop_required_contribution_round_trips(
            principal in 0u32..500_000,
            contribution in 0u32..3_000,
            rate_bp in 1u32..2_000,
            years in 1u32..40,
            compounds in proptest::sample::select(vec![1u32, 2, 4, 12, 365])
        ) {
            let rate = rate_bp as f64 / 100.0;
            let fv = future_value_of(principal as f64, rate, years as f64, compounds, contribution as f64);
            let solved = solve_required_contribution(principal as f64, fv, rate, years as f64, compounds);
            let tol = 1e-6 * (contribution as f64).max(1.0);
            prop_assert!((solved - contribution as f64).abs() <= tol, "solved {solved}, expected {contribution}");
        }

        #[test]
        fn prop_required_time_round_trips(
            principal in 1u32..500_000,
            contribution in 0u32..3_000,
            rate_bp in 1u32..2_000,
            years in 1u32..40,
            compounds in proptest::sample::select(vec![1u32, 4, 12])
        ) {
            let rate = rate_bp as f64 / 100.0;
            let fv = future_value_of(principal as f64, rate, years as f64, compounds, contribution as f64);
            prop_assume!(fv > principal as f64 * (1.0 + 1e-9));
            let solved = solve_required_time(principal as f64, fv, rate, compounds, contribution as f64);
            prop_assert!((solved - years as f64).abs() <= 1e-6 * years as f64, "solved {solved}, expected {years}");
        }

        #[test]
        fn prop_required_rate_round_trips(
            principal in 1_000u32..200_000,
            contribution in 0u32..2_000,
            rate_bp in 100u32..2_000,
            years in 1u32..30,
            compounds in proptest::sample::select(vec![1u32, 4, 12])
        ) {
            let rate = rate_bp as f64 / 100.0;
            let fv = future_value_of(principal as f64, rate, years as f64, compounds, contribution as f64);
            let solved = solve_required_rate(principal as f64, fv, years as f64, compounds, contribution as f64);
            prop_assert!((solved - rate).abs() <= 1e-6 * rate, "solved {solved}, expected {rate}");
        }
    }
}
