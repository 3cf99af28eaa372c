//! Discounted cash flow methodology.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::{
    Assumption, ConfidenceBand, FinancialStatement, Methodology, MethodologyOutcome, SampleInfo,
    ValuationResult,
};

use super::config::DcfConfig;
use super::simulation::{self, CancellationFlag, InputSamplers};

/// Floor on the spread between discount and terminal growth rates, so a
/// low draw cannot send the terminal value to infinity.
const MIN_TERMINAL_SPREAD: f64 = 0.01;

/// Net present value of the projected cash flows for one set of drawn
/// inputs.
///
/// Cash flow in year t is `revenue * (1 + growth)^t * margin`; the
/// terminal value is a Gordon growth perpetuity on the final year's cash
/// flow.
fn project_npv(
    base_revenue: f64,
    horizon_years: u32,
    terminal_growth: f64,
    growth: f64,
    discount: f64,
    margin: f64,
) -> f64 {
    let margin = margin.max(0.0);
    let discount = discount.max(terminal_growth + MIN_TERMINAL_SPREAD);

    let mut npv = 0.0;
    let mut cash_flow = base_revenue * margin;
    let mut discount_factor = 1.0;
    for _ in 0..horizon_years {
        cash_flow *= 1.0 + growth;
        discount_factor *= 1.0 + discount;
        npv += cash_flow / discount_factor;
    }

    let terminal = cash_flow * (1.0 + terminal_growth) / (discount - terminal_growth);
    npv + terminal / discount_factor
}

/// Closed-form NPV at the distribution means, with zero variance.
///
/// Exposed for bound checks against the simulated estimate.
#[must_use]
pub fn deterministic_npv(statement: &FinancialStatement, config: &DcfConfig) -> f64 {
    let base_revenue = statement.revenue.to_f64().unwrap_or(0.0);
    project_npv(
        base_revenue,
        config.horizon_years,
        config.terminal_growth,
        config.growth.mean(),
        config.discount.mean(),
        config.margin.mean(),
    )
}

/// Run the DCF methodology: Monte Carlo over growth, discount, and margin.
///
/// CPU-bound; intended to be called from a blocking context. Cancellation
/// yields a partial, incomplete-tagged result; an immediately-cancelled
/// run (zero samples) degrades to unavailable.
#[must_use]
pub fn run(
    statement: &FinancialStatement,
    config: &DcfConfig,
    cancel: &CancellationFlag,
) -> MethodologyOutcome {
    let base_revenue = match statement.revenue.to_f64() {
        Some(v) if v > 0.0 => v,
        _ => {
            return MethodologyOutcome::Unavailable {
                methodology: Methodology::DiscountedCashFlow,
                reason: "statement has no positive revenue to project".to_string(),
            }
        }
    };

    let samplers = match build_samplers(config) {
        Ok(s) => s,
        Err(reason) => {
            return MethodologyOutcome::Unavailable {
                methodology: Methodology::DiscountedCashFlow,
                reason,
            }
        }
    };

    let horizon = config.horizon_years;
    let terminal_growth = config.terminal_growth;
    let summary = simulation::run(
        config.iterations,
        config.seed,
        samplers,
        config.percentile_low,
        config.percentile_high,
        cancel,
        |growth, discount, margin| {
            project_npv(base_revenue, horizon, terminal_growth, growth, discount, margin)
        },
    );

    if summary.iterations_run == 0 {
        return MethodologyOutcome::Unavailable {
            methodology: Methodology::DiscountedCashFlow,
            reason: "simulation cancelled before any iterations completed".to_string(),
        };
    }

    MethodologyOutcome::Available(ValuationResult {
        methodology: Methodology::DiscountedCashFlow,
        point_estimate: to_amount(summary.median),
        band: ConfidenceBand {
            low: to_amount(summary.p_low),
            high: to_amount(summary.p_high),
        },
        std_dev: summary.std_dev,
        assumptions: vec![
            Assumption::new("horizon_years", f64::from(horizon)),
            Assumption::new("growth_mean", config.growth.mean()),
            Assumption::new("discount_mean", config.discount.mean()),
            Assumption::new("margin_mean", config.margin.mean()),
            Assumption::new("terminal_growth", terminal_growth),
        ],
        sample: Some(SampleInfo {
            iterations_requested: summary.iterations_requested,
            iterations_run: summary.iterations_run,
            complete: summary.complete,
        }),
    })
}

fn build_samplers(config: &DcfConfig) -> Result<InputSamplers, String> {
    Ok(InputSamplers {
        growth: config.growth.sampler("growth").map_err(|e| e.to_string())?,
        discount: config
            .discount
            .sampler("discount")
            .map_err(|e| e.to_string())?,
        margin: config.margin.sampler("margin").map_err(|e| e.to_string())?,
    })
}

fn to_amount(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::valuation::config::DistributionConfig;
    use crate::testkit::domain::statement;

    fn zero_variance_config() -> DcfConfig {
        DcfConfig {
            growth: DistributionConfig::Normal {
                mean: 0.03,
                std_dev: 0.0,
            },
            discount: DistributionConfig::Normal {
                mean: 0.10,
                std_dev: 0.0,
            },
            margin: DistributionConfig::Normal {
                mean: 0.20,
                std_dev: 0.0,
            },
            terminal_growth: 0.02,
            iterations: 200,
            ..DcfConfig::default()
        }
    }

    #[test]
    fn zero_variance_simulation_matches_closed_form() {
        let s = statement();
        let config = zero_variance_config();
        let analytic = deterministic_npv(&s, &config);

        let outcome = run(&s, &config, &CancellationFlag::new());
        let result = match outcome {
            MethodologyOutcome::Available(r) => r,
            MethodologyOutcome::Unavailable { reason, .. } => panic!("unavailable: {reason}"),
        };

        let simulated = result.point_estimate.to_f64().unwrap();
        assert!(
            (simulated - analytic).abs() / analytic < 1e-9,
            "simulated {simulated} vs analytic {analytic}"
        );
        assert!(result.sample.unwrap().complete);
    }

    #[test]
    fn analytic_npv_for_reference_scenario() {
        // Revenue 10M, margin 20% => 2M cash flow, growth 3%, discount 10%,
        // 5-year horizon, 2% terminal growth.
        let s = statement();
        let config = zero_variance_config();
        let npv = deterministic_npv(&s, &config);

        // Hand-computed: sum of discounted cash flows plus terminal value.
        let mut expected = 0.0;
        let mut cf = 2_000_000.0;
        let mut df = 1.0;
        for _ in 0..5 {
            cf *= 1.03;
            df *= 1.10;
            expected += cf / df;
        }
        expected += cf * 1.02 / (0.10 - 0.02) / df;

        assert!((npv - expected).abs() < 1e-6);
    }

    #[test]
    fn no_revenue_degrades_to_unavailable() {
        let mut s = statement();
        s.revenue = Decimal::ZERO;
        let outcome = run(&s, &DcfConfig::default(), &CancellationFlag::new());
        assert!(matches!(
            outcome,
            MethodologyOutcome::Unavailable {
                methodology: Methodology::DiscountedCashFlow,
                ..
            }
        ));
    }
}
