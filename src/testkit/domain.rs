//! Builders for domain primitives used across tests.
//!
//! The canonical statement is a balanced lower-middle-market company with
//! $10M revenue and $2M EBITDA, so DCF scenario checks can be done by
//! hand against round numbers.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;

use crate::domain::{
    Amount, BenchmarkStat, BlendedValuation, BuyerProfile, ConfidenceBand, DealProfile,
    FinancialStatement, IndustryBenchmarks, Methodology, PeerMultiple, PeriodId,
    PrecedentTransaction, RatioId, ReferenceSnapshot, RiskAppetite, SizeBand, ValuationResult,
};
use rust_decimal::prelude::ToPrimitive;

/// A clean, balanced statement: $10M revenue, $2M EBITDA.
pub fn statement() -> FinancialStatement {
    FinancialStatement {
        period: PeriodId::new("FY2025"),
        revenue: dec!(10_000_000),
        cost_of_goods_sold: dec!(4_000_000),
        operating_expenses: dec!(4_000_000),
        depreciation_amortization: dec!(800_000),
        interest_expense: dec!(300_000),
        tax_expense: dec!(200_000),
        net_income: dec!(700_000),
        ebitda: dec!(2_000_000),
        cash_and_equivalents: dec!(1_500_000),
        accounts_receivable: dec!(1_200_000),
        inventory: dec!(800_000),
        current_assets: dec!(4_000_000),
        total_assets: dec!(12_000_000),
        current_liabilities: dec!(2_000_000),
        total_liabilities: dec!(7_000_000),
        total_equity: dec!(5_000_000),
        operating_cash_flow: dec!(1_800_000),
        capital_expenditure: dec!(500_000),
    }
}

/// A lower-middle-market SaaS deal matching [`statement`].
pub fn deal_profile(id: &str) -> DealProfile {
    DealProfile {
        id: id.into(),
        industry: "b2b-saas".to_string(),
        size_band: SizeBand::LowerMiddle,
        geography: "us-west".to_string(),
        strategic_tags: vec!["recurring-revenue".to_string()],
        health_score: 72.0,
        annual_revenue: dec!(10_000_000),
        ebitda: dec!(2_000_000),
        asking_price: None,
        listed_at: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
        data_completeness: 0.9,
    }
}

/// A balanced-appetite mandate targeting [`deal_profile`]-shaped deals.
pub fn buyer_profile(id: &str) -> BuyerProfile {
    BuyerProfile {
        id: id.into(),
        target_industries: vec!["b2b-saas".to_string()],
        size_band_min: SizeBand::Small,
        size_band_max: SizeBand::Middle,
        geographies: vec!["us-west".to_string()],
        strategic_tags: vec!["recurring-revenue".to_string()],
        risk_appetite: RiskAppetite::Balanced,
        capital_limit: dec!(5_000_000),
    }
}

/// A qualifying peer multiple in the deal's industry and band.
pub fn peer(company: &str, ev_to_ebitda: f64) -> PeerMultiple {
    PeerMultiple {
        company: company.to_string(),
        industry: "b2b-saas".to_string(),
        size_band: SizeBand::LowerMiddle,
        ev_to_ebitda,
    }
}

/// A qualifying precedent transaction closed at `closed_at`.
pub fn transaction(ev_to_ebitda: f64, closed_at: DateTime<Utc>) -> PrecedentTransaction {
    PrecedentTransaction {
        target_industry: "b2b-saas".to_string(),
        size_band: SizeBand::LowerMiddle,
        ev_to_ebitda,
        closed_at,
    }
}

/// Benchmarks for the canonical industry.
pub fn benchmarks() -> IndustryBenchmarks {
    let stats = [
        (RatioId::CurrentRatio, 1.8, 0.5),
        (RatioId::QuickRatio, 1.3, 0.4),
        (RatioId::GrossMargin, 0.55, 0.15),
        (RatioId::OperatingMargin, 0.10, 0.06),
        (RatioId::NetMargin, 0.08, 0.05),
        (RatioId::ReturnOnAssets, 0.06, 0.04),
        (RatioId::ReturnOnEquity, 0.12, 0.08),
        (RatioId::DebtToEquity, 1.2, 0.6),
        (RatioId::InterestCoverage, 5.0, 3.0),
        (RatioId::AssetTurnover, 0.9, 0.4),
        (RatioId::OperatingCashFlowMargin, 0.14, 0.07),
        (RatioId::NetDebtToEbitda, 2.5, 1.2),
    ]
    .into_iter()
    .map(|(id, mean, std_dev)| (id, BenchmarkStat { mean, std_dev }))
    .collect();

    IndustryBenchmarks {
        industry: "b2b-saas".to_string(),
        stats,
    }
}

/// A full reference snapshot: benchmarks, six peers, four transactions.
pub fn reference_snapshot() -> ReferenceSnapshot {
    ReferenceSnapshot {
        benchmarks: benchmarks(),
        peer_multiples: vec![
            peer("atlas-soft", 6.0),
            peer("beacon-systems", 6.5),
            peer("cobalt-labs", 7.0),
            peer("dunes-tech", 7.5),
            peer("ember-cloud", 8.0),
            peer("fjord-data", 8.5),
        ],
        precedent_transactions: vec![
            transaction(8.0, Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap()),
            transaction(6.8, Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap()),
            transaction(7.2, Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()),
            transaction(6.5, Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()),
        ],
    }
}

/// A single-methodology blended valuation at `target` with a +/-10% band.
pub fn blended_valuation(target: Amount) -> BlendedValuation {
    let band = ConfidenceBand {
        low: target * dec!(0.9),
        high: target * dec!(1.1),
    };
    let std_dev = target.to_f64().unwrap_or(0.0) * 0.08;
    let result = ValuationResult {
        methodology: Methodology::DiscountedCashFlow,
        point_estimate: target,
        band,
        std_dev,
        assumptions: vec![],
        sample: None,
    };
    BlendedValuation {
        point_estimate: target,
        band,
        std_dev,
        weights: vec![(Methodology::DiscountedCashFlow, 1.0)],
        contributions: vec![result],
        degraded: vec![],
    }
}
