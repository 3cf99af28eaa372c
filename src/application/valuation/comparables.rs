//! Comparable companies methodology.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::{
    Assumption, ConfidenceBand, DealProfile, FinancialStatement, Methodology, MethodologyOutcome,
    PeerMultiple, ValuationResult,
};

use super::config::ComparablesConfig;

/// Z-value spanning the central 80% of a normal distribution; used to
/// turn multiple dispersion into a P10/P90-style band.
const BAND_Z: f64 = 1.2816;

/// Run the comparables methodology.
///
/// Selects peers by industry and size band, derives a trimmed-mean
/// EV/EBITDA multiple, and applies it to the target's EBITDA. Degrades to
/// unavailable when the peer set is too small or the target has no
/// positive EBITDA.
#[must_use]
pub fn run(
    deal: &DealProfile,
    statement: &FinancialStatement,
    peers: &[PeerMultiple],
    config: &ComparablesConfig,
) -> MethodologyOutcome {
    let ebitda = match statement.ebitda.to_f64() {
        Some(v) if v > 0.0 => v,
        _ => {
            return unavailable("target has no positive EBITDA to apply a multiple to");
        }
    };

    let mut multiples: Vec<f64> = peers
        .iter()
        .filter(|p| {
            p.industry.eq_ignore_ascii_case(&deal.industry)
                && p.size_band.distance(&deal.size_band) <= config.size_band_tolerance
        })
        .map(|p| p.ev_to_ebitda)
        .filter(|m| m.is_finite() && *m > 0.0)
        .collect();

    if multiples.len() < config.min_peers {
        return unavailable(&format!(
            "{} qualifying peers, minimum is {}",
            multiples.len(),
            config.min_peers
        ));
    }

    multiples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let trim = (multiples.len() as f64 * config.trim_fraction).floor() as usize;
    let kept = &multiples[trim..multiples.len() - trim];

    let mean = kept.iter().sum::<f64>() / kept.len() as f64;
    let variance = kept.iter().map(|m| (m - mean) * (m - mean)).sum::<f64>() / kept.len() as f64;
    let std_dev_multiple = variance.sqrt();

    let estimate = mean * ebitda;
    let spread = BAND_Z * std_dev_multiple * ebitda;

    MethodologyOutcome::Available(ValuationResult {
        methodology: Methodology::Comparables,
        point_estimate: to_amount(estimate),
        band: ConfidenceBand {
            low: to_amount((estimate - spread).max(0.0)),
            high: to_amount(estimate + spread),
        },
        std_dev: std_dev_multiple * ebitda,
        assumptions: vec![
            Assumption::new("ev_to_ebitda_multiple", mean),
            Assumption::new("peer_count", kept.len() as f64),
            Assumption::new("trim_fraction", config.trim_fraction),
        ],
        sample: None,
    })
}

fn unavailable(reason: &str) -> MethodologyOutcome {
    MethodologyOutcome::Unavailable {
        methodology: Methodology::Comparables,
        reason: reason.to_string(),
    }
}

fn to_amount(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{deal_profile, peer, statement};

    #[test]
    fn trimmed_mean_multiple_applied_to_ebitda() {
        let deal = deal_profile("deal-1");
        let s = statement();
        // One outlier at 30x that the trim should drop.
        let peers = vec![
            peer("p1", 5.0),
            peer("p2", 6.0),
            peer("p3", 6.5),
            peer("p4", 7.0),
            peer("p5", 7.5),
            peer("p6", 8.0),
            peer("p7", 8.5),
            peer("p8", 9.0),
            peer("p9", 9.5),
            peer("p10", 30.0),
        ];

        let outcome = run(&deal, &s, &peers, &ComparablesConfig::default());
        let result = match outcome {
            MethodologyOutcome::Available(r) => r,
            MethodologyOutcome::Unavailable { reason, .. } => panic!("unavailable: {reason}"),
        };

        // 10% trim drops one from each tail: mean of 6.0..=9.5 is 7.75.
        let expected = 7.75 * 2_000_000.0;
        let got = result.point_estimate.to_f64().unwrap();
        assert!((got - expected).abs() < 1.0, "got {got}, expected {expected}");
        assert!(result.band.low < result.point_estimate);
        assert!(result.band.high > result.point_estimate);
    }

    #[test]
    fn too_few_peers_degrades_to_unavailable() {
        let deal = deal_profile("deal-1");
        let s = statement();
        let peers = vec![peer("p1", 6.0), peer("p2", 7.0)];

        match run(&deal, &s, &peers, &ComparablesConfig::default()) {
            MethodologyOutcome::Unavailable { reason, .. } => {
                assert!(reason.contains("2 qualifying peers"));
            }
            MethodologyOutcome::Available(_) => panic!("expected unavailable"),
        }
    }

    #[test]
    fn wrong_industry_peers_do_not_qualify() {
        let deal = deal_profile("deal-1");
        let s = statement();
        let mut peers: Vec<PeerMultiple> =
            (0..6).map(|i| peer(&format!("p{i}"), 7.0)).collect();
        for p in &mut peers {
            p.industry = "mining".to_string();
        }

        assert!(matches!(
            run(&deal, &s, &peers, &ComparablesConfig::default()),
            MethodologyOutcome::Unavailable { .. }
        ));
    }
}
