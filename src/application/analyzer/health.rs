//! Health-score composition from benchmarked z-scores.

use std::collections::BTreeMap;

use crate::domain::{
    HealthComponent, HealthScore, IndustryBenchmarks, RatioId, RatioSet,
};

use super::formulas;

/// Z-scores are clamped to this many sigmas before scaling.
const Z_CLAMP: f64 = 3.0;

/// Compose the weighted health score for a ratio set.
///
/// Each weighted ratio that is defined and benchmarked contributes a
/// z-score against its industry distribution, oriented so that healthier
/// is always positive, clamped to +/-3 sigma, and mapped onto a 0-100
/// scale (50 = at benchmark). Weights renormalize over the ratios that
/// actually contributed, so missing benchmarks shift emphasis instead of
/// dragging the score toward zero.
#[must_use]
pub fn health_score(
    ratios: &RatioSet,
    benchmarks: &IndustryBenchmarks,
    weights: &BTreeMap<RatioId, f64>,
) -> HealthScore {
    let mut usable: Vec<(RatioId, f64, f64)> = Vec::new();

    for (&ratio, &weight) in weights {
        if weight <= 0.0 {
            continue;
        }
        let Some(value) = ratios.get(ratio).value() else {
            continue;
        };
        let Some(stat) = benchmarks.stat(ratio) else {
            continue;
        };
        if stat.std_dev <= 0.0 {
            continue;
        }

        let mut z = (value - stat.mean) / stat.std_dev;
        if !formulas::higher_is_better(ratio) {
            z = -z;
        }
        usable.push((ratio, weight, z.clamp(-Z_CLAMP, Z_CLAMP)));
    }

    let weight_sum: f64 = usable.iter().map(|(_, w, _)| w).sum();
    if weight_sum == 0.0 {
        return HealthScore {
            score: 0.0,
            components: Vec::new(),
            ratios_used: 0,
        };
    }

    let mut score = 0.0;
    let components: Vec<HealthComponent> = usable
        .iter()
        .map(|&(ratio, weight, z)| {
            let normalized_weight = weight / weight_sum;
            let scaled = 50.0 + z * (50.0 / Z_CLAMP);
            let contribution = normalized_weight * scaled;
            score += contribution;
            HealthComponent {
                ratio,
                z_score: z,
                weight: normalized_weight,
                contribution,
            }
        })
        .collect();

    HealthScore {
        score,
        ratios_used: components.len(),
        components,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::analyzer::{compute_ratios, AnalyzerConfig};
    use crate::domain::BenchmarkStat;
    use crate::testkit::domain::statement;

    fn benchmarks_at(mean_of: impl Fn(RatioId) -> f64) -> IndustryBenchmarks {
        let stats = [
            RatioId::CurrentRatio,
            RatioId::NetMargin,
            RatioId::ReturnOnEquity,
            RatioId::DebtToEquity,
            RatioId::AssetTurnover,
            RatioId::GrossMargin,
        ]
        .into_iter()
        .map(|id| {
            (
                id,
                BenchmarkStat {
                    mean: mean_of(id),
                    std_dev: 0.5,
                },
            )
        })
        .collect();
        IndustryBenchmarks {
            industry: "b2b-saas".to_string(),
            stats,
        }
    }

    #[test]
    fn at_benchmark_scores_fifty() {
        let config = AnalyzerConfig::default();
        let report = compute_ratios(&statement(), &config);
        let set = report.ratio_set;

        // Benchmarks equal to the target's own ratios: every z is zero.
        let benchmarks = benchmarks_at(|id| set.get(id).value().unwrap());
        let health = health_score(&set, &benchmarks, &config.health_weights);

        assert!((health.score - 50.0).abs() < 1e-9);
        assert!(health.ratios_used >= 4);
    }

    #[test]
    fn component_weights_renormalize_to_one() {
        let config = AnalyzerConfig::default();
        let report = compute_ratios(&statement(), &config);
        let benchmarks = benchmarks_at(|_| 1.0);
        let health = health_score(&report.ratio_set, &benchmarks, &config.health_weights);

        let total: f64 = health.components.iter().map(|c| c.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn no_benchmarks_scores_zero_with_no_components() {
        let config = AnalyzerConfig::default();
        let report = compute_ratios(&statement(), &config);
        let empty = IndustryBenchmarks {
            industry: "unknown".to_string(),
            stats: Default::default(),
        };
        let health = health_score(&report.ratio_set, &empty, &config.health_weights);
        assert_eq!(health.ratios_used, 0);
        assert_eq!(health.score, 0.0);
    }
}
