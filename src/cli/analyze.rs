//! `dealforge analyze` - ratio set and health score for one statement.

use tabled::{Table, Tabled};

use crate::application::analyzer;
use crate::cli::{load_config, load_json, output, AnalyzeArgs};
use crate::domain::{FinancialStatement, IndustryBenchmarks, RatioValue};
use crate::error::Result;

#[derive(Tabled)]
struct RatioRow {
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Ratio")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Run the analyze command.
pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let statement: FinancialStatement = load_json(&args.statement)?;

    let report = analyzer::compute_ratios(&statement, &config.analyzer);

    output::section(&format!("Ratios for {}", statement.period));
    let rows: Vec<RatioRow> = report
        .ratio_set
        .iter()
        .map(|(id, value)| RatioRow {
            category: id.category().label(),
            name: id.name(),
            value: match value {
                RatioValue::Defined(v) => format!("{v:.4}"),
                RatioValue::Undefined => "undefined".to_string(),
            },
        })
        .collect();
    output::table(&Table::new(rows).to_string());

    output::section("Data quality");
    if report.has_issues() {
        for issue in &report.issues {
            output::warn(&issue.to_string());
        }
        output::key_value("Confidence", "low");
    } else {
        output::ok("statement passed completeness and balance checks");
        output::key_value("Confidence", "high");
    }
    output::key_value(
        "Defined ratios",
        format!(
            "{} of {}",
            report.ratio_set.defined_count(),
            crate::domain::RatioId::ALL.len()
        ),
    );

    if let Some(benchmarks_path) = &args.benchmarks {
        let benchmarks: IndustryBenchmarks = load_json(benchmarks_path)?;
        let health = analyzer::health_score(
            &report.ratio_set,
            &benchmarks,
            &config.analyzer.health_weights,
        );

        output::section(&format!("Health vs {} benchmarks", benchmarks.industry));
        output::key_value("Health score", format!("{:.1} / 100", health.score));
        output::key_value("Benchmarked ratios", health.ratios_used);
        if !health.is_representative(config.analyzer.min_health_ratios) {
            output::warn("too few benchmarked ratios for a representative score");
        }
    }

    Ok(())
}
