//! `dealforge valuate` - blended multi-methodology valuation.

use tabled::{Table, Tabled};

use crate::application::valuation::{CancellationFlag, ValuationEngine};
use crate::cli::{load_config, load_json, output, ValuateArgs};
use crate::domain::{DealProfile, FinancialStatement, ReferenceSnapshot};
use crate::error::Result;

#[derive(Tabled)]
struct MethodologyRow {
    #[tabled(rename = "Methodology")]
    name: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Point")]
    point: String,
    #[tabled(rename = "Low")]
    low: String,
    #[tabled(rename = "High")]
    high: String,
}

/// Run the valuate command.
pub async fn run(args: &ValuateArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;
    if let Some(iterations) = args.iterations {
        config.valuation.dcf.iterations = iterations;
    }
    if let Some(seed) = args.seed {
        config.valuation.dcf.seed = seed;
    }

    let deal: DealProfile = load_json(&args.deal)?;
    let statement: FinancialStatement = load_json(&args.statement)?;
    let reference: ReferenceSnapshot = load_json(&args.reference)?;

    let engine = ValuationEngine::new(config.valuation)?;
    let blended = engine
        .valuate(&deal, &statement, &reference, &CancellationFlag::new())
        .await?;

    output::section(&format!("Valuation for {}", deal.id));
    let rows: Vec<MethodologyRow> = blended
        .contributions
        .iter()
        .map(|result| MethodologyRow {
            name: result.methodology.label().to_string(),
            weight: format!("{:.3}", blended.weight_of(result.methodology)),
            point: format!("{:.0}", result.point_estimate),
            low: format!("{:.0}", result.band.low),
            high: format!("{:.0}", result.band.high),
        })
        .collect();
    output::table(&Table::new(rows).to_string());

    for (methodology, reason) in &blended.degraded {
        output::warn(&format!("{methodology} unavailable: {reason}"));
    }

    output::section("Blended estimate");
    output::key_value("Point estimate", format!("{:.0}", blended.point_estimate));
    output::key_value(
        "Confidence band",
        format!("{:.0} - {:.0}", blended.band.low, blended.band.high),
    );
    if let Some(sample) = blended
        .contributions
        .iter()
        .find_map(|result| result.sample)
    {
        output::key_value(
            "Simulation",
            format!(
                "{} of {} iterations{}",
                sample.iterations_run,
                sample.iterations_requested,
                if sample.complete { "" } else { " (incomplete)" }
            ),
        );
    }

    Ok(())
}
