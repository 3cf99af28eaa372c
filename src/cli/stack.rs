//! `dealforge stack` - financing structure for a valued deal.

use tabled::{Table, Tabled};

use crate::application::stack::OfferStackGenerator;
use crate::application::valuation::{CancellationFlag, ValuationEngine};
use crate::cli::{load_config, load_json, output, StackArgs};
use crate::domain::error::StackError;
use crate::domain::{DealProfile, FinancialStatement, ReferenceSnapshot, StackConstraints};
use crate::error::{Error, Result};

#[derive(Tabled)]
struct TrancheRow {
    #[tabled(rename = "Tranche")]
    kind: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Cap")]
    cap: String,
}

/// Run the stack command: valuate, then allocate tranches.
pub async fn run(args: &StackArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let deal: DealProfile = load_json(&args.deal)?;
    let statement: FinancialStatement = load_json(&args.statement)?;
    let reference: ReferenceSnapshot = load_json(&args.reference)?;
    let constraints: StackConstraints = load_json(&args.constraints)?;

    let engine = ValuationEngine::new(config.valuation)?;
    let blended = engine
        .valuate(&deal, &statement, &reference, &CancellationFlag::new())
        .await?;

    let generator = OfferStackGenerator::new(config.stack)?;
    let stack = match generator.generate(&blended, statement.ebitda, &constraints) {
        Ok(stack) => stack,
        Err(StackError::Infeasible { unmet, binding }) => {
            output::section(&format!("Offer stack for {}", deal.id));
            output::error(&format!(
                "infeasible: {unmet:.0} unfunded, binding constraint is {binding}"
            ));
            return Err(Error::Stack(StackError::Infeasible { unmet, binding }));
        }
        Err(err) => return Err(err.into()),
    };

    output::section(&format!("Offer stack for {}", deal.id));
    let rows: Vec<TrancheRow> = stack
        .tranches
        .iter()
        .map(|tranche| TrancheRow {
            kind: tranche.kind.label().to_string(),
            amount: format!("{:.0}", tranche.amount),
            rate: format!("{:.2}%", tranche.rate * rust_decimal::Decimal::from(100)),
            cap: format!("{:.0}", tranche.max),
        })
        .collect();
    output::table(&Table::new(rows).to_string());

    output::key_value("Target valuation", format!("{:.0}", stack.target));
    output::key_value("Cash at close", format!("{:.0}", stack.cash_at_close()));
    output::ok("tranche amounts fund the target within epsilon");

    Ok(())
}
