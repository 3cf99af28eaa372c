//! `dealforge match` - rank a deal pool against a buyer mandate.

use tabled::{Table, Tabled};

use crate::application::matching::MatchingEngine;
use crate::cli::{load_config, load_json, output, MatchArgs};
use crate::domain::{BuyerProfile, DealProfile};
use crate::error::Result;

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Deal")]
    deal: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Industry")]
    industry: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Geo")]
    geography: String,
    #[tabled(rename = "Strategic")]
    strategic: String,
    #[tabled(rename = "Health")]
    health: String,
}

/// Run the match command.
pub fn run(args: &MatchArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let buyer: BuyerProfile = load_json(&args.buyer)?;
    let deals: Vec<DealProfile> = load_json(&args.deals)?;

    let engine = MatchingEngine::new();
    let scores = engine.match_deals_sharded(
        &buyer,
        &deals,
        &config.matching.weights,
        config.matching.shards,
    )?;

    output::section(&format!(
        "Top matches for {} ({} deals scored)",
        buyer.id,
        deals.len()
    ));
    let rows: Vec<MatchRow> = scores
        .iter()
        .take(args.limit)
        .enumerate()
        .map(|(idx, score)| MatchRow {
            rank: idx + 1,
            deal: score.deal.to_string(),
            score: format!("{:.3}", score.score),
            industry: format!("{:.2}", score.factors.industry_fit),
            size: format!("{:.2}", score.factors.size_fit),
            geography: format!("{:.2}", score.factors.geography_fit),
            strategic: format!("{:.2}", score.factors.strategic_overlap),
            health: format!("{:.2}", score.factors.health_alignment),
        })
        .collect();
    output::table(&Table::new(rows).to_string());

    if scores.len() > args.limit {
        output::key_value("Shown", format!("{} of {}", args.limit, scores.len()));
    }

    Ok(())
}
