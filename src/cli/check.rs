//! `dealforge check` - diagnostic checks.

use crate::cli::{output, ConfigPathArg};
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Validate a configuration file and report the effective settings.
pub fn config(args: &ConfigPathArg) -> Result<()> {
    output::section("Configuration check");

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            output::error(&format!("{}: {err}", args.config.display()));
            return Err(err);
        }
    };

    output::ok(&format!("{} is valid", args.config.display()));
    output::key_value("DCF iterations", config.valuation.dcf.iterations);
    output::key_value("DCF horizon (years)", config.valuation.dcf.horizon_years);
    output::key_value("Min peer count", config.valuation.comparables.min_peers);
    output::key_value("Max equity share", config.stack.max_equity_share);
    output::key_value("Matching shards", config.matching.shards);
    output::key_value(
        "Narrative",
        if config.narrative.enabled {
            "enabled"
        } else {
            "disabled"
        },
    );

    Ok(())
}
