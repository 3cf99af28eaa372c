//! Integration tests for configuration loading and validation.

use dealforge::infrastructure::config::Config;

#[test]
fn full_config_round_trips() {
    let config = Config::parse_toml(
        r#"
        [logging]
        level = "debug"
        format = "json"

        [analyzer]
        balance_tolerance = "0.02"

        [valuation.blend]
        dcf = 0.6
        comparables = 0.25
        precedent = 0.15

        [valuation.dcf]
        horizon_years = 7
        iterations = 4000
        seed = 1234
        terminal_growth = 0.015

        [valuation.dcf.growth]
        kind = "triangular"
        min = 0.0
        mode = 0.03
        max = 0.08

        [valuation.comparables]
        min_peers = 5

        [valuation.precedent]
        decay_rate = 0.5

        [stack]
        max_equity_share = "0.5"
        max_earnout_share = "0.2"

        [matching]
        shards = 8

        [reference]
        base_url = "https://reference.example.com"
        timeout_secs = 5

        [reference.retry]
        initial_delay_ms = 100
        max_delay_ms = 1000
        backoff_multiplier = 1.5
        max_attempts = 5
        "#,
    )
    .unwrap();

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.valuation.dcf.horizon_years, 7);
    assert_eq!(config.valuation.dcf.seed, 1234);
    assert_eq!(config.valuation.comparables.min_peers, 5);
    assert_eq!(config.matching.shards, 8);
    assert_eq!(config.reference.retry.max_attempts, 5);
    assert_eq!(
        config.stack.max_equity_share,
        rust_decimal::Decimal::new(5, 1)
    );
}

#[test]
fn out_of_range_percentiles_fail_validation() {
    let result = Config::parse_toml(
        r#"
        [valuation.dcf]
        percentile_low = 0.9
        percentile_high = 0.1
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn negative_blend_weight_fails_validation() {
    let result = Config::parse_toml(
        r#"
        [valuation.blend]
        dcf = -0.5
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn share_cap_above_one_fails_validation() {
    let result = Config::parse_toml(
        r#"
        [stack]
        max_equity_share = "1.5"
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let result = Config::parse_toml("[valuation\niterations = ");
    assert!(result.is_err());
}
