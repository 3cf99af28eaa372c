//! Monte Carlo simulation runner.
//!
//! Iterations are embarrassingly parallel: they are split into fixed-size
//! chunks, each chunk draws from its own deterministically seeded RNG
//! stream, and workers pull chunks off a shared counter. The sample set is
//! therefore a function of the seed and iteration count alone, independent
//! of how many workers ran. Cancellation is cooperative, checked at
//! iteration boundaries; a cancelled run reports the samples that finished
//! and is tagged incomplete.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use super::config::Sampler;

/// Iterations per RNG stream. Fixed so results do not depend on the
/// worker count.
const CHUNK_SIZE: u32 = 256;

/// Odd multiplier for spreading chunk seeds across the u64 space.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Cooperative cancellation flag shared with a running simulation.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Running workers stop at the next iteration
    /// boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The three uncertain inputs drawn each iteration.
#[derive(Debug, Clone, Copy)]
pub struct InputSamplers {
    pub growth: Sampler,
    pub discount: Sampler,
    pub margin: Sampler,
}

/// Distribution statistics over the simulated outcomes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSummary {
    pub median: f64,
    pub p_low: f64,
    pub p_high: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub iterations_requested: u32,
    pub iterations_run: u32,
    /// False when cancellation stopped the run early.
    pub complete: bool,
}

/// Run `iterations` evaluations of `outcome` over drawn inputs.
///
/// `outcome` must be a pure function of its drawn inputs; workers share
/// nothing mutable beyond the chunk counter and the result sink.
pub fn run<F>(
    iterations: u32,
    seed: u64,
    samplers: InputSamplers,
    percentile_low: f64,
    percentile_high: f64,
    cancel: &CancellationFlag,
    outcome: F,
) -> SimulationSummary
where
    F: Fn(f64, f64, f64) -> f64 + Sync,
{
    let chunk_count = iterations.div_ceil(CHUNK_SIZE);
    let workers = num_cpus::get().clamp(1, chunk_count.max(1) as usize);

    let next_chunk = AtomicU32::new(0);
    let collected: Mutex<Vec<(u32, Vec<f64>)>> = Mutex::new(Vec::with_capacity(chunk_count as usize));

    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                if cancel.is_cancelled() {
                    break;
                }
                let chunk = next_chunk.fetch_add(1, Ordering::Relaxed);
                if chunk >= chunk_count {
                    break;
                }

                let start = chunk * CHUNK_SIZE;
                let len = CHUNK_SIZE.min(iterations - start);
                let mut rng =
                    StdRng::seed_from_u64(seed ^ SEED_STRIDE.wrapping_mul(u64::from(chunk) + 1));
                let mut samples = Vec::with_capacity(len as usize);

                for _ in 0..len {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let growth = samplers.growth.draw(&mut rng);
                    let discount = samplers.discount.draw(&mut rng);
                    let margin = samplers.margin.draw(&mut rng);
                    samples.push(outcome(growth, discount, margin));
                }

                collected.lock().push((chunk, samples));
            });
        }
    });

    let mut chunks = collected.into_inner();
    chunks.sort_by_key(|(idx, _)| *idx);
    let mut samples: Vec<f64> = chunks.into_iter().flat_map(|(_, s)| s).collect();

    let iterations_run = samples.len() as u32;
    let complete = iterations_run == iterations;
    if !complete {
        debug!(
            requested = iterations,
            run = iterations_run,
            "simulation cancelled before completion"
        );
    }

    if samples.is_empty() {
        return SimulationSummary {
            median: 0.0,
            p_low: 0.0,
            p_high: 0.0,
            mean: 0.0,
            std_dev: 0.0,
            iterations_requested: iterations,
            iterations_run: 0,
            complete: false,
        };
    }

    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let variance = samples
        .iter()
        .map(|s| (s - mean) * (s - mean))
        .sum::<f64>()
        / samples.len() as f64;

    SimulationSummary {
        median: percentile(&samples, 0.5),
        p_low: percentile(&samples, percentile_low),
        p_high: percentile(&samples, percentile_high),
        mean,
        std_dev: variance.sqrt(),
        iterations_requested: iterations,
        iterations_run,
        complete,
    }
}

/// Linear-interpolated percentile over a sorted sample.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::valuation::config::DistributionConfig;

    fn samplers(std_dev: f64) -> InputSamplers {
        InputSamplers {
            growth: DistributionConfig::Normal {
                mean: 0.03,
                std_dev,
            }
            .sampler("growth")
            .unwrap(),
            discount: DistributionConfig::Normal {
                mean: 0.10,
                std_dev,
            }
            .sampler("discount")
            .unwrap(),
            margin: DistributionConfig::Normal {
                mean: 0.20,
                std_dev,
            }
            .sampler("margin")
            .unwrap(),
        }
    }

    #[test]
    fn fixed_seed_reproduces_identical_output() {
        let cancel = CancellationFlag::new();
        let run_once = || {
            run(
                1000,
                7,
                samplers(0.02),
                0.10,
                0.90,
                &cancel,
                |g, d, m| g + d + m,
            )
        };
        let first = run_once();
        let second = run_once();
        assert_eq!(first, second);
        assert!(first.complete);
        assert_eq!(first.iterations_run, 1000);
    }

    #[test]
    fn zero_variance_collapses_to_point() {
        let cancel = CancellationFlag::new();
        let summary = run(500, 1, samplers(0.0), 0.10, 0.90, &cancel, |g, d, m| {
            g + d + m
        });
        assert!((summary.median - 0.33).abs() < 1e-12);
        assert!((summary.p_low - summary.p_high).abs() < 1e-12);
        assert!(summary.std_dev < 1e-12);
    }

    #[test]
    fn cancelled_run_is_tagged_incomplete() {
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let summary = run(2000, 3, samplers(0.02), 0.10, 0.90, &cancel, |g, _, _| g);
        assert!(!summary.complete);
        assert_eq!(summary.iterations_run, 0);
    }

    #[test]
    fn percentile_interpolates() {
        let sorted = vec![1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&sorted, 0.5) - 2.5).abs() < 1e-12);
        assert!((percentile(&sorted, 0.0) - 1.0).abs() < 1e-12);
        assert!((percentile(&sorted, 1.0) - 4.0).abs() < 1e-12);
    }
}
