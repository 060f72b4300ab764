//! Tunable constants for the solver, bundled so a CLI or config file layer
//! can override them without the core depending on either.

use serde::Deserialize;

/// Hard wall on total solving time, matching the source's `MAX_RUNTIME`.
pub const DEFAULT_MAX_RUNTIME_MS: u64 = 600_000;
pub const DEFAULT_POPULATION_SIZE: usize = 10;
pub const DEFAULT_PENALTY_LAMBDA: f64 = 1.0;
pub const DEFAULT_SPIRAL_B: f64 = 1.0;
pub const DEFAULT_BINARIZATION_THRESHOLD: f64 = 0.5;
pub const DEFAULT_IP_EPSILON: f64 = 1e-3;
pub const DEFAULT_DEADLINE_SLACK_MS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub population_size: usize,
    pub penalty_lambda: f64,
    pub spiral_b: f64,
    pub binarization_threshold: f64,
    pub ip_epsilon: f64,
    pub max_runtime_ms: u64,
    pub deadline_slack_ms: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            population_size: DEFAULT_POPULATION_SIZE,
            penalty_lambda: DEFAULT_PENALTY_LAMBDA,
            spiral_b: DEFAULT_SPIRAL_B,
            binarization_threshold: DEFAULT_BINARIZATION_THRESHOLD,
            ip_epsilon: DEFAULT_IP_EPSILON,
            max_runtime_ms: DEFAULT_MAX_RUNTIME_MS,
            deadline_slack_ms: DEFAULT_DEADLINE_SLACK_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_spec_constants() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.population_size, 10);
        assert_eq!(cfg.penalty_lambda, 1.0);
        assert_eq!(cfg.spiral_b, 1.0);
        assert_eq!(cfg.binarization_threshold, 0.5);
        assert_eq!(cfg.ip_epsilon, 1e-3);
        assert_eq!(cfg.max_runtime_ms, 600_000);
        assert_eq!(cfg.deadline_slack_ms, 10);
    }
}
