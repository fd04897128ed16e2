use serde::{Deserialize, Serialize};

use crate::sanitize::sanitize_param;

const DEFAULT_USER_TIMING_WEIGHT: f64 = 0.6;
const DEFAULT_SOLVE_TIME_BUFFER: f64 = 1.4;
const DEFAULT_FRACTION_CAP_RATIO: f64 = 0.25;
const DEFAULT_MAX_FRACTION_REDRAWS: u32 = 6;
const DEFAULT_WEAK_AREA_CEILING: f64 = 0.35;

/// Pacing knobs for one engine instance.
///
/// Values are clamped at the boundary; nothing here can push a problem
/// outside the data model's invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How far trusted per-user solve times may pull the time budget [0, 1]
    pub user_timing_weight: f64,
    /// Multiplier applied to the user's average correct solve time
    pub solve_time_buffer: f64,
    /// Maximum share of fraction problems in a mixed session
    pub fraction_cap_ratio: f64,
    /// Redraws attempted before accepting a capped fraction draw
    pub max_fraction_redraws: u32,
    /// Ceiling of the weak-area injection probability
    pub weak_area_ceiling: f64,
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            user_timing_weight: DEFAULT_USER_TIMING_WEIGHT,
            solve_time_buffer: DEFAULT_SOLVE_TIME_BUFFER,
            fraction_cap_ratio: DEFAULT_FRACTION_CAP_RATIO,
            max_fraction_redraws: DEFAULT_MAX_FRACTION_REDRAWS,
            weak_area_ceiling: DEFAULT_WEAK_AREA_CEILING,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("PACER_USER_TIMING_WEIGHT") {
            config.user_timing_weight = val.parse().unwrap_or(DEFAULT_USER_TIMING_WEIGHT);
        }
        if let Ok(val) = std::env::var("PACER_SOLVE_TIME_BUFFER") {
            config.solve_time_buffer = val.parse().unwrap_or(DEFAULT_SOLVE_TIME_BUFFER);
        }
        if let Ok(val) = std::env::var("PACER_FRACTION_CAP") {
            config.fraction_cap_ratio = val.parse().unwrap_or(DEFAULT_FRACTION_CAP_RATIO);
        }
        if let Ok(val) = std::env::var("PACER_SEED") {
            config.seed = val.parse().ok();
        }

        config.sanitized()
    }

    pub fn sanitized(mut self) -> Self {
        self.user_timing_weight =
            sanitize_param(self.user_timing_weight, 0.0, 1.0, DEFAULT_USER_TIMING_WEIGHT);
        self.solve_time_buffer =
            sanitize_param(self.solve_time_buffer, 1.0, 3.0, DEFAULT_SOLVE_TIME_BUFFER);
        self.fraction_cap_ratio =
            sanitize_param(self.fraction_cap_ratio, 0.0, 1.0, DEFAULT_FRACTION_CAP_RATIO);
        self.max_fraction_redraws = self.max_fraction_redraws.min(32);
        self.weak_area_ceiling =
            sanitize_param(self.weak_area_ceiling, 0.0, 1.0, DEFAULT_WEAK_AREA_CEILING);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_nominal() {
        let config = EngineConfig::default();
        assert_eq!(config.user_timing_weight, 0.6);
        assert_eq!(config.solve_time_buffer, 1.4);
        assert_eq!(config.max_fraction_redraws, 6);
        assert_eq!(config.clone().sanitized(), config);
    }

    #[test]
    fn test_sanitized_clamps_out_of_range() {
        let config = EngineConfig {
            user_timing_weight: 4.0,
            solve_time_buffer: 0.1,
            fraction_cap_ratio: f64::NAN,
            max_fraction_redraws: 1000,
            weak_area_ceiling: -1.0,
            seed: Some(7),
        }
        .sanitized();

        assert_eq!(config.user_timing_weight, 1.0);
        assert_eq!(config.solve_time_buffer, 1.0);
        assert_eq!(config.fraction_cap_ratio, DEFAULT_FRACTION_CAP_RATIO);
        assert_eq!(config.max_fraction_redraws, 32);
        assert_eq!(config.weak_area_ceiling, 0.0);
        assert_eq!(config.seed, Some(7));
    }
}
