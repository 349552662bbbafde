//! Per-step routing reward.
//!
//! [`compute_reward`] is a pure scalar function — no side effects, no
//! randomness — and monotone in each term's intuitive direction:
//!
//! ```text
//! r = -cost_weight * cost
//!     + quality_weight * quality
//!     - latency_penalty * max(0, latency - sla_threshold)
//!     - quality_miss_penalty * max(0, required_quality - quality)
//! ```
//!
//! Weights are non-negative; the sign of each term is encoded in the formula
//! itself, so a negative weight is a configuration error rather than a way
//! to flip a term.

use crate::EnvError;

/// Weights and thresholds for the routing reward.
///
/// Immutable per environment instance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardConfig {
    /// Weight on realized cost (USD).  Default 1.0.
    pub cost_weight: f64,
    /// Weight on realized quality.  Default 0.5.
    pub quality_weight: f64,
    /// Penalty per second of latency above the SLA.  Default 2.0.
    pub latency_penalty: f64,
    /// SLA latency threshold, seconds.  Must be > 0.  Default 1.0.
    pub sla_threshold: f64,
    /// Penalty per unit of quality shortfall below the prompt's requirement.
    /// Default 1.0.
    pub quality_miss_penalty: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            cost_weight: 1.0,
            quality_weight: 0.5,
            latency_penalty: 2.0,
            sla_threshold: 1.0,
            quality_miss_penalty: 1.0,
        }
    }
}

impl RewardConfig {
    /// Reject negative weights and non-positive SLA thresholds.
    pub fn validate(&self) -> Result<(), EnvError> {
        for (name, v) in [
            ("cost_weight", self.cost_weight),
            ("quality_weight", self.quality_weight),
            ("latency_penalty", self.latency_penalty),
            ("quality_miss_penalty", self.quality_miss_penalty),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(EnvError::InvalidConfig(format!(
                    "reward: {name} must be >= 0, got {v}"
                )));
            }
        }
        if !(self.sla_threshold.is_finite() && self.sla_threshold > 0.0) {
            return Err(EnvError::InvalidConfig(format!(
                "reward: sla_threshold must be > 0, got {}",
                self.sla_threshold
            )));
        }
        Ok(())
    }
}

/// Compute the per-step reward.
///
/// Arguments are the realized outcome of one routed call plus the prompt's
/// quality requirement.  Latency at or below `sla_threshold` contributes
/// nothing to the latency term; quality at or above `required_quality`
/// contributes nothing to the miss term.
pub fn compute_reward(
    cost: f64,
    quality: f64,
    latency: f64,
    required_quality: f64,
    cfg: &RewardConfig,
) -> f64 {
    let latency_violation = (latency - cfg.sla_threshold).max(0.0);
    let quality_miss = (required_quality - quality).max(0.0);
    -cfg.cost_weight * cost + cfg.quality_weight * quality
        - cfg.latency_penalty * latency_violation
        - cfg.quality_miss_penalty * quality_miss
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_formula_on_a_known_point() {
        let cfg = RewardConfig::default();
        // 0.4s over SLA, 0.1 quality miss.
        let r = compute_reward(0.03, 0.8, 1.4, 0.9, &cfg);
        let expected = -0.03 + 0.5 * 0.8 - 2.0 * 0.4 - 1.0 * 0.1;
        assert!((r - expected).abs() < 1e-12);
    }

    #[test]
    fn higher_cost_strictly_lowers_reward() {
        let cfg = RewardConfig::default();
        let lo = compute_reward(0.001, 0.8, 0.5, 0.7, &cfg);
        let hi = compute_reward(0.030, 0.8, 0.5, 0.7, &cfg);
        assert!(hi < lo);
    }

    #[test]
    fn higher_quality_strictly_raises_reward() {
        let cfg = RewardConfig::default();
        let lo = compute_reward(0.01, 0.70, 0.5, 0.9, &cfg);
        let hi = compute_reward(0.01, 0.95, 0.5, 0.9, &cfg);
        assert!(hi > lo);
    }

    #[test]
    fn latency_below_sla_has_no_effect() {
        let cfg = RewardConfig::default();
        let a = compute_reward(0.01, 0.8, 0.2, 0.7, &cfg);
        let b = compute_reward(0.01, 0.8, 0.9, 0.7, &cfg);
        assert_eq!(a, b);
    }

    #[test]
    fn latency_above_sla_strictly_lowers_reward() {
        let cfg = RewardConfig::default();
        let a = compute_reward(0.01, 0.8, 1.2, 0.7, &cfg);
        let b = compute_reward(0.01, 0.8, 2.5, 0.7, &cfg);
        assert!(b < a);
    }

    #[test]
    fn quality_miss_is_penalized() {
        let cfg = RewardConfig::default();
        let met = compute_reward(0.01, 0.9, 0.5, 0.9, &cfg);
        let missed = compute_reward(0.01, 0.9, 0.5, 1.0, &cfg);
        assert!(missed < met);
        assert!((met - missed - cfg.quality_miss_penalty * 0.1).abs() < 1e-12);
    }

    #[test]
    fn negative_weights_rejected() {
        let cfg = RewardConfig {
            cost_weight: -1.0,
            ..RewardConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_positive_sla_rejected() {
        let cfg = RewardConfig {
            sla_threshold: 0.0,
            ..RewardConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
