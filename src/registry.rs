//! Routing targets: per-model cost/latency/quality metadata.
//!
//! A [`ModelRegistry`] is an immutable, ordered catalog of [`ModelConfig`]s.
//! Order matters: the position of a model in the registry **is** its action
//! index, and indices are stable for the lifetime of the registry.  There is
//! no runtime polymorphism — every routing target shares the same field set,
//! so presets and custom catalogs are just different contents of the same
//! array.

use crate::EnvError;

/// Configuration for a single routing target.
///
/// Immutable once constructed; owned by a [`ModelRegistry`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelConfig {
    /// Unique identifier (unique within a registry).
    pub id: String,
    /// Cost per call in USD.  Must be > 0.
    pub cost_per_call: f64,
    /// Mean of the latency distribution, seconds.  Must be > 0.
    pub latency_mean: f64,
    /// Standard deviation of the latency distribution, seconds.  Must be > 0.
    pub latency_std: f64,
    /// Quality score in `[0, 1]`.
    pub quality_score: f64,
}

impl ModelConfig {
    /// Convenience constructor.
    pub fn new(
        id: impl Into<String>,
        cost_per_call: f64,
        latency_mean: f64,
        latency_std: f64,
        quality_score: f64,
    ) -> Self {
        Self {
            id: id.into(),
            cost_per_call,
            latency_mean,
            latency_std,
            quality_score,
        }
    }

    fn validate(&self) -> Result<(), EnvError> {
        if self.id.is_empty() {
            return Err(EnvError::InvalidConfig("model id must be non-empty".into()));
        }
        if !(self.cost_per_call.is_finite() && self.cost_per_call > 0.0) {
            return Err(EnvError::InvalidConfig(format!(
                "model {:?}: cost_per_call must be > 0, got {}",
                self.id, self.cost_per_call
            )));
        }
        if !(self.latency_mean.is_finite() && self.latency_mean > 0.0) {
            return Err(EnvError::InvalidConfig(format!(
                "model {:?}: latency_mean must be > 0, got {}",
                self.id, self.latency_mean
            )));
        }
        if !(self.latency_std.is_finite() && self.latency_std > 0.0) {
            return Err(EnvError::InvalidConfig(format!(
                "model {:?}: latency_std must be > 0, got {}",
                self.id, self.latency_std
            )));
        }
        if !(self.quality_score.is_finite() && (0.0..=1.0).contains(&self.quality_score)) {
            return Err(EnvError::InvalidConfig(format!(
                "model {:?}: quality_score must be in [0, 1], got {}",
                self.id, self.quality_score
            )));
        }
        Ok(())
    }
}

/// Ordered, immutable catalog of routing targets.
///
/// Invariants (enforced at construction):
/// - at least one model,
/// - all ids unique,
/// - every per-model field valid per [`ModelConfig`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelRegistry {
    models: Vec<ModelConfig>,
}

impl ModelRegistry {
    /// Build a registry from an ordered model list.
    pub fn new(models: Vec<ModelConfig>) -> Result<Self, EnvError> {
        let registry = Self { models };
        registry.validate()?;
        Ok(registry)
    }

    /// Re-check the construction invariants.
    ///
    /// Registries built through [`ModelRegistry::new`] always pass.  Values
    /// obtained another way (e.g. deserialized with the `serde` feature)
    /// must be re-validated before use; [`crate::RouterEnv::new`] does this
    /// for the registry it is handed.
    pub fn validate(&self) -> Result<(), EnvError> {
        if self.models.is_empty() {
            return Err(EnvError::InvalidConfig(
                "registry must contain at least one model".into(),
            ));
        }
        for m in &self.models {
            m.validate()?;
        }
        for (i, m) in self.models.iter().enumerate() {
            if self.models[..i].iter().any(|other| other.id == m.id) {
                return Err(EnvError::InvalidConfig(format!(
                    "duplicate model id {:?}",
                    m.id
                )));
            }
        }
        Ok(())
    }

    /// The five preset tiers shipped with the environment.
    ///
    /// | id            | cost/call | lat. mean | lat. std | quality |
    /// |---------------|-----------|-----------|----------|---------|
    /// | `tier1_large` | $0.030    | 2.0 s     | 0.5 s    | 0.95    |
    /// | `tier1_small` | $0.003    | 0.5 s     | 0.1 s    | 0.82    |
    /// | `tier2_large` | $0.015    | 1.5 s     | 0.4 s    | 0.90    |
    /// | `tier2_small` | $0.001    | 0.3 s     | 0.08 s   | 0.75    |
    /// | `open_source` | $0.0005   | 0.8 s     | 0.3 s    | 0.70    |
    pub fn default_presets() -> Self {
        Self {
            models: vec![
                ModelConfig::new("tier1_large", 0.030, 2.0, 0.5, 0.95),
                ModelConfig::new("tier1_small", 0.003, 0.5, 0.1, 0.82),
                ModelConfig::new("tier2_large", 0.015, 1.5, 0.4, 0.90),
                ModelConfig::new("tier2_small", 0.001, 0.3, 0.08, 0.75),
                ModelConfig::new("open_source", 0.0005, 0.8, 0.3, 0.70),
            ],
        }
    }

    /// Number of models (= size of the action space).
    pub fn count(&self) -> usize {
        self.models.len()
    }

    /// Model at `index`, or [`EnvError::IndexOutOfRange`].
    pub fn get(&self, index: usize) -> Result<&ModelConfig, EnvError> {
        self.models.get(index).ok_or(EnvError::IndexOutOfRange {
            index,
            count: self.models.len(),
        })
    }

    /// All models, in action-index order.
    pub fn models(&self) -> &[ModelConfig] {
        &self.models
    }

    /// Index of the lowest-cost model (first wins on exact ties).
    pub fn cheapest(&self) -> usize {
        let mut best = 0;
        for (i, m) in self.models.iter().enumerate().skip(1) {
            if m.cost_per_call < self.models[best].cost_per_call {
                best = i;
            }
        }
        best
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::default_presets()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_presets_shape() {
        let r = ModelRegistry::default_presets();
        assert_eq!(r.count(), 5);
        assert_eq!(r.get(0).unwrap().id, "tier1_large");
        assert_eq!(r.get(4).unwrap().id, "open_source");
    }

    #[test]
    fn get_out_of_range_fails() {
        let r = ModelRegistry::default_presets();
        assert_eq!(
            r.get(5),
            Err(EnvError::IndexOutOfRange { index: 5, count: 5 })
        );
    }

    #[test]
    fn cheapest_is_open_source_on_presets() {
        let r = ModelRegistry::default_presets();
        assert_eq!(r.cheapest(), 4);
    }

    #[test]
    fn empty_registry_rejected() {
        assert!(matches!(
            ModelRegistry::new(vec![]),
            Err(EnvError::InvalidConfig(_))
        ));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = ModelRegistry::new(vec![
            ModelConfig::new("a", 0.01, 1.0, 0.1, 0.9),
            ModelConfig::new("a", 0.02, 1.0, 0.1, 0.8),
        ]);
        assert!(matches!(err, Err(EnvError::InvalidConfig(_))));
    }

    #[test]
    fn env_construction_revalidates_a_smuggled_registry() {
        use crate::{EnvConfig, RouterEnv};
        // Bypass `new` the way a deserialized value would.
        let empty = ModelRegistry { models: vec![] };
        assert!(empty.validate().is_err());
        assert!(RouterEnv::new(EnvConfig::default().with_registry(empty)).is_err());

        let negative_cost = ModelRegistry {
            models: vec![ModelConfig::new("m", -0.01, 1.0, 0.1, 0.9)],
        };
        assert!(RouterEnv::new(EnvConfig::default().with_registry(negative_cost)).is_err());

        let zero_latency = ModelRegistry {
            models: vec![ModelConfig::new("m", 0.01, 0.0, 0.1, 0.9)],
        };
        assert!(RouterEnv::new(EnvConfig::default().with_registry(zero_latency)).is_err());
    }

    #[test]
    fn invalid_fields_rejected() {
        for bad in [
            ModelConfig::new("m", 0.0, 1.0, 0.1, 0.9),
            ModelConfig::new("m", 0.01, -1.0, 0.1, 0.9),
            ModelConfig::new("m", 0.01, 1.0, 0.0, 0.9),
            ModelConfig::new("m", 0.01, 1.0, 0.1, 1.5),
        ] {
            assert!(ModelRegistry::new(vec![bad]).is_err());
        }
    }
}
