//! Per-model queue/contention model.
//!
//! Tracks one non-negative load counter per routing target and converts it
//! into the two signals the environment consumes:
//!
//! - [`QueueModel::queue_depth`]: normalized `[0, 1]` load for the
//!   observation vector;
//! - [`QueueModel::sample_latency`]: a realized latency draw inflated by
//!   current depth — `realized = base × (1 + k × depth)`.
//!
//! The inflation is the mechanism by which routing decisions interact across
//! time: repeatedly choosing one popular model raises its future latency for
//! everyone.  [`QueueModel::tick`] drains every model toward zero at a rate
//! derived from its mean latency, so fast models shed load faster.
//!
//! No hidden state beyond the load vector; deterministic given the RNG
//! stream.

use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::{EnvError, ModelRegistry};

/// Floor applied to sampled base latency, seconds.
const MIN_LATENCY: f64 = 0.01;

/// Capacity and congestion constants for the queue model.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueConfig {
    /// Load at which the normalized depth signal saturates at 1.0.
    ///
    /// Loads grow by one unit per `enqueue`, so with the default of 10.0 the
    /// depth signal saturates after ~20 consecutive picks of a slow model
    /// inside one episode.
    pub capacity: f64,
    /// Congestion coefficient `k` in `realized = base × (1 + k × depth)`.
    pub congestion_k: f64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 10.0,
            congestion_k: 0.5,
        }
    }
}

impl QueueConfig {
    pub fn validate(&self) -> Result<(), EnvError> {
        if !(self.capacity.is_finite() && self.capacity > 0.0) {
            return Err(EnvError::InvalidConfig(format!(
                "queue: capacity must be > 0, got {}",
                self.capacity
            )));
        }
        if !(self.congestion_k.is_finite() && self.congestion_k >= 0.0) {
            return Err(EnvError::InvalidConfig(format!(
                "queue: congestion_k must be >= 0, got {}",
                self.congestion_k
            )));
        }
        Ok(())
    }
}

/// Per-model latency parameters and service rate, aligned to action indices.
#[derive(Debug, Clone, Copy)]
struct ArmService {
    latency_mean: f64,
    latency_std: f64,
    /// Load units drained per tick: `1 / latency_mean`.
    service_rate: f64,
}

/// Per-model in-flight load tracker.
#[derive(Debug, Clone)]
pub struct QueueModel {
    cfg: QueueConfig,
    arms: Vec<ArmService>,
    loads: Vec<f64>,
}

impl QueueModel {
    /// Build a queue model for every target in the registry, all loads zero.
    pub fn new(registry: &ModelRegistry, cfg: QueueConfig) -> Result<Self, EnvError> {
        cfg.validate()?;
        let arms = registry
            .models()
            .iter()
            .map(|m| ArmService {
                latency_mean: m.latency_mean,
                latency_std: m.latency_std,
                service_rate: 1.0 / m.latency_mean,
            })
            .collect();
        let loads = vec![0.0; registry.count()];
        Ok(Self { cfg, arms, loads })
    }

    /// Number of tracked models.
    pub fn count(&self) -> usize {
        self.loads.len()
    }

    /// Reset all loads to zero.
    pub fn clear(&mut self) {
        self.loads.iter_mut().for_each(|l| *l = 0.0);
    }

    /// Add one unit of load to `model_index`.
    pub fn enqueue(&mut self, model_index: usize) -> Result<(), EnvError> {
        let count = self.loads.len();
        let load = self
            .loads
            .get_mut(model_index)
            .ok_or(EnvError::IndexOutOfRange {
                index: model_index,
                count,
            })?;
        *load += 1.0;
        Ok(())
    }

    /// Advance simulated time by one step: drain every model's load by its
    /// service rate, floored at zero.
    pub fn tick(&mut self) {
        for (load, arm) in self.loads.iter_mut().zip(&self.arms) {
            *load = (*load - arm.service_rate).max(0.0);
        }
    }

    /// Normalized queue depth for `model_index`, clamped to `[0, 1]`.
    pub fn queue_depth(&self, model_index: usize) -> Result<f64, EnvError> {
        let load = self.loads.get(model_index).ok_or(EnvError::IndexOutOfRange {
            index: model_index,
            count: self.loads.len(),
        })?;
        Ok((load / self.cfg.capacity).clamp(0.0, 1.0))
    }

    /// Normalized depths for all models, in action-index order.
    pub fn depths(&self) -> Vec<f64> {
        self.loads
            .iter()
            .map(|l| (l / self.cfg.capacity).clamp(0.0, 1.0))
            .collect()
    }

    /// Draw a realized latency for `model_index`.
    ///
    /// Base latency is Gaussian truncated to positive values (floor 0.01 s),
    /// then inflated proportionally to current depth to model contention.
    pub fn sample_latency(&self, model_index: usize, rng: &mut StdRng) -> Result<f64, EnvError> {
        let arm = self.arms.get(model_index).ok_or(EnvError::IndexOutOfRange {
            index: model_index,
            count: self.arms.len(),
        })?;
        let base = match Normal::new(arm.latency_mean, arm.latency_std) {
            Ok(dist) => dist.sample(rng).max(MIN_LATENCY),
            Err(_) => arm.latency_mean, // unreachable for validated registries
        };
        let depth = self.queue_depth(model_index)?;
        Ok(base * (1.0 + self.cfg.congestion_k * depth))
    }
}
