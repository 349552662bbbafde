//! Baseline routing policies and a small rollout harness.
//!
//! Baselines exist as conformance targets for the environment's public
//! `reset`/`step` contract: they consume the same observation vector and
//! emit actions from the same `[0, model_count)` space a learned policy
//! would.  Their internals are deliberately trivial.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{EnvError, ModelRegistry, RouterEnv};

/// Common interface for anything that maps observations to actions.
pub trait RoutingPolicy {
    /// Choose an action for the given observation.
    fn select(&mut self, observation: &[f64]) -> usize;
}

/// Cycles through model indices in fixed order, ignoring the observation.
#[derive(Debug, Clone)]
pub struct RoundRobin {
    model_count: usize,
    next: usize,
}

impl RoundRobin {
    /// The registry's non-empty invariant guarantees a valid cycle.
    pub fn new(registry: &ModelRegistry) -> Self {
        Self {
            model_count: registry.count(),
            next: 0,
        }
    }
}

impl RoutingPolicy for RoundRobin {
    fn select(&mut self, _observation: &[f64]) -> usize {
        let a = self.next;
        self.next = (self.next + 1) % self.model_count;
        a
    }
}

/// Draws uniformly from `[0, model_count)` using a seeded RNG.
///
/// Seedable for the same reason every policy in this crate is: reproducible
/// evaluation runs.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    model_count: usize,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn with_seed(registry: &ModelRegistry, seed: u64) -> Self {
        Self {
            model_count: registry.count(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RoutingPolicy for RandomPolicy {
    fn select(&mut self, _observation: &[f64]) -> usize {
        self.rng.gen_range(0..self.model_count)
    }
}

/// Always selects the lowest-cost model.
#[derive(Debug, Clone, Copy)]
pub struct CheapestFirst {
    choice: usize,
}

impl CheapestFirst {
    /// Resolve the cheapest index once, at construction.
    pub fn new(registry: &ModelRegistry) -> Self {
        Self {
            choice: registry.cheapest(),
        }
    }
}

impl RoutingPolicy for CheapestFirst {
    fn select(&mut self, _observation: &[f64]) -> usize {
        self.choice
    }
}

/// Aggregate result of one rolled-out episode.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeSummary {
    /// Steps taken before the episode ended.
    pub steps: u64,
    /// Sum of per-step rewards.
    pub total_reward: f64,
    /// Sum of realized costs, USD.
    pub total_cost: f64,
    /// Steps whose realized latency exceeded the SLA.
    pub sla_violations: u64,
    /// Episode ended by budget exhaustion.
    pub terminated: bool,
    /// Episode ended by the horizon cutoff.
    pub truncated: bool,
}

/// Drive one full episode of `env` with `policy` and summarize it.
///
/// Resets with `seed`, then steps until the environment reports
/// terminated or truncated.
pub fn rollout(
    env: &mut RouterEnv,
    policy: &mut dyn RoutingPolicy,
    seed: u64,
) -> Result<EpisodeSummary, EnvError> {
    let (mut obs, _) = env.reset(Some(seed));
    let mut summary = EpisodeSummary {
        steps: 0,
        total_reward: 0.0,
        total_cost: 0.0,
        sla_violations: 0,
        terminated: false,
        truncated: false,
    };
    loop {
        let step = env.step(policy.select(&obs))?;
        summary.steps += 1;
        summary.total_reward += step.reward;
        summary.total_cost += step.info.cost;
        if step.info.sla_violated {
            summary.sla_violations += 1;
        }
        if step.terminated || step.truncated {
            summary.terminated = step.terminated;
            summary.truncated = step.truncated;
            return Ok(summary);
        }
        obs = step.observation;
    }
}
