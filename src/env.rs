//! The routing environment: the stateful "front door" of the crate.
//!
//! [`RouterEnv`] owns all per-episode state (RNG, budget, step counter,
//! queue loads, current prompt) and exposes the two-method lifecycle every
//! training loop drives:
//!
//! ```text
//! let (obs, _) = env.reset(Some(seed));
//! loop {
//!     let step = env.step(policy(&obs))?;
//!     if step.terminated || step.truncated { break; }
//! }
//! ```
//!
//! The lifecycle is a small explicit state machine,
//! `Uninitialized → Ready → {Ready, Terminated, Truncated}`, tagged rather
//! than tracked by ad hoc booleans so that stepping a finished episode is a
//! hard [`EnvError::EpisodeEnded`] instead of a silent restart.
//!
//! Determinism: all randomness flows through one `StdRng` seeded at `reset`,
//! and each step consumes it in a fixed call order (latency draw, then the
//! next prompt), so two environments constructed identically and driven by
//! the same action sequence produce bit-identical trajectories.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::{
    compute_reward, EnvError, ModelRegistry, Prompt, QueueConfig, QueueModel, RewardConfig,
    TrafficConfig, TrafficGenerator,
};

// ============================================================================
// Configuration
// ============================================================================

/// Full configuration for a [`RouterEnv`].
///
/// Start with [`EnvConfig::default()`] (5-model preset registry, default
/// reward weights, 1000-step horizon, $10 budget) and adjust via the builder
/// methods or by setting fields directly.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvConfig {
    /// Routing targets; order defines the action-index mapping.
    pub registry: ModelRegistry,
    /// Reward weights and SLA threshold.
    pub reward: RewardConfig,
    /// Traffic distribution shapes.
    pub traffic: TrafficConfig,
    /// Queue capacity and congestion constants.
    pub queue: QueueConfig,
    /// Horizon: steps per episode before truncation.  Must be ≥ 1.
    pub episode_length: u64,
    /// Episode cost budget, USD.  Must be > 0.  Exhaustion terminates.
    pub initial_budget: f64,
    /// Steps per simulated day for the time-of-day observation.
    ///
    /// Default 1440: one step ≈ one simulated minute, 1440 steps = one
    /// 24-hour cycle.  Must be ≥ 1.
    pub time_of_day_period: u64,
    /// Seed used when `reset(None)` is called.
    pub seed: u64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            registry: ModelRegistry::default_presets(),
            reward: RewardConfig::default(),
            traffic: TrafficConfig::default(),
            queue: QueueConfig::default(),
            episode_length: 1000,
            initial_budget: 10.0,
            time_of_day_period: 1440,
            seed: 0,
        }
    }
}

impl EnvConfig {
    /// Replace the model registry.
    pub fn with_registry(mut self, registry: ModelRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the reward configuration.
    pub fn with_reward(mut self, reward: RewardConfig) -> Self {
        self.reward = reward;
        self
    }

    /// Set the episode horizon.
    pub fn with_episode_length(mut self, steps: u64) -> Self {
        self.episode_length = steps;
        self
    }

    /// Set the episode budget (USD).
    pub fn with_budget(mut self, budget: f64) -> Self {
        self.initial_budget = budget;
        self
    }

    /// Set the default seed used by `reset(None)`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<(), EnvError> {
        self.registry.validate()?;
        self.reward.validate()?;
        self.traffic.validate()?;
        self.queue.validate()?;
        if self.episode_length == 0 {
            return Err(EnvError::InvalidConfig(
                "episode_length must be >= 1".into(),
            ));
        }
        if !(self.initial_budget.is_finite() && self.initial_budget > 0.0) {
            return Err(EnvError::InvalidConfig(format!(
                "initial_budget must be > 0, got {}",
                self.initial_budget
            )));
        }
        if self.time_of_day_period == 0 {
            return Err(EnvError::InvalidConfig(
                "time_of_day_period must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Step output
// ============================================================================

/// Diagnostics for one routed call.
///
/// Carried for external logging and evaluation; never read back by the
/// environment itself.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepInfo {
    /// Id of the model the action resolved to.
    pub model_id: String,
    /// Realized cost, USD (deterministic per call).
    pub cost: f64,
    /// Realized latency, seconds (congestion-inflated draw).
    pub latency: f64,
    /// Realized quality (deterministic per model).
    pub quality: f64,
    /// Quality the routed prompt required.
    pub quality_required: f64,
    /// Budget left after this step's debit (may be negative on the
    /// terminating step).
    pub budget_remaining: f64,
    /// Whether realized latency exceeded the SLA threshold.
    pub sla_violated: bool,
}

/// Everything one `step` call returns.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Observation for the *next* decision (see [`RouterEnv::step`] for the
    /// component layout).
    pub observation: Vec<f64>,
    /// Scalar reward for the call just routed.
    pub reward: f64,
    /// Budget exhausted — an operational constraint was violated.
    pub terminated: bool,
    /// Horizon reached — a cutoff, not a failure.
    pub truncated: bool,
    /// Diagnostics for the call just routed.
    pub info: StepInfo,
}

/// Info returned by [`RouterEnv::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResetInfo {
    /// The seed the episode's RNG was seeded with.
    pub seed: u64,
}

// ============================================================================
// RouterEnv
// ============================================================================

/// Lifecycle phase of a [`RouterEnv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Constructed but never reset; `step` fails with `EpisodeEnded`.
    Uninitialized,
    /// Live episode; `step` is accepted.
    Ready,
    /// Budget exhausted; `reset` required.
    Terminated,
    /// Horizon reached; `reset` required.
    Truncated,
}

/// Per-episode mutable state.  Replaced wholesale on every `reset`.
#[derive(Debug, Clone)]
struct Episode {
    rng: StdRng,
    step_count: u64,
    budget_remaining: f64,
    prompt: Prompt,
}

/// The routing environment.
///
/// Single-threaded and synchronous: `reset` and `step` are pure
/// request/response calls with no I/O and bounded work.  Exactly one episode
/// is live per instance; wrap multiple instances for parallel training —
/// they share nothing.
#[derive(Debug, Clone)]
pub struct RouterEnv {
    cfg: EnvConfig,
    traffic: TrafficGenerator,
    queue: QueueModel,
    phase: Phase,
    episode: Option<Episode>,
}

impl RouterEnv {
    /// Build an environment, validating the whole configuration up front.
    pub fn new(cfg: EnvConfig) -> Result<Self, EnvError> {
        cfg.validate()?;
        let traffic = TrafficGenerator::new(cfg.traffic)?;
        let queue = QueueModel::new(&cfg.registry, cfg.queue)?;
        Ok(Self {
            cfg,
            traffic,
            queue,
            phase: Phase::Uninitialized,
            episode: None,
        })
    }

    /// Size of the action space.
    pub fn action_count(&self) -> usize {
        self.cfg.registry.count()
    }

    /// Length of the observation vector:
    /// `[length, complexity, depth_0..depth_{n-1}, time_of_day, budget, required_quality]`.
    pub fn observation_dim(&self) -> usize {
        2 + self.cfg.registry.count() + 3
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The environment's configuration.
    pub fn config(&self) -> &EnvConfig {
        &self.cfg
    }

    /// Start a new episode.
    ///
    /// Re-seeds the internal RNG (`seed`, falling back to the configured
    /// seed), resets budget and step counter, clears all queue load, draws
    /// the first prompt, and returns the initial observation.
    pub fn reset(&mut self, seed: Option<u64>) -> (Vec<f64>, ResetInfo) {
        let seed = seed.unwrap_or(self.cfg.seed);
        let mut rng = StdRng::seed_from_u64(seed);
        self.queue.clear();

        let prompt = self.traffic.sample(self.time_of_day(0), &mut rng);
        self.episode = Some(Episode {
            rng,
            step_count: 0,
            budget_remaining: self.cfg.initial_budget,
            prompt,
        });
        self.phase = Phase::Ready;
        debug!(seed, budget = self.cfg.initial_budget, "episode reset");

        (self.observation(), ResetInfo { seed })
    }

    /// Route the current prompt to the model at `action`.
    ///
    /// Fails with [`EnvError::InvalidAction`] for `action ∉ [0, count)` and
    /// with [`EnvError::EpisodeEnded`] when no episode is live.  Neither
    /// failure advances any state.
    pub fn step(&mut self, action: usize) -> Result<Step, EnvError> {
        if self.phase != Phase::Ready {
            return Err(EnvError::EpisodeEnded);
        }
        if action >= self.cfg.registry.count() {
            return Err(EnvError::InvalidAction {
                action,
                model_count: self.cfg.registry.count(),
            });
        }
        let model = self.cfg.registry.get(action)?.clone();
        let ep = self.episode.as_mut().ok_or(EnvError::EpisodeEnded)?;
        let prompt = ep.prompt;

        // Resolve the call: contention-inflated latency, deterministic cost
        // and quality.
        self.queue.enqueue(action)?;
        let latency = self.queue.sample_latency(action, &mut ep.rng)?;
        let cost = model.cost_per_call;
        let quality = model.quality_score;

        let reward = compute_reward(cost, quality, latency, prompt.required_quality, &self.cfg.reward);

        // Advance episode state and simulated time.
        ep.budget_remaining -= cost;
        ep.step_count += 1;
        self.queue.tick();

        let tod = (ep.step_count % self.cfg.time_of_day_period) as f64
            / self.cfg.time_of_day_period as f64;
        ep.prompt = self.traffic.sample(tod, &mut ep.rng);

        // Budget exhaustion terminates; the horizon truncates.  Terminal wins
        // when both land on the same step.
        let terminated = ep.budget_remaining <= 0.0;
        let truncated = !terminated && ep.step_count >= self.cfg.episode_length;
        let budget_remaining = ep.budget_remaining;
        let step_count = ep.step_count;

        if terminated {
            self.phase = Phase::Terminated;
            debug!(step_count, budget_remaining, "episode terminated: budget exhausted");
        } else if truncated {
            self.phase = Phase::Truncated;
            debug!(step_count, "episode truncated: horizon reached");
        }

        let info = StepInfo {
            model_id: model.id,
            cost,
            latency,
            quality,
            quality_required: prompt.required_quality,
            budget_remaining,
            sla_violated: latency > self.cfg.reward.sla_threshold,
        };

        Ok(Step {
            observation: self.observation(),
            reward,
            terminated,
            truncated,
            info,
        })
    }

    fn time_of_day(&self, step_count: u64) -> f64 {
        (step_count % self.cfg.time_of_day_period) as f64 / self.cfg.time_of_day_period as f64
    }

    /// Build the observation vector from current episode state.
    ///
    /// Fixed order, every component in `[0, 1]`:
    /// `[prompt_length, prompt_complexity, queue_depth_0..queue_depth_{n-1},
    ///   time_of_day, budget_remaining_normalized, quality_required]`.
    fn observation(&self) -> Vec<f64> {
        let ep = match &self.episode {
            Some(ep) => ep,
            None => return vec![0.0; self.observation_dim()],
        };
        let mut obs = Vec::with_capacity(self.observation_dim());
        obs.push(ep.prompt.length);
        obs.push(ep.prompt.complexity);
        obs.extend(self.queue.depths());
        obs.push(self.time_of_day(ep.step_count));
        obs.push((ep.budget_remaining / self.cfg.initial_budget).clamp(0.0, 1.0));
        obs.push(ep.prompt.required_quality);
        obs
    }
}
