//! `routegym`: a deterministic simulation environment for learning LLM
//! inference-routing policies.
//!
//! You have a small set of routing targets (model tiers, inference
//! endpoints) with different cost, latency, and quality profiles, and a
//! stream of prompts that each need one of them.  `routegym` simulates that
//! decision process so a reinforcement-learning agent — or a hand-written
//! baseline — can learn a cost/quality/latency-optimal routing policy
//! against it.
//!
//! **Goals:**
//! - **Deterministic by default**: same seed + same action sequence →
//!   bit-identical observation/reward trajectories.  All randomness flows
//!   through one explicitly seeded RNG; there is no ambient randomness
//!   anywhere in the crate.
//! - **Coupled dynamics**: a per-model queue model inflates realized latency
//!   under load, so routing decisions interact across time — hammering one
//!   popular model raises its future latency for everyone.
//! - **Small K**: designed for 2–10 routing targets; the observation vector
//!   grows linearly with the target count.
//!
//! **Pieces:**
//! - [`ModelRegistry`] / [`ModelConfig`]: immutable ordered catalog of
//!   routing targets; position = action index.
//! - [`TrafficGenerator`] / [`Prompt`]: beta-distributed prompt features
//!   with a sinusoidal time-of-day load pattern.
//! - [`QueueModel`]: per-model load counters, drain-by-service-rate ticks,
//!   congestion-inflated latency sampling.
//! - [`compute_reward`] / [`RewardConfig`]: pure scalar reward, monotone in
//!   each term.
//! - [`RouterEnv`]: the episode state machine tying it all together behind a
//!   `reset`/`step` lifecycle.
//! - [`RoutingPolicy`] + baselines ([`RoundRobin`], [`RandomPolicy`],
//!   [`CheapestFirst`]) and [`rollout`]: conformance targets for the `step`
//!   contract and a one-episode evaluation harness.
//!
//! # Quickstart
//!
//! ```rust
//! use routegym::{EnvConfig, RouterEnv};
//!
//! let mut env = RouterEnv::new(EnvConfig::default()).unwrap();
//! let (mut obs, _) = env.reset(Some(42));
//! for _ in 0..10 {
//!     let step = env.step(4).unwrap(); // always route to open_source
//!     if step.terminated || step.truncated {
//!         break;
//!     }
//!     obs = step.observation;
//! }
//! assert_eq!(obs.len(), env.observation_dim());
//! ```
//!
//! **Non-goals:**
//! - No actual LLM invocation, network calls, or learning-algorithm
//!   internals — an external training loop drives `reset`/`step` and owns
//!   the policy-gradient math.
//! - No persistence, registration, or CLI surface.

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod registry;
pub use registry::*;

mod traffic;
pub use traffic::*;

mod queue;
pub use queue::*;

mod reward;
pub use reward::*;

mod env;
pub use env::*;

mod baseline;
pub use baseline::*;
