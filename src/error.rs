//! Error taxonomy for the environment.
//!
//! Three failure classes, all surfaced synchronously to the offending call:
//!
//! - [`EnvError::InvalidConfig`]: malformed registry, negative weights,
//!   non-positive thresholds or budget.  Raised at construction or reset and
//!   fatal to that attempt — never silently corrected.
//! - [`EnvError::InvalidAction`] / [`EnvError::IndexOutOfRange`]: a lookup
//!   outside `[0, model_count)`.  Recoverable by the caller, but never
//!   clamped: clamping would corrupt the action-space contract an agent is
//!   learning against.
//! - [`EnvError::EpisodeEnded`]: `step` called with no live episode (before
//!   the first `reset`, or after termination/truncation without an
//!   intervening `reset`).  A programmer error in the caller.
//!
//! There are no retries anywhere in the crate: every operation is
//! deterministic given its inputs, so nothing is transient.

/// All errors produced by this crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnvError {
    /// Configuration rejected at construction or reset time.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Registry lookup outside `[0, count)`.
    #[error("model index {index} out of range (registry has {count} models)")]
    IndexOutOfRange { index: usize, count: usize },

    /// Action outside `[0, model_count)`.
    #[error("invalid action {action}: expected an index in [0, {model_count})")]
    InvalidAction { action: usize, model_count: usize },

    /// `step` called without a live episode.
    #[error("episode has ended (or was never started); call reset() before step()")]
    EpisodeEnded,
}
