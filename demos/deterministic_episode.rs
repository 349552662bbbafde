//! Walk one short episode twice with the same seed and show that the
//! trajectories match bit for bit.
//!
//! ```sh
//! cargo run --example deterministic_episode
//! ```

use routegym::{EnvConfig, RouterEnv, Step};

fn run_episode(seed: u64) -> Vec<Step> {
    let mut env = RouterEnv::new(
        EnvConfig::default()
            .with_budget(1.0)
            .with_episode_length(10),
    )
    .expect("env");
    env.reset(Some(seed));

    let mut steps = Vec::new();
    loop {
        // Alternate between the premium tier and the open-source fallback.
        let action = if steps.len() % 2 == 0 { 0 } else { 4 };
        let step = env.step(action).expect("step");
        let done = step.terminated || step.truncated;
        steps.push(step);
        if done {
            return steps;
        }
    }
}

fn main() {
    let a = run_episode(42);
    let b = run_episode(42);
    assert_eq!(a, b, "same seed must reproduce the episode exactly");

    println!("step  model         reward   latency  budget left");
    for (i, s) in a.iter().enumerate() {
        println!(
            "{:>4}  {:<12} {:>7.3}  {:>7.2}s  {:>10.4}",
            i + 1,
            s.info.model_id,
            s.reward,
            s.info.latency,
            s.info.budget_remaining,
        );
    }
    println!("\nepisode replayed identically across both runs ({} steps)", a.len());
}
