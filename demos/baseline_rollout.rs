//! Compare the three baseline policies over a handful of seeded episodes.
//!
//! ```sh
//! cargo run --example baseline_rollout
//! ```

use routegym::{
    rollout, CheapestFirst, EnvConfig, EpisodeSummary, ModelRegistry, RandomPolicy, RoundRobin,
    RouterEnv, RoutingPolicy,
};

const EPISODES: u64 = 20;

fn evaluate(
    env: &mut RouterEnv,
    make_policy: impl Fn() -> Box<dyn RoutingPolicy>,
    base_seed: u64,
) -> (f64, f64) {
    let mut rewards = Vec::new();
    let mut costs = Vec::new();
    for ep in 0..EPISODES {
        let mut policy = make_policy();
        let EpisodeSummary {
            total_reward,
            total_cost,
            ..
        } = rollout(env, policy.as_mut(), base_seed + ep).expect("rollout");
        rewards.push(total_reward);
        costs.push(total_cost);
    }
    let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
    (mean(&rewards), mean(&costs))
}

fn main() {
    let registry = ModelRegistry::default_presets();
    let mut env = RouterEnv::new(EnvConfig::default().with_episode_length(1000)).expect("env");

    println!("{:<16} {:>12} {:>16}", "strategy", "mean reward", "mean cost (USD)");
    println!("{}", "-".repeat(46));

    let cases: Vec<(&str, Box<dyn Fn() -> Box<dyn RoutingPolicy>>)> = vec![
        (
            "random",
            Box::new({
                let registry = registry.clone();
                move || Box::new(RandomPolicy::with_seed(&registry, 0))
            }),
        ),
        (
            "round-robin",
            Box::new({
                let registry = registry.clone();
                move || Box::new(RoundRobin::new(&registry))
            }),
        ),
        (
            "cheapest-first",
            Box::new({
                let registry = registry.clone();
                move || Box::new(CheapestFirst::new(&registry))
            }),
        ),
    ];

    for (name, make_policy) in cases {
        let (reward, cost) = evaluate(&mut env, make_policy, 42);
        println!("{name:<16} {reward:>12.2} {cost:>16.4}");
    }
}
