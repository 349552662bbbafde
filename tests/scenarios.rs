//! Concrete end-to-end scenarios against the default 5-model registry.

use routegym::{
    rollout, CheapestFirst, EnvConfig, EnvError, ModelRegistry, Phase, RandomPolicy, RoundRobin,
    RouterEnv, RoutingPolicy,
};

/// $1.00 budget, 10-step horizon, always routing to `open_source`
/// ($0.0005/call): the horizon cuts the episode at step 10 with
/// ~$0.995 left.  A cheap policy never exhausts the budget.
#[test]
fn cheap_routing_reaches_the_horizon_with_budget_to_spare() {
    let mut env = RouterEnv::new(
        EnvConfig::default()
            .with_budget(1.0)
            .with_episode_length(10),
    )
    .unwrap();
    env.reset(Some(42));

    let mut last = None;
    for _ in 0..10 {
        let step = env.step(4).unwrap();
        last = Some(step);
    }
    let last = last.unwrap();
    assert!(last.truncated, "horizon should truncate at step 10");
    assert!(!last.terminated);
    assert!(
        (last.info.budget_remaining - 0.995).abs() < 1e-9,
        "expected ~0.995 left, got {}",
        last.info.budget_remaining
    );
    assert_eq!(env.phase(), Phase::Truncated);
}

/// $0.001 budget, one `tier1_large` call ($0.03): the budget goes negative
/// immediately and the episode terminates after step 1.
#[test]
fn expensive_routing_exhausts_a_tiny_budget_in_one_step() {
    let mut env = RouterEnv::new(
        EnvConfig::default()
            .with_budget(0.001)
            .with_episode_length(10),
    )
    .unwrap();
    env.reset(Some(42));

    let step = env.step(0).unwrap();
    assert!(step.terminated, "budget overdraft must terminate");
    assert!(!step.truncated);
    assert!(step.info.budget_remaining < 0.0);
    assert_eq!(env.step(0), Err(EnvError::EpisodeEnded));
}

/// Repeatedly hammering one slow model builds queue depth until the signal
/// saturates, while untouched models stay empty.
#[test]
fn contention_builds_queue_depth_on_a_hot_model() {
    let mut env = RouterEnv::new(EnvConfig::default().with_budget(100.0)).unwrap();
    env.reset(Some(7));

    // tier1_large: +1 load per pick, drains 0.5/tick → net +0.5/step, so 30
    // consecutive picks push load well past the capacity of 10.
    let mut obs = Vec::new();
    for _ in 0..30 {
        obs = env.step(0).unwrap().observation;
    }
    // queue_depth_i sits at observation index 2 + i.
    assert_eq!(obs[2], 1.0, "hot model's depth should saturate");
    for i in 1..env.action_count() {
        assert_eq!(obs[2 + i], 0.0, "untouched model {i} stays empty");
    }

    // Mean realized latency under saturation exceeds the configured mean:
    // the 1.5× congestion multiplier dominates the draw noise over 30 steps.
    env.reset(Some(7));
    let mut total = 0.0;
    for _ in 0..30 {
        total += env.step(0).unwrap().info.latency;
    }
    assert!(total / 30.0 > 2.0, "mean latency {} not inflated", total / 30.0);
}

/// Each baseline conforms to the action-space contract end to end.
#[test]
fn baselines_drive_full_episodes() {
    let registry = ModelRegistry::default_presets();
    let mut env = RouterEnv::new(EnvConfig::default().with_episode_length(100)).unwrap();

    let mut policies: Vec<Box<dyn RoutingPolicy>> = vec![
        Box::new(RoundRobin::new(&registry)),
        Box::new(RandomPolicy::with_seed(&registry, 0)),
        Box::new(CheapestFirst::new(&registry)),
    ];
    for policy in policies.iter_mut() {
        let summary = rollout(&mut env, policy.as_mut(), 42).unwrap();
        assert!(summary.steps > 0);
        assert!(summary.total_cost > 0.0);
        assert!(summary.terminated || summary.truncated);
    }
}

/// Cheapest-first spends strictly less than round-robin over the same
/// horizon and seed.
#[test]
fn cheapest_first_spends_least() {
    let registry = ModelRegistry::default_presets();
    let mut env = RouterEnv::new(EnvConfig::default().with_episode_length(200)).unwrap();

    let mut cheapest = CheapestFirst::new(&registry);
    let mut rr = RoundRobin::new(&registry);
    let cheap = rollout(&mut env, &mut cheapest, 1).unwrap();
    let round = rollout(&mut env, &mut rr, 1).unwrap();

    assert!(cheap.total_cost < round.total_cost);
    assert_eq!(cheap.steps, 200);
    assert_eq!(round.steps, 200);
}

/// Identical seeds give identical rollout summaries; different seeds give a
/// different trajectory somewhere.
#[test]
fn rollouts_reproduce_by_seed() {
    let registry = ModelRegistry::default_presets();
    let mut env = RouterEnv::new(EnvConfig::default().with_episode_length(50)).unwrap();

    let a = rollout(&mut env, &mut RandomPolicy::with_seed(&registry, 3), 5).unwrap();
    let b = rollout(&mut env, &mut RandomPolicy::with_seed(&registry, 3), 5).unwrap();
    assert_eq!(a, b);
}
