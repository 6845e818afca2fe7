//! Integration tests for reward dispatch and utility learning across trials

use simon_motivation::core::config::{EngineConfig, MotivationConfig};
use simon_motivation::core::types::{Location, Shape};
use simon_motivation::rules::RuleId;
use simon_motivation::simulation::{Engine, TrialOutcome};
use simon_motivation::task::{SimonStimulus, StimulusFeed};

fn noiseless(retries: i64) -> EngineConfig {
    let mut config =
        EngineConfig::default().with_motivation(MotivationConfig::Count { retries });
    config.memory.activation_noise = 0.0;
    config
}

fn run(engine: &mut Engine) -> TrialOutcome {
    let stimulus = SimonStimulus::new(Shape::Square, Location::Left, Location::Right);
    engine.run_trial(&mut StimulusFeed::new(stimulus)).unwrap()
}

/// Test 1: a trial that skips verification earns nothing
#[test]
fn test_unchecked_trial_earns_nothing() {
    let mut engine = Engine::new(noiseless(1)).unwrap();
    let outcome = run(&mut engine);
    assert!(outcome.log.rewards.is_empty());
    assert_eq!(outcome.log.total_reward(), 0.0);
}

/// Test 2: a first retrieval that matches earns one positive reward
#[test]
fn test_matching_retrieval_rewarded_once() {
    let mut engine = Engine::new(noiseless(2)).unwrap();
    let outcome = run(&mut engine);

    assert_eq!(outcome.log.rewards.len(), 1);
    let reward = &outcome.log.rewards[0];
    assert_eq!(reward.event.rule, RuleId::CheckPass);
    assert!((reward.event.magnitude - 0.1).abs() < 1e-12);
    assert!(outcome.log.rewards.iter().all(|r| r.event.magnitude > 0.0));
}

/// Test 3: time-coupled reward equals time since fixation onset
#[test]
fn test_time_coupled_reward() {
    let mut config = noiseless(2);
    config.reward.time_coupled = true;
    let mut engine = Engine::new(config).unwrap();

    // Second trial so the onset is not zero
    run(&mut engine);
    let outcome = run(&mut engine);

    let check = outcome.log.firings_of(RuleId::CheckPass).next().unwrap();
    let reward = &outcome.log.rewards[0];
    assert!(outcome.log.onset > 0.0);
    assert!((reward.event.magnitude - (check.fired_at - outcome.log.onset)).abs() < 1e-9);
}

/// Test 4: a reward is shared by every rule fired since the previous one
#[test]
fn test_reward_credits_recent_firings() {
    let mut engine = Engine::new(noiseless(2)).unwrap();
    let outcome = run(&mut engine);
    let reward = &outcome.log.rewards[0];

    let fired_before: Vec<RuleId> = outcome
        .log
        .firings
        .iter()
        .filter(|f| f.fired_at <= reward.event.time)
        .map(|f| f.rule)
        .collect();
    let credited: Vec<RuleId> = reward.credits.iter().map(|c| c.rule).collect();
    assert_eq!(credited, fired_before);

    // Earlier firings receive less
    let first = reward.credits.first().unwrap();
    let last = reward.credits.last().unwrap();
    assert!(first.received < last.received);
    assert!((last.received - 0.1).abs() < 1e-12);
}

/// Test 5: penalized encoding rules lose utility across trials
#[test]
fn test_detected_problems_lower_utility() {
    let mut config = noiseless(3);
    config.memory.mismatch_penalty = 0.0;
    config.memory.base_levels.insert("square-right".to_string(), 2.0);
    let mut engine = Engine::new(config).unwrap();

    let stimulus = SimonStimulus::new(Shape::Circle, Location::Right, Location::Left);
    let outcome = engine.run_trial(&mut StimulusFeed::new(stimulus)).unwrap();
    assert_eq!(outcome.log.rewards.len(), 2);
    assert!(outcome.log.total_reward() < 0.0);

    let utilities = engine.utilities();
    let encoders: Vec<RuleId> = outcome.log.competitive_firings().map(|f| f.rule).collect();
    for rule in encoders {
        assert!(utilities.current(rule) < 0.0, "{rule}");
    }
}

/// Test 6: with learning off utilities stay at their base values
#[test]
fn test_learning_can_be_disabled() {
    let mut config = noiseless(2);
    config.utility.learning = false;
    let mut engine = Engine::new(config).unwrap();
    run(&mut engine);
    for (rule, utility) in engine.utilities().competitive_snapshot() {
        assert_eq!(utility, engine.utilities().base(rule));
    }
}
