use cucumber::{given, then, when};
use peerguard_core::Action;

use crate::features::world::AclWorld;

fn action(word: &str) -> Action {
    match word {
        "allow" => Action::Allow,
        "deny" => Action::Deny,
        other => panic!("unknown action in scenario: {}", other),
    }
}

#[given(expr = "an access controller that denies by default")]
async fn given_default_deny(world: &mut AclWorld) {
    world.controller.set_default_allow(false);
}

#[given(expr = "an access controller that allows by default")]
async fn given_default_allow(world: &mut AclWorld) {
    world.controller.set_default_allow(true);
}

fn add(world: &mut AclWorld, word: &str, pattern: &str) {
    world
        .controller
        .add_rule(action(word), pattern)
        .unwrap_or_else(|e| panic!("rule should compile: {}", e));
}

#[given(expr = "a(n) {word} rule for {string}")]
async fn given_rule(world: &mut AclWorld, word: String, pattern: String) {
    add(world, &word, &pattern);
}

#[when(expr = "I add a(n) {word} rule for {string}")]
async fn when_add_rule(world: &mut AclWorld, word: String, pattern: String) {
    add(world, &word, &pattern);
}

#[when(expr = "I try to add a(n) {word} rule for {string}")]
async fn try_add_rule(world: &mut AclWorld, word: String, pattern: String) {
    world.last_error = world.controller.add_rule(action(&word), &pattern).err();
}

#[when("the rules are cleared")]
async fn clear_rules(world: &mut AclWorld) {
    world.controller.clear_rules();
}

#[when(expr = "I record the verdict for {string}")]
async fn record_verdict(world: &mut AclWorld, address: String) {
    let verdict = world.verdict(&address);
    world.recorded.push((address, verdict));
}

#[then(expr = "{string} is allowed")]
async fn then_allowed(world: &mut AclWorld, address: String) {
    assert!(world.verdict(&address), "{} should be allowed", address);
}

#[then(expr = "{string} is denied")]
async fn then_denied(world: &mut AclWorld, address: String) {
    assert!(!world.verdict(&address), "{} should be denied", address);
}

#[then("the pattern is rejected as invalid")]
async fn then_rejected(world: &mut AclWorld) {
    let err = world.last_error.as_ref().expect("expected the rule to be rejected");
    assert!(err.is_invalid_pattern(), "unexpected error: {}", err);
}

#[then("the recorded verdicts are unchanged")]
async fn then_recorded_unchanged(world: &mut AclWorld) {
    for (address, before) in &world.recorded {
        assert_eq!(world.verdict(address), *before, "verdict for {} changed", address);
    }
}

#[then(expr = "the controller holds {int} rule(s)")]
async fn then_rule_count(world: &mut AclWorld, count: usize) {
    assert_eq!(world.controller.len(), count);
}
