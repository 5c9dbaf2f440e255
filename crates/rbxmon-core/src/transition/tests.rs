//! Tests for the transition engine.

use chrono::Utc;
use rbxmon_models::{EventKind, PresenceKind, PresenceSnapshot};

use super::*;

fn in_game(place: &str) -> PresenceSnapshot {
    PresenceSnapshot::from_kind(PresenceKind::InGame, Some(place.to_string()), None, Utc::now())
}

fn in_universe(place: &str, universe: u64) -> PresenceSnapshot {
    PresenceSnapshot::from_kind(
        PresenceKind::InGame,
        Some(place.to_string()),
        Some(universe),
        Utc::now(),
    )
}

fn online() -> PresenceSnapshot {
    PresenceSnapshot::from_kind(PresenceKind::Online, None, None, Utc::now())
}

fn offline() -> PresenceSnapshot {
    PresenceSnapshot::offline(Utc::now())
}

fn targeting(place: u64) -> TransitionEngine {
    TransitionEngine::new(TransitionPolicy::new().with_target(TargetFilter {
        place_id: Some(place),
        universe_id: None,
        display_name: None,
    }))
}

fn labels(events: &[EventKind]) -> Vec<&'static str> {
    events.iter().map(EventKind::label).collect()
}

#[test]
fn test_first_observation_in_game_joins() {
    let engine = TransitionEngine::default();
    let mut state = MonitorState::default();

    let events = engine.evaluate(&mut state, in_game("P"));

    assert_eq!(
        events,
        vec![EventKind::JoinedGame {
            place_id: "P".to_string(),
            universe_id: None,
            game_name: None,
        }]
    );
    assert!(state.last_snapshot.is_some());
}

#[test]
fn test_first_observation_never_leaves_or_goes_offline() {
    let engine = TransitionEngine::new(TransitionPolicy::new().with_notify_on_offline(true));

    for snapshot in [online(), offline()] {
        let mut state = MonitorState::default();
        assert!(engine.evaluate(&mut state, snapshot).is_empty());
    }
}

#[test]
fn test_in_game_without_place_does_not_join() {
    let engine = TransitionEngine::default();
    let mut state = MonitorState::default();

    let snapshot = PresenceSnapshot::from_kind(PresenceKind::InGame, None, Some(5), Utc::now());
    assert!(engine.evaluate(&mut state, snapshot).is_empty());
}

#[test]
fn test_first_observation_respects_target() {
    let engine = targeting(100);

    let mut state = MonitorState::default();
    assert!(engine.evaluate(&mut state, in_game("200")).is_empty());

    let mut state = MonitorState::default();
    assert_eq!(labels(&engine.evaluate(&mut state, in_game("100"))), vec!["joined_game"]);
}

#[test]
fn test_online_to_game_joins() {
    let engine = TransitionEngine::default();
    let mut state = MonitorState::default();

    engine.evaluate(&mut state, online());
    let events = engine.evaluate(&mut state, in_game("P"));

    assert_eq!(labels(&events), vec!["joined_game"]);
}

#[test]
fn test_leave_is_reported_once() {
    let engine = TransitionEngine::default();
    let mut state = MonitorState::default();

    engine.evaluate(&mut state, in_game("P"));

    let events = engine.evaluate(&mut state, online());
    assert_eq!(
        events,
        vec![EventKind::LeftGame {
            place_id: Some("P".to_string()),
            game_name: None,
        }]
    );
    assert_eq!(state.last_notified_leave_place_id.as_deref(), Some("P"));

    assert!(engine.evaluate(&mut state, online()).is_empty());
}

#[test]
fn test_reentry_rearms_leave() {
    let engine = TransitionEngine::default();
    let mut state = MonitorState::default();

    engine.evaluate(&mut state, in_game("P"));
    assert_eq!(labels(&engine.evaluate(&mut state, online())), vec!["left_game"]);
    assert!(engine.evaluate(&mut state, online()).is_empty());

    assert_eq!(labels(&engine.evaluate(&mut state, in_game("P"))), vec!["joined_game"]);
    assert_eq!(state.last_notified_leave_place_id, None);

    assert_eq!(labels(&engine.evaluate(&mut state, online())), vec!["left_game"]);
}

#[test]
fn test_duplicate_leave_for_same_place_is_suppressed() {
    let engine = TransitionEngine::default();
    let mut state = MonitorState::default();

    // A previous snapshot that is in game at P while a leave from P was
    // already reported and never cleared by a poll.
    state.last_snapshot = Some(in_game("P"));
    state.mark_leave_reported(Some("P".to_string()));

    assert!(engine.evaluate(&mut state, online()).is_empty());

    // A different place is a new leave.
    state.last_snapshot = Some(in_game("Q"));
    assert_eq!(labels(&engine.evaluate(&mut state, online())), vec!["left_game"]);
    assert_eq!(state.last_notified_leave_place_id.as_deref(), Some("Q"));
}

#[test]
fn test_leave_with_unknown_place_is_reported() {
    let engine = TransitionEngine::default();
    let mut state = MonitorState::default();

    let no_place = PresenceSnapshot::from_kind(PresenceKind::InGame, None, None, Utc::now());
    engine.evaluate(&mut state, no_place);

    let events = engine.evaluate(&mut state, online());
    assert_eq!(
        events,
        vec![EventKind::LeftGame {
            place_id: None,
            game_name: None,
        }]
    );
}

#[test]
fn test_leave_carries_previous_game_name() {
    let engine = TransitionEngine::default();
    let mut state = MonitorState::default();

    engine.evaluate(&mut state, in_game("P").with_game_name(Some("Obby".to_string())));
    let events = engine.evaluate(&mut state, offline());

    assert_eq!(
        events,
        vec![EventKind::LeftGame {
            place_id: Some("P".to_string()),
            game_name: Some("Obby".to_string()),
        }]
    );
}

#[test]
fn test_switch_without_leave() {
    let engine = TransitionEngine::default();
    let mut state = MonitorState::default();

    engine.evaluate(&mut state, in_game("A"));
    let events = engine.evaluate(&mut state, in_game("B"));

    assert_eq!(
        events,
        vec![EventKind::JoinedGame {
            place_id: "B".to_string(),
            universe_id: None,
            game_name: None,
        }]
    );
}

#[test]
fn test_target_filter_edges() {
    let engine = targeting(100);

    let mut state = MonitorState::default();
    engine.evaluate(&mut state, in_game("1"));
    assert_eq!(labels(&engine.evaluate(&mut state, in_game("100"))), vec!["joined_game"]);

    // Leaving the target for another game does not join.
    assert!(engine.evaluate(&mut state, in_game("2")).is_empty());

    // Moving between two other games does not join either.
    assert!(engine.evaluate(&mut state, in_game("3")).is_empty());

    // Coming back does.
    assert_eq!(labels(&engine.evaluate(&mut state, in_game("100"))), vec!["joined_game"]);
}

#[test]
fn test_target_filter_by_universe() {
    let engine = TransitionEngine::new(TransitionPolicy::new().with_target(TargetFilter {
        place_id: None,
        universe_id: Some(7),
        display_name: None,
    }));
    let mut state = MonitorState::default();

    engine.evaluate(&mut state, in_universe("1", 8));
    assert_eq!(
        labels(&engine.evaluate(&mut state, in_universe("2", 7))),
        vec!["joined_game"]
    );

    // Another place of the same universe is still the target.
    assert!(engine.evaluate(&mut state, in_universe("3", 7)).is_empty());
}

#[test]
fn test_target_filter_still_reports_leave() {
    let engine = targeting(100);
    let mut state = MonitorState::default();

    engine.evaluate(&mut state, in_game("1"));
    assert_eq!(labels(&engine.evaluate(&mut state, online())), vec!["left_game"]);
}

#[test]
fn test_offline_gated_by_policy() {
    let quiet = TransitionEngine::default();
    let mut state = MonitorState::default();
    quiet.evaluate(&mut state, online());
    assert!(quiet.evaluate(&mut state, offline()).is_empty());

    let loud = TransitionEngine::new(TransitionPolicy::new().with_notify_on_offline(true));
    let mut state = MonitorState::default();
    loud.evaluate(&mut state, online());
    assert_eq!(labels(&loud.evaluate(&mut state, offline())), vec!["went_offline"]);
}

#[test]
fn test_leave_and_offline_in_one_poll() {
    let engine = TransitionEngine::new(TransitionPolicy::new().with_notify_on_offline(true));
    let mut state = MonitorState::default();

    engine.evaluate(&mut state, in_game("P"));
    let events = engine.evaluate(&mut state, offline());

    assert_eq!(labels(&events), vec!["left_game", "went_offline"]);
}

#[test]
fn test_leave_notifications_can_be_disabled() {
    let engine = TransitionEngine::new(TransitionPolicy::new().with_notify_on_leave(false));
    let mut state = MonitorState::default();

    engine.evaluate(&mut state, in_game("P"));
    assert!(engine.evaluate(&mut state, online()).is_empty());
}

#[test]
fn test_identical_snapshot_is_idempotent() {
    let engine = TransitionEngine::new(TransitionPolicy::new().with_notify_on_offline(true));

    for snapshot in [in_game("P"), online(), offline()] {
        let mut state = MonitorState::default();
        engine.evaluate(&mut state, in_game("X"));
        engine.evaluate(&mut state, snapshot.clone());
        assert!(
            engine.evaluate(&mut state, snapshot.clone()).is_empty(),
            "repeat of {:?} should be silent",
            snapshot.kind()
        );
    }
}

#[test]
fn test_game_name_change_is_not_a_transition() {
    let engine = TransitionEngine::default();
    let mut state = MonitorState::default();

    engine.evaluate(&mut state, in_game("P"));
    let renamed = in_game("P").with_game_name(Some("Now Named".to_string()));

    assert!(engine.evaluate(&mut state, renamed).is_empty());
    assert_eq!(
        state.last_snapshot.and_then(|s| s.game_name).as_deref(),
        Some("Now Named")
    );
}

#[test]
fn test_policy_from_config() {
    let mut config = MonitorConfig::new(["alice"]);
    config.notify_on_offline = true;
    config.target.place_id = Some(9);

    let policy = TransitionPolicy::from(&config);
    assert!(policy.notify_on_offline);
    assert!(policy.notify_on_leave);
    assert!(policy.target.is_active());
}
