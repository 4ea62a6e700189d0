//! Property-based tests for transitions and dispatch.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use stagehand::core::{Notification, State};
use stagehand::machine::{MachineConfig, RedundantTransitionPolicy, TransitionError};
use stagehand::notification::{DispatchFault, NotificationCenter, ObserverId};
use stagehand::{notification_enum, state_enum, StateMachine, StateMachineBuilder};
use std::sync::{Arc, Mutex};

state_enum! {
    enum TestState {
        InGame,
        Pause,
        EndGame,
        CutScene,
        ExitingLevel,
    }
}

notification_enum! {
    enum TestNotification {
        InGameEnter,
        InGameExit,
        PauseEnter,
        PauseExit,
        EndGameEnter,
        EndGameExit,
        CutSceneEnter,
        CutSceneExit,
        ExitingLevelEnter,
        ExitingLevelExit,
    }
}

fn enter_of(state: TestState) -> TestNotification {
    TestNotification::ALL[state_index(state) * 2]
}

fn exit_of(state: TestState) -> TestNotification {
    TestNotification::ALL[state_index(state) * 2 + 1]
}

fn state_index(state: TestState) -> usize {
    TestState::ALL
        .iter()
        .position(|s| *s == state)
        .unwrap()
}

type Log = Arc<Mutex<Vec<(TestNotification, Option<TestState>, TestState)>>>;

fn recording_machine(config: MachineConfig) -> (Arc<StateMachine<TestState, TestNotification>>, Log) {
    let mut builder = StateMachineBuilder::new().config(config);
    for state in TestState::ALL {
        builder = builder.state(*state, enter_of(*state), exit_of(*state));
    }
    let machine = builder.build().unwrap();

    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let observer = ObserverId::new();
    for notification in TestNotification::ALL {
        let log = Arc::clone(&log);
        let notification = *notification;
        machine
            .center()
            .add_observer(observer, notification, move |change| {
                log.lock()
                    .unwrap()
                    .push((notification, change.previous, change.new));
                Ok(())
            });
    }
    (machine, log)
}

prop_compose! {
    fn arbitrary_state()(variant in 0..5usize) -> TestState {
        TestState::ALL[variant]
    }
}

proptest! {
    #[test]
    fn state_name_is_stable(state in arbitrary_state()) {
        let enter = enter_of(state);
        let exit = exit_of(state);
        prop_assert_eq!(state.name(), state.name());
        prop_assert_eq!(enter.name(), format!("{}Enter", state.name()));
        prop_assert_eq!(exit.name(), format!("{}Exit", state.name()));
    }

    #[test]
    fn transitions_post_exit_then_enter(
        initial in arbitrary_state(),
        targets in prop::collection::vec(arbitrary_state(), 0..20)
    ) {
        let (machine, log) = recording_machine(MachineConfig::default());
        machine.set_initial_state(initial).unwrap();

        let mut expected = vec![(enter_of(initial), None, initial)];
        let mut path = vec![initial];
        let mut current = initial;

        for target in targets {
            let result = machine.change_state(target);
            if target == current {
                prop_assert_eq!(
                    result.unwrap_err(),
                    TransitionError::RedundantTransition { state: target.name().to_string() }
                );
            } else {
                prop_assert!(result.unwrap().is_changed());
                expected.push((exit_of(current), Some(current), target));
                expected.push((enter_of(target), Some(current), target));
                path.push(target);
                current = target;
            }
            prop_assert_eq!(machine.current_state(), Some(current));
        }

        let posted = log.lock().unwrap().clone();
        prop_assert_eq!(posted, expected);

        let history = machine.history();
        let recorded: Vec<TestState> = history.get_path().into_iter().copied().collect();
        prop_assert_eq!(recorded, path);
    }

    #[test]
    fn ignored_redundant_transitions_post_nothing(
        initial in arbitrary_state(),
        repeats in 1..5usize
    ) {
        let config = MachineConfig {
            redundant_transition: RedundantTransitionPolicy::Ignore,
            ..MachineConfig::default()
        };
        let (machine, log) = recording_machine(config);
        machine.set_initial_state(initial).unwrap();

        for _ in 0..repeats {
            prop_assert!(machine.change_state(initial).unwrap().change().is_none());
        }

        let posted = log.lock().unwrap().len();
        prop_assert_eq!(posted, 1);
        prop_assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn dispatch_follows_registration_order(count in 1..12usize) {
        let center: NotificationCenter<TestNotification> = NotificationCenter::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..count {
            let order = Arc::clone(&order);
            center.add_observer_unit(ObserverId::new(), TestNotification::PauseEnter, move || {
                order.lock().unwrap().push(i);
                Ok(())
            });
        }

        let report = center.post(&TestNotification::PauseEnter);

        prop_assert_eq!(report.delivered(), count);
        let order = order.lock().unwrap().clone();
        prop_assert_eq!(order, (0..count).collect::<Vec<_>>());
    }

    #[test]
    fn failing_observers_never_block_the_rest(faulty in prop::collection::vec(any::<bool>(), 1..12)) {
        let center: NotificationCenter<TestNotification> = NotificationCenter::new();
        let reached = Arc::new(Mutex::new(Vec::new()));

        for (i, fails) in faulty.iter().copied().enumerate() {
            let reached = Arc::clone(&reached);
            center.add_observer_unit(ObserverId::new(), TestNotification::CutSceneExit, move || {
                reached.lock().unwrap().push(i);
                if fails {
                    Err(format!("observer {} failed", i).into())
                } else {
                    Ok(())
                }
            });
        }

        let report = center.post(&TestNotification::CutSceneExit);

        let expected_faults = faulty.iter().filter(|f| **f).count();
        prop_assert_eq!(report.faults().len(), expected_faults);
        prop_assert_eq!(report.delivered(), faulty.len() - expected_faults);
        let reached = reached.lock().unwrap().clone();
        prop_assert_eq!(reached, (0..faulty.len()).collect::<Vec<_>>());
        let all_observer_faults = report
            .faults()
            .iter()
            .all(|fault| matches!(fault, DispatchFault::ObserverFault { .. }));
        prop_assert!(all_observer_faults);
    }

    #[test]
    fn removals_during_broadcast_apply_to_next_broadcast(
        count in 2..10usize,
        removed in prop::collection::vec(any::<bool>(), 10)
    ) {
        let center: Arc<NotificationCenter<TestNotification>> = Arc::new(NotificationCenter::new());
        let ids: Vec<ObserverId> = (0..count).map(|_| ObserverId::new()).collect();

        // The first observer removes a random subset of the others.
        let doomed: Vec<ObserverId> = ids[1..]
            .iter()
            .zip(&removed)
            .filter(|(_, remove)| **remove)
            .map(|(id, _)| *id)
            .collect();
        {
            let center_ref = Arc::clone(&center);
            let doomed = doomed.clone();
            center.add_observer_unit(ids[0], TestNotification::EndGameEnter, move || {
                for id in &doomed {
                    center_ref.remove_observer(*id, &TestNotification::EndGameEnter);
                }
                Ok(())
            });
        }
        for id in &ids[1..] {
            center.add_observer_unit(*id, TestNotification::EndGameEnter, || Ok(()));
        }

        let first = center.post(&TestNotification::EndGameEnter);
        let second = center.post(&TestNotification::EndGameEnter);

        prop_assert_eq!(first.delivered(), count);
        prop_assert_eq!(second.delivered(), count - doomed.len());
    }
}
