//! Property tests for the tick loop
//!
//! For any sequence of task start/finish events, after each tick the
//! spinner is on exactly when the registry is non-empty.

use proptest::prelude::*;
use spinshell::shell::SpinnerChange;
use spinshell::{ShellPhase, ShutdownHandle, TaskRegistry, Ticker};

#[derive(Debug, Clone)]
enum Op {
    Start,
    Finish(usize),
    Tick,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Start),
        (0usize..8).prop_map(Op::Finish),
        Just(Op::Tick),
    ]
}

proptest! {
    #[test]
    fn spinner_tracks_registry(ops in prop::collection::vec(op(), 0..64)) {
        let registry = TaskRegistry::new();
        let shutdown = ShutdownHandle::new();
        let mut ticker = Ticker::new();
        let mut running = Vec::new();

        for op in ops {
            match op {
                Op::Start => running.push(registry.reserve("task")),
                Op::Finish(i) if !running.is_empty() => {
                    let id = running.remove(i % running.len());
                    prop_assert!(registry.remove(id));
                }
                Op::Finish(_) => {}
                Op::Tick => {
                    let was_spinning = ticker.is_spinning();
                    let report = ticker.tick(&registry, &shutdown);

                    prop_assert_eq!(report.spinning, !registry.is_empty());
                    prop_assert_eq!(ticker.is_spinning(), !running.is_empty());

                    let expected_change = match (was_spinning, report.spinning) {
                        (false, true) => SpinnerChange::Start,
                        (true, false) => SpinnerChange::Stop,
                        _ => SpinnerChange::Unchanged,
                    };
                    prop_assert_eq!(report.spinner, expected_change);

                    let expected_phase = if running.is_empty() {
                        ShellPhase::Idle
                    } else {
                        ShellPhase::Loading
                    };
                    prop_assert_eq!(report.phase, expected_phase);
                }
            }
        }
    }

    #[test]
    fn exit_flag_always_closes(starts in 0usize..5, ticks_before in 0usize..5) {
        let registry = TaskRegistry::new();
        let shutdown = ShutdownHandle::new();
        let mut ticker = Ticker::new();

        for _ in 0..starts {
            registry.reserve("task");
        }
        for _ in 0..ticks_before {
            prop_assert!(!ticker.tick(&registry, &shutdown).should_close());
        }

        shutdown.request_shutdown();
        prop_assert!(ticker.tick(&registry, &shutdown).should_close());
        prop_assert_eq!(ticker.phase(), ShellPhase::Closing);
    }
}
