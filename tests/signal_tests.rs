//! Integration tests for signal-driven shutdown
//!
//! These tests verify that handling a termination signal:
//! - Calls `kill` on every registered object, even after one fails
//! - Raises the window's exit flag so the next tick closes it
//! - Yields exit status -1

use mockall::mock;
use spinshell::{
    GracefulKiller, Killable, SIGNAL_EXIT_CODE, ShellError, ShutdownHandle, TaskRegistry, Ticker,
};
use std::sync::Arc;
use std::time::Duration;

mock! {
    pub Target {}

    impl Killable for Target {
        fn kill(&self) -> Result<(), ShellError>;
    }
}

#[test]
fn test_exit_flag_set_and_status_minus_one() {
    let shutdown = ShutdownHandle::new();
    let killables: Vec<Arc<dyn Killable>> = vec![Arc::new(shutdown.clone())];
    let killer = GracefulKiller::new(killables);

    let code = killer.exit_gracefully("SIGTERM");

    assert_eq!(code, SIGNAL_EXIT_CODE);
    assert_eq!(code, -1);
    assert!(shutdown.is_exit_requested());
    assert!(killer.was_triggered());

    // The UI thread picks it up on the next tick
    let mut ticker = Ticker::new();
    assert!(ticker.tick(&TaskRegistry::new(), &shutdown).should_close());
}

#[test]
fn test_failing_kill_does_not_block_others() {
    let mut failing = MockTarget::new();
    failing.expect_kill().times(1).returning(|| Err(ShellError::Kill("mock".into())));

    let shutdown = ShutdownHandle::new();
    let killables: Vec<Arc<dyn Killable>> = vec![Arc::new(failing), Arc::new(shutdown.clone())];
    let killer = GracefulKiller::new(killables);

    let code = killer.exit_gracefully("SIGINT");

    assert_eq!(code, SIGNAL_EXIT_CODE);
    assert!(shutdown.is_exit_requested());
    assert!(killer.was_triggered());
}

#[test]
fn test_every_object_killed_once() {
    let mut first = MockTarget::new();
    first.expect_kill().times(1).returning(|| Ok(()));
    let mut second = MockTarget::new();
    second.expect_kill().times(1).returning(|| Ok(()));

    let killables: Vec<Arc<dyn Killable>> = vec![Arc::new(first), Arc::new(second)];
    let killer = GracefulKiller::new(killables);

    assert_eq!(killer.exit_gracefully("SIGTERM"), SIGNAL_EXIT_CODE);
}

#[tokio::test]
async fn test_install_does_not_trigger_without_signal() {
    let shutdown = ShutdownHandle::new();
    let killables: Vec<Arc<dyn Killable>> = vec![Arc::new(shutdown.clone())];
    let killer = Arc::new(GracefulKiller::new(killables));

    Arc::clone(&killer)
        .install_with(
            &tokio::runtime::Handle::current(),
            Duration::ZERO,
            |code| panic!("exit action ran without a signal ({code})"),
        )
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(!killer.was_triggered());
    assert!(!shutdown.is_exit_requested());
}
