mod support;

use std::time::Duration;

use cfy_core::commands::{ActivateOptions, MaintenanceCommand};

use support::FakeManager;

fn command() -> MaintenanceCommand {
    MaintenanceCommand::new().with_poll_interval(Duration::ZERO)
}

#[test]
fn status_reports_active_flag() {
    let manager = FakeManager::new().with_maintenance_sequence(&["activated"]);
    let report = command().status(&manager).unwrap();

    assert!(report.active);
    assert_eq!(report.status, "activated");
    assert!(report.remaining_executions.is_empty());
}

#[test]
fn activate_without_wait_returns_immediately() {
    let manager = FakeManager::new();
    let report = command()
        .activate(&manager, &ActivateOptions::new())
        .unwrap();

    assert_eq!(report.status, "activating");
    assert_eq!(*manager.maintenance_calls.lock().unwrap(), ["activate"]);
}

#[test]
fn activate_wait_polls_until_active() {
    let manager =
        FakeManager::new().with_maintenance_sequence(&["activating", "activating", "activated"]);
    let report = command()
        .activate(&manager, &ActivateOptions::new().with_wait(true))
        .unwrap();

    assert!(report.active);
    assert_eq!(
        *manager.maintenance_calls.lock().unwrap(),
        ["activate", "status", "status", "status"]
    );
}

#[test]
fn timeout_requires_wait() {
    let manager = FakeManager::new();
    let err = command()
        .activate(&manager, &ActivateOptions::new().with_timeout(30))
        .unwrap_err();

    assert!(err.to_string().contains("'--timeout' was used without '--wait'"));
    assert!(manager.maintenance_calls.lock().unwrap().is_empty());
}

#[test]
fn activate_wait_times_out() {
    let manager = FakeManager::new().with_maintenance_sequence(&["activating"]);
    let cmd = MaintenanceCommand::new().with_poll_interval(Duration::from_millis(400));

    let err = cmd
        .activate(&manager, &ActivateOptions::new().with_wait(true).with_timeout(1))
        .unwrap_err();
    assert!(err.to_string().starts_with("Timed out while entering maintenance mode"));
}

#[test]
fn huge_timeout_waits_without_limit() {
    let manager = FakeManager::new().with_maintenance_sequence(&["activating", "activated"]);
    let report = command()
        .activate(
            &manager,
            &ActivateOptions::new().with_wait(true).with_timeout(u64::MAX),
        )
        .unwrap();

    assert!(report.active);
    assert_eq!(
        *manager.maintenance_calls.lock().unwrap(),
        ["activate", "status", "status"]
    );
}

#[test]
fn deactivate() {
    let manager = FakeManager::new();
    let report = command().deactivate(&manager).unwrap();
    assert!(!report.active);
    assert_eq!(*manager.maintenance_calls.lock().unwrap(), ["deactivate"]);
}
