use chrono::{Duration, Utc};
use obc_dispatch::{Command, CommandStatus, DispatchError};

#[test]
fn test_new_command_is_pending() {
    let cmd = Command::new(1, Some("100,20.5".to_string()));
    assert_eq!(cmd.status, CommandStatus::Pending);
    assert_eq!(cmd.id, None);
    assert_eq!(cmd.created_on, cmd.updated_on);
}

#[test]
fn test_success_path() {
    let mut cmd = Command::new(1, None);
    cmd.transition(CommandStatus::Sent).unwrap();
    cmd.transition(CommandStatus::Acknowledged).unwrap();
    cmd.transition(CommandStatus::Executed).unwrap();
    assert_eq!(cmd.status, CommandStatus::Executed);
    assert!(cmd.is_terminal());
}

#[test]
fn test_no_transition_out_of_executed() {
    let mut cmd = Command::new(1, None);
    for next in [CommandStatus::Sent, CommandStatus::Acknowledged, CommandStatus::Executed] {
        cmd.transition(next).unwrap();
    }
    let before = cmd.clone();

    let err = cmd.transition(CommandStatus::Sent).unwrap_err();
    match err {
        DispatchError::InvalidTransition { from, to } => {
            assert_eq!(from, CommandStatus::Executed);
            assert_eq!(to, CommandStatus::Sent);
        }
        other => panic!("Expected InvalidTransition, got {other:?}"),
    }
    assert_eq!(cmd, before);
}

#[test]
fn test_pending_can_fail() {
    let mut cmd = Command::new(1, None);
    cmd.transition(CommandStatus::Failed).unwrap();
    assert_eq!(cmd.status, CommandStatus::Failed);
}

#[test]
fn test_every_non_terminal_status_can_fail() {
    for status in [CommandStatus::Pending, CommandStatus::Sent, CommandStatus::Acknowledged] {
        assert!(status.can_transition_to(CommandStatus::Failed), "{status} -> FAILED");
    }
    assert!(!CommandStatus::Executed.can_transition_to(CommandStatus::Failed));
    assert!(!CommandStatus::Failed.can_transition_to(CommandStatus::Failed));
}

#[test]
fn test_skipping_states_rejected() {
    let mut cmd = Command::new(1, None);
    assert!(matches!(
        cmd.transition(CommandStatus::Acknowledged),
        Err(DispatchError::InvalidTransition { .. })
    ));
    assert!(matches!(
        cmd.transition(CommandStatus::Executed),
        Err(DispatchError::InvalidTransition { .. })
    ));
    assert!(matches!(
        cmd.transition(CommandStatus::Pending),
        Err(DispatchError::InvalidTransition { .. })
    ));
    assert_eq!(cmd.status, CommandStatus::Pending);
}

#[test]
fn test_update_params_on_failed_rejected() {
    let mut cmd = Command::new(1, Some("1,2".to_string()));
    cmd.transition(CommandStatus::Failed).unwrap();
    let updated_on = cmd.updated_on;

    let err = cmd.update_params(Some("3,4".to_string())).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::ImmutableRecord { status: CommandStatus::Failed, .. }
    ));
    assert_eq!(cmd.params.as_deref(), Some("1,2"));
    assert_eq!(cmd.updated_on, updated_on);
}

#[test]
fn test_immutable_record_message_with_and_without_id() {
    let mut cmd = Command::new(1, None);
    cmd.transition(CommandStatus::Failed).unwrap();

    let err = cmd.update_params(None).unwrap_err();
    assert!(matches!(err, DispatchError::ImmutableRecord { id: None, .. }));
    assert_eq!(err.to_string(), "command is FAILED and can no longer be modified");

    cmd.id = Some(12);
    let err = cmd.update_params(None).unwrap_err();
    assert_eq!(err.to_string(), "command 12 is FAILED and can no longer be modified");
}

#[test]
fn test_update_params_while_in_flight() {
    let mut cmd = Command::new(1, None);
    cmd.transition(CommandStatus::Sent).unwrap();
    cmd.update_params(Some("5".to_string())).unwrap();
    assert_eq!(cmd.params.as_deref(), Some("5"));
    cmd.update_params(None).unwrap();
    assert_eq!(cmd.params, None);
}

#[test]
fn test_mutations_strictly_increase_updated_on() {
    let mut cmd = Command::new(1, None);
    let created_on = cmd.created_on;
    let mut last = cmd.updated_on;

    cmd.update_params(Some("1".to_string())).unwrap();
    assert!(cmd.updated_on > last);
    last = cmd.updated_on;

    for next in [CommandStatus::Sent, CommandStatus::Acknowledged, CommandStatus::Executed] {
        cmd.transition(next).unwrap();
        assert!(cmd.updated_on > last);
        last = cmd.updated_on;
    }

    assert_eq!(cmd.created_on, created_on);
}

#[test]
fn test_updated_on_advances_past_future_timestamp() {
    let mut cmd = Command::new(1, None);
    let future = Utc::now() + Duration::days(1);
    cmd.updated_on = future;
    cmd.transition(CommandStatus::Sent).unwrap();
    assert!(cmd.updated_on > future);
}

#[test]
fn test_status_parse_and_display() {
    assert_eq!("PENDING".parse::<CommandStatus>().unwrap(), CommandStatus::Pending);
    assert_eq!("acknowledged".parse::<CommandStatus>().unwrap(), CommandStatus::Acknowledged);
    assert_eq!(" Failed ".parse::<CommandStatus>().unwrap(), CommandStatus::Failed);
    assert!(matches!(
        "LOST".parse::<CommandStatus>(),
        Err(DispatchError::UnknownStatus(_))
    ));
    assert_eq!(CommandStatus::Executed.to_string(), "EXECUTED");
    assert_eq!(CommandStatus::default(), CommandStatus::Pending);
}

#[test]
fn test_status_serializes_upper_case() {
    assert_eq!(serde_json::to_string(&CommandStatus::Acknowledged).unwrap(), "\"ACKNOWLEDGED\"");
    let status: CommandStatus = serde_json::from_str("\"SENT\"").unwrap();
    assert_eq!(status, CommandStatus::Sent);
}

#[test]
fn test_validation_errors_are_flagged() {
    let err = DispatchError::InvalidTransition {
        from: CommandStatus::Executed,
        to: CommandStatus::Sent,
    };
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "invalid status transition from EXECUTED to SENT");
}
