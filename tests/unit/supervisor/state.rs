use super::*;

#[test]
fn warm_loop_and_cold_paths_are_legal() {
    let s = WorkerState::default();
    let s = s.transition(WorkerState::Launching).unwrap();
    let s = s.transition(WorkerState::Ready).unwrap();
    let s = s.transition(WorkerState::Rendering).unwrap();
    let s = s.transition(WorkerState::Ready).unwrap();
    let s = s.transition(WorkerState::Rendering).unwrap();
    assert_eq!(s.transition(WorkerState::Exited).unwrap(), WorkerState::Exited);
    assert_eq!(s.transition(WorkerState::Failed).unwrap(), WorkerState::Failed);
}

#[test]
fn illegal_transitions_are_rejected() {
    use WorkerState::*;
    for (from, to) in [
        (NotStarted, Ready),
        (NotStarted, Rendering),
        (Launching, Rendering),
        (Exited, Launching),
        (Failed, Ready),
        (Exited, Failed),
        (Ready, Launching),
    ] {
        let err = from.transition(to).unwrap_err();
        assert!(matches!(err, BridgeError::Render(_)), "{from} -> {to}");
    }
}

#[test]
fn terminal_states() {
    assert!(WorkerState::Exited.is_terminal());
    assert!(WorkerState::Failed.is_terminal());
    assert!(!WorkerState::Ready.is_terminal());
    assert_eq!(WorkerState::NotStarted.to_string(), "not_started");
}
