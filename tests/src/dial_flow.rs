use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use dialr_common::dial::request::{Credentials, DialRequest};
use dialr_common::dial::state::{DialPhase, DialState};
use dialr_core::context::{ThreadContext, TokioContext};
use dialr_core::dialer::{DialCompletion, Dialer};
use dialr_core::enumerate;
use dialr_native::sim::{DialScript, ScriptedOutcome};

use crate::util::office_and_home;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

fn office_request() -> DialRequest {
    DialRequest::new("Office", Credentials::new("alice", "hunter2"))
}

fn completion_channel(dialer: &Dialer) -> mpsc::Receiver<DialCompletion> {
    let (tx, rx) = mpsc::channel();
    dialer.on_completed(move |completion| {
        let _ = tx.send(completion);
    });
    rx
}

/// The full success path: every scripted phase is delivered, in order,
/// before the `Connected` completion hands over the owned handle.
#[test]
fn connected_flow_reports_phases_then_transfers_ownership() {
    let sim = office_and_home();
    let dialer = Dialer::new(sim.clone(), Arc::new(ThreadContext::new()));

    let phases = Arc::new(Mutex::new(Vec::new()));
    let seen = phases.clone();
    dialer.on_state_changed(move |state| {
        if let DialState::Dialing(phase) = state {
            seen.lock().unwrap().push(phase);
        }
    });
    let rx = completion_channel(&dialer);

    let pending = dialer.start(office_request()).unwrap();
    let completion = rx.recv_timeout(RECV_TIMEOUT).unwrap();

    assert_eq!(
        *phases.lock().unwrap(),
        [
            DialPhase::OpeningDevice,
            DialPhase::DeviceConnecting,
            DialPhase::Authenticating,
            DialPhase::Negotiating,
        ]
    );

    let DialCompletion::Connected(handle) = completion else {
        panic!("expected Connected, got {completion:?}");
    };
    assert_eq!(handle.raw(), pending);
    assert_eq!(dialer.state(), DialState::Connected);

    let connection = enumerate::find_connection(sim.as_ref(), handle.raw())
        .unwrap()
        .unwrap();
    assert_eq!(connection.entry_name, "Office");
    assert!(connection.client_address.is_some());

    handle.hangup().unwrap();
    assert!(enumerate::enumerate_connections(sim.as_ref()).unwrap().is_empty());
}

/// Cancelling mid-attempt ends in `Cancelled` and never leaves a live
/// connection behind.
#[test]
fn cancel_mid_dial_ends_cancelled_and_leaves_no_connection() {
    let sim = office_and_home();
    sim.script_dial(
        "Office",
        DialScript {
            outcome: ScriptedOutcome::AwaitCancel,
            phase_delay: Duration::from_millis(5),
            ..DialScript::default()
        },
    );
    let dialer = Dialer::new(sim.clone(), Arc::new(ThreadContext::new()));

    let (phase_tx, phase_rx) = mpsc::channel();
    dialer.on_state_changed(move |state| {
        let _ = phase_tx.send(state);
    });
    let rx = completion_channel(&dialer);

    dialer.start(office_request()).unwrap();
    // Let the attempt make observable progress before pulling the plug.
    phase_rx.recv_timeout(RECV_TIMEOUT).unwrap();
    dialer.cancel().unwrap();

    let completion = rx.recv_timeout(RECV_TIMEOUT).unwrap();
    assert!(matches!(completion, DialCompletion::Cancelled));
    assert_eq!(dialer.state(), DialState::Cancelled);
    assert!(enumerate::enumerate_connections(sim.as_ref()).unwrap().is_empty());
}

/// Ownership is scoped: dropping the connected handle hangs the native
/// connection up without an explicit call.
#[test]
fn dropping_the_owned_handle_hangs_up() {
    let sim = office_and_home();
    let dialer = Dialer::new(sim.clone(), Arc::new(ThreadContext::new()));
    let rx = completion_channel(&dialer);

    dialer.start(office_request()).unwrap();
    let completion = rx.recv_timeout(RECV_TIMEOUT).unwrap();
    let DialCompletion::Connected(handle) = completion else {
        panic!("expected Connected, got {completion:?}");
    };
    assert_eq!(enumerate::enumerate_connections(sim.as_ref()).unwrap().len(), 1);

    drop(handle);
    assert!(enumerate::enumerate_connections(sim.as_ref()).unwrap().is_empty());
}

/// The engine can start again after a terminal state; a second attempt on
/// the same engine connects independently.
#[test]
fn engine_is_reusable_after_a_terminal_state() {
    let sim = office_and_home();
    let dialer = Dialer::new(sim.clone(), Arc::new(ThreadContext::new()));
    let rx = completion_channel(&dialer);

    dialer.start(office_request()).unwrap();
    let first = rx.recv_timeout(RECV_TIMEOUT).unwrap();
    let DialCompletion::Connected(first_handle) = first else {
        panic!("expected Connected, got {first:?}");
    };
    first_handle.hangup().unwrap();

    dialer
        .start(DialRequest::new("Home", Credentials::new("alice", "hunter2")))
        .unwrap();
    let second = rx.recv_timeout(RECV_TIMEOUT).unwrap();
    let DialCompletion::Connected(second_handle) = second else {
        panic!("expected Connected, got {second:?}");
    };
    let connection = enumerate::find_connection(sim.as_ref(), second_handle.raw())
        .unwrap()
        .unwrap();
    assert_eq!(connection.entry_name, "Home");
    second_handle.hangup().unwrap();
}

/// The same flow driven through a tokio runtime context: notifications run
/// on the runtime while the test waits off it.
#[tokio::test]
async fn tokio_context_drives_a_full_attempt() {
    let sim = office_and_home();
    let context = Arc::new(TokioContext::current());
    let dialer = Dialer::new(sim.clone(), context);

    let phases = Arc::new(Mutex::new(Vec::new()));
    let seen = phases.clone();
    dialer.on_state_changed(move |state| {
        if let DialState::Dialing(phase) = state {
            seen.lock().unwrap().push(phase);
        }
    });
    let rx = completion_channel(&dialer);

    dialer.start(office_request()).unwrap();
    let completion = tokio::task::spawn_blocking(move || rx.recv_timeout(RECV_TIMEOUT))
        .await
        .unwrap()
        .unwrap();

    let DialCompletion::Connected(handle) = completion else {
        panic!("expected Connected, got {completion:?}");
    };
    assert_eq!(phases.lock().unwrap().len(), 4);
    handle.hangup().unwrap();
}
