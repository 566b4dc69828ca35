//! # Dial Engine
//!
//! A single-owner state machine around the blocking native dial primitive.
//!
//! `start` returns immediately: the blocking call runs on its own background
//! thread, native callbacks are re-delivered in arrival order through the
//! engine's [`ExecutionContext`], and the attempt ends in exactly one
//! terminal state no matter how completion, cancellation and timeout race.
//! On `Connected` the caller receives exclusive ownership of the handle; on
//! every other terminal state the engine invalidates it.

use std::sync::{Arc, Mutex};
use std::thread;

use dialr_common::dial::request::DialRequest;
use dialr_common::dial::state::{DialFailure, DialPhase, DialState};
use dialr_common::error::DialError;
use dialr_common::phonebook::connection::RawHandle;
use dialr_native::api::{DialOutcome, NativeDialApi, NativeDialEvent, NativeDialParams};
use dialr_native::status::NativeStatus;

use crate::context::ExecutionContext;
use crate::handle::ConnectionHandle;

/// The completion notification for one attempt.
#[derive(Debug)]
pub enum DialCompletion {
    /// The attempt succeeded; ownership of the handle transfers herewith.
    Connected(ConnectionHandle),
    Cancelled,
    TimedOut,
    Failed(DialFailure),
}

type StateHandler = Arc<dyn Fn(DialState) + Send + Sync>;
type CompletionHandler = Arc<dyn Fn(DialCompletion) + Send + Sync>;

/// One dial attempt's commit slot. The slot is the single point of truth
/// for "which terminal state won"; everything else observes it.
struct Attempt {
    handle: RawHandle,
    terminal: Mutex<Option<DialState>>,
}

struct EngineInner {
    state: DialState,
    attempt: Option<Arc<Attempt>>,
}

struct EngineShared {
    api: Arc<dyn NativeDialApi>,
    context: Arc<dyn ExecutionContext>,
    inner: Mutex<EngineInner>,
    on_state: Mutex<Option<StateHandler>>,
    on_completed: Mutex<Option<CompletionHandler>>,
}

/// The dial engine. One instance drives at most one attempt at a time;
/// callers wanting parallel attempts hold one engine each.
pub struct Dialer {
    shared: Arc<EngineShared>,
}

impl Dialer {
    pub fn new(api: Arc<dyn NativeDialApi>, context: Arc<dyn ExecutionContext>) -> Self {
        Self {
            shared: Arc::new(EngineShared {
                api,
                context,
                inner: Mutex::new(EngineInner {
                    state: DialState::Idle,
                    attempt: None,
                }),
                on_state: Mutex::new(None),
                on_completed: Mutex::new(None),
            }),
        }
    }

    /// Registers the state-changed subscriber. Called on the engine's
    /// context for every native phase transition, in arrival order.
    pub fn on_state_changed(&self, handler: impl Fn(DialState) + Send + Sync + 'static) {
        *self.shared.on_state.lock().unwrap() = Some(Arc::new(handler));
    }

    /// Registers the completion subscriber. Called on the engine's context
    /// exactly once per attempt.
    pub fn on_completed(&self, handler: impl Fn(DialCompletion) + Send + Sync + 'static) {
        *self.shared.on_completed.lock().unwrap() = Some(Arc::new(handler));
    }

    /// Current engine state. Live states are transient by nature; terminal
    /// states stick until the next `start`.
    pub fn state(&self) -> DialState {
        self.shared.inner.lock().unwrap().state
    }

    /// Begins one dial attempt and returns its raw handle immediately.
    ///
    /// The returned value is for display and correlation only; the *owned*
    /// handle arrives through the `Connected` completion. Attempt failures
    /// are reported through the completion notification, never from here.
    pub fn start(&self, request: DialRequest) -> Result<RawHandle, DialError> {
        let attempt = {
            let mut inner = self.shared.inner.lock().unwrap();
            if matches!(inner.state, DialState::Dialing(_)) {
                return Err(DialError::AlreadyDialing);
            }
            let attempt = Arc::new(Attempt {
                handle: self.shared.api.allocate_handle(),
                terminal: Mutex::new(None),
            });
            inner.state = DialState::Dialing(DialPhase::Initiated);
            inner.attempt = Some(attempt.clone());
            attempt
        };
        tracing::info!(entry = %request.entry_name, handle = %attempt.handle, "dial attempt started");

        if let Some(timeout) = request.timeout {
            let shared = self.shared.clone();
            let watchdog = attempt.clone();
            thread::spawn(move || {
                thread::sleep(timeout);
                if watchdog.terminal.lock().unwrap().is_some() {
                    return; // the attempt already ended; nothing to enforce
                }
                EngineShared::commit_terminal(&shared, &watchdog, DialState::TimedOut);
            });
        }

        let params = NativeDialParams::from_request(&request);
        let shared = self.shared.clone();
        let worker = attempt.clone();
        thread::spawn(move || {
            let callback = |event: NativeDialEvent| match event {
                NativeDialEvent::Phase(phase) => {
                    EngineShared::forward_phase(&shared, &worker, phase);
                }
                NativeDialEvent::Done(outcome) => {
                    EngineShared::commit_terminal(&shared, &worker, terminal_for(outcome));
                }
            };
            let status = shared.api.dial(&params, worker.handle, &callback);
            // A well-behaved backend emits Done before returning an error
            // status. Surface it regardless; the commit slot deduplicates.
            if let NativeStatus::Error(code) = status {
                EngineShared::commit_terminal(
                    &shared,
                    &worker,
                    DialState::Failed(DialFailure::NativeError(code)),
                );
            }
        });

        Ok(attempt.handle)
    }

    /// Submits a native cancel request for the in-flight attempt.
    ///
    /// Guarantees submission, not the outcome: a concurrently arriving
    /// `Connected` may still win the terminal race. When no attempt is in
    /// flight this reports [`DialError::NotDialing`] and changes nothing.
    pub fn cancel(&self) -> Result<(), DialError> {
        let attempt = {
            let inner = self.shared.inner.lock().unwrap();
            match (&inner.state, &inner.attempt) {
                (DialState::Dialing(_), Some(attempt)) => attempt.clone(),
                _ => return Err(DialError::NotDialing),
            }
        };
        tracing::info!(handle = %attempt.handle, "cancel requested");
        match self.shared.api.cancel(attempt.handle) {
            NativeStatus::Success => Ok(()),
            NativeStatus::Error(code) => Err(DialError::NativeCallFailure(code)),
            NativeStatus::BufferTooSmall { .. } => Err(DialError::BufferProtocolViolation {
                detail: "cancel reported buffer-too-small".into(),
            }),
        }
    }
}

fn terminal_for(outcome: DialOutcome) -> DialState {
    match outcome {
        DialOutcome::Connected => DialState::Connected,
        DialOutcome::Cancelled => DialState::Cancelled,
        DialOutcome::Failed(code) => DialState::Failed(DialFailure::NativeError(code)),
    }
}

impl EngineShared {
    fn forward_phase(shared: &Arc<EngineShared>, attempt: &Arc<Attempt>, phase: DialPhase) {
        if attempt.terminal.lock().unwrap().is_some() {
            tracing::debug!(%phase, "phase event after terminal state dropped");
            return;
        }
        {
            let mut inner = shared.inner.lock().unwrap();
            if inner
                .attempt
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(current, attempt))
            {
                inner.state = DialState::Dialing(phase);
            }
        }
        let handler = shared.on_state.lock().unwrap().clone();
        let Some(handler) = handler else { return };
        // The native thread waits for the listener: the native layer must
        // not run ahead of a callback it considers part of the transition.
        let delivered = shared
            .context
            .blocking_wait(Box::new(move || handler(DialState::Dialing(phase))));
        if delivered.is_err() {
            EngineShared::commit_terminal(
                shared,
                attempt,
                DialState::Failed(DialFailure::ContextUnavailable),
            );
        }
    }

    /// Commits a terminal state for `attempt`. First writer wins; later
    /// terminal events for the same attempt are dropped and logged.
    fn commit_terminal(shared: &Arc<EngineShared>, attempt: &Arc<Attempt>, terminal: DialState) {
        debug_assert!(terminal.is_terminal());
        {
            let mut slot = attempt.terminal.lock().unwrap();
            if let Some(committed) = *slot {
                tracing::warn!(
                    dropped = %terminal,
                    committed = %committed,
                    handle = %attempt.handle,
                    "late terminal callback dropped"
                );
                return;
            }
            *slot = Some(terminal);
        }

        {
            let mut inner = shared.inner.lock().unwrap();
            if inner
                .attempt
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(current, attempt))
            {
                inner.state = terminal;
                inner.attempt = None;
            }
        }

        let completion = match terminal {
            DialState::Connected => {
                DialCompletion::Connected(ConnectionHandle::claim(shared.api.clone(), attempt.handle))
            }
            DialState::Cancelled => {
                Self::invalidate(shared, attempt.handle);
                DialCompletion::Cancelled
            }
            DialState::TimedOut => {
                // The native side may still be blocked in the dial call;
                // ask it to stop before invalidating.
                let _ = shared.api.cancel(attempt.handle);
                Self::invalidate(shared, attempt.handle);
                DialCompletion::TimedOut
            }
            DialState::Failed(reason) => {
                // A failure committed on the engine's side (for example a
                // dead context) can leave the native side mid-dial too.
                let _ = shared.api.cancel(attempt.handle);
                Self::invalidate(shared, attempt.handle);
                DialCompletion::Failed(reason)
            }
            DialState::Idle | DialState::Dialing(_) => return,
        };

        let handler = shared.on_completed.lock().unwrap().clone();
        let Some(handler) = handler else { return };
        let posted = shared.context.post(Box::new(move || handler(completion)));
        if posted.is_err() {
            // The completion (and any owned handle inside it) was dropped
            // with the rejected callback, which hangs the connection up.
            tracing::error!(handle = %attempt.handle, "completion notification lost, context unavailable");
            let mut inner = shared.inner.lock().unwrap();
            if inner.attempt.is_none() && inner.state == terminal {
                inner.state = DialState::Failed(DialFailure::ContextUnavailable);
            }
        }
    }

    fn invalidate(shared: &EngineShared, handle: RawHandle) {
        let status = shared.api.hangup(handle);
        tracing::debug!(%handle, ?status, "handle invalidated");
    }
}
