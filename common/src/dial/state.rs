//! # Dial State Model
//!
//! The observable lifecycle of one dial attempt.
//!
//! Transitions are strictly forward: `Idle → Dialing(..) → terminal`. The
//! sub-phase inside `Dialing` mirrors whatever the native layer reports and
//! may advance through any subset of [`DialPhase`], but once a terminal
//! state is committed no further transition exists for that attempt.

use std::fmt;

/// One native sub-phase of an in-flight dial, reported verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialPhase {
    /// The attempt was accepted and a port/handle was acquired.
    Initiated,
    /// The device (modem, VPN adapter) is being opened.
    OpeningDevice,
    /// The device is connecting to the remote peer.
    DeviceConnecting,
    /// Credentials are being verified.
    Authenticating,
    /// Link parameters are being negotiated.
    Negotiating,
}

impl fmt::Display for DialPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DialPhase::Initiated => "initiated",
            DialPhase::OpeningDevice => "opening device",
            DialPhase::DeviceConnecting => "connecting",
            DialPhase::Authenticating => "authenticating",
            DialPhase::Negotiating => "negotiating",
        };
        f.write_str(name)
    }
}

/// Why an attempt ended in [`DialState::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialFailure {
    /// A native primitive reported this error code.
    NativeError(u32),
    /// The notification context was torn down mid-attempt.
    ContextUnavailable,
}

impl fmt::Display for DialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialFailure::NativeError(code) => write!(f, "native error {code}"),
            DialFailure::ContextUnavailable => f.write_str("notification context unavailable"),
        }
    }
}

/// The state of a dial engine with respect to its current (or last) attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialState {
    /// No attempt has been started, or the engine is ready for a new one.
    Idle,
    /// An attempt is in flight; the payload is the latest native phase.
    Dialing(DialPhase),
    /// Terminal: the connection is up and the caller owns the handle.
    Connected,
    /// Terminal: a cancel request won the race.
    Cancelled,
    /// Terminal: the request's timeout elapsed before the native layer
    /// produced an outcome.
    TimedOut,
    /// Terminal: the native layer reported an error, or notifications could
    /// no longer be delivered.
    Failed(DialFailure),
}

impl DialState {
    /// True for the four states from which no further transition occurs.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DialState::Connected
                | DialState::Cancelled
                | DialState::TimedOut
                | DialState::Failed(_)
        )
    }
}

impl fmt::Display for DialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialState::Idle => f.write_str("idle"),
            DialState::Dialing(phase) => write!(f, "dialing ({phase})"),
            DialState::Connected => f.write_str("connected"),
            DialState::Cancelled => f.write_str("cancelled"),
            DialState::TimedOut => f.write_str("timed out"),
            DialState::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_are_terminal() {
        assert!(DialState::Connected.is_terminal());
        assert!(DialState::Cancelled.is_terminal());
        assert!(DialState::TimedOut.is_terminal());
        assert!(DialState::Failed(DialFailure::NativeError(691)).is_terminal());
    }

    #[test]
    fn live_states_are_not_terminal() {
        assert!(!DialState::Idle.is_terminal());
        assert!(!DialState::Dialing(DialPhase::Authenticating).is_terminal());
    }
}
