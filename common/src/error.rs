//! The error taxonomy shared by every layer above the native boundary.

use thiserror::Error;

/// Errors surfaced by enumeration and by dial-engine entry points.
///
/// Terminal dial outcomes (`Cancelled`, `TimedOut`) are deliberately *not*
/// errors; they are [`DialState`](crate::dial::state::DialState) variants
/// delivered through the completion notification. Likewise "buffer too
/// small" never reaches callers: the invoker consumes it as a growth hint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialError {
    /// The native layer broke the buffered-call contract, or the invoker
    /// would have had to read past the buffer to honor the reported element
    /// count. Fatal; never retried.
    #[error("buffer protocol violation: {detail}")]
    BufferProtocolViolation { detail: String },

    /// A native primitive returned an error status. The raw code is
    /// preserved for display and for matching against OS documentation.
    #[error("native call failed with code {0}")]
    NativeCallFailure(u32),

    /// `start()` was called while this engine instance still owns an
    /// in-flight attempt.
    #[error("a dial attempt is already in progress")]
    AlreadyDialing,

    /// `cancel()` was called while idle or already terminal.
    #[error("no dial attempt is in progress")]
    NotDialing,

    /// The delivery context was torn down; pending notifications cannot run.
    #[error("notification context is unavailable")]
    ContextUnavailable,
}
