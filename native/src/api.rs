//! # Native API Seam
//!
//! The object-safe trait every backend implements. Enumeration primitives
//! follow the buffered convention of [`crate::invoker`]; the dial primitive
//! blocks its calling thread and reports progress through a callback that
//! may run on any thread the backend owns.

use std::path::{Path, PathBuf};

use dialr_common::dial::request::DialRequest;
use dialr_common::dial::state::DialPhase;
use dialr_common::phonebook::connection::RawHandle;

use crate::buffer::BufferDescriptor;
use crate::status::NativeStatus;

/// The subset of a [`DialRequest`] the native layer consumes.
#[derive(Debug, Clone)]
pub struct NativeDialParams {
    pub entry_name: String,
    pub phonebook: Option<PathBuf>,
    pub username: String,
    pub password: String,
}

impl NativeDialParams {
    pub fn from_request(request: &DialRequest) -> Self {
        Self {
            entry_name: request.entry_name.clone(),
            phonebook: request.phonebook.clone(),
            username: request.credentials.username.clone(),
            password: request.credentials.password.clone(),
        }
    }
}

/// How a blocking dial ended, as reported by the native completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialOutcome {
    Connected,
    Cancelled,
    Failed(u32),
}

/// One native callback invocation during a blocking dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeDialEvent {
    /// A phase transition, reported verbatim and in order.
    Phase(DialPhase),
    /// The completion event; at most one per attempt from a well-behaved
    /// backend, though the engine tolerates (and logs) stragglers.
    Done(DialOutcome),
}

/// A native dial/enumeration backend.
///
/// All methods may be called from any thread. `dial` blocks until the
/// attempt reaches an outcome and must invoke `on_event` for every phase
/// transition and for completion, in the order they occur.
pub trait NativeDialApi: Send + Sync {
    fn enum_entries(&self, phonebook: Option<&Path>, buffer: &mut BufferDescriptor) -> NativeStatus;

    fn enum_devices(&self, buffer: &mut BufferDescriptor) -> NativeStatus;

    fn enum_connections(&self, buffer: &mut BufferDescriptor) -> NativeStatus;

    /// Acquires a fresh handle for one attempt. The handle stays meaningless
    /// to the backend until passed to `dial`.
    fn allocate_handle(&self) -> RawHandle;

    /// Runs one blocking dial attempt under `handle`.
    fn dial(
        &self,
        params: &NativeDialParams,
        handle: RawHandle,
        on_event: &(dyn Fn(NativeDialEvent) + Sync),
    ) -> NativeStatus;

    /// Requests cancellation of an in-flight attempt. Guarantees submission
    /// of the request, not the outcome.
    fn cancel(&self, handle: RawHandle) -> NativeStatus;

    /// Tears down a live or pending connection.
    fn hangup(&self, handle: RawHandle) -> NativeStatus;
}
