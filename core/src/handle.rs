//! # Owned Connection Handle
//!
//! The raw native token wrapped with exclusive ownership. Whoever holds a
//! `ConnectionHandle` controls the connection's lifecycle; release is
//! scoped, so the native side is hung up on every exit path, explicit or
//! not.

use std::fmt;
use std::sync::Arc;

use dialr_common::error::DialError;
use dialr_common::phonebook::connection::RawHandle;
use dialr_native::api::NativeDialApi;
use dialr_native::status::NativeStatus;

/// Exclusive ownership of one live native connection.
///
/// Obtained only from a `Connected` dial completion. Dropping it hangs the
/// connection up; [`ConnectionHandle::hangup`] does the same but surfaces
/// the native result.
pub struct ConnectionHandle {
    raw: RawHandle,
    api: Arc<dyn NativeDialApi>,
    released: bool,
}

impl ConnectionHandle {
    pub(crate) fn claim(api: Arc<dyn NativeDialApi>, raw: RawHandle) -> Self {
        Self {
            raw,
            api,
            released: false,
        }
    }

    /// The raw token, for display and for connection-table lookups.
    pub fn raw(&self) -> RawHandle {
        self.raw
    }

    /// Tears the connection down and consumes the ownership.
    pub fn hangup(mut self) -> Result<(), DialError> {
        self.released = true;
        match self.api.hangup(self.raw) {
            NativeStatus::Success => Ok(()),
            NativeStatus::Error(code) => Err(DialError::NativeCallFailure(code)),
            NativeStatus::BufferTooSmall { .. } => Err(DialError::BufferProtocolViolation {
                detail: "hangup reported buffer-too-small".into(),
            }),
        }
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        if !self.released {
            let status = self.api.hangup(self.raw);
            tracing::debug!(handle = %self.raw, ?status, "hung up on drop");
        }
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("raw", &self.raw)
            .field("released", &self.released)
            .finish()
    }
}
