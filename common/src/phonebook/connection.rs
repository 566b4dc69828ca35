//! # Active Connection Model
//!
//! One live native connection as reported by connection enumeration, plus
//! the raw handle token used to refer to it.

use std::fmt;

use crate::phonebook::device::DeviceKind;

/// The opaque native token for one connection attempt or live connection.
///
/// A `RawHandle` is only a reference; it carries no ownership. Lifecycle
/// control (hangup on every exit path) belongs to the owned wrapper in the
/// core crate. [`RawHandle::from_raw`] exists for native backends decoding
/// records; callers have no reason to construct one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle(u64);

impl RawHandle {
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// One active connection as reported by connection enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub handle: RawHandle,
    pub entry_name: String,
    pub device_name: String,
    pub device_kind: DeviceKind,
    /// The address assigned to the link, if the native layer projects one.
    pub client_address: Option<std::net::IpAddr>,
}
