//! # Phonebook Entry Model
//!
//! One configured dial/VPN connection definition from the native phonebook.

use crate::phonebook::device::DeviceKind;

/// A phonebook entry as reported by entry enumeration.
///
/// Never mutated after decode; re-enumerating is the way to refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// The device the entry dials through.
    pub device_name: String,
    pub device_kind: DeviceKind,
    /// Phone number or remote endpoint, as stored in the phonebook.
    pub target: String,
}

impl Entry {
    pub fn new(
        name: impl Into<String>,
        device_name: impl Into<String>,
        device_kind: DeviceKind,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            device_name: device_name.into(),
            device_kind,
            target: target.into(),
        }
    }
}
