//! # Typed Enumeration
//!
//! The caller-facing enumeration operations: each binds the buffered
//! invoker to one native table and yields typed records. Every call is a
//! complete, independent enumeration; nothing is cached.

use std::path::Path;

use dialr_common::error::DialError;
use dialr_common::phonebook::connection::{Connection, RawHandle};
use dialr_common::phonebook::device::Device;
use dialr_common::phonebook::entry::Entry;
use dialr_native::api::NativeDialApi;
use dialr_native::invoker;
use dialr_native::record::FixedRecord;

/// Initial buffer sizing, in elements. Deliberately small: typical tables
/// fit, larger ones cost one growth retry.
const ELEMENT_HINT: usize = 4;

/// Enumerates the phonebook's entries. `phonebook` of `None` means the
/// backend's default phonebook.
pub fn enumerate_entries(
    api: &dyn NativeDialApi,
    phonebook: Option<&Path>,
) -> Result<Vec<Entry>, DialError> {
    invoker::enumerate(
        |buffer| api.enum_entries(phonebook, buffer),
        Entry::SIZE * ELEMENT_HINT,
    )
}

/// Enumerates dial-capable devices.
pub fn enumerate_devices(api: &dyn NativeDialApi) -> Result<Vec<Device>, DialError> {
    invoker::enumerate(|buffer| api.enum_devices(buffer), Device::SIZE * ELEMENT_HINT)
}

/// Enumerates active connections.
pub fn enumerate_connections(api: &dyn NativeDialApi) -> Result<Vec<Connection>, DialError> {
    invoker::enumerate(
        |buffer| api.enum_connections(buffer),
        Connection::SIZE * ELEMENT_HINT,
    )
}

/// Finds the active connection for `handle`, if any.
///
/// A linear scan over the full enumeration; the native API offers no
/// handle-indexed lookup.
pub fn find_connection(
    api: &dyn NativeDialApi,
    handle: RawHandle,
) -> Result<Option<Connection>, DialError> {
    Ok(enumerate_connections(api)?
        .into_iter()
        .find(|connection| connection.handle == handle))
}
