//! # Simulated Native Backend
//!
//! An in-memory backend speaking the exact conventions of the real thing:
//! buffered enumeration with precise required-size reporting, a blocking
//! dial primitive with callback delivery, advisory cancellation, handle
//! invalidation on hangup.
//!
//! Dial behavior per entry is scriptable ([`DialScript`]), which makes this
//! both the backend the CLI ships with and the harness every scenario test
//! drives.

use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use dialr_common::dial::state::DialPhase;
use dialr_common::phonebook::connection::{Connection, RawHandle};
use dialr_common::phonebook::device::Device;
use dialr_common::phonebook::entry::Entry;

use crate::api::{DialOutcome, NativeDialApi, NativeDialEvent, NativeDialParams};
use crate::buffer::BufferDescriptor;
use crate::record::FixedRecord;
use crate::status::{NativeStatus, codes};

/// How a scripted dial ends once its phases have been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedOutcome {
    /// Register the connection and report `Connected`.
    Connect,
    /// Report failure with this native code.
    Fail(u32),
    /// Block until a cancel request arrives, then report `Cancelled`.
    AwaitCancel,
}

/// The behavior of one entry's dial attempts.
#[derive(Debug, Clone)]
pub struct DialScript {
    pub phases: Vec<DialPhase>,
    pub outcome: ScriptedOutcome,
    /// Pause before each phase, to give cancellation races room in tests.
    pub phase_delay: Duration,
}

impl Default for DialScript {
    fn default() -> Self {
        Self {
            phases: vec![
                DialPhase::OpeningDevice,
                DialPhase::DeviceConnecting,
                DialPhase::Authenticating,
                DialPhase::Negotiating,
            ],
            outcome: ScriptedOutcome::Connect,
            phase_delay: Duration::ZERO,
        }
    }
}

#[derive(Default)]
struct SimState {
    entries: Vec<Entry>,
    devices: Vec<Device>,
    connections: Vec<Connection>,
    scripts: HashMap<String, DialScript>,
    cancelled: HashSet<u64>,
    next_handle: u64,
    entry_calls: usize,
    device_calls: usize,
    connection_calls: usize,
}

/// The in-memory backend. One instance is one simulated machine: a default
/// phonebook (the path argument of entry enumeration selects nothing here),
/// a device table, and a live-connection table.
pub struct SimNative {
    state: Mutex<SimState>,
    cancel_signal: Condvar,
}

impl SimNative {
    pub fn new() -> Self {
        let state = SimState {
            next_handle: rand::random_range(0x1000u64..0x8000) << 8,
            ..SimState::default()
        };
        Self {
            state: Mutex::new(state),
            cancel_signal: Condvar::new(),
        }
    }

    pub fn add_entry(&self, entry: Entry) {
        self.state.lock().unwrap().entries.push(entry);
    }

    pub fn add_device(&self, device: Device) {
        self.state.lock().unwrap().devices.push(device);
    }

    /// Scripts dial behavior for one entry. Unscripted entries connect
    /// through the default phase sequence.
    pub fn script_dial(&self, entry_name: impl Into<String>, script: DialScript) {
        self.state
            .lock()
            .unwrap()
            .scripts
            .insert(entry_name.into(), script);
    }

    /// Native calls made against the entry table so far. Lets tests observe
    /// buffer-growth retries from the outside.
    pub fn entry_enum_calls(&self) -> usize {
        self.state.lock().unwrap().entry_calls
    }

    pub fn device_enum_calls(&self) -> usize {
        self.state.lock().unwrap().device_calls
    }

    pub fn connection_enum_calls(&self) -> usize {
        self.state.lock().unwrap().connection_calls
    }

    fn write_table<T: FixedRecord>(records: &[T], buffer: &mut BufferDescriptor) -> NativeStatus {
        let needed = records.len() * T::SIZE;
        if buffer.capacity_bytes() < needed {
            return NativeStatus::BufferTooSmall {
                required: needed as u32,
            };
        }
        for (chunk, record) in buffer.bytes_mut().chunks_exact_mut(T::SIZE).zip(records) {
            record.encode(chunk);
        }
        buffer.set_element_count(records.len() as u32);
        NativeStatus::Success
    }

    fn is_cancelled(&self, handle: RawHandle) -> bool {
        self.state.lock().unwrap().cancelled.contains(&handle.as_raw())
    }

    fn finish_cancelled(
        &self,
        on_event: &(dyn Fn(NativeDialEvent) + Sync),
    ) -> NativeStatus {
        on_event(NativeDialEvent::Done(DialOutcome::Cancelled));
        NativeStatus::Error(codes::ERROR_USER_DISCONNECTION)
    }

    fn client_address_for(handle: RawHandle) -> IpAddr {
        let raw = handle.as_raw();
        IpAddr::V4(Ipv4Addr::new(10, 64, (raw >> 8) as u8, raw as u8))
    }
}

impl Default for SimNative {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeDialApi for SimNative {
    fn enum_entries(&self, _phonebook: Option<&Path>, buffer: &mut BufferDescriptor) -> NativeStatus {
        let mut state = self.state.lock().unwrap();
        state.entry_calls += 1;
        let entries = state.entries.clone();
        drop(state);
        Self::write_table(&entries, buffer)
    }

    fn enum_devices(&self, buffer: &mut BufferDescriptor) -> NativeStatus {
        let mut state = self.state.lock().unwrap();
        state.device_calls += 1;
        let devices = state.devices.clone();
        drop(state);
        Self::write_table(&devices, buffer)
    }

    fn enum_connections(&self, buffer: &mut BufferDescriptor) -> NativeStatus {
        let mut state = self.state.lock().unwrap();
        state.connection_calls += 1;
        let connections = state.connections.clone();
        drop(state);
        Self::write_table(&connections, buffer)
    }

    fn allocate_handle(&self) -> RawHandle {
        let mut state = self.state.lock().unwrap();
        state.next_handle += 1;
        RawHandle::from_raw(state.next_handle)
    }

    fn dial(
        &self,
        params: &NativeDialParams,
        handle: RawHandle,
        on_event: &(dyn Fn(NativeDialEvent) + Sync),
    ) -> NativeStatus {
        tracing::debug!(entry = %params.entry_name, %handle, "dial started");
        let status = self.run_dial(params, handle, on_event);
        // The attempt is over; its cancellation marker must not outlive it.
        // Clearing it anywhere earlier (hangup included) would let a dial
        // still in flight miss a cancel request.
        self.state.lock().unwrap().cancelled.remove(&handle.as_raw());
        tracing::debug!(%handle, ?status, "dial finished");
        status
    }

    fn cancel(&self, handle: RawHandle) -> NativeStatus {
        tracing::debug!(%handle, "cancel requested");
        let mut state = self.state.lock().unwrap();
        state.cancelled.insert(handle.as_raw());
        self.cancel_signal.notify_all();
        NativeStatus::Success
    }

    fn hangup(&self, handle: RawHandle) -> NativeStatus {
        let mut state = self.state.lock().unwrap();
        let before = state.connections.len();
        state.connections.retain(|c| c.handle != handle);
        if state.connections.len() < before {
            tracing::debug!(%handle, "connection hung up");
            NativeStatus::Success
        } else {
            tracing::debug!(%handle, "hangup on unknown handle");
            NativeStatus::Error(codes::ERROR_INVALID_HANDLE)
        }
    }
}

impl SimNative {
    fn run_dial(
        &self,
        params: &NativeDialParams,
        handle: RawHandle,
        on_event: &(dyn Fn(NativeDialEvent) + Sync),
    ) -> NativeStatus {
        let (entry, script) = {
            let state = self.state.lock().unwrap();
            let Some(entry) = state
                .entries
                .iter()
                .find(|e| e.name == params.entry_name)
                .cloned()
            else {
                drop(state);
                let code = codes::ERROR_CANNOT_FIND_PHONEBOOK_ENTRY;
                on_event(NativeDialEvent::Done(DialOutcome::Failed(code)));
                return NativeStatus::Error(code);
            };
            let script = state
                .scripts
                .get(&params.entry_name)
                .cloned()
                .unwrap_or_default();
            (entry, script)
        };

        for phase in &script.phases {
            if self.is_cancelled(handle) {
                return self.finish_cancelled(on_event);
            }
            if !script.phase_delay.is_zero() {
                std::thread::sleep(script.phase_delay);
            }
            on_event(NativeDialEvent::Phase(*phase));
        }

        match script.outcome {
            ScriptedOutcome::Connect => {
                let mut state = self.state.lock().unwrap();
                if state.cancelled.contains(&handle.as_raw()) {
                    drop(state);
                    return self.finish_cancelled(on_event);
                }
                state.connections.push(Connection {
                    handle,
                    entry_name: entry.name.clone(),
                    device_name: entry.device_name.clone(),
                    device_kind: entry.device_kind,
                    client_address: Some(Self::client_address_for(handle)),
                });
                drop(state);
                on_event(NativeDialEvent::Done(DialOutcome::Connected));
                NativeStatus::Success
            }
            ScriptedOutcome::Fail(code) => {
                on_event(NativeDialEvent::Done(DialOutcome::Failed(code)));
                NativeStatus::Error(code)
            }
            ScriptedOutcome::AwaitCancel => {
                let mut state = self.state.lock().unwrap();
                while !state.cancelled.contains(&handle.as_raw()) {
                    state = self.cancel_signal.wait(state).unwrap();
                }
                drop(state);
                self.finish_cancelled(on_event)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialr_common::phonebook::device::DeviceKind;

    fn office() -> Entry {
        Entry::new("Office", "WAN Miniport (IKEv2)", DeviceKind::Vpn, "vpn.example.org")
    }

    #[test]
    fn reports_exact_required_size() {
        let sim = SimNative::new();
        sim.add_entry(office());
        sim.add_entry(Entry::new("Home", "USR 56k", DeviceKind::Modem, "555-0100"));

        let mut buffer = BufferDescriptor::with_capacity(Entry::SIZE);
        let status = sim.enum_entries(None, &mut buffer);
        assert_eq!(
            status,
            NativeStatus::BufferTooSmall {
                required: (2 * Entry::SIZE) as u32
            }
        );

        let mut buffer = BufferDescriptor::with_capacity(2 * Entry::SIZE);
        assert!(sim.enum_entries(None, &mut buffer).is_success());
        assert_eq!(buffer.element_count(), 2);
    }

    #[test]
    fn connect_registers_then_hangup_invalidates() {
        let sim = SimNative::new();
        sim.add_entry(office());
        let handle = sim.allocate_handle();
        let params = NativeDialParams {
            entry_name: "Office".into(),
            phonebook: None,
            username: "alice".into(),
            password: "pw".into(),
        };

        let status = sim.dial(&params, handle, &|_| {});
        assert!(status.is_success());

        let mut buffer = BufferDescriptor::with_capacity(4 * Connection::SIZE);
        assert!(sim.enum_connections(&mut buffer).is_success());
        assert_eq!(buffer.element_count(), 1);

        assert!(sim.hangup(handle).is_success());
        assert_eq!(
            sim.hangup(handle),
            NativeStatus::Error(codes::ERROR_INVALID_HANDLE)
        );
    }

    #[test]
    fn cancel_beats_a_slow_dial() {
        let sim = std::sync::Arc::new(SimNative::new());
        sim.add_entry(office());
        sim.script_dial(
            "Office",
            DialScript {
                outcome: ScriptedOutcome::AwaitCancel,
                ..DialScript::default()
            },
        );
        let handle = sim.allocate_handle();
        let params = NativeDialParams {
            entry_name: "Office".into(),
            phonebook: None,
            username: "alice".into(),
            password: "pw".into(),
        };

        let dialer_sim = sim.clone();
        let worker = std::thread::spawn(move || dialer_sim.dial(&params, handle, &|_| {}));
        // Cancel is advisory; the blocked dial observes it and unwinds.
        assert!(sim.cancel(handle).is_success());
        assert_eq!(
            worker.join().unwrap(),
            NativeStatus::Error(codes::ERROR_USER_DISCONNECTION)
        );
    }

    #[test]
    fn cancel_marker_survives_hangup_until_the_dial_returns() {
        let sim = SimNative::new();
        sim.add_entry(office());
        let handle = sim.allocate_handle();

        // Cancel first, then hang up the not-yet-connected handle. The
        // marker must still be visible to the dial that follows.
        assert!(sim.cancel(handle).is_success());
        assert_eq!(
            sim.hangup(handle),
            NativeStatus::Error(codes::ERROR_INVALID_HANDLE)
        );

        let params = NativeDialParams {
            entry_name: "Office".into(),
            phonebook: None,
            username: "alice".into(),
            password: "pw".into(),
        };
        assert_eq!(
            sim.dial(&params, handle, &|_| {}),
            NativeStatus::Error(codes::ERROR_USER_DISCONNECTION)
        );

        let mut buffer = BufferDescriptor::with_capacity(4 * Connection::SIZE);
        assert!(sim.enum_connections(&mut buffer).is_success());
        assert_eq!(buffer.element_count(), 0);
    }

    #[test]
    fn unknown_entry_fails_with_native_code() {
        let sim = SimNative::new();
        let handle = sim.allocate_handle();
        let params = NativeDialParams {
            entry_name: "Nowhere".into(),
            phonebook: None,
            username: String::new(),
            password: String::new(),
        };
        assert_eq!(
            sim.dial(&params, handle, &|_| {}),
            NativeStatus::Error(codes::ERROR_CANNOT_FIND_PHONEBOOK_ENTRY)
        );
    }
}
