use dialr_common::phonebook::device::DeviceKind;
use dialr_common::phonebook::entry::Entry;
use dialr_core::enumerate;

use crate::util::office_and_home;

/// The phonebook `["Office", "Home"]` enumerates exactly those two records,
/// in native order.
#[test]
fn phonebook_enumerates_in_native_order() {
    let sim = office_and_home();
    let entries = enumerate::enumerate_entries(sim.as_ref(), None).unwrap();

    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Office", "Home"]);
}

/// Re-enumerating with no native-side change yields an equal sequence.
#[test]
fn enumeration_is_restartable_and_idempotent() {
    let sim = office_and_home();
    let first = enumerate::enumerate_entries(sim.as_ref(), None).unwrap();
    let second = enumerate::enumerate_entries(sim.as_ref(), None).unwrap();
    assert_eq!(first, second);

    let devices_first = enumerate::enumerate_devices(sim.as_ref()).unwrap();
    let devices_second = enumerate::enumerate_devices(sim.as_ref()).unwrap();
    assert_eq!(devices_first, devices_second);
}

/// A table bigger than the initial buffer costs exactly one growth retry,
/// observed through the backend's native-call counter.
#[test]
fn growth_costs_exactly_one_retry() {
    let sim = office_and_home();
    for i in 0..10 {
        sim.add_entry(Entry::new(
            format!("Branch {i}"),
            "WAN Miniport (IKEv2)",
            DeviceKind::Vpn,
            format!("branch{i}.example.org"),
        ));
    }

    let entries = enumerate::enumerate_entries(sim.as_ref(), None).unwrap();
    assert_eq!(entries.len(), 12);
    assert_eq!(sim.entry_enum_calls(), 2);
}

/// Empty native tables are an empty sequence, not an error.
#[test]
fn empty_connection_table_yields_empty_sequence() {
    let sim = office_and_home();
    let connections = enumerate::enumerate_connections(sim.as_ref()).unwrap();
    assert!(connections.is_empty());
    assert_eq!(sim.connection_enum_calls(), 1);
}
