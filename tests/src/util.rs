use std::sync::Arc;

use dialr_common::phonebook::device::{Device, DeviceKind};
use dialr_common::phonebook::entry::Entry;
use dialr_native::sim::SimNative;

/// A backend with the two-entry phonebook most scenarios start from.
pub fn office_and_home() -> Arc<SimNative> {
    let sim = Arc::new(SimNative::new());
    sim.add_device(Device::new("WAN Miniport (IKEv2)", DeviceKind::Vpn));
    sim.add_device(Device::new("USR 56k", DeviceKind::Modem));
    sim.add_entry(Entry::new(
        "Office",
        "WAN Miniport (IKEv2)",
        DeviceKind::Vpn,
        "vpn.example.org",
    ));
    sim.add_entry(Entry::new("Home", "USR 56k", DeviceKind::Modem, "555-0100"));
    sim
}
