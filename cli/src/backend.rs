//! The backend this binary runs against.
//!
//! There is no OS dialing stack underneath the CLI; the simulated backend
//! ships seeded with a small phonebook so every subcommand operates on real
//! tables and the dial command walks real phase sequences.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use dialr_common::phonebook::device::{Device, DeviceKind};
use dialr_common::phonebook::entry::Entry;
use dialr_native::sim::{DialScript, ScriptedOutcome, SimNative};
use dialr_native::status::codes;

static BACKEND: OnceLock<Arc<SimNative>> = OnceLock::new();

pub fn backend() -> Arc<SimNative> {
    BACKEND.get_or_init(seed).clone()
}

fn seed() -> Arc<SimNative> {
    let sim = SimNative::new();

    sim.add_device(Device::new("WAN Miniport (IKEv2)", DeviceKind::Vpn));
    sim.add_device(Device::new("WAN Miniport (SSTP)", DeviceKind::Vpn));
    sim.add_device(Device::new("USR Courier 56k", DeviceKind::Modem));

    sim.add_entry(Entry::new(
        "Office",
        "WAN Miniport (IKEv2)",
        DeviceKind::Vpn,
        "vpn.example.org",
    ));
    sim.add_entry(Entry::new(
        "Home Office",
        "WAN Miniport (SSTP)",
        DeviceKind::Vpn,
        "home.example.org",
    ));
    sim.add_entry(Entry::new(
        "Legacy ISP",
        "USR Courier 56k",
        DeviceKind::Modem,
        "555-0199",
    ));

    sim.script_dial(
        "Office",
        DialScript {
            phase_delay: Duration::from_millis(400),
            ..DialScript::default()
        },
    );
    sim.script_dial(
        "Home Office",
        DialScript {
            phase_delay: Duration::from_millis(250),
            ..DialScript::default()
        },
    );
    sim.script_dial(
        "Legacy ISP",
        DialScript {
            outcome: ScriptedOutcome::Fail(codes::ERROR_AUTHENTICATION_FAILURE),
            phase_delay: Duration::from_millis(300),
            ..DialScript::default()
        },
    );

    Arc::new(sim)
}
