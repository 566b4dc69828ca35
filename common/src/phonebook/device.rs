//! # Dial Device Model
//!
//! A device the native layer can dial through (modem, VPN adapter, ...).

use std::fmt;

/// The kind of a dial-capable device.
///
/// The native layer reports device kinds as numeric codes; anything this
/// crate does not know by name is preserved as [`DeviceKind::Other`] rather
/// than dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Modem,
    Isdn,
    Vpn,
    Broadband,
    Other(u32),
}

impl DeviceKind {
    /// Numeric code used by the native record layout.
    pub fn as_code(self) -> u32 {
        match self {
            DeviceKind::Modem => 1,
            DeviceKind::Isdn => 2,
            DeviceKind::Vpn => 3,
            DeviceKind::Broadband => 4,
            DeviceKind::Other(code) => code,
        }
    }

    pub fn from_code(code: u32) -> Self {
        match code {
            1 => DeviceKind::Modem,
            2 => DeviceKind::Isdn,
            3 => DeviceKind::Vpn,
            4 => DeviceKind::Broadband,
            other => DeviceKind::Other(other),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Modem => f.write_str("modem"),
            DeviceKind::Isdn => f.write_str("isdn"),
            DeviceKind::Vpn => f.write_str("vpn"),
            DeviceKind::Broadband => f.write_str("broadband"),
            DeviceKind::Other(code) => write!(f, "unknown ({code})"),
        }
    }
}

/// One dial-capable device as reported by device enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub kind: DeviceKind,
}

impl Device {
    pub fn new(name: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}
