//! # Fixed-Layout Records
//!
//! The native tables are arrays of fixed-size records. Each enumerable kind
//! implements [`FixedRecord`]: its wire size, how to decode one record from
//! exactly `SIZE` bytes, and how to encode one (used by backends filling a
//! caller's buffer).
//!
//! Layouts are little-endian with NUL-padded UTF-8 string fields. Decoding
//! is the only place raw bytes become typed values; records are never
//! mutated afterwards.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use dialr_common::error::DialError;
use dialr_common::phonebook::connection::{Connection, RawHandle};
use dialr_common::phonebook::device::{Device, DeviceKind};
use dialr_common::phonebook::entry::Entry;

/// Width of every string field in the native layouts.
pub const STR_FIELD: usize = 64;

/// Capability interface for one enumerable record kind.
pub trait FixedRecord: Sized {
    /// Wire size of one record, in bytes.
    const SIZE: usize;

    /// Decodes one record from exactly [`Self::SIZE`] bytes.
    fn decode(bytes: &[u8]) -> Result<Self, DialError>;

    /// Encodes one record into exactly [`Self::SIZE`] bytes.
    fn encode(&self, out: &mut [u8]);
}

fn violation(detail: impl Into<String>) -> DialError {
    DialError::BufferProtocolViolation {
        detail: detail.into(),
    }
}

fn decode_str(field: &[u8]) -> Result<String, DialError> {
    let end = field.iter().position(|b| *b == 0).unwrap_or(field.len());
    let text = std::str::from_utf8(&field[..end])
        .map_err(|_| violation("string field is not valid UTF-8"))?;
    Ok(text.to_string())
}

/// Copies `value` into a NUL-padded field, truncating on a char boundary if
/// the value is longer than the field.
fn encode_str(value: &str, field: &mut [u8]) {
    let mut len = value.len().min(field.len());
    while !value.is_char_boundary(len) {
        len -= 1;
    }
    field[..len].copy_from_slice(&value.as_bytes()[..len]);
    field[len..].fill(0);
}

fn decode_u32(field: &[u8]) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(field);
    u32::from_le_bytes(raw)
}

fn decode_u64(field: &[u8]) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(field);
    u64::from_le_bytes(raw)
}

impl FixedRecord for Entry {
    const SIZE: usize = STR_FIELD * 3 + 4;

    fn decode(bytes: &[u8]) -> Result<Self, DialError> {
        if bytes.len() != Self::SIZE {
            return Err(violation(format!(
                "entry record is {} bytes, expected {}",
                bytes.len(),
                Self::SIZE
            )));
        }
        Ok(Entry {
            name: decode_str(&bytes[..STR_FIELD])?,
            device_name: decode_str(&bytes[STR_FIELD..STR_FIELD * 2])?,
            device_kind: DeviceKind::from_code(decode_u32(&bytes[STR_FIELD * 2..STR_FIELD * 2 + 4])),
            target: decode_str(&bytes[STR_FIELD * 2 + 4..])?,
        })
    }

    fn encode(&self, out: &mut [u8]) {
        encode_str(&self.name, &mut out[..STR_FIELD]);
        encode_str(&self.device_name, &mut out[STR_FIELD..STR_FIELD * 2]);
        out[STR_FIELD * 2..STR_FIELD * 2 + 4]
            .copy_from_slice(&self.device_kind.as_code().to_le_bytes());
        encode_str(&self.target, &mut out[STR_FIELD * 2 + 4..]);
    }
}

impl FixedRecord for Device {
    const SIZE: usize = STR_FIELD + 4;

    fn decode(bytes: &[u8]) -> Result<Self, DialError> {
        if bytes.len() != Self::SIZE {
            return Err(violation(format!(
                "device record is {} bytes, expected {}",
                bytes.len(),
                Self::SIZE
            )));
        }
        Ok(Device {
            name: decode_str(&bytes[..STR_FIELD])?,
            kind: DeviceKind::from_code(decode_u32(&bytes[STR_FIELD..])),
        })
    }

    fn encode(&self, out: &mut [u8]) {
        encode_str(&self.name, &mut out[..STR_FIELD]);
        out[STR_FIELD..].copy_from_slice(&self.kind.as_code().to_le_bytes());
    }
}

// Connection layout: handle u64, entry name, device name, device kind u32,
// address tag u8 (0 = none, 4 = v4, 6 = v6), address bytes [16].
const CONN_ADDR_TAG: usize = 8 + STR_FIELD * 2 + 4;

impl FixedRecord for Connection {
    const SIZE: usize = CONN_ADDR_TAG + 1 + 16;

    fn decode(bytes: &[u8]) -> Result<Self, DialError> {
        if bytes.len() != Self::SIZE {
            return Err(violation(format!(
                "connection record is {} bytes, expected {}",
                bytes.len(),
                Self::SIZE
            )));
        }
        let mut addr16 = [0u8; 16];
        addr16.copy_from_slice(&bytes[CONN_ADDR_TAG + 1..]);
        let client_address = match bytes[CONN_ADDR_TAG] {
            0 => None,
            4 => {
                let mut v4 = [0u8; 4];
                v4.copy_from_slice(&addr16[..4]);
                Some(IpAddr::V4(Ipv4Addr::from(v4)))
            }
            6 => Some(IpAddr::V6(Ipv6Addr::from(addr16))),
            tag => return Err(violation(format!("unknown address tag {tag}"))),
        };
        Ok(Connection {
            handle: RawHandle::from_raw(decode_u64(&bytes[..8])),
            entry_name: decode_str(&bytes[8..8 + STR_FIELD])?,
            device_name: decode_str(&bytes[8 + STR_FIELD..8 + STR_FIELD * 2])?,
            device_kind: DeviceKind::from_code(decode_u32(&bytes[8 + STR_FIELD * 2..CONN_ADDR_TAG])),
            client_address,
        })
    }

    fn encode(&self, out: &mut [u8]) {
        out[..8].copy_from_slice(&self.handle.as_raw().to_le_bytes());
        encode_str(&self.entry_name, &mut out[8..8 + STR_FIELD]);
        encode_str(&self.device_name, &mut out[8 + STR_FIELD..8 + STR_FIELD * 2]);
        out[8 + STR_FIELD * 2..CONN_ADDR_TAG]
            .copy_from_slice(&self.device_kind.as_code().to_le_bytes());
        match self.client_address {
            None => {
                out[CONN_ADDR_TAG..].fill(0);
            }
            Some(IpAddr::V4(v4)) => {
                out[CONN_ADDR_TAG] = 4;
                out[CONN_ADDR_TAG + 1..CONN_ADDR_TAG + 5].copy_from_slice(&v4.octets());
                out[CONN_ADDR_TAG + 5..].fill(0);
            }
            Some(IpAddr::V6(v6)) => {
                out[CONN_ADDR_TAG] = 6;
                out[CONN_ADDR_TAG + 1..].copy_from_slice(&v6.octets());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_survives_the_wire() {
        let entry = Entry::new("Office", "WAN Miniport (IKEv2)", DeviceKind::Vpn, "vpn.example.org");
        let mut wire = vec![0u8; Entry::SIZE];
        entry.encode(&mut wire);
        assert_eq!(Entry::decode(&wire).unwrap(), entry);
    }

    #[test]
    fn connection_address_tags() {
        let mut conn = Connection {
            handle: RawHandle::from_raw(0x1234),
            entry_name: "Office".into(),
            device_name: "WAN Miniport (IKEv2)".into(),
            device_kind: DeviceKind::Vpn,
            client_address: Some("10.0.9.2".parse().unwrap()),
        };
        let mut wire = vec![0u8; Connection::SIZE];
        conn.encode(&mut wire);
        assert_eq!(Connection::decode(&wire).unwrap(), conn);

        conn.client_address = None;
        conn.encode(&mut wire);
        assert_eq!(Connection::decode(&wire).unwrap().client_address, None);
    }

    #[test]
    fn unknown_address_tag_is_a_protocol_violation() {
        let mut wire = vec![0u8; Connection::SIZE];
        wire[CONN_ADDR_TAG] = 9;
        assert!(matches!(
            Connection::decode(&wire),
            Err(DialError::BufferProtocolViolation { .. })
        ));
    }

    #[test]
    fn wrong_slice_length_is_a_protocol_violation() {
        let wire = vec![0u8; Device::SIZE - 1];
        assert!(matches!(
            Device::decode(&wire),
            Err(DialError::BufferProtocolViolation { .. })
        ));
    }

    #[test]
    fn overlong_names_truncate_on_char_boundaries() {
        let long = "ü".repeat(STR_FIELD); // 2 bytes per char, exceeds the field
        let device = Device::new(long, DeviceKind::Modem);
        let mut wire = vec![0u8; Device::SIZE];
        device.encode(&mut wire);
        let decoded = Device::decode(&wire).unwrap();
        assert!(decoded.name.len() <= STR_FIELD);
        assert!(decoded.name.chars().all(|c| c == 'ü'));
    }
}
