//! # Buffered Native Invoker
//!
//! Generic driver for the "tell me how big a buffer you need, then fill it"
//! native convention. One call here is one complete enumeration: allocate,
//! invoke, grow on demand (bounded), decode, release. No state survives
//! between calls, so enumerations are restartable at will.

use dialr_common::error::DialError;

use crate::buffer::BufferDescriptor;
use crate::record::FixedRecord;
use crate::status::NativeStatus;

/// Growth retries allowed before declaring the native API non-converging.
pub const MAX_GROWTH_RETRIES: usize = 2;

/// Smallest buffer ever handed to a native call.
pub const MIN_CAPACITY_BYTES: usize = 64;

/// Runs one buffered enumeration against `call` and decodes the result.
///
/// `call` is invoked with a fresh [`BufferDescriptor`] each round. On
/// [`NativeStatus::BufferTooSmall`] the old buffer is dropped and a larger
/// one allocated, at most [`MAX_GROWTH_RETRIES`] times; a native API that
/// keeps asking for more is a contract break, not a reason to loop. A
/// reported requirement of zero means "no data" and yields an empty vec.
pub fn enumerate<T, F>(mut call: F, capacity_hint: usize) -> Result<Vec<T>, DialError>
where
    T: FixedRecord,
    F: FnMut(&mut BufferDescriptor) -> NativeStatus,
{
    let mut capacity = capacity_hint.max(MIN_CAPACITY_BYTES).max(T::SIZE);
    let mut growths = 0usize;

    loop {
        let mut buffer = BufferDescriptor::with_capacity(capacity);
        match call(&mut buffer) {
            NativeStatus::Success => return decode_all(&buffer),
            NativeStatus::BufferTooSmall { required: 0 } => return Ok(Vec::new()),
            NativeStatus::BufferTooSmall { required } => {
                if growths == MAX_GROWTH_RETRIES {
                    return Err(DialError::BufferProtocolViolation {
                        detail: format!(
                            "native call still reports too-small after {MAX_GROWTH_RETRIES} growth retries (last required {required})"
                        ),
                    });
                }
                growths += 1;
                // At least the reported requirement, and always forward
                // progress even against a lying native side.
                capacity = (required as usize).max(capacity + T::SIZE);
            }
            NativeStatus::Error(code) => return Err(DialError::NativeCallFailure(code)),
        }
    }
}

/// Decodes `element_count` records of `T::SIZE` bytes from the front of the
/// buffer. Never reads past the capacity: a count that does not fit is a
/// protocol violation, not a truncation.
fn decode_all<T: FixedRecord>(buffer: &BufferDescriptor) -> Result<Vec<T>, DialError> {
    let count = buffer.element_count() as usize;
    let needed = count
        .checked_mul(T::SIZE)
        .ok_or_else(|| DialError::BufferProtocolViolation {
            detail: format!("element count {count} overflows the record size"),
        })?;
    if needed > buffer.capacity_bytes() {
        return Err(DialError::BufferProtocolViolation {
            detail: format!(
                "{count} elements of {} bytes exceed the {}-byte buffer",
                T::SIZE,
                buffer.capacity_bytes()
            ),
        });
    }

    let mut records = Vec::with_capacity(count);
    for chunk in buffer.bytes()[..needed].chunks_exact(T::SIZE) {
        records.push(T::decode(chunk)?);
    }
    Ok(records)
}
