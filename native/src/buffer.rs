//! # Buffer Descriptor
//!
//! The memory region handed to a buffered native call: an owned allocation,
//! its capacity in bytes, and the element count the native layer filled in.
//!
//! A descriptor lives for exactly one native call. The invoker allocates it
//! immediately before invoking, and ownership guarantees the allocation is
//! released on every exit path, including mid-retry. Nothing is leaked
//! across retries: growth drops the old descriptor and builds a fresh one.

/// An owned native buffer region.
#[derive(Debug)]
pub struct BufferDescriptor {
    bytes: Vec<u8>,
    element_count: u32,
}

impl BufferDescriptor {
    /// Allocates a zeroed region of `capacity` bytes.
    ///
    /// A zero capacity is valid and holds no backing address.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
            element_count: 0,
        }
    }

    pub fn capacity_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// The filled region, for decoding. Never longer than the capacity.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The full writable region, for the native side to fill.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Logical element count as reported by the native call.
    pub fn element_count(&self) -> u32 {
        self.element_count
    }

    pub fn set_element_count(&mut self, count: u32) {
        self.element_count = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_descriptor_is_zeroed_and_empty() {
        let buffer = BufferDescriptor::with_capacity(32);
        assert_eq!(buffer.capacity_bytes(), 32);
        assert_eq!(buffer.element_count(), 0);
        assert!(buffer.bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn zero_capacity_is_valid() {
        let buffer = BufferDescriptor::with_capacity(0);
        assert_eq!(buffer.capacity_bytes(), 0);
        assert!(buffer.bytes().is_empty());
    }
}
