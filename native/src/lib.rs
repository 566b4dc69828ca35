//! The native-API boundary.
//!
//! Everything above this crate works with typed records and safe handles;
//! everything below it speaks the RAS-style convention of status codes,
//! caller-supplied buffers and fixed-layout records. The [`api::NativeDialApi`]
//! trait is the seam where a real OS backend would plug in; the shipped
//! backend is the in-memory [`sim::SimNative`].

pub mod api;
pub mod buffer;
pub mod invoker;
pub mod record;
pub mod sim;
pub mod status;
