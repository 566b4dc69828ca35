//! Safe orchestration over the native dial layer: typed enumeration, the
//! asynchronous dial engine, and ordered notification delivery.

pub mod context;
pub mod dialer;
pub mod enumerate;
pub mod handle;
