pub mod connection;
pub mod device;
pub mod entry;
