pub mod config;
pub mod dial;
pub mod error;
pub mod logging;
pub mod phonebook;
