pub mod request;
pub mod state;
