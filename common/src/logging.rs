//! Logging wrapper macros.
//!
//! Thin shims over [`tracing`] so every crate in the workspace logs through
//! the same targets and the CLI formatter can style them uniformly.

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        tracing::info!(target: "dialr", $($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        tracing::info!(target: "dialr::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "dialr", $($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        tracing::error!(target: "dialr", $($arg)*)
    };
}
