//! Logging macros.
//!
//! Thin wrappers over [`tracing`] with fixed targets, so the terminal formatter can give
//! each kind of message its own prefix without inspecting the message text.

pub use tracing;

pub const INFO_TARGET: &str = "scanr::info";
pub const SUCCESS_TARGET: &str = "scanr::success";
pub const WARN_TARGET: &str = "scanr::warn";
pub const ERROR_TARGET: &str = "scanr::error";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log::tracing::info!(target: "scanr::info", $($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::log::tracing::info!(target: "scanr::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log::tracing::warn!(target: "scanr::warn", $($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log::tracing::error!(target: "scanr::error", $($arg)*)
    };
}
