//! Unified Logging Macros for knx-ipcore
//!
//! This module provides a unified logging interface that automatically
//! selects between `defmt::` and `log::` based on the active feature flags.
//!
//! # Usage
//!
//! ```rust,ignore
//! knx_log!(debug, "dropping truncated frame ({} bytes)", data.len());
//! knx_log!(trace, "dispatch to {}", address);
//! ```
//!
//! # Feature Flags
//!
//! - `defmt` - Uses `defmt::` (preferred on embedded targets)
//! - `log` - Uses the `log::` facade (hosts, USB serial)
//! - neither - logging compiles to nothing, arguments are still type-checked

/// Unified logging macro - selects defmt:: or log:: based on features.
///
/// When both backends are enabled `defmt` wins.
#[macro_export]
#[cfg(feature = "defmt")]
macro_rules! knx_log {
    (info, $($arg:tt)*) => { defmt::info!($($arg)*) };
    (debug, $($arg:tt)*) => { defmt::debug!($($arg)*) };
    (warn, $($arg:tt)*) => { defmt::warn!($($arg)*) };
    (error, $($arg:tt)*) => { defmt::error!($($arg)*) };
    (trace, $($arg:tt)*) => { defmt::trace!($($arg)*) };
}

#[macro_export]
#[cfg(all(feature = "log", not(feature = "defmt")))]
macro_rules! knx_log {
    (info, $($arg:tt)*) => { log::info!($($arg)*) };
    (debug, $($arg:tt)*) => { log::debug!($($arg)*) };
    (warn, $($arg:tt)*) => { log::warn!($($arg)*) };
    (error, $($arg:tt)*) => { log::error!($($arg)*) };
    (trace, $($arg:tt)*) => { log::trace!($($arg)*) };
}

#[macro_export]
#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! knx_log {
    ($level:ident, $($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}
