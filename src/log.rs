//! Logging shim, a no-op unless the `log` feature is enabled.
//!
//! The core only narrates cold paths (route registration, scan failures),
//! so a single level is enough.

macro_rules! debug {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::debug!($($tt)*);
    };
}

pub(crate) use debug;
