//! Carry-less multiply and CRC capability detection.
//!
//! This crate answers three questions about the running process: can it
//! execute a 64x64 carry-less multiply (`PMULL`/`PCLMULQDQ`), the IEEE CRC32
//! instruction, and the Castagnoli CRC32C instruction?
//!
//! # Core Types
//!
//! - [`CapabilityFlags`]: the three booleans
//! - [`Detected`]: the flags plus the [`Arch`] that produced them
//! - [`TargetFeature`]: the build-time gates each flag depends on
//!
//! # Main Entry Point
//!
//! ```
//! let flags = platform::detect();
//!
//! if flags.has_pmull {
//!   // Use the hardware carry-less multiply.
//! }
//! ```
//!
//! # Rules
//!
//! 1. **Build and CPU must agree**: a flag is `true` only if the binary was
//!    compiled with the matching target feature *and* the CPU/OS reports it.
//! 2. **Unknown is absent**: unsupported OSes, unreadable auxiliary vectors, and
//!    foreign architectures all report `false`.
//! 3. **Cached**: detection runs once per process and the snapshot lives in a
//!    single atomic byte.
//! 4. **Miri-safe**: under Miri, every flag is `false`.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::{Arch, CapabilityFlags, Detected, Family};
pub use detect::{
  DISABLE_ENV, OverrideError, TargetFeature, clear_override, compiled, detect, detect_uncached, get, has_override,
  set_override, try_set_override,
};
#[cfg(feature = "testing")]
#[doc(hidden)]
pub use detect::testing;

/// Architecture of the running binary.
///
/// Convenience wrapper around [`get()`].
#[inline]
#[must_use]
pub fn arch() -> Arch {
  get().arch
}
