//! Runtime capability detection.
//!
//! This module provides the cached [`get()`] snapshot and the uncached
//! detectors behind it. It handles:
//!
//! - Compile-time gating (via `cfg!(target_feature = "...")`)
//! - Runtime detection (feature query on x86, auxiliary vector on ARM)
//! - Caching (one atomic byte, with or without `std`)
//! - Overrides, clamped to what the build may report
//! - `HWPROBE_DISABLE` masking
//! - Miri fallback (always returns portable flags)

mod arch {
  pub(crate) mod arm;
  pub(crate) mod x86;
}
mod cache;
pub(crate) mod compile_time;
mod config;

pub use cache::{OverrideError, clear_override, has_override, set_override, try_set_override};
pub use compile_time::{TargetFeature, compiled};
pub use config::DISABLE_ENV;

use crate::caps::{Arch, CapabilityFlags, Detected};

/// Pure detector internals, exposed for fuzzing.
#[cfg(feature = "testing")]
#[doc(hidden)]
pub mod testing {
  use crate::caps::{CapabilityFlags, Family};

  /// Parse a raw auxiliary vector; returns `(AT_HWCAP, AT_HWCAP2)`.
  #[must_use]
  pub fn parse_auxv(bytes: &[u8], word_bytes: usize) -> Option<(u64, u64)> {
    super::arch::arm::parse_auxv(bytes, word_bytes).map(|c| (c.hwcap, c.hwcap2))
  }

  /// Decode ARM capability words for a 32- or 64-bit build.
  #[must_use]
  pub fn decode_arm(word_bits: u32, hwcap: u64, hwcap2: u64) -> CapabilityFlags {
    super::arch::arm::decode(word_bits, super::arch::arm::Hwcaps { hwcap, hwcap2 })
  }

  /// Combine ARM gates with decoded runtime flags.
  #[must_use]
  pub fn combine_arm(gates: CapabilityFlags, runtime: CapabilityFlags) -> CapabilityFlags {
    super::arch::arm::combine(gates, runtime)
  }

  /// Clamp requested override flags the way `get()` does.
  #[must_use]
  pub fn clamp_override(requested: CapabilityFlags, family: Family, mask: CapabilityFlags) -> CapabilityFlags {
    super::cache::clamp(requested, family, mask)
  }

  /// Combine x86 gates with runtime answers.
  #[must_use]
  pub fn combine_x86(gates: CapabilityFlags, pclmulqdq: bool, sse42: bool) -> CapabilityFlags {
    super::arch::x86::combine(gates, pclmulqdq, sse42)
  }

  /// Parse a `HWPROBE_DISABLE` value.
  #[must_use]
  pub fn parse_disable(value: &str) -> CapabilityFlags {
    super::config::parse_mask(value)
  }

  /// Apply a disable mask under the rules of `family`.
  #[must_use]
  pub fn apply_disable(flags: CapabilityFlags, mask: CapabilityFlags, family: Family) -> CapabilityFlags {
    super::config::apply_mask(flags, mask, family)
  }
}

/// Cached detection snapshot.
///
/// An installed override wins over detection, after clamping. Under Miri this
/// always returns [`Detected::portable()`].
#[inline]
#[must_use]
pub fn get() -> Detected {
  #[cfg(miri)]
  {
    Detected::portable()
  }

  #[cfg(not(miri))]
  {
    Detected {
      arch: Arch::current(),
      flags: cache::cached(),
    }
  }
}

/// Cached capability flags. Never fails; unknown folds to `false`.
#[inline]
#[must_use]
pub fn detect() -> CapabilityFlags {
  get().flags
}

/// Recompute the flags, bypassing the cache and any override.
///
/// The `HWPROBE_DISABLE` mask still applies.
#[inline]
#[must_use]
pub fn detect_uncached() -> CapabilityFlags {
  detect_full_uncached().flags
}

pub(crate) fn detect_full_uncached() -> Detected {
  let arch = Arch::current();
  let flags = config::apply_mask(detect_raw(), config::mask(), arch.family());
  Detected { arch, flags }
}

/// Unmasked flags from the family detector compiled into this build.
#[inline]
fn detect_raw() -> CapabilityFlags {
  #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
  {
    arch::x86::detect_x86()
  }

  #[cfg(any(target_arch = "aarch64", target_arch = "arm"))]
  {
    arch::arm::detect_arm()
  }

  #[cfg(not(any(
    target_arch = "x86_64",
    target_arch = "x86",
    target_arch = "aarch64",
    target_arch = "arm"
  )))]
  {
    CapabilityFlags::NONE
  }
}
