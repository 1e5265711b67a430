// ─────────────────────────────────────────────────────────────────────────────
// Snapshot Cache and Overrides
// ─────────────────────────────────────────────────────────────────────────────
//
// `CapabilityFlags` packs into three bits, so the process snapshot and the
// caller override each fit in one atomic byte. A store is a single atomic
// write; readers never see a partial value and no lock or `unsafe` is needed.
// The same code runs with and without `std`.
//
// An override is a request. Before it is cached it is clamped to the build's
// compile-time gates, the family pairing rules and the `HWPROBE_DISABLE`
// mask, so it can only report what the binary was compiled to use.

#![cfg_attr(miri, allow(dead_code))]

use core::fmt;
#[cfg(target_has_atomic = "8")]
use core::sync::atomic::{AtomicU8, Ordering};

use super::{compile_time, config};
use crate::caps::{CapabilityFlags, Family};

/// Why an override could not be installed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum OverrideError {
  /// Detection already ran and its snapshot is cached for the process.
  AlreadyInitialized,
  /// The target has no byte-wide atomics to hold an override.
  Unsupported,
}

impl fmt::Display for OverrideError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::AlreadyInitialized => f.write_str("capabilities already detected and cached"),
      Self::Unsupported => f.write_str("overrides are not supported on this build"),
    }
  }
}

impl core::error::Error for OverrideError {}

// ─────────────────────────────────────────────────────────────────────────────
// Packed Cell
// ─────────────────────────────────────────────────────────────────────────────

/// Low three bits hold `CapabilityFlags::bits()`; `PRESENT` marks a value.
#[cfg(target_has_atomic = "8")]
const EMPTY: u8 = 0;
#[cfg(target_has_atomic = "8")]
const PRESENT: u8 = 1 << 7;

#[cfg(target_has_atomic = "8")]
#[inline]
const fn pack(flags: CapabilityFlags) -> u8 {
  PRESENT | flags.bits()
}

#[cfg(target_has_atomic = "8")]
#[inline]
const fn unpack(raw: u8) -> Option<CapabilityFlags> {
  if raw & PRESENT == 0 {
    None
  } else {
    Some(CapabilityFlags::from_bits(raw))
  }
}

/// One optional flag set in an atomic byte.
#[cfg(target_has_atomic = "8")]
pub(super) struct FlagCell(AtomicU8);

#[cfg(target_has_atomic = "8")]
impl FlagCell {
  pub(super) const fn new() -> Self {
    Self(AtomicU8::new(EMPTY))
  }

  #[inline]
  pub(super) fn get(&self) -> Option<CapabilityFlags> {
    unpack(self.0.load(Ordering::Acquire))
  }

  #[inline]
  fn set(&self, value: Option<CapabilityFlags>) {
    self.0.store(value.map_or(EMPTY, pack), Ordering::Release);
  }

  /// The stored flags, computing and publishing them on first use.
  ///
  /// Racing first callers may each run `init`; the first value published
  /// wins and every caller returns it.
  pub(super) fn get_or_init(&self, init: impl FnOnce() -> CapabilityFlags) -> CapabilityFlags {
    if let Some(flags) = self.get() {
      return flags;
    }

    let fresh = pack(init());
    match self.0.compare_exchange(EMPTY, fresh, Ordering::AcqRel, Ordering::Acquire) {
      Ok(_) => CapabilityFlags::from_bits(fresh),
      Err(published) => CapabilityFlags::from_bits(published),
    }
  }
}

#[cfg(target_has_atomic = "8")]
static CACHE: FlagCell = FlagCell::new();

#[cfg(target_has_atomic = "8")]
static OVERRIDE: FlagCell = FlagCell::new();

// ─────────────────────────────────────────────────────────────────────────────
// Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Restrict requested flags to what a build of `family` may report.
///
/// The result is a subset of `requested` and of the family gates, has no
/// flag from `mask`, and keeps the family rules (no IEEE CRC32 on x86, the
/// CRC pair tied on ARM).
#[inline]
#[must_use]
pub(crate) const fn clamp(requested: CapabilityFlags, family: Family, mask: CapabilityFlags) -> CapabilityFlags {
  config::apply_mask(requested.intersection(compile_time::gates_for(family)), mask, family)
}

fn resolve() -> CapabilityFlags {
  #[cfg(target_has_atomic = "8")]
  if let Some(requested) = OVERRIDE.get() {
    return clamp(requested, crate::caps::Arch::current().family(), config::mask());
  }

  super::detect_full_uncached().flags
}

/// Cached flags for this process.
pub(super) fn cached() -> CapabilityFlags {
  #[cfg(target_has_atomic = "8")]
  {
    CACHE.get_or_init(resolve)
  }

  #[cfg(not(target_has_atomic = "8"))]
  {
    resolve()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Set the flags [`get()`](crate::get) will report.
///
/// Must be called **before** the first call to [`get()`](crate::get). The
/// request is clamped to the build (see [`compiled()`](crate::compiled)) and
/// the `HWPROBE_DISABLE` mask, so an override can narrow detection but never
/// claim an instruction the binary was not compiled for. The architecture is
/// always the build target's.
///
/// # Panics
///
/// Panics if the override cannot be installed; see [`try_set_override`].
#[cold]
pub fn set_override(value: Option<CapabilityFlags>) {
  if let Err(err) = try_set_override(value) {
    panic!("platform::set_override failed: {err}");
  }
}

/// Try to set the flags [`get()`](crate::get) will report.
///
/// Pre-init only. Once detection is cached this returns
/// [`OverrideError::AlreadyInitialized`].
#[cold]
pub fn try_set_override(value: Option<CapabilityFlags>) -> Result<(), OverrideError> {
  #[cfg(target_has_atomic = "8")]
  {
    if CACHE.get().is_some() {
      return Err(OverrideError::AlreadyInitialized);
    }
    OVERRIDE.set(value);
    Ok(())
  }

  #[cfg(not(target_has_atomic = "8"))]
  {
    let _ = value;
    Err(OverrideError::Unsupported)
  }
}

/// Remove a pending override.
///
/// # Panics
///
/// Panics if detection is already cached.
#[cold]
pub fn clear_override() {
  set_override(None);
}

/// Check if an override is set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  #[cfg(target_has_atomic = "8")]
  {
    OVERRIDE.get().is_some()
  }

  #[cfg(not(target_has_atomic = "8"))]
  {
    false
  }
}

#[cfg(all(test, target_has_atomic = "8"))]
mod tests {
  use super::*;
  use crate::caps::Arch;

  fn every_flag_set() -> impl Iterator<Item = CapabilityFlags> {
    (0u8..8).map(CapabilityFlags::from_bits)
  }

  #[test]
  fn test_pack_keeps_every_flag_set() {
    assert_eq!(unpack(EMPTY), None);
    for flags in every_flag_set() {
      assert_eq!(unpack(pack(flags)), Some(flags));
    }
  }

  #[test]
  fn test_cell_initializes_once() {
    let cell = FlagCell::new();
    assert_eq!(cell.get(), None);

    let first = cell.get_or_init(|| CapabilityFlags::ALL);
    assert_eq!(first, CapabilityFlags::ALL);
    assert_eq!(cell.get_or_init(|| panic!("init must not rerun")), CapabilityFlags::ALL);
  }

  #[test]
  fn test_cell_caches_empty_flag_set() {
    let cell = FlagCell::new();
    assert_eq!(cell.get_or_init(|| CapabilityFlags::NONE), CapabilityFlags::NONE);
    assert_eq!(cell.get(), Some(CapabilityFlags::NONE));
    assert_eq!(cell.get_or_init(|| CapabilityFlags::ALL), CapabilityFlags::NONE);
  }

  #[test]
  fn test_cell_set_and_clear() {
    let cell = FlagCell::new();
    let crc = CapabilityFlags {
      has_crc32c: true,
      ..CapabilityFlags::NONE
    };
    cell.set(Some(crc));
    assert_eq!(cell.get(), Some(crc));
    cell.set(None);
    assert_eq!(cell.get(), None);
  }

  #[test]
  #[cfg(not(miri))]
  fn test_cell_first_publish_wins_across_threads() {
    extern crate std;
    use std::{sync::Arc, thread};

    let cell = Arc::new(FlagCell::new());
    let handles: [_; 4] = core::array::from_fn(|i| {
      let cell = Arc::clone(&cell);
      thread::spawn(move || cell.get_or_init(|| CapabilityFlags::from_bits(i as u8)))
    });

    let winner = cell.get_or_init(|| CapabilityFlags::from_bits(7));
    for handle in handles {
      assert_eq!(handle.join().ok(), Some(winner));
    }
  }

  #[test]
  fn test_clamp_x86_never_reports_crc32() {
    for requested in every_flag_set() {
      let out = clamp(requested, Family::X86, CapabilityFlags::NONE);
      assert!(!out.has_crc32);
      assert!(compile_time::gates_for(Family::X86).has(out));
    }
  }

  #[test]
  fn test_clamp_arm_keeps_crc_pair() {
    for requested in every_flag_set() {
      let out = clamp(requested, Family::Arm, CapabilityFlags::NONE);
      assert_eq!(out.has_crc32, out.has_crc32c);
      assert!(compile_time::gates_for(Family::Arm).has(out));
    }
  }

  #[test]
  fn test_clamp_other_family_is_empty() {
    assert_eq!(
      clamp(CapabilityFlags::ALL, Family::Other, CapabilityFlags::NONE),
      CapabilityFlags::NONE
    );
  }

  #[test]
  fn test_clamp_is_subset_of_request_and_honors_mask() {
    for requested in every_flag_set() {
      for mask in every_flag_set() {
        for family in [Family::Arm, Family::X86, Family::Other] {
          let out = clamp(requested, family, mask);
          assert!(requested.has(out), "clamp must never add a flag");
          assert!(out.intersection(mask).is_empty());
        }
      }
    }
  }

  #[test]
  fn test_clamp_all_equals_build_gates() {
    let family = Arch::current().family();
    assert_eq!(clamp(CapabilityFlags::ALL, family, CapabilityFlags::NONE), crate::compiled());
  }
}
