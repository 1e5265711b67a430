//! Capability representation.
//!
//! This module answers the question: "Which carry-less multiply and CRC
//! instructions can this process legally execute?"
//!
//! # Design
//!
//! [`CapabilityFlags`] holds three independent facts about the executing
//! hardware/OS pair. Unknown is always reported as absent; there is no
//! tri-state.
//!
//! [`Arch`] and [`Family`] describe the build target. The family selects which
//! detector variant is compiled in (auxiliary vector on ARM, feature query on
//! x86); it is a build-time choice, never a runtime one.

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Capability Flags
// ─────────────────────────────────────────────────────────────────────────────

/// Carry-less multiply and CRC instruction availability.
///
/// `CapabilityFlags` is `Copy`, `Send`, and `Sync`; a snapshot can be shared
/// freely across threads.
///
/// # Invariants
///
/// Flags produced by [`detect()`](crate::detect()) satisfy the vendor rules for
/// the build's architecture family:
///
/// - ARM: `has_crc32c == has_crc32` (the ARMv8 CRC32 extension covers both
///   polynomials).
/// - x86: `has_crc32 == false` (only the Castagnoli `crc32` instruction
///   exists); `has_crc32c` follows SSE4.2 independently of `has_pmull`.
///
/// # Display
///
/// The `Display` impl renders the three report lines printed by the `hwcap`
/// program:
///
/// ```
/// use platform::CapabilityFlags;
///
/// let flags = CapabilityFlags {
///   has_pmull: true,
///   has_crc32: false,
///   has_crc32c: true,
/// };
/// assert_eq!(
///   flags.to_string(),
///   "hasPMULL:  1\nhasCRC32:  0\nhasCRC32C: 1"
/// );
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CapabilityFlags {
  /// 64x64 -> 128 carry-less multiply (`PMULL` on ARM, `PCLMULQDQ` on x86).
  pub has_pmull: bool,

  /// CRC32 (IEEE 802.3 polynomial) instruction.
  pub has_crc32: bool,

  /// CRC32C (Castagnoli polynomial) instruction.
  pub has_crc32c: bool,
}

impl CapabilityFlags {
  /// No capabilities. The fail-safe answer on every unsupported platform.
  pub const NONE: Self = Self {
    has_pmull: false,
    has_crc32: false,
    has_crc32c: false,
  };

  /// Every capability.
  pub const ALL: Self = Self {
    has_pmull: true,
    has_crc32: true,
    has_crc32c: true,
  };

  const PMULL_BIT: u8 = 1 << 0;
  const CRC32_BIT: u8 = 1 << 1;
  const CRC32C_BIT: u8 = 1 << 2;

  /// Build flags from a packed bitmask (bit 0 = PMULL, bit 1 = CRC32,
  /// bit 2 = CRC32C). Higher bits are ignored.
  #[inline]
  #[must_use]
  pub const fn from_bits(bits: u8) -> Self {
    Self {
      has_pmull: bits & Self::PMULL_BIT != 0,
      has_crc32: bits & Self::CRC32_BIT != 0,
      has_crc32c: bits & Self::CRC32C_BIT != 0,
    }
  }

  /// Packed bitmask (bit 0 = PMULL, bit 1 = CRC32, bit 2 = CRC32C).
  #[inline]
  #[must_use]
  pub const fn bits(self) -> u8 {
    let mut bits = 0;
    if self.has_pmull {
      bits |= Self::PMULL_BIT;
    }
    if self.has_crc32 {
      bits |= Self::CRC32_BIT;
    }
    if self.has_crc32c {
      bits |= Self::CRC32C_BIT;
    }
    bits
  }

  /// Flags present in both `self` and `other`.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self {
      has_pmull: self.has_pmull && other.has_pmull,
      has_crc32: self.has_crc32 && other.has_crc32,
      has_crc32c: self.has_crc32c && other.has_crc32c,
    }
  }

  /// Flags in `self` with everything in `other` cleared.
  #[inline]
  #[must_use]
  pub const fn difference(self, other: Self) -> Self {
    Self {
      has_pmull: self.has_pmull && !other.has_pmull,
      has_crc32: self.has_crc32 && !other.has_crc32,
      has_crc32c: self.has_crc32c && !other.has_crc32c,
    }
  }

  /// Returns `true` if every flag set in `required` is also set in `self`.
  #[inline]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    self.intersection(required).bits() == required.bits()
  }

  /// Returns `true` if no flag is set.
  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.bits() == 0
  }

  /// Names of the set flags, in report order.
  pub fn feature_names(self) -> impl Iterator<Item = &'static str> {
    [
      (self.has_pmull, "pmull"),
      (self.has_crc32, "crc32"),
      (self.has_crc32c, "crc32c"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
  }
}

impl fmt::Display for CapabilityFlags {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "hasPMULL:  {}", u8::from(self.has_pmull))?;
    writeln!(f, "hasCRC32:  {}", u8::from(self.has_crc32))?;
    write!(f, "hasCRC32C: {}", u8::from(self.has_crc32c))
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Architecture
// ─────────────────────────────────────────────────────────────────────────────

/// Target architecture of the running binary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Arch {
  X86_64,
  X86,
  Aarch64,
  Arm,
  #[default]
  Other,
}

impl Arch {
  /// Get the architecture for the current compilation target.
  #[inline]
  #[must_use]
  pub const fn current() -> Self {
    #[cfg(target_arch = "x86_64")]
    {
      Self::X86_64
    }
    #[cfg(target_arch = "x86")]
    {
      Self::X86
    }
    #[cfg(target_arch = "aarch64")]
    {
      Self::Aarch64
    }
    #[cfg(target_arch = "arm")]
    {
      Self::Arm
    }
    #[cfg(not(any(
      target_arch = "x86_64",
      target_arch = "x86",
      target_arch = "aarch64",
      target_arch = "arm"
    )))]
    {
      Self::Other
    }
  }

  /// Detector family for this architecture.
  #[inline]
  #[must_use]
  pub const fn family(self) -> Family {
    match self {
      Self::X86_64 | Self::X86 => Family::X86,
      Self::Aarch64 | Self::Arm => Family::Arm,
      Self::Other => Family::Other,
    }
  }

  /// Register width class in bits, if known.
  #[inline]
  #[must_use]
  pub const fn word_bits(self) -> Option<u32> {
    match self {
      Self::X86_64 | Self::Aarch64 => Some(64),
      Self::X86 | Self::Arm => Some(32),
      Self::Other => None,
    }
  }

  /// Returns the human-readable name for this architecture.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::X86 => "x86",
      Self::Aarch64 => "aarch64",
      Self::Arm => "arm",
      Self::Other => "other",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Architecture family. Each family has its own detector variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
  /// 32-bit and 64-bit ARM: auxiliary-vector HWCAP bits.
  Arm,
  /// 32-bit and 64-bit x86: runtime feature query.
  X86,
  /// No detector; every flag is `false`.
  Other,
}

// ─────────────────────────────────────────────────────────────────────────────
// Detection Snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// Complete detection result: which architecture answered, and what it said.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Detected {
  pub arch: Arch,
  pub flags: CapabilityFlags,
}

impl Detected {
  /// The all-false snapshot used under Miri and on unsupported targets.
  #[inline]
  #[must_use]
  pub const fn portable() -> Self {
    Self {
      arch: Arch::Other,
      flags: CapabilityFlags::NONE,
    }
  }
}

impl Default for Detected {
  #[inline]
  fn default() -> Self {
    Self::portable()
  }
}

impl fmt::Display for Detected {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} [", self.arch)?;
    for (i, name) in self.flags.feature_names().enumerate() {
      if i > 0 {
        f.write_str(", ")?;
      }
      f.write_str(name)?;
    }
    f.write_str("]")
  }
}


// ─────────────────────────────────────────────────────────────────────────────
// Property-Based Tests (proptest)
// Note: proptest uses filesystem for failure persistence, which Miri doesn't support.
// ─────────────────────────────────────────────────────────────────────────────
