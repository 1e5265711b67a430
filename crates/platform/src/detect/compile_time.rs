// ─────────────────────────────────────────────────────────────────────────────
// Compile-Time Gates
// ─────────────────────────────────────────────────────────────────────────────

use core::fmt;

use crate::caps::{Arch, CapabilityFlags, Family};

/// Build-time instruction-set switches that gate what the detector may report.
///
/// A flag is reported `true` only if the binary was compiled with the
/// matching `-C target-feature=+...` (or a `target-cpu` implying it). The CPU
/// having the instruction is not enough: code that was never compiled for it
/// cannot use it.
///
/// | Variant     | rustc feature | Family | Gates                 |
/// |-------------|---------------|--------|-----------------------|
/// | `Crc`       | `crc`         | ARM    | `has_crc32`, `has_crc32c` |
/// | `Crypto`    | `aes`         | ARM    | `has_pmull`           |
/// | `Pclmulqdq` | `pclmulqdq`   | x86    | `has_pmull`           |
/// | `Sse42`     | `sse4.2`      | x86    | `has_crc32c`          |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetFeature {
  Crc,
  Crypto,
  Pclmulqdq,
  Sse42,
}

impl TargetFeature {
  /// Every gate, in table order.
  pub const ALL: [Self; 4] = [Self::Crc, Self::Crypto, Self::Pclmulqdq, Self::Sse42];

  /// The `target_feature` name rustc uses for this gate.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Crc => "crc",
      Self::Crypto => "aes",
      Self::Pclmulqdq => "pclmulqdq",
      Self::Sse42 => "sse4.2",
    }
  }

  /// Architecture family this gate belongs to.
  #[inline]
  #[must_use]
  pub const fn family(self) -> Family {
    match self {
      Self::Crc | Self::Crypto => Family::Arm,
      Self::Pclmulqdq | Self::Sse42 => Family::X86,
    }
  }

  /// Returns `true` if this binary was compiled with the feature enabled.
  ///
  /// Always `false` for gates of a family other than the build target's.
  #[inline]
  #[must_use]
  pub const fn is_compiled(self) -> bool {
    match self {
      Self::Crc => cfg!(all(any(target_arch = "aarch64", target_arch = "arm"), target_feature = "crc")),
      Self::Crypto => cfg!(all(any(target_arch = "aarch64", target_arch = "arm"), target_feature = "aes")),
      Self::Pclmulqdq => cfg!(all(
        any(target_arch = "x86_64", target_arch = "x86"),
        target_feature = "pclmulqdq"
      )),
      Self::Sse42 => cfg!(all(any(target_arch = "x86_64", target_arch = "x86"), target_feature = "sse4.2")),
    }
  }
}

impl fmt::Display for TargetFeature {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Capabilities the build alone guarantees.
///
/// Evaluates at compile time; the compiler removes all dead branches.
///
/// ```
/// use platform::{CapabilityFlags, compiled};
///
/// const BUILT_FOR: CapabilityFlags = compiled();
///
/// // x86 never reports the IEEE CRC32 instruction.
/// #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
/// assert!(!BUILT_FOR.has_crc32);
/// ```
#[inline(always)]
#[must_use]
pub const fn compiled() -> CapabilityFlags {
  gates_for(Arch::current().family())
}

/// Apply the compile-time gates of `family` to an all-true flag set.
#[inline]
#[must_use]
pub(crate) const fn gates_for(family: Family) -> CapabilityFlags {
  match family {
    Family::Arm => {
      let crc = TargetFeature::Crc.is_compiled();
      CapabilityFlags {
        has_pmull: TargetFeature::Crypto.is_compiled(),
        has_crc32: crc,
        has_crc32c: crc,
      }
    }
    Family::X86 => CapabilityFlags {
      has_pmull: TargetFeature::Pclmulqdq.is_compiled(),
      has_crc32: false,
      has_crc32c: TargetFeature::Sse42.is_compiled(),
    },
    Family::Other => CapabilityFlags::NONE,
  }
}
