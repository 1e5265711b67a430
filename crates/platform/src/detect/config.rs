// ─────────────────────────────────────────────────────────────────────────────
// Environment Overrides
// ─────────────────────────────────────────────────────────────────────────────
//
// `HWPROBE_DISABLE` lists flags to clear after detection, separated by commas
// or whitespace: `pmull`, `crc32`, `crc32c`, `all`. `pclmulqdq` is the x86
// name for `pmull` and clears the same flag. Matching is case-insensitive;
// unknown tokens are ignored.
//
// A mask can only clear flags. It is always clamped to what was detected.

use crate::caps::{CapabilityFlags, Family};

/// Environment variable holding the disable list.
pub const DISABLE_ENV: &str = "HWPROBE_DISABLE";

/// Parse a disable list into the set of flags to clear.
#[cfg_attr(not(feature = "std"), allow(dead_code))]
#[must_use]
pub(crate) fn parse_mask(value: &str) -> CapabilityFlags {
  let mut mask = CapabilityFlags::NONE;

  for token in value.split(|c: char| c == ',' || c.is_ascii_whitespace()) {
    let token = token.trim();
    if token.is_empty() {
      continue;
    }

    if token.eq_ignore_ascii_case("all") {
      return CapabilityFlags::ALL;
    }
    if token.eq_ignore_ascii_case("pmull") || token.eq_ignore_ascii_case("pclmulqdq") {
      mask.has_pmull = true;
    } else if token.eq_ignore_ascii_case("crc32") {
      mask.has_crc32 = true;
    } else if token.eq_ignore_ascii_case("crc32c") {
      mask.has_crc32c = true;
    }
  }

  mask
}

/// Clear `mask` from `flags`, then restore the family invariant.
///
/// On ARM one instruction set serves both polynomials, so clearing either
/// CRC flag clears both.
#[inline]
#[must_use]
pub(crate) const fn apply_mask(flags: CapabilityFlags, mask: CapabilityFlags, family: Family) -> CapabilityFlags {
  let mut out = flags.difference(mask);
  if matches!(family, Family::Arm) {
    let crc = out.has_crc32 && out.has_crc32c;
    out.has_crc32 = crc;
    out.has_crc32c = crc;
  }
  out
}

#[cfg(feature = "std")]
fn read_env_mask() -> CapabilityFlags {
  std::env::var(DISABLE_ENV)
    .map(|v| parse_mask(&v))
    .unwrap_or(CapabilityFlags::NONE)
}

/// The disable mask for this process, read once.
#[cfg(feature = "std")]
pub(crate) fn mask() -> CapabilityFlags {
  use std::sync::OnceLock;
  static MASK: OnceLock<CapabilityFlags> = OnceLock::new();
  *MASK.get_or_init(read_env_mask)
}

#[cfg(not(feature = "std"))]
pub(crate) fn mask() -> CapabilityFlags {
  CapabilityFlags::NONE
}
