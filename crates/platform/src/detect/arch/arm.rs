// ─────────────────────────────────────────────────────────────────────────────
// ARM Detection (aarch64 + arm)
// ─────────────────────────────────────────────────────────────────────────────
//
// The kernel publishes CPU features through the ELF auxiliary vector. On
// 64-bit, PMULL and CRC32 live in AT_HWCAP; on 32-bit they live in AT_HWCAP2
// at different bit positions. The width class is fixed at build time.
//
// Parsing and decoding are pure and compiled on every target so they can be
// tested on any host; only the `/proc/self/auxv` read is platform gated.

#![cfg_attr(not(any(target_arch = "aarch64", target_arch = "arm")), allow(dead_code))]

use crate::caps::CapabilityFlags;

/// ELF auxiliary vector keys (from `linux/auxvec.h`).
pub(crate) const AT_NULL: u64 = 0;
pub(crate) const AT_HWCAP: u64 = 16;
pub(crate) const AT_HWCAP2: u64 = 26;

/// HWCAP bit positions (from `linux/arch/arm64/include/uapi/asm/hwcap.h`).
pub(crate) const HWCAP_PMULL: u64 = 1 << 4;
pub(crate) const HWCAP_CRC32: u64 = 1 << 7;

/// HWCAP2 bit positions (from `linux/arch/arm/include/uapi/asm/hwcap.h`).
pub(crate) const HWCAP2_PMULL: u64 = 1 << 1;
pub(crate) const HWCAP2_CRC32: u64 = 1 << 4;

/// The two capability words of the auxiliary vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Hwcaps {
  pub hwcap: u64,
  pub hwcap2: u64,
}

/// Parse a raw auxiliary vector.
///
/// The vector is a sequence of `(type, value)` pairs of native words
/// (`word_bytes` is 4 on 32-bit, 8 on 64-bit) terminated by `AT_NULL`.
/// A missing terminator is tolerated; a trailing partial entry is ignored.
///
/// Returns `None` for an unsupported word size or when the buffer holds no
/// complete entry.
#[must_use]
pub(crate) fn parse_auxv(bytes: &[u8], word_bytes: usize) -> Option<Hwcaps> {
  let read_word = |chunk: &[u8]| -> Option<u64> {
    match word_bytes {
      4 => Some(u64::from(u32::from_ne_bytes(chunk.try_into().ok()?))),
      8 => Some(u64::from_ne_bytes(chunk.try_into().ok()?)),
      _ => None,
    }
  };

  if word_bytes != 4 && word_bytes != 8 {
    return None;
  }

  let mut caps = Hwcaps::default();
  let mut entries = 0usize;

  for entry in bytes.chunks_exact(word_bytes * 2) {
    let (key, value) = entry.split_at(word_bytes);
    let a_type = read_word(key)?;
    let a_val = read_word(value)?;
    entries += 1;

    match a_type {
      AT_NULL => break,
      AT_HWCAP => caps.hwcap = a_val,
      AT_HWCAP2 => caps.hwcap2 = a_val,
      _ => {}
    }
  }

  (entries > 0).then_some(caps)
}

/// Decode the capability words for the given register width class.
///
/// Any width other than 32 or 64 yields [`CapabilityFlags::NONE`].
#[must_use]
pub(crate) const fn decode(word_bits: u32, caps: Hwcaps) -> CapabilityFlags {
  let (pmull, crc32) = match word_bits {
    64 => (caps.hwcap & HWCAP_PMULL != 0, caps.hwcap & HWCAP_CRC32 != 0),
    32 => (caps.hwcap2 & HWCAP2_PMULL != 0, caps.hwcap2 & HWCAP2_CRC32 != 0),
    _ => (false, false),
  };

  // The ARM CRC32 extension implements both polynomials.
  CapabilityFlags {
    has_pmull: pmull,
    has_crc32: crc32,
    has_crc32c: crc32,
  }
}

/// Read `/proc/self/auxv` into a fixed buffer. The vector is small (well
/// under a page); anything beyond the buffer is ignored.
#[cfg(all(feature = "std", any(target_os = "linux", target_os = "android")))]
fn read_auxv(buf: &mut [u8]) -> Option<usize> {
  use std::{fs::File, io::Read};

  let mut file = File::open("/proc/self/auxv").ok()?;
  let mut filled = 0;
  while filled < buf.len() {
    match file.read(buf.get_mut(filled..)?) {
      Ok(0) => break,
      Ok(n) => filled += n,
      Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
      Err(_) => return None,
    }
  }
  Some(filled)
}

/// Runtime ARM flags on Linux/Android.
#[cfg(all(
  any(target_arch = "aarch64", target_arch = "arm"),
  feature = "std",
  any(target_os = "linux", target_os = "android")
))]
fn runtime_arm() -> CapabilityFlags {
  let Some(word_bits) = crate::caps::Arch::current().word_bits() else {
    return CapabilityFlags::NONE;
  };

  let mut buf = [0u8; 4096];
  read_auxv(&mut buf)
    .and_then(|n| parse_auxv(buf.get(..n)?, core::mem::size_of::<usize>()))
    .map_or(CapabilityFlags::NONE, |caps| decode(word_bits, caps))
}

/// Runtime ARM flags on other operating systems: no auxiliary vector, so
/// nothing can be claimed.
#[cfg(all(
  any(target_arch = "aarch64", target_arch = "arm"),
  feature = "std",
  not(any(target_os = "linux", target_os = "android"))
))]
fn runtime_arm() -> CapabilityFlags {
  CapabilityFlags::NONE
}

/// Combine the compile-time gates with runtime availability.
///
/// A flag is `true` only when both the build and the OS agree. The CRC pair
/// stays tied: both are set or neither is.
#[inline]
#[must_use]
pub(crate) const fn combine(gates: CapabilityFlags, runtime: CapabilityFlags) -> CapabilityFlags {
  let crc = gates.has_crc32 && gates.has_crc32c && runtime.has_crc32 && runtime.has_crc32c;
  CapabilityFlags {
    has_pmull: gates.has_pmull && runtime.has_pmull,
    has_crc32: crc,
    has_crc32c: crc,
  }
}

/// Run `runtime` only if the build can use something it might report.
#[inline]
pub(crate) fn read_if_gated(gates: CapabilityFlags, runtime: impl FnOnce() -> CapabilityFlags) -> CapabilityFlags {
  if gates.is_empty() {
    return CapabilityFlags::NONE;
  }
  combine(gates, runtime())
}

#[cfg(any(target_arch = "aarch64", target_arch = "arm"))]
pub(crate) fn detect_arm() -> CapabilityFlags {
  let gates = crate::detect::compile_time::gates_for(crate::caps::Family::Arm);

  #[cfg(feature = "std")]
  {
    read_if_gated(gates, runtime_arm)
  }

  // Without std the build is trusted: it was compiled for these features.
  #[cfg(not(feature = "std"))]
  {
    read_if_gated(gates, || CapabilityFlags::ALL)
  }
}
