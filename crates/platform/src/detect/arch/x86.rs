// ─────────────────────────────────────────────────────────────────────────────
// x86 Detection (x86_64 + x86)
// ─────────────────────────────────────────────────────────────────────────────
//
// CPUID says what the silicon implements, not what the OS lets a process use.
// `is_x86_feature_detected!` folds in OSXSAVE/XCR0 and hypervisor masking, so
// it is used instead of raw leaf-1 bit tests.
//
// PCLMULQDQ (leaf 1 ECX bit 1) and SSE4.2 (leaf 1 ECX bit 20) are independent
// feature bits. CRC32C follows SSE4.2 alone.

#![cfg_attr(not(any(target_arch = "x86_64", target_arch = "x86")), allow(dead_code))]

use crate::caps::CapabilityFlags;

/// Combine the compile-time gates with runtime availability.
///
/// A flag is `true` only when both the build and the CPU agree. The IEEE
/// CRC32 flag is always `false`: x86 only has the Castagnoli `crc32`
/// instruction.
#[inline]
#[must_use]
pub(crate) const fn combine(gates: CapabilityFlags, pclmulqdq: bool, sse42: bool) -> CapabilityFlags {
  CapabilityFlags {
    has_pmull: gates.has_pmull && pclmulqdq,
    has_crc32: false,
    has_crc32c: gates.has_crc32c && sse42,
  }
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
pub(crate) fn detect_x86() -> CapabilityFlags {
  let gates = crate::detect::compile_time::gates_for(crate::caps::Family::X86);

  #[cfg(feature = "std")]
  {
    // Only query what the build could use.
    let pclmulqdq = gates.has_pmull && std::arch::is_x86_feature_detected!("pclmulqdq");
    let sse42 = gates.has_crc32c && std::arch::is_x86_feature_detected!("sse4.2");
    combine(gates, pclmulqdq, sse42)
  }

  // Without std the build is trusted: it was compiled for these features.
  #[cfg(not(feature = "std"))]
  {
    combine(gates, true, true)
  }
}
