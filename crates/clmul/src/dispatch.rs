//! Kernel selection.
//!
//! The kernel is resolved once per process from [`platform::detect()`] and
//! cached as a plain function pointer, so every call after the first is a
//! load and an indirect call.

#![allow(unsafe_code)]

use core::fmt;

use crate::{Product128, portable};

/// Kernel signature shared by every backend.
pub(crate) type ClmulFn = fn(u64, u64) -> Product128;

/// Which implementation [`clmul()`](crate::clmul) runs on this process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Backend {
  /// x86_64 `PCLMULQDQ`.
  Pclmulqdq,
  /// aarch64 `PMULL`.
  Pmull,
  /// Shift-and-XOR in software.
  Portable,
}

impl Backend {
  /// Short stable name, used in diagnostics.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Pclmulqdq => "x86_64/pclmulqdq",
      Self::Pmull => "aarch64/pmull",
      Self::Portable => "portable",
    }
  }

  /// Returns `true` for hardware kernels.
  #[inline]
  #[must_use]
  pub const fn is_hardware(self) -> bool {
    !matches!(self, Self::Portable)
  }
}

impl fmt::Display for Backend {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Clone, Copy)]
pub(crate) struct Selected {
  pub backend: Backend,
  pub kernel: ClmulFn,
}

#[inline]
fn portable_kernel(a: u64, b: u64) -> Product128 {
  portable::clmul64(a, b)
}

/// Compute CLMUL using `pclmulqdq` when selected by runtime detection.
#[cfg(target_arch = "x86_64")]
#[inline]
fn pclmul_runtime(a: u64, b: u64) -> Product128 {
  // SAFETY: only installed by `select` after the CPU confirmed `pclmulqdq`.
  unsafe { crate::x86_64::clmul_pclmul(a, b) }
}

/// Compute CLMUL using `PMULL` when selected by runtime detection.
#[cfg(target_arch = "aarch64")]
#[inline]
fn pmull_runtime(a: u64, b: u64) -> Product128 {
  // SAFETY: only installed by `select` after the CPU confirmed `aes` (PMULL).
  unsafe { crate::aarch64::clmul_pmull(a, b) }
}

/// Whether the CPU itself executes `PCLMULQDQ`.
#[cfg(target_arch = "x86_64")]
#[inline]
fn cpu_has_clmul() -> bool {
  #[cfg(feature = "std")]
  {
    std::arch::is_x86_feature_detected!("pclmulqdq")
  }

  #[cfg(not(feature = "std"))]
  {
    cfg!(target_feature = "pclmulqdq")
  }
}

/// Whether the CPU itself executes `PMULL`.
#[cfg(target_arch = "aarch64")]
#[inline]
fn cpu_has_clmul() -> bool {
  #[cfg(feature = "std")]
  {
    std::arch::is_aarch64_feature_detected!("aes")
  }

  #[cfg(not(feature = "std"))]
  {
    cfg!(target_feature = "aes")
  }
}

/// Pick the kernel for the given flags.
///
/// A hardware kernel needs both `has_pmull` and the CPU's own answer, so
/// flags from an override alone never install one. 32-bit ARM reports PMULL
/// but has no stable 64-bit polynomial multiply intrinsic, so it stays
/// portable.
pub(crate) fn select(flags: platform::CapabilityFlags) -> Selected {
  #[cfg(target_arch = "x86_64")]
  if flags.has_pmull && cpu_has_clmul() {
    return Selected {
      backend: Backend::Pclmulqdq,
      kernel: pclmul_runtime,
    };
  }

  #[cfg(target_arch = "aarch64")]
  if flags.has_pmull && cpu_has_clmul() {
    return Selected {
      backend: Backend::Pmull,
      kernel: pmull_runtime,
    };
  }

  let _ = flags;
  Selected {
    backend: Backend::Portable,
    kernel: portable_kernel,
  }
}

/// The kernel for this process.
#[inline]
pub(crate) fn active() -> Selected {
  #[cfg(feature = "std")]
  {
    use std::sync::OnceLock;
    static ACTIVE: OnceLock<Selected> = OnceLock::new();
    *ACTIVE.get_or_init(|| select(platform::detect()))
  }

  // Detection is already cached by `platform`; selection is a few branches.
  #[cfg(not(feature = "std"))]
  {
    select(platform::detect())
  }
}
