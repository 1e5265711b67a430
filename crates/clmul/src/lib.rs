//! Carry-less (GF(2) polynomial) multiplication.
//!
//! Multiplies two 64-bit operands as polynomials over GF(2) and returns the
//! 128-bit product. The hardware instruction is used when the
//! [`platform`] detector reports it; otherwise a portable implementation
//! produces the identical result.
//!
//! # Backends
//!
//! | Target  | Instruction | Gate                             |
//! |---------|-------------|----------------------------------|
//! | x86_64  | `PCLMULQDQ` | `has_pmull` (`pclmulqdq` build)  |
//! | aarch64 | `PMULL`     | `has_pmull` (`aes` build)        |
//! | other   | portable    | always                           |
//!
//! # Example
//!
//! ```
//! let p = clmul::clmul(0x8000_0000_0000_0001, 0x8000_0000_0000_0001);
//! assert_eq!(p.lo, 0x0000_0000_0000_0001);
//! assert_eq!(p.hi, 0x4000_0000_0000_0000);
//! assert_eq!(p.to_string(), "0000000000000001 4000000000000000");
//! ```
//!
//! # no_std Support
//!
//! Disable the default `std` feature for embedded use. Detection then relies
//! on the compile-time target features alone.

#![no_std]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

#[cfg(any(test, feature = "std"))]
extern crate std;

use core::fmt;

mod dispatch;
pub mod emulate;
pub mod portable;

#[cfg(target_arch = "aarch64")]
pub mod aarch64;
#[cfg(target_arch = "x86_64")]
pub mod x86_64;

pub use dispatch::Backend;
pub use emulate::Vec128;

// ─────────────────────────────────────────────────────────────────────────────
// Product
// ─────────────────────────────────────────────────────────────────────────────

/// 128-bit carry-less product as two little-endian 64-bit words.
///
/// `Display` prints the low word first, each as 16 lowercase hex digits:
/// `"{lo:016x} {hi:016x}"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Product128 {
  /// Bits 0..64.
  pub lo: u64,
  /// Bits 64..128.
  pub hi: u64,
}

impl Product128 {
  /// The product as a single integer.
  #[inline]
  #[must_use]
  pub const fn as_u128(self) -> u128 {
    ((self.hi as u128) << 64) | self.lo as u128
  }
}

impl From<u128> for Product128 {
  #[inline]
  fn from(v: u128) -> Self {
    Self {
      lo: v as u64,
      hi: (v >> 64) as u64,
    }
  }
}

impl From<Product128> for u128 {
  #[inline]
  fn from(p: Product128) -> Self {
    p.as_u128()
  }
}

impl fmt::Display for Product128 {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:016x} {:016x}", self.lo, self.hi)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Carry-less multiply of `a` and `b`.
///
/// Bit `k` of the result is the XOR of `a_i & b_j` over all `i + j = k`. The
/// answer is the same on every backend.
#[inline]
#[must_use]
pub fn clmul(a: u64, b: u64) -> Product128 {
  (dispatch::active().kernel)(a, b)
}

/// Hardware carry-less multiply, if this process has a kernel for it.
///
/// Returns `None` when [`backend()`] is [`Backend::Portable`].
#[inline]
#[must_use]
pub fn clmul_hw(a: u64, b: u64) -> Option<Product128> {
  let sel = dispatch::active();
  sel.backend.is_hardware().then(|| (sel.kernel)(a, b))
}

/// The kernel [`clmul()`] runs on this process.
#[inline]
#[must_use]
pub fn backend() -> Backend {
  dispatch::active().backend
}
