//! Portable carry-less multiplication.
//!
//! Everything here is `const fn` and branch-free in the data, so the same
//! code serves as the runtime fallback, the reference for the hardware
//! kernels, and a build-time evaluator.
//!
//! Word order is little-endian throughout: index 0 (or `lo`) holds the least
//! significant bits.

use crate::Product128;

// ─────────────────────────────────────────────────────────────────────────────
// 64 x 64 -> 128
// ─────────────────────────────────────────────────────────────────────────────

/// Shift-and-XOR carry-less multiply of two 64-bit values.
///
/// This is the software equivalent of PCLMULQDQ/PMULL.
#[inline]
#[must_use]
pub const fn clmul64(a: u64, b: u64) -> Product128 {
  let mut hi: u64 = 0;
  let mut lo: u64 = 0;

  let mut i = 0;
  while i < 64 {
    // All-ones when bit i of `a` is set.
    let mask = 0u64.wrapping_sub((a >> i) & 1);
    lo ^= (b << i) & mask;
    if i != 0 {
      hi ^= (b >> (64 - i)) & mask;
    }
    i += 1;
  }

  Product128 { lo, hi }
}

/// One-level Karatsuba over 32-bit halves.
///
/// Three 32 x 32 multiplies instead of four; agrees with [`clmul64`] for
/// every input.
#[inline]
#[must_use]
pub const fn clmul64_karatsuba(a: u64, b: u64) -> Product128 {
  let (a1, a0) = ((a >> 32) as u32, a as u32);
  let (b1, b0) = ((b >> 32) as u32, b as u32);

  let c = clmul32(a1, b1);
  let d = clmul32(a0, b0);
  let e = clmul32(a0 ^ a1, b0 ^ b1);

  // Middle term: e ^ c ^ d, straddling the two output words.
  let mid = e ^ c ^ d;
  Product128 {
    lo: d ^ (mid << 32),
    hi: c ^ (mid >> 32),
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// 32 x 32 -> 64
// ─────────────────────────────────────────────────────────────────────────────

/// Carry-less multiply of two 32-bit values.
#[inline]
#[must_use]
pub const fn clmul32(x: u32, y: u32) -> u64 {
  clmul_degree(x, y, 32)
}

/// MSB-first carry-less multiply over the `degree` most significant bits
/// of `x`.
///
/// Each step shifts the running product left by one and XORs in `y` when the
/// current top bit of `x` is set. With `degree == 32` this is the full
/// 32 x 32 product; with `degree < 32` the low `32 - degree` bits of `x` are
/// never consulted, which suits operands stored left-aligned. Bits shifted
/// past bit 63 are dropped.
#[must_use]
pub const fn clmul_degree(x: u32, y: u32, degree: u32) -> u64 {
  let y = y as u64;
  let mut x = x;
  let mut product: u64 = 0;

  let mut i = 0;
  while i < degree {
    let top = (x >> 31) as u64;
    product = (product << 1) ^ (y & 0u64.wrapping_sub(top));
    x <<= 1;
    i += 1;
  }

  product
}

/// Carry-less multiply for bit-reflected operands.
///
/// Reflecting both 32-bit inputs yields a reflected 63-bit product; the extra
/// shift realigns it to the top of the 64-bit word.
#[inline]
#[must_use]
pub const fn clmul32_reflected(x: u32, y: u32) -> u64 {
  clmul32(x, y) << 1
}

// ─────────────────────────────────────────────────────────────────────────────
// 128 x 128 -> 256
// ─────────────────────────────────────────────────────────────────────────────

/// One-level Karatsuba over 64-bit halves.
///
/// Operands and result are little-endian word arrays.
#[must_use]
pub const fn clmul128(a: [u64; 2], b: [u64; 2]) -> [u64; 4] {
  let c = clmul64_karatsuba(a[1], b[1]);
  let d = clmul64_karatsuba(a[0], b[0]);
  let e = clmul64_karatsuba(a[0] ^ a[1], b[0] ^ b[1]);

  [
    d.lo,
    d.hi ^ c.lo ^ d.lo ^ e.lo,
    c.lo ^ c.hi ^ d.hi ^ e.hi,
    c.hi,
  ]
}


// ─────────────────────────────────────────────────────────────────────────────
// Property-Based Tests (proptest)
// Note: proptest uses filesystem for failure persistence, which Miri doesn't support.
// ─────────────────────────────────────────────────────────────────────────────
