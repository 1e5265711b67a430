//! PCLMULQDQ kernel.
//!
//! A single `_mm_clmulepi64_si128` on the low lanes produces the full 128-bit
//! product. Only SSE2 moves are used around it, so nothing beyond
//! `pclmulqdq` is required.

#![allow(unsafe_code)]
// Rust 2024 requires explicit `unsafe {}` even inside `unsafe fn` bodies.
// This module is intrinsically "unsafe-heavy", so we allow it at file scope.
#![allow(unsafe_op_in_unsafe_fn)]
#![allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]

use core::arch::x86_64::{
  __m128i, _mm_clmulepi64_si128, _mm_cvtsi64_si128, _mm_cvtsi128_si64, _mm_set_epi64x, _mm_unpackhi_epi64,
};

use crate::{Product128, emulate::Vec128};

#[inline(always)]
unsafe fn store(v: __m128i) -> Vec128 {
  let lo = _mm_cvtsi128_si64(v) as u64;
  let hi = _mm_cvtsi128_si64(_mm_unpackhi_epi64(v, v)) as u64;
  Vec128::new(lo, hi)
}

#[inline(always)]
unsafe fn load(v: Vec128) -> __m128i {
  _mm_set_epi64x(v.hi as i64, v.lo as i64)
}

/// Carry-less multiply of two 64-bit values with `PCLMULQDQ`.
///
/// # Safety
///
/// The CPU must support `pclmulqdq`. Callers must gate this on
/// [`platform::detect()`]`.has_pmull`.
#[inline]
#[target_feature(enable = "pclmulqdq")]
#[must_use]
pub unsafe fn clmul_pclmul(a: u64, b: u64) -> Product128 {
  let va = _mm_cvtsi64_si128(a as i64);
  let vb = _mm_cvtsi64_si128(b as i64);
  let r = store(_mm_clmulepi64_si128::<0x00>(va, vb));
  Product128 { lo: r.lo, hi: r.hi }
}

/// `PCLMULQDQ` with an immediate lane selector on full registers.
///
/// Bit 0 of `IMM8` selects the lane of `a`, bit 4 the lane of `b`.
///
/// # Safety
///
/// The CPU must support `pclmulqdq`.
#[inline]
#[target_feature(enable = "pclmulqdq")]
#[must_use]
pub unsafe fn pclmulqdq<const IMM8: i32>(a: Vec128, b: Vec128) -> Vec128 {
  store(_mm_clmulepi64_si128::<IMM8>(load(a), load(b)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{emulate, portable};

  fn have_pclmul() -> bool {
    !cfg!(miri) && std::arch::is_x86_feature_detected!("pclmulqdq")
  }

  #[test]
  fn test_golden_vector() {
    if !have_pclmul() {
      return;
    }
    // SAFETY: `pclmulqdq` verified above.
    let p = unsafe { clmul_pclmul(0x8000_0000_0000_0001, 0x8000_0000_0000_0001) };
    assert_eq!(p, Product128 { lo: 1, hi: 0x4000_0000_0000_0000 });
  }

  #[test]
  fn test_matches_portable_on_edges() {
    if !have_pclmul() {
      return;
    }
    let edges = [0u64, 1, 2, u64::MAX, 1 << 63, 0x8000_0000_0000_0001, 0xDEAD_BEEF_CAFE_F00D];
    for &a in &edges {
      for &b in &edges {
        // SAFETY: `pclmulqdq` verified above.
        let hw = unsafe { clmul_pclmul(a, b) };
        assert_eq!(hw, portable::clmul64(a, b), "a={a:#x} b={b:#x}");
      }
    }
  }

  #[test]
  fn test_selector_matches_emulation() {
    if !have_pclmul() {
      return;
    }
    let a = Vec128::new(0x0123_4567_89AB_CDEF, 0xFEDC_BA98_7654_3210);
    let b = Vec128::new(0x8000_0000_0000_0001, 0x0F0F_0F0F_F0F0_F0F0);
    // SAFETY: `pclmulqdq` verified above.
    unsafe {
      assert_eq!(pclmulqdq::<0x00>(a, b), emulate::pclmulqdq(a, b, 0x00));
      assert_eq!(pclmulqdq::<0x01>(a, b), emulate::pclmulqdq(a, b, 0x01));
      assert_eq!(pclmulqdq::<0x10>(a, b), emulate::pclmulqdq(a, b, 0x10));
      assert_eq!(pclmulqdq::<0x11>(a, b), emulate::pclmulqdq(a, b, 0x11));
    }
  }
}
