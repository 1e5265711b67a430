//! PMULL kernel.
//!
//! `vmull_p64` returns the 128-bit polynomial product directly as a `u128`;
//! `vmull_high_p64` does the same for the upper lanes of two vectors.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::aarch64::{vcombine_u64, vcreate_u64, vmull_high_p64, vmull_p64, vreinterpretq_p64_u64};

use crate::{Product128, emulate::Vec128};

/// Carry-less multiply of two 64-bit values with `PMULL`.
///
/// # Safety
///
/// The CPU must support the crypto extension (`aes`, which carries PMULL).
/// Callers must gate this on [`platform::detect()`]`.has_pmull`.
#[inline]
#[target_feature(enable = "neon,aes")]
#[must_use]
pub unsafe fn clmul_pmull(a: u64, b: u64) -> Product128 {
  Product128::from(vmull_p64(a, b))
}

/// `PMULL2` on full registers: product of the high lanes.
///
/// # Safety
///
/// The CPU must support the crypto extension.
#[inline]
#[target_feature(enable = "neon,aes")]
#[must_use]
pub unsafe fn pmull2(a: Vec128, b: Vec128) -> Vec128 {
  let va = vreinterpretq_p64_u64(vcombine_u64(vcreate_u64(a.lo), vcreate_u64(a.hi)));
  let vb = vreinterpretq_p64_u64(vcombine_u64(vcreate_u64(b.lo), vcreate_u64(b.hi)));
  Vec128::from_u128(vmull_high_p64(va, vb))
}
