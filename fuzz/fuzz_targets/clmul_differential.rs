//! Differential fuzzing of every carry-less multiply backend.
//!
//! Tests that:
//! - Dispatch, hardware, shift-and-XOR, and Karatsuba agree
//! - The product is commutative
//! - The 128-bit Karatsuba matches four 64-bit products

#![no_main]

use clmul::{Product128, portable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: [u64; 4]| {
  let [a, b, c, d] = data;
  let reference = portable::clmul64(a, b);

  // ─── Invariant: Backends agree ───
  assert_eq!(clmul::clmul(a, b), reference, "dispatch mismatch for {a:#x} x {b:#x}");
  assert_eq!(portable::clmul64_karatsuba(a, b), reference, "karatsuba mismatch");
  if let Some(hw) = clmul::clmul_hw(a, b) {
    assert_eq!(hw, reference, "{} mismatch for {a:#x} x {b:#x}", clmul::backend());
  }

  // ─── Invariant: Commutativity ───
  assert_eq!(portable::clmul64(b, a), reference, "clmul must commute");

  // ─── Invariant: 128-bit schoolbook ───
  let ll = portable::clmul64(a, c);
  let lh = portable::clmul64(a, d);
  let hl = portable::clmul64(b, c);
  let hh = portable::clmul64(b, d);
  let mid = Product128 {
    lo: lh.lo ^ hl.lo,
    hi: lh.hi ^ hl.hi,
  };
  assert_eq!(
    portable::clmul128([a, b], [c, d]),
    [ll.lo, ll.hi ^ mid.lo, hh.lo ^ mid.hi, hh.hi],
    "clmul128 mismatch"
  );

  // ─── Invariant: 32-bit forms ───
  let (x, y) = (a as u32, b as u32);
  assert_eq!(portable::clmul32(x, y), portable::clmul64(x.into(), y.into()).lo);
  assert_eq!(portable::clmul32_reflected(x, y), portable::clmul32(x, y) << 1);
});
