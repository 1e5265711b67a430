//! Property tests: every backend computes the same GF(2) product.

#![cfg(not(miri))]

use clmul::{Product128, Vec128, emulate, portable};
use proptest::prelude::*;

proptest! {
  #![proptest_config(ProptestConfig::with_cases(512))]

  #[test]
  fn dispatch_matches_portable(a in any::<u64>(), b in any::<u64>()) {
    prop_assert_eq!(clmul::clmul(a, b), portable::clmul64(a, b));
  }

  #[test]
  fn hardware_matches_portable(a in any::<u64>(), b in any::<u64>()) {
    if let Some(hw) = clmul::clmul_hw(a, b) {
      prop_assert_eq!(hw, portable::clmul64(a, b));
    }
  }

  #[test]
  fn commutative(a in any::<u64>(), b in any::<u64>()) {
    prop_assert_eq!(clmul::clmul(a, b), clmul::clmul(b, a));
  }

  #[test]
  fn zero_and_one(b in any::<u64>()) {
    prop_assert_eq!(clmul::clmul(0, b), Product128 { lo: 0, hi: 0 });
    prop_assert_eq!(clmul::clmul(1, b), Product128 { lo: b, hi: 0 });
  }

  /// Multiplying by x^k is a left shift of the 128-bit value.
  #[test]
  fn power_of_two_is_shift(b in any::<u64>(), k in 0u32..64) {
    let p = clmul::clmul(1u64 << k, b);
    prop_assert_eq!(p.as_u128(), u128::from(b) << k);
  }

  #[test]
  fn selector_forms_cover_all_lanes(a_lo in any::<u64>(), a_hi in any::<u64>(), b_lo in any::<u64>(), b_hi in any::<u64>()) {
    let (a, b) = (Vec128::new(a_lo, a_hi), Vec128::new(b_lo, b_hi));
    prop_assert_eq!(emulate::pclmul_hqlq(a, b), Vec128::from(clmul::clmul(a_hi, b_lo)));
    prop_assert_eq!(emulate::pclmul_lqhq(a, b), Vec128::from(clmul::clmul(a_lo, b_hi)));
  }

  /// The four cross products of a 128-bit multiply reassemble into clmul128.
  #[test]
  fn clmul128_from_selector_products(a_lo in any::<u64>(), a_hi in any::<u64>(), b_lo in any::<u64>(), b_hi in any::<u64>()) {
    let (a, b) = (Vec128::new(a_lo, a_hi), Vec128::new(b_lo, b_hi));
    let ll = emulate::pclmul_lqlq(a, b);
    let hh = emulate::pclmul_hqhq(a, b);
    let mid = emulate::pclmul_hqlq(a, b).xor(emulate::pclmul_lqhq(a, b));
    let expected = [ll.lo, ll.hi ^ mid.lo, hh.lo ^ mid.hi, hh.hi];
    prop_assert_eq!(portable::clmul128([a_lo, a_hi], [b_lo, b_hi]), expected);
  }
}
