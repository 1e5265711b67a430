//! Fuzz target for the instruction emulation layer.
//!
//! Tests that:
//! - PCLMULQDQ selector forms pick the documented lanes
//! - PMULL/PMULL2 equal the low/high PCLMULQDQ forms
//! - Multiply-sum forms XOR to the sum of all lane products
//! - Accumulate forms are the plain form XOR the accumulator

#![no_main]

use arbitrary::Arbitrary;
use clmul::{Vec128, emulate, portable};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  a: (u64, u64),
  b: (u64, u64),
  acc: (u64, u64),
  imm8: u8,
}

fuzz_target!(|input: Input| {
  let a = Vec128::new(input.a.0, input.a.1);
  let b = Vec128::new(input.b.0, input.b.1);
  let acc = Vec128::new(input.acc.0, input.acc.1);

  // ─── Invariant: Selector semantics ───
  let x = if input.imm8 & 0x01 == 0 { a.lo } else { a.hi };
  let y = if input.imm8 & 0x10 == 0 { b.lo } else { b.hi };
  assert_eq!(emulate::pclmulqdq(a, b, input.imm8), Vec128::from(portable::clmul64(x, y)));

  // ─── Invariant: ARM forms ───
  assert_eq!(emulate::pmull(a, b), emulate::pclmul_lqlq(a, b));
  assert_eq!(emulate::pmull2(a, b), emulate::pclmul_hqhq(a, b));

  // ─── Invariant: Multiply-sum totals ───
  let d = emulate::vpmsumd(a, b);
  assert_eq!(d, emulate::pmull(a, b).xor(emulate::pmull2(a, b)));

  let w = emulate::vpmsumw(a, b);
  let words: u64 = (0..4).fold(0, |s, i| s ^ portable::clmul32(a.u32_lane(i), b.u32_lane(i)));
  assert_eq!(w.lo ^ w.hi, words);

  let h = emulate::vpmsumh(a, b);
  let halves: u32 = (0..8).fold(0, |s, i| {
    s ^ portable::clmul32(a.u16_lane(i).into(), b.u16_lane(i).into()) as u32
  });
  assert_eq!((0..4).fold(0, |s, i| s ^ h.u32_lane(i)), halves);

  let bb = emulate::vpmsumb(a, b);
  let bytes: u16 = (0..16).fold(0, |s, i| {
    s ^ portable::clmul32(a.u8_lane(i).into(), b.u8_lane(i).into()) as u16
  });
  assert_eq!((0..8).fold(0, |s, i| s ^ bb.u16_lane(i)), bytes);

  // ─── Invariant: Accumulate ───
  assert_eq!(emulate::vgfmag(a, b, acc), emulate::vgfmg(a, b).xor(acc));
  assert_eq!(emulate::vgfmaf(a, b, acc), emulate::vgfmf(a, b).xor(acc));
  assert_eq!(emulate::vgfmah(a, b, acc), emulate::vgfmh(a, b).xor(acc));
  assert_eq!(emulate::vgfmab(a, b, acc), emulate::vgfmb(a, b).xor(acc));

  // ─── Invariant: VMULL.P8 lanes ───
  let p8 = emulate::vmull_p8(a.lo, b.lo);
  for i in 0..8 {
    let expected = portable::clmul32(a.u8_lane(i).into(), b.u8_lane(i).into());
    assert_eq!(u64::from(p8.u16_lane(i)), expected);
  }
});
