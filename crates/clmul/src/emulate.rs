//! Software models of vector carry-less multiply instructions.
//!
//! Each function reproduces the lane selection and result placement of one
//! instruction over a [`Vec128`] register model, using the portable
//! multipliers for the arithmetic. They document what the hardware computes
//! and let kernels be tested against it on any host.
//!
//! Lanes are numbered little-endian: lane 0 holds the least significant bits.
//! POWER and z/Architecture number elements big-endian in their manuals; the
//! pairwise sums below are symmetric, so only the placement of each pair's
//! result depends on the numbering.

use core::fmt;

use crate::{Product128, portable};

// ─────────────────────────────────────────────────────────────────────────────
// Register Model
// ─────────────────────────────────────────────────────────────────────────────

/// A 128-bit vector register as two 64-bit lanes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vec128 {
  pub lo: u64,
  pub hi: u64,
}

impl Vec128 {
  pub const ZERO: Self = Self { lo: 0, hi: 0 };

  #[inline]
  #[must_use]
  pub const fn new(lo: u64, hi: u64) -> Self {
    Self { lo, hi }
  }

  #[inline]
  #[must_use]
  pub const fn from_u128(v: u128) -> Self {
    Self {
      lo: v as u64,
      hi: (v >> 64) as u64,
    }
  }

  #[inline]
  #[must_use]
  pub const fn to_u128(self) -> u128 {
    ((self.hi as u128) << 64) | self.lo as u128
  }

  /// 32-bit lane `i` (0..4).
  ///
  /// # Panics
  ///
  /// Panics if `i >= 4`.
  #[inline]
  #[must_use]
  pub const fn u32_lane(self, i: usize) -> u32 {
    assert!(i < 4, "u32 lane index out of range");
    (self.to_u128() >> (i * 32)) as u32
  }

  /// 16-bit lane `i` (0..8).
  ///
  /// # Panics
  ///
  /// Panics if `i >= 8`.
  #[inline]
  #[must_use]
  pub const fn u16_lane(self, i: usize) -> u16 {
    assert!(i < 8, "u16 lane index out of range");
    (self.to_u128() >> (i * 16)) as u16
  }

  /// 8-bit lane `i` (0..16).
  ///
  /// # Panics
  ///
  /// Panics if `i >= 16`.
  #[inline]
  #[must_use]
  pub const fn u8_lane(self, i: usize) -> u8 {
    assert!(i < 16, "u8 lane index out of range");
    (self.to_u128() >> (i * 8)) as u8
  }

  #[inline]
  #[must_use]
  pub const fn from_u32_lanes(lanes: [u32; 4]) -> Self {
    let mut v: u128 = 0;
    let mut i = 0;
    while i < 4 {
      v |= (lanes[i] as u128) << (i * 32);
      i += 1;
    }
    Self::from_u128(v)
  }

  #[inline]
  #[must_use]
  pub const fn from_u16_lanes(lanes: [u16; 8]) -> Self {
    let mut v: u128 = 0;
    let mut i = 0;
    while i < 8 {
      v |= (lanes[i] as u128) << (i * 16);
      i += 1;
    }
    Self::from_u128(v)
  }

  #[inline]
  #[must_use]
  pub const fn xor(self, other: Self) -> Self {
    Self {
      lo: self.lo ^ other.lo,
      hi: self.hi ^ other.hi,
    }
  }
}

impl From<Product128> for Vec128 {
  #[inline]
  fn from(p: Product128) -> Self {
    Self { lo: p.lo, hi: p.hi }
  }
}

impl From<u128> for Vec128 {
  #[inline]
  fn from(v: u128) -> Self {
    Self::from_u128(v)
  }
}

impl From<Vec128> for u128 {
  #[inline]
  fn from(v: Vec128) -> Self {
    v.to_u128()
  }
}

impl fmt::Display for Vec128 {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:016x}{:016x}", self.hi, self.lo)
  }
}

#[inline]
const fn wide(a: u64, b: u64) -> Vec128 {
  let p = portable::clmul64(a, b);
  Vec128 { lo: p.lo, hi: p.hi }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86: PCLMULQDQ
// ─────────────────────────────────────────────────────────────────────────────

/// `PCLMULQDQ xmm1, xmm2, imm8` (`_mm_clmulepi64_si128`).
///
/// Bit 0 of `imm8` selects the 64-bit lane of `a`, bit 4 the lane of `b`;
/// other bits are ignored.
#[inline]
#[must_use]
pub const fn pclmulqdq(a: Vec128, b: Vec128, imm8: u8) -> Vec128 {
  let x = if imm8 & 0x01 == 0 { a.lo } else { a.hi };
  let y = if imm8 & 0x10 == 0 { b.lo } else { b.hi };
  wide(x, y)
}

/// `PCLMULLQLQDQ`: low x low.
#[inline]
#[must_use]
pub const fn pclmul_lqlq(a: Vec128, b: Vec128) -> Vec128 {
  pclmulqdq(a, b, 0x00)
}

/// `PCLMULHQLQDQ`: high x low.
#[inline]
#[must_use]
pub const fn pclmul_hqlq(a: Vec128, b: Vec128) -> Vec128 {
  pclmulqdq(a, b, 0x01)
}

/// `PCLMULLQHQDQ`: low x high.
#[inline]
#[must_use]
pub const fn pclmul_lqhq(a: Vec128, b: Vec128) -> Vec128 {
  pclmulqdq(a, b, 0x10)
}

/// `PCLMULHQHQDQ`: high x high.
#[inline]
#[must_use]
pub const fn pclmul_hqhq(a: Vec128, b: Vec128) -> Vec128 {
  pclmulqdq(a, b, 0x11)
}

// ─────────────────────────────────────────────────────────────────────────────
// ARM: PMULL / PMULL2 / VMULL.P8
// ─────────────────────────────────────────────────────────────────────────────

/// ARMv8 `PMULL Vd.1Q, Vn.1D, Vm.1D` (`vmull_p64`): low lanes.
#[inline]
#[must_use]
pub const fn pmull(a: Vec128, b: Vec128) -> Vec128 {
  wide(a.lo, b.lo)
}

/// ARMv8 `PMULL2 Vd.1Q, Vn.2D, Vm.2D` (`vmull_high_p64`): high lanes.
#[inline]
#[must_use]
pub const fn pmull2(a: Vec128, b: Vec128) -> Vec128 {
  wide(a.hi, b.hi)
}

/// ARMv7 `VMULL.P8 Qd, Dn, Dm` (`vmull_p8`).
///
/// Eight independent 8 x 8 -> 16-bit products of the byte lanes of `a` and
/// `b`, placed in the eight 16-bit lanes of the result.
#[must_use]
pub const fn vmull_p8(a: u64, b: u64) -> Vec128 {
  let mut lanes = [0u16; 8];
  let mut i = 0;
  while i < 8 {
    let x = (a >> (i * 8)) as u8;
    let y = (b >> (i * 8)) as u8;
    lanes[i] = portable::clmul32(x as u32, y as u32) as u16;
    i += 1;
  }
  Vec128::from_u16_lanes(lanes)
}

// ─────────────────────────────────────────────────────────────────────────────
// POWER8: VPMSUM (multiply-sum)
// ─────────────────────────────────────────────────────────────────────────────
//
// Every element pair is multiplied; adjacent products are XORed into a
// double-width result element.

/// `vpmsumd`: both 64-bit products XORed into one 128-bit result.
#[inline]
#[must_use]
pub const fn vpmsumd(a: Vec128, b: Vec128) -> Vec128 {
  wide(a.lo, b.lo).xor(wide(a.hi, b.hi))
}

/// `vpmsumw`: four 32 x 32 products, pairwise XORed into two 64-bit lanes.
#[must_use]
pub const fn vpmsumw(a: Vec128, b: Vec128) -> Vec128 {
  let mut prod = [0u64; 4];
  let mut i = 0;
  while i < 4 {
    prod[i] = portable::clmul32(a.u32_lane(i), b.u32_lane(i));
    i += 1;
  }
  Vec128::new(prod[0] ^ prod[1], prod[2] ^ prod[3])
}

/// `vpmsumh`: eight 16 x 16 products, pairwise XORed into four 32-bit lanes.
#[must_use]
pub const fn vpmsumh(a: Vec128, b: Vec128) -> Vec128 {
  let mut prod = [0u32; 8];
  let mut i = 0;
  while i < 8 {
    prod[i] = portable::clmul32(a.u16_lane(i) as u32, b.u16_lane(i) as u32) as u32;
    i += 1;
  }
  Vec128::from_u32_lanes([
    prod[0] ^ prod[1],
    prod[2] ^ prod[3],
    prod[4] ^ prod[5],
    prod[6] ^ prod[7],
  ])
}

/// `vpmsumb`: sixteen 8 x 8 products, pairwise XORed into eight 16-bit lanes.
#[must_use]
pub const fn vpmsumb(a: Vec128, b: Vec128) -> Vec128 {
  let mut lanes = [0u16; 8];
  let mut i = 0;
  while i < 8 {
    let even = portable::clmul32(a.u8_lane(2 * i) as u32, b.u8_lane(2 * i) as u32);
    let odd = portable::clmul32(a.u8_lane(2 * i + 1) as u32, b.u8_lane(2 * i + 1) as u32);
    lanes[i] = (even ^ odd) as u16;
    i += 1;
  }
  Vec128::from_u16_lanes(lanes)
}

// ─────────────────────────────────────────────────────────────────────────────
// z/Architecture: VGFM (Galois field multiply sum)
// ─────────────────────────────────────────────────────────────────────────────

/// `VGFMG`: doubleword multiply sum.
#[inline]
#[must_use]
pub const fn vgfmg(a: Vec128, b: Vec128) -> Vec128 {
  vpmsumd(a, b)
}

/// `VGFMF`: word multiply sum.
#[inline]
#[must_use]
pub const fn vgfmf(a: Vec128, b: Vec128) -> Vec128 {
  vpmsumw(a, b)
}

/// `VGFMH`: halfword multiply sum.
#[inline]
#[must_use]
pub const fn vgfmh(a: Vec128, b: Vec128) -> Vec128 {
  vpmsumh(a, b)
}

/// `VGFMB`: byte multiply sum.
#[inline]
#[must_use]
pub const fn vgfmb(a: Vec128, b: Vec128) -> Vec128 {
  vpmsumb(a, b)
}

/// `VGFMAG`: doubleword multiply sum, XORed into `acc`.
#[inline]
#[must_use]
pub const fn vgfmag(a: Vec128, b: Vec128, acc: Vec128) -> Vec128 {
  vgfmg(a, b).xor(acc)
}

/// `VGFMAF`: word multiply sum, XORed into `acc`.
#[inline]
#[must_use]
pub const fn vgfmaf(a: Vec128, b: Vec128, acc: Vec128) -> Vec128 {
  vgfmf(a, b).xor(acc)
}

/// `VGFMAH`: halfword multiply sum, XORed into `acc`.
#[inline]
#[must_use]
pub const fn vgfmah(a: Vec128, b: Vec128, acc: Vec128) -> Vec128 {
  vgfmh(a, b).xor(acc)
}

/// `VGFMAB`: byte multiply sum, XORed into `acc`.
#[inline]
#[must_use]
pub const fn vgfmab(a: Vec128, b: Vec128, acc: Vec128) -> Vec128 {
  vgfmb(a, b).xor(acc)
}

#[cfg(test)]
mod tests {
  use super::*;

  const GOLDEN: u64 = 0x8000_0000_0000_0001;

  #[test]
  fn test_lane_accessors() {
    let v = Vec128::new(0x0706_0504_0302_0100, 0x0F0E_0D0C_0B0A_0908);
    assert_eq!(v.u8_lane(0), 0x00);
    assert_eq!(v.u8_lane(9), 0x09);
    assert_eq!(v.u16_lane(1), 0x0302);
    assert_eq!(v.u16_lane(7), 0x0F0E);
    assert_eq!(v.u32_lane(2), 0x0B0A_0908);
    assert_eq!(Vec128::from_u32_lanes([0x0302_0100, 0x0706_0504, 0x0B0A_0908, 0x0F0E_0D0C]), v);
    assert_eq!(Vec128::from(v.to_u128()), v);
  }

  #[test]
  fn test_last_lanes_are_top_bits() {
    let v = Vec128::new(0, 0xAABB_CCDD_EEFF_1122);
    assert_eq!(v.u32_lane(3), 0xAABB_CCDD);
    assert_eq!(v.u16_lane(7), 0xAABB);
    assert_eq!(v.u8_lane(15), 0xAA);
  }

  #[test]
  #[should_panic(expected = "u32 lane index out of range")]
  fn test_u32_lane_out_of_range_panics() {
    let _ = Vec128::ZERO.u32_lane(4);
  }

  #[test]
  #[should_panic(expected = "u16 lane index out of range")]
  fn test_u16_lane_out_of_range_panics() {
    let _ = Vec128::ZERO.u16_lane(8);
  }

  #[test]
  #[should_panic(expected = "u8 lane index out of range")]
  fn test_u8_lane_out_of_range_panics() {
    let _ = Vec128::new(1, 2).u8_lane(16);
  }

  #[test]
  fn test_pclmulqdq_selector() {
    let a = Vec128::new(GOLDEN, 3);
    let b = Vec128::new(GOLDEN, 5);
    let golden = Vec128::new(1, 0x4000_0000_0000_0000);

    assert_eq!(pclmulqdq(a, b, 0x00), golden);
    assert_eq!(pclmul_lqlq(a, b), golden);
    // 3 * 5 = (x + 1)(x^2 + 1) = x^3 + x^2 + x + 1
    assert_eq!(pclmul_hqhq(a, b), Vec128::new(0b1111, 0));
    assert_eq!(pclmul_hqlq(a, b), pclmulqdq(a, b, 0x01));
    assert_eq!(pclmul_lqhq(a, b), pclmulqdq(a, b, 0x10));
    // Only bits 0 and 4 matter.
    assert_eq!(pclmulqdq(a, b, 0xEE), pclmul_lqlq(a, b));
    assert_eq!(pclmulqdq(a, b, 0xFF), pclmul_hqhq(a, b));
  }

  #[test]
  fn test_pmull_pair() {
    let a = Vec128::new(GOLDEN, 0b11);
    let b = Vec128::new(GOLDEN, 0b11);
    assert_eq!(pmull(a, b), Vec128::new(1, 0x4000_0000_0000_0000));
    assert_eq!(pmull2(a, b), Vec128::new(0b101, 0));
  }

  #[test]
  fn test_vmull_p8_lanes() {
    let r = vmull_p8(0xFF03, 0xFF03);
    assert_eq!(r.u16_lane(0), 0b101);
    assert_eq!(r.u16_lane(1), 0x5555);
    for lane in 2..8 {
      assert_eq!(r.u16_lane(lane), 0);
    }
  }

  #[test]
  fn test_vpmsumd_sums_both_halves() {
    let a = Vec128::new(GOLDEN, GOLDEN);
    assert_eq!(vpmsumd(a, a), Vec128::ZERO);

    let b = Vec128::new(GOLDEN, 0);
    assert_eq!(vpmsumd(b, b), Vec128::new(1, 0x4000_0000_0000_0000));
  }

  #[test]
  fn test_vpmsumw_pairs() {
    let a = Vec128::from_u32_lanes([u32::MAX, 0, 0b11, 0b11]);
    let b = Vec128::from_u32_lanes([u32::MAX, 7, 0b11, 0b10]);
    let r = vpmsumw(a, b);
    assert_eq!(r.lo, 0x5555_5555_5555_5555);
    // 0b101 ^ 0b110
    assert_eq!(r.hi, 0b011);
  }

  #[test]
  fn test_vpmsumh_pairs() {
    let a = Vec128::from_u16_lanes([0xFFFF, 0, 1, 1, 0, 0, 0b11, 0]);
    let b = Vec128::from_u16_lanes([0xFFFF, 9, 4, 2, 0, 0, 0b11, 0]);
    let r = vpmsumh(a, b);
    assert_eq!(r.u32_lane(0), 0x5555_5555);
    assert_eq!(r.u32_lane(1), 0b110);
    assert_eq!(r.u32_lane(2), 0);
    assert_eq!(r.u32_lane(3), 0b101);
  }

  #[test]
  fn test_vpmsumb_pairs() {
    let a = Vec128::new(0x0000_0000_0000_01FF, 0x0300_0000_0000_0000);
    let b = Vec128::new(0x0000_0000_0000_02FF, 0x0300_0000_0000_0000);
    let r = vpmsumb(a, b);
    // lane 0: 0xFF*0xFF ^ 0x01*0x02
    assert_eq!(r.u16_lane(0), 0x5555 ^ 0x0002);
    for lane in 1..7 {
      assert_eq!(r.u16_lane(lane), 0);
    }
    // lane 7: bytes 14 and 15, only byte 15 set.
    assert_eq!(r.u16_lane(7), 0b101);
  }

  #[test]
  fn test_vgfm_accumulate() {
    let a = Vec128::new(GOLDEN, 0);
    let acc = Vec128::new(1, 1);
    assert_eq!(vgfmag(a, a, acc), Vec128::new(0, 0x4000_0000_0000_0001));
    assert_eq!(vgfmag(a, a, Vec128::ZERO), vgfmg(a, a));

    let x = Vec128::new(0x1234_5678_9ABC_DEF0, 0x0FED_CBA9_8765_4321);
    let y = Vec128::new(0x1111_2222_3333_4444, 0x5555_6666_7777_8888);
    assert_eq!(vgfmaf(x, y, acc), vgfmf(x, y).xor(acc));
    assert_eq!(vgfmah(x, y, acc), vgfmh(x, y).xor(acc));
    assert_eq!(vgfmab(x, y, acc), vgfmb(x, y).xor(acc));
  }
}
