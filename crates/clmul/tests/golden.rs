//! Known-answer tests shared by every backend.
//!
//! Whatever kernel this process selects, and whichever portable variant is
//! asked, the answers must be identical.

use clmul::{Product128, Vec128, emulate, portable};

// ─────────────────────────────────────────────────────────────────────────────
// Test Vectors
// ─────────────────────────────────────────────────────────────────────────────

/// (x^63 + 1)^2 = x^126 + 1
const GOLDEN_A: u64 = 0x8000_0000_0000_0001;
const GOLDEN: Product128 = Product128 {
  lo: 0x0000_0000_0000_0001,
  hi: 0x4000_0000_0000_0000,
};

const ALT: u64 = 0x5555_5555_5555_5555;

/// (a, b, lo, hi)
const VECTORS: &[(u64, u64, u64, u64)] = &[
  (0, 0, 0, 0),
  (1, 1, 1, 0),
  (0b11, 0b11, 0b101, 0),
  (1 << 63, 2, 0, 1),
  (1 << 63, 1 << 63, 0, 1 << 62),
  (u64::MAX, u64::MAX, ALT, ALT),
  (GOLDEN_A, GOLDEN_A, GOLDEN.lo, GOLDEN.hi),
];

fn all_backends(a: u64, b: u64) -> [(&'static str, Product128); 5] {
  let pclmul = emulate::pclmul_lqlq(Vec128::new(a, 0), Vec128::new(b, 0));
  let pmull2 = emulate::pmull2(Vec128::new(0, a), Vec128::new(0, b));
  [
    ("dispatch", clmul::clmul(a, b)),
    ("portable", portable::clmul64(a, b)),
    ("karatsuba", portable::clmul64_karatsuba(a, b)),
    ("emulate/pclmulqdq", Product128 { lo: pclmul.lo, hi: pclmul.hi }),
    ("emulate/pmull2", Product128 { lo: pmull2.lo, hi: pmull2.hi }),
  ]
}

#[test]
fn golden_vector_on_every_backend() {
  for (name, got) in all_backends(GOLDEN_A, GOLDEN_A) {
    assert_eq!(got, GOLDEN, "{name} disagrees on the golden vector");
  }
  if let Some(hw) = clmul::clmul_hw(GOLDEN_A, GOLDEN_A) {
    assert_eq!(hw, GOLDEN, "{} disagrees on the golden vector", clmul::backend());
  }
}

#[test]
fn table_vectors_on_every_backend() {
  for &(a, b, lo, hi) in VECTORS {
    let expected = Product128 { lo, hi };
    for (name, got) in all_backends(a, b) {
      assert_eq!(got, expected, "{name}: clmul({a:#x}, {b:#x})");
    }
  }
}

#[test]
fn golden_output_line() {
  assert_eq!(
    clmul::clmul(GOLDEN_A, GOLDEN_A).to_string(),
    "0000000000000001 4000000000000000"
  );
}

#[test]
fn wide_and_narrow_vectors() {
  assert_eq!(portable::clmul32(u32::MAX, u32::MAX), ALT);
  assert_eq!(portable::clmul128([u64::MAX; 2], [u64::MAX; 2]), [ALT; 4]);
  assert_eq!(portable::clmul32_reflected(0xD000_0000, 0x7000_0000), 0x4600_0000_0000_0000);
}

#[test]
fn backend_matches_detector() {
  let flags = platform::detect();
  if !flags.has_pmull {
    assert_eq!(clmul::backend(), clmul::Backend::Portable);
    assert_eq!(clmul::clmul_hw(3, 5), None);
  }
}
