//! Fuzz target for `HWPROBE_DISABLE` parsing and masking.
//!
//! Tests that:
//! - No panics on arbitrary strings
//! - A mask never sets a flag
//! - Masked flags keep the family rules
//! - Clamped overrides never exceed the request or the build

#![no_main]

use libfuzzer_sys::fuzz_target;
use platform::{CapabilityFlags, Family, testing};

fuzz_target!(|input: (u8, &str)| {
  let (bits, value) = input;
  let flags = CapabilityFlags::from_bits(bits);
  let mask = testing::parse_disable(value);

  for family in [Family::Arm, Family::X86, Family::Other] {
    let out = testing::apply_disable(flags, mask, family);

    // ─── Invariant: Only clears ───
    assert!(flags.has(out), "mask set a flag: {flags:?} -> {out:?}");
    assert!(out.intersection(mask).is_empty(), "masked flag survived");

    // ─── Invariant: ARM CRC pairing ───
    if family == Family::Arm {
      assert_eq!(out.has_crc32, out.has_crc32c);
    }

    // ─── Invariant: Overrides stay inside the request, the mask and the family rules ───
    let clamped = testing::clamp_override(flags, family, mask);
    assert!(flags.has(clamped), "clamp set a flag: {flags:?} -> {clamped:?}");
    assert!(clamped.intersection(mask).is_empty());
    match family {
      Family::Arm => assert_eq!(clamped.has_crc32, clamped.has_crc32c),
      Family::X86 => assert!(!clamped.has_crc32),
      Family::Other => assert!(clamped.is_empty()),
    }
  }

  // ─── Invariant: ARM combine keeps the CRC pair tied ───
  let arm = testing::combine_arm(flags, CapabilityFlags::from_bits(bits >> 3));
  assert_eq!(arm.has_crc32, arm.has_crc32c);

  // ─── Invariant: x86 combine never reports CRC32 ───
  for (pclmulqdq, sse42) in [(false, false), (true, false), (false, true), (true, true)] {
    assert!(!testing::combine_x86(flags, pclmulqdq, sse42).has_crc32);
  }
});
