//! Fuzz target for the auxiliary vector parser and HWCAP decoder.
//!
//! Tests that:
//! - No panics on arbitrary bytes and word sizes
//! - Unsupported word sizes and short buffers yield `None`
//! - Decoded flags always satisfy the ARM rule `crc32c == crc32`

#![no_main]

use libfuzzer_sys::fuzz_target;
use platform::testing;

fuzz_target!(|input: (u8, &[u8])| {
  let (width_sel, bytes) = input;
  let word_bytes = usize::from(width_sel % 10);

  let parsed = testing::parse_auxv(bytes, word_bytes);

  // ─── Invariant: Width and length gating ───
  if word_bytes != 4 && word_bytes != 8 {
    assert!(parsed.is_none(), "word size {word_bytes} must be rejected");
  }
  if bytes.len() < word_bytes * 2 {
    assert!(parsed.is_none(), "no complete entry in {} bytes", bytes.len());
  }

  // ─── Invariant: ARM CRC pairing ───
  if let Some((hwcap, hwcap2)) = parsed {
    for word_bits in [32, 64] {
      let flags = testing::decode_arm(word_bits, hwcap, hwcap2);
      assert_eq!(flags.has_crc32, flags.has_crc32c);
    }
  }
});
