//! A capability override must never put a hardware kernel on a CPU that
//! lacks the instruction. Own test binary: the override has to land before
//! anything detects.

#![cfg(all(feature = "std", not(miri), target_has_atomic = "8"))]

use clmul::{Backend, Product128};
use platform::CapabilityFlags;

#[test]
fn override_cannot_force_hardware_kernel() {
  platform::set_override(Some(CapabilityFlags::ALL));

  let flags = platform::detect();
  assert!(platform::compiled().has(flags));

  match clmul::backend() {
    #[cfg(target_arch = "x86_64")]
    Backend::Pclmulqdq => {
      assert!(flags.has_pmull);
      assert!(std::arch::is_x86_feature_detected!("pclmulqdq"));
    }
    #[cfg(target_arch = "aarch64")]
    Backend::Pmull => {
      assert!(flags.has_pmull);
      assert!(std::arch::is_aarch64_feature_detected!("aes"));
    }
    Backend::Portable => {}
    other => panic!("unexpected backend {other} for this target"),
  }

  let golden = clmul::clmul(0x8000_0000_0000_0001, 0x8000_0000_0000_0001);
  assert_eq!(golden, Product128 { lo: 1, hi: 0x4000_0000_0000_0000 });
}
