//! Hardware probes for carry-less multiply and CRC instructions.
//!
//! `hwprobe` bundles the capability detector ([`platform`]) and the
//! carry-less multiplier ([`clmul`](mod@clmul)) behind the two probe programs:
//!
//! - `hwcap` prints which of PMULL/PCLMULQDQ, CRC32, and CRC32C this process
//!   can use.
//! - `clmul` multiplies `0x8000000000000001` by itself and prints the 128-bit
//!   product, low word first.
//!
//! # Quick Start
//!
//! ```
//! use hwprobe::{CapabilityFlags, report};
//!
//! let mut out = Vec::new();
//! report::write_hwcap(&mut out, CapabilityFlags::NONE)?;
//! assert_eq!(out, b"hasPMULL:  0\nhasCRC32:  0\nhasCRC32C: 0\n");
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! # Configuration
//!
//! | Knob | Effect |
//! |------|--------|
//! | `-C target-feature=+aes,+crc` | Allows PMULL / CRC32 to be reported on ARM |
//! | `-C target-feature=+pclmulqdq,+sse4.2` | Allows PCLMULQDQ / CRC32C to be reported on x86 |
//! | `HWPROBE_DISABLE=pmull,crc32,crc32c,all` | Clears the listed flags after detection (`pclmulqdq` is an alias of `pmull`) |

pub use clmul::{Backend, Product128, backend, clmul, clmul_hw};
pub use platform::{Arch, CapabilityFlags, Detected, TargetFeature, compiled, detect};

pub mod report;
