//! Output of the probe programs.
//!
//! Both programs write their report to stdout and diagnostics to stderr.
//! The writers are generic so the exact bytes can be tested.

use std::io::{self, Write};

use clmul::Product128;
use platform::CapabilityFlags;

/// Operand the `clmul` program squares: `x^63 + 1`.
pub const PROBE_OPERAND: u64 = 0x8000_0000_0000_0001;

/// Write the three `hwcap` report lines.
///
/// ```text
/// hasPMULL:  <0|1>
/// hasCRC32:  <0|1>
/// hasCRC32C: <0|1>
/// ```
pub fn write_hwcap<W: Write>(out: &mut W, flags: CapabilityFlags) -> io::Result<()> {
  writeln!(out, "{flags}")
}

/// Write the `clmul` report line: `"{lo:016x} {hi:016x}"`.
pub fn write_product<W: Write>(out: &mut W, product: Product128) -> io::Result<()> {
  writeln!(out, "{product}")
}

/// Result of the `clmul` probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClmulProbe {
  pub product: Product128,
  /// `false` when no hardware kernel was available and the portable
  /// implementation answered instead.
  pub hardware: bool,
}

/// Square [`PROBE_OPERAND`], preferring the hardware kernel.
#[must_use]
pub fn probe_clmul() -> ClmulProbe {
  match clmul::clmul_hw(PROBE_OPERAND, PROBE_OPERAND) {
    Some(product) => ClmulProbe { product, hardware: true },
    None => ClmulProbe {
      product: clmul::portable::clmul64(PROBE_OPERAND, PROBE_OPERAND),
      hardware: false,
    },
  }
}

/// Run the `clmul` program against the given sinks.
///
/// The product goes to `out`. A fallback note goes to `err` when the
/// portable path answered; `out` is identical either way.
pub fn run_clmul<W: Write, E: Write>(out: &mut W, err: &mut E) -> io::Result<ClmulProbe> {
  let probe = probe_clmul();
  if !probe.hardware {
    writeln!(
      err,
      "note: no hardware carry-less multiply on this build/CPU ({}); using {}",
      platform::get(),
      clmul::Backend::Portable
    )?;
  }
  write_product(out, probe.product)?;
  Ok(probe)
}
