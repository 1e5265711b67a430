//! Square `0x8000000000000001` with the carry-less multiply instruction.
//!
//! Prints `<lo:016x> <hi:016x>`. Without a hardware kernel the portable
//! implementation answers and a note goes to stderr. Always exits 0.

use std::io;

fn main() {
  let mut out = io::stdout().lock();
  let mut err = io::stderr().lock();
  if let Err(e) = hwprobe::report::run_clmul(&mut out, &mut err) {
    eprintln!("clmul: {e}");
  }
}
