//! Print carry-less multiply and CRC instruction availability.
//!
//! Output (always exits 0):
//!
//! ```text
//! hasPMULL:  <0|1>
//! hasCRC32:  <0|1>
//! hasCRC32C: <0|1>
//! ```

use std::io;

fn main() {
  let flags = hwprobe::detect();
  if let Err(err) = hwprobe::report::write_hwcap(&mut io::stdout().lock(), flags) {
    eprintln!("hwcap: {err}");
  }
}
