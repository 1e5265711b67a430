//! Carry-less multiply benchmarks.
//!
//! Run: `cargo bench -p clmul`
//! Native: `RUSTFLAGS='-C target-cpu=native' cargo bench -p clmul`
//!
//! This benchmarks:
//! - Main dispatch path (auto-selects best backend)
//! - Portable shift-and-XOR and Karatsuba
//! - Direct hardware kernels (when available)

#![allow(unsafe_code)] // Required for direct kernel benchmarks

use core::hint::black_box;

use clmul::portable;
use criterion::{Criterion, criterion_group, criterion_main};

const A: u64 = 0x8000_0000_0000_0001;
const B: u64 = 0xDEAD_BEEF_CAFE_F00D;

fn bench_dispatch(c: &mut Criterion) {
  let mut group = c.benchmark_group("clmul/dispatch");
  eprintln!("clmul backend: {}", clmul::backend());

  group.bench_function("clmul", |b| b.iter(|| clmul::clmul(black_box(A), black_box(B))));
  group.finish();
}

fn bench_portable(c: &mut Criterion) {
  let mut group = c.benchmark_group("clmul/portable");

  group.bench_function("shift_xor", |b| {
    b.iter(|| portable::clmul64(black_box(A), black_box(B)))
  });
  group.bench_function("karatsuba", |b| {
    b.iter(|| portable::clmul64_karatsuba(black_box(A), black_box(B)))
  });
  group.bench_function("clmul128", |b| {
    b.iter(|| portable::clmul128(black_box([A, B]), black_box([B, A])))
  });

  group.finish();
}

#[cfg(target_arch = "x86_64")]
fn bench_hardware(c: &mut Criterion) {
  if !std::arch::is_x86_feature_detected!("pclmulqdq") {
    return;
  }
  let mut group = c.benchmark_group("clmul/x86_64");
  group.bench_function("pclmulqdq", |b| {
    // SAFETY: `pclmulqdq` verified above.
    b.iter(|| unsafe { clmul::x86_64::clmul_pclmul(black_box(A), black_box(B)) })
  });
  group.finish();
}

#[cfg(target_arch = "aarch64")]
fn bench_hardware(c: &mut Criterion) {
  if !std::arch::is_aarch64_feature_detected!("aes") {
    return;
  }
  let mut group = c.benchmark_group("clmul/aarch64");
  group.bench_function("pmull", |b| {
    // SAFETY: PMULL verified above.
    b.iter(|| unsafe { clmul::aarch64::clmul_pmull(black_box(A), black_box(B)) })
  });
  group.finish();
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn bench_hardware(_c: &mut Criterion) {}

criterion_group!(benches, bench_dispatch, bench_portable, bench_hardware);
criterion_main!(benches);
