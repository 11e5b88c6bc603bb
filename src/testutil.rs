//! Test and benchmark utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::block::BlockWriter;
use crate::column::{Append, Array, Column, FixedColumn, FixedString, LowCardinality, Nullable};

/// RNG seed for deterministic test data.
pub const RNG_SEED: u64 = 42;

/// `len` random bytes, deterministic for a given seed.
pub fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut buf = vec![0u8; len];
    rng.fill(&mut buf[..]);
    buf
}

/// `rows` values drawn from `distinct` possibilities, roughly one in five null.
pub fn random_low_cardinality_rows(rows: usize, distinct: u32, seed: u64) -> Vec<Option<u32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..rows)
        .map(|_| {
            if rng.gen_range(0..5) == 0 {
                None
            } else {
                Some(rng.gen_range(0..distinct))
            }
        })
        .collect()
}

/// Value of row `i` in the FixedString(10) scenario: right-aligned number
/// on even rows, null on odd ones (counting from 1).
pub fn fixed_string_row(i: usize) -> Option<String> {
    (i % 2 == 0).then(|| format!("{:10}", i))
}

/// Two blocks of a small mixed table:
/// `id UInt64`, `name LowCardinality(Nullable(FixedString(10)))`,
/// `scores Array(LowCardinality(Float32))`, `flag Nullable(UInt8)`.
pub fn sample_blocks() -> Vec<u8> {
    let mut id = FixedColumn::<u64>::new();
    let mut name = LowCardinality::nullable(FixedString::new(10));
    let mut scores = Array::new(LowCardinality::new(FixedColumn::<f32>::new()));
    let mut flag = Nullable::new(FixedColumn::<u8>::new());

    let mut writer = BlockWriter::new();
    for block in 0..2usize {
        for i in 1..=5usize {
            let row = block * 5 + i;
            id.append(row as u64);
            name.append_option(fixed_string_row(row).as_deref());
            scores.append_len(2);
            scores.inner_mut().append((row as f32) * -4.0);
            scores.inner_mut().append((row as f32) * -4.0 + 1.0);
            flag.append_option((row % 3 != 0).then_some(row as u8));
        }
        writer
            .insert(&mut [
                ("id", &mut id as &mut dyn Column),
                ("name", &mut name as &mut dyn Column),
                ("scores", &mut scores as &mut dyn Column),
                ("flag", &mut flag as &mut dyn Column),
            ])
            .unwrap();
    }
    writer.into_bytes()
}
