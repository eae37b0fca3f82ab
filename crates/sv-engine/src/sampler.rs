//! Content-addressed Bernoulli sampling
//!
//! Whether a row is kept depends only on the seed, the row's canonical
//! encoding and how many identical rows came before it. It does not depend
//! on row position, file chunking or the number of worker threads, so the
//! same input and seed always select the same multiset of rows.

use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use sv_core::Table;

/// SHA-256 of a row's canonical encoding
pub type RowDigest = [u8; 32];

/// Digest every row of a table on the current rayon pool
pub fn row_digests(table: &Table) -> Vec<RowDigest> {
    table
        .rows()
        .par_iter()
        .map(|row| row_digest(&Table::encode_row(row)))
        .collect()
}

pub fn row_digest(encoded: &[u8]) -> RowDigest {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(encoded));
    out
}

/// For each row, the number of earlier rows with the same digest.
///
/// Lets exact duplicates draw independently while keeping the draw free of
/// row position.
pub fn occurrence_ordinals(digests: &[RowDigest]) -> Vec<u32> {
    let mut seen: HashMap<&RowDigest, u32> = HashMap::with_capacity(digests.len());
    digests
        .iter()
        .map(|digest| {
            let count = seen.entry(digest).or_insert(0);
            let ordinal = *count;
            *count = count.saturating_add(1);
            ordinal
        })
        .collect()
}

/// Uniform draw in [0, 1) for one row
pub fn draw(seed: u64, digest: &RowDigest, ordinal: u32) -> f64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(digest);
    hasher.update(ordinal.to_le_bytes());
    let hash = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&hash[..8]);
    // 53 high bits fill the f64 mantissa exactly
    (u64::from_be_bytes(head) >> 11) as f64 / (1u64 << 53) as f64
}

/// Inclusion mask for a Bernoulli sample of `table`
pub fn inclusion_mask(table: &Table, seed: u64, fraction: f64) -> Vec<bool> {
    if fraction >= 1.0 {
        return vec![true; table.num_rows()];
    }

    let digests = row_digests(table);
    let ordinals = occurrence_ordinals(&digests);
    digests
        .par_iter()
        .zip(ordinals.par_iter())
        .map(|(digest, ordinal)| draw(seed, digest, *ordinal) < fraction)
        .collect()
}

#[cfg(test)]
#[path = "sampler_test.rs"]
mod tests;
