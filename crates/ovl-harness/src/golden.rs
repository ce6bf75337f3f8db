#![forbid(unsafe_code)]

//! Stable layout checksums for determinism checks.
//!
//! The checksum covers the seed, the shuffled images, and every placement
//! (coordinates by exact bit pattern), so any drift in the generator,
//! shuffle or search changes it. Format: `fnv1a:` followed by 16 hex digits.

use ovl_layout::{OverlayLayout, Side};

/// Prefix for checksums in logs.
pub const CHECKSUM_PREFIX: &str = "fnv1a:";

const FNV1A_OFFSET: u64 = 0xcbf29ce484222325;
const FNV1A_PRIME: u64 = 0x100000001b3;

#[inline]
fn fnv1a_hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(FNV1A_PRIME);
    }
}

#[inline]
fn fnv1a_hash_u64(hash: &mut u64, value: u64) {
    fnv1a_hash_bytes(hash, &value.to_le_bytes());
}

#[inline]
fn fnv1a_hash_str(hash: &mut u64, value: &str) {
    // Length first so ["ab","c"] and ["a","bc"] differ.
    fnv1a_hash_u64(hash, value.len() as u64);
    fnv1a_hash_bytes(hash, value.as_bytes());
}

/// Checksum of a resolved overlay layout.
#[must_use]
pub fn layout_checksum(layout: &OverlayLayout) -> String {
    let mut hash = FNV1A_OFFSET;
    fnv1a_hash_u64(&mut hash, layout.seed);
    fnv1a_hash_u64(&mut hash, layout.images.len() as u64);
    for image in &layout.images {
        fnv1a_hash_str(&mut hash, image);
    }
    fnv1a_hash_u64(&mut hash, layout.placements.len() as u64);
    for resolved in &layout.placements {
        let p = &resolved.placement;
        fnv1a_hash_u64(&mut hash, p.x.to_bits());
        fnv1a_hash_u64(&mut hash, p.y.to_bits());
        fnv1a_hash_u64(&mut hash, u64::from(p.size));
        fnv1a_hash_u64(&mut hash, p.image_index as u64);
        fnv1a_hash_bytes(
            &mut hash,
            match p.side {
                Side::Left => b"L",
                Side::Right => b"R",
            },
        );
        fnv1a_hash_str(&mut hash, &resolved.image);
    }
    format!("{CHECKSUM_PREFIX}{hash:016x}")
}
