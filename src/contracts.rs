//! Runtime contracts for the codec's caller obligations.
//!
//! The codec is total on well-formed input and trusts its callers; these
//! contracts are how that trust gets checked during development:
//!
//! 1. They are **zero-cost in release builds** (`debug_assert!`)
//! 2. They fail **early**, at the call site that broke the contract, instead
//!    of as garbage output three layers later
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! - Input posting streams are strictly ascending by `(docid, pos)`
//! - Every encoded frame body is free of unescaped `0x00` bytes; the whole
//!   backward-scan strategy of the finder stands on this
//! - Every frame the encoder writes is reachable from its bucket's cell

use crate::codec::{MIN_HASH_BITS, ZERO_ESCAPE};
use crate::types::{Posting, FIELD_ID_BITS, IN_FIELD_BITS};

// ============================================================================
// COMPILE-TIME ASSERTIONS (evaluated at build time)
// ============================================================================

/// Static assertions about the format constants. If these fail, the crate
/// won't build.
const _: () = {
    // The packed position is exactly one u32.
    assert!(FIELD_ID_BITS + IN_FIELD_BITS == 32);

    // The zero escape is the two bytes the backward scan assumes: a bare
    // continuation byte, then an empty final byte.
    assert!(ZERO_ESCAPE[0] == 0x80);
    assert!(ZERO_ESCAPE[1] == 0x00);

    // Even degenerate inputs get a real table.
    assert!(MIN_HASH_BITS == 4);
};

// ============================================================================
// INPUT STREAM CONTRACTS
// ============================================================================

/// Check that a posting stream is strictly ascending by `(docid, pos)`.
///
/// Strictness also rules out duplicate pairs. Violations are a caller
/// contract breach; behaviour of `encode` on such input is undefined.
///
/// # Panics (debug builds only)
/// Panics at the first out-of-order pair.
#[inline]
pub fn check_postings_sorted(postings: &[Posting]) {
    for (i, pair) in postings.windows(2).enumerate() {
        debug_assert!(
            pair[0] < pair[1],
            "Contract violation: posting stream not strictly ascending at {}: ({}, {:#x}) !< ({}, {:#x})",
            i,
            pair[0].docid,
            pair[0].pos,
            pair[1].docid,
            pair[1].pos
        );
    }
}

// ============================================================================
// FRAME CONTRACTS
// ============================================================================

/// Check that a frame body contains no unescaped `0x00` byte.
///
/// Non-terminal varint bytes carry the continuation bit and the final byte
/// of a non-zero varint holds a non-zero chunk, so the only legal `0x00` in
/// a body is the tail of the `0x80 0x00` zero escape. The finder's backward
/// scan distinguishes terminators from body bytes on exactly this property.
#[inline]
pub fn check_frame_body_escaped(body: &[u8]) {
    for i in 0..body.len() {
        if body[i] == 0x00 {
            debug_assert!(
                i > 0 && body[i - 1] == 0x80,
                "Contract violation: unescaped zero byte at body offset {}",
                i
            );
        }
    }
}

/// Check that the frame being written is reachable from its bucket's cell:
/// the cell is registered and does not point past the frame.
#[inline]
pub fn check_frame_registered(cell: Option<u32>, frame_offset: usize) {
    debug_assert!(
        matches!(cell, Some(c) if c != 0 && c as usize <= frame_offset),
        "Contract violation: frame at {} has no registered cell at or before it (cell = {:?})",
        frame_offset,
        cell
    );
}
