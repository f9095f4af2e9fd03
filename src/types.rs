// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The posting: one keyword occurrence in one document.
//!
//! A posting is a `(docid, pos)` pair. The `pos` field is packed 8:24: the
//! high 8 bits name the field the occurrence sits in (title, body, anchor,
//! ...) and the low 24 bits are the position inside that field. Packing keeps a
//! posting at eight bytes, and the codec exploits the split: the field id is
//! low-entropy, so the encoder moves it into the least-significant bits where
//! varint encoding compresses it best.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - Posting streams handed to `encode` are sorted ascending by
//!   `(docid, pos)` with no duplicate pairs. The codec trusts this; it is
//!   checked only by debug contracts (see `contracts`).
//! - `in_field_pos` never exceeds 24 bits. `Posting::packed` debug-asserts it.

use serde::{Deserialize, Serialize};

/// Bits of `pos` holding the field identifier.
pub const FIELD_ID_BITS: u32 = 8;

/// Bits of `pos` holding the in-field position.
pub const IN_FIELD_BITS: u32 = 24;

/// Mask over the in-field position bits.
pub const IN_FIELD_MASK: u32 = (1 << IN_FIELD_BITS) - 1;

/// One keyword occurrence: document id plus packed in-document position.
///
/// Ordering is `(docid, pos)` ascending, which the derive gives us from the
/// field order. That ordering is the sort key for every stream the codec
/// consumes or produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Posting {
    pub docid: u32,
    /// Packed 8:24 `field_id:in_field_pos`.
    pub pos: u32,
}

impl Posting {
    /// Construct from a docid and an already-packed position.
    #[inline]
    pub fn new(docid: u32, pos: u32) -> Self {
        Posting { docid, pos }
    }

    /// Construct from the unpacked parts.
    #[inline]
    pub fn packed(docid: u32, field_id: u8, in_field_pos: u32) -> Self {
        debug_assert!(
            in_field_pos <= IN_FIELD_MASK,
            "in-field position {} exceeds {} bits",
            in_field_pos,
            IN_FIELD_BITS
        );
        Posting {
            docid,
            pos: (u32::from(field_id) << IN_FIELD_BITS) | (in_field_pos & IN_FIELD_MASK),
        }
    }

    /// The field this occurrence sits in (high 8 bits of `pos`).
    #[inline]
    pub fn field_id(self) -> u32 {
        self.pos >> IN_FIELD_BITS
    }

    /// The position inside the field (low 24 bits of `pos`).
    #[inline]
    pub fn in_field_pos(self) -> u32 {
        self.pos & IN_FIELD_MASK
    }
}

/// Reinterpret a flat `[docid, pos, docid, pos, ...]` sequence as postings.
///
/// This is the wire shape the companion parsers emit: 32-bit integers in
/// pairs, sorted ascending by `(docid, pos)`. The input length must be even.
pub fn postings_from_flat(raw: &[u32]) -> Vec<Posting> {
    debug_assert!(raw.len() % 2 == 0, "flat posting input length must be even");
    raw.chunks_exact(2)
        .map(|pair| Posting {
            docid: pair[0],
            pos: pair[1],
        })
        .collect()
}

/// Flatten postings back into the `[docid, pos, ...]` pair sequence.
pub fn postings_to_flat(postings: &[Posting]) -> Vec<u32> {
    let mut flat = Vec::with_capacity(postings.len() * 2);
    for p in postings {
        flat.push(p.docid);
        flat.push(p.pos);
    }
    flat
}
