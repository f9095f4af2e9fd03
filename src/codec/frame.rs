// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-document frames: how one document's postings sit in the blob.
//!
//! A frame is `varint(docid)`, `varint(body_len)`, the body, and a single
//! `0x00` terminator. The body is the first position followed by deltas:
//!
//! - The first position is re-packed before encoding. `pos` arrives as 8:24
//!   `field_id:in_field_pos`; the frame stores
//!   `(in_field_pos << field_bits) | field_id` instead. Field ids are tiny
//!   and field_bits is chosen per blob, so this moves the low-entropy part
//!   into the least-significant bits where the varint stays short.
//! - Every later posting of the same document is stored as the delta of its
//!   *full 32-bit packed* `pos` against the previous one. Positions within a
//!   document are strictly increasing, so deltas are non-zero and small.
//!
//! `body_len` counts the body only, excluding the docid varint and the
//! terminator. That is what lets `read_doc` hop a whole frame with two
//! varint reads, and what the lookup-table consumers rely on for random
//! access.

use crate::contracts::check_frame_body_escaped;
use crate::types::{Posting, IN_FIELD_BITS};

use super::varint::{decode_int, encode_int, encode_int_at};

/// Every frame ends with this byte. Varint bodies never contain a bare one.
pub const TERMINATOR: u8 = 0x00;

/// Encode one document's postings, starting at `postings[cursor]`.
///
/// Consumes every posting sharing `postings[cursor].docid` and returns the
/// cursor advanced past them.
pub fn encode_frame(postings: &[Posting], cursor: usize, field_bits: u8, buf: &mut Vec<u8>) -> usize {
    let mut cursor = cursor;
    let docid = postings[cursor].docid;
    encode_int(docid, buf);
    let size_slot = buf.len();

    // First position, re-packed so the field id lands in the low bits.
    let first = postings[cursor];
    let mut prev_pos = first.pos;
    encode_int(
        (first.in_field_pos() << field_bits) | first.field_id(),
        buf,
    );
    cursor += 1;

    // The rest as deltas on the full packed pos.
    while cursor < postings.len() && postings[cursor].docid == docid {
        encode_int(postings[cursor].pos - prev_pos, buf);
        prev_pos = postings[cursor].pos;
        cursor += 1;
    }

    let body_len = buf.len() - size_slot;
    check_frame_body_escaped(&buf[size_slot..]);
    encode_int_at(body_len as u32, buf, size_slot);
    buf.push(TERMINATOR);
    cursor
}

/// Decode the frame at `index`, appending its postings to `out`.
///
/// Returns the offset of the next frame (one past this frame's terminator).
pub fn decode_frame(enc: &[u8], index: usize, field_bits: u8, out: &mut Vec<Posting>) -> usize {
    let (docid, index) = decode_int(enc, index);
    let (body_len, index) = decode_int(enc, index);
    let body_end = index + body_len as usize;

    let (packed, mut index) = decode_int(enc, index);
    let field_mask = (1u32 << field_bits) - 1;
    let mut prev_pos = ((packed & field_mask) << IN_FIELD_BITS) | (packed >> field_bits);
    out.push(Posting::new(docid, prev_pos));

    while index < body_end {
        let (delta, next) = decode_int(enc, index);
        index = next;
        prev_pos += delta;
        out.push(Posting::new(docid, prev_pos));
    }

    body_end + 1
}

/// Fast path: read only the docid at `index`, skipping the positions.
///
/// Returns `(docid, next_frame_offset)`. This is what the finder and the
/// intersector walk frames with.
#[inline]
pub fn read_doc(enc: &[u8], index: usize) -> (u32, usize) {
    let (docid, index) = decode_int(enc, index);
    let (body_len, index) = decode_int(enc, index);
    (docid, index + body_len as usize + 1)
}
