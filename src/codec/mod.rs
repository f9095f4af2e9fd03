// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The positional posting-list codec.
//!
//! One keyword's postings (`(docid, pos)` pairs sorted ascending) go in;
//! one self-contained byte blob comes out. The blob supports three read
//! paths without any side tables: full sequential decode, random access by
//! docid, and docid-set intersection against another blob.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ field_bits: u8 ∈ [1, 8]                                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │ LOOKUP TABLE                                                 │
//! │   hash_bits: u8                                              │
//! │   offset_bits: u8                                            │
//! │   min_docid: u32 LE                                          │
//! │   cells: [u32 LE; 2^hash_bits]   (frame offset, 0 = unused)  │
//! ├──────────────────────────────────────────────────────────────┤
//! │ FRAME (docid ascending, one per document)                    │
//! │   varint(docid)                                              │
//! │   varint(body_len)                                           │
//! │   varint((in_field_pos << field_bits) | field_id)            │
//! │   varint(pos delta) ...                                      │
//! │   terminator: 0x00                                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │ FRAME ...                                                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pieces interlock. Frames carry their body length, so `read_doc` can
//! hop documents without touching positions; that is what makes the sparse
//! lookup table enough for random access. Varint bodies never contain a bare
//! `0x00`, so the finder can scan backwards from an interpolated guess and
//! trust the first honest terminator it meets. The table stores first-in-
//! bucket offsets only, so the encoder can write it in one pass and dump it
//! over the reserved prefix at the end.
//!
//! Everything here trusts its input: the encoder trusts the stream is sorted
//! and duplicate-free (debug contracts check it), the read paths trust the
//! blob came from `encode`. Corruption handling is deliberately not a decode
//! concern; `verify` exists for offline checking.

mod frame;
mod table;
mod varint;

pub use frame::{decode_frame, encode_frame, read_doc, TERMINATOR};
pub use table::{
    LookupTable, TableShape, TableView, CELL_BYTES, MIN_HASH_BITS, TABLE_HEADER_BYTES,
};
pub use varint::{decode_int, encode_int, encode_int_at, MAX_VARINT_BYTES, ZERO_ESCAPE};

use crate::contracts::{check_frame_registered, check_postings_sorted};
use crate::types::Posting;

use table::bits_for;

/// Offset of the first frame: the `field_bits` byte plus the table.
#[inline]
pub fn postings_start(enc: &[u8]) -> usize {
    1 + TableView::new(&enc[1..]).byte_size()
}

/// Encode one keyword's posting stream into a self-contained blob.
///
/// The stream must be sorted ascending by `(docid, pos)` with no duplicate
/// pairs. An empty stream encodes to a valid blob with an all-zero table.
pub fn encode(postings: &[Posting]) -> Vec<u8> {
    check_postings_sorted(postings);

    // Prescan: unique docids, docid span, widest field id.
    let mut unique_docs = 0usize;
    let mut max_field_id = 0u32;
    let mut prev: Option<u32> = None;
    for p in postings {
        if prev != Some(p.docid) {
            unique_docs += 1;
            prev = Some(p.docid);
        }
        max_field_id = max_field_id.max(p.field_id());
    }
    let min_docid = postings.first().map_or(0, |p| p.docid);
    let docid_span = postings.last().map_or(0, |p| p.docid - min_docid);
    let field_bits = bits_for(max_field_id).max(1) as u8;

    let mut table = LookupTable::new(TableShape::sized_for(unique_docs, docid_span, min_docid));

    let mut enc = Vec::with_capacity(1 + table.byte_size() + postings.len() * 3);
    enc.push(field_bits);
    enc.resize(1 + table.byte_size(), 0);

    let mut cursor = 0;
    while cursor < postings.len() {
        let docid = postings[cursor].docid;
        // First frame in a bucket wins the cell; later ones are found by
        // interpolation from it.
        if table.get(docid) == Some(0) {
            table.set(docid, enc.len() as u32);
        }
        check_frame_registered(table.get(docid), enc.len());
        cursor = encode_frame(postings, cursor, field_bits, &mut enc);
    }

    let table_size = table.byte_size();
    table.write_into(&mut enc[1..1 + table_size]);
    enc
}

/// Decode a whole blob back into its posting stream, in original order.
pub fn decode(enc: &[u8]) -> Vec<Posting> {
    let field_bits = enc[0];
    let mut index = postings_start(enc);
    let mut out = Vec::new();
    while index < enc.len() {
        index = decode_frame(enc, index, field_bits, &mut out);
    }
    out
}

/// Find the byte offset of `docid`'s frame, or `None` if the blob has none.
///
/// Probe order: table cell, then linear interpolation between this bucket's
/// first frame and the next occupied bucket's first frame, then a backward
/// scan for a frame boundary near the interpolated guess, and finally a
/// forward frame walk from the best-known position.
pub fn find_doc(enc: &[u8], docid: u32) -> Option<usize> {
    let table = TableView::new(&enc[1..]);
    let cell = table.get(docid)?;
    if cell == 0 {
        return None;
    }
    let mut start = cell as usize;

    let (start_id, _) = read_doc(enc, start);
    if start_id == docid {
        return Some(start);
    }

    if let Some(next_cell) = table.next(docid) {
        let next_off = next_cell as usize;
        let (next_id, _) = read_doc(enc, next_off);

        // Docids grow roughly linearly with byte offset inside a bucket, so
        // interpolate a guess, then hunt backwards for the nearest honest
        // frame terminator. A 0x00 preceded by 0x80 is the tail of an
        // escaped zero, not a terminator.
        let num = i64::from(docid) - i64::from(start_id);
        let den = i64::from(next_id) - i64::from(start_id);
        let guess = start as i64 + (next_off - start) as i64 * num / den;
        if guess > start as i64 {
            let mut t = guess as usize;
            while t > start {
                if enc[t] == TERMINATOR && enc[t - 1] != 0x80 {
                    let (tid, _) = read_doc(enc, t + 1);
                    if tid == docid {
                        return Some(t + 1);
                    }
                    if tid < docid {
                        start = t + 1;
                        break;
                    }
                }
                t -= 1;
            }
            // Scan crossed the bucket's first frame: fall through and walk
            // forward from it.
        }
    }

    let mut at = start;
    while at < enc.len() {
        let (id, next) = read_doc(enc, at);
        if id == docid {
            return Some(at);
        }
        if id > docid {
            return None;
        }
        at = next;
    }
    None
}

/// Decode `docid`'s frame from `enc` onto `out`, if the blob has one.
fn extract_by_doc(enc: &[u8], docid: u32, out: &mut Vec<Posting>) {
    if let Some(at) = find_doc(enc, docid) {
        decode_frame(enc, at, enc[0], out);
    }
}

/// All postings for `docid` from both blobs, mixed and sorted ascending.
///
/// Which blob contributed each posting is intentionally lost; the result is
/// the plain multiset union ordered by `(docid, pos)`.
pub fn lookup(enc1: &[u8], enc2: &[u8], docid: u32) -> Vec<Posting> {
    let mut out = Vec::new();
    extract_by_doc(enc1, docid, &mut out);
    extract_by_doc(enc2, docid, &mut out);
    out.sort_unstable();
    out
}

/// Docids present in both blobs, ascending, deduplicated.
///
/// Two-pointer merge over the frame sequences using the `read_doc` fast
/// path; positions are never decoded.
pub fn intersect(enc1: &[u8], enc2: &[u8]) -> Vec<u32> {
    let mut out = Vec::new();

    let mut p1 = postings_start(enc1);
    let mut p2 = postings_start(enc2);
    if p1 >= enc1.len() || p2 >= enc2.len() {
        return out;
    }
    let (mut id1, mut n1) = read_doc(enc1, p1);
    let (mut id2, mut n2) = read_doc(enc2, p2);

    loop {
        if id1 == id2 {
            // Docids are strictly increasing per blob, so repeats cannot
            // occur; the guard mirrors the dedup contract anyway.
            if out.last() != Some(&id1) {
                out.push(id1);
            }
            p1 = n1;
            p2 = n2;
            if p1 >= enc1.len() || p2 >= enc2.len() {
                break;
            }
            (id1, n1) = read_doc(enc1, p1);
            (id2, n2) = read_doc(enc2, p2);
        } else if id1 < id2 {
            p1 = n1;
            if p1 >= enc1.len() {
                break;
            }
            (id1, n1) = read_doc(enc1, p1);
        } else {
            p2 = n2;
            if p2 >= enc2.len() {
                break;
            }
            (id2, n2) = read_doc(enc2, p2);
        }
    }
    out
}
