// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Whole-blob validation: every structural invariant, checked.
//!
//! The decode paths trust their input by design. This module is the place
//! that doesn't. `verify_blob` walks an encoded blob end to end and checks
//! the invariants the readers silently rely on: docids strictly increasing
//! across frames, positions strictly increasing within a frame, every
//! declared body length landing exactly on its terminator, and every frame
//! reachable from its lookup-table cell.
//!
//! This is a diagnostic for tests and tooling, not a decode-path guard. It
//! assumes the blob structurally parses (a blob truncated mid-varint is a
//! caller problem); what it catches is encoder logic errors and invariant
//! drift between encoder and readers.

use serde::Serialize;
use std::fmt;

use crate::codec::{decode_int, TableShape, TableView, TABLE_HEADER_BYTES, TERMINATOR};
use crate::types::IN_FIELD_BITS;

/// A structural invariant the blob failed to uphold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// Blob too short for the fixed prefix or its declared table.
    Truncated { len: usize, needed: usize },
    /// The leading `field_bits` byte is outside `[1, 8]`.
    BadFieldBits { field_bits: u8 },
    /// `hash_bits` declares a table no encoder would produce.
    OversizedTable { hash_bits: u8 },
    /// Frame docids must be strictly increasing.
    DocidsNotIncreasing { offset: usize, prev: u32, docid: u32 },
    /// Positions within a frame must be strictly increasing.
    PositionsNotIncreasing { docid: u32, prev: u32 },
    /// A frame's body walk did not land on its declared size.
    SizeMismatch { docid: u32, declared: u32, walked: u32 },
    /// The byte after a frame body is not the terminator.
    MissingTerminator { docid: u32, offset: usize },
    /// A frame runs past the end of the blob.
    FrameOverrun { docid: u32, end: usize, len: usize },
    /// A frame's docid hashes outside the table.
    HashOutOfRange { docid: u32, offset: usize },
    /// A cell disagrees with the first frame of its bucket.
    CellMismatch { hash: usize, cell: u32, expected: u32 },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantError::Truncated { len, needed } => {
                write!(f, "blob is {} bytes, needs at least {}", len, needed)
            }
            InvariantError::BadFieldBits { field_bits } => {
                write!(f, "field_bits {} outside [1, 8]", field_bits)
            }
            InvariantError::OversizedTable { hash_bits } => {
                write!(f, "hash_bits {} declares an impossible table", hash_bits)
            }
            InvariantError::DocidsNotIncreasing { offset, prev, docid } => {
                write!(
                    f,
                    "frame at {} has docid {} after docid {}",
                    offset, docid, prev
                )
            }
            InvariantError::PositionsNotIncreasing { docid, prev } => {
                write!(f, "docid {} position did not increase after {:#x}", docid, prev)
            }
            InvariantError::SizeMismatch { docid, declared, walked } => {
                write!(
                    f,
                    "docid {} declares a {}-byte body but walks {}",
                    docid, declared, walked
                )
            }
            InvariantError::MissingTerminator { docid, offset } => {
                write!(f, "docid {} body does not end in a terminator at {}", docid, offset)
            }
            InvariantError::FrameOverrun { docid, end, len } => {
                write!(f, "docid {} frame ends at {} past blob length {}", docid, end, len)
            }
            InvariantError::HashOutOfRange { docid, offset } => {
                write!(f, "docid {} (frame at {}) hashes outside the table", docid, offset)
            }
            InvariantError::CellMismatch { hash, cell, expected } => {
                write!(
                    f,
                    "cell {} holds offset {} but the bucket's first frame is at {}",
                    hash, cell, expected
                )
            }
        }
    }
}

impl std::error::Error for InvariantError {}

/// What a clean blob looks like, by the numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlobReport {
    pub doc_count: usize,
    pub posting_count: usize,
    pub cell_count: usize,
    pub occupied_cells: usize,
    /// Bytes spent on frames, i.e. everything after the table.
    pub frame_bytes: usize,
}

/// Walk `enc` end to end and check every structural invariant.
pub fn verify_blob(enc: &[u8]) -> Result<BlobReport, InvariantError> {
    if enc.len() < 1 + TABLE_HEADER_BYTES {
        return Err(InvariantError::Truncated {
            len: enc.len(),
            needed: 1 + TABLE_HEADER_BYTES,
        });
    }
    let field_bits = enc[0];
    if !(1..=8).contains(&field_bits) {
        return Err(InvariantError::BadFieldBits { field_bits });
    }
    // 2^27 cells is already far beyond what the sizing policy can emit for
    // 32-bit docids; anything larger cannot be addressed as a byte offset.
    let hash_bits = enc[1];
    if hash_bits >= 28 {
        return Err(InvariantError::OversizedTable { hash_bits });
    }
    let shape = TableShape {
        hash_bits,
        offset_bits: enc[2],
        min_docid: u32::from_le_bytes([enc[3], enc[4], enc[5], enc[6]]),
    };
    let first_frame = 1 + shape.byte_size();
    if enc.len() < first_frame {
        return Err(InvariantError::Truncated {
            len: enc.len(),
            needed: first_frame,
        });
    }
    let table = TableView::new(&enc[1..]);

    let field_mask = (1u32 << field_bits) - 1;
    let mut expected: Vec<u32> = vec![0; shape.count()];
    let mut prev_docid: Option<u32> = None;
    let mut doc_count = 0usize;
    let mut posting_count = 0usize;

    let mut index = first_frame;
    while index < enc.len() {
        let frame_offset = index;
        let (docid, i) = decode_int(enc, index);
        let (body_len, body_start) = decode_int(enc, i);
        let body_end = body_start + body_len as usize;
        if body_end + 1 > enc.len() {
            return Err(InvariantError::FrameOverrun {
                docid,
                end: body_end + 1,
                len: enc.len(),
            });
        }
        if enc[body_end] != TERMINATOR {
            return Err(InvariantError::MissingTerminator {
                docid,
                offset: body_end,
            });
        }
        if let Some(prev) = prev_docid {
            if docid <= prev {
                return Err(InvariantError::DocidsNotIncreasing {
                    offset: frame_offset,
                    prev,
                    docid,
                });
            }
        }
        prev_docid = Some(docid);

        let (packed, mut i) = decode_int(enc, body_start);
        let mut prev_pos = ((packed & field_mask) << IN_FIELD_BITS) | (packed >> field_bits);
        posting_count += 1;
        while i < body_end {
            let (delta, next) = decode_int(enc, i);
            i = next;
            match (delta > 0).then(|| prev_pos.checked_add(delta)).flatten() {
                Some(pos) => prev_pos = pos,
                None => {
                    return Err(InvariantError::PositionsNotIncreasing { docid, prev: prev_pos })
                }
            }
            posting_count += 1;
        }
        if i != body_end {
            return Err(InvariantError::SizeMismatch {
                docid,
                declared: body_len,
                walked: (i - body_start) as u32,
            });
        }

        match shape.hash(docid) {
            None => {
                return Err(InvariantError::HashOutOfRange {
                    docid,
                    offset: frame_offset,
                })
            }
            Some(h) => {
                if expected[h] == 0 {
                    expected[h] = frame_offset as u32;
                }
            }
        }
        doc_count += 1;
        index = body_end + 1;
    }

    let mut occupied_cells = 0usize;
    for (h, &want) in expected.iter().enumerate() {
        let cell = table.cell(h);
        if cell != want {
            return Err(InvariantError::CellMismatch {
                hash: h,
                cell,
                expected: want,
            });
        }
        if cell != 0 {
            occupied_cells += 1;
        }
    }

    Ok(BlobReport {
        doc_count,
        posting_count,
        cell_count: shape.count(),
        occupied_cells,
        frame_bytes: enc.len() - first_frame,
    })
}
