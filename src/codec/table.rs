// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The lookup table: a sparse docid → byte-offset map in the blob prefix.
//!
//! The table is an affine hash, `(docid - min_docid) >> offset_bits`, over
//! `2^hash_bits` cells of little-endian u32 frame offsets. Zero means the
//! bucket is unused; a real frame offset can never be zero because frames
//! start after the table. Each occupied cell holds the offset of the *first*
//! frame in its bucket; later frames in the same bucket are reached by the
//! finder's interpolation and scanning, not by the table.
//!
//! Deliberately sparse: around 32 documents per cell. A denser table buys
//! almost nothing, because the finder's interpolation step resolves within a
//! bucket in a probe or two anyway, while every doubling of the table
//! visibly inflates the blob.
//!
//! Two modes of existence, one capability set:
//!
//! | op          | `LookupTable` (owning, encode) | `TableView` (borrowed, read) |
//! |-------------|--------------------------------|------------------------------|
//! | `count`     | yes                            | yes                          |
//! | `byte_size` | yes                            | yes                          |
//! | `get`       | yes                            | yes                          |
//! | `next`      | yes                            | yes                          |
//! | `set`       | yes                            | no                           |
//! | `write_into`| yes                            | no                           |
//!
//! This module is the single source of truth for the table's byte layout.
//! Anything that reads or writes the blob prefix goes through it.

/// Table header: `hash_bits` byte, `offset_bits` byte, `min_docid` u32.
pub const TABLE_HEADER_BYTES: usize = 6;

/// Each cell is one little-endian u32 frame offset.
pub const CELL_BYTES: usize = 4;

/// Lower bound on `hash_bits`; tiny inputs get a 16-cell table regardless.
pub const MIN_HASH_BITS: u32 = 4;

/// Ceiling log2; 0 for inputs of 0 or 1.
fn ceil_log2(x: u64) -> u32 {
    if x <= 1 {
        0
    } else {
        64 - (x - 1).leading_zeros()
    }
}

/// Number of bits needed to represent `x`; 0 for 0.
pub(crate) fn bits_for(x: u32) -> u32 {
    32 - x.leading_zeros()
}

/// The three parameters that define a table's hash and layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableShape {
    pub hash_bits: u8,
    pub offset_bits: u8,
    pub min_docid: u32,
}

impl TableShape {
    /// Choose a shape for a stream of `unique_docs` documents whose docids
    /// span `docid_span = last - first`.
    ///
    /// `hash_bits` targets ~32 documents per cell. `offset_bits` must leave
    /// every docid in the span hashable, so it is derived from the bit
    /// length of the span, not its rounded log.
    pub fn sized_for(unique_docs: usize, docid_span: u32, min_docid: u32) -> Self {
        let hash_bits = ceil_log2(unique_docs as u64)
            .saturating_sub(5)
            .max(MIN_HASH_BITS);
        let offset_bits = bits_for(docid_span).saturating_sub(hash_bits);
        TableShape {
            hash_bits: hash_bits as u8,
            offset_bits: offset_bits as u8,
            min_docid,
        }
    }

    /// Number of cells.
    #[inline]
    pub fn count(&self) -> usize {
        1usize << self.hash_bits
    }

    /// Encoded size: header plus cells.
    #[inline]
    pub fn byte_size(&self) -> usize {
        TABLE_HEADER_BYTES + CELL_BYTES * self.count()
    }

    /// Hash a docid to its cell, or `None` when it falls outside the table.
    #[inline]
    pub fn hash(&self, docid: u32) -> Option<usize> {
        let h = (i64::from(docid) - i64::from(self.min_docid)) >> self.offset_bits;
        if h >= 0 && (h as usize) < self.count() {
            Some(h as usize)
        } else {
            None
        }
    }
}

// ============================================================================
// OWNING TABLE (encode side)
// ============================================================================

/// The owning table the encoder fills while it writes frames.
#[derive(Debug, Clone)]
pub struct LookupTable {
    shape: TableShape,
    cells: Vec<u32>,
}

impl LookupTable {
    /// A zeroed table of the given shape. All cells start unused.
    pub fn new(shape: TableShape) -> Self {
        LookupTable {
            cells: vec![0; shape.count()],
            shape,
        }
    }

    #[inline]
    pub fn shape(&self) -> TableShape {
        self.shape
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.shape.count()
    }

    #[inline]
    pub fn byte_size(&self) -> usize {
        self.shape.byte_size()
    }

    /// The cell for `docid`: `Some(0)` for an unused bucket, `None` when the
    /// docid hashes outside the table.
    #[inline]
    pub fn get(&self, docid: u32) -> Option<u32> {
        self.shape.hash(docid).map(|h| self.cells[h])
    }

    /// The offset in the first occupied cell with a strictly greater hash.
    pub fn next(&self, docid: u32) -> Option<u32> {
        let start = self.shape.hash(docid)?;
        self.cells[start + 1..].iter().copied().find(|&c| c != 0)
    }

    /// Register the first frame offset for `docid`'s bucket.
    ///
    /// The caller only writes into an unused cell; each cell keeps the first
    /// offset it was given.
    pub fn set(&mut self, docid: u32, offset: u32) {
        let h = self
            .shape
            .hash(docid)
            .unwrap_or_else(|| panic!("docid {} hashes outside the table", docid));
        debug_assert_eq!(self.cells[h], 0, "cell {} already registered", h);
        self.cells[h] = offset;
    }

    /// Dump the table over `dest`, which must be exactly `byte_size()` long.
    pub fn write_into(&self, dest: &mut [u8]) {
        dest[0] = self.shape.hash_bits;
        dest[1] = self.shape.offset_bits;
        dest[2..TABLE_HEADER_BYTES].copy_from_slice(&self.shape.min_docid.to_le_bytes());
        for (cell, slot) in self
            .cells
            .iter()
            .zip(dest[TABLE_HEADER_BYTES..].chunks_exact_mut(CELL_BYTES))
        {
            slot.copy_from_slice(&cell.to_le_bytes());
        }
    }
}

// ============================================================================
// BORROWED VIEW (read side)
// ============================================================================

/// A read-only table view over the blob's own bytes. No copying, no parsing
/// beyond the six header bytes.
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    shape: TableShape,
    cells: &'a [u8],
}

impl<'a> TableView<'a> {
    /// Borrow the table from `bytes`, which must start at the table header
    /// (one byte past the blob start, after `field_bits`).
    pub fn new(bytes: &'a [u8]) -> Self {
        let shape = TableShape {
            hash_bits: bytes[0],
            offset_bits: bytes[1],
            min_docid: u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
        };
        let cells = &bytes[TABLE_HEADER_BYTES..shape.byte_size()];
        TableView { shape, cells }
    }

    #[inline]
    pub fn shape(&self) -> TableShape {
        self.shape
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.shape.count()
    }

    #[inline]
    pub fn byte_size(&self) -> usize {
        self.shape.byte_size()
    }

    #[inline]
    pub(crate) fn cell(&self, h: usize) -> u32 {
        let at = h * CELL_BYTES;
        u32::from_le_bytes([
            self.cells[at],
            self.cells[at + 1],
            self.cells[at + 2],
            self.cells[at + 3],
        ])
    }

    /// The cell for `docid`: `Some(0)` for an unused bucket, `None` when the
    /// docid hashes outside the table.
    #[inline]
    pub fn get(&self, docid: u32) -> Option<u32> {
        self.shape.hash(docid).map(|h| self.cell(h))
    }

    /// The offset in the first occupied cell with a strictly greater hash.
    pub fn next(&self, docid: u32) -> Option<u32> {
        let start = self.shape.hash(docid)?;
        for h in start + 1..self.count() {
            let cell = self.cell(h);
            if cell != 0 {
                return Some(cell);
            }
        }
        None
    }
}
