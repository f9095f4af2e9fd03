//! Unit tests for the lookup table: sizing policy, hashing, both variants.

use poscodec::codec::{
    LookupTable, TableShape, TableView, CELL_BYTES, TABLE_HEADER_BYTES,
};

#[test]
fn tiny_inputs_still_get_sixteen_cells() {
    let shape = TableShape::sized_for(1, 0, 42);
    assert_eq!(shape.hash_bits, 4);
    assert_eq!(shape.offset_bits, 0);
    assert_eq!(shape.min_docid, 42);
    assert_eq!(shape.count(), 16);
    assert_eq!(shape.byte_size(), TABLE_HEADER_BYTES + 16 * CELL_BYTES);
}

#[test]
fn sizing_targets_about_thirty_two_docs_per_cell() {
    // ceil(log2 100000) = 17, minus 5 → 4096 cells for 100k docs.
    let shape = TableShape::sized_for(100_000, 1_000_000, 0);
    assert_eq!(shape.hash_bits, 12);
    // 1_000_000 needs 20 bits; 20 - 12 = 8.
    assert_eq!(shape.offset_bits, 8);
}

#[test]
fn every_docid_in_the_span_is_hashable() {
    // Power-of-two spans are the tight case for the shift split.
    for span in [1u32 << 10, 1 << 16, (1 << 16) - 1, (1 << 16) + 1] {
        let shape = TableShape::sized_for(1000, span, 7);
        assert!(
            shape.hash(7 + span).is_some(),
            "span {} left its own max docid unhashable",
            span
        );
        assert_eq!(shape.hash(7), Some(0));
    }
}

#[test]
fn out_of_range_docids_do_not_hash() {
    let shape = TableShape::sized_for(100, 1000, 500);
    assert_eq!(shape.hash(499), None, "below min_docid");
    assert_eq!(shape.hash(u32::MAX), None, "far above the span");
}

#[test]
fn set_then_get() {
    let shape = TableShape::sized_for(16, 15, 0);
    assert_eq!(shape.offset_bits, 0, "one docid per cell in this layout");

    let mut table = LookupTable::new(shape);
    assert_eq!(table.get(9), Some(0), "cells start unused");
    table.set(9, 777);
    assert_eq!(table.get(9), Some(777));
}

#[test]
fn next_skips_unused_cells() {
    let shape = TableShape::sized_for(16, 15, 0);
    let mut table = LookupTable::new(shape);
    table.set(2, 100);
    table.set(7, 200);

    assert_eq!(table.next(0), Some(100));
    assert_eq!(table.next(2), Some(200), "strictly greater hash only");
    assert_eq!(table.next(7), None, "nothing occupied past the last cell");
}

#[test]
fn dump_and_view_agree() {
    let shape = TableShape::sized_for(300, 5000, 11);
    let mut table = LookupTable::new(shape);
    table.set(11, 71);
    table.set(3000, 930);
    table.set(5011, 4000);

    // Dump as it sits in a blob: one leading field_bits byte, then the table.
    let mut bytes = vec![0u8; 1 + table.byte_size()];
    bytes[0] = 1;
    table.write_into(&mut bytes[1..]);

    let view = TableView::new(&bytes[1..]);
    assert_eq!(view.shape(), shape);
    assert_eq!(view.count(), table.count());
    assert_eq!(view.byte_size(), table.byte_size());

    for docid in [11u32, 3000, 5011, 2000, 5] {
        assert_eq!(view.get(docid), table.get(docid), "get({})", docid);
        assert_eq!(view.next(docid), table.next(docid), "next({})", docid);
    }
}
