//! Unit tests for the varint layer: the escape, byte shapes, insert-at.

use poscodec::codec::{decode_int, encode_int, encode_int_at, MAX_VARINT_BYTES, ZERO_ESCAPE};

fn enc(value: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_int(value, &mut buf);
    buf
}

#[test]
fn zero_is_exactly_the_two_escape_bytes() {
    assert_eq!(enc(0), vec![0x80, 0x00]);
    assert_eq!(enc(0), ZERO_ESCAPE.to_vec());
}

#[test]
fn zero_decodes_through_the_escape() {
    let (value, next) = decode_int(&[0x80, 0x00], 0);
    assert_eq!(value, 0);
    assert_eq!(next, 2);
}

#[test]
fn single_byte_values() {
    for value in [1u32, 2, 64, 127] {
        let bytes = enc(value);
        assert_eq!(bytes.len(), 1, "value {} should be one byte", value);
        assert_eq!(bytes[0], value as u8);
        assert_eq!(decode_int(&bytes, 0), (value, 1));
    }
}

#[test]
fn multi_byte_values() {
    // 300 = 0b10_0101100: low chunk 0x2C with continuation, then 0x02.
    assert_eq!(enc(300), vec![0xAC, 0x02]);
    assert_eq!(decode_int(&[0xAC, 0x02], 0), (300, 2));

    // 128 needs a continuation byte carrying no payload.
    assert_eq!(enc(128), vec![0x80, 0x01]);
}

#[test]
fn u32_max_is_five_bytes() {
    let bytes = enc(u32::MAX);
    assert_eq!(bytes.len(), MAX_VARINT_BYTES);
    assert_eq!(bytes, vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    assert_eq!(decode_int(&bytes, 0), (u32::MAX, 5));
}

#[test]
fn no_body_byte_is_a_bare_zero() {
    for value in 0u32..=4096 {
        let bytes = enc(value);
        for (i, &b) in bytes.iter().enumerate() {
            if b == 0x00 {
                assert!(i > 0 && bytes[i - 1] == 0x80, "unescaped zero in {}", value);
            }
        }
    }
}

#[test]
fn decode_starts_at_index() {
    let mut buf = vec![0xFF, 0xFF];
    encode_int(5, &mut buf);
    encode_int(300, &mut buf);
    let (value, next) = decode_int(&buf, 2);
    assert_eq!((value, next), (5, 3));
    let (value, next) = decode_int(&buf, next);
    assert_eq!((value, next), (300, 5));
}

#[test]
fn insert_at_shifts_the_tail() {
    let mut buf = vec![0x01, 0x02, 0x03];
    encode_int_at(300, &mut buf, 1);
    assert_eq!(buf, vec![0x01, 0xAC, 0x02, 0x02, 0x03]);

    let mut buf = vec![0x07];
    encode_int_at(0, &mut buf, 0);
    assert_eq!(buf, vec![0x80, 0x00, 0x07]);
}

#[test]
fn insert_at_end_matches_append() {
    for value in [0u32, 1, 127, 128, 300, 1 << 20, u32::MAX] {
        let mut appended = vec![0xAA];
        encode_int(value, &mut appended);

        let mut inserted = vec![0xAA];
        encode_int_at(value, &mut inserted, 1);

        assert_eq!(appended, inserted, "value {}", value);
    }
}
