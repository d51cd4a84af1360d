use crate::error::SstError;
use crate::index::*;
use std::io::Cursor;

fn sample() -> TableIndex {
    let mut index = TableIndex::new();
    index.push(1, 36);
    index.push(5, 38);
    index.push(9, 41);
    index
}

#[test]
fn find_bounded_and_last() {
    let index = sample();
    assert_eq!(
        index.find(1),
        Some(ValueRange {
            start: 36,
            end: Some(38)
        })
    );
    assert_eq!(index.find(5).unwrap().bounded_len(), Some(3));
    assert_eq!(
        index.find(9),
        Some(ValueRange {
            start: 41,
            end: None
        })
    );
    assert_eq!(index.find(9).unwrap().bounded_len(), None);
}

#[test]
fn find_misses_below_between_and_above() {
    let index = sample();
    // Below the smallest key must not underflow the search bounds.
    assert_eq!(index.find(0), None);
    assert_eq!(index.find(7), None);
    assert_eq!(index.find(u64::MAX), None);
    assert_eq!(TableIndex::new().find(0), None);
}

#[test]
fn single_entry_index() {
    let mut index = TableIndex::new();
    index.push(42, 12);
    assert_eq!(index.find(41), None);
    assert_eq!(index.find(42).unwrap().end, None);
    assert_eq!(index.find(43), None);
}

#[test]
fn every_key_of_a_large_index_is_found() {
    let mut index = TableIndex::new();
    let n = 1000u64;
    for i in 0..n {
        index.push(i * 2 + 1, (n * 12 + i) as u32);
    }
    for i in 0..n {
        let range = index.find(i * 2 + 1).expect("present key");
        assert_eq!(u64::from(range.start), n * 12 + i);
        assert!(index.find(i * 2).is_none());
    }
}

#[test]
fn serialized_order_and_content_are_preserved() {
    let index = sample();
    let mut buf = Vec::new();
    index.write_to(&mut buf).unwrap();
    assert_eq!(buf.len() as u64, index.byte_len());
    assert_eq!(&buf[0..8], &1u64.to_le_bytes());
    assert_eq!(&buf[8..12], &36u32.to_le_bytes());

    let back = TableIndex::read_from(&mut Cursor::new(&buf), 3).unwrap();
    assert_eq!(back, index);
}

#[test]
fn validate_accepts_well_formed_index() {
    assert!(sample().validate().is_ok());
}

#[test]
fn validate_rejects_out_of_order_keys() {
    let mut index = TableIndex::new();
    index.push(5, 24);
    index.push(1, 26);
    assert!(matches!(index.validate(), Err(SstError::Corrupt(_))));
}

#[test]
fn validate_rejects_decreasing_offsets() {
    let mut index = TableIndex::new();
    index.push(1, 24);
    index.push(2, 30);
    index.push(3, 28);
    assert!(matches!(index.validate(), Err(SstError::Corrupt(_))));
}

#[test]
fn validate_rejects_misplaced_first_offset() {
    let mut index = TableIndex::new();
    index.push(1, 0);
    assert!(matches!(index.validate(), Err(SstError::Corrupt(_))));
}

#[test]
fn unvalidated_decreasing_offsets_do_not_underflow() {
    let mut index = TableIndex::new();
    index.push(1, 40);
    index.push(2, 24);
    assert!(index.validate().is_err());

    let range = index.find(1).unwrap();
    assert!(range.is_inverted());
    assert_eq!(range.bounded_len(), None);

    let last = index.find(2).unwrap();
    assert!(!last.is_inverted());
    assert_eq!(last.bounded_len(), None);
}
