//! Engine key and value layout.
//!
//! Meta keys:  `m \0 {table}`
//! Cell keys:  `d \0 {table} \0 {row} \0 {family} \0 {qualifier}`
//!
//! Segments are NUL-separated, so rows of one table sort contiguously and
//! in row-key order. Cell values carry an 8-byte big-endian millisecond
//! timestamp ahead of the raw bytes.

use crate::core::error::{StoreError, StoreResult};

const SEP: u8 = 0x00;
const META_TAG: u8 = b'm';
const DATA_TAG: u8 = b'd';

pub fn meta_key(table: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 + table.len());
    key.push(META_TAG);
    key.push(SEP);
    key.extend_from_slice(table.as_bytes());
    key
}

pub fn cell_key(table: &str, row: &str, family: &str, qualifier: &str) -> Vec<u8> {
    let mut key =
        Vec::with_capacity(5 + table.len() + row.len() + family.len() + qualifier.len());
    key.push(DATA_TAG);
    key.push(SEP);
    key.extend_from_slice(table.as_bytes());
    key.push(SEP);
    key.extend_from_slice(row.as_bytes());
    key.push(SEP);
    key.extend_from_slice(family.as_bytes());
    key.push(SEP);
    key.extend_from_slice(qualifier.as_bytes());
    key
}

/// Prefix covering every cell of `table` (ends with the separator).
pub fn table_prefix(table: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(3 + table.len());
    key.push(DATA_TAG);
    key.push(SEP);
    key.extend_from_slice(table.as_bytes());
    key.push(SEP);
    key
}

/// Exclusive upper bound covering the whole table.
pub fn table_end(table: &str) -> Vec<u8> {
    let mut key = table_prefix(table);
    if let Some(last) = key.last_mut() {
        *last = SEP + 1;
    }
    key
}

/// Prefix covering every cell of one row (ends with the separator).
pub fn row_prefix(table: &str, row: &str) -> Vec<u8> {
    let mut key = table_prefix(table);
    key.extend_from_slice(row.as_bytes());
    key.push(SEP);
    key
}

/// Exclusive upper bound covering one row's cells.
pub fn row_end(table: &str, row: &str) -> Vec<u8> {
    let mut key = row_prefix(table, row);
    if let Some(last) = key.last_mut() {
        *last = SEP + 1;
    }
    key
}

/// Inclusive start bound: the first possible cell of `row` and of every row
/// sorting after it.
pub fn row_start(table: &str, row: &str) -> Vec<u8> {
    let mut key = table_prefix(table);
    key.extend_from_slice(row.as_bytes());
    key
}

/// Exclusive stop bound: excludes `row` itself and everything after it.
pub fn row_stop(table: &str, row: &str) -> Vec<u8> {
    row_start(table, row)
}

/// Split a cell key of `table` back into (row, family, qualifier).
pub fn parse_cell_key(table: &str, key: &[u8]) -> StoreResult<(String, String, String)> {
    let prefix = table_prefix(table);
    let rest = key.strip_prefix(prefix.as_slice()).ok_or_else(|| {
        StoreError::CorruptKey(format!("key outside table {}", table))
    })?;
    let mut segments = rest.splitn(3, |b| *b == SEP);
    let row = segment(segments.next())?;
    let family = segment(segments.next())?;
    let qualifier = segment(segments.next())?;
    Ok((row, family, qualifier))
}

/// The row portion of a cell key, without allocating.
pub fn row_slice(table_prefix_len: usize, key: &[u8]) -> Option<&[u8]> {
    let rest = key.get(table_prefix_len..)?;
    rest.split(|b| *b == SEP).next()
}

fn segment(part: Option<&[u8]>) -> StoreResult<String> {
    let part =
        part.ok_or_else(|| StoreError::CorruptKey("missing key segment".to_string()))?;
    String::from_utf8(part.to_vec())
        .map_err(|_| StoreError::CorruptKey("non-utf8 key segment".to_string()))
}

pub fn encode_cell_value(timestamp: u64, value: &[u8]) -> Vec<u8> {
    let mut raw = Vec::with_capacity(8 + value.len());
    raw.extend_from_slice(&timestamp.to_be_bytes());
    raw.extend_from_slice(value);
    raw
}

pub fn decode_cell_value(raw: &[u8]) -> StoreResult<(u64, Vec<u8>)> {
    if raw.len() < 8 {
        return Err(StoreError::DeserializeError(
            "cell value shorter than timestamp header".to_string(),
        ));
    }
    let mut ts_bytes = [0u8; 8];
    ts_bytes.copy_from_slice(&raw[..8]);
    Ok((u64::from_be_bytes(ts_bytes), raw[8..].to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_key_round_trip() {
        let key = cell_key("people", "row-1", "info", "name");
        let (row, family, qualifier) =
            parse_cell_key("people", &key).expect("Failed to parse cell key");
        assert_eq!(row, "row-1");
        assert_eq!(family, "info");
        assert_eq!(qualifier, "name");
    }

    #[test]
    fn test_rows_sort_contiguously() {
        // Cells of row "a" all sort before any cell of row "ab".
        let a_late = cell_key("t", "a", "zzz", "zzz");
        let ab_early = cell_key("t", "ab", "a", "a");
        assert!(a_late < ab_early);
    }

    #[test]
    fn test_row_bounds_cover_exactly_one_row() {
        let start = row_prefix("t", "r");
        let end = row_end("t", "r");
        let own = cell_key("t", "r", "f", "q");
        let other = cell_key("t", "rx", "f", "q");
        assert!(own >= start && own < end);
        assert!(!(other >= start && other < end));
    }

    #[test]
    fn test_table_bounds() {
        let start = table_prefix("t");
        let end = table_end("t");
        let inside = cell_key("t", "zzz", "f", "q");
        assert!(inside >= start && inside < end);
        let other_table = cell_key("u", "a", "f", "q");
        assert!(!(other_table >= start && other_table < end));
    }

    #[test]
    fn test_range_stop_excludes_stop_row() {
        let stop = row_stop("t", "c");
        let c_cell = cell_key("t", "c", "f", "q");
        let b_cell = cell_key("t", "b", "f", "q");
        assert!(c_cell >= stop);
        assert!(b_cell < stop);
        // Rows sorting after the stop row are excluded as well.
        let cx_cell = cell_key("t", "cx", "f", "q");
        assert!(cx_cell >= stop);
    }

    #[test]
    fn test_meta_and_data_keys_disjoint() {
        let meta = meta_key("t");
        let data = cell_key("t", "r", "f", "q");
        assert_ne!(meta[0], data[0]);
    }

    #[test]
    fn test_cell_value_codec() {
        let raw = encode_cell_value(1234, b"hello");
        let (ts, value) = decode_cell_value(&raw).expect("Failed to decode cell value");
        assert_eq!(ts, 1234);
        assert_eq!(value, b"hello".to_vec());

        assert!(decode_cell_value(b"short").is_err());
    }
}
