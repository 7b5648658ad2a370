//! Stored record framing
//!
//! `[i64 big-endian ms-since-epoch when stored][encoded Event]`

use bytes::{Buf, BufMut, Bytes, BytesMut};
use codec::{decode_struct, encode_struct};
use contracts::Event;

use crate::error::DispatcherError;

/// Length of the timestamp prefix
pub const TIMESTAMP_LEN: usize = 8;

/// Frame `event` for storage
pub fn encode_record(event: &Event, stored_at_ms: i64) -> Result<Bytes, DispatcherError> {
    let body = encode_struct(event)?;
    let mut buf = BytesMut::with_capacity(TIMESTAMP_LEN + body.len());
    buf.put_i64(stored_at_ms);
    buf.extend_from_slice(&body);
    Ok(buf.freeze())
}

/// Split a stored blob back into its timestamp and event
pub fn decode_record(mut record: Bytes) -> Result<(i64, Event), DispatcherError> {
    if record.len() < TIMESTAMP_LEN {
        return Err(DispatcherError::RecordTooShort {
            len: record.len(),
            min: TIMESTAMP_LEN,
        });
    }
    let stored_at_ms = record.get_i64();
    let event = decode_struct(record)?;
    Ok((stored_at_ms, event))
}

/// Current wall-clock time in ms since the epoch
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::CodecError;

    #[test]
    fn test_timestamp_prefix_is_big_endian() {
        let record = encode_record(&Event::new("e"), 0x0102_0304_0506_0708).unwrap();
        assert_eq!(&record[..TIMESTAMP_LEN], &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_record_roundtrip() {
        let event = Event::new("e-1").with_path("/uk/sport");
        let record = encode_record(&event, 1_700_000_000_000).unwrap();
        let (stored_at, decoded) = decode_record(record).unwrap();
        assert_eq!(stored_at, 1_700_000_000_000);
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_short_record() {
        let err = decode_record(Bytes::from_static(&[0, 1, 2])).unwrap_err();
        assert!(matches!(err, DispatcherError::RecordTooShort { len: 3, .. }));
    }

    #[test]
    fn test_garbage_after_timestamp() {
        let mut raw = vec![0u8; TIMESTAMP_LEN];
        raw.extend_from_slice(&[0x18, 0x7F]);
        let err = decode_record(Bytes::from(raw)).unwrap_err();
        assert!(matches!(err, DispatcherError::Codec(ref e) if e.is_truncation()));
        assert_eq!(err.kind(), "truncated");
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(now_ms() > 1_577_836_800_000);
    }

    #[test]
    fn test_kind_labels() {
        let err = DispatcherError::Codec(CodecError::protocol("bad"));
        assert_eq!(err.kind(), "protocol");
    }
}
