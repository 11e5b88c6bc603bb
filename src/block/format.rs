use bytes::BufMut;

use crate::column::wire::take;
use crate::core::CodecError;

/// Longest LEB128 encoding of a u64.
const MAX_VARINT_LEN: usize = 10;

/// Append `value` as unsigned LEB128.
pub(crate) fn put_varint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

pub(crate) fn read_varint(buf: &mut &[u8], context: &'static str) -> Result<u64, CodecError> {
    let mut value = 0u64;
    for i in 0..MAX_VARINT_LEN {
        let byte = take(buf, 1, context)?[0];
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(CodecError::BlockError(format!("varint too long reading {context}")))
}

/// Append a varint length followed by the raw bytes.
pub(crate) fn put_string(buf: &mut Vec<u8>, s: &str) {
    put_varint(buf, s.len() as u64);
    buf.put_slice(s.as_bytes());
}

pub(crate) fn read_string<'a>(
    buf: &mut &'a [u8],
    context: &'static str,
) -> Result<&'a str, CodecError> {
    let len = read_varint(buf, context)?;
    let len = usize::try_from(len)
        .map_err(|_| CodecError::BlockError(format!("{context} length {len} too large")))?;
    let raw = take(buf, len, context)?;
    std::str::from_utf8(raw)
        .map_err(|e| CodecError::BlockError(format!("invalid {context}: {e}")))
}
