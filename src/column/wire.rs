use bytes::Buf;

use crate::core::CodecError;

/// Split `len` bytes off the front of `buf`.
pub(crate) fn take<'a>(
    buf: &mut &'a [u8],
    len: usize,
    context: &'static str,
) -> Result<&'a [u8], CodecError> {
    if buf.len() < len {
        return Err(CodecError::UnexpectedEof {
            context,
            needed: len,
            available: buf.len(),
        });
    }
    let (head, tail) = buf.split_at(len);
    *buf = tail;
    Ok(head)
}

pub(crate) fn read_u64(buf: &mut &[u8], context: &'static str) -> Result<u64, CodecError> {
    if buf.remaining() < 8 {
        return Err(CodecError::UnexpectedEof {
            context,
            needed: 8,
            available: buf.remaining(),
        });
    }
    Ok(buf.get_u64_le())
}

/// Byte length of `rows` elements of `size` bytes, guarding against overflow
/// from a corrupt row count.
pub(crate) fn byte_len(
    rows: usize,
    size: usize,
    context: &'static str,
) -> Result<usize, CodecError> {
    rows.checked_mul(size).ok_or(CodecError::UnexpectedEof {
        context,
        needed: usize::MAX,
        available: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_advances() {
        let data = [1u8, 2, 3, 4];
        let mut buf = &data[..];
        assert_eq!(take(&mut buf, 3, "test").unwrap(), &[1, 2, 3]);
        assert_eq!(buf, &[4]);
    }

    #[test]
    fn test_take_short_buffer() {
        let data = [1u8, 2];
        let mut buf = &data[..];
        let err = take(&mut buf, 3, "payload").unwrap_err();
        assert_eq!(
            err,
            CodecError::UnexpectedEof {
                context: "payload",
                needed: 3,
                available: 2
            }
        );
        // nothing consumed on failure
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_read_u64() {
        let data = 0x0102_0304_0506_0708u64.to_le_bytes();
        let mut buf = &data[..];
        assert_eq!(read_u64(&mut buf, "test").unwrap(), 0x0102_0304_0506_0708);
        assert!(buf.is_empty());
        assert!(read_u64(&mut buf, "test").is_err());
    }

    #[test]
    fn test_byte_len_overflow() {
        assert_eq!(byte_len(3, 4, "test").unwrap(), 12);
        assert!(byte_len(usize::MAX, 2, "test").is_err());
    }
}
