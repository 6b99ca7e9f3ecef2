use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
use crate::{DecodeError, EncodeError};

/// Smallest number of bytes that holds `value` as an unsigned integer.
pub const fn unsigned_width(value: u64) -> u8 {
    let mut len = 1;
    while len < 8 && value >> (len * 8) != 0 {
        len += 1;
    }
    len as u8
}

/// Smallest number of bytes that holds `value` in two's complement.
pub const fn signed_width(value: i64) -> u8 {
    let mut len = 1;
    while len < 8 {
        let bits = len * 8 - 1;
        if value >= -(1i64 << bits) && value < (1i64 << bits) {
            break;
        }
        len += 1;
    }
    len as u8
}

pub fn decode_unsigned(r: &mut ReadBuffer<'_>, len: usize) -> Result<u64, DecodeError> {
    if len == 0 || len > 8 {
        return Err(DecodeError::InvalidLength);
    }
    r.read_u64((len * 8) as u8)
}

pub fn encode_unsigned(w: &mut WriteBuffer<'_>, value: u64, len: u8) -> Result<(), EncodeError> {
    if len == 0 || len > 8 {
        return Err(EncodeError::InvalidLength);
    }
    w.write_u64(len * 8, value)
}

pub fn decode_signed(r: &mut ReadBuffer<'_>, len: usize) -> Result<i64, DecodeError> {
    if len == 0 || len > 8 {
        return Err(DecodeError::InvalidLength);
    }
    r.read_i64((len * 8) as u8)
}

pub fn encode_signed(w: &mut WriteBuffer<'_>, value: i64, len: u8) -> Result<(), EncodeError> {
    if len == 0 || len > 8 {
        return Err(EncodeError::InvalidLength);
    }
    w.write_i64(len * 8, value)
}

#[cfg(test)]
mod tests {
    use super::{
        decode_signed, decode_unsigned, encode_signed, encode_unsigned, signed_width,
        unsigned_width,
    };
    use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
    use crate::{DecodeError, EncodeError};
    use proptest::prelude::*;

    #[test]
    fn widths_are_minimal() {
        assert_eq!(unsigned_width(0), 1);
        assert_eq!(unsigned_width(0xFF), 1);
        assert_eq!(unsigned_width(0x100), 2);
        assert_eq!(unsigned_width(u32::MAX as u64), 4);
        assert_eq!(unsigned_width(u64::MAX), 8);
        assert_eq!(signed_width(-128), 1);
        assert_eq!(signed_width(128), 2);
        assert_eq!(signed_width(-32769), 3);
        assert_eq!(signed_width(i64::MIN), 8);
    }

    #[test]
    fn zero_length_is_rejected() {
        let mut b = [0u8; 4];
        let mut w = WriteBuffer::new(&mut b);
        assert_eq!(encode_unsigned(&mut w, 0, 0).unwrap_err(), EncodeError::InvalidLength);
        let mut r = ReadBuffer::new(&[0, 0]);
        assert_eq!(decode_signed(&mut r, 9).unwrap_err(), DecodeError::InvalidLength);
    }

    proptest! {
        #[test]
        fn unsigned_roundtrip(v in any::<u64>()) {
            let mut b = [0u8; 8];
            let mut w = WriteBuffer::new(&mut b);
            let len = unsigned_width(v);
            encode_unsigned(&mut w, v, len).unwrap();
            prop_assert_eq!(w.position(), len as usize);
            let mut r = ReadBuffer::new(w.as_written());
            prop_assert_eq!(decode_unsigned(&mut r, len as usize).unwrap(), v);
        }

        #[test]
        fn signed_roundtrip(v in any::<i64>()) {
            let mut b = [0u8; 8];
            let mut w = WriteBuffer::new(&mut b);
            let len = signed_width(v);
            encode_signed(&mut w, v, len).unwrap();
            let mut r = ReadBuffer::new(w.as_written());
            prop_assert_eq!(decode_signed(&mut r, len as usize).unwrap(), v);
        }
    }
}
