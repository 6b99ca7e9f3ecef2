//! Unsigned, signed and enumerated integers.
//!
//! All three carry 1 to 8 big-endian octets. The octet count read from the
//! wire is kept, so a value padded by the sender re-encodes at the same width.

use crate::encoding::primitives::{
    decode_signed, decode_unsigned, encode_signed, encode_unsigned, signed_width, unsigned_width,
};
use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
use crate::error::FieldContext;
use crate::tag::{ExtendedLength, TagKind};
use crate::variants::{body_length, Payload, TagBody};
use crate::{DecodeError, EncodeError, ParseError, SerializeError};

#[cfg(feature = "text")]
use crate::text::{Fields, TextBody, TextError, TextOptions};
#[cfg(feature = "text")]
use alloc::{string::String, string::ToString, vec, vec::Vec};

fn integer_width(
    length_value_type: u8,
    extended_length: Option<ExtendedLength>,
) -> Result<usize, ParseError> {
    let len = body_length(length_value_type, extended_length);
    if len == 0 || len > 8 {
        return Err(DecodeError::InvalidLength).field("length_value_type");
    }
    Ok(len as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "UnsignedFields"))]
pub struct ApplicationUnsigned {
    value: u64,
    width: u8,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct UnsignedFields {
    value: u64,
    width: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<UnsignedFields> for ApplicationUnsigned {
    type Error = EncodeError;

    fn try_from(f: UnsignedFields) -> Result<Self, Self::Error> {
        Self::with_width(f.value, f.width)
    }
}

impl ApplicationUnsigned {
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            width: unsigned_width(value),
        }
    }

    /// Pins the encoded width in octets.
    pub fn with_width(value: u64, width: u8) -> Result<Self, EncodeError> {
        if width == 0 || width > 8 {
            return Err(EncodeError::InvalidLength);
        }
        if unsigned_width(value) > width {
            return Err(EncodeError::ValueOutOfRange);
        }
        Ok(Self { value, width })
    }

    pub const fn value(&self) -> u64 {
        self.value
    }

    pub const fn width(&self) -> u8 {
        self.width
    }
}

impl TagBody for ApplicationUnsigned {
    const KIND: TagKind = TagKind::Unsigned;

    fn length_in_bits(&self) -> u32 {
        self.width as u32 * 8
    }

    fn parse_body(
        r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        let width = integer_width(length_value_type, extended_length)?;
        let value = decode_unsigned(r, width).field("value")?;
        Ok(Self {
            value,
            width: width as u8,
        })
    }

    fn write_body(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        encode_unsigned(w, self.value, self.width).field("value")
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Unsigned(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Unsigned(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SignedFields"))]
pub struct ApplicationSigned {
    value: i64,
    width: u8,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SignedFields {
    value: i64,
    width: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<SignedFields> for ApplicationSigned {
    type Error = EncodeError;

    fn try_from(f: SignedFields) -> Result<Self, Self::Error> {
        Self::with_width(f.value, f.width)
    }
}

impl ApplicationSigned {
    pub const fn new(value: i64) -> Self {
        Self {
            value,
            width: signed_width(value),
        }
    }

    pub fn with_width(value: i64, width: u8) -> Result<Self, EncodeError> {
        if width == 0 || width > 8 {
            return Err(EncodeError::InvalidLength);
        }
        if signed_width(value) > width {
            return Err(EncodeError::ValueOutOfRange);
        }
        Ok(Self { value, width })
    }

    pub const fn value(&self) -> i64 {
        self.value
    }

    pub const fn width(&self) -> u8 {
        self.width
    }
}

impl TagBody for ApplicationSigned {
    const KIND: TagKind = TagKind::Signed;

    fn length_in_bits(&self) -> u32 {
        self.width as u32 * 8
    }

    fn parse_body(
        r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        let width = integer_width(length_value_type, extended_length)?;
        let value = decode_signed(r, width).field("value")?;
        Ok(Self {
            value,
            width: width as u8,
        })
    }

    fn write_body(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        encode_signed(w, self.value, self.width).field("value")
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Signed(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Signed(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "EnumeratedFields"))]
pub struct ApplicationEnumerated {
    value: u64,
    width: u8,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct EnumeratedFields {
    value: u64,
    width: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<EnumeratedFields> for ApplicationEnumerated {
    type Error = EncodeError;

    fn try_from(f: EnumeratedFields) -> Result<Self, Self::Error> {
        Self::with_width(f.value, f.width)
    }
}

impl ApplicationEnumerated {
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            width: unsigned_width(value),
        }
    }

    pub fn with_width(value: u64, width: u8) -> Result<Self, EncodeError> {
        let inner = ApplicationUnsigned::with_width(value, width)?;
        Ok(Self {
            value: inner.value,
            width: inner.width,
        })
    }

    pub const fn value(&self) -> u64 {
        self.value
    }

    pub const fn width(&self) -> u8 {
        self.width
    }
}

impl TagBody for ApplicationEnumerated {
    const KIND: TagKind = TagKind::Enumerated;

    fn length_in_bits(&self) -> u32 {
        self.width as u32 * 8
    }

    fn parse_body(
        r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        let inner = ApplicationUnsigned::parse_body(r, length_value_type, extended_length)?;
        Ok(Self {
            value: inner.value,
            width: inner.width,
        })
    }

    fn write_body(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        encode_unsigned(w, self.value, self.width).field("value")
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Enumerated(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Enumerated(self)
    }
}

#[cfg(feature = "text")]
impl TextBody for ApplicationUnsigned {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![("value", self.value.to_string())]
    }

    fn from_fields(fields: &Fields, options: &TextOptions) -> Result<Self, TextError> {
        Ok(Self::new(fields.parse("value", options)?))
    }
}

#[cfg(feature = "text")]
impl TextBody for ApplicationSigned {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![("value", self.value.to_string())]
    }

    fn from_fields(fields: &Fields, options: &TextOptions) -> Result<Self, TextError> {
        Ok(Self::new(fields.parse("value", options)?))
    }
}

#[cfg(feature = "text")]
impl TextBody for ApplicationEnumerated {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![("value", self.value.to_string())]
    }

    fn from_fields(fields: &Fields, options: &TextOptions) -> Result<Self, TextError> {
        Ok(Self::new(fields.parse("value", options)?))
    }
}
