//! IEEE-754 binary32 value under application tag 4.

use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
use crate::error::FieldContext;
use crate::tag::{ExtendedLength, TagKind};
use crate::variants::{expect_length, Payload, TagBody};
use crate::{ParseError, SerializeError};

#[cfg(feature = "text")]
use crate::text::{format_f32, Fields, TextBody, TextError, TextOptions};
#[cfg(feature = "text")]
use alloc::{string::String, vec, vec::Vec};

const SIGN_BITS: u8 = 1;
const EXPONENT_BITS: u8 = 8;
const MANTISSA_BITS: u8 = 23;
const VALUE_BITS: u8 = SIGN_BITS + EXPONENT_BITS + MANTISSA_BITS;

/// A Real payload.
///
/// The body is always 32 bits wide whatever the value, NaN and infinities
/// included. Bits are carried verbatim in both directions, so a NaN payload
/// survives a decode/encode cycle unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplicationReal {
    pub value: f32,
}

impl ApplicationReal {
    pub const fn new(value: f32) -> Self {
        Self { value }
    }
}

impl TagBody for ApplicationReal {
    const KIND: TagKind = TagKind::Real;

    fn length_in_bits(&self) -> u32 {
        VALUE_BITS as u32
    }

    fn parse_body(
        r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        expect_length(length_value_type, extended_length, VALUE_BITS as u32 / 8)?;
        let value = r
            .read_f32(true, EXPONENT_BITS, MANTISSA_BITS)
            .field("value")?;
        Ok(Self { value })
    }

    fn write_body(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        w.write_f32(VALUE_BITS, self.value).field("value")
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Real(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Real(self)
    }
}

#[cfg(feature = "text")]
impl TextBody for ApplicationReal {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![("value", format_f32(self.value))]
    }

    fn from_fields(fields: &Fields, options: &TextOptions) -> Result<Self, TextError> {
        Ok(Self {
            value: fields.parse("value", options)?,
        })
    }
}
