use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
use crate::error::FieldContext;
use crate::tag::{ExtendedLength, TagKind};
use crate::variants::{Payload, TagBody};
use crate::{DecodeError, ParseError, SerializeError};

#[cfg(feature = "text")]
use crate::text::{Fields, TextBody, TextError, TextOptions};
#[cfg(feature = "text")]
use alloc::{string::String, string::ToString, vec, vec::Vec};

/// Application tag 1.
///
/// The value lives in the header's length/value/type field, so the body is
/// empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplicationBoolean {
    pub value: bool,
}

impl ApplicationBoolean {
    pub const fn new(value: bool) -> Self {
        Self { value }
    }
}

impl TagBody for ApplicationBoolean {
    const KIND: TagKind = TagKind::Boolean;

    fn length_in_bits(&self) -> u32 {
        0
    }

    fn parse_body(
        _r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        if extended_length.is_some() || length_value_type > 1 {
            return Err(DecodeError::InvalidValue).field("length_value_type");
        }
        Ok(Self {
            value: length_value_type == 1,
        })
    }

    fn write_body(&self, _w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        Ok(())
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Boolean(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Boolean(self)
    }
}

#[cfg(feature = "text")]
impl TextBody for ApplicationBoolean {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![("value", self.value.to_string())]
    }

    fn from_fields(fields: &Fields, options: &TextOptions) -> Result<Self, TextError> {
        Ok(Self {
            value: fields.parse("value", options)?,
        })
    }
}
