use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
use crate::tag::{ExtendedLength, TagKind};
use crate::variants::{expect_length, Payload, TagBody};
use crate::{ParseError, SerializeError};

#[cfg(feature = "text")]
use crate::text::{Fields, TextBody, TextError, TextOptions};
#[cfg(feature = "text")]
use alloc::{string::String, vec::Vec};

/// Application tag 0; no body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplicationNull;

impl TagBody for ApplicationNull {
    const KIND: TagKind = TagKind::Null;

    fn length_in_bits(&self) -> u32 {
        0
    }

    fn parse_body(
        _r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        expect_length(length_value_type, extended_length, 0)?;
        Ok(Self)
    }

    fn write_body(&self, _w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        Ok(())
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Null(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Null(self)
    }
}

#[cfg(feature = "text")]
impl TextBody for ApplicationNull {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn from_fields(_fields: &Fields, _options: &TextOptions) -> Result<Self, TextError> {
        Ok(Self)
    }
}
