//! Context-class payloads.
//!
//! A context tag's meaning comes from the enclosing structure, so its
//! primitive body is kept as raw octets. Opening and closing tags delimit
//! constructed values and have no body.

use alloc::vec::Vec;

use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
use crate::error::FieldContext;
use crate::tag::{ExtendedLength, TagKind};
use crate::variants::{body_length, bytes_to_bits, Payload, TagBody};
use crate::{ParseError, SerializeError};

#[cfg(feature = "text")]
use crate::text::{Fields, TextBody, TextError, TextOptions};
#[cfg(feature = "text")]
use alloc::{string::String, vec};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextData {
    pub data: Vec<u8>,
}

impl ContextData {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl TagBody for ContextData {
    const KIND: TagKind = TagKind::Context;

    fn length_in_bits(&self) -> u32 {
        bytes_to_bits(self.data.len())
    }

    fn parse_body(
        r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        let len = body_length(length_value_type, extended_length) as usize;
        let data = r.read_exact(len).field("data")?.to_vec();
        Ok(Self { data })
    }

    fn write_body(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        w.write_all(&self.data).field("data")
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Context(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Context(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpeningTag;

impl TagBody for OpeningTag {
    const KIND: TagKind = TagKind::Opening;

    fn length_in_bits(&self) -> u32 {
        0
    }

    fn parse_body(
        _r: &mut ReadBuffer<'_>,
        _length_value_type: u8,
        _extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        Ok(Self)
    }

    fn write_body(&self, _w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        Ok(())
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Opening(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Opening(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClosingTag;

impl TagBody for ClosingTag {
    const KIND: TagKind = TagKind::Closing;

    fn length_in_bits(&self) -> u32 {
        0
    }

    fn parse_body(
        _r: &mut ReadBuffer<'_>,
        _length_value_type: u8,
        _extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        Ok(Self)
    }

    fn write_body(&self, _w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        Ok(())
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Closing(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Closing(self)
    }
}

#[cfg(feature = "text")]
impl TextBody for ContextData {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![("data", hex::encode(&self.data))]
    }

    fn from_fields(fields: &Fields, options: &TextOptions) -> Result<Self, TextError> {
        Ok(Self {
            data: fields.hex("data", options)?,
        })
    }
}

#[cfg(feature = "text")]
impl TextBody for OpeningTag {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn from_fields(_fields: &Fields, _options: &TextOptions) -> Result<Self, TextError> {
        Ok(Self)
    }
}

#[cfg(feature = "text")]
impl TextBody for ClosingTag {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn from_fields(_fields: &Fields, _options: &TextOptions) -> Result<Self, TextError> {
        Ok(Self)
    }
}
