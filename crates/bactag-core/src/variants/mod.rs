//! Payload variants carried inside a tag envelope.
//!
//! Each variant reads and writes only its own body; the header is framed by
//! [`Envelope`](crate::tag::Envelope). [`Payload`] is the closed set of all
//! variants the dispatcher can produce.

use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
use crate::error::FieldContext;
use crate::tag::{ExtendedLength, TagKind};
use crate::{DecodeError, ParseError, SerializeError};

pub mod boolean;
pub mod context;
pub mod date_time;
pub mod double;
pub mod integer;
pub mod null;
pub mod object_id;
pub mod real;
pub mod string;

pub use boolean::ApplicationBoolean;
pub use context::{ClosingTag, ContextData, OpeningTag};
pub use date_time::{ApplicationDate, ApplicationTime};
pub use double::ApplicationDouble;
pub use integer::{ApplicationEnumerated, ApplicationSigned, ApplicationUnsigned};
pub use null::ApplicationNull;
pub use object_id::ApplicationObjectId;
pub use real::ApplicationReal;
pub use string::{ApplicationBitString, ApplicationCharacterString, CharacterSet, ApplicationOctetString};

/// Contract every payload variant satisfies towards the envelope and the
/// dispatcher.
pub trait TagBody: Sized {
    /// Registry entry of this variant.
    const KIND: TagKind;

    /// Encoded body length. May depend on the value for variable-length
    /// variants, so callers recompute it instead of caching.
    fn length_in_bits(&self) -> u32;

    fn length_in_bytes(&self) -> u32 {
        self.length_in_bits() / 8
    }

    /// Reads the body that follows an already decoded header.
    fn parse_body(
        r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError>;

    fn write_body(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError>;

    /// Views `payload` as this variant; `None` when it is another kind.
    fn narrow(payload: &Payload) -> Option<&Self>;

    fn into_payload(self) -> Payload;

    fn type_name(&self) -> &'static str {
        Self::KIND.type_name()
    }

    /// 0 for application tags, 1 for context-specific ones.
    fn context_specific_tag(&self) -> u8 {
        Self::KIND.context_specific_tag()
    }
}

/// Body length announced by the header fields handed to a body parser.
pub(crate) fn body_length(length_value_type: u8, extended_length: Option<ExtendedLength>) -> u32 {
    match extended_length {
        Some(ext) => ext.value(),
        None => length_value_type as u32,
    }
}

pub(crate) fn expect_length(
    length_value_type: u8,
    extended_length: Option<ExtendedLength>,
    expected: u32,
) -> Result<(), ParseError> {
    if body_length(length_value_type, extended_length) != expected {
        return Err(DecodeError::InvalidLength).field("length_value_type");
    }
    Ok(())
}

pub(crate) fn bytes_to_bits(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX).saturating_mul(8)
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Payload {
    Null(ApplicationNull),
    Boolean(ApplicationBoolean),
    Unsigned(ApplicationUnsigned),
    Signed(ApplicationSigned),
    Real(ApplicationReal),
    Double(ApplicationDouble),
    OctetString(ApplicationOctetString),
    CharacterString(ApplicationCharacterString),
    BitString(ApplicationBitString),
    Enumerated(ApplicationEnumerated),
    Date(ApplicationDate),
    Time(ApplicationTime),
    ObjectId(ApplicationObjectId),
    Context(ContextData),
    Opening(OpeningTag),
    Closing(ClosingTag),
}

impl Payload {
    /// Runs the body parser selected for `kind`.
    pub fn parse(
        kind: TagKind,
        r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        let lvt = length_value_type;
        let ext = extended_length;
        Ok(match kind {
            TagKind::Null => Self::Null(ApplicationNull::parse_body(r, lvt, ext)?),
            TagKind::Boolean => Self::Boolean(ApplicationBoolean::parse_body(r, lvt, ext)?),
            TagKind::Unsigned => Self::Unsigned(ApplicationUnsigned::parse_body(r, lvt, ext)?),
            TagKind::Signed => Self::Signed(ApplicationSigned::parse_body(r, lvt, ext)?),
            TagKind::Real => Self::Real(ApplicationReal::parse_body(r, lvt, ext)?),
            TagKind::Double => Self::Double(ApplicationDouble::parse_body(r, lvt, ext)?),
            TagKind::OctetString => {
                Self::OctetString(ApplicationOctetString::parse_body(r, lvt, ext)?)
            }
            TagKind::CharacterString => {
                Self::CharacterString(ApplicationCharacterString::parse_body(r, lvt, ext)?)
            }
            TagKind::BitString => Self::BitString(ApplicationBitString::parse_body(r, lvt, ext)?),
            TagKind::Enumerated => {
                Self::Enumerated(ApplicationEnumerated::parse_body(r, lvt, ext)?)
            }
            TagKind::Date => Self::Date(ApplicationDate::parse_body(r, lvt, ext)?),
            TagKind::Time => Self::Time(ApplicationTime::parse_body(r, lvt, ext)?),
            TagKind::ObjectId => Self::ObjectId(ApplicationObjectId::parse_body(r, lvt, ext)?),
            TagKind::Context => Self::Context(ContextData::parse_body(r, lvt, ext)?),
            TagKind::Opening => Self::Opening(OpeningTag::parse_body(r, lvt, ext)?),
            TagKind::Closing => Self::Closing(ClosingTag::parse_body(r, lvt, ext)?),
        })
    }

    pub const fn kind(&self) -> TagKind {
        match self {
            Self::Null(_) => TagKind::Null,
            Self::Boolean(_) => TagKind::Boolean,
            Self::Unsigned(_) => TagKind::Unsigned,
            Self::Signed(_) => TagKind::Signed,
            Self::Real(_) => TagKind::Real,
            Self::Double(_) => TagKind::Double,
            Self::OctetString(_) => TagKind::OctetString,
            Self::CharacterString(_) => TagKind::CharacterString,
            Self::BitString(_) => TagKind::BitString,
            Self::Enumerated(_) => TagKind::Enumerated,
            Self::Date(_) => TagKind::Date,
            Self::Time(_) => TagKind::Time,
            Self::ObjectId(_) => TagKind::ObjectId,
            Self::Context(_) => TagKind::Context,
            Self::Opening(_) => TagKind::Opening,
            Self::Closing(_) => TagKind::Closing,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    pub fn length_in_bits(&self) -> u32 {
        match self {
            Self::Null(v) => v.length_in_bits(),
            Self::Boolean(v) => v.length_in_bits(),
            Self::Unsigned(v) => v.length_in_bits(),
            Self::Signed(v) => v.length_in_bits(),
            Self::Real(v) => v.length_in_bits(),
            Self::Double(v) => v.length_in_bits(),
            Self::OctetString(v) => v.length_in_bits(),
            Self::CharacterString(v) => v.length_in_bits(),
            Self::BitString(v) => v.length_in_bits(),
            Self::Enumerated(v) => v.length_in_bits(),
            Self::Date(v) => v.length_in_bits(),
            Self::Time(v) => v.length_in_bits(),
            Self::ObjectId(v) => v.length_in_bits(),
            Self::Context(v) => v.length_in_bits(),
            Self::Opening(v) => v.length_in_bits(),
            Self::Closing(v) => v.length_in_bits(),
        }
    }

    pub fn length_in_bytes(&self) -> u32 {
        self.length_in_bits() / 8
    }

    pub fn write_body(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        match self {
            Self::Null(v) => v.write_body(w),
            Self::Boolean(v) => v.write_body(w),
            Self::Unsigned(v) => v.write_body(w),
            Self::Signed(v) => v.write_body(w),
            Self::Real(v) => v.write_body(w),
            Self::Double(v) => v.write_body(w),
            Self::OctetString(v) => v.write_body(w),
            Self::CharacterString(v) => v.write_body(w),
            Self::BitString(v) => v.write_body(w),
            Self::Enumerated(v) => v.write_body(w),
            Self::Date(v) => v.write_body(w),
            Self::Time(v) => v.write_body(w),
            Self::ObjectId(v) => v.write_body(w),
            Self::Context(v) => v.write_body(w),
            Self::Opening(v) => v.write_body(w),
            Self::Closing(v) => v.write_body(w),
        }
    }

    /// Safe narrowing to a concrete variant.
    pub fn as_body<T: TagBody>(&self) -> Option<&T> {
        T::narrow(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplicationReal, ApplicationUnsigned, Payload, TagBody};
    use crate::encoding::reader::ReadBuffer;
    use crate::tag::TagKind;
    use crate::DecodeError;

    #[test]
    fn narrowing_matches_only_own_kind() {
        let payload = ApplicationReal::new(1.5).into_payload();
        assert_eq!(payload.as_body::<ApplicationReal>().map(|v| v.value), Some(1.5));
        assert!(payload.as_body::<ApplicationUnsigned>().is_none());
    }

    #[test]
    fn parse_dispatches_on_kind() {
        let mut r = ReadBuffer::new(&[0x01, 0x02]);
        let payload = Payload::parse(TagKind::Unsigned, &mut r, 2, None).unwrap();
        assert_eq!(payload.kind(), TagKind::Unsigned);
        assert_eq!(
            payload.as_body::<ApplicationUnsigned>().map(|v| v.value()),
            Some(0x0102)
        );
        assert!(r.is_empty());
    }

    #[test]
    fn wrong_length_is_reported_on_header_field() {
        let mut r = ReadBuffer::new(&[0; 8]);
        let err = Payload::parse(TagKind::Real, &mut r, 3, None).unwrap_err();
        assert_eq!(err.field, "length_value_type");
        assert_eq!(err.cause, DecodeError::InvalidLength);
    }
}
