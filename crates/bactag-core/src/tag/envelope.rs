use alloc::vec;
use alloc::vec::Vec;

use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
use crate::error::FieldContext;
use crate::tag::header::{AppTag, TagClass, TagHeader};
use crate::tag::registry::TagKind;
use crate::variants::{Payload, TagBody};
use crate::{DecodeError, EncodeError, ParseError, SerializeError};

/// A complete tag: the shared header plus exactly one payload variant.
///
/// Both constructors and [`parse`](Self::parse) check that the header agrees
/// with the payload, so every instance re-encodes to the bytes it describes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "EnvelopeFields"))]
pub struct Envelope {
    header: TagHeader,
    payload: Payload,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct EnvelopeFields {
    header: TagHeader,
    payload: Payload,
}

#[cfg(feature = "serde")]
impl TryFrom<EnvelopeFields> for Envelope {
    type Error = EncodeError;

    fn try_from(f: EnvelopeFields) -> Result<Self, Self::Error> {
        Self::new(f.header, f.payload)
    }
}

impl Envelope {
    /// Pairs explicit header fields with a payload.
    pub fn new(header: TagHeader, payload: Payload) -> Result<Self, EncodeError> {
        let kind = TagKind::select(&header).map_err(|_| EncodeError::InvalidTag)?;
        if kind != payload.kind() {
            return Err(EncodeError::InvalidTag);
        }
        match &payload {
            Payload::Boolean(b) => {
                if header.extended_length().is_some()
                    || header.length_value_type() != b.value as u8
                {
                    return Err(EncodeError::InvalidLength);
                }
            }
            Payload::Opening(_) | Payload::Closing(_) => {}
            _ => {
                if header.declared_length() != payload.length_in_bytes() {
                    return Err(EncodeError::InvalidLength);
                }
            }
        }
        Self::sized(header, payload)
    }

    /// Rejects tags whose total bit length does not fit in a `u32`.
    fn sized(header: TagHeader, payload: Payload) -> Result<Self, EncodeError> {
        let body = payload.length_in_bits();
        if body == u32::MAX || header.length_in_bits().checked_add(body).is_none() {
            return Err(EncodeError::InvalidLength);
        }
        Ok(Self { header, payload })
    }

    /// Wraps an application payload in its canonical header.
    pub fn from_payload(payload: Payload) -> Result<Self, EncodeError> {
        let tag = payload.kind().app_tag().ok_or(EncodeError::InvalidTag)?;
        let header = match &payload {
            Payload::Boolean(b) => TagHeader::with_value(tag, b.value as u8),
            _ => TagHeader::for_length(
                TagClass::Application,
                tag as u8,
                payload.length_in_bytes(),
            ),
        };
        Self::sized(header, payload)
    }

    pub fn from_body<T: TagBody>(body: T) -> Result<Self, EncodeError> {
        Self::from_payload(body.into_payload())
    }

    /// Wraps a context-class payload under `tag_number`.
    pub fn context(tag_number: u8, payload: Payload) -> Result<Self, EncodeError> {
        let header = match &payload {
            Payload::Context(_) => {
                TagHeader::for_length(TagClass::Context, tag_number, payload.length_in_bytes())
            }
            Payload::Opening(_) => TagHeader::opening(tag_number),
            Payload::Closing(_) => TagHeader::closing(tag_number),
            _ => return Err(EncodeError::InvalidTag),
        };
        Self::sized(header, payload)
    }

    pub fn application_real(value: f32) -> Self {
        let payload = crate::variants::ApplicationReal::new(value).into_payload();
        Self {
            header: TagHeader::for_length(TagClass::Application, AppTag::Real as u8, 4),
            payload,
        }
    }

    pub const fn header(&self) -> &TagHeader {
        &self.header
    }

    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_parts(self) -> (TagHeader, Payload) {
        (self.header, self.payload)
    }

    pub const fn kind(&self) -> TagKind {
        self.payload.kind()
    }

    pub const fn type_name(&self) -> &'static str {
        self.payload.kind().type_name()
    }

    /// Header plus body length. Recomputed on every call.
    pub fn length_in_bits(&self) -> u32 {
        self.header
            .length_in_bits()
            .saturating_add(self.payload.length_in_bits())
    }

    pub fn length_in_bytes(&self) -> u32 {
        self.length_in_bits() / 8
    }

    /// Safe narrowing to a concrete variant; `None` for any other kind.
    pub fn payload_as<T: TagBody>(&self) -> Option<&T> {
        T::narrow(&self.payload)
    }

    /// Decodes one tag: header first, then the body of the selected variant.
    pub fn parse(r: &mut ReadBuffer<'_>) -> Result<Self, ParseError> {
        let header = TagHeader::decode(r)?;
        let kind = TagKind::select(&header).field("tag_number")?;
        log::trace!(
            "dispatching {} (class {:?}, tag {}, declared length {})",
            kind.type_name(),
            header.class(),
            header.tag_number(),
            header.declared_length()
        );
        let payload = Payload::parse(
            kind,
            r,
            header.length_value_type(),
            header.extended_length(),
        )?;
        Self::sized(header, payload).map_err(|_| ParseError {
            field: "length_value_type",
            cause: DecodeError::InvalidLength,
        })
    }

    /// Decodes consecutive tags until the input is exhausted.
    pub fn parse_all(bytes: &[u8]) -> Result<Vec<Self>, ParseError> {
        let mut r = ReadBuffer::new(bytes);
        let mut out = Vec::new();
        while !r.is_empty() {
            out.push(Self::parse(&mut r)?);
        }
        log::debug!("decoded {} tags from {} bytes", out.len(), bytes.len());
        Ok(out)
    }

    /// Writes the header, then the payload body, into `w`.
    ///
    /// On error the header bytes already written stay in `w`; the buffer must
    /// be discarded rather than reused.
    pub fn serialize(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        self.header.encode(w)?;
        self.payload.write_body(w)
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, SerializeError> {
        let mut buf = vec![0u8; self.length_in_bytes() as usize];
        let mut w = WriteBuffer::new(&mut buf);
        self.serialize(&mut w)?;
        let written = w.position();
        buf.truncate(written);
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::Envelope;
    use alloc::vec;
    use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
    use crate::tag::header::{AppTag, ExtendedLength, TagClass, TagHeader};
    use crate::tag::registry::TagKind;
    use crate::variants::{
        ApplicationBoolean, ApplicationOctetString, ApplicationReal, ApplicationUnsigned,
        ContextData, OpeningTag, TagBody,
    };
    use crate::{DecodeError, EncodeError};

    #[test]
    fn parses_real_example() {
        let mut r = ReadBuffer::new(&[0x44, 0x40, 0x48, 0xF5, 0xC3]);
        let env = Envelope::parse(&mut r).unwrap();
        assert!(r.is_empty());
        let real = env.payload_as::<ApplicationReal>().unwrap();
        assert_eq!(real.value, 3.14f32);
        assert_eq!(real.length_in_bytes(), 4);
        assert_eq!(env.length_in_bytes(), 5);
        assert_eq!(env.header().length_value_type(), 4);
        assert_eq!(env.header().extended_length(), None);
    }

    #[test]
    fn serializes_real_example() {
        let env = Envelope::application_real(3.14);
        assert_eq!(env.to_vec().unwrap(), vec![0x44, 0x40, 0x48, 0xF5, 0xC3]);
        assert_eq!(Envelope::from_body(ApplicationReal::new(3.14)).unwrap(), env);
    }

    #[test]
    fn application_real_uses_real_tag_number() {
        let env = Envelope::application_real(-1.5);
        assert_eq!(env.header().tag_number(), AppTag::Real as u8);
        assert_eq!(env.header().class(), TagClass::Application);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_body_is_rejected_not_overflowed() {
        // 2^32 - 64 body bits plus a 6-octet header still fits.
        {
            let fits = ApplicationOctetString::new(vec![0u8; (1 << 29) - 8]);
            let env = Envelope::from_body(fits).unwrap();
            assert_eq!(env.length_in_bits(), u32::MAX - 15);
        }

        let too_long = ApplicationOctetString::new(vec![0u8; (1 << 29) - 1]);
        assert_eq!(
            Envelope::from_body(too_long).unwrap_err(),
            EncodeError::InvalidLength
        );
    }

    #[test]
    fn wrong_variant_narrows_to_none() {
        let env = Envelope::application_real(1.0);
        assert!(env.payload_as::<ApplicationUnsigned>().is_none());
        assert!(env.payload_as::<ContextData>().is_none());
    }

    #[test]
    fn explicit_header_must_match_payload() {
        let real = ApplicationReal::new(1.0).into_payload();
        let bad_tag = TagHeader::for_length(TagClass::Application, AppTag::Double as u8, 4);
        assert_eq!(
            Envelope::new(bad_tag, real.clone()).unwrap_err(),
            EncodeError::InvalidTag
        );
        let bad_len = TagHeader::for_length(TagClass::Application, AppTag::Real as u8, 3);
        assert_eq!(
            Envelope::new(bad_len, real.clone()).unwrap_err(),
            EncodeError::InvalidLength
        );
        let padded = TagHeader::new(
            TagClass::Application,
            AppTag::Real as u8,
            5,
            None,
            Some(ExtendedLength::U8(4)),
        )
        .unwrap();
        let env = Envelope::new(padded, real).unwrap();
        assert_eq!(env.length_in_bits(), 16 + 32);
        let bytes = env.to_vec().unwrap();
        assert_eq!(bytes, vec![0x45, 0x04, 0x3F, 0x80, 0x00, 0x00]);
        let mut r = ReadBuffer::new(&bytes);
        assert_eq!(Envelope::parse(&mut r).unwrap(), env);
    }

    #[test]
    fn boolean_header_carries_value() {
        let env = Envelope::from_body(ApplicationBoolean::new(true)).unwrap();
        assert_eq!(env.to_vec().unwrap(), vec![0x11]);
        let wrong = TagHeader::with_value(AppTag::Boolean, 0);
        assert_eq!(
            Envelope::new(wrong, ApplicationBoolean::new(true).into_payload()).unwrap_err(),
            EncodeError::InvalidLength
        );
    }

    #[test]
    fn context_constructors() {
        let env = Envelope::context(1, ContextData::new([0x2A]).into_payload()).unwrap();
        assert_eq!(env.to_vec().unwrap(), vec![0x19, 0x2A]);
        let open = Envelope::context(3, OpeningTag.into_payload()).unwrap();
        assert_eq!(open.to_vec().unwrap(), vec![0x3E]);
        assert_eq!(
            Envelope::context(1, ApplicationReal::new(0.0).into_payload()).unwrap_err(),
            EncodeError::InvalidTag
        );
        assert_eq!(
            Envelope::from_payload(OpeningTag.into_payload()).unwrap_err(),
            EncodeError::InvalidTag
        );
    }

    #[test]
    fn long_body_uses_extended_length() {
        let env = Envelope::from_body(ApplicationOctetString::new(vec![7u8; 300])).unwrap();
        assert_eq!(env.header().extended_length(), Some(ExtendedLength::U16(300)));
        let bytes = env.to_vec().unwrap();
        assert_eq!(&bytes[..4], &[0x65, 254, 0x01, 0x2C]);
        assert_eq!(bytes.len() as u32, env.length_in_bytes());
        assert_eq!(Envelope::parse_all(&bytes).unwrap(), vec![env]);
    }

    #[test]
    fn unknown_application_tag_names_tag_number() {
        let mut r = ReadBuffer::new(&[0xD1, 0x00]);
        let err = Envelope::parse(&mut r).unwrap_err();
        assert_eq!(err.field, "tag_number");
        assert_eq!(err.cause, DecodeError::InvalidTag);
    }

    #[test]
    fn truncated_body_aborts_whole_parse() {
        let err = Envelope::parse_all(&[0x21, 0x05, 0x44, 0x40, 0x48]).unwrap_err();
        assert_eq!(err.field, "value");
        assert_eq!(err.cause, DecodeError::UnexpectedEof);
    }

    #[test]
    fn failed_serialize_reports_field() {
        let env = Envelope::application_real(2.5);
        let mut buf = [0u8; 3];
        let mut w = WriteBuffer::new(&mut buf);
        let err = env.serialize(&mut w).unwrap_err();
        assert_eq!(err.field, "value");
        assert_eq!(err.cause, EncodeError::BufferTooSmall);

        let mut empty: [u8; 0] = [];
        let mut w = WriteBuffer::new(&mut empty);
        assert_eq!(env.serialize(&mut w).unwrap_err().field, "tag_number");
    }

    #[test]
    fn kind_and_type_name() {
        let env = Envelope::application_real(0.0);
        assert_eq!(env.kind(), TagKind::Real);
        assert_eq!(env.type_name(), "ApplicationReal");
    }
}
