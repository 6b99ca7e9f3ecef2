use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
use crate::error::FieldContext;
use crate::{DecodeError, EncodeError, ParseError, SerializeError};

/// Tag-number field value announcing a trailing extended tag number octet.
pub const EXTENDED_TAG_NUMBER: u8 = 15;
/// Length/value/type value announcing an extended length.
pub const EXTENDED_LENGTH: u8 = 5;
/// Length/value/type of a context-class opening tag.
pub const OPENING_TAG: u8 = 6;
/// Length/value/type of a context-class closing tag.
pub const CLOSING_TAG: u8 = 7;

/// Class discriminator bit of the first header octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagClass {
    Application,
    Context,
}

impl TagClass {
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Self::Context
        } else {
            Self::Application
        }
    }

    pub const fn to_bit(self) -> bool {
        matches!(self, Self::Context)
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppTag {
    Null = 0,
    Boolean = 1,
    UnsignedInt = 2,
    SignedInt = 3,
    Real = 4,
    Double = 5,
    OctetString = 6,
    CharacterString = 7,
    BitString = 8,
    Enumerated = 9,
    Date = 10,
    Time = 11,
    ObjectId = 12,
}

impl AppTag {
    pub fn from_u8(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(Self::Null),
            1 => Ok(Self::Boolean),
            2 => Ok(Self::UnsignedInt),
            3 => Ok(Self::SignedInt),
            4 => Ok(Self::Real),
            5 => Ok(Self::Double),
            6 => Ok(Self::OctetString),
            7 => Ok(Self::CharacterString),
            8 => Ok(Self::BitString),
            9 => Ok(Self::Enumerated),
            10 => Ok(Self::Date),
            11 => Ok(Self::Time),
            12 => Ok(Self::ObjectId),
            _ => Err(DecodeError::InvalidTag),
        }
    }
}

/// Extended length octets following a length/value/type of 5.
///
/// The encoded width is kept so that non-canonical lengths written by other
/// stacks re-encode byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExtendedLength {
    /// One octet, 0..=253.
    U8(u8),
    /// Marker 254 followed by a big-endian `u16`.
    U16(u16),
    /// Marker 255 followed by a big-endian `u32`.
    U32(u32),
}

impl ExtendedLength {
    /// Shortest encoding of `len`.
    pub const fn for_length(len: u32) -> Self {
        if len <= 253 {
            Self::U8(len as u8)
        } else if len <= 0xFFFF {
            Self::U16(len as u16)
        } else {
            Self::U32(len)
        }
    }

    pub const fn value(self) -> u32 {
        match self {
            Self::U8(v) => v as u32,
            Self::U16(v) => v as u32,
            Self::U32(v) => v,
        }
    }

    pub const fn length_in_bits(self) -> u32 {
        match self {
            Self::U8(_) => 8,
            Self::U16(_) => 24,
            Self::U32(_) => 40,
        }
    }

    fn decode(r: &mut ReadBuffer<'_>) -> Result<Self, DecodeError> {
        match r.read_u8(8)? {
            254 => Ok(Self::U16(r.read_u16(16)?)),
            255 => Ok(Self::U32(r.read_u32(32)?)),
            v => Ok(Self::U8(v)),
        }
    }

    fn encode(self, w: &mut WriteBuffer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::U8(v) if v <= 253 => w.write_u8(8, v),
            Self::U8(_) => Err(EncodeError::ValueOutOfRange),
            Self::U16(v) => {
                w.write_u8(8, 254)?;
                w.write_u16(16, v)
            }
            Self::U32(v) => {
                w.write_u8(8, 255)?;
                w.write_u32(32, v)
            }
        }
    }
}

/// The shared header of every tag.
///
/// Fields are private so that the extension invariants hold for every
/// instance: `extended_tag_number` is present iff the tag-number field is 15,
/// and `extended_length` is present iff the length/value/type is 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TagHeaderFields"))]
pub struct TagHeader {
    class: TagClass,
    tag_number_field: u8,
    length_value_type: u8,
    extended_tag_number: Option<u8>,
    extended_length: Option<ExtendedLength>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TagHeaderFields {
    class: TagClass,
    tag_number_field: u8,
    length_value_type: u8,
    extended_tag_number: Option<u8>,
    extended_length: Option<ExtendedLength>,
}

#[cfg(feature = "serde")]
impl TryFrom<TagHeaderFields> for TagHeader {
    type Error = EncodeError;

    fn try_from(f: TagHeaderFields) -> Result<Self, Self::Error> {
        Self::new(
            f.class,
            f.tag_number_field,
            f.length_value_type,
            f.extended_tag_number,
            f.extended_length,
        )
    }
}

impl TagHeader {
    /// Builds a header from explicit wire fields.
    pub fn new(
        class: TagClass,
        tag_number_field: u8,
        length_value_type: u8,
        extended_tag_number: Option<u8>,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, EncodeError> {
        if tag_number_field > 15 || length_value_type > 7 {
            return Err(EncodeError::ValueOutOfRange);
        }
        if (tag_number_field == EXTENDED_TAG_NUMBER) != extended_tag_number.is_some() {
            return Err(EncodeError::InvalidTag);
        }
        if (length_value_type == EXTENDED_LENGTH) != extended_length.is_some() {
            return Err(EncodeError::InvalidLength);
        }
        if matches!(extended_length, Some(ExtendedLength::U8(v)) if v > 253) {
            return Err(EncodeError::ValueOutOfRange);
        }
        Ok(Self {
            class,
            tag_number_field,
            length_value_type,
            extended_tag_number,
            extended_length,
        })
    }

    /// Canonical header for a primitive tag carrying `len` body bytes.
    pub const fn for_length(class: TagClass, tag_number: u8, len: u32) -> Self {
        let (tag_number_field, extended_tag_number) = split_tag_number(tag_number);
        let (length_value_type, extended_length) = if len <= 4 {
            (len as u8, None)
        } else {
            (EXTENDED_LENGTH, Some(ExtendedLength::for_length(len)))
        };
        Self {
            class,
            tag_number_field,
            length_value_type,
            extended_tag_number,
            extended_length,
        }
    }

    /// Canonical application header whose length/value/type carries a value
    /// directly rather than a length (booleans).
    pub const fn with_value(tag: AppTag, value: u8) -> Self {
        Self {
            class: TagClass::Application,
            tag_number_field: tag as u8,
            length_value_type: value & 0x07,
            extended_tag_number: None,
            extended_length: None,
        }
    }

    pub const fn opening(tag_number: u8) -> Self {
        Self::delimiter(tag_number, OPENING_TAG)
    }

    pub const fn closing(tag_number: u8) -> Self {
        Self::delimiter(tag_number, CLOSING_TAG)
    }

    const fn delimiter(tag_number: u8, length_value_type: u8) -> Self {
        let (tag_number_field, extended_tag_number) = split_tag_number(tag_number);
        Self {
            class: TagClass::Context,
            tag_number_field,
            length_value_type,
            extended_tag_number,
            extended_length: None,
        }
    }

    pub const fn class(&self) -> TagClass {
        self.class
    }

    pub const fn tag_number_field(&self) -> u8 {
        self.tag_number_field
    }

    /// Effective tag number, following the extension octet when present.
    pub const fn tag_number(&self) -> u8 {
        match self.extended_tag_number {
            Some(n) => n,
            None => self.tag_number_field,
        }
    }

    pub const fn length_value_type(&self) -> u8 {
        self.length_value_type
    }

    pub const fn extended_tag_number(&self) -> Option<u8> {
        self.extended_tag_number
    }

    pub const fn extended_length(&self) -> Option<ExtendedLength> {
        self.extended_length
    }

    /// Body length declared by the header, in bytes.
    pub const fn declared_length(&self) -> u32 {
        match self.extended_length {
            Some(ext) => ext.value(),
            None => self.length_value_type as u32,
        }
    }

    pub const fn is_opening(&self) -> bool {
        matches!(self.class, TagClass::Context) && self.length_value_type == OPENING_TAG
    }

    pub const fn is_closing(&self) -> bool {
        matches!(self.class, TagClass::Context) && self.length_value_type == CLOSING_TAG
    }

    pub const fn length_in_bits(&self) -> u32 {
        let mut bits = 8;
        if self.extended_tag_number.is_some() {
            bits += 8;
        }
        if let Some(ext) = self.extended_length {
            bits += ext.length_in_bits();
        }
        bits
    }

    pub fn encode(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        w.write_u8(4, self.tag_number_field)
            .field("tag_number")?;
        w.write_bit(self.class.to_bit()).field("class")?;
        w.write_u8(3, self.length_value_type)
            .field("length_value_type")?;
        if let Some(n) = self.extended_tag_number {
            w.write_u8(8, n).field("extended_tag_number")?;
        }
        if let Some(ext) = self.extended_length {
            ext.encode(w).field("extended_length")?;
        }
        Ok(())
    }

    pub fn decode(r: &mut ReadBuffer<'_>) -> Result<Self, ParseError> {
        let tag_number_field = r.read_u8(4).field("tag_number")?;
        let class = TagClass::from_bit(r.read_bit().field("class")?);
        let length_value_type = r.read_u8(3).field("length_value_type")?;
        let extended_tag_number = if tag_number_field == EXTENDED_TAG_NUMBER {
            Some(r.read_u8(8).field("extended_tag_number")?)
        } else {
            None
        };
        let extended_length = if length_value_type == EXTENDED_LENGTH {
            Some(ExtendedLength::decode(r).field("extended_length")?)
        } else {
            None
        };
        Ok(Self {
            class,
            tag_number_field,
            length_value_type,
            extended_tag_number,
            extended_length,
        })
    }
}

const fn split_tag_number(tag_number: u8) -> (u8, Option<u8>) {
    if tag_number < EXTENDED_TAG_NUMBER {
        (tag_number, None)
    } else {
        (EXTENDED_TAG_NUMBER, Some(tag_number))
    }
}

#[cfg(test)]
mod tests {
    use super::{AppTag, ExtendedLength, TagClass, TagHeader};
    use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
    use crate::{DecodeError, EncodeError};

    fn roundtrip(header: TagHeader) -> TagHeader {
        let mut buf = [0u8; 8];
        let mut w = WriteBuffer::new(&mut buf);
        header.encode(&mut w).unwrap();
        assert_eq!(w.position_bits() as u32, header.length_in_bits());
        let mut r = ReadBuffer::new(w.as_written());
        let decoded = TagHeader::decode(&mut r).unwrap();
        assert!(r.is_empty());
        decoded
    }

    #[test]
    fn roundtrip_application_tag() {
        let h = TagHeader::for_length(TagClass::Application, AppTag::Real as u8, 4);
        assert_eq!(roundtrip(h), h);
        assert_eq!(h.length_in_bits(), 8);
        assert_eq!(h.declared_length(), 4);
    }

    #[test]
    fn roundtrip_extended() {
        let h = TagHeader::for_length(TagClass::Context, 30, 300);
        assert_eq!(h.tag_number_field(), 15);
        assert_eq!(h.extended_length(), Some(ExtendedLength::U16(300)));
        assert_eq!(roundtrip(h), h);
        assert_eq!(h.tag_number(), 30);
        assert_eq!(h.length_in_bits(), 8 + 8 + 24);
    }

    #[test]
    fn non_canonical_extended_length_is_preserved() {
        let h = TagHeader::new(
            TagClass::Application,
            AppTag::OctetString as u8,
            5,
            None,
            Some(ExtendedLength::U16(6)),
        )
        .unwrap();
        assert_eq!(roundtrip(h), h);
        assert_eq!(h.declared_length(), 6);
    }

    #[test]
    fn extension_invariants_are_enforced() {
        assert_eq!(
            TagHeader::new(TagClass::Context, 15, 1, None, None).unwrap_err(),
            EncodeError::InvalidTag
        );
        assert_eq!(
            TagHeader::new(TagClass::Context, 3, 1, Some(3), None).unwrap_err(),
            EncodeError::InvalidTag
        );
        assert_eq!(
            TagHeader::new(TagClass::Application, 6, 5, None, None).unwrap_err(),
            EncodeError::InvalidLength
        );
        assert_eq!(
            TagHeader::new(
                TagClass::Application,
                6,
                5,
                None,
                Some(ExtendedLength::U8(254))
            )
            .unwrap_err(),
            EncodeError::ValueOutOfRange
        );
    }

    #[test]
    fn opening_and_closing() {
        let open = TagHeader::opening(3);
        let mut buf = [0u8; 2];
        let mut w = WriteBuffer::new(&mut buf);
        open.encode(&mut w).unwrap();
        assert_eq!(w.as_written(), &[0x3E]);
        assert!(roundtrip(open).is_opening());
        assert!(roundtrip(TagHeader::closing(3)).is_closing());
    }

    #[test]
    fn truncated_extension_names_field() {
        let mut r = ReadBuffer::new(&[0x65, 254, 0x01]);
        let err = TagHeader::decode(&mut r).unwrap_err();
        assert_eq!(err.field, "extended_length");
        assert_eq!(err.cause, DecodeError::UnexpectedEof);
    }
}
