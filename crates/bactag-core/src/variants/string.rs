use alloc::string::String;
use alloc::vec::Vec;

use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
use crate::error::FieldContext;
use crate::tag::{ExtendedLength, TagKind};
use crate::variants::{body_length, bytes_to_bits, Payload, TagBody};
use crate::{DecodeError, EncodeError, ParseError, SerializeError};

#[cfg(feature = "text")]
use crate::text::{is_xml_text, Fields, TextBody, TextError, TextOptions};
#[cfg(feature = "text")]
use alloc::{string::ToString, vec};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplicationOctetString {
    pub value: Vec<u8>,
}

impl ApplicationOctetString {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl TagBody for ApplicationOctetString {
    const KIND: TagKind = TagKind::OctetString;

    fn length_in_bits(&self) -> u32 {
        bytes_to_bits(self.value.len())
    }

    fn parse_body(
        r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        let len = body_length(length_value_type, extended_length) as usize;
        let value = r.read_exact(len).field("value")?.to_vec();
        Ok(Self { value })
    }

    fn write_body(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        w.write_all(&self.value).field("value")
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::OctetString(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::OctetString(self)
    }
}

/// Character set octet leading a character string body.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharacterSet {
    /// ANSI X3.4, read as UTF-8.
    #[default]
    Utf8 = 0,
    Ucs4 = 3,
    Ucs2 = 4,
    Iso8859_1 = 5,
}

impl CharacterSet {
    /// DBCS (1) and JIS X 0208 (2) are recognised but not decoded.
    pub fn from_u8(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(Self::Utf8),
            3 => Ok(Self::Ucs4),
            4 => Ok(Self::Ucs2),
            5 => Ok(Self::Iso8859_1),
            1 | 2 => Err(DecodeError::Unsupported),
            _ => Err(DecodeError::InvalidValue),
        }
    }

    fn encoded_len(self, value: &str) -> usize {
        match self {
            Self::Utf8 => value.len(),
            Self::Ucs4 => value.chars().count() * 4,
            Self::Ucs2 => value.encode_utf16().count() * 2,
            Self::Iso8859_1 => value.chars().count(),
        }
    }

    fn can_encode(self, value: &str) -> bool {
        match self {
            Self::Utf8 | Self::Ucs4 => true,
            Self::Ucs2 => value.chars().all(|c| (c as u32) <= 0xFFFF),
            Self::Iso8859_1 => value.chars().all(|c| (c as u32) <= 0xFF),
        }
    }

    fn encode(self, value: &str) -> Result<Vec<u8>, EncodeError> {
        if !self.can_encode(value) {
            return Err(EncodeError::ValueOutOfRange);
        }
        Ok(match self {
            Self::Utf8 => value.as_bytes().to_vec(),
            Self::Ucs4 => value
                .chars()
                .flat_map(|c| (c as u32).to_be_bytes())
                .collect(),
            Self::Ucs2 => value.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Self::Iso8859_1 => value.chars().map(|c| c as u8).collect(),
        })
    }

    fn decode(self, raw: &[u8]) -> Result<String, DecodeError> {
        match self {
            Self::Utf8 => core::str::from_utf8(raw)
                .map(String::from)
                .map_err(|_| DecodeError::InvalidValue),
            Self::Ucs4 => {
                if raw.len() % 4 != 0 {
                    return Err(DecodeError::InvalidLength);
                }
                raw.chunks_exact(4)
                    .map(|c| {
                        char::from_u32(u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                            .ok_or(DecodeError::InvalidValue)
                    })
                    .collect()
            }
            Self::Ucs2 => {
                if raw.len() % 2 != 0 {
                    return Err(DecodeError::InvalidLength);
                }
                let units = raw.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]]));
                char::decode_utf16(units)
                    .map(|c| c.map_err(|_| DecodeError::InvalidValue))
                    .collect()
            }
            Self::Iso8859_1 => Ok(raw.iter().map(|&b| b as char).collect()),
        }
    }
}

/// Application tag 7: a character set octet followed by the encoded text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "CharacterStringFields"))]
pub struct ApplicationCharacterString {
    encoding: CharacterSet,
    value: String,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct CharacterStringFields {
    encoding: CharacterSet,
    value: String,
}

#[cfg(feature = "serde")]
impl TryFrom<CharacterStringFields> for ApplicationCharacterString {
    type Error = EncodeError;

    fn try_from(f: CharacterStringFields) -> Result<Self, Self::Error> {
        Self::with_encoding(f.encoding, f.value)
    }
}

impl ApplicationCharacterString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            encoding: CharacterSet::Utf8,
            value: value.into(),
        }
    }

    /// Fails when `value` has characters the chosen set cannot represent.
    pub fn with_encoding(
        encoding: CharacterSet,
        value: impl Into<String>,
    ) -> Result<Self, EncodeError> {
        let value = value.into();
        if !encoding.can_encode(&value) {
            return Err(EncodeError::ValueOutOfRange);
        }
        Ok(Self { encoding, value })
    }

    pub const fn encoding(&self) -> CharacterSet {
        self.encoding
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl TagBody for ApplicationCharacterString {
    const KIND: TagKind = TagKind::CharacterString;

    fn length_in_bits(&self) -> u32 {
        bytes_to_bits(1 + self.encoding.encoded_len(&self.value))
    }

    fn parse_body(
        r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        let len = body_length(length_value_type, extended_length) as usize;
        if len == 0 {
            return Err(DecodeError::InvalidLength).field("length_value_type");
        }
        let encoding = r
            .read_u8(8)
            .and_then(CharacterSet::from_u8)
            .field("encoding")?;
        let raw = r.read_exact(len - 1).field("value")?;
        let value = encoding.decode(raw).field("value")?;
        Ok(Self { encoding, value })
    }

    fn write_body(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        w.write_u8(8, self.encoding as u8).field("encoding")?;
        let raw = self.encoding.encode(&self.value).field("value")?;
        w.write_all(&raw).field("value")
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::CharacterString(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::CharacterString(self)
    }
}

/// Application tag 8: an unused-bit count followed by packed bits, MSB first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "BitStringFields"))]
pub struct ApplicationBitString {
    unused_bits: u8,
    data: Vec<u8>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct BitStringFields {
    unused_bits: u8,
    data: Vec<u8>,
}

#[cfg(feature = "serde")]
impl TryFrom<BitStringFields> for ApplicationBitString {
    type Error = EncodeError;

    fn try_from(f: BitStringFields) -> Result<Self, Self::Error> {
        Self::new(f.unused_bits, f.data)
    }
}

impl ApplicationBitString {
    pub fn new(unused_bits: u8, data: impl Into<Vec<u8>>) -> Result<Self, EncodeError> {
        let data = data.into();
        if unused_bits > 7 || (data.is_empty() && unused_bits != 0) {
            return Err(EncodeError::ValueOutOfRange);
        }
        Ok(Self { unused_bits, data })
    }

    pub fn from_bits(bits: &[bool]) -> Self {
        let mut data = alloc::vec![0u8; bits.len().div_ceil(8)];
        for (i, bit) in bits.iter().enumerate() {
            if *bit {
                data[i / 8] |= 0x80 >> (i % 8);
            }
        }
        let unused_bits = ((8 - bits.len() % 8) % 8) as u8;
        Self { unused_bits, data }
    }

    pub const fn unused_bits(&self) -> u8 {
        self.unused_bits
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of meaningful bits.
    pub fn len(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.unused_bits as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.len() {
            return None;
        }
        Some(self.data[index / 8] & (0x80 >> (index % 8)) != 0)
    }
}

impl TagBody for ApplicationBitString {
    const KIND: TagKind = TagKind::BitString;

    fn length_in_bits(&self) -> u32 {
        bytes_to_bits(1 + self.data.len())
    }

    fn parse_body(
        r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        let len = body_length(length_value_type, extended_length) as usize;
        if len == 0 {
            return Err(DecodeError::InvalidLength).field("length_value_type");
        }
        let unused_bits = r.read_u8(8).field("unused_bits")?;
        if unused_bits > 7 || (len == 1 && unused_bits != 0) {
            return Err(DecodeError::InvalidValue).field("unused_bits");
        }
        let data = r.read_exact(len - 1).field("data")?.to_vec();
        Ok(Self { unused_bits, data })
    }

    fn write_body(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        w.write_u8(8, self.unused_bits).field("unused_bits")?;
        w.write_all(&self.data).field("data")
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::BitString(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::BitString(self)
    }
}

#[cfg(feature = "text")]
impl TextBody for ApplicationOctetString {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![("value", hex::encode(&self.value))]
    }

    fn from_fields(fields: &Fields, options: &TextOptions) -> Result<Self, TextError> {
        Ok(Self {
            value: fields.hex("value", options)?,
        })
    }
}

#[cfg(feature = "text")]
impl TextBody for ApplicationCharacterString {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        let value = if is_xml_text(&self.value) {
            ("value", self.value.clone())
        } else {
            ("valueHex", hex::encode(self.value.as_bytes()))
        };
        vec![("encoding", (self.encoding as u8).to_string()), value]
    }

    fn from_fields(fields: &Fields, options: &TextOptions) -> Result<Self, TextError> {
        let raw: u8 = fields.parse("encoding", options)?;
        let encoding = CharacterSet::from_u8(raw).map_err(|_| TextError::InvalidElement {
            name: "encoding".to_string(),
            value: raw.to_string(),
        })?;
        let value = match fields.get("valueHex") {
            Some(raw) => hex::decode(raw.trim())
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .ok_or_else(|| TextError::InvalidElement {
                    name: "valueHex".to_string(),
                    value: raw.to_string(),
                })?,
            None => fields.text("value", options)?,
        };
        Self::with_encoding(encoding, value.clone())
            .map_err(|_| TextError::InvalidElement { name: "value".to_string(), value })
    }
}

#[cfg(feature = "text")]
impl TextBody for ApplicationBitString {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("unusedBits", self.unused_bits.to_string()),
            ("data", hex::encode(&self.data)),
        ]
    }

    fn from_fields(fields: &Fields, options: &TextOptions) -> Result<Self, TextError> {
        let unused_bits: u8 = fields.parse("unusedBits", options)?;
        let data = fields.hex("data", options)?;
        Self::new(unused_bits, data).map_err(|_| TextError::InvalidElement {
            name: "unusedBits".to_string(),
            value: unused_bits.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ApplicationBitString, ApplicationCharacterString, ApplicationOctetString, CharacterSet,
    };
    use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
    use crate::variants::TagBody;
    use crate::{DecodeError, EncodeError};

    fn roundtrip<T: TagBody + core::fmt::Debug + PartialEq>(body: &T) -> T {
        let mut buf = [0u8; 64];
        let mut w = WriteBuffer::new(&mut buf);
        body.write_body(&mut w).unwrap();
        assert_eq!(w.position() as u32, body.length_in_bytes());
        let len = body.length_in_bytes();
        let mut r = ReadBuffer::new(w.as_written());
        T::parse_body(&mut r, 5, Some(crate::tag::ExtendedLength::for_length(len))).unwrap()
    }

    #[test]
    fn octet_string_roundtrip() {
        let v = ApplicationOctetString::new([1u8, 2, 3, 4, 5, 6]);
        assert_eq!(roundtrip(&v), v);
    }

    #[test]
    fn character_sets_roundtrip() {
        for (set, text) in [
            (CharacterSet::Utf8, "héllo"),
            (CharacterSet::Ucs2, "héllo"),
            (CharacterSet::Ucs4, "h\u{1F600}"),
            (CharacterSet::Iso8859_1, "héllo"),
        ] {
            let v = ApplicationCharacterString::with_encoding(set, text).unwrap();
            assert_eq!(roundtrip(&v), v);
        }
    }

    #[test]
    fn latin1_rejects_wide_chars() {
        assert_eq!(
            ApplicationCharacterString::with_encoding(CharacterSet::Iso8859_1, "\u{0100}")
                .unwrap_err(),
            EncodeError::ValueOutOfRange
        );
    }

    #[test]
    fn dbcs_is_unsupported() {
        let mut r = ReadBuffer::new(&[0x01, b'a']);
        let err = ApplicationCharacterString::parse_body(&mut r, 2, None).unwrap_err();
        assert_eq!(err.field, "encoding");
        assert_eq!(err.cause, DecodeError::Unsupported);
    }

    #[test]
    fn unassigned_character_set_is_invalid() {
        assert_eq!(CharacterSet::from_u8(6), Err(DecodeError::InvalidValue));
        let mut r = ReadBuffer::new(&[0x06, b'a']);
        let err = ApplicationCharacterString::parse_body(&mut r, 2, None).unwrap_err();
        assert_eq!(err.field, "encoding");
        assert_eq!(err.cause, DecodeError::InvalidValue);
    }

    #[test]
    fn bit_string_bits() {
        let v = ApplicationBitString::from_bits(&[true, false, true]);
        assert_eq!(v.unused_bits(), 5);
        assert_eq!(v.data(), &[0b1010_0000]);
        assert_eq!(v.len(), 3);
        assert_eq!(v.bit(2), Some(true));
        assert_eq!(v.bit(3), None);
        assert_eq!(roundtrip(&v), v);
    }

    #[test]
    fn bit_string_rejects_bad_unused_count() {
        let mut r = ReadBuffer::new(&[0x08, 0xFF]);
        let err = ApplicationBitString::parse_body(&mut r, 2, None).unwrap_err();
        assert_eq!(err.field, "unused_bits");
        assert_eq!(err.cause, DecodeError::InvalidValue);
    }
}
