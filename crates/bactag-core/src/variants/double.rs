use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
use crate::error::FieldContext;
use crate::tag::{ExtendedLength, TagKind};
use crate::variants::{expect_length, Payload, TagBody};
use crate::{ParseError, SerializeError};

#[cfg(feature = "text")]
use crate::text::{format_f64, Fields, TextBody, TextError, TextOptions};
#[cfg(feature = "text")]
use alloc::{string::String, vec, vec::Vec};

/// IEEE-754 binary64 value under application tag 5.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplicationDouble {
    pub value: f64,
}

impl ApplicationDouble {
    pub const fn new(value: f64) -> Self {
        Self { value }
    }
}

impl TagBody for ApplicationDouble {
    const KIND: TagKind = TagKind::Double;

    fn length_in_bits(&self) -> u32 {
        64
    }

    fn parse_body(
        r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        expect_length(length_value_type, extended_length, 8)?;
        let value = r.read_f64(true, 11, 52).field("value")?;
        Ok(Self { value })
    }

    fn write_body(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        w.write_f64(64, self.value).field("value")
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Double(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Double(self)
    }
}

#[cfg(feature = "text")]
impl TextBody for ApplicationDouble {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![("value", format_f64(self.value))]
    }

    fn from_fields(fields: &Fields, options: &TextOptions) -> Result<Self, TextError> {
        Ok(Self {
            value: fields.parse("value", options)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ApplicationDouble;
    use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
    use crate::variants::TagBody;

    #[test]
    fn double_roundtrip_keeps_nan_payload() {
        let bits = 0x7FF8_0000_DEAD_BEEFu64;
        let mut buf = [0u8; 8];
        let mut w = WriteBuffer::new(&mut buf);
        ApplicationDouble::new(f64::from_bits(bits))
            .write_body(&mut w)
            .unwrap();
        let mut r = ReadBuffer::new(w.as_written());
        let got = ApplicationDouble::parse_body(&mut r, 5, Some(crate::tag::ExtendedLength::U8(8)))
            .unwrap();
        assert_eq!(got.value.to_bits(), bits);
        assert_eq!(got.length_in_bytes(), 8);
    }
}
