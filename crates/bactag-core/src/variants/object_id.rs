use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
use crate::error::FieldContext;
use crate::tag::{ExtendedLength, TagKind};
use crate::variants::{expect_length, Payload, TagBody};
use crate::{EncodeError, ParseError, SerializeError};

#[cfg(feature = "text")]
use crate::text::{Fields, TextBody, TextError, TextOptions};
#[cfg(feature = "text")]
use alloc::{string::String, string::ToString, vec, vec::Vec};

const TYPE_BITS: u8 = 10;
const INSTANCE_BITS: u8 = 22;

pub const MAX_OBJECT_TYPE: u16 = (1 << TYPE_BITS) - 1;
pub const MAX_INSTANCE: u32 = (1 << INSTANCE_BITS) - 1;

/// Application tag 12: a 10-bit object type and a 22-bit instance number
/// packed into one 32-bit word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ObjectIdFields"))]
pub struct ApplicationObjectId {
    object_type: u16,
    instance: u32,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ObjectIdFields {
    object_type: u16,
    instance: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<ObjectIdFields> for ApplicationObjectId {
    type Error = EncodeError;

    fn try_from(f: ObjectIdFields) -> Result<Self, Self::Error> {
        Self::new(f.object_type, f.instance)
    }
}

impl ApplicationObjectId {
    pub fn new(object_type: u16, instance: u32) -> Result<Self, EncodeError> {
        if object_type > MAX_OBJECT_TYPE || instance > MAX_INSTANCE {
            return Err(EncodeError::ValueOutOfRange);
        }
        Ok(Self {
            object_type,
            instance,
        })
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self {
            object_type: (raw >> INSTANCE_BITS) as u16,
            instance: raw & MAX_INSTANCE,
        }
    }

    pub const fn raw(&self) -> u32 {
        ((self.object_type as u32) << INSTANCE_BITS) | self.instance
    }

    pub const fn object_type(&self) -> u16 {
        self.object_type
    }

    pub const fn instance(&self) -> u32 {
        self.instance
    }
}

impl TagBody for ApplicationObjectId {
    const KIND: TagKind = TagKind::ObjectId;

    fn length_in_bits(&self) -> u32 {
        (TYPE_BITS + INSTANCE_BITS) as u32
    }

    fn parse_body(
        r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        expect_length(length_value_type, extended_length, 4)?;
        let object_type = r.read_u16(TYPE_BITS).field("object_type")?;
        let instance = r.read_u32(INSTANCE_BITS).field("instance")?;
        Ok(Self {
            object_type,
            instance,
        })
    }

    fn write_body(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        w.write_u16(TYPE_BITS, self.object_type)
            .field("object_type")?;
        w.write_u32(INSTANCE_BITS, self.instance).field("instance")
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::ObjectId(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::ObjectId(self)
    }
}

#[cfg(feature = "text")]
impl TextBody for ApplicationObjectId {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("objectType", self.object_type.to_string()),
            ("instance", self.instance.to_string()),
        ]
    }

    fn from_fields(fields: &Fields, options: &TextOptions) -> Result<Self, TextError> {
        let object_type: u16 = fields.parse("objectType", options)?;
        let instance: u32 = fields.parse("instance", options)?;
        Self::new(object_type, instance).map_err(|_| TextError::InvalidElement {
            name: "objectType".to_string(),
            value: object_type.to_string(),
        })
    }
}
