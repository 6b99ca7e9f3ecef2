use crate::encoding::{reader::ReadBuffer, writer::WriteBuffer};
use crate::error::FieldContext;
use crate::tag::{ExtendedLength, TagKind};
use crate::variants::{expect_length, Payload, TagBody};
use crate::{ParseError, SerializeError};

#[cfg(feature = "text")]
use crate::text::{Fields, TextBody, TextError, TextOptions};
#[cfg(feature = "text")]
use alloc::{string::String, string::ToString, vec, vec::Vec};

/// Octet value meaning "any" in every date and time field.
pub const UNSPECIFIED: u8 = 0xFF;

/// Application tag 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplicationDate {
    pub year_since_1900: u8,
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
}

impl TagBody for ApplicationDate {
    const KIND: TagKind = TagKind::Date;

    fn length_in_bits(&self) -> u32 {
        32
    }

    fn parse_body(
        r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        expect_length(length_value_type, extended_length, 4)?;
        Ok(Self {
            year_since_1900: r.read_u8(8).field("year_since_1900")?,
            month: r.read_u8(8).field("month")?,
            day: r.read_u8(8).field("day")?,
            weekday: r.read_u8(8).field("weekday")?,
        })
    }

    fn write_body(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        w.write_u8(8, self.year_since_1900)
            .field("year_since_1900")?;
        w.write_u8(8, self.month).field("month")?;
        w.write_u8(8, self.day).field("day")?;
        w.write_u8(8, self.weekday).field("weekday")
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Date(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Date(self)
    }
}

/// Application tag 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplicationTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub hundredths: u8,
}

impl TagBody for ApplicationTime {
    const KIND: TagKind = TagKind::Time;

    fn length_in_bits(&self) -> u32 {
        32
    }

    fn parse_body(
        r: &mut ReadBuffer<'_>,
        length_value_type: u8,
        extended_length: Option<ExtendedLength>,
    ) -> Result<Self, ParseError> {
        expect_length(length_value_type, extended_length, 4)?;
        Ok(Self {
            hour: r.read_u8(8).field("hour")?,
            minute: r.read_u8(8).field("minute")?,
            second: r.read_u8(8).field("second")?,
            hundredths: r.read_u8(8).field("hundredths")?,
        })
    }

    fn write_body(&self, w: &mut WriteBuffer<'_>) -> Result<(), SerializeError> {
        w.write_u8(8, self.hour).field("hour")?;
        w.write_u8(8, self.minute).field("minute")?;
        w.write_u8(8, self.second).field("second")?;
        w.write_u8(8, self.hundredths).field("hundredths")
    }

    fn narrow(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Time(v) => Some(v),
            _ => None,
        }
    }

    fn into_payload(self) -> Payload {
        Payload::Time(self)
    }
}

#[cfg(feature = "text")]
impl TextBody for ApplicationDate {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("yearSince1900", self.year_since_1900.to_string()),
            ("month", self.month.to_string()),
            ("day", self.day.to_string()),
            ("weekday", self.weekday.to_string()),
        ]
    }

    fn from_fields(fields: &Fields, options: &TextOptions) -> Result<Self, TextError> {
        Ok(Self {
            year_since_1900: fields.parse("yearSince1900", options)?,
            month: fields.parse("month", options)?,
            day: fields.parse("day", options)?,
            weekday: fields.parse("weekday", options)?,
        })
    }
}

#[cfg(feature = "text")]
impl TextBody for ApplicationTime {
    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("hour", self.hour.to_string()),
            ("minute", self.minute.to_string()),
            ("second", self.second.to_string()),
            ("hundredths", self.hundredths.to_string()),
        ]
    }

    fn from_fields(fields: &Fields, options: &TextOptions) -> Result<Self, TextError> {
        Ok(Self {
            hour: fields.parse("hour", options)?,
            minute: fields.parse("minute", options)?,
            second: fields.parse("second", options)?,
            hundredths: fields.parse("hundredths", options)?,
        })
    }
}
