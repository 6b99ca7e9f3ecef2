use crate::tag::header::{AppTag, TagClass, TagHeader};
use crate::DecodeError;

/// Every payload variant the dispatcher can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagKind {
    Null,
    Boolean,
    Unsigned,
    Signed,
    Real,
    Double,
    OctetString,
    CharacterString,
    BitString,
    Enumerated,
    Date,
    Time,
    ObjectId,
    Context,
    Opening,
    Closing,
}

impl TagKind {
    pub const ALL: [TagKind; 16] = [
        Self::Null,
        Self::Boolean,
        Self::Unsigned,
        Self::Signed,
        Self::Real,
        Self::Double,
        Self::OctetString,
        Self::CharacterString,
        Self::BitString,
        Self::Enumerated,
        Self::Date,
        Self::Time,
        Self::ObjectId,
        Self::Context,
        Self::Opening,
        Self::Closing,
    ];

    /// Picks the variant for a decoded header.
    ///
    /// Context headers select on the length/value/type (6 and 7 delimit
    /// constructed data); application headers select on the tag number.
    pub fn select(header: &TagHeader) -> Result<Self, DecodeError> {
        match header.class() {
            TagClass::Context if header.is_opening() => Ok(Self::Opening),
            TagClass::Context if header.is_closing() => Ok(Self::Closing),
            TagClass::Context => Ok(Self::Context),
            TagClass::Application => {
                if header.extended_tag_number().is_some() {
                    return Err(DecodeError::InvalidTag);
                }
                Ok(Self::from_app_tag(AppTag::from_u8(header.tag_number())?))
            }
        }
    }

    pub const fn from_app_tag(tag: AppTag) -> Self {
        match tag {
            AppTag::Null => Self::Null,
            AppTag::Boolean => Self::Boolean,
            AppTag::UnsignedInt => Self::Unsigned,
            AppTag::SignedInt => Self::Signed,
            AppTag::Real => Self::Real,
            AppTag::Double => Self::Double,
            AppTag::OctetString => Self::OctetString,
            AppTag::CharacterString => Self::CharacterString,
            AppTag::BitString => Self::BitString,
            AppTag::Enumerated => Self::Enumerated,
            AppTag::Date => Self::Date,
            AppTag::Time => Self::Time,
            AppTag::ObjectId => Self::ObjectId,
        }
    }

    /// Application tag number, `None` for context-class kinds.
    pub const fn app_tag(self) -> Option<AppTag> {
        match self {
            Self::Null => Some(AppTag::Null),
            Self::Boolean => Some(AppTag::Boolean),
            Self::Unsigned => Some(AppTag::UnsignedInt),
            Self::Signed => Some(AppTag::SignedInt),
            Self::Real => Some(AppTag::Real),
            Self::Double => Some(AppTag::Double),
            Self::OctetString => Some(AppTag::OctetString),
            Self::CharacterString => Some(AppTag::CharacterString),
            Self::BitString => Some(AppTag::BitString),
            Self::Enumerated => Some(AppTag::Enumerated),
            Self::Date => Some(AppTag::Date),
            Self::Time => Some(AppTag::Time),
            Self::ObjectId => Some(AppTag::ObjectId),
            Self::Context | Self::Opening | Self::Closing => None,
        }
    }

    pub const fn class(self) -> TagClass {
        match self.app_tag() {
            Some(_) => TagClass::Application,
            None => TagClass::Context,
        }
    }

    /// Discriminator bit value: 0 for application kinds, 1 for context.
    pub const fn context_specific_tag(self) -> u8 {
        self.class().to_bit() as u8
    }

    /// Stable name used in diagnostics and as the textual element name.
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Null => "ApplicationNull",
            Self::Boolean => "ApplicationBoolean",
            Self::Unsigned => "ApplicationUnsigned",
            Self::Signed => "ApplicationSigned",
            Self::Real => "ApplicationReal",
            Self::Double => "ApplicationDouble",
            Self::OctetString => "ApplicationOctetString",
            Self::CharacterString => "ApplicationCharacterString",
            Self::BitString => "ApplicationBitString",
            Self::Enumerated => "ApplicationEnumerated",
            Self::Date => "ApplicationDate",
            Self::Time => "ApplicationTime",
            Self::ObjectId => "ApplicationObjectId",
            Self::Context => "ContextData",
            Self::Opening => "OpeningTag",
            Self::Closing => "ClosingTag",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::TagKind;
    use crate::tag::header::{AppTag, ExtendedLength, TagClass, TagHeader};
    use crate::DecodeError;

    #[test]
    fn selects_application_kinds_by_tag_number() {
        for kind in TagKind::ALL {
            let Some(tag) = kind.app_tag() else { continue };
            let header = TagHeader::for_length(TagClass::Application, tag as u8, 4);
            assert_eq!(TagKind::select(&header).unwrap(), kind);
            assert_eq!(kind.context_specific_tag(), 0);
        }
    }

    #[test]
    fn selects_context_kinds_by_length_value_type() {
        assert_eq!(
            TagKind::select(&TagHeader::for_length(TagClass::Context, 2, 3)).unwrap(),
            TagKind::Context
        );
        assert_eq!(
            TagKind::select(&TagHeader::opening(2)).unwrap(),
            TagKind::Opening
        );
        assert_eq!(
            TagKind::select(&TagHeader::closing(40)).unwrap(),
            TagKind::Closing
        );
        assert_eq!(TagKind::Context.context_specific_tag(), 1);
    }

    #[test]
    fn reserved_application_tags_are_rejected() {
        let header = TagHeader::for_length(TagClass::Application, 13, 1);
        assert_eq!(TagKind::select(&header).unwrap_err(), DecodeError::InvalidTag);
        let extended = TagHeader::new(
            TagClass::Application,
            15,
            5,
            Some(AppTag::Real as u8),
            Some(ExtendedLength::U8(4)),
        )
        .unwrap();
        assert_eq!(
            TagKind::select(&extended).unwrap_err(),
            DecodeError::InvalidTag
        );
    }

    #[test]
    fn type_names_are_unique_and_resolvable() {
        for kind in TagKind::ALL {
            assert_eq!(TagKind::from_type_name(kind.type_name()), Some(kind));
        }
        assert_eq!(TagKind::from_type_name("Nope"), None);
    }
}
