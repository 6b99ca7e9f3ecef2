use core::fmt;

/// Failure of a single primitive write into the output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    BufferTooSmall,
    ValueOutOfRange,
    InvalidLength,
    InvalidTag,
    Unaligned,
    Unsupported,
    Message(&'static str),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => f.write_str("buffer too small"),
            Self::ValueOutOfRange => f.write_str("value out of range"),
            Self::InvalidLength => f.write_str("invalid length"),
            Self::InvalidTag => f.write_str("invalid tag"),
            Self::Unaligned => f.write_str("write is not byte aligned"),
            Self::Unsupported => f.write_str("operation unsupported"),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// Failure of a single primitive read from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    UnexpectedEof,
    InvalidTag,
    InvalidLength,
    InvalidValue,
    Unaligned,
    Unsupported,
    Message(&'static str),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => f.write_str("unexpected end of input"),
            Self::InvalidTag => f.write_str("invalid tag"),
            Self::InvalidLength => f.write_str("invalid length"),
            Self::InvalidValue => f.write_str("invalid value"),
            Self::Unaligned => f.write_str("read is not byte aligned"),
            Self::Unsupported => f.write_str("operation unsupported"),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// A decode failure tagged with the name of the field being read.
///
/// Any field failure invalidates the whole envelope; no partially decoded
/// value is ever returned alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub field: &'static str,
    pub cause: DecodeError,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error parsing '{}' field: {}", self.field, self.cause)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// An encode failure tagged with the name of the field being written.
///
/// The output buffer is left in an indeterminate state once this is
/// returned; header bytes already written are not rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeError {
    pub field: &'static str,
    pub cause: EncodeError,
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error serializing '{}' field: {}", self.field, self.cause)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SerializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Attaches a field name to a primitive read or write result.
pub trait FieldContext<T> {
    type Output;

    fn field(self, name: &'static str) -> Result<T, Self::Output>;
}

impl<T> FieldContext<T> for Result<T, DecodeError> {
    type Output = ParseError;

    fn field(self, name: &'static str) -> Result<T, ParseError> {
        self.map_err(|cause| ParseError { field: name, cause })
    }
}

impl<T> FieldContext<T> for Result<T, EncodeError> {
    type Output = SerializeError;

    fn field(self, name: &'static str) -> Result<T, SerializeError> {
        self.map_err(|cause| SerializeError { field: name, cause })
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeError, EncodeError, FieldContext, ParseError, SerializeError};
    use alloc::string::ToString;

    #[test]
    fn parse_error_names_field_and_cause() {
        let err = Err::<(), _>(DecodeError::UnexpectedEof)
            .field("value")
            .unwrap_err();
        assert_eq!(
            err,
            ParseError {
                field: "value",
                cause: DecodeError::UnexpectedEof
            }
        );
        assert_eq!(
            err.to_string(),
            "error parsing 'value' field: unexpected end of input"
        );
    }

    #[test]
    fn serialize_error_names_field_and_cause() {
        let err = Err::<(), _>(EncodeError::BufferTooSmall)
            .field("value")
            .unwrap_err();
        assert_eq!(
            err,
            SerializeError {
                field: "value",
                cause: EncodeError::BufferTooSmall
            }
        );
        assert_eq!(
            err.to_string(),
            "error serializing 'value' field: buffer too small"
        );
    }
}
