//! XML mirror of envelopes and payloads, used for fixtures and diffable
//! test output.
//!
//! A payload is a flat sequence of leaf elements (`<value>3.14</value>`).
//! An envelope wraps that sequence in an element named after the variant's
//! type name. Header layout is not represented: decoding rebuilds the
//! canonical header, and context-class kinds carry a `tagNumber` element.
//! Unknown elements are ignored; a later element overrides an earlier one
//! of the same name.
//!
//! Carriage return, line feed and tab are written as character references so
//! that parsing does not normalise them. Text holding characters XML 1.0
//! cannot carry at all is written as hex instead (see `valueHex` on
//! character strings).

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use roxmltree::{Document, Node};

use crate::tag::{Envelope, TagClass, TagKind};
use crate::variants::{
    ApplicationBitString, ApplicationBoolean, ApplicationCharacterString, ApplicationDate,
    ApplicationDouble, ApplicationEnumerated, ApplicationNull, ApplicationObjectId,
    ApplicationOctetString, ApplicationReal, ApplicationSigned, ApplicationTime,
    ApplicationUnsigned, ClosingTag, ContextData, OpeningTag, Payload, TagBody,
};
use crate::EncodeError;

/// Wrapper element used to read a bare element sequence as one document.
const SEQUENCE_ROOT: &str = "fields";

/// What to do when the document ends before a required element was seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingField {
    /// Fail with [`TextError::MissingElement`].
    #[default]
    Reject,
    /// Use the zero value of the field.
    UseDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextOptions {
    pub missing_field: MissingField,
}

impl TextOptions {
    pub const fn lenient() -> Self {
        Self {
            missing_field: MissingField::UseDefault,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    Xml(String),
    MissingRoot,
    UnknownType(String),
    MissingElement(&'static str),
    InvalidElement { name: String, value: String },
    Encode(EncodeError),
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml(msg) => write!(f, "malformed xml: {msg}"),
            Self::MissingRoot => f.write_str("document has no root element"),
            Self::UnknownType(name) => write!(f, "unknown tag type '{name}'"),
            Self::MissingElement(name) => write!(f, "missing element '{name}'"),
            Self::InvalidElement { name, value } => {
                write!(f, "invalid value '{value}' for element '{name}'")
            }
            Self::Encode(err) => write!(f, "inconsistent tag: {err}"),
        }
    }
}

impl std::error::Error for TextError {}

impl From<roxmltree::Error> for TextError {
    fn from(err: roxmltree::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

/// Textual form of a payload variant.
pub trait TextBody: TagBody {
    fn to_fields(&self) -> Vec<(&'static str, String)>;

    fn from_fields(fields: &Fields, options: &TextOptions) -> Result<Self, TextError>;
}

/// Leaf elements collected from a document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(String, String)>,
}

impl Fields {
    /// Collects the top-level leaf elements of a bare element sequence.
    ///
    /// The input is a fragment, not a document: an XML declaration in front
    /// is skipped and a closing tag that would end the wrapper is rejected.
    pub fn read(xml: &str) -> Result<Self, TextError> {
        let xml = strip_declaration(xml);
        if xml.contains(&format!("</{SEQUENCE_ROOT}")) {
            return Err(TextError::Xml(format!(
                "unexpected closing tag '{SEQUENCE_ROOT}' in element sequence"
            )));
        }
        let wrapped = format!("<{SEQUENCE_ROOT}>{xml}</{SEQUENCE_ROOT}>");
        let doc = Document::parse(&wrapped)?;
        Ok(Self::collect(doc.root_element()))
    }

    /// Leaf children of `parent`. Elements with element children are skipped.
    fn collect(parent: Node<'_, '_>) -> Self {
        let mut fields = Self::default();
        for node in parent.children().filter(Node::is_element) {
            if node.children().any(|c| c.is_element()) {
                continue;
            }
            let value: String = node
                .children()
                .filter(Node::is_text)
                .filter_map(|c| c.text())
                .collect();
            fields.insert(node.tag_name().name(), value);
        }
        fields
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Text of the last element called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn missing(name: &'static str, options: &TextOptions) -> Result<(), TextError> {
        match options.missing_field {
            MissingField::Reject => Err(TextError::MissingElement(name)),
            MissingField::UseDefault => Ok(()),
        }
    }

    pub fn text(&self, name: &'static str, options: &TextOptions) -> Result<String, TextError> {
        match self.get(name) {
            Some(v) => Ok(v.to_string()),
            None => Self::missing(name, options).map(|()| String::new()),
        }
    }

    pub fn parse<T: FromStr + Default>(
        &self,
        name: &'static str,
        options: &TextOptions,
    ) -> Result<T, TextError> {
        match self.get(name) {
            Some(raw) => raw.trim().parse().map_err(|_| TextError::InvalidElement {
                name: name.to_string(),
                value: raw.to_string(),
            }),
            None => Self::missing(name, options).map(|()| T::default()),
        }
    }

    pub fn hex(&self, name: &'static str, options: &TextOptions) -> Result<Vec<u8>, TextError> {
        match self.get(name) {
            Some(raw) => hex::decode(raw.trim()).map_err(|_| TextError::InvalidElement {
                name: name.to_string(),
                value: raw.to_string(),
            }),
            None => Self::missing(name, options).map(|()| Vec::new()),
        }
    }
}

/// Shortest round-trip decimal; `NaN`, `INF` and `-INF` for special values.
pub fn format_f32(value: f32) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "INF" } else { "-INF" };
        text.to_string()
    } else {
        value.to_string()
    }
}

pub fn format_f64(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "INF" } else { "-INF" };
        text.to_string()
    } else {
        value.to_string()
    }
}

fn strip_declaration(xml: &str) -> &str {
    let trimmed = xml.trim_start();
    if trimmed.starts_with("<?xml") {
        if let Some(end) = trimmed.find("?>") {
            return &trimmed[end + 2..];
        }
    }
    xml
}

/// Whether XML 1.0 can carry `text`, escaped, as element content.
pub(crate) fn is_xml_text(text: &str) -> bool {
    text.chars().all(|c| {
        matches!(c,
            '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}')
    })
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_element(out: &mut String, indent: &str, name: &str, value: &str) {
    out.push_str(indent);
    out.push_str(&format!("<{name}>{}</{name}>", escape(value)));
}

fn payload_fields(payload: &Payload) -> Vec<(&'static str, String)> {
    match payload {
        Payload::Null(v) => v.to_fields(),
        Payload::Boolean(v) => v.to_fields(),
        Payload::Unsigned(v) => v.to_fields(),
        Payload::Signed(v) => v.to_fields(),
        Payload::Real(v) => v.to_fields(),
        Payload::Double(v) => v.to_fields(),
        Payload::OctetString(v) => v.to_fields(),
        Payload::CharacterString(v) => v.to_fields(),
        Payload::BitString(v) => v.to_fields(),
        Payload::Enumerated(v) => v.to_fields(),
        Payload::Date(v) => v.to_fields(),
        Payload::Time(v) => v.to_fields(),
        Payload::ObjectId(v) => v.to_fields(),
        Payload::Context(v) => v.to_fields(),
        Payload::Opening(v) => v.to_fields(),
        Payload::Closing(v) => v.to_fields(),
    }
}

fn payload_from_fields(
    kind: TagKind,
    fields: &Fields,
    options: &TextOptions,
) -> Result<Payload, TextError> {
    let f = fields;
    let o = options;
    Ok(match kind {
        TagKind::Null => ApplicationNull::from_fields(f, o)?.into_payload(),
        TagKind::Boolean => ApplicationBoolean::from_fields(f, o)?.into_payload(),
        TagKind::Unsigned => ApplicationUnsigned::from_fields(f, o)?.into_payload(),
        TagKind::Signed => ApplicationSigned::from_fields(f, o)?.into_payload(),
        TagKind::Real => ApplicationReal::from_fields(f, o)?.into_payload(),
        TagKind::Double => ApplicationDouble::from_fields(f, o)?.into_payload(),
        TagKind::OctetString => ApplicationOctetString::from_fields(f, o)?.into_payload(),
        TagKind::CharacterString => ApplicationCharacterString::from_fields(f, o)?.into_payload(),
        TagKind::BitString => ApplicationBitString::from_fields(f, o)?.into_payload(),
        TagKind::Enumerated => ApplicationEnumerated::from_fields(f, o)?.into_payload(),
        TagKind::Date => ApplicationDate::from_fields(f, o)?.into_payload(),
        TagKind::Time => ApplicationTime::from_fields(f, o)?.into_payload(),
        TagKind::ObjectId => ApplicationObjectId::from_fields(f, o)?.into_payload(),
        TagKind::Context => ContextData::from_fields(f, o)?.into_payload(),
        TagKind::Opening => OpeningTag.into_payload(),
        TagKind::Closing => ClosingTag.into_payload(),
    })
}

/// Writes a payload's own element sequence, without a wrapper.
pub fn body_to_xml<T: TextBody>(body: &T) -> String {
    let mut out = String::new();
    for (name, value) in body.to_fields() {
        push_element(&mut out, "", name, &value);
    }
    out
}

/// Reads a payload from a bare element sequence.
pub fn body_from_xml<T: TextBody>(xml: &str, options: &TextOptions) -> Result<T, TextError> {
    T::from_fields(&Fields::read(xml)?, options)
}

pub fn to_xml(envelope: &Envelope) -> String {
    let name = envelope.type_name();
    let mut out = format!("<{name}>\n");
    if envelope.kind().class() == TagClass::Context {
        let tag_number = envelope.header().tag_number().to_string();
        push_element(&mut out, "  ", "tagNumber", &tag_number);
        out.push('\n');
    }
    for (field, value) in payload_fields(envelope.payload()) {
        push_element(&mut out, "  ", field, &value);
        out.push('\n');
    }
    out.push_str(&format!("</{name}>"));
    out
}

pub fn from_xml(xml: &str) -> Result<Envelope, TextError> {
    from_xml_with(xml, &TextOptions::default())
}

/// Reads the root element of `xml` as an envelope.
pub fn from_xml_with(xml: &str, options: &TextOptions) -> Result<Envelope, TextError> {
    if xml.trim().is_empty() {
        return Err(TextError::MissingRoot);
    }
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    let name = root.tag_name().name();
    let kind =
        TagKind::from_type_name(name).ok_or_else(|| TextError::UnknownType(name.to_string()))?;
    let fields = Fields::collect(root);
    log::trace!("read {} with {} fields", kind.type_name(), fields.len());

    let payload = payload_from_fields(kind, &fields, options)?;
    let envelope = match kind.class() {
        TagClass::Application => Envelope::from_payload(payload),
        TagClass::Context => {
            let tag_number: u8 = fields.parse("tagNumber", options)?;
            Envelope::context(tag_number, payload)
        }
    };
    envelope.map_err(TextError::Encode)
}
