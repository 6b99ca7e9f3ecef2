use bactag_core::text::{self, TextError, TextOptions};
use bactag_core::{Envelope, ParseError, SerializeError};
use clap::ValueEnum;
use thiserror::Error;

/// How decoded envelopes are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Debug,
    Xml,
    Json,
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("decode error: {0}")]
    Parse(#[from] ParseError),
    #[error("encode error: {0}")]
    Serialize(#[from] SerializeError),
    #[error("text error: {0}")]
    Text(#[from] TextError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses hex bytes, ignoring whitespace and `#` comments to end of line.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, ToolError> {
    let digits: String = input
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(str::chars)
        .filter(|c| !c.is_whitespace())
        .collect();
    Ok(hex::decode(digits)?)
}

pub fn decode(bytes: &[u8]) -> Result<Vec<Envelope>, ToolError> {
    Ok(Envelope::parse_all(bytes)?)
}

pub fn render(envelopes: &[Envelope], format: OutputFormat) -> Result<String, ToolError> {
    match format {
        OutputFormat::Debug => Ok(envelopes
            .iter()
            .map(|env| format!("{env:#?}"))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Xml => Ok(envelopes
            .iter()
            .map(text::to_xml)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(envelopes)?),
    }
}

/// Encodes one XML envelope document to lowercase hex.
pub fn encode_xml(xml: &str, options: &TextOptions) -> Result<String, ToolError> {
    let envelope = text::from_xml_with(xml, options)?;
    log::debug!(
        "encoding {} ({} bytes)",
        envelope.type_name(),
        envelope.length_in_bytes()
    );
    Ok(hex::encode(envelope.to_vec()?))
}

#[cfg(test)]
mod tests {
    use super::{decode, encode_xml, parse_hex, render, OutputFormat, ToolError};
    use bactag_core::text::{TextError, TextOptions};

    #[test]
    fn parse_hex_skips_comments_and_whitespace() {
        let input = "# real 3.14\n44 40 48\nF5 C3 # trailing\n";
        assert_eq!(parse_hex(input).unwrap(), [0x44, 0x40, 0x48, 0xF5, 0xC3]);
    }

    #[test]
    fn parse_hex_rejects_odd_digits() {
        assert!(matches!(parse_hex("44 4"), Err(ToolError::Hex(_))));
    }

    #[test]
    fn render_formats() {
        let envelopes = decode(&[0x44, 0x40, 0x48, 0xF5, 0xC3]).unwrap();
        let xml = render(&envelopes, OutputFormat::Xml).unwrap();
        assert!(xml.contains("<value>3.14</value>"), "{xml}");
        let json = render(&envelopes, OutputFormat::Json).unwrap();
        assert!(json.contains("3.14"), "{json}");
        let debug = render(&envelopes, OutputFormat::Debug).unwrap();
        assert!(debug.contains("ApplicationReal"), "{debug}");
    }

    #[test]
    fn encode_xml_to_hex() {
        let xml = "<ApplicationReal><value>3.14</value></ApplicationReal>";
        assert_eq!(
            encode_xml(xml, &TextOptions::default()).unwrap(),
            "444048f5c3"
        );
    }

    #[test]
    fn encode_xml_reports_missing_value() {
        let err = encode_xml("<ApplicationReal/>", &TextOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ToolError::Text(TextError::MissingElement("value"))
        ));
        assert_eq!(
            encode_xml("<ApplicationReal/>", &TextOptions::lenient()).unwrap(),
            "4400000000"
        );
    }

    #[test]
    fn truncated_input_is_a_decode_error() {
        assert!(matches!(decode(&[0x44, 0x40]), Err(ToolError::Parse(_))));
    }
}
