use bactag_core::encoding::reader::ReadBuffer;
use bactag_core::encoding::writer::WriteBuffer;
use bactag_core::tag::{ExtendedLength, TagClass, TagHeader};
use bactag_core::variants::{
    ApplicationBitString, ApplicationBoolean, ApplicationCharacterString, ApplicationDouble,
    ApplicationEnumerated, ApplicationNull, ApplicationObjectId, ApplicationOctetString,
    ApplicationReal, ApplicationSigned, ApplicationUnsigned, CharacterSet, ClosingTag,
    ContextData, OpeningTag,
};
use bactag_core::{DecodeError, EncodeError, Envelope, TagBody, TagKind};

fn encode(env: &Envelope) -> Vec<u8> {
    let mut buf = [0u8; 64];
    let mut w = WriteBuffer::new(&mut buf);
    env.serialize(&mut w).unwrap();
    w.as_written().to_vec()
}

fn decode_one(bytes: &[u8]) -> Envelope {
    let mut r = ReadBuffer::new(bytes);
    let env = Envelope::parse(&mut r).unwrap();
    assert!(r.is_empty(), "trailing bytes after {}", env.type_name());
    env
}

#[test]
fn application_real_frame_matches_fixture() {
    let env = Envelope::application_real(3.14);
    assert_eq!(encode(&env), [0x44, 0x40, 0x48, 0xF5, 0xC3]);
    assert_eq!(env.length_in_bytes(), 5);

    let decoded = decode_one(&[0x44, 0x40, 0x48, 0xF5, 0xC3]);
    assert_eq!(decoded.kind(), TagKind::Real);
    assert_eq!(decoded.payload_as::<ApplicationReal>().unwrap().value, 3.14);
}

#[test]
fn application_real_with_padded_length_keeps_header() {
    let bytes = [0x45, 0x04, 0x42, 0xC8, 0x00, 0x00];
    let env = decode_one(&bytes);
    assert_eq!(env.header().length_value_type(), 5);
    assert_eq!(env.header().extended_length(), Some(ExtendedLength::U8(4)));
    assert_eq!(env.payload_as::<ApplicationReal>().unwrap().value, 100.0);
    assert_eq!(encode(&env), bytes);
}

#[test]
fn application_real_rejects_wrong_declared_length() {
    let mut r = ReadBuffer::new(&[0x43, 0x40, 0x48, 0xF5]);
    let err = Envelope::parse(&mut r).unwrap_err();
    assert_eq!(err.cause, DecodeError::InvalidLength);
}

#[test]
fn primitive_frames_match_fixtures() {
    let cases: Vec<(Envelope, Vec<u8>)> = vec![
        (Envelope::from_body(ApplicationNull).unwrap(), vec![0x00]),
        (
            Envelope::from_body(ApplicationBoolean::new(false)).unwrap(),
            vec![0x10],
        ),
        (
            Envelope::from_body(ApplicationUnsigned::new(300)).unwrap(),
            vec![0x22, 0x01, 0x2C],
        ),
        (
            Envelope::from_body(ApplicationSigned::new(-2)).unwrap(),
            vec![0x31, 0xFE],
        ),
        (
            Envelope::from_body(ApplicationEnumerated::new(85)).unwrap(),
            vec![0x91, 0x55],
        ),
        (
            Envelope::from_body(ApplicationDouble::new(1.0)).unwrap(),
            vec![0x55, 0x08, 0x3F, 0xF0, 0, 0, 0, 0, 0, 0],
        ),
        (
            Envelope::from_body(ApplicationObjectId::new(8, 1).unwrap()).unwrap(),
            vec![0xC4, 0x02, 0x00, 0x00, 0x01],
        ),
    ];
    for (env, bytes) in cases {
        assert_eq!(encode(&env), bytes, "{}", env.type_name());
        assert_eq!(decode_one(&bytes), env);
    }
}

#[test]
fn string_frames_match_fixtures() {
    let octets = Envelope::from_body(ApplicationOctetString::new([1u8, 2, 3])).unwrap();
    assert_eq!(encode(&octets), [0x63, 0x01, 0x02, 0x03]);

    let text = Envelope::from_body(ApplicationCharacterString::new("hello")).unwrap();
    assert_eq!(
        encode(&text),
        [0x75, 0x06, 0x00, 0x68, 0x65, 0x6C, 0x6C, 0x6F]
    );

    let ucs2 = ApplicationCharacterString::with_encoding(CharacterSet::Ucs2, "hi").unwrap();
    let env = Envelope::from_body(ucs2).unwrap();
    assert_eq!(encode(&env), [0x75, 0x05, 0x04, 0x00, 0x68, 0x00, 0x69]);
    assert_eq!(decode_one(&encode(&env)), env);

    let bits = Envelope::from_body(ApplicationBitString::from_bits(&[true, false, true])).unwrap();
    assert_eq!(encode(&bits), [0x82, 0x05, 0xA0]);
}

#[test]
fn context_frames_match_fixtures() {
    let open = Envelope::context(3, OpeningTag.into_payload()).unwrap();
    let close = Envelope::context(3, ClosingTag.into_payload()).unwrap();
    assert_eq!(encode(&open), [0x3E]);
    assert_eq!(encode(&close), [0x3F]);

    let data = Envelope::context(42, ContextData::new([0xBE, 0xEF]).into_payload()).unwrap();
    assert_eq!(encode(&data), [0xFA, 0x2A, 0xBE, 0xEF]);
    assert_eq!(data.header().tag_number(), 42);
    assert_eq!(data.payload_as::<ContextData>().unwrap().data, [0xBE, 0xEF]);
}

#[test]
fn header_fields_survive_explicit_construction() {
    let header = TagHeader::new(TagClass::Context, 15, 5, Some(200), Some(ExtendedLength::U16(2)))
        .unwrap();
    let env = Envelope::new(header, ContextData::new([9, 9]).into_payload()).unwrap();
    let bytes = encode(&env);
    assert_eq!(bytes, [0xFD, 200, 254, 0x00, 0x02, 9, 9]);
    assert_eq!(decode_one(&bytes), env);
}

#[test]
fn undersized_buffer_fails_with_field_name() {
    let env = Envelope::from_body(ApplicationOctetString::new([0u8; 8])).unwrap();
    let mut buf = [0u8; 4];
    let mut w = WriteBuffer::new(&mut buf);
    let err = env.serialize(&mut w).unwrap_err();
    assert_eq!(err.cause, EncodeError::BufferTooSmall);
}

#[test]
fn concatenated_stream_decodes_in_order() {
    let bytes = [0x3E, 0x44, 0x42, 0xC8, 0x00, 0x00, 0x3F];
    let kinds: Vec<TagKind> = Envelope::parse_all(&bytes)
        .unwrap()
        .iter()
        .map(Envelope::kind)
        .collect();
    assert_eq!(kinds, [TagKind::Opening, TagKind::Real, TagKind::Closing]);
}
