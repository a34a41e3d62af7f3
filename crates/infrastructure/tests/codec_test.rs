use triedns_domain::{
    DnsMessage, DnsName, HeaderFlags, Question, RecordType, ResourceRecord, ResponseCode,
    WireError,
};
use triedns_infrastructure::dns::codec::{
    build_answer_response, decode_header, decode_message, decode_name, encode_message,
    encode_name, encode_response, rdata_from_text, rdata_to_text,
};

fn name(text: &str) -> DnsName {
    text.parse().unwrap()
}

/// example.com A answer whose owner is a pointer back to the question name.
fn compressed_answer() -> Vec<u8> {
    let mut bytes = vec![
        0x12, 0x34, 0x81, 0x80, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    ];
    bytes.extend_from_slice(b"\x07example\x03com\x00");
    bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    bytes.extend_from_slice(&[0xC0, 0x0C]);
    bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    bytes.extend_from_slice(&300u32.to_be_bytes());
    bytes.extend_from_slice(&[0x00, 0x04, 93, 184, 216, 34]);
    bytes
}

#[test]
fn test_message_round_trip() {
    let mut message = DnsMessage::query(0xBEEF, name("www.example.com"), RecordType::MX, true);
    message.flags.response = true;
    message.flags.rcode = ResponseCode::NoError;
    message.answers.push(ResourceRecord::new(
        name("www.example.com"),
        RecordType::MX,
        3600,
        rdata_from_text(RecordType::MX, "10 mail.example.com").unwrap(),
    ));
    message.authorities.push(ResourceRecord::new(
        name("example.com"),
        RecordType::NS,
        86400,
        encode_name(&name("ns1.example.com")),
    ));
    message.set_edns(1500);

    let bytes = encode_message(&message, 4096).unwrap();
    let decoded = decode_message(&bytes).unwrap();

    assert_eq!(decoded, message);
    assert_eq!(decoded.edns_payload_size(), Some(1500));
}

#[test]
fn test_compressed_and_plain_encodings_decode_alike() {
    let compressed = compressed_answer();
    let decoded = decode_message(&compressed).unwrap();

    assert_eq!(decoded.answers[0].name, name("example.com"));
    assert_eq!(
        rdata_to_text(RecordType::A, &decoded.answers[0].rdata).unwrap(),
        "93.184.216.34"
    );

    let plain = encode_message(&decoded, 512).unwrap();
    assert!(plain.len() > compressed.len());
    assert_eq!(decode_message(&plain).unwrap(), decoded);
}

#[test]
fn test_pointer_consumes_two_bytes() {
    let bytes = compressed_answer();
    let answer_offset = 12 + 13 + 4;
    let (owner, consumed) = decode_name(&bytes, answer_offset).unwrap();

    assert_eq!(owner, name("example.com"));
    assert_eq!(consumed, 2);
}

#[test]
fn test_forward_pointer_is_rejected() {
    let mut bytes = vec![0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    bytes.extend_from_slice(&[0xC0, 0x20, 0x00, 0x01, 0x00, 0x01]);
    bytes.resize(40, 0);

    assert!(matches!(
        decode_message(&bytes),
        Err(WireError::MalformedCompression { offset: 12, target: 32 })
    ));
}

#[test]
fn test_pointer_chain_must_keep_descending() {
    // 20 -> 10 ("a"), then 12 -> 11: below its own offset but not below 10
    let mut bytes = vec![0u8; 22];
    bytes[10..14].copy_from_slice(&[0x01, b'a', 0xC0, 0x0B]);
    bytes[20..22].copy_from_slice(&[0xC0, 0x0A]);

    assert_eq!(
        decode_name(&bytes, 20),
        Err(WireError::MalformedCompression {
            offset: 12,
            target: 11
        })
    );
}

#[test]
fn test_labels_with_arbitrary_octets_decode() {
    let mut bytes = b"\x0amy printer\x05local\x00".to_vec();
    bytes.extend_from_slice(b"\x03a\xffb\xc0\x00");

    let (printer, used) = decode_name(&bytes, 0).unwrap();
    assert_eq!(used, 18);
    assert_eq!(printer.to_string(), "my\\032printer.local");
    assert_eq!(encode_name(&printer), bytes[..18].to_vec());

    let (binary, used) = decode_name(&bytes, 18).unwrap();
    assert_eq!(used, 6);
    assert_eq!(binary.to_string(), "a\\255b.my\\032printer.local");
}

#[test]
fn test_overlong_name_is_rejected() {
    let mut bytes = Vec::new();
    for _ in 0..5 {
        bytes.push(63);
        bytes.extend_from_slice(&[b'x'; 63]);
    }
    bytes.push(0);

    assert_eq!(decode_name(&bytes, 0), Err(WireError::NameTooLong));
}

#[test]
fn test_short_input_is_truncated_error() {
    assert!(matches!(
        decode_header(&[0u8; 11]),
        Err(WireError::TruncatedInput { .. })
    ));

    let mut bytes = compressed_answer();
    bytes.truncate(bytes.len() - 2);
    assert!(matches!(
        decode_message(&bytes),
        Err(WireError::TruncatedInput { .. })
    ));
}

#[test]
fn test_encode_respects_limit() {
    let query = DnsMessage::query(1, name("example.com"), RecordType::TXT, true);
    let answers = (0..4)
        .map(|_| {
            ResourceRecord::new(
                name("example.com"),
                RecordType::TXT,
                60,
                rdata_from_text(RecordType::TXT, &"x".repeat(200)).unwrap(),
            )
        })
        .collect();
    let response = build_answer_response(&query, answers);

    assert!(matches!(
        encode_message(&response, 512),
        Err(WireError::BufferTooSmall { limit: 512, .. })
    ));

    let bytes = encode_response(&response, 512).unwrap();
    assert!(bytes.len() <= 512);
    let decoded = decode_message(&bytes).unwrap();
    assert!(decoded.flags.truncated);
    assert!(decoded.answers.is_empty());
    assert_eq!(decoded.questions, vec![Question::new(name("example.com"), RecordType::TXT)]);
}

#[test]
fn test_header_flags_survive_encoding() {
    let flags = HeaderFlags {
        response: true,
        opcode: 2,
        authoritative: true,
        truncated: false,
        recursion_desired: true,
        recursion_available: false,
        z: 0,
        rcode: ResponseCode::Refused,
    };
    assert_eq!(HeaderFlags::from_u16(flags.to_u16()), flags);
}
