//! Builders for the messages the wire front sends back to clients.

use triedns_domain::{DnsMessage, HeaderFlags, ResourceRecord, ResponseCode, WireError};

use super::writer::encode_message;

/// Classic UDP payload limit without EDNS.
pub const BASE_UDP_PAYLOAD: usize = 512;

fn response_flags(query: &DnsMessage, rcode: ResponseCode) -> HeaderFlags {
    HeaderFlags {
        response: true,
        opcode: query.flags.opcode,
        authoritative: false,
        truncated: false,
        recursion_desired: query.flags.recursion_desired,
        recursion_available: true,
        z: 0,
        rcode,
    }
}

pub fn build_answer_response(query: &DnsMessage, answers: Vec<ResourceRecord>) -> DnsMessage {
    DnsMessage {
        id: query.id,
        flags: response_flags(query, ResponseCode::NoError),
        questions: query.questions.clone(),
        answers,
        authorities: Vec::new(),
        additionals: Vec::new(),
    }
}

pub fn build_error_response(query: &DnsMessage, rcode: ResponseCode) -> DnsMessage {
    DnsMessage {
        id: query.id,
        flags: response_flags(query, rcode),
        questions: query.questions.clone(),
        ..DnsMessage::default()
    }
}

/// Payload size the client accepts: 512 unless its OPT record asks for more.
pub fn client_payload_limit(query: &DnsMessage) -> usize {
    query
        .edns_payload_size()
        .map(|size| (size as usize).max(BASE_UDP_PAYLOAD))
        .unwrap_or(BASE_UDP_PAYLOAD)
}

/// Encodes `response` within `limit`. When it does not fit, the record
/// sections are dropped and TC is set so the client retries over TCP.
pub fn encode_response(response: &DnsMessage, limit: usize) -> Result<Vec<u8>, WireError> {
    match encode_message(response, limit) {
        Err(WireError::BufferTooSmall { .. }) => {
            let mut truncated = DnsMessage {
                id: response.id,
                flags: response.flags,
                questions: response.questions.clone(),
                ..DnsMessage::default()
            };
            truncated.flags.truncated = true;
            encode_message(&truncated, limit)
        }
        other => other,
    }
}
