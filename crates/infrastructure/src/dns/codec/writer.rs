//! Message → wire encoding. Names are always written uncompressed and the
//! section counts come from the section lengths.

use triedns_domain::{DnsMessage, DnsName, Header, Question, ResourceRecord, WireError};

use super::reader::HEADER_LEN;

pub fn write_name(name: &DnsName, out: &mut Vec<u8>) {
    for label in name.labels() {
        out.push(label.len() as u8);
        out.extend_from_slice(label);
    }
    out.push(0);
}

pub fn encode_name(name: &DnsName) -> Vec<u8> {
    let mut out = Vec::with_capacity(name.encoded_len());
    write_name(name, &mut out);
    out
}

fn write_header(header: &Header, out: &mut Vec<u8>) {
    out.extend_from_slice(&header.id.to_be_bytes());
    out.extend_from_slice(&header.flags.to_u16().to_be_bytes());
    out.extend_from_slice(&header.qdcount.to_be_bytes());
    out.extend_from_slice(&header.ancount.to_be_bytes());
    out.extend_from_slice(&header.nscount.to_be_bytes());
    out.extend_from_slice(&header.arcount.to_be_bytes());
}

fn write_question(question: &Question, out: &mut Vec<u8>) {
    write_name(&question.name, out);
    out.extend_from_slice(&question.qtype.to_u16().to_be_bytes());
    out.extend_from_slice(&question.qclass.to_be_bytes());
}

fn write_record(record: &ResourceRecord, out: &mut Vec<u8>) -> Result<(), WireError> {
    let rdlength = u16::try_from(record.rdata.len()).map_err(|_| {
        WireError::InvalidRecordData(format!(
            "{} RDATA of {} bytes does not fit RDLENGTH",
            record.record_type,
            record.rdata.len()
        ))
    })?;

    write_name(&record.name, out);
    out.extend_from_slice(&record.record_type.to_u16().to_be_bytes());
    out.extend_from_slice(&record.class.to_be_bytes());
    out.extend_from_slice(&record.ttl.to_be_bytes());
    out.extend_from_slice(&rdlength.to_be_bytes());
    out.extend_from_slice(&record.rdata);
    Ok(())
}

/// Encodes `message`, failing with `BufferTooSmall` when the result would be
/// larger than `limit` bytes.
pub fn encode_message(message: &DnsMessage, limit: usize) -> Result<Vec<u8>, WireError> {
    let sections = [
        message.questions.len(),
        message.answers.len(),
        message.authorities.len(),
        message.additionals.len(),
    ];
    if sections.iter().any(|&n| n > u16::MAX as usize) {
        return Err(WireError::InvalidRecordData(
            "section holds more than 65535 entries".to_string(),
        ));
    }

    let mut out = Vec::with_capacity(limit.min(4096).max(HEADER_LEN));
    write_header(&message.header(), &mut out);

    for question in &message.questions {
        write_question(question, &mut out);
    }
    for record in message
        .answers
        .iter()
        .chain(&message.authorities)
        .chain(&message.additionals)
    {
        write_record(record, &mut out)?;
    }

    if out.len() > limit {
        return Err(WireError::BufferTooSmall {
            needed: out.len(),
            limit,
        });
    }
    Ok(out)
}
