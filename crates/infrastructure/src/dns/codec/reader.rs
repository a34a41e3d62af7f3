//! Wire → message decoding (RFC 1035 §4.1).
//!
//! Compression pointers are followed on decode only. Every pointer must
//! target an offset strictly below both its own position and the previous
//! jump target, which rules out forward references and loops.

use smallvec::SmallVec;
use triedns_domain::{
    DnsMessage, DnsName, Header, HeaderFlags, Question, RecordType, ResourceRecord, WireError,
    MAX_NAME_LEN,
};

use super::writer::write_name;

pub const HEADER_LEN: usize = 12;

const POINTER_MASK: u8 = 0xC0;

fn need(bytes: &[u8], offset: usize, needed: usize) -> Result<(), WireError> {
    if offset.checked_add(needed).is_some_and(|end| end <= bytes.len()) {
        Ok(())
    } else {
        Err(WireError::TruncatedInput {
            offset,
            needed,
            available: bytes.len().saturating_sub(offset),
        })
    }
}

fn read_u16(bytes: &[u8], offset: usize) -> Result<u16, WireError> {
    need(bytes, offset, 2)?;
    Ok(u16::from_be_bytes([bytes[offset], bytes[offset + 1]]))
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, WireError> {
    need(bytes, offset, 4)?;
    Ok(u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ]))
}

pub fn decode_header(bytes: &[u8]) -> Result<Header, WireError> {
    need(bytes, 0, HEADER_LEN)?;
    Ok(Header {
        id: read_u16(bytes, 0)?,
        flags: HeaderFlags::from_u16(read_u16(bytes, 2)?),
        qdcount: read_u16(bytes, 4)?,
        ancount: read_u16(bytes, 6)?,
        nscount: read_u16(bytes, 8)?,
        arcount: read_u16(bytes, 10)?,
    })
}

/// Decodes the name starting at `offset`. Returns the name and the number of
/// bytes it occupies at `offset` (a pointer counts as two bytes, whatever it
/// expands to).
pub fn decode_name(bytes: &[u8], offset: usize) -> Result<(DnsName, usize), WireError> {
    let mut labels: SmallVec<[&[u8]; 8]> = SmallVec::new();
    let mut pos = offset;
    let mut lowest_target = offset;
    let mut consumed: Option<usize> = None;
    let mut encoded_len = 1;

    loop {
        need(bytes, pos, 1)?;
        let len_byte = bytes[pos];

        match len_byte & POINTER_MASK {
            0x00 if len_byte == 0 => {
                if consumed.is_none() {
                    consumed = Some(pos + 1 - offset);
                }
                break;
            }
            0x00 => {
                let len = len_byte as usize;
                need(bytes, pos + 1, len)?;
                encoded_len += len + 1;
                if encoded_len > MAX_NAME_LEN {
                    return Err(WireError::NameTooLong);
                }
                labels.push(&bytes[pos + 1..pos + 1 + len]);
                pos += len + 1;
            }
            POINTER_MASK => {
                need(bytes, pos, 2)?;
                let target = (((len_byte & !POINTER_MASK) as usize) << 8) | bytes[pos + 1] as usize;
                if target >= pos || target >= lowest_target {
                    return Err(WireError::MalformedCompression {
                        offset: pos,
                        target,
                    });
                }
                if consumed.is_none() {
                    consumed = Some(pos + 2 - offset);
                }
                lowest_target = target;
                pos = target;
            }
            _ => {
                return Err(WireError::InvalidLabel(format!(
                    "reserved label type {:#04x} at {}",
                    len_byte, pos
                )));
            }
        }
    }

    let name = DnsName::from_wire_labels(labels.iter().copied())?;
    Ok((name, consumed.unwrap_or(1)))
}

pub fn decode_question(bytes: &[u8], offset: usize) -> Result<(Question, usize), WireError> {
    let (name, name_len) = decode_name(bytes, offset)?;
    let pos = offset + name_len;
    let qtype = RecordType::from_u16(read_u16(bytes, pos)?);
    let qclass = read_u16(bytes, pos + 2)?;

    Ok((
        Question {
            name,
            qtype,
            qclass,
        },
        name_len + 4,
    ))
}

pub fn decode_answer(bytes: &[u8], offset: usize) -> Result<(ResourceRecord, usize), WireError> {
    let (name, name_len) = decode_name(bytes, offset)?;
    let mut pos = offset + name_len;

    let record_type = RecordType::from_u16(read_u16(bytes, pos)?);
    let class = read_u16(bytes, pos + 2)?;
    let ttl = read_u32(bytes, pos + 4)?;
    let rdlength = read_u16(bytes, pos + 8)? as usize;
    pos += 10;

    need(bytes, pos, rdlength)?;
    let rdata = if record_type.carries_names() {
        expand_rdata(bytes, pos, rdlength, record_type)?
    } else {
        bytes[pos..pos + rdlength].to_vec()
    };

    Ok((
        ResourceRecord {
            name,
            record_type,
            class,
            ttl,
            rdata,
        },
        name_len + 10 + rdlength,
    ))
}

/// Rewrites name-bearing RDATA with every embedded name uncompressed, so
/// the record no longer depends on the message it came from.
fn expand_rdata(
    bytes: &[u8],
    start: usize,
    len: usize,
    record_type: RecordType,
) -> Result<Vec<u8>, WireError> {
    let end = start + len;
    let mut out = Vec::with_capacity(len);
    let mut pos = start;

    let copy_name = |pos: &mut usize, out: &mut Vec<u8>| -> Result<(), WireError> {
        let (name, used) = decode_name(bytes, *pos)?;
        *pos += used;
        if *pos > end {
            return Err(WireError::InvalidRecordData(format!(
                "{} name runs past RDATA",
                record_type
            )));
        }
        write_name(&name, out);
        Ok(())
    };

    match record_type {
        RecordType::MX => {
            if len < 2 {
                return Err(WireError::InvalidRecordData("MX preference missing".into()));
            }
            out.extend_from_slice(&bytes[pos..pos + 2]);
            pos += 2;
            copy_name(&mut pos, &mut out)?;
        }
        RecordType::SOA => {
            copy_name(&mut pos, &mut out)?;
            copy_name(&mut pos, &mut out)?;
            if end - pos != 20 {
                return Err(WireError::InvalidRecordData(
                    "SOA needs five 32-bit fields".into(),
                ));
            }
            out.extend_from_slice(&bytes[pos..end]);
            pos = end;
        }
        _ => copy_name(&mut pos, &mut out)?,
    }

    if pos != end {
        return Err(WireError::InvalidRecordData(format!(
            "{} RDATA has {} trailing bytes",
            record_type,
            end - pos
        )));
    }
    Ok(out)
}

pub fn decode_message(bytes: &[u8]) -> Result<DnsMessage, WireError> {
    let header = decode_header(bytes)?;
    let mut pos = HEADER_LEN;

    let mut questions = Vec::with_capacity(header.qdcount.min(16) as usize);
    for _ in 0..header.qdcount {
        let (question, used) = decode_question(bytes, pos)?;
        questions.push(question);
        pos += used;
    }

    let mut sections: [Vec<ResourceRecord>; 3] = Default::default();
    let counts = [header.ancount, header.nscount, header.arcount];
    for (section, count) in sections.iter_mut().zip(counts) {
        for _ in 0..count {
            let (record, used) = decode_answer(bytes, pos)?;
            section.push(record);
            pos += used;
        }
    }
    let [answers, authorities, additionals] = sections;

    Ok(DnsMessage {
        id: header.id,
        flags: header.flags,
        questions,
        answers,
        authorities,
        additionals,
    })
}
