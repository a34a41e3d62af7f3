//! Conversion between RDATA bytes and the presentation form stored in the
//! cache and zone data.

use std::fmt::Write;
use std::net::{Ipv4Addr, Ipv6Addr};
use triedns_domain::{DnsName, RecordType, WireError};

use super::reader::decode_name;
use super::writer::write_name;

fn invalid(record_type: RecordType, detail: impl std::fmt::Display) -> WireError {
    WireError::InvalidRecordData(format!("{}: {}", record_type, detail))
}

pub fn rdata_to_text(record_type: RecordType, rdata: &[u8]) -> Result<String, WireError> {
    match record_type {
        RecordType::A => {
            let octets: [u8; 4] = rdata
                .try_into()
                .map_err(|_| invalid(record_type, format!("{} bytes", rdata.len())))?;
            Ok(Ipv4Addr::from(octets).to_string())
        }
        RecordType::AAAA => {
            let octets: [u8; 16] = rdata
                .try_into()
                .map_err(|_| invalid(record_type, format!("{} bytes", rdata.len())))?;
            Ok(Ipv6Addr::from(octets).to_string())
        }
        RecordType::NS | RecordType::CNAME | RecordType::PTR => {
            let (name, _) = decode_name(rdata, 0)?;
            Ok(name.to_string())
        }
        RecordType::MX => {
            if rdata.len() < 3 {
                return Err(invalid(record_type, "too short"));
            }
            let preference = u16::from_be_bytes([rdata[0], rdata[1]]);
            let (exchange, _) = decode_name(rdata, 2)?;
            Ok(format!("{} {}", preference, exchange))
        }
        RecordType::SOA => {
            let (mname, used) = decode_name(rdata, 0)?;
            let (rname, used2) = decode_name(rdata, used)?;
            let fields = &rdata[used + used2..];
            if fields.len() != 20 {
                return Err(invalid(record_type, "bad field block"));
            }
            let mut text = format!("{} {}", mname, rname);
            for chunk in fields.chunks_exact(4) {
                let value = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                let _ = write!(text, " {}", value);
            }
            Ok(text)
        }
        RecordType::TXT => {
            let mut parts = Vec::new();
            let mut pos = 0;
            while pos < rdata.len() {
                let len = rdata[pos] as usize;
                let chunk = rdata
                    .get(pos + 1..pos + 1 + len)
                    .ok_or_else(|| invalid(record_type, "character-string overruns RDATA"))?;
                parts.push(String::from_utf8_lossy(chunk).into_owned());
                pos += len + 1;
            }
            Ok(parts.join(" "))
        }
        _ => {
            let mut text = format!("\\# {}", rdata.len());
            if !rdata.is_empty() {
                text.push(' ');
                for byte in rdata {
                    let _ = write!(text, "{:02x}", byte);
                }
            }
            Ok(text)
        }
    }
}

fn parse_name(record_type: RecordType, text: &str) -> Result<DnsName, WireError> {
    text.parse::<DnsName>()
        .map_err(|e| invalid(record_type, format!("{}: {}", text, e)))
}

pub fn rdata_from_text(record_type: RecordType, text: &str) -> Result<Vec<u8>, WireError> {
    let text = text.trim();
    match record_type {
        RecordType::A => text
            .parse::<Ipv4Addr>()
            .map(|ip| ip.octets().to_vec())
            .map_err(|e| invalid(record_type, format!("{}: {}", text, e))),
        RecordType::AAAA => text
            .parse::<Ipv6Addr>()
            .map(|ip| ip.octets().to_vec())
            .map_err(|e| invalid(record_type, format!("{}: {}", text, e))),
        RecordType::NS | RecordType::CNAME | RecordType::PTR => {
            let mut out = Vec::new();
            write_name(&parse_name(record_type, text)?, &mut out);
            Ok(out)
        }
        RecordType::MX => {
            let (preference, exchange) = text
                .split_once(char::is_whitespace)
                .ok_or_else(|| invalid(record_type, "expected `<preference> <exchange>`"))?;
            let preference: u16 = preference
                .parse()
                .map_err(|e| invalid(record_type, format!("preference {}: {}", preference, e)))?;
            let mut out = preference.to_be_bytes().to_vec();
            write_name(&parse_name(record_type, exchange.trim())?, &mut out);
            Ok(out)
        }
        RecordType::TXT => {
            let unquoted = text
                .strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
                .unwrap_or(text);
            let mut out = Vec::with_capacity(unquoted.len() + 1);
            for chunk in unquoted.as_bytes().chunks(255) {
                out.push(chunk.len() as u8);
                out.extend_from_slice(chunk);
            }
            if out.is_empty() {
                out.push(0);
            }
            Ok(out)
        }
        _ => Err(invalid(record_type, "no presentation format")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mx_text_round_trip() {
        let rdata = rdata_from_text(RecordType::MX, "10 mail.example.com").unwrap();
        assert_eq!(
            rdata_to_text(RecordType::MX, &rdata).unwrap(),
            "10 mail.example.com"
        );
    }

    #[test]
    fn test_a_rejects_wrong_length() {
        assert!(rdata_to_text(RecordType::A, &[1, 2, 3]).is_err());
        assert!(rdata_from_text(RecordType::A, "300.1.1.1").is_err());
    }

    #[test]
    fn test_unknown_type_renders_generic_form() {
        assert_eq!(
            rdata_to_text(RecordType::Unknown(99), &[0xAB, 0x01]).unwrap(),
            "\\# 2 ab01"
        );
    }
}
