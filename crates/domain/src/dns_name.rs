use crate::errors::WireError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 255;

/// A domain name as an ordered list of labels, leftmost first.
///
/// Labels are raw octets as they appear on the wire; only the textual form
/// (`FromStr`) restricts which characters a label may spell. Comparison and
/// hashing fold ASCII case so `WWW.Example.COM` and `www.example.com` are the
/// same name. The root name has no labels.
#[derive(Clone, Default)]
pub struct DnsName {
    labels: Vec<Box<[u8]>>,
}

impl DnsName {
    pub fn root() -> Self {
        Self { labels: Vec::new() }
    }

    /// Builds a name from wire labels. Any octet is allowed; only the
    /// RFC 1035 length limits apply.
    pub fn from_wire_labels<'a, I>(labels: I) -> Result<Self, WireError>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut out = Vec::new();
        let mut encoded_len = 1;

        for label in labels {
            if label.is_empty() {
                return Err(WireError::InvalidLabel("empty label".to_string()));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(WireError::LabelTooLong(label.len()));
            }
            encoded_len += label.len() + 1;
            if encoded_len > MAX_NAME_LEN {
                return Err(WireError::NameTooLong);
            }
            out.push(Box::from(label));
        }

        Ok(Self { labels: out })
    }

    pub fn labels(&self) -> impl DoubleEndedIterator<Item = &[u8]> + ExactSizeIterator {
        self.labels.iter().map(|l| l.as_ref())
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Length of the uncompressed wire form, including the terminating zero.
    pub fn encoded_len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// True when `self` equals `other` or lies below it.
    pub fn is_subdomain_of(&self, other: &DnsName) -> bool {
        if other.labels.len() > self.labels.len() {
            return false;
        }
        self.labels
            .iter()
            .rev()
            .zip(other.labels.iter().rev())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// Dotted form without the trailing dot; the root renders as `.`.
    pub fn to_dotted(&self) -> String {
        self.to_string()
    }
}

/// Splits presentation text into label octets. `\X` stands for the octet
/// `X` and `\DDD` for a decimal octet; unescaped whitespace and control
/// characters are rejected.
fn parse_text_labels(text: &str) -> Result<Vec<Vec<u8>>, WireError> {
    let invalid = || WireError::InvalidLabel(text.to_string());
    let mut labels = Vec::new();
    let mut current = Vec::new();
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => labels.push(std::mem::take(&mut current)),
            '\\' => {
                let first = chars.next().ok_or_else(invalid)?;
                if let Some(d1) = first.to_digit(10) {
                    let d2 = chars.next().and_then(|c| c.to_digit(10)).ok_or_else(invalid)?;
                    let d3 = chars.next().and_then(|c| c.to_digit(10)).ok_or_else(invalid)?;
                    let value = d1 * 100 + d2 * 10 + d3;
                    current.push(u8::try_from(value).map_err(|_| invalid())?);
                } else if first.is_ascii() {
                    current.push(first as u8);
                } else {
                    return Err(invalid());
                }
            }
            c if c.is_whitespace() || c.is_control() => return Err(invalid()),
            c => {
                let mut buf = [0u8; 4];
                current.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    labels.push(current);
    Ok(labels)
}

impl FromStr for DnsName {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = match s.strip_suffix('.') {
            Some(rest) if !rest.ends_with('\\') => rest,
            _ => s,
        };
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let labels = parse_text_labels(trimmed)?;
        Self::from_wire_labels(labels.iter().map(Vec::as_slice))
    }
}

impl PartialEq for DnsName {
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(other.labels.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Eq for DnsName {}

impl Hash for DnsName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.labels.len());
        for label in &self.labels {
            for b in label.iter() {
                state.write_u8(b.to_ascii_lowercase());
            }
            state.write_u8(0);
        }
    }
}

impl fmt::Display for DnsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return f.write_str(".");
        }
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write_label(label, f)?;
        }
        Ok(())
    }
}

fn write_label(label: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for &b in label {
        if b == b'.' || b == b'\\' {
            write!(f, "\\{}", b as char)?;
        } else if !(0x21..0x7F).contains(&b) {
            write!(f, "\\{:03}", b)?;
        } else {
            write!(f, "{}", b as char)?;
        }
    }
    Ok(())
}

impl fmt::Debug for DnsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DnsName({})", self)
    }
}
