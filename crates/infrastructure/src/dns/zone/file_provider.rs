//! Zone data read from plain text files.
//!
//! The index file lists one zone per line:
//!
//! ```text
//! # zone          file (relative to this index)
//! example.com     example.com.zone
//! ```
//!
//! A zone file holds SOA/NS settings as `key = value` lines and one record
//! per line:
//!
//! ```text
//! soa.serial  = 2024010101
//! soa.minimum = 300
//! ns.1 = ns1.example.com
//! ns.2 = ns2.example.com
//!
//! @     3600 IN A  93.184.216.34
//! www        IN A  93.184.216.35
//! @          IN MX 10 mail.example.com
//! ```
//!
//! `@` is the apex, names without a trailing dot that do not already end in
//! the apex are relative to it, and a missing TTL means `soa.minimum`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use triedns_application::ports::ZoneDataProvider;
use triedns_domain::{DomainError, NsSlot, SoaField};

#[derive(Debug, Clone)]
struct RecordLine {
    name: String,
    ttl: Option<u32>,
    record_type: String,
    value: String,
}

#[derive(Debug, Clone, Default)]
struct ZoneFile {
    soa: HashMap<SoaField, u32>,
    ns: [Option<String>; 2],
    records: Vec<RecordLine>,
}

/// [`ZoneDataProvider`] over an index file and the zone files it names.
/// Everything is parsed up front; later calls only read memory.
#[derive(Debug)]
pub struct ZoneFileProvider {
    zones: Vec<(String, String)>,
    files: HashMap<String, ZoneFile>,
}

fn parse_error(path: &Path, line_no: usize, detail: impl std::fmt::Display) -> DomainError {
    DomainError::ZoneProvider(format!("{}:{}: {}", path.display(), line_no, detail))
}

fn significant_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents.lines().enumerate().filter_map(|(i, line)| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            None
        } else {
            Some((i + 1, line))
        }
    })
}

impl ZoneFileProvider {
    pub fn open(index_path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let index_path = index_path.as_ref();
        let contents = std::fs::read_to_string(index_path).map_err(|e| {
            DomainError::ZoneProvider(format!("cannot read {}: {}", index_path.display(), e))
        })?;
        let base = index_path.parent().unwrap_or_else(|| Path::new("."));

        let mut zones = Vec::new();
        let mut files = HashMap::new();

        for (line_no, line) in significant_lines(&contents) {
            let mut fields = line.split_whitespace();
            let (Some(zone), Some(file), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(parse_error(index_path, line_no, "expected `<zone> <file>`"));
            };

            let zone = zone.trim_end_matches('.').to_string();
            let file_path: PathBuf = if Path::new(file).is_absolute() {
                PathBuf::from(file)
            } else {
                base.join(file)
            };
            let key = file_path.to_string_lossy().into_owned();

            let parsed = parse_zone_file(&file_path, &zone)?;
            debug!(zone = %zone, path = %key, records = parsed.records.len(), "Zone file parsed");
            files.insert(key.clone(), parsed);
            zones.push((zone, key));
        }

        info!(index = %index_path.display(), zones = zones.len(), "Zone index loaded");
        Ok(Self { zones, files })
    }

    fn file(&self, path: &str) -> Result<&ZoneFile, DomainError> {
        self.files
            .get(path)
            .ok_or_else(|| DomainError::ZoneProvider(format!("unknown zone file {}", path)))
    }

    fn record(&self, path: &str, index: usize) -> Result<&RecordLine, DomainError> {
        self.file(path)?.records.get(index).ok_or_else(|| {
            DomainError::ZoneProvider(format!("{}: no record at index {}", path, index))
        })
    }
}

fn parse_zone_file(path: &Path, apex: &str) -> Result<ZoneFile, DomainError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        DomainError::ZoneProvider(format!("cannot read {}: {}", path.display(), e))
    })?;
    let mut zone = ZoneFile::default();

    for (line_no, line) in significant_lines(&contents) {
        let setting = line
            .split_once('=')
            .filter(|(key, _)| !key.trim().contains(char::is_whitespace));
        if let Some((key, value)) = setting {
            parse_setting(&mut zone, key.trim(), value.trim())
                .map_err(|detail| parse_error(path, line_no, detail))?;
            continue;
        }
        let record =
            parse_record(line, apex).map_err(|detail| parse_error(path, line_no, detail))?;
        zone.records.push(record);
    }

    Ok(zone)
}

fn parse_setting(zone: &mut ZoneFile, key: &str, value: &str) -> Result<(), String> {
    let (section, field) = key
        .split_once('.')
        .ok_or_else(|| format!("unknown setting `{}`", key))?;

    match section {
        "soa" => {
            let field: SoaField = field.parse()?;
            let value: u32 = value
                .parse()
                .map_err(|e| format!("{} = {:?}: {}", key, value, e))?;
            zone.soa.insert(field, value);
        }
        "ns" => {
            let slot = match field {
                "1" => 0,
                "2" => 1,
                _ => return Err(format!("unknown nameserver slot `{}`", key)),
            };
            zone.ns[slot] = Some(value.trim_end_matches('.').to_string());
        }
        _ => return Err(format!("unknown setting `{}`", key)),
    }
    Ok(())
}

fn qualify(name: &str, apex: &str) -> String {
    if name == "@" {
        return apex.to_string();
    }
    if let Some(absolute) = name.strip_suffix('.') {
        return absolute.to_string();
    }
    let lower = name.to_ascii_lowercase();
    let apex_lower = apex.to_ascii_lowercase();
    if apex.is_empty() || lower == apex_lower || lower.ends_with(&format!(".{}", apex_lower)) {
        name.to_string()
    } else {
        format!("{}.{}", name, apex)
    }
}

fn parse_record(line: &str, apex: &str) -> Result<RecordLine, String> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next().ok_or("empty record line")?;

    let mut next = tokens.next().ok_or("record line ends after the name")?;
    let ttl = match next.parse::<u32>() {
        Ok(ttl) => {
            next = tokens.next().ok_or("record line ends after the TTL")?;
            Some(ttl)
        }
        Err(_) => None,
    };

    if !next.eq_ignore_ascii_case("IN") {
        return Err(format!("expected class IN, found `{}`", next));
    }
    let record_type = tokens.next().ok_or("record line has no type")?;
    let value = tokens.collect::<Vec<_>>().join(" ");
    if value.is_empty() {
        return Err(format!("{} record has no value", record_type));
    }

    Ok(RecordLine {
        name: qualify(name, apex),
        ttl,
        record_type: record_type.to_ascii_uppercase(),
        value,
    })
}

impl ZoneDataProvider for ZoneFileProvider {
    fn zone_count(&self) -> Result<usize, DomainError> {
        Ok(self.zones.len())
    }

    fn zone_domains(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.zones.iter().map(|(zone, _)| zone.clone()).collect())
    }

    fn path_for_zone(&self, domain: &str) -> Result<String, DomainError> {
        self.zones
            .iter()
            .find(|(zone, _)| zone.eq_ignore_ascii_case(domain))
            .map(|(_, path)| path.clone())
            .ok_or_else(|| DomainError::ZoneProvider(format!("zone {} is not indexed", domain)))
    }

    fn soa_field(&self, path: &str, field: SoaField) -> Result<u32, DomainError> {
        self.file(path)?
            .soa
            .get(&field)
            .copied()
            .ok_or_else(|| {
                DomainError::ZoneProvider(format!("{}: soa.{} is missing", path, field.as_str()))
            })
    }

    fn ns_field(&self, path: &str, slot: NsSlot) -> Result<String, DomainError> {
        self.file(path)?.ns[slot.index() - 1].clone().ok_or_else(|| {
            DomainError::ZoneProvider(format!("{}: ns.{} is missing", path, slot.index()))
        })
    }

    fn terminal_names(&self, path: &str) -> Result<Vec<String>, DomainError> {
        Ok(self
            .file(path)?
            .records
            .iter()
            .map(|r| r.name.clone())
            .collect())
    }

    fn record_type(&self, path: &str, index: usize) -> Result<String, DomainError> {
        Ok(self.record(path, index)?.record_type.clone())
    }

    fn record_value(&self, path: &str, index: usize) -> Result<String, DomainError> {
        Ok(self.record(path, index)?.value.clone())
    }

    fn record_ttl(&self, path: &str, index: usize) -> Result<u32, DomainError> {
        match self.record(path, index)?.ttl {
            Some(ttl) => Ok(ttl),
            None => self.soa_field(path, SoaField::Minimum),
        }
    }
}
