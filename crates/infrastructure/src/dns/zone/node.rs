use compact_str::CompactString;
use std::fmt::Write;
use triedns_domain::{NsDelegation, RecordType, SoaMetadata, ZoneRecord, ITSELF_LABEL};

/// One label of the authoritative hierarchy. Children are owned and kept in
/// insertion order; the first child whose label matches wins.
#[derive(Debug)]
pub struct ZoneNode {
    label: CompactString,
    children: Vec<ZoneNode>,
    records: Vec<ZoneRecord>,
    soa: Option<SoaMetadata>,
    ns: Option<NsDelegation>,
}

impl ZoneNode {
    pub fn new(label: &str) -> Self {
        Self {
            label: CompactString::new(label),
            children: Vec::new(),
            records: Vec::new(),
            soa: None,
            ns: None,
        }
    }

    pub(crate) fn itself_node(soa: SoaMetadata, ns: NsDelegation) -> Self {
        Self {
            soa: Some(soa),
            ns: Some(ns),
            ..Self::new(ITSELF_LABEL)
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn records(&self) -> &[ZoneRecord] {
        &self.records
    }

    pub fn children(&self) -> &[ZoneNode] {
        &self.children
    }

    pub fn soa(&self) -> Option<&SoaMetadata> {
        self.soa.as_ref()
    }

    pub fn ns(&self) -> Option<&NsDelegation> {
        self.ns.as_ref()
    }

    /// The SOA/NS holder of a zone apex is never reachable by name.
    pub fn is_itself(&self) -> bool {
        self.soa.is_some()
    }

    pub fn child(&self, label: &[u8]) -> Option<&ZoneNode> {
        self.children
            .iter()
            .find(|c| !c.is_itself() && c.label.as_bytes().eq_ignore_ascii_case(label))
    }

    /// The "itself" child when this node is a zone apex.
    pub fn itself(&self) -> Option<&ZoneNode> {
        self.children.iter().find(|c| c.is_itself())
    }

    pub fn is_apex(&self) -> bool {
        self.itself().is_some()
    }

    pub(crate) fn child_or_insert(&mut self, label: &[u8]) -> &mut ZoneNode {
        let index = match self
            .children
            .iter()
            .position(|c| !c.is_itself() && c.label.as_bytes().eq_ignore_ascii_case(label))
        {
            Some(index) => index,
            None => {
                self.children
                    .push(ZoneNode::new(&String::from_utf8_lossy(label)));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    pub(crate) fn push_child(&mut self, child: ZoneNode) {
        self.children.push(child);
    }

    pub(crate) fn push_record(&mut self, record: ZoneRecord) {
        self.records.push(record);
    }

    /// A record of `record_type` if the node has one, else its first record.
    pub fn pick_record(&self, record_type: RecordType) -> Option<&ZoneRecord> {
        self.records
            .iter()
            .find(|r| r.record_type == record_type)
            .or_else(|| self.records.first())
    }

    pub(crate) fn render(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let label = if depth == 0 { "." } else { self.label.as_str() };
        let _ = writeln!(out, "{}{}", indent, label);

        if let Some(soa) = &self.soa {
            let _ = writeln!(
                out,
                "{}  SOA serial={} refresh={} retry={} expire={} minimum={}",
                indent, soa.serial, soa.refresh, soa.retry, soa.expire, soa.minimum
            );
        }
        if let Some(ns) = &self.ns {
            let _ = writeln!(out, "{}  NS {} | {}", indent, ns.first, ns.second);
        }
        for record in &self.records {
            let _ = writeln!(out, "{}  = {}", indent, record);
        }
        for child in &self.children {
            child.render(depth + 1, out);
        }
    }
}
