use super::node::ZoneNode;
use smallvec::SmallVec;
use tracing::{debug, info, warn};
use triedns_application::ports::{ZoneDataProvider, ZoneLookup};
use triedns_domain::{
    DnsName, DomainError, NsDelegation, NsSlot, RecordType, SoaField, SoaMetadata, ZoneAnswer,
    ZoneRecord,
};

/// Delegation hops a single lookup may follow before giving up.
pub const MAX_DELEGATION_DEPTH: usize = 8;

/// Authoritative data for every managed zone, as a trie keyed by labels read
/// right to left. Built once, then shared read-only.
#[derive(Debug)]
pub struct ZoneStore {
    root: ZoneNode,
    zone_count: usize,
}

fn provider_error(zone: &str, detail: impl std::fmt::Display) -> DomainError {
    DomainError::ZoneProvider(format!("{}: {}", zone, detail))
}

impl ZoneStore {
    /// A store without zones; every lookup misses.
    pub fn empty() -> Self {
        Self {
            root: ZoneNode::new(""),
            zone_count: 0,
        }
    }

    pub fn build(provider: &dyn ZoneDataProvider) -> Result<Self, DomainError> {
        let expected = provider.zone_count()?;
        let domains = provider.zone_domains()?;
        if domains.len() != expected {
            return Err(DomainError::ZoneProvider(format!(
                "provider reported {} zones but listed {}",
                expected,
                domains.len()
            )));
        }

        let mut store = Self::empty();
        for domain in &domains {
            store.add_zone(provider, domain)?;
        }

        info!(zones = store.zone_count, "Zone trie built");
        Ok(store)
    }

    fn add_zone(&mut self, provider: &dyn ZoneDataProvider, domain: &str) -> Result<(), DomainError> {
        let apex: DnsName = domain
            .parse()
            .map_err(|e| provider_error(domain, format!("invalid zone name ({})", e)))?;
        let path = provider.path_for_zone(domain)?;

        let mut soa = SoaMetadata::default();
        for field in SoaField::ALL {
            soa.set(field, provider.soa_field(&path, field)?);
        }

        let parse_ns = |slot: NsSlot| -> Result<DnsName, DomainError> {
            let raw = provider.ns_field(&path, slot)?;
            raw.parse()
                .map_err(|e| provider_error(domain, format!("ns.{} {:?} ({})", slot.index(), raw, e)))
        };
        let ns = NsDelegation {
            first: parse_ns(NsSlot::First)?,
            second: parse_ns(NsSlot::Second)?,
        };

        let names = provider.terminal_names(&path)?;
        let mut records = Vec::with_capacity(names.len());
        for (index, raw_name) in names.iter().enumerate() {
            let owner: DnsName = raw_name
                .parse()
                .map_err(|e| provider_error(domain, format!("record name {:?} ({})", raw_name, e)))?;
            if !owner.is_subdomain_of(&apex) {
                return Err(provider_error(
                    domain,
                    format!("record {} lies outside the zone", owner),
                ));
            }
            let type_text = provider.record_type(&path, index)?;
            let record_type: RecordType = type_text
                .parse()
                .map_err(|e: String| provider_error(domain, e))?;
            let value = provider.record_value(&path, index)?;
            let ttl = provider.record_ttl(&path, index)?;
            records.push((owner, ZoneRecord::new(record_type, value, ttl)));
        }

        let apex_node = descend_or_create(&mut self.root, apex.labels().rev());
        if apex_node.is_apex() {
            return Err(provider_error(domain, "zone defined twice"));
        }
        apex_node.push_child(ZoneNode::itself_node(soa, ns));

        let apex_depth = apex.label_count();
        let record_count = records.len();
        for (owner, record) in records {
            let below: SmallVec<[&[u8]; 4]> = owner
                .labels()
                .rev()
                .skip(apex_depth)
                .collect();
            descend_or_create(&mut *apex_node, below.into_iter()).push_record(record);
        }

        self.zone_count += 1;
        debug!(zone = %apex, path = %path, records = record_count, "Zone added");
        Ok(())
    }

    pub fn zone_count(&self) -> usize {
        self.zone_count
    }

    pub fn root(&self) -> &ZoneNode {
        &self.root
    }

    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.root.render(0, &mut out);
        out
    }

    pub fn lookup(&self, name: &DnsName, record_type: RecordType) -> Option<ZoneAnswer> {
        let mut delegations = Vec::new();
        self.lookup_at_depth(name, record_type, 0, &mut delegations)
    }

    fn lookup_at_depth(
        &self,
        name: &DnsName,
        record_type: RecordType,
        depth: usize,
        delegations: &mut Vec<DnsName>,
    ) -> Option<ZoneAnswer> {
        if depth > MAX_DELEGATION_DEPTH {
            warn!(domain = %name, depth, "Delegation chain too long, giving up");
            return None;
        }

        let mut node = &self.root;
        let mut enclosing: Option<&NsDelegation> = None;
        let mut walk_complete = true;

        for label in name.labels().rev() {
            if let Some(ns) = node.itself().and_then(ZoneNode::ns) {
                enclosing = Some(ns);
            }
            match node.child(label) {
                Some(child) => node = child,
                None => {
                    walk_complete = false;
                    break;
                }
            }
        }

        if walk_complete {
            if let Some(record) = node.pick_record(record_type) {
                return Some(ZoneAnswer {
                    owner: name.clone(),
                    record: record.clone(),
                    delegations: delegations.clone(),
                });
            }
            if let Some(ns) = node.itself().and_then(ZoneNode::ns) {
                enclosing = Some(ns);
            }
        }

        let ns = enclosing?;
        let slot = if fastrand::bool() {
            NsSlot::First
        } else {
            NsSlot::Second
        };
        let target = ns.candidate(slot).clone();
        debug!(domain = %name, nameserver = %target, "Delegating lookup");

        delegations.push(target.clone());
        self.lookup_at_depth(&target, record_type, depth + 1, delegations)
    }
}

fn descend_or_create<'a, 'l>(
    node: &'a mut ZoneNode,
    labels: impl Iterator<Item = &'l [u8]>,
) -> &'a mut ZoneNode {
    let mut node = node;
    for label in labels {
        node = node.child_or_insert(label);
    }
    node
}

impl ZoneLookup for ZoneStore {
    fn lookup(&self, name: &DnsName, record_type: RecordType) -> Option<ZoneAnswer> {
        ZoneStore::lookup(self, name, record_type)
    }

    fn render_tree(&self) -> String {
        ZoneStore::render_tree(self)
    }

    fn zone_count(&self) -> usize {
        self.zone_count
    }
}
