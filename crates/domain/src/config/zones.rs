use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ZonesConfig {
    /// Zone index file (`<zone> <zone-file>` per line). No index means no
    /// authoritative data: every query is forwarded.
    #[serde(default)]
    pub index: Option<String>,
}
