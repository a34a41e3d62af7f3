use std::fmt;

/// Transport used for one exchange with an upstream server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DnsProtocol {
    #[default]
    Udp,
    Tcp,
}

impl DnsProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            DnsProtocol::Udp => "udp",
            DnsProtocol::Tcp => "tcp",
        }
    }

    /// Largest message this protocol may carry without EDNS negotiation.
    pub fn base_payload_limit(&self) -> usize {
        match self {
            DnsProtocol::Udp => 512,
            DnsProtocol::Tcp => 65535,
        }
    }
}

impl fmt::Display for DnsProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
