//! TrieDNS Infrastructure Layer
pub mod dns;
