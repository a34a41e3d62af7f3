use crate::dns::codec::{
    build_answer_response, build_error_response, client_payload_limit, decode_header,
    decode_message, encode_response, rdata_from_text,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};
use triedns_application::use_cases::ResolveNameUseCase;
use triedns_domain::dns_message::OPCODE_QUERY;
use triedns_domain::{DnsMessage, DnsProtocol, DnsQuery, ResourceRecord, ResponseCode};

/// Answers binary DNS queries through the resolution engine.
pub struct DnsServerHandler {
    use_case: Arc<ResolveNameUseCase>,
    edns_payload_size: u16,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<ResolveNameUseCase>, edns_payload_size: u16) -> Self {
        Self {
            use_case,
            edns_payload_size,
        }
    }

    /// The encoded reply to `packet`, or `None` when nothing should be sent:
    /// the header is unreadable or the packet is itself a response. Replies
    /// over UDP are cut to the client's payload size; over TCP only the
    /// 65535-byte frame limit applies.
    pub async fn handle(
        &self,
        packet: &[u8],
        client: SocketAddr,
        protocol: DnsProtocol,
    ) -> Option<Vec<u8>> {
        let header = match decode_header(packet) {
            Ok(header) => header,
            Err(e) => {
                debug!(client = %client, error = %e, "Dropping packet without a readable header");
                return None;
            }
        };
        if header.flags.response {
            debug!(client = %client, id = header.id, "Dropping stray response");
            return None;
        }

        let query = match decode_message(packet) {
            Ok(query) => query,
            Err(e) => {
                warn!(client = %client, error = %e, "Malformed query");
                let stub = DnsMessage {
                    id: header.id,
                    flags: header.flags,
                    ..DnsMessage::default()
                };
                return self.encode(
                    &stub,
                    build_error_response(&stub, ResponseCode::FormErr),
                    protocol,
                );
            }
        };

        if query.flags.opcode != OPCODE_QUERY {
            return self.encode(
                &query,
                build_error_response(&query, ResponseCode::NotImp),
                protocol,
            );
        }
        let Some(question) = query.question() else {
            return self.encode(
                &query,
                build_error_response(&query, ResponseCode::FormErr),
                protocol,
            );
        };

        info!(
            domain = %question.name,
            record_type = %question.qtype,
            client = %client,
            protocol = %protocol,
            "DNS query received"
        );

        let dns_query = DnsQuery::new(question.name.clone(), question.qtype);
        let response = match self.use_case.execute(&dns_query).await {
            Ok(resolution) => match rdata_from_text(resolution.record_type, &resolution.value) {
                Ok(rdata) => {
                    let record = ResourceRecord::new(
                        question.name.clone(),
                        resolution.record_type,
                        resolution.ttl,
                        rdata,
                    );
                    debug!(
                        domain = %question.name,
                        source = resolution.source.as_str(),
                        "Answering query"
                    );
                    build_answer_response(&query, vec![record])
                }
                Err(e) => {
                    warn!(domain = %question.name, error = %e, "Answer has no wire form");
                    build_error_response(&query, ResponseCode::ServFail)
                }
            },
            Err(e) if e.is_not_found() => {
                debug!(domain = %question.name, "Name not found");
                build_error_response(&query, ResponseCode::NxDomain)
            }
            Err(e) => {
                warn!(domain = %question.name, error = %e, "Resolution failed");
                build_error_response(&query, ResponseCode::ServFail)
            }
        };

        self.encode(&query, response, protocol)
    }

    fn encode(
        &self,
        query: &DnsMessage,
        mut response: DnsMessage,
        protocol: DnsProtocol,
    ) -> Option<Vec<u8>> {
        if query.edns_payload_size().is_some() {
            response.set_edns(self.edns_payload_size);
        }
        let limit = match protocol {
            DnsProtocol::Udp => client_payload_limit(query),
            DnsProtocol::Tcp => DnsProtocol::Tcp.base_payload_limit(),
        };
        match encode_response(&response, limit) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(id = response.id, error = %e, "Failed to encode response");
                None
            }
        }
    }
}
