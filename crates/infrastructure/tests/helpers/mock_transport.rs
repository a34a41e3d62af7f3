#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::Duration;
use triedns_domain::{
    DnsMessage, DnsName, DnsProtocol, DomainError, HeaderFlags, RecordType, ResourceRecord,
    ResponseCode,
};
use triedns_infrastructure::dns::codec::{decode_message, encode_message, write_name};
use triedns_infrastructure::dns::DnsTransport;

/// What the fake server does with the next query it receives.
#[derive(Debug, Clone)]
pub enum Reply {
    Answer(Ipv4Addr, u32),
    Rcode(ResponseCode),
    Truncated,
    WrongId,
    NotAResponse,
    Garbage,
    Timeout,
    Unreachable,
    /// NS referral to `ns` with optional glue.
    Referral {
        zone: String,
        ns: String,
        glue: Option<Ipv4Addr>,
    },
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub server: SocketAddr,
    pub protocol: DnsProtocol,
    pub edns: Option<u16>,
    pub recursion_desired: bool,
    pub name: DnsName,
}

/// Scripted transport. Replies are consumed per server in order; a server
/// with an empty script times out.
#[derive(Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<SocketAddr, VecDeque<Reply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, server: SocketAddr, replies: Vec<Reply>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(server)
            .or_default()
            .extend(replies);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

pub fn server(last_octet: u8) -> SocketAddr {
    SocketAddr::from(([192, 0, 2, last_octet], 53))
}

fn name(text: &str) -> DnsName {
    text.parse().unwrap()
}

fn respond(query: &DnsMessage, rcode: ResponseCode) -> DnsMessage {
    DnsMessage {
        id: query.id,
        flags: HeaderFlags {
            response: true,
            recursion_desired: query.flags.recursion_desired,
            recursion_available: true,
            rcode,
            ..HeaderFlags::default()
        },
        questions: query.questions.clone(),
        ..DnsMessage::default()
    }
}

fn build_reply(query: &DnsMessage, reply: &Reply) -> Vec<u8> {
    let question = query.question().unwrap();
    let mut response = respond(query, ResponseCode::NoError);

    match reply {
        Reply::Answer(ip, ttl) => response.answers.push(ResourceRecord::new(
            question.name.clone(),
            RecordType::A,
            *ttl,
            ip.octets().to_vec(),
        )),
        Reply::Rcode(rcode) => response.flags.rcode = *rcode,
        Reply::Truncated => response.flags.truncated = true,
        Reply::WrongId => response.id = query.id.wrapping_add(1),
        Reply::NotAResponse => response.flags.response = false,
        Reply::Referral { zone, ns, glue } => {
            let mut rdata = Vec::new();
            write_name(&name(ns), &mut rdata);
            response
                .authorities
                .push(ResourceRecord::new(name(zone), RecordType::NS, 3600, rdata));
            if let Some(ip) = glue {
                response.additionals.push(ResourceRecord::new(
                    name(ns),
                    RecordType::A,
                    3600,
                    ip.octets().to_vec(),
                ));
            }
        }
        Reply::Garbage => return vec![0xFF; 5],
        Reply::Timeout | Reply::Unreachable => unreachable!(),
    }

    encode_message(&response, 65535).unwrap()
}

#[async_trait]
impl DnsTransport for MockTransport {
    async fn exchange(
        &self,
        server: SocketAddr,
        protocol: DnsProtocol,
        message: &[u8],
        _timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        let query = decode_message(message).expect("resolver sent an undecodable query");
        self.calls.lock().unwrap().push(RecordedCall {
            server,
            protocol,
            edns: query.edns_payload_size(),
            recursion_desired: query.flags.recursion_desired,
            name: query.question().unwrap().name.clone(),
        });

        let reply = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&server)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Reply::Timeout);

        match reply {
            Reply::Timeout => Err(DomainError::QueryTimeout),
            Reply::Unreachable => Err(DomainError::Transport {
                server: server.to_string(),
                reason: "connection refused".to_string(),
            }),
            other => Ok(build_reply(&query, &other)),
        }
    }
}
