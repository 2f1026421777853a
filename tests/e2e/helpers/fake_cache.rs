//! A fake local cache on an ephemeral UDP port, answering with hand-built
//! wire messages:
//!
//! * `ok.local.` IN → one A record `1.2.3.4`;
//! * any other name under `local.` IN → NXDOMAIN;
//! * CHAOS TXT → the configured statistic, or REFUSED when unknown.
//!   `hits.bind.` reports how many IN queries the cache has answered.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

const TYPE_A: u16 = 1;
const TYPE_TXT: u16 = 16;
const CLASS_IN: u16 = 1;
const CLASS_CH: u16 = 3;
const RCODE_NXDOMAIN: u8 = 3;
const RCODE_REFUSED: u8 = 5;

#[derive(Default)]
struct CacheState {
    stats: Mutex<HashMap<String, String>>,
    in_queries: AtomicU64,
}

pub struct FakeCache {
    addr: SocketAddr,
    state: Arc<CacheState>,
    task: JoinHandle<()>,
}

impl FakeCache {
    pub async fn start() -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let state = Arc::new(CacheState::default());

        let task_state = state.clone();
        let task = tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                    return;
                };
                if let Some(reply) = answer(&buf[..len], &task_state) {
                    let _ = socket.send_to(&reply, peer).await;
                }
            }
        });

        Self { addr, state, task }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn set_stat(&self, name: &str, value: &str) {
        self.state
            .stats
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    pub fn in_queries(&self) -> u64 {
        self.state.in_queries.load(Ordering::SeqCst)
    }
}

impl Drop for FakeCache {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct Question {
    name: String,
    qtype: u16,
    qclass: u16,
    /// Offset just past the question section.
    end: usize,
}

fn parse_question(query: &[u8]) -> Option<Question> {
    if query.len() < 12 || u16::from_be_bytes([query[4], query[5]]) != 1 {
        return None;
    }
    let mut pos = 12;
    let mut labels = Vec::new();
    loop {
        let len = *query.get(pos)? as usize;
        pos += 1;
        if len == 0 {
            break;
        }
        let label = query.get(pos..pos + len)?;
        labels.push(String::from_utf8_lossy(label).to_ascii_lowercase());
        pos += len;
    }
    let fixed = query.get(pos..pos + 4)?;
    Some(Question {
        name: format!("{}.", labels.join(".")),
        qtype: u16::from_be_bytes([fixed[0], fixed[1]]),
        qclass: u16::from_be_bytes([fixed[2], fixed[3]]),
        end: pos + 4,
    })
}

fn answer(query: &[u8], state: &CacheState) -> Option<Vec<u8>> {
    let question = parse_question(query)?;

    match question.qclass {
        CLASS_IN => {
            state.in_queries.fetch_add(1, Ordering::SeqCst);
            if question.name == "ok.local." && question.qtype == TYPE_A {
                let record = resource(TYPE_A, CLASS_IN, &[1, 2, 3, 4]);
                Some(response(query, &question, 0, &[record]))
            } else if question.name.ends_with(".local.") {
                Some(response(query, &question, RCODE_NXDOMAIN, &[]))
            } else {
                Some(response(query, &question, RCODE_REFUSED, &[]))
            }
        }
        CLASS_CH if question.qtype == TYPE_TXT => {
            let value = if question.name == "hits.bind." {
                Some(state.in_queries.load(Ordering::SeqCst).to_string())
            } else {
                state.stats.lock().unwrap().get(&question.name).cloned()
            };
            match value {
                Some(value) => {
                    let mut rdata = vec![value.len() as u8];
                    rdata.extend_from_slice(value.as_bytes());
                    let record = resource(TYPE_TXT, CLASS_CH, &rdata);
                    Some(response(query, &question, 0, &[record]))
                }
                None => Some(response(query, &question, RCODE_REFUSED, &[])),
            }
        }
        _ => Some(response(query, &question, RCODE_REFUSED, &[])),
    }
}

/// Answer record owning the question name through a compression pointer.
fn resource(rtype: u16, class: u16, rdata: &[u8]) -> Vec<u8> {
    let mut out = vec![0xC0, 0x0C];
    out.extend_from_slice(&rtype.to_be_bytes());
    out.extend_from_slice(&class.to_be_bytes());
    out.extend_from_slice(&60u32.to_be_bytes());
    out.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    out.extend_from_slice(rdata);
    out
}

fn response(query: &[u8], question: &Question, rcode: u8, answers: &[Vec<u8>]) -> Vec<u8> {
    let rd = query[2] & 0x01;
    let mut out = Vec::with_capacity(512);
    out.extend_from_slice(&query[0..2]);
    out.push(0x80 | rd);
    out.push(0x80 | rcode);
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&(answers.len() as u16).to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&query[12..question.end]);
    for record in answers {
        out.extend_from_slice(record);
    }
    out
}
