use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

pub enum Reply {
    Respond(Vec<u8>),
    Ignore,
}

type Handler = Arc<dyn Fn(&[u8], bool) -> Reply + Send + Sync>;

/// Scriptable DNS server on an ephemeral loopback port, UDP and TCP.
///
/// The handler receives the raw query and whether it arrived over TCP.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&[u8], bool) -> Reply + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let listener = TcpListener::bind(addr).await.unwrap();

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let udp_handler = handler.clone();
        let udp_count = udp_queries.clone();
        let tcp_count = tcp_queries.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_count.fetch_add(1, Ordering::SeqCst);
                            if let Reply::Respond(bytes) = udp_handler(&buf[..len], false) {
                                let _ = socket.send_to(&bytes, peer).await;
                            }
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            let handler = handler.clone();
                            let tcp_count = tcp_count.clone();
                            tokio::spawn(async move {
                                let mut len = [0u8; 2];
                                if stream.read_exact(&mut len).await.is_err() {
                                    return;
                                }
                                let mut query = vec![0u8; u16::from_be_bytes(len) as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    return;
                                }
                                tcp_count.fetch_add(1, Ordering::SeqCst);
                                if let Reply::Respond(bytes) = handler(&query, true) {
                                    let _ = stream.write_all(&(bytes.len() as u16).to_be_bytes()).await;
                                    let _ = stream.write_all(&bytes).await;
                                }
                            });
                        }
                    }
                }
            }
        });

        Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
