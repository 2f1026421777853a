#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener, UdpSocket};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Duration;
use tokio::time::{sleep, Instant};

pub fn free_tcp_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// A UDP socket that receives queries and never answers them.
pub fn silent_dns_server() -> UdpSocket {
    UdpSocket::bind("127.0.0.1:0").unwrap()
}

pub struct Sidecar {
    pub child: Child,
    pub addr: SocketAddr,
}

impl Sidecar {
    pub fn spawn(addr: SocketAddr, extra_args: &[&str]) -> Self {
        let child = Command::new(env!("CARGO_BIN_EXE_dns-sidecar"))
            .arg("--listen-addr")
            .arg(addr.to_string())
            .args(extra_args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        Self { child, addr }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn signal(&self, signal: libc::c_int) {
        let rc = unsafe { libc::kill(self.child.id() as libc::pid_t, signal) };
        assert_eq!(rc, 0, "kill failed");
    }

    pub async fn get(&self, path: &str) -> Option<(u16, String)> {
        let response = reqwest::Client::new()
            .get(self.url(path))
            .timeout(Duration::from_secs(1))
            .send()
            .await
            .ok()?;
        let status = response.status().as_u16();
        let body = response.text().await.ok()?;
        Some((status, body))
    }

    pub async fn wait_until_healthy(&self, within: Duration) {
        let deadline = Instant::now() + within;
        while Instant::now() < deadline {
            if let Some((200, _)) = self.get("/healthz").await {
                return;
            }
            sleep(Duration::from_millis(50)).await;
        }
        panic!("sidecar did not become healthy within {:?}", within);
    }

    pub async fn wait_for_exit(&mut self, within: Duration) -> Option<ExitStatus> {
        let deadline = Instant::now() + within;
        while Instant::now() < deadline {
            if let Some(status) = self.child.try_wait().unwrap() {
                return Some(status);
            }
            sleep(Duration::from_millis(20)).await;
        }
        None
    }
}

impl Drop for Sidecar {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Runs the binary to completion and returns its exit status.
pub fn run_to_exit(args: &[&str]) -> ExitStatus {
    Command::new(env!("CARGO_BIN_EXE_dns-sidecar"))
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap()
}
