//! Sidecar scenarios run in-process against a fake cache, with durations
//! scaled down from seconds-long runs.

use dns_sidecar_application::ports::MetricsPort;
use std::collections::HashSet;
use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

mod helpers;
use helpers::{sample, FakeCache, SidecarConfig};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_happy_path() {
    let cache = FakeCache::start().await;
    let mut sidecar = SidecarConfig::new()
        .probe(&format!("ok,{},ok.local.,1", cache.addr()))
        .probe(&format!("nxdomain,{},nx.local.,1", cache.addr()))
        .start()
        .await;

    sleep(Duration::from_millis(3_300)).await;
    let body = sidecar.scrape().await;

    assert!(sample(&body, r#"probe_dns_total{probe="ok",result="ok"}"#).unwrap() >= 3.0);
    assert!(
        sample(&body, r#"probe_dns_total{probe="nxdomain",result="nxdomain"}"#).unwrap() >= 3.0
    );
    assert_eq!(sample(&body, r#"probe_dns_errors_total{probe="ok"}"#), Some(0.0));
    assert_eq!(sample(&body, r#"probe_dns_errors_total{probe="nxdomain"}"#), Some(0.0));
    assert_eq!(sample(&body, r#"probe_dns_healthy{probe="ok"}"#), Some(1.0));

    let (status, health) = sidecar.get("/healthcheck/nxdomain").await;
    assert_eq!(status, 200);
    assert!(health.contains(r#""result":"nxdomain""#));

    sidecar.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_server_absent() {
    let absent = UdpSocket::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let mut sidecar = SidecarConfig::new()
        .probe(&format!("notpresent,{},notpresent.local.,1", absent))
        .start()
        .await;

    sleep(Duration::from_millis(3_300)).await;
    let body = sidecar.scrape().await;

    let timeouts = sample(&body, r#"probe_dns_total{probe="notpresent",result="timeout"}"#)
        .unwrap_or(0.0);
    let errors = sample(&body, r#"probe_dns_total{probe="notpresent",result="error"}"#)
        .unwrap_or(0.0);
    assert!(timeouts >= 3.0 || errors >= 3.0, "{}", body);
    assert!(sample(&body, r#"probe_dns_errors_total{probe="notpresent"}"#).unwrap() >= 3.0);

    let (status, _) = sidecar.get("/healthcheck/notpresent").await;
    assert_eq!(status, 503);

    sidecar.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cache_size_gauge() {
    let cache = FakeCache::start().await;
    cache.set_stat("cachesize.bind.", "1337");
    let mut sidecar = SidecarConfig::new()
        .cache(cache.addr(), Duration::from_millis(200), &["cachesize"])
        .start()
        .await;

    sleep(Duration::from_millis(1_000)).await;
    let body = sidecar.scrape().await;

    assert_eq!(sample(&body, "dns_cache_cachesize"), Some(1337.0));
    assert!(body.contains("# TYPE dns_cache_cachesize gauge"));

    sidecar.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unparseable_stat_counts_one_error_per_query() {
    let cache = FakeCache::start().await;
    cache.set_stat("cachesize.bind.", "1337");
    let mut sidecar = SidecarConfig::new()
        .cache(cache.addr(), Duration::from_secs(60), &["cachesize"])
        .start()
        .await;

    sleep(Duration::from_millis(300)).await;
    assert_eq!(sample(&sidecar.scrape().await, "dns_cache_cachesize"), Some(1337.0));
    sidecar.shutdown().await;

    let cache = FakeCache::start().await;
    cache.set_stat("cachesize.bind.", "lots");
    let mut sidecar = SidecarConfig::new()
        .cache(cache.addr(), Duration::from_secs(60), &["cachesize"])
        .start()
        .await;

    sleep(Duration::from_millis(300)).await;
    let body = sidecar.scrape().await;
    assert_eq!(sample(&body, "dns_cache_scrape_errors_total"), Some(1.0));
    assert_eq!(sample(&body, "dns_cache_cachesize"), None);

    sidecar.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_under_load() {
    let cache = FakeCache::start().await;
    let mut sidecar = SidecarConfig::new()
        .cache(cache.addr(), Duration::from_millis(200), &["hits"])
        .start()
        .await;

    let client = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    client.connect(cache.addr()).await.unwrap();
    let mut buf = [0u8; 512];
    for id in 0..100u16 {
        client.send(&a_query(id, "load.local.")).await.unwrap();
        tokio::time::timeout(Duration::from_secs(1), client.recv(&mut buf))
            .await
            .unwrap()
            .unwrap();
        sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(cache.in_queries(), 100);

    let deadline = Instant::now() + Duration::from_secs(2);
    let mut hits = 0.0;
    while Instant::now() < deadline {
        hits = sample(&sidecar.scrape().await, "dns_cache_hits").unwrap_or(0.0);
        if hits >= 100.0 {
            break;
        }
        sleep(Duration::from_millis(100)).await;
    }
    assert!(hits >= 100.0, "dns_cache_hits = {}", hits);

    sidecar.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_graceful_shutdown_freezes_registry() {
    let cache = FakeCache::start().await;
    let mut sidecar = SidecarConfig::new()
        .probe(&format!("ok,{},ok.local.,1", cache.addr()))
        .start()
        .await;

    // Catch the moment right after a probe lands, so the next one is ~1s away.
    let series = r#"probe_dns_total{probe="ok",result="ok"}"#;
    let first = sample(&sidecar.scrape().await, series).unwrap_or(0.0);
    let mut before = sidecar.scrape().await;
    while sample(&before, series).unwrap_or(0.0) <= first {
        sleep(Duration::from_millis(10)).await;
        before = sidecar.scrape().await;
    }

    let started = Instant::now();
    sidecar.shutdown().await;
    assert!(started.elapsed() < Duration::from_secs(5));

    let after = String::from_utf8(sidecar.metrics.snapshot()).unwrap();
    sleep(Duration::from_millis(150)).await;
    let later = String::from_utf8(sidecar.metrics.snapshot()).unwrap();

    assert_eq!(before, after);
    assert_eq!(after, later);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_snapshot_consistency_under_concurrent_scrapes() {
    let cache = FakeCache::start().await;
    cache.set_stat("cachesize.bind.", "10");
    let mut sidecar = SidecarConfig::new()
        .probe(&format!("ok,{},ok.local.,1", cache.addr()))
        .probe(&format!("nxdomain,{},nx.local.,1", cache.addr()))
        .cache(cache.addr(), Duration::from_millis(100), &["cachesize", "hits"])
        .start()
        .await;

    let stop = Arc::new(AtomicBool::new(false));
    let url = format!("http://{}/metrics", sidecar.addr);
    let scrapers: Vec<_> = (0..16)
        .map(|_| {
            let stop = stop.clone();
            let url = url.clone();
            tokio::spawn(async move {
                let http = reqwest::Client::new();
                let mut scrapes = 0;
                while !stop.load(Ordering::Relaxed) {
                    let body = http.get(&url).send().await.unwrap().text().await.unwrap();
                    check_consistent(&body);
                    scrapes += 1;
                }
                scrapes
            })
        })
        .collect();

    sleep(Duration::from_millis(2_500)).await;
    stop.store(true, Ordering::Relaxed);

    for scrapes in futures::future::join_all(scrapers).await {
        assert!(scrapes.unwrap() > 0);
    }

    sidecar.shutdown().await;
}

/// Every sample has a `# TYPE` line for its family and appears once.
fn check_consistent(body: &str) {
    let mut typed = HashSet::new();
    let mut seen = HashSet::new();
    for line in body.lines() {
        if let Some(rest) = line.strip_prefix("# TYPE ") {
            let name = rest.split(' ').next().unwrap();
            typed.insert(name.to_string());
            continue;
        }
        if line.starts_with('#') || line.is_empty() {
            continue;
        }
        let series = line.rsplit_once(' ').unwrap().0;
        let name = series.split('{').next().unwrap();
        assert!(typed.contains(name), "sample without TYPE: {}", line);
        assert!(seen.insert(series.to_string()), "duplicate series: {}", series);
    }
}

fn a_query(id: u16, name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&id.to_be_bytes());
    out.extend_from_slice(&[0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0]);
    for label in name.trim_end_matches('.').split('.') {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out
}
