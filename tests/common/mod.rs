//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use tx_reconciler::config::ApiConfig;
use tx_reconciler::resilience::{RateLimiter, RetryPolicy};
use tx_reconciler::QueryClient;

/// A running mock API.
pub struct MockApi {
    pub addr: SocketAddr,
    hits: Arc<AtomicU32>,
}

impl MockApi {
    /// Base endpoint mirroring the real API layout.
    pub fn endpoint(&self) -> String {
        format!("http://{}/vipapi/tx", self.addr)
    }

    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the request line (`GET /path?query HTTP/1.1`) and returns
/// the status code and body to send.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockApi
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let f = Arc::new(f);

    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]);
                        let request_line = request.lines().next().unwrap_or_default().to_string();
                        counter.fetch_add(1, Ordering::SeqCst);

                        let (status, body) = f(request_line).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockApi { addr, hits }
}

/// A successful envelope carrying one token transfer.
pub fn token_transfer_body(native_value: &str, token_value: &str, decimals: &str) -> String {
    format!(
        r#"{{"code":1,"msg":"成功","enMsg":"SUCCESS","data":{{"txid":"0x1","value":"{}","tokenTransfer":[{{"index":1,"tokenSymbol":"USDT","tokenDecimals":"{}","value":"{}"}}]}}}}"#,
        native_value, decimals, token_value
    )
}

/// A successful envelope with only a native value.
pub fn native_body(value: &str) -> String {
    format!(r#"{{"code":1,"msg":"成功","data":{{"txid":"0x1","value":"{}","tokenTransfer":[]}}}}"#, value)
}

/// A client against `endpoint` with short retry delays.
pub fn test_client(endpoint: &str, timeout_secs: u64) -> QueryClient {
    let config = ApiConfig {
        endpoint: endpoint.to_string(),
        api_key: "test-key".to_string(),
        chain_symbol: "bsc".to_string(),
        request_timeout_secs: timeout_secs,
    };
    let limiter = RateLimiter::new(100, Duration::from_secs(60)).unwrap();
    QueryClient::new(&config, limiter)
        .unwrap()
        .with_retry_policy(RetryPolicy::new(3, vec![Duration::from_millis(20), Duration::from_millis(40)]))
}
