//! Edge case tests for fritos-net
//!
//! Each test runs against a throwaway HTTP server on the loopback interface.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use fritos_net::*;

// ============================================================================
// LOOPBACK SERVER
// ============================================================================

/// Read one request: headers plus a Content-Length body
fn read_request(stream: &mut TcpStream) -> String {
    stream.set_read_timeout(Some(Duration::from_secs(5))).ok();
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        data.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&data).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let body_len = text
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if data.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

/// Serve one canned response and hand back the request that was received
fn serve_once(status: &str, content_type: &str, body: &str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    );
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let request = read_request(&mut stream);
            let _ = stream.write_all(response.as_bytes());
            let _ = tx.send(request);
        }
    });
    (format!("http://{}/api", addr), rx)
}

#[derive(Debug)]
enum Outcome {
    Success(RemoteData),
    Error(RemoteError),
}

fn options_into(tx: mpsc::Sender<Outcome>) -> RemoteCallOptions {
    let err_tx = tx.clone();
    RemoteCallOptions::new()
        .on_success(move |data| {
            let _ = tx.send(Outcome::Success(data));
        })
        .on_error(move |e| {
            let _ = err_tx.send(Outcome::Error(e));
        })
}

// ============================================================================
// AWAITABLE FORM
// ============================================================================

#[test]
fn test_json_response_is_parsed() {
    let (url, _) = serve_once("200 OK", "application/json", r#"{"name": "fritos", "n": 3}"#);
    let data = smol::block_on(fetch_remote(&url, &RemoteRequest::get())).unwrap();

    let json = data.as_json().unwrap();
    assert_eq!(json["name"], "fritos");
    assert_eq!(json["n"], 3);
}

#[test]
fn test_non_json_body_falls_back_to_text() {
    let (url, _) = serve_once("200 OK", "text/plain", "plain words");
    let data = smol::block_on(fetch_remote(&url, &RemoteRequest::get())).unwrap();
    assert_eq!(data, RemoteData::Text("plain words".to_string()));
}

#[test]
fn test_error_status_is_reported_before_parsing() {
    let (url, _) = serve_once("500 Internal Server Error", "application/json", r#"{"error": true}"#);
    let err = smol::block_on(fetch_remote(&url, &RemoteRequest::get())).unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(matches!(err, RemoteError::Status { ref reason, .. } if reason == "Internal Server Error"));
}

#[test]
fn test_post_sends_method_headers_and_body() {
    let (url, received) = serve_once("201 Created", "text/plain", "");
    let request = RemoteRequest::post().with_header("X-Trace", "t-1").with_json(r#"{"a":1}"#);
    let client = RemoteClient::with_config(NetConfig::default().user_agent("fritos-test")).unwrap();

    let data = smol::block_on(client.send(&url, &request)).unwrap();
    assert_eq!(data, RemoteData::Text(String::new()));

    let raw = received.recv_timeout(Duration::from_secs(5)).unwrap();
    let lower = raw.to_ascii_lowercase();
    assert!(raw.starts_with("POST /api HTTP/1.1"));
    assert!(lower.contains("x-trace: t-1"));
    assert!(lower.contains("content-type: application/json"));
    assert!(lower.contains("user-agent: fritos-test"));
    assert!(raw.ends_with(r#"{"a":1}"#));
}

#[test]
fn test_connection_refused_is_network_error() {
    // Bind then drop to get a port nobody listens on
    let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let url = format!("http://127.0.0.1:{}/", port);
    let err = smol::block_on(fetch_remote(&url, &RemoteRequest::get())).unwrap_err();
    assert!(matches!(err, RemoteError::Network(_)), "got {:?}", err);
}

// ============================================================================
// FIRE AND FORGET
// ============================================================================

#[test]
fn test_remote_call_success_callback() {
    let (url, _) = serve_once("200 OK", "application/json", "[1, 2, 3]");
    let (tx, rx) = mpsc::channel();

    remote_call(&url, options_into(tx));

    match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
        Outcome::Success(data) => assert_eq!(data.as_json().and_then(|v| v.as_array()).map(Vec::len), Some(3)),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_silent_server_times_out_exactly_once() {
    // Accepts connections through the backlog but never answers
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/slow", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();

    remote_call(&url, options_into(tx).timeout(Duration::from_millis(300)));

    match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
        Outcome::Error(e) => assert_eq!(e, RemoteError::Timeout(Duration::from_millis(300))),
        other => panic!("unexpected outcome {:?}", other),
    }
    // Callbacks are consumed; the channel disconnects without a second message
    assert!(rx.recv_timeout(Duration::from_secs(1)).is_err());
    drop(listener);
}

#[test]
fn test_abandoned_request_closes_within_grace() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/slow", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let start = Instant::now();
            read_request(&mut stream);
            // Hold the request open until the client hangs up
            stream.set_read_timeout(Some(Duration::from_secs(10))).ok();
            let mut buf = [0u8; 64];
            while matches!(stream.read(&mut buf), Ok(n) if n > 0) {}
            let _ = tx.send(start.elapsed());
        }
    });

    let client = RemoteClient::with_config(NetConfig::default().timeout_grace(Duration::from_millis(200))).unwrap();
    let request = RemoteRequest::get().with_timeout(Duration::from_millis(300));
    let err = smol::block_on(client.send(&url, &request)).unwrap_err();
    assert!(err.is_timeout());

    let held = rx.recv_timeout(Duration::from_secs(15)).unwrap();
    assert!(held < Duration::from_secs(5), "socket held for {:?}", held);
}

#[test]
fn test_remote_call_invalid_url() {
    let (tx, rx) = mpsc::channel();
    remote_call("::not-a-url::", options_into(tx));

    match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
        Outcome::Error(RemoteError::InvalidUrl(msg)) => assert!(msg.contains("::not-a-url::")),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_remote_call_without_callbacks_is_harmless() {
    let (url, received) = serve_once("200 OK", "text/plain", "ignored");
    remote_call(&url, RemoteCallOptions::new());
    assert!(received.recv_timeout(Duration::from_secs(10)).is_ok());
}
