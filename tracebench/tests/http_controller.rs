//! Wire-level behavior of the HTTP control source against a raw socket
//! responder.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracebench::{BenchError, ControlSource, HttpControlSource, RunResult};

/// Serves exactly one connection with a canned response and hands back the
/// raw request bytes.
async fn serve_once(response: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let n = socket.read(&mut buf).await.unwrap();
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&buf[..n]).into_owned()
    });
    (format!("http://{addr}"), handle)
}

fn ok_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}

#[tokio::test]
async fn fetch_parses_controller_body() {
    let body = r#"{"Concurrent":1,"Work":1000,"Repeat":5,"Sleep":100,"SleepInterval":50000000,
        "BytesPerLog":10,"NumLogs":2,"Trace":true,"NoFlush":false,"Exit":false}"#;
    let (base, server) = serve_once(ok_response(body)).await;

    let control = HttpControlSource::new(&base).fetch_control().await.unwrap();
    assert_eq!(control.repeat, 5);
    assert_eq!(control.work, 1000);
    assert!(control.trace);

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /control HTTP/1.1\r\n"));
}

#[tokio::test]
async fn fetch_rejects_malformed_body() {
    let (base, _server) = serve_once(ok_response("these are not the fields")).await;

    let err = HttpControlSource::new(&base).fetch_control().await.unwrap_err();
    assert!(matches!(err, BenchError::MalformedDescriptor(_)));
}

#[tokio::test]
async fn fetch_maps_error_status_to_transport() {
    let response = "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n";
    let (base, _server) = serve_once(response.to_owned()).await;

    let err = HttpControlSource::new(&base).fetch_control().await.unwrap_err();
    assert!(matches!(err, BenchError::Transport(_)));
}

#[tokio::test]
async fn fetch_maps_connection_failure_to_transport() {
    // Nothing listens on the discard port.
    let source = HttpControlSource::new("http://127.0.0.1:9");
    let err = source.fetch_control().await.unwrap_err();
    assert!(matches!(err, BenchError::Transport(_)));
}

#[tokio::test]
async fn report_encodes_result_as_query_parameters() {
    let (base, server) = serve_once(ok_response("")).await;

    let result = RunResult {
        elapsed: Duration::from_millis(1500),
        flush: Duration::from_millis(250),
        checksum: 42,
        sleeps: vec![Duration::from_millis(1), Duration::from_millis(2)],
    };
    HttpControlSource::new(&base)
        .report_result(&result)
        .await
        .unwrap();

    let request = server.await.unwrap();
    let request_line = request.lines().next().unwrap();
    assert!(request_line.starts_with("GET /result?"));
    assert!(request_line.contains("timing=1.5"));
    assert!(request_line.contains("flush=0.25"));
    assert!(request_line.contains("s=1000000%2C2000000"));
    assert!(request_line.contains("a=42"));
}

#[tokio::test]
async fn base_url_trailing_slash_is_tolerated() {
    let body = r#"{"Work":0,"Repeat":0,"Sleep":0,"SleepInterval":0,"Trace":false,"Exit":true}"#;
    let (base, server) = serve_once(ok_response(body)).await;

    let control = HttpControlSource::new(&format!("{base}/"))
        .fetch_control()
        .await
        .unwrap();
    assert!(control.exit);
    let request = server.await.unwrap();
    assert!(request.starts_with("GET /control "));
}
