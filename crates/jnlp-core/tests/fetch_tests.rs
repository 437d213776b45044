//! HttpFetcher against a one-shot local HTTP server.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use jnlp_core::{FetchError, FetchOptions, Fetcher, HttpFetcher};
use pretty_assertions::assert_eq;

/// Serve exactly one request with `status` and `body`; returns the base URI
/// and a handle yielding the request line.
fn serve_once(status: &str, body: &'static [u8]) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let status = status.to_string();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }

        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .unwrap();
        stream.write_all(body).unwrap();
        stream.flush().unwrap();
        request_line.trim_end().to_string()
    });

    (format!("http://{addr}"), handle)
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(FetchOptions {
        timeout: Duration::from_secs(10),
        insecure: false,
    })
    .unwrap()
}

#[test]
fn test_fetch_body() {
    let (base, server) = serve_once("200 OK", b"jar bytes");

    let body = fetcher().fetch(&format!("{base}/app/viewer.jar")).unwrap();

    assert_eq!(body, b"jar bytes");
    assert_eq!(server.join().unwrap(), "GET /app/viewer.jar HTTP/1.1");
}

#[test]
fn test_fetch_not_found() {
    let (base, server) = serve_once("404 Not Found", b"nope");
    let uri = format!("{base}/missing.jar");

    let result = fetcher().fetch(&uri);

    match result {
        Err(FetchError::Status { uri: failed, status }) => {
            assert_eq!(failed, uri);
            assert_eq!(status, 404);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    server.join().unwrap();
}

#[test]
fn test_fetch_server_error() {
    let (base, server) = serve_once("503 Service Unavailable", b"");

    let result = fetcher().fetch(&format!("{base}/x.jar"));

    assert!(matches!(
        result,
        Err(FetchError::Status { status: 503, .. })
    ));
    server.join().unwrap();
}
