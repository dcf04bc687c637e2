//! Canned-response HTTP server for client tests.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Requests seen by the server, as (path, body).
pub type RequestLog = Arc<Mutex<Vec<(String, String)>>>;

/// A route: request path, response status and JSON body.
pub type Route = (&'static str, u16, &'static str);

/// Serve `routes` on a local port, one request per connection.
///
/// Returns the base URL (ending in `/2`) and the request log. Unknown paths
/// get a 404.
pub async fn serve(routes: Vec<Route>) -> (String, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: RequestLog = Arc::default();
    let seen = Arc::clone(&log);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let (path, body) = read_request(&mut socket).await;
            let (status, reply) = routes
                .iter()
                .find(|(route, _, _)| *route == path)
                .map(|(_, status, reply)| (*status, *reply))
                .unwrap_or((404, "{}"));
            seen.lock().unwrap().push((path, body));

            let response = format!(
                "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reply.len(),
                reply
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{}/2", addr), log)
}

async fn read_request(socket: &mut TcpStream) -> (String, String) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return (String::new(), String::new());
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let path = head.split_whitespace().nth(1).unwrap_or("").to_string();
    let length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let end = buf.len().min(header_end + length);
    let body = String::from_utf8_lossy(&buf[header_end..end]).into_owned();
    (path, body)
}
