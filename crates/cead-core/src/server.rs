//! One-shot loopback redirect listener.
//!
//! Accepts exactly one connection on 127.0.0.1, reads one request,
//! extracts the resource from a `GET <resource> ...` request line and
//! answers with a fixed HTML page (or a caller-supplied one). The wait
//! window starts at bind time, so a slow browser launch consumes part
//! of the timeout budget.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::error::FlowError;

/// Cap on the bytes read from the one accepted connection. Browser
/// redirects are short GETs that arrive in the first segment; a request
/// line that does not fit surfaces as "no resource", same as malformed
/// input.
pub const MAX_REQUEST_LEN: usize = 2048;

const AUTHORIZED_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Cead - Authorized</title>
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; text-align: center; padding: 4rem;">
    <h1>Cead</h1>
    <p>Authorization complete. You can close this tab.</p>
</body>
</html>"#;

const NOT_FOUND_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Cead - Not Found</title>
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; text-align: center; padding: 4rem;">
    <h1>Cead</h1>
    <p>No authorization redirect was found in the request.</p>
</body>
</html>"#;

/// Loopback server that captures a single browser redirect.
pub struct RedirectServer {
    listener: TcpListener,
    port: u16,
    deadline: Instant,
    wait_secs: u64,
}

impl RedirectServer {
    /// Bind the loopback listener and start the wait clock.
    ///
    /// `requested_port` 0 lets the OS pick an ephemeral port; the
    /// actual port is reported by [`RedirectServer::port`]. All
    /// failures here are setup failures (`E_SERVER`).
    pub async fn bind(requested_port: u16, wait: Duration) -> Result<Self, FlowError> {
        let deadline = Instant::now() + wait;

        let listener = TcpListener::bind(("127.0.0.1", requested_port))
            .await
            .map_err(|source| FlowError::Socket { op: "bind", source })?;

        let port = listener
            .local_addr()
            .map_err(|source| FlowError::Socket { op: "local_addr", source })?
            .port();

        info!("redirect listener bound on 127.0.0.1:{}", port);

        Ok(Self {
            listener,
            port,
            deadline,
            wait_secs: wait.as_secs(),
        })
    }

    /// The port the listener is actually bound to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Wait for the one redirect and return the extracted resource.
    ///
    /// Consumes the server: the listening socket is dropped on every
    /// exit path, so no second connection is ever accepted and the port
    /// is released even on failure. The browser always gets an HTTP
    /// answer once a connection is accepted: `page` verbatim (or the
    /// built-in 200 page) when a resource was found, the built-in 404
    /// page when not. Only a found resource counts as success for the
    /// invoking process.
    pub async fn capture(self, page: Option<&[u8]>) -> Result<String, FlowError> {
        let (mut stream, peer) = match timeout_at(self.deadline, self.listener.accept()).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(source)) => return Err(FlowError::Transport { op: "accept", source }),
            Err(_) => return Err(FlowError::Timeout(self.wait_secs)),
        };
        debug!("accepted redirect connection from {}", peer);

        let mut buf = [0u8; MAX_REQUEST_LEN];
        let n = stream
            .read(&mut buf)
            .await
            .map_err(|source| FlowError::Transport { op: "recv", source })?;

        let resource = extract_resource(&buf[..n]);

        // One best-effort send; a partial write or a browser that hung
        // up early does not change the flow outcome.
        let default_response;
        let response: &[u8] = match (&resource, page) {
            (Some(_), Some(bytes)) => bytes,
            (Some(_), None) => {
                default_response = http_response("200 OK", AUTHORIZED_HTML);
                default_response.as_bytes()
            }
            (None, _) => {
                default_response = http_response("404 Not Found", NOT_FOUND_HTML);
                default_response.as_bytes()
            }
        };
        let _ = stream.write(response).await;

        match resource {
            Some(resource) => {
                info!("captured redirect resource ({} bytes)", resource.len());
                Ok(resource)
            }
            None => {
                warn!("request carried no GET resource");
                Err(FlowError::NoResource)
            }
        }
    }
}

/// Pull the resource out of a raw request.
///
/// Only `GET <resource> ...` is recognized; the resource runs from just
/// after the method token to the next space, CR or LF. A request with
/// no such delimiter (truncated at the cap, or malformed) yields `None`.
fn extract_resource(request: &[u8]) -> Option<String> {
    let rest = request.strip_prefix(b"GET ")?;
    let end = rest
        .iter()
        .position(|&b| b == b' ' || b == b'\r' || b == b'\n')?;
    if end == 0 {
        return None;
    }
    let resource = std::str::from_utf8(&rest[..end]).ok()?;
    Some(resource.to_string())
}

/// Build a complete HTTP response for one of the built-in pages.
fn http_response(status: &str, html: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        html.len(),
        html
    )
}
