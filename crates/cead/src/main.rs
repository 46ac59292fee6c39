mod report;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cead_core::{browser, page, template, FlowError, RedirectServer};

/// Default wait for the redirect, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Parser, Debug)]
#[command(
    name = "cead",
    about = "Open a browser authorization URL and capture the loopback redirect"
)]
struct Args {
    /// Authorization URL to open; a `[]` marker is replaced with the
    /// bound port before launch.
    #[arg(value_name = "URL", value_parser = parse_http_url)]
    url: String,

    /// Listening port (0 = let the OS choose).
    #[arg(short = 'p', long = "port", default_value_t = 0)]
    port: u16,

    /// Seconds to wait for the redirect, counted from bind.
    #[arg(short = 't', long = "timeout", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// File served verbatim as the HTTP response on success. Must be a
    /// complete response, status line and headers included.
    #[arg(short = 'F', long = "page", value_name = "PATH")]
    page: Option<PathBuf>,
}

fn parse_http_url(value: &str) -> Result<String, String> {
    if value.starts_with("http:") || value.starts_with("https:") {
        Ok(value.to_string())
    } else {
        Err("URL must begin with http: or https:".to_string())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the result protocol; all logging goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(resource) => report::success(&resource),
        Err(err) => report::failure(&err),
    }
}

async fn run(args: Args) -> Result<String, FlowError> {
    // Load (and thereby validate) the custom page before anything binds.
    let page = args.page.as_deref().map(page::load).transpose()?;

    let server = RedirectServer::bind(args.port, Duration::from_secs(args.timeout)).await?;
    let url = template::render(&args.url, server.port())?;

    browser::launch(&url)?;
    info!("waiting up to {}s for the redirect", args.timeout);

    server.capture(page.as_deref()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_scheme_is_enforced() {
        assert!(parse_http_url("http://127.0.0.1:[]/cb").is_ok());
        assert!(parse_http_url("https://idp.example/auth").is_ok());
        assert!(parse_http_url("ftp://idp.example").is_err());
        assert!(parse_http_url("idp.example/auth").is_err());
    }

    #[test]
    fn test_args_accept_attached_short_values() {
        let args = Args::parse_from([
            "cead",
            "-p8080",
            "-t30",
            "-Fpage.html",
            "http://127.0.0.1:[]/cb",
        ]);
        assert_eq!(args.port, 8080);
        assert_eq!(args.timeout, 30);
        assert_eq!(args.page.as_deref(), Some(std::path::Path::new("page.html")));
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["cead", "http://127.0.0.1:[]/cb"]);
        assert_eq!(args.port, 0);
        assert_eq!(args.timeout, DEFAULT_TIMEOUT_SECS);
        assert!(args.page.is_none());
    }
}
