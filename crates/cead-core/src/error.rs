//! Flow error taxonomy and result codes.
//!
//! Every failure in the redirect flow maps to exactly one [`ResultCode`],
//! which the CLI encodes as a one-byte tag on stdout and a prefixed
//! diagnostic line on stderr. The pipeline halts at the first failure,
//! so at most one code is ever produced per invocation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Closed outcome taxonomy for the redirect flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Ok,
    /// The OS failed to launch the URL handler.
    Browser,
    /// The listening socket could not be set up.
    Server,
    /// Transport failure, or no usable redirect in the request.
    Network,
    /// No connection arrived within the wait window.
    Timeout,
    /// The custom response page could not be read.
    File,
    /// Catch-all; should not occur in correct operation.
    Unknown,
}

impl ResultCode {
    /// One-byte tag used in the stdout result protocol.
    pub fn tag(self) -> u8 {
        match self {
            ResultCode::Ok => b'+',
            ResultCode::Browser => b'B',
            ResultCode::Server => b'S',
            ResultCode::Network => b'N',
            ResultCode::Timeout => b'T',
            ResultCode::File => b'F',
            ResultCode::Unknown => b'U',
        }
    }

    /// Prefix of the stderr diagnostic line.
    pub fn name(self) -> &'static str {
        match self {
            ResultCode::Ok => "OK",
            ResultCode::Browser => "E_BROWSER",
            ResultCode::Server => "E_SERVER",
            ResultCode::Network => "E_NETWORK",
            ResultCode::Timeout => "E_TIMEOUT",
            ResultCode::File => "E_FILE",
            ResultCode::Unknown => "E_UNKNOWN",
        }
    }
}

/// A failure at any stage of the redirect flow.
///
/// The `Display` output is the detail portion of the stderr diagnostic;
/// the `E_*` prefix comes from [`ResultCode::name`]. There is no retry
/// or local recovery anywhere; one invocation is one attempt.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Custom response page could not be read.
    #[error("{}: {source}", .path.display())]
    Page { path: PathBuf, source: io::Error },

    /// Listening socket setup failed (bind or local address query).
    #[error("{op}: {source}")]
    Socket { op: &'static str, source: io::Error },

    /// The OS failed to launch the URL handler.
    #[error("open: {0}")]
    Browser(io::Error),

    /// Transport failure on the accepted connection.
    #[error("{op}: {source}")]
    Transport { op: &'static str, source: io::Error },

    /// The request carried no recognizable GET resource.
    #[error("HTTP: no resource")]
    NoResource,

    /// No connection arrived within the wait window.
    #[error("no connection within {0} seconds")]
    Timeout(u64),

    /// Templated URL exceeded the output bound.
    #[error("url exceeds {} bytes after substitution", crate::template::MAX_URL_LEN)]
    UrlTooLong,
}

impl FlowError {
    /// The result code this failure reports as.
    pub fn code(&self) -> ResultCode {
        match self {
            FlowError::Page { .. } => ResultCode::File,
            FlowError::Socket { .. } => ResultCode::Server,
            FlowError::Browser(_) => ResultCode::Browser,
            FlowError::Transport { .. } => ResultCode::Network,
            FlowError::NoResource => ResultCode::Network,
            FlowError::Timeout(_) => ResultCode::Timeout,
            FlowError::UrlTooLong => ResultCode::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_code_mapping() {
        let not_found = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = FlowError::Page {
            path: PathBuf::from("page.html"),
            source: not_found,
        };
        assert_eq!(err.code(), ResultCode::File);

        assert_eq!(FlowError::NoResource.code(), ResultCode::Network);
        assert_eq!(FlowError::Timeout(120).code(), ResultCode::Timeout);
        assert_eq!(FlowError::UrlTooLong.code(), ResultCode::Unknown);
    }

    #[test]
    fn test_diagnostic_detail() {
        assert_eq!(FlowError::NoResource.to_string(), "HTTP: no resource");
        assert_eq!(
            FlowError::Timeout(1).to_string(),
            "no connection within 1 seconds"
        );
    }

    #[test]
    fn test_tags_are_single_bytes() {
        assert_eq!(ResultCode::Browser.tag(), b'B');
        assert_eq!(ResultCode::Server.tag(), b'S');
        assert_eq!(ResultCode::Network.tag(), b'N');
        assert_eq!(ResultCode::Timeout.tag(), b'T');
        assert_eq!(ResultCode::File.tag(), b'F');
    }
}
