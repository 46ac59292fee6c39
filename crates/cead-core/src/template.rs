//! Redirect URL templating.
//!
//! The caller's URL may carry a `[]` placeholder for the bound port,
//! typically inside an encoded `redirect_uri` query parameter.
//! Substitution runs as three pure stages: literal `%` characters are
//! escaped to a sentinel byte, the placeholder is replaced with the
//! decimal port, and the sentinel is restored. Percent-encoded bytes
//! already present in the URL (e.g. `%3D`) must come out untouched;
//! the stages exist to keep that invariant auditable in isolation.

use crate::error::FlowError;

/// Marker replaced with the decimal bound port.
pub const PORT_PLACEHOLDER: &str = "[]";

/// Bound on the templated URL length; exceeding it is an explicit
/// error, never a silent truncation.
pub const MAX_URL_LEN: usize = 1024;

/// Stand-in for literal `%` between the escape and restore stages.
/// 0x01 cannot appear in a valid URL.
const PERCENT_SENTINEL: &str = "\u{0001}";

/// Substitute `port` for the first [`PORT_PLACEHOLDER`] in `pattern`.
///
/// A pattern without a placeholder passes through unchanged. Literal
/// `%` characters round-trip unchanged in either case.
pub fn render(pattern: &str, port: u16) -> Result<String, FlowError> {
    let url = restore_percents(&substitute_port(&escape_percents(pattern), port));
    if url.len() > MAX_URL_LEN {
        return Err(FlowError::UrlTooLong);
    }
    Ok(url)
}

fn escape_percents(pattern: &str) -> String {
    pattern.replace('%', PERCENT_SENTINEL)
}

fn substitute_port(pattern: &str, port: u16) -> String {
    pattern.replacen(PORT_PLACEHOLDER, &port.to_string(), 1)
}

fn restore_percents(url: &str) -> String {
    url.replace(PERCENT_SENTINEL, "%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResultCode;

    #[test]
    fn test_substitutes_port() {
        let url = render("http://127.0.0.1:[]/callback", 8080).unwrap();
        assert_eq!(url, "http://127.0.0.1:8080/callback");
    }

    #[test]
    fn test_percents_round_trip() {
        let pattern = "https://idp.example/auth?redirect_uri=http%3A%2F%2F127.0.0.1%3A[]%2F&x=%3D";
        let url = render(pattern, 49152).unwrap();
        assert_eq!(
            url,
            "https://idp.example/auth?redirect_uri=http%3A%2F%2F127.0.0.1%3A49152%2F&x=%3D"
        );
    }

    #[test]
    fn test_only_first_placeholder_replaced() {
        let url = render("http://h/[]/[]", 7).unwrap();
        assert_eq!(url, "http://h/7/[]");
    }

    #[test]
    fn test_no_placeholder_is_identity() {
        let pattern = "https://idp.example/auth?scope=a%20b";
        assert_eq!(render(pattern, 1234).unwrap(), pattern);
    }

    #[test]
    fn test_overlong_url_rejected() {
        let pattern = format!("http://h/{}?p=[]", "a".repeat(MAX_URL_LEN));
        let err = render(&pattern, 65535).unwrap_err();
        assert_eq!(err.code(), ResultCode::Unknown);
    }

    #[test]
    fn test_length_bound_is_inclusive() {
        // Exactly MAX_URL_LEN bytes after substitution is still fine.
        let prefix = "http://h/?p=";
        let port = 65535u16;
        let filler = "a".repeat(MAX_URL_LEN - prefix.len() - 5);
        let pattern = format!("{}{}[]", prefix, filler);
        let url = render(&pattern, port).unwrap();
        assert_eq!(url.len(), MAX_URL_LEN);
    }
}
