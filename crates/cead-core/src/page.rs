//! Custom response page loader.

use std::path::Path;

use tracing::info;

use crate::error::FlowError;

/// Read the caller-supplied response file, once, before the listener
/// binds.
///
/// The bytes replace the entire default 200 response verbatim, status
/// line and headers included, so no validation of the content is
/// performed here.
pub fn load(path: &Path) -> Result<Vec<u8>, FlowError> {
    let bytes = std::fs::read(path).map_err(|source| FlowError::Page {
        path: path.to_path_buf(),
        source,
    })?;
    info!("loaded response page {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResultCode;
    use std::io::Write;

    #[test]
    fn test_loads_raw_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"HTTP/1.1 200 OK\r\n\r\nd\xc3\xa9an").unwrap();
        let bytes = load(file.path()).unwrap();
        assert_eq!(bytes, b"HTTP/1.1 200 OK\r\n\r\nd\xc3\xa9an");
    }

    #[test]
    fn test_missing_file_reports_file_code() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.html")).unwrap_err();
        assert_eq!(err.code(), ResultCode::File);
    }
}
