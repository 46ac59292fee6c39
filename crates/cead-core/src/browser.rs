//! Browser launch adapter.
//!
//! Thin wrapper over the `open` crate, which knows the per-platform way
//! to hand a URL to the default browser. The core flow only sees the
//! launch outcome; all platform branching lives behind `open`.

use tracing::debug;

use crate::error::FlowError;

/// Open `url` in the user's default browser.
///
/// Returns once the handler has been launched. The user's interaction
/// with the browser is observed through the redirect listener, not here.
pub fn launch(url: &str) -> Result<(), FlowError> {
    debug!("launching browser on {}", url);
    open::that(url).map_err(FlowError::Browser)
}
