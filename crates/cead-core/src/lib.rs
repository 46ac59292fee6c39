//! Cead: loopback OAuth2 redirect capture.
//!
//! Implements the local half of a browser authorization flow: bind an
//! ephemeral port on 127.0.0.1, open the system browser on a
//! caller-supplied URL (with the bound port substituted for a `[]`
//! placeholder), wait for the single redirect request the browser
//! sends back, and hand the redirect resource to the caller. The
//! resource is passed through verbatim; token exchange and payload
//! interpretation happen in the invoking process.

pub mod browser;
pub mod error;
pub mod page;
pub mod server;
pub mod template;

pub use error::{FlowError, ResultCode};
pub use server::RedirectServer;
