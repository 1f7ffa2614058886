//! Shared User-Agent string for session client traffic.
//!
//! Single source for the UA format so all requests through the session
//! layer identify the library consistently (good citizenship; RFC 9308).

/// Library identifier appended to every User-Agent.
const LIBRARY_ID: &str = "websession-rs";

/// User-Agent for session traffic: `websession/<version> (<contact>) via <library-id>`.
#[must_use]
pub(crate) fn session_user_agent(contact: &str) -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("websession/{version} ({contact}) via {LIBRARY_ID}")
}
