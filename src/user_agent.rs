//! Shared User-Agent string for every request the tool makes.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/hemzaz/lsweb";

/// Default User-Agent for page, API and download requests (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("lsweb/{version} (+{PROJECT_UA_URL})")
}
