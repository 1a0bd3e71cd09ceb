// ── Runtime console configuration ──
//
// Describes *where* the console talks to and how patiently. Never touches
// disk; the CLI builds a `ConsoleConfig` from profiles and hands it in.

use std::time::Duration;

use url::Url;

use offsetcf_api::DEFAULT_API_URL;

/// Configuration for one console session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// API root (e.g. `https://api.offsetcf.com`).
    pub api_url: Url,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL
                .parse()
                .expect("DEFAULT_API_URL is a valid URL"),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ConsoleConfig {
    /// Config targeting a specific API host with the default timeout.
    pub fn for_url(api_url: Url) -> Self {
        Self {
            api_url,
            ..Self::default()
        }
    }
}
