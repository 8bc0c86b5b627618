//! Network configuration

use std::time::Duration;

/// Client configuration shared by every call made through a `RemoteClient`
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// User agent string
    pub user_agent: String,
    /// Extra time the HTTP layer gets past the caller's timeout, so an
    /// abandoned request still frees its worker thread
    pub timeout_grace: Duration,
    /// Default headers sent with every request
    pub default_headers: Vec<(String, String)>,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            user_agent: "fritos/0.1".into(),
            timeout_grace: Duration::from_secs(1),
            default_headers: Vec::new(),
        }
    }
}

impl NetConfig {
    pub fn user_agent(mut self, ua: &str) -> Self {
        self.user_agent = ua.to_string();
        self
    }

    pub fn timeout_grace(mut self, grace: Duration) -> Self {
        self.timeout_grace = grace;
        self
    }

    pub fn default_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers.push((name.to_string(), value.to_string()));
        self
    }
}
