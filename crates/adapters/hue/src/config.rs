//! Bridge connection settings, read from `bridge.yml`.

use serde::Deserialize;

/// Where the bridge is and which whitelisted user to talk as.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Bridge address, e.g. `192.168.1.20`.
    pub ip: String,
    /// Whitelisted API user name.
    pub user: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    5
}

impl BridgeConfig {
    /// Root of the user's API, e.g. `http://192.168.1.20/api/0123abcd`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api/{}", self.ip.trim_end_matches('/'), self.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_deserialize_from_yaml() {
        let config: BridgeConfig =
            serde_yaml::from_str("ip: 192.168.1.20\nuser: 0123456789abcdef\n").unwrap();
        assert_eq!(config.ip, "192.168.1.20");
        assert_eq!(config.user, "0123456789abcdef");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn should_build_base_url() {
        let config = BridgeConfig {
            ip: "10.0.0.2".to_string(),
            user: "abc".to_string(),
            timeout_secs: 5,
        };
        assert_eq!(config.base_url(), "http://10.0.0.2/api/abc");
    }
}
