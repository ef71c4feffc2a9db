//! Configuration for the hosting-platform connection.
use secrecy::SecretString;

/// Label applied to the original pull request when a backport target fails.
///
/// Deliberately contains no space so it can never match the backport request
/// label pattern and re-trigger a run.
pub const FAILED_LABEL: &str = "backport:failed";

/// Remote repository connection configuration for authenticating and
/// interacting with the hosting platform.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Remote host (e.g., "github.com").
    pub host: String,
    /// URL scheme (http or https).
    pub scheme: String,
    /// API base url (e.g., "https://api.github.com").
    pub api_url: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Access token for authentication.
    pub token: SecretString,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "".to_string(),
            scheme: "".to_string(),
            api_url: "".to_string(),
            owner: "".to_string(),
            repo: "".to_string(),
            token: SecretString::from("".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_label_never_matches_the_request_pattern() {
        let re = regex::Regex::new(r"^backport ([^ ]+)(?: ([^ ]+))?$")
            .unwrap();
        assert!(!re.is_match(FAILED_LABEL));
    }

    #[test]
    fn default_remote_config_is_empty() {
        let remote = RemoteConfig::default();
        assert!(remote.owner.is_empty());
        assert!(remote.api_url.is_empty());
    }
}
