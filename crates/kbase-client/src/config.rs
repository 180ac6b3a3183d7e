use std::time::Duration;

use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9380";
pub const LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const BASE_URL_ENV: &str = "KBASE_API_URL";
const TIMEOUT_ENV: &str = "KBASE_HTTP_TIMEOUT_SECS";
const REDIRECT_DELAY_ENV: &str = "KBASE_REDIRECT_DELAY_MS";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Pause between an auth-failure warning and the login redirect.
    pub redirect_delay: Duration,
    pub login_route: String,
    /// Overrides the bundled server key when set.
    pub public_key_pem: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            login_route: LOGIN_ROUTE.to_string(),
            public_key_pem: None,
        }
    }
}

impl ClientConfig {
    /// Reads the environment, falling back to defaults for anything unset
    /// or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = read_env(BASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            config.base_url = url;
        }
        if let Some(secs) = read_env_number(TIMEOUT_ENV) {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(millis) = read_env_number(REDIRECT_DELAY_ENV) {
            config.redirect_delay = Duration::from_millis(millis);
        }
        config
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    #[must_use]
    pub fn with_public_key_pem(mut self, pem: impl Into<String>) -> Self {
        self.public_key_pem = Some(pem.into());
        self
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn read_env_number(name: &str) -> Option<u64> {
    let raw = read_env(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = %name, value = %raw, "ignoring non-numeric setting");
            None
        }
    }
}
