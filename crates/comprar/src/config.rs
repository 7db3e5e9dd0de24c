//! Run configuration: base URL, credentials, timeouts.
//!
//! Read once at process start and treated as immutable for the run.

use std::time::Duration;

/// Default storefront under test
pub const DEFAULT_BASE_URL: &str = "https://demowebshop.tricentis.com";

/// Default bound for element-level actions (15 seconds)
pub const DEFAULT_ACTION_TIMEOUT_MS: u64 = 15_000;

/// Default bound for full-page navigations (60 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 60_000;

/// Configuration for a storefront test run
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL all page navigations are resolved against
    pub base_url: String,
    /// Run the browser in headless mode
    pub headless: bool,
    /// Test account email
    pub email: String,
    /// Test account password
    pub password: String,
    /// Bound for element-level waits and actions
    pub action_timeout: Duration,
    /// Bound for navigation waits
    pub navigation_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            email: "testuser@example.com".to_string(),
            password: "Test@123".to_string(),
            action_timeout: Duration::from_millis(DEFAULT_ACTION_TIMEOUT_MS),
            navigation_timeout: Duration::from_millis(DEFAULT_NAVIGATION_TIMEOUT_MS),
        }
    }
}

impl StoreConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from the environment, falling back to defaults.
    ///
    /// Recognized variables: `BASE_URL`, `HEADLESS` (any value other
    /// than `false` keeps headless on), `TEST_USER_EMAIL`,
    /// `TEST_USER_PASSWORD`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("BASE_URL") {
            config.base_url = url;
        }
        if let Ok(headless) = std::env::var("HEADLESS") {
            config.headless = headless != "false";
        }
        if let Ok(email) = std::env::var("TEST_USER_EMAIL") {
            config.email = email;
        }
        if let Ok(password) = std::env::var("TEST_USER_PASSWORD") {
            config.password = password;
        }
        config
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the test credentials
    #[must_use]
    pub fn with_credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.email = email.into();
        self.password = password.into();
        self
    }

    /// Set the action timeout
    #[must_use]
    pub const fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    /// Set the navigation timeout
    #[must_use]
    pub const fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Resolve a path against the base URL
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() || path == "/" {
            format!("{base}/")
        } else {
            format!("{base}/{}", path.trim_start_matches('/'))
        }
    }
}
