//! Driver capability: the seam between page objects and a browser.
//!
//! Page objects are written against the [`ComprarDriver`] trait, never
//! against a concrete browser. Two implementations ship here:
//!
//! - [`MockDriver`]: a scripted in-memory driver for unit and scenario
//!   tests. Elements are stubbed by their locator's canonical string.
//! - `CdpDriver` (behind the `browser` feature): real browser control
//!   over the Chrome DevTools Protocol, resolving locators by
//!   evaluating their JavaScript query expressions in the page.
//!
//! All methods take `&self`; drivers use interior mutability so a
//! single driver can be shared across the page objects of a scenario.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::locator::Locator;
use crate::result::{ComprarError, ComprarResult};

/// Poll interval for wait loops (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Capability for driving a storefront page
#[async_trait]
pub trait ComprarDriver: Send + Sync {
    /// Navigate to an absolute URL
    async fn goto(&self, url: &str) -> ComprarResult<()>;

    /// Wait until the current document has finished loading
    async fn wait_for_page_load(&self, timeout: Duration) -> ComprarResult<()>;

    /// Wait until at least one match for `locator` is visible
    async fn wait_for_visible(&self, locator: &Locator, timeout: Duration) -> ComprarResult<()>;

    /// Check whether any match for `locator` is currently visible
    async fn is_visible(&self, locator: &Locator) -> ComprarResult<bool>;

    /// Click the first match
    async fn click(&self, locator: &Locator) -> ComprarResult<()>;

    /// Replace the first match's value with `text`
    async fn fill(&self, locator: &Locator, text: &str) -> ComprarResult<()>;

    /// Ensure the first checkbox/radio match is checked
    async fn check(&self, locator: &Locator) -> ComprarResult<()>;

    /// Select the option with the given value on the first match
    async fn select_option(&self, locator: &Locator, value: &str) -> ComprarResult<()>;

    /// Text content of the first match, `None` when absent
    async fn text_content(&self, locator: &Locator) -> ComprarResult<Option<String>>;

    /// Input value of the first match
    async fn input_value(&self, locator: &Locator) -> ComprarResult<String>;

    /// Number of elements matching `locator`
    async fn count(&self, locator: &Locator) -> ComprarResult<usize>;

    /// URL of the current document
    async fn current_url(&self) -> ComprarResult<String>;

    /// Pause for a fixed duration, letting in-page scripts settle
    async fn settle(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Release the underlying browser, if any
    async fn close(&self) -> ComprarResult<()> {
        Ok(())
    }
}

// ============================================================================
// Mock driver
// ============================================================================

/// Scripted state for one mocked element
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Text content reported for the element
    pub text: Option<String>,
    /// Input value reported for the element
    pub value: String,
    /// Whether the element is visible
    pub visible: bool,
    /// Whether the element is checked
    pub checked: bool,
    /// Match count reported for the locator
    pub count: usize,
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            text: None,
            value: String::new(),
            visible: true,
            checked: false,
            count: 1,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    url: String,
    elements: HashMap<String, MockElement>,
    history: Vec<String>,
}

/// In-memory driver for tests.
///
/// Elements are keyed by the canonical [`Locator`] string, so tests
/// stub state with the same locator builders page objects use:
///
/// ```
/// use comprar::driver::MockDriver;
/// use comprar::locator::Locator;
///
/// let driver = MockDriver::new();
/// driver.stub_text(&Locator::css(".cart-qty"), "(2)");
/// ```
#[derive(Debug, Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    /// Create an empty mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub the full element state for a locator
    pub fn stub(&self, locator: &Locator, element: MockElement) {
        self.lock().elements.insert(locator.to_string(), element);
    }

    /// Stub a visible element with the given text content
    pub fn stub_text(&self, locator: &Locator, text: impl Into<String>) {
        self.stub(
            locator,
            MockElement {
                text: Some(text.into()),
                ..MockElement::default()
            },
        );
    }

    /// Stub a visible input with the given value
    pub fn stub_value(&self, locator: &Locator, value: impl Into<String>) {
        self.stub(
            locator,
            MockElement {
                value: value.into(),
                ..MockElement::default()
            },
        );
    }

    /// Stub the match count for a locator
    pub fn stub_count(&self, locator: &Locator, count: usize) {
        self.stub(
            locator,
            MockElement {
                count,
                ..MockElement::default()
            },
        );
    }

    /// Stub a present but invisible element
    pub fn stub_hidden(&self, locator: &Locator) {
        self.stub(
            locator,
            MockElement {
                visible: false,
                ..MockElement::default()
            },
        );
    }

    /// Remove a stub, making the locator unmatched again
    pub fn clear(&self, locator: &Locator) {
        self.lock().elements.remove(&locator.to_string());
    }

    /// Recorded actions, oldest first (e.g. `click #checkout`)
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// Whether an action matching `needle` was recorded
    #[must_use]
    pub fn saw(&self, needle: &str) -> bool {
        self.lock().history.iter().any(|h| h.contains(needle))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn record(&self, action: String) {
        self.lock().history.push(action);
    }

    fn element(&self, locator: &Locator) -> Option<MockElement> {
        self.lock().elements.get(&locator.to_string()).cloned()
    }
}

#[async_trait]
impl ComprarDriver for MockDriver {
    async fn goto(&self, url: &str) -> ComprarResult<()> {
        let mut state = self.lock();
        state.url = url.to_string();
        state.history.push(format!("goto {url}"));
        Ok(())
    }

    async fn wait_for_page_load(&self, _timeout: Duration) -> ComprarResult<()> {
        Ok(())
    }

    async fn wait_for_visible(&self, locator: &Locator, timeout: Duration) -> ComprarResult<()> {
        match self.element(locator) {
            Some(el) if el.visible && el.count > 0 => Ok(()),
            _ => Err(ComprarError::ElementNotVisible {
                locator: locator.to_string(),
                ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn is_visible(&self, locator: &Locator) -> ComprarResult<bool> {
        Ok(self
            .element(locator)
            .is_some_and(|el| el.visible && el.count > 0))
    }

    async fn click(&self, locator: &Locator) -> ComprarResult<()> {
        self.record(format!("click {locator}"));
        match self.element(locator) {
            Some(_) => Ok(()),
            None => Err(ComprarError::ElementNotFound {
                locator: locator.to_string(),
            }),
        }
    }

    async fn fill(&self, locator: &Locator, text: &str) -> ComprarResult<()> {
        self.record(format!("fill {locator} = {text}"));
        let key = locator.to_string();
        let mut state = self.lock();
        match state.elements.get_mut(&key) {
            Some(el) => {
                el.value = text.to_string();
                Ok(())
            }
            None => Err(ComprarError::ElementNotFound { locator: key }),
        }
    }

    async fn check(&self, locator: &Locator) -> ComprarResult<()> {
        self.record(format!("check {locator}"));
        let key = locator.to_string();
        let mut state = self.lock();
        match state.elements.get_mut(&key) {
            Some(el) => {
                el.checked = true;
                Ok(())
            }
            None => Err(ComprarError::ElementNotFound { locator: key }),
        }
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> ComprarResult<()> {
        self.record(format!("select {locator} = {value}"));
        let key = locator.to_string();
        let mut state = self.lock();
        match state.elements.get_mut(&key) {
            Some(el) => {
                el.value = value.to_string();
                Ok(())
            }
            None => Err(ComprarError::ElementNotFound { locator: key }),
        }
    }

    async fn text_content(&self, locator: &Locator) -> ComprarResult<Option<String>> {
        Ok(self.element(locator).and_then(|el| el.text))
    }

    async fn input_value(&self, locator: &Locator) -> ComprarResult<String> {
        match self.element(locator) {
            Some(el) => Ok(el.value),
            None => Err(ComprarError::ElementNotFound {
                locator: locator.to_string(),
            }),
        }
    }

    async fn count(&self, locator: &Locator) -> ComprarResult<usize> {
        Ok(self.element(locator).map_or(0, |el| el.count))
    }

    async fn current_url(&self) -> ComprarResult<String> {
        Ok(self.lock().url.clone())
    }

    // Scripted pages have nothing to settle; keep tests instant.
    async fn settle(&self, duration: Duration) {
        self.record(format!("settle {}ms", duration.as_millis()));
    }
}

// ============================================================================
// CDP driver
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use std::time::{Duration, Instant};

    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser, BrowserConfig};
    use chromiumoxide::page::Page;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use tokio::task::JoinHandle;
    use tracing::debug;

    use crate::config::StoreConfig;
    use crate::locator::Locator;
    use crate::result::{ComprarError, ComprarResult};

    use super::{ComprarDriver, DEFAULT_POLL_INTERVAL_MS};

    /// Real browser driver speaking the Chrome DevTools Protocol.
    ///
    /// Locators are resolved by evaluating their JavaScript query
    /// expressions in the page, so one `evaluate` round-trip backs
    /// each trait method.
    #[derive(Debug)]
    pub struct CdpDriver {
        browser: tokio::sync::Mutex<Browser>,
        page: Page,
        handler_task: JoinHandle<()>,
    }

    impl CdpDriver {
        /// Launch a browser and open a blank page
        pub async fn launch(config: &StoreConfig) -> ComprarResult<Self> {
            let mut builder = BrowserConfig::builder();
            if !config.headless {
                builder = builder.with_head();
            }
            let browser_config = builder
                .build()
                .map_err(|e| ComprarError::BrowserLaunch {
                    message: e.to_string(),
                })?;

            let (browser, mut handler) =
                Browser::launch(browser_config)
                    .await
                    .map_err(|e| ComprarError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            let handler_task = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| ComprarError::BrowserLaunch {
                    message: e.to_string(),
                })?;

            Ok(Self {
                browser: tokio::sync::Mutex::new(browser),
                page,
                handler_task,
            })
        }

        async fn eval<T: DeserializeOwned>(&self, expr: &str) -> ComprarResult<T> {
            self.page
                .evaluate(expr)
                .await
                .map_err(|e| ComprarError::Evaluation {
                    message: e.to_string(),
                })?
                .into_value()
                .map_err(|e| ComprarError::Evaluation {
                    message: e.to_string(),
                })
        }

        /// Poll a boolean page expression until true or the deadline
        async fn poll_expr(&self, expr: &str, timeout: Duration) -> ComprarResult<bool> {
            let deadline = Instant::now() + timeout;
            loop {
                if self.eval::<bool>(expr).await? {
                    return Ok(true);
                }
                if Instant::now() >= deadline {
                    return Ok(false);
                }
                tokio::time::sleep(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)).await;
            }
        }

        /// Require `true` from an action expression, else not-found
        async fn act(&self, locator: &Locator, expr: &str) -> ComprarResult<()> {
            let found: bool = self.eval(expr).await?;
            if found {
                Ok(())
            } else {
                Err(ComprarError::ElementNotFound {
                    locator: locator.to_string(),
                })
            }
        }
    }

    #[async_trait]
    impl ComprarDriver for CdpDriver {
        async fn goto(&self, url: &str) -> ComprarResult<()> {
            debug!(url, "navigating");
            self.page
                .goto(url)
                .await
                .map_err(|e| ComprarError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn wait_for_page_load(&self, timeout: Duration) -> ComprarResult<()> {
            let loaded = self
                .poll_expr("document.readyState === 'complete'", timeout)
                .await?;
            if loaded {
                Ok(())
            } else {
                Err(ComprarError::Timeout {
                    ms: timeout.as_millis() as u64,
                })
            }
        }

        async fn wait_for_visible(
            &self,
            locator: &Locator,
            timeout: Duration,
        ) -> ComprarResult<()> {
            let visible = self.poll_expr(&locator.to_visible_expr(), timeout).await?;
            if visible {
                Ok(())
            } else {
                Err(ComprarError::ElementNotVisible {
                    locator: locator.to_string(),
                    ms: timeout.as_millis() as u64,
                })
            }
        }

        async fn is_visible(&self, locator: &Locator) -> ComprarResult<bool> {
            self.eval(&locator.to_visible_expr()).await
        }

        async fn click(&self, locator: &Locator) -> ComprarResult<()> {
            debug!(%locator, "click");
            self.act(locator, &locator.to_click_expr()).await
        }

        async fn fill(&self, locator: &Locator, text: &str) -> ComprarResult<()> {
            debug!(%locator, "fill");
            self.act(locator, &locator.to_fill_expr(text)).await
        }

        async fn check(&self, locator: &Locator) -> ComprarResult<()> {
            self.act(locator, &locator.to_check_expr()).await
        }

        async fn select_option(&self, locator: &Locator, value: &str) -> ComprarResult<()> {
            self.act(locator, &locator.to_select_expr(value)).await
        }

        async fn text_content(&self, locator: &Locator) -> ComprarResult<Option<String>> {
            self.eval(&locator.to_text_expr()).await
        }

        async fn input_value(&self, locator: &Locator) -> ComprarResult<String> {
            let value: Option<String> = self.eval(&locator.to_input_value_expr()).await?;
            value.ok_or_else(|| ComprarError::ElementNotFound {
                locator: locator.to_string(),
            })
        }

        async fn count(&self, locator: &Locator) -> ComprarResult<usize> {
            self.eval(&locator.to_count_expr()).await
        }

        async fn current_url(&self) -> ComprarResult<String> {
            self.eval("window.location.href").await
        }

        async fn close(&self) -> ComprarResult<()> {
            let mut browser = self.browser.lock().await;
            browser
                .close()
                .await
                .map_err(|e| ComprarError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            self.handler_task.abort();
            Ok(())
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::CdpDriver;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn locator() -> Locator {
        Locator::css("#checkout")
    }

    #[tokio::test]
    async fn test_goto_tracks_url() {
        let driver = MockDriver::new();
        driver.goto("http://shop.test/cart").await.unwrap();
        assert_eq!(driver.current_url().await.unwrap(), "http://shop.test/cart");
    }

    #[tokio::test]
    async fn test_click_requires_stub() {
        let driver = MockDriver::new();
        let err = driver.click(&locator()).await.unwrap_err();
        assert!(matches!(err, ComprarError::ElementNotFound { .. }));

        driver.stub(&locator(), MockElement::default());
        driver.click(&locator()).await.unwrap();
        assert!(driver.saw("click #checkout"));
    }

    #[tokio::test]
    async fn test_fill_updates_value() {
        let driver = MockDriver::new();
        let email = Locator::css("#Email");
        driver.stub_value(&email, "");
        driver.fill(&email, "user@shop.test").await.unwrap();
        assert_eq!(driver.input_value(&email).await.unwrap(), "user@shop.test");
    }

    #[tokio::test]
    async fn test_text_content_absent_is_none() {
        let driver = MockDriver::new();
        assert_eq!(driver.text_content(&locator()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_count_defaults_to_zero() {
        let driver = MockDriver::new();
        assert_eq!(driver.count(&locator()).await.unwrap(), 0);
        driver.stub_count(&locator(), 3);
        assert_eq!(driver.count(&locator()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_hidden_element_fails_visibility_wait() {
        let driver = MockDriver::new();
        driver.stub_hidden(&locator());
        assert!(!driver.is_visible(&locator()).await.unwrap());
        let err = driver
            .wait_for_visible(&locator(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ComprarError::ElementNotVisible { .. }));
    }

    #[tokio::test]
    async fn test_settle_is_recorded_not_slept() {
        let driver = MockDriver::new();
        let start = std::time::Instant::now();
        driver.settle(Duration::from_secs(3)).await;
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(driver.saw("settle 3000ms"));
    }

    #[tokio::test]
    async fn test_check_sets_checked() {
        let driver = MockDriver::new();
        let terms = Locator::css("#termsofservice");
        driver.stub(&terms, MockElement::default());
        driver.check(&terms).await.unwrap();
        assert!(driver.saw("check #termsofservice"));
    }
}
