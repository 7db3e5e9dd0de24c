//! Page objects over the driver capability.
//!
//! Each page object names the elements of one storefront page through
//! its `selectors` submodule and exposes the user-level operations of
//! that page. Pages share a [`PageBase`] that enforces the wait-then-
//! act discipline: every read or interaction first waits for the
//! target to become visible, bounded by the configured action timeout.
//!
//! Pages borrow the driver instead of owning it, so one driver (and
//! one browser page) backs a whole scenario's worth of page objects.

use std::time::Duration;

use crate::config::StoreConfig;
use crate::driver::ComprarDriver;
use crate::locator::Locator;
use crate::result::{ComprarError, ComprarResult};

pub mod cart;
pub mod checkout;
pub mod home;
pub mod login;
pub mod product;

pub use cart::{CartPage, SummaryAmount};
pub use checkout::{BillingAddress, CheckoutPage};
pub use home::HomePage;
pub use login::LoginPage;
pub use product::ProductPage;

/// Parse a displayed price into a number.
///
/// Strips currency symbols, grouping separators, and surrounding text,
/// then parses the leading numeric run of what remains. A second
/// decimal point ends the run, so `"1.2.3"` parses as `1.2`. Returns
/// NaN when no digits remain, which downstream tolerance comparisons
/// treat as a mismatch rather than a zero.
#[must_use]
pub fn parse_price(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let mut end = 0;
    let mut seen_dot = false;
    for (index, c) in cleaned.char_indices() {
        if c == '.' {
            if seen_dot {
                break;
            }
            seen_dot = true;
        }
        end = index + 1;
    }
    cleaned[..end].parse().unwrap_or(f64::NAN)
}

/// Shared behavior for page objects: navigation and waited actions
#[derive(Debug)]
pub struct PageBase<'d, D> {
    driver: &'d D,
    config: &'d StoreConfig,
}

impl<'d, D> Clone for PageBase<'d, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'d, D> Copy for PageBase<'d, D> {}

impl<'d, D: ComprarDriver> PageBase<'d, D> {
    /// Bind a page base to a driver and run configuration
    pub const fn new(driver: &'d D, config: &'d StoreConfig) -> Self {
        Self { driver, config }
    }

    /// The underlying driver
    pub const fn driver(&self) -> &'d D {
        self.driver
    }

    /// The run configuration
    pub const fn config(&self) -> &'d StoreConfig {
        self.config
    }

    /// Navigate to a path under the base URL and await the load
    pub async fn navigate(&self, path: &str) -> ComprarResult<()> {
        self.driver.goto(&self.config.url_for(path)).await?;
        self.wait_for_page_load().await
    }

    /// Wait for the current document to finish loading
    pub async fn wait_for_page_load(&self) -> ComprarResult<()> {
        self.driver
            .wait_for_page_load(self.config.navigation_timeout)
            .await
    }

    /// Wait for visibility, then click
    pub async fn click(&self, locator: &Locator) -> ComprarResult<()> {
        self.wait_for(locator).await?;
        self.driver.click(locator).await
    }

    /// Wait for visibility, then replace the input's value
    pub async fn fill(&self, locator: &Locator, text: &str) -> ComprarResult<()> {
        self.wait_for(locator).await?;
        self.driver.fill(locator, text).await
    }

    /// Wait for visibility, then read trimmed text content (empty
    /// when absent)
    pub async fn text(&self, locator: &Locator) -> ComprarResult<String> {
        self.wait_for(locator).await?;
        Ok(self
            .driver
            .text_content(locator)
            .await?
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    /// Wait for the element to become visible, bounded by the action
    /// timeout
    pub async fn wait_for(&self, locator: &Locator) -> ComprarResult<()> {
        self.driver
            .wait_for_visible(locator, self.config.action_timeout)
            .await
    }

    /// Wait for visibility with an explicit bound, reporting the
    /// outcome instead of failing.
    ///
    /// Used for presence checks like "am I logged in?" where an absent
    /// element is an answer, not an error.
    pub async fn probe(&self, locator: &Locator, timeout: Duration) -> ComprarResult<bool> {
        match self.driver.wait_for_visible(locator, timeout).await {
            Ok(()) => Ok(true),
            Err(ComprarError::ElementNotVisible { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod parse_price_tests {
        use super::*;

        #[test]
        fn test_plain_amount() {
            assert_eq!(parse_price("24.00"), 24.0);
            assert_eq!(parse_price("10"), 10.0);
        }

        #[test]
        fn test_currency_and_grouping_stripped() {
            assert_eq!(parse_price("$1,234.56"), 1234.56);
            assert_eq!(parse_price("1 299.00 kr"), 1299.0);
        }

        #[test]
        fn test_surrounding_text_stripped() {
            assert_eq!(parse_price("Sub-Total: 58.00"), 58.0);
        }

        #[test]
        fn test_second_dot_ends_the_number() {
            assert_eq!(parse_price("1.2.3"), 1.2);
            // Stripping runs first, so "v1.5 costs 2.0" collapses to
            // "1.52.0" and the 2 concatenates onto the first number.
            // Price cells only ever carry one amount, so the hazard
            // stays theoretical, but the behavior is pinned here.
            assert_eq!(parse_price("v1.5 costs 2.0"), 1.52);
        }

        #[test]
        fn test_leading_and_trailing_dot() {
            assert_eq!(parse_price(".5"), 0.5);
            assert_eq!(parse_price("5."), 5.0);
        }

        #[test]
        fn test_no_digits_is_nan() {
            assert!(parse_price("Calculated during checkout").is_nan());
            assert!(parse_price("").is_nan());
            assert!(parse_price(".").is_nan());
        }
    }

    mod page_base_tests {
        use super::*;
        use crate::driver::MockDriver;

        #[tokio::test]
        async fn test_navigate_resolves_against_base_url() {
            let driver = MockDriver::new();
            let config = StoreConfig::new().with_base_url("http://shop.test");
            let base = PageBase::new(&driver, &config);
            base.navigate("/cart").await.unwrap();
            assert_eq!(
                driver.current_url().await.unwrap(),
                "http://shop.test/cart"
            );
        }

        #[tokio::test]
        async fn test_click_waits_first() {
            let driver = MockDriver::new();
            let config = StoreConfig::default();
            let base = PageBase::new(&driver, &config);
            let locator = Locator::css("#checkout");

            let err = base.click(&locator).await.unwrap_err();
            assert!(matches!(err, ComprarError::ElementNotVisible { .. }));
            // the click itself never ran
            assert!(!driver.saw("click"));
        }

        #[tokio::test]
        async fn test_probe_reports_absence() {
            let driver = MockDriver::new();
            let config = StoreConfig::default();
            let base = PageBase::new(&driver, &config);
            let locator = Locator::css("a.ico-logout");

            assert!(!base.probe(&locator, Duration::from_secs(1)).await.unwrap());
            driver.stub_text(&locator, "Log out");
            assert!(base.probe(&locator, Duration::from_secs(1)).await.unwrap());
        }
    }
}
