//! Home page: product search and header cart access.

use crate::config::StoreConfig;
use crate::driver::ComprarDriver;
use crate::result::ComprarResult;

use super::PageBase;

/// Element selectors for the home page
pub mod selectors {
    use crate::locator::Locator;

    /// Header search box
    #[must_use]
    pub fn search_input() -> Locator {
        Locator::css("#small-searchterms")
    }

    /// Header search submit button
    #[must_use]
    pub fn search_button() -> Locator {
        Locator::css(r#"input[value="Search"]"#)
    }

    /// Header shopping-cart link
    #[must_use]
    pub fn cart_link() -> Locator {
        Locator::css("#topcartlink a.ico-cart")
    }

    /// Item-count badge on the cart link
    #[must_use]
    pub fn cart_quantity() -> Locator {
        Locator::css(".cart-qty")
    }

    /// First category link with the given visible text
    #[must_use]
    pub fn category_link(name: &str) -> Locator {
        Locator::css("a").has_text(name).first()
    }
}

/// Page object for the storefront home page
#[derive(Debug)]
pub struct HomePage<'d, D> {
    base: PageBase<'d, D>,
}

impl<'d, D: ComprarDriver> HomePage<'d, D> {
    /// Bind the page object to a driver and configuration
    pub const fn new(driver: &'d D, config: &'d StoreConfig) -> Self {
        Self {
            base: PageBase::new(driver, config),
        }
    }

    /// Navigate to the storefront root
    pub async fn navigate_to_home(&self) -> ComprarResult<()> {
        self.base.navigate("/").await
    }

    /// Search the catalog, landing on the results page
    pub async fn search_product(&self, product_name: &str) -> ComprarResult<()> {
        self.base.fill(&selectors::search_input(), product_name).await?;
        self.base.click(&selectors::search_button()).await?;
        self.base.wait_for_page_load().await
    }

    /// Follow the first category link matching `category_name`
    pub async fn navigate_to_category(&self, category_name: &str) -> ComprarResult<()> {
        self.base.click(&selectors::category_link(category_name)).await?;
        self.base.wait_for_page_load().await
    }

    /// Item count from the header cart badge; 0 when the badge is
    /// absent or carries no number
    pub async fn cart_item_count(&self) -> ComprarResult<u32> {
        let badge = selectors::cart_quantity();
        if !self.base.driver().is_visible(&badge).await? {
            return Ok(0);
        }
        let text = self.base.text(&badge).await?;
        let digits: String = text
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(char::is_ascii_digit)
            .collect();
        Ok(digits.parse().unwrap_or(0))
    }

    /// Open the shopping cart via the header link
    pub async fn navigate_to_cart(&self) -> ComprarResult<()> {
        self.base.click(&selectors::cart_link()).await?;
        self.base.wait_for_page_load().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;

    fn harness() -> (MockDriver, StoreConfig) {
        (MockDriver::new(), StoreConfig::default())
    }

    #[tokio::test]
    async fn test_search_fills_then_submits() {
        let (driver, config) = harness();
        driver.stub_value(&selectors::search_input(), "");
        driver.stub_text(&selectors::search_button(), "Search");

        let home = HomePage::new(&driver, &config);
        home.search_product("Fiction").await.unwrap();

        let history = driver.history();
        let fill_at = history.iter().position(|h| h.contains("fill")).unwrap();
        let click_at = history.iter().position(|h| h.contains("click")).unwrap();
        assert!(fill_at < click_at);
        assert!(driver.saw("fill #small-searchterms = Fiction"));
    }

    #[tokio::test]
    async fn test_cart_count_reads_badge() {
        let (driver, config) = harness();
        driver.stub_text(&selectors::cart_quantity(), "(3)");

        let home = HomePage::new(&driver, &config);
        assert_eq!(home.cart_item_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_cart_count_defaults_to_zero() {
        let (driver, config) = harness();
        let home = HomePage::new(&driver, &config);
        assert_eq!(home.cart_item_count().await.unwrap(), 0);

        driver.stub_text(&selectors::cart_quantity(), "(empty)");
        assert_eq!(home.cart_item_count().await.unwrap(), 0);
    }
}
