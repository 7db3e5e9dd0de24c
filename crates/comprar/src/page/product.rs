//! Product detail page: price read, quantity, add to cart.

use std::time::Duration;

use crate::config::StoreConfig;
use crate::driver::ComprarDriver;
use crate::locator::Locator;
use crate::result::ComprarResult;

use super::{parse_price, PageBase};

/// Bound for the add-to-cart success notification (5 seconds)
const SUCCESS_PROBE_MS: u64 = 5_000;

/// Bound for the notification close button (2 seconds)
const CLOSE_PROBE_MS: u64 = 2_000;

/// Pause after the success notification appears, letting the header
/// cart badge update (1 second)
const NOTIFICATION_SETTLE_MS: u64 = 1_000;

/// Element selectors for the product detail page
pub mod selectors {
    use crate::locator::Locator;

    /// Add-to-cart button; the id suffix varies per product
    #[must_use]
    pub fn add_to_cart_button() -> Locator {
        Locator::css(r#"[id^="add-to-cart-button-"], input[value="Add to cart"]"#).first()
    }

    /// Quantity input
    #[must_use]
    pub fn quantity_input() -> Locator {
        Locator::css(".qty-input")
    }

    /// Displayed product price; the class suffix varies per product
    #[must_use]
    pub fn product_price() -> Locator {
        Locator::css(r#"[class^="price-value-"], .product-price"#).first()
    }

    /// Product title heading
    #[must_use]
    pub fn product_title() -> Locator {
        Locator::css(r#".product-name h1, h1[itemprop="name"]"#)
    }

    /// Green add-to-cart success notification bar
    #[must_use]
    pub fn success_message() -> Locator {
        Locator::css(".bar-notification.success")
    }

    /// Close button on the notification bar
    #[must_use]
    pub fn close_button() -> Locator {
        Locator::css(".close")
    }
}

/// Page object for a product detail page
#[derive(Debug)]
pub struct ProductPage<'d, D> {
    base: PageBase<'d, D>,
}

impl<'d, D: ComprarDriver> ProductPage<'d, D> {
    /// Bind the page object to a driver and configuration
    pub const fn new(driver: &'d D, config: &'d StoreConfig) -> Self {
        Self {
            base: PageBase::new(driver, config),
        }
    }

    /// From a search-results list, open the product whose link text is
    /// exactly `product_name`
    pub async fn select_product_from_list(&self, product_name: &str) -> ComprarResult<()> {
        self.base.click(&Locator::link(product_name)).await?;
        self.base.wait_for_page_load().await
    }

    /// Displayed unit price
    pub async fn product_price(&self) -> ComprarResult<f64> {
        let text = self.base.text(&selectors::product_price()).await?;
        Ok(parse_price(&text))
    }

    /// Displayed product title
    pub async fn product_name(&self) -> ComprarResult<String> {
        self.base.text(&selectors::product_title()).await
    }

    /// Set the order quantity
    pub async fn set_quantity(&self, quantity: u32) -> ComprarResult<()> {
        self.base
            .fill(&selectors::quantity_input(), &quantity.to_string())
            .await
    }

    /// Add the product to the cart, waiting for the success
    /// notification. Quantity 1 skips the quantity input, which some
    /// product layouts omit.
    pub async fn add_to_cart(&self, quantity: u32) -> ComprarResult<()> {
        if quantity > 1 {
            self.set_quantity(quantity).await?;
        }
        self.base.click(&selectors::add_to_cart_button()).await?;
        self.wait_for_success_message().await
    }

    /// Wait for the success notification; tolerate its absence, some
    /// flows add without showing the bar
    pub async fn wait_for_success_message(&self) -> ComprarResult<()> {
        let appeared = self
            .base
            .probe(
                &selectors::success_message(),
                Duration::from_millis(SUCCESS_PROBE_MS),
            )
            .await?;
        if appeared {
            self.base
                .driver()
                .settle(Duration::from_millis(NOTIFICATION_SETTLE_MS))
                .await;
        }
        Ok(())
    }

    /// Dismiss the notification bar if its close button is present
    pub async fn close_success_message(&self) -> ComprarResult<()> {
        let close = selectors::close_button();
        let present = self
            .base
            .probe(&close, Duration::from_millis(CLOSE_PROBE_MS))
            .await?;
        if present {
            self.base.driver().click(&close).await?;
        }
        Ok(())
    }
}
