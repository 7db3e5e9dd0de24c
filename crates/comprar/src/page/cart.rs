//! Shopping cart page: row scraping, summary totals, checkout entry.

use std::time::Duration;

use crate::config::StoreConfig;
use crate::driver::ComprarDriver;
use crate::locator::Locator;
use crate::price::CartLineItem;
use crate::result::ComprarResult;

use super::{parse_price, PageBase};

/// Bound for the empty-cart message probe (2 seconds)
const EMPTY_CART_PROBE_MS: u64 = 2_000;

/// Element selectors for the cart page
pub mod selectors {
    use crate::locator::Locator;

    /// All cart rows
    #[must_use]
    pub fn cart_item_rows() -> Locator {
        Locator::css(".cart-item-row")
    }

    /// One cart row by index
    #[must_use]
    pub fn cart_item_row(index: usize) -> Locator {
        cart_item_rows().nth(index)
    }

    /// Summary row labelled `Sub-Total:`
    #[must_use]
    pub fn sub_total_row() -> Locator {
        Locator::css("table.cart-total tr").has_text("Sub-Total:")
    }

    /// Summary row labelled `Shipping:`
    #[must_use]
    pub fn shipping_row() -> Locator {
        Locator::css("table.cart-total tr").has_text("Shipping:")
    }

    /// Summary row labelled `Total:`
    #[must_use]
    pub fn total_row() -> Locator {
        Locator::css("table.cart-total tr").has_text("Total:")
    }

    /// Terms-of-service checkbox
    #[must_use]
    pub fn terms_checkbox() -> Locator {
        Locator::css("#termsofservice")
    }

    /// Checkout button
    #[must_use]
    pub fn checkout_button() -> Locator {
        Locator::css("#checkout")
    }

    /// Update-cart button
    #[must_use]
    pub fn update_cart_button() -> Locator {
        Locator::css(r#"input[name="updatecart"]"#)
    }

    /// Empty-cart message in the order summary
    #[must_use]
    pub fn empty_cart_message() -> Locator {
        Locator::css(".order-summary-content").has_text("Your Shopping Cart is empty!")
    }
}

/// A summary amount as displayed on the cart page.
///
/// The storefront shows `Calculated during checkout` for shipping and
/// total until a shipping method is chosen; that state is carried
/// explicitly instead of being folded into `0.0`, so callers can tell
/// "free" from "not priced yet".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SummaryAmount {
    /// A priced amount read off the page
    Known(f64),
    /// Not yet priced (`Calculated during checkout`)
    Unknown,
}

impl SummaryAmount {
    /// The amount, treating not-yet-priced as zero
    #[must_use]
    pub const fn or_zero(self) -> f64 {
        match self {
            Self::Known(value) => value,
            Self::Unknown => 0.0,
        }
    }

    /// Whether the amount was actually priced on the page
    #[must_use]
    pub const fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }
}

/// Page object for the shopping cart page
#[derive(Debug)]
pub struct CartPage<'d, D> {
    base: PageBase<'d, D>,
}

impl<'d, D: ComprarDriver> CartPage<'d, D> {
    /// Bind the page object to a driver and configuration
    pub const fn new(driver: &'d D, config: &'d StoreConfig) -> Self {
        Self {
            base: PageBase::new(driver, config),
        }
    }

    /// Scrape every cart row into a line item
    pub async fn cart_items(&self) -> ComprarResult<Vec<CartLineItem>> {
        let count = self.base.driver().count(&selectors::cart_item_rows()).await?;
        let mut items = Vec::with_capacity(count);

        for index in 0..count {
            let row = selectors::cart_item_row(index);

            let name = self.base.text(&row.child_css(".product-name")).await?;
            let unit_price_text = self.base.text(&row.child_css(".unit-price")).await?;
            let quantity_value = self
                .base
                .driver()
                .input_value(&row.child_css(".qty-input"))
                .await?;
            let total_text = self.base.text(&row.child_css(".subtotal")).await?;

            items.push(CartLineItem {
                name,
                unit_price: parse_price(&unit_price_text),
                quantity: quantity_value.trim().parse().unwrap_or(0),
                observed_total: parse_price(&total_text),
            });
        }

        Ok(items)
    }

    /// Displayed subtotal
    pub async fn sub_total(&self) -> ComprarResult<f64> {
        let price = selectors::sub_total_row().child_css(".product-price");
        let text = self.base.text(&price).await?;
        Ok(parse_price(&text))
    }

    /// Displayed shipping cost, or [`SummaryAmount::Unknown`] while
    /// the storefront still shows `Calculated during checkout`
    pub async fn shipping_cost(&self) -> ComprarResult<SummaryAmount> {
        self.summary_amount(&selectors::shipping_row(), ".product-price")
            .await
    }

    /// Displayed grand total, or [`SummaryAmount::Unknown`] while the
    /// storefront still shows `Calculated during checkout`
    pub async fn total_price(&self) -> ComprarResult<SummaryAmount> {
        self.summary_amount(&selectors::total_row(), ".product-price.order-total, .order-total")
            .await
    }

    async fn summary_amount(
        &self,
        row: &Locator,
        price_css: &str,
    ) -> ComprarResult<SummaryAmount> {
        self.base.wait_for(row).await?;

        let price = row.child_css(price_css);
        if self.base.driver().count(&price).await? > 0 {
            let text = self.base.text(&price).await?;
            return Ok(SummaryAmount::Known(parse_price(&text)));
        }

        // No priced cell; fall back to the raw cell text
        let cell = row.child_css("td.cart-total-right");
        let text = self.base.text(&cell).await?;
        if text.to_lowercase().contains("calculated") {
            Ok(SummaryAmount::Unknown)
        } else {
            Ok(SummaryAmount::Known(parse_price(&text)))
        }
    }

    /// Set a row's quantity and apply it via the update button
    pub async fn update_quantity(&self, item_index: usize, quantity: u32) -> ComprarResult<()> {
        let qty_input = selectors::cart_item_row(item_index).child_css(".qty-input");
        self.base.fill(&qty_input, &quantity.to_string()).await?;
        self.base.click(&selectors::update_cart_button()).await?;
        self.base.wait_for_page_load().await
    }

    /// Mark a row for removal and apply it via the update button
    pub async fn remove_item(&self, item_index: usize) -> ComprarResult<()> {
        let remove = selectors::cart_item_row(item_index).child_css(".remove-from-cart input");
        self.base.driver().check(&remove).await?;
        self.base.click(&selectors::update_cart_button()).await?;
        self.base.wait_for_page_load().await
    }

    /// Accept the terms of service and enter checkout
    pub async fn proceed_to_checkout(&self) -> ComprarResult<()> {
        self.base.driver().check(&selectors::terms_checkbox()).await?;
        self.base.click(&selectors::checkout_button()).await?;
        self.base.wait_for_page_load().await
    }

    /// Whether the cart shows its empty-state message
    pub async fn is_cart_empty(&self) -> ComprarResult<bool> {
        self.base
            .probe(
                &selectors::empty_cart_message(),
                Duration::from_millis(EMPTY_CART_PROBE_MS),
            )
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;

    fn stub_row(driver: &MockDriver, index: usize, name: &str, unit: &str, qty: &str, total: &str) {
        let row = selectors::cart_item_row(index);
        driver.stub_text(&row.child_css(".product-name"), name);
        driver.stub_text(&row.child_css(".unit-price"), unit);
        driver.stub_value(&row.child_css(".qty-input"), qty);
        driver.stub_text(&row.child_css(".subtotal"), total);
    }

    #[tokio::test]
    async fn test_cart_items_scrapes_every_row() {
        let driver = MockDriver::new();
        let config = StoreConfig::default();
        driver.stub_count(&selectors::cart_item_rows(), 2);
        stub_row(&driver, 0, " Fiction ", "24.00", "2", "48.00");
        stub_row(&driver, 1, "Health Book", "10.00", "1", "10.00");

        let cart = CartPage::new(&driver, &config);
        let items = cart.cart_items().await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Fiction");
        assert_eq!(items[0].unit_price, 24.0);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].observed_total, 48.0);
        assert_eq!(items[1].quantity, 1);
    }

    #[tokio::test]
    async fn test_empty_cart_has_no_items() {
        let driver = MockDriver::new();
        let config = StoreConfig::default();

        let cart = CartPage::new(&driver, &config);
        assert!(cart.cart_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sub_total_reads_priced_cell() {
        let driver = MockDriver::new();
        let config = StoreConfig::default();
        driver.stub_text(
            &selectors::sub_total_row().child_css(".product-price"),
            "58.00",
        );

        let cart = CartPage::new(&driver, &config);
        assert_eq!(cart.sub_total().await.unwrap(), 58.0);
    }

    #[tokio::test]
    async fn test_shipping_priced() {
        let driver = MockDriver::new();
        let config = StoreConfig::default();
        let row = selectors::shipping_row();
        driver.stub_text(&row, "Shipping: 5.00");
        driver.stub_text(&row.child_css(".product-price"), "5.00");

        let cart = CartPage::new(&driver, &config);
        assert_eq!(
            cart.shipping_cost().await.unwrap(),
            SummaryAmount::Known(5.0)
        );
    }

    #[tokio::test]
    async fn test_total_not_yet_priced() {
        let driver = MockDriver::new();
        let config = StoreConfig::default();
        let row = selectors::total_row();
        driver.stub_text(&row, "Total: Calculated during checkout");
        driver.stub_count(&row.child_css(".product-price.order-total, .order-total"), 0);
        driver.stub_text(
            &row.child_css("td.cart-total-right"),
            "Calculated during checkout",
        );

        let cart = CartPage::new(&driver, &config);
        let total = cart.total_price().await.unwrap();
        assert_eq!(total, SummaryAmount::Unknown);
        assert_eq!(total.or_zero(), 0.0);
    }

    #[tokio::test]
    async fn test_checkout_accepts_terms_first() {
        let driver = MockDriver::new();
        let config = StoreConfig::default();
        driver.stub_text(&selectors::terms_checkbox(), "");
        driver.stub_text(&selectors::checkout_button(), "Checkout");

        let cart = CartPage::new(&driver, &config);
        cart.proceed_to_checkout().await.unwrap();

        let history = driver.history();
        let check_at = history.iter().position(|h| h.contains("check")).unwrap();
        let click_at = history
            .iter()
            .position(|h| h.contains("click #checkout"))
            .unwrap();
        assert!(check_at < click_at);
    }

    #[tokio::test]
    async fn test_update_quantity_fills_row_before_update_click() {
        let driver = MockDriver::new();
        let config = StoreConfig::default();
        let qty_input = selectors::cart_item_row(1).child_css(".qty-input");
        driver.stub_value(&qty_input, "1");
        driver.stub_text(&selectors::update_cart_button(), "Update shopping cart");

        let cart = CartPage::new(&driver, &config);
        cart.update_quantity(1, 3).await.unwrap();

        let history = driver.history();
        let fill_at = history
            .iter()
            .position(|h| h.contains(".qty-input = 3"))
            .unwrap();
        let click_at = history
            .iter()
            .position(|h| h.contains(r#"click input[name="updatecart"]"#))
            .unwrap();
        assert!(fill_at < click_at);
        assert_eq!(driver.input_value(&qty_input).await.unwrap(), "3");
    }

    #[tokio::test]
    async fn test_remove_item_checks_row_before_update_click() {
        let driver = MockDriver::new();
        let config = StoreConfig::default();
        let remove = selectors::cart_item_row(0).child_css(".remove-from-cart input");
        driver.stub_text(&remove, "");
        driver.stub_text(&selectors::update_cart_button(), "Update shopping cart");

        let cart = CartPage::new(&driver, &config);
        cart.remove_item(0).await.unwrap();

        let history = driver.history();
        let check_at = history
            .iter()
            .position(|h| h.contains("check .cart-item-row >> nth=0 >> .remove-from-cart input"))
            .unwrap();
        let click_at = history
            .iter()
            .position(|h| h.contains(r#"click input[name="updatecart"]"#))
            .unwrap();
        assert!(check_at < click_at);
    }

    #[tokio::test]
    async fn test_update_quantity_missing_row_is_an_error() {
        let driver = MockDriver::new();
        let config = StoreConfig::default();
        driver.stub_text(&selectors::update_cart_button(), "Update shopping cart");

        let cart = CartPage::new(&driver, &config);
        let err = cart.update_quantity(5, 2).await.unwrap_err();
        assert!(matches!(
            err,
            crate::result::ComprarError::ElementNotVisible { .. }
        ));
        // nothing was submitted
        assert!(!driver.saw("click"));
    }

    #[tokio::test]
    async fn test_is_cart_empty() {
        let driver = MockDriver::new();
        let config = StoreConfig::default();
        let cart = CartPage::new(&driver, &config);

        assert!(!cart.is_cart_empty().await.unwrap());
        driver.stub_text(&selectors::empty_cart_message(), "Your Shopping Cart is empty!");
        assert!(cart.is_cart_empty().await.unwrap());
    }
}
