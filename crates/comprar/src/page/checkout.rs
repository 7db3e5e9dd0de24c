//! Checkout wizard: billing, shipping, payment, confirmation.
//!
//! The storefront's checkout is an accordion of steps, each advanced
//! by its own Continue button. Steps swap panels in place with
//! scripted animations, so each advance is followed by a settle pause
//! before the next panel is driven.

use std::time::Duration;

use crate::config::StoreConfig;
use crate::driver::ComprarDriver;
use crate::result::ComprarResult;

use super::PageBase;

/// Bound for the order-completed probe (5 seconds)
const SUCCESS_PROBE_MS: u64 = 5_000;

/// Pause after advancing most wizard steps (1 second)
const STEP_SETTLE_MS: u64 = 1_000;

/// Pause after the shipping-method step, which reprices the order
/// (3 seconds)
const SHIPPING_METHOD_SETTLE_MS: u64 = 3_000;

/// Element selectors for the checkout wizard
pub mod selectors {
    use crate::locator::Locator;

    /// New billing address form, shown for first-time checkouts
    #[must_use]
    pub fn new_address_form() -> Locator {
        Locator::css("#billing-new-address-form")
    }

    /// Country dropdown
    #[must_use]
    pub fn country_select() -> Locator {
        Locator::css("#BillingNewAddress_CountryId")
    }

    /// City field
    #[must_use]
    pub fn city_input() -> Locator {
        Locator::css("#BillingNewAddress_City")
    }

    /// First address line
    #[must_use]
    pub fn address1_input() -> Locator {
        Locator::css("#BillingNewAddress_Address1")
    }

    /// Postal code field
    #[must_use]
    pub fn zip_code_input() -> Locator {
        Locator::css("#BillingNewAddress_ZipPostalCode")
    }

    /// Phone number field
    #[must_use]
    pub fn phone_input() -> Locator {
        Locator::css("#BillingNewAddress_PhoneNumber")
    }

    /// Continue out of the billing step
    #[must_use]
    pub fn billing_continue() -> Locator {
        Locator::css(r#"#billing-buttons-container input[value="Continue"]"#)
    }

    /// Continue out of the shipping-address step
    #[must_use]
    pub fn shipping_continue() -> Locator {
        Locator::css(r#"#shipping-buttons-container input[value="Continue"]"#)
    }

    /// First offered shipping method
    #[must_use]
    pub fn shipping_method_option() -> Locator {
        Locator::css(r#"input[name="shippingoption"]"#).first()
    }

    /// Continue out of the shipping-method step
    #[must_use]
    pub fn shipping_method_continue() -> Locator {
        Locator::css(r#"#shipping-method-buttons-container input[value="Continue"]"#)
    }

    /// First offered payment method
    #[must_use]
    pub fn payment_method_option() -> Locator {
        Locator::css(r#"input[name="paymentmethod"]"#).first()
    }

    /// Continue out of the payment-method step
    #[must_use]
    pub fn payment_method_continue() -> Locator {
        Locator::css(r#"#payment-method-buttons-container input[value="Continue"]"#)
    }

    /// Continue out of the payment-info step
    #[must_use]
    pub fn payment_info_continue() -> Locator {
        Locator::css(r#"#payment-info-buttons-container input[value="Continue"]"#)
    }

    /// Final confirm-order button
    #[must_use]
    pub fn confirm_button() -> Locator {
        Locator::css(r#"#confirm-order-buttons-container input[value="Confirm"]"#)
    }

    /// Order-completed banner
    #[must_use]
    pub fn success_message() -> Locator {
        Locator::css(".order-completed")
    }

    /// Detail line carrying the order number
    #[must_use]
    pub fn order_number() -> Locator {
        Locator::css("ul.details li").has_text("Order number:")
    }
}

/// Billing address for a first-time checkout
#[derive(Debug, Clone, Default)]
pub struct BillingAddress {
    /// Country option value for the dropdown (e.g. `"1"` for USA)
    pub country: Option<String>,
    /// City
    pub city: String,
    /// First address line
    pub address1: String,
    /// Postal code
    pub zip_code: String,
    /// Phone number
    pub phone: String,
}

/// Page object for the checkout wizard
#[derive(Debug)]
pub struct CheckoutPage<'d, D> {
    base: PageBase<'d, D>,
}

impl<'d, D: ComprarDriver> CheckoutPage<'d, D> {
    /// Bind the page object to a driver and configuration
    pub const fn new(driver: &'d D, config: &'d StoreConfig) -> Self {
        Self {
            base: PageBase::new(driver, config),
        }
    }

    /// Fill the billing address if the new-address form is shown, then
    /// advance. Returning customers with a saved address skip straight
    /// to the Continue click.
    pub async fn fill_billing_address(&self, address: &BillingAddress) -> ComprarResult<()> {
        let driver = self.base.driver();
        if driver.is_visible(&selectors::new_address_form()).await? {
            if let Some(country) = &address.country {
                driver
                    .select_option(&selectors::country_select(), country)
                    .await?;
            }
            self.base.fill(&selectors::city_input(), &address.city).await?;
            self.base
                .fill(&selectors::address1_input(), &address.address1)
                .await?;
            self.base
                .fill(&selectors::zip_code_input(), &address.zip_code)
                .await?;
            self.base.fill(&selectors::phone_input(), &address.phone).await?;
        }
        driver.click(&selectors::billing_continue()).await
    }

    /// Confirm the shipping address (prefilled from billing)
    pub async fn select_shipping_address(&self) -> ComprarResult<()> {
        self.base.click(&selectors::shipping_continue()).await?;
        self.settle(STEP_SETTLE_MS).await;
        Ok(())
    }

    /// Pick the first shipping method and advance; this step reprices
    /// the order, hence the longer settle
    pub async fn select_shipping_method(&self) -> ComprarResult<()> {
        self.base
            .driver()
            .check(&selectors::shipping_method_option())
            .await?;
        self.base.click(&selectors::shipping_method_continue()).await?;
        self.settle(SHIPPING_METHOD_SETTLE_MS).await;
        Ok(())
    }

    /// Pick the first payment method and advance
    pub async fn select_payment_method(&self) -> ComprarResult<()> {
        self.base
            .driver()
            .check(&selectors::payment_method_option())
            .await?;
        self.base.click(&selectors::payment_method_continue()).await?;
        self.settle(STEP_SETTLE_MS).await;
        Ok(())
    }

    /// Accept the payment info panel and advance
    pub async fn confirm_payment_info(&self) -> ComprarResult<()> {
        self.base.click(&selectors::payment_info_continue()).await?;
        self.settle(STEP_SETTLE_MS).await;
        Ok(())
    }

    /// Place the order
    pub async fn confirm_order(&self) -> ComprarResult<()> {
        self.base.click(&selectors::confirm_button()).await?;
        self.base.wait_for_page_load().await
    }

    /// Whether the order-completed banner appeared
    pub async fn is_order_successful(&self) -> ComprarResult<bool> {
        self.base
            .probe(
                &selectors::success_message(),
                Duration::from_millis(SUCCESS_PROBE_MS),
            )
            .await
    }

    /// Order number from the completion page detail line
    pub async fn order_number(&self) -> ComprarResult<String> {
        self.base.wait_for(&selectors::success_message()).await?;
        let text = self.base.text(&selectors::order_number()).await?;
        Ok(text.trim().trim_start_matches("Order number:").trim().to_string())
    }

    /// Run the whole wizard: billing through confirmation
    pub async fn complete_checkout(&self, address: &BillingAddress) -> ComprarResult<()> {
        self.fill_billing_address(address).await?;
        self.select_shipping_address().await?;
        self.select_shipping_method().await?;
        self.select_payment_method().await?;
        self.confirm_payment_info().await?;
        self.confirm_order().await
    }

    async fn settle(&self, ms: u64) {
        self.base.driver().settle(Duration::from_millis(ms)).await;
    }
}
