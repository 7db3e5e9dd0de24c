//! End-to-end place-order scenario.
//!
//! Drives the whole purchase flow against one driver: sign in, add
//! each fixture product (reconciling its displayed price), validate
//! the cart's arithmetic, then run the checkout wizard and capture the
//! order number.
//!
//! Failures split into two kinds. Infrastructure failures, a missing
//! element or a dead browser, abort the scenario with an error.
//! Business failures, a price that does not reconcile or a login that
//! does not stick, are recorded in the [`ScenarioReport`] and the
//! scenario carries on where it meaningfully can.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::driver::ComprarDriver;
use crate::fixture::Product;
use crate::page::{
    BillingAddress, CartPage, CheckoutPage, HomePage, LoginPage, ProductPage, SummaryAmount,
};
use crate::price::{self, format_price};
use crate::result::ComprarResult;

/// Outcome of one scenario step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Step name
    pub name: String,
    /// Whether the step passed
    pub passed: bool,
    /// Failure detail, when it did not
    pub detail: Option<String>,
    /// Step duration
    pub duration: Duration,
}

impl StepOutcome {
    fn pass(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: None,
            duration,
        }
    }

    fn fail(name: impl Into<String>, detail: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: Some(detail.into()),
            duration,
        }
    }
}

/// Report from one scenario run
#[derive(Debug, Clone, Default)]
pub struct ScenarioReport {
    /// Step outcomes, in execution order
    pub steps: Vec<StepOutcome>,
    /// Every price discrepancy found along the way
    pub price_errors: Vec<String>,
    /// Order number, when checkout completed
    pub order_number: Option<String>,
    /// Total scenario duration
    pub duration: Duration,
}

impl ScenarioReport {
    /// Whether every step passed and every price reconciled
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.price_errors.is_empty() && self.steps.iter().all(|s| s.passed)
    }

    /// Steps that failed
    #[must_use]
    pub fn failures(&self) -> Vec<&StepOutcome> {
        self.steps.iter().filter(|s| !s.passed).collect()
    }

    fn record(&mut self, step: StepOutcome) {
        if step.passed {
            info!(step = %step.name, ?step.duration, "step passed");
        } else {
            warn!(
                step = %step.name,
                detail = step.detail.as_deref().unwrap_or(""),
                "step failed"
            );
        }
        self.steps.push(step);
    }
}

/// The place-order scenario: login, add products, validate, checkout
#[derive(Debug, Clone)]
pub struct PlaceOrderScenario {
    config: StoreConfig,
    products: Vec<Product>,
    billing: BillingAddress,
}

impl PlaceOrderScenario {
    /// Build a scenario over the given products
    #[must_use]
    pub fn new(config: StoreConfig, products: Vec<Product>) -> Self {
        Self {
            config,
            products,
            billing: Self::default_billing(),
        }
    }

    /// Override the billing address used at checkout
    #[must_use]
    pub fn with_billing(mut self, billing: BillingAddress) -> Self {
        self.billing = billing;
        self
    }

    fn default_billing() -> BillingAddress {
        BillingAddress {
            country: Some("1".to_string()),
            city: "New York".to_string(),
            address1: "123 Test Street".to_string(),
            zip_code: "10001".to_string(),
            phone: "1234567890".to_string(),
        }
    }

    /// Run the scenario against a driver.
    ///
    /// Returns `Err` only for infrastructure failures; business
    /// failures land in the report.
    pub async fn run<D: ComprarDriver>(&self, driver: &D) -> ComprarResult<ScenarioReport> {
        let started = Instant::now();
        let mut report = ScenarioReport::default();

        let home = HomePage::new(driver, &self.config);
        let login = LoginPage::new(driver, &self.config);
        let product_page = ProductPage::new(driver, &self.config);
        let cart = CartPage::new(driver, &self.config);
        let checkout = CheckoutPage::new(driver, &self.config);

        home.navigate_to_home().await?;

        // Step 1: login
        let step_started = Instant::now();
        login.login(&self.config.email, &self.config.password).await?;
        if login.is_logged_in().await? {
            report.record(StepOutcome::pass("login", step_started.elapsed()));
        } else {
            report.record(StepOutcome::fail(
                "login",
                format!("no signed-in session for {}", self.config.email),
                step_started.elapsed(),
            ));
            report.duration = started.elapsed();
            return Ok(report);
        }

        // Step 2: add each product, reconciling its displayed price
        let step_started = Instant::now();
        for product in &self.products {
            info!(product = %product.name, quantity = product.quantity, "adding to cart");
            home.navigate_to_home().await?;
            home.search_product(&product.name).await?;
            product_page.select_product_from_list(&product.name).await?;

            let displayed = product_page.product_price().await?;
            if !price::prices_match(displayed, product.price) {
                report.price_errors.push(format!(
                    "Price mismatch for {}: expected {}, got {}",
                    product.name,
                    format_price(product.price),
                    format_price(displayed)
                ));
            }

            product_page.add_to_cart(product.quantity).await?;
            product_page.close_success_message().await?;
        }
        report.record(StepOutcome::pass("add products", step_started.elapsed()));

        // Step 3: validate cart arithmetic
        let step_started = Instant::now();
        home.navigate_to_cart().await?;
        let items = cart.cart_items().await?;
        if items.is_empty() {
            report.record(StepOutcome::fail(
                "validate cart",
                "cart has no rows",
                step_started.elapsed(),
            ));
            report.duration = started.elapsed();
            return Ok(report);
        }

        let observed_sub_total = cart.sub_total().await?;
        let shipping = cart.shipping_cost().await?.or_zero();
        // Before a shipping method is chosen the storefront may not
        // price the total yet; reconcile it only once displayed.
        let observed_grand_total = match cart.total_price().await? {
            SummaryAmount::Known(value) => value,
            SummaryAmount::Unknown => price::grand_total(observed_sub_total, shipping),
        };

        let check = price::validate_cart(&items, observed_sub_total, shipping, observed_grand_total);
        if check.is_valid {
            report.record(StepOutcome::pass("validate cart", step_started.elapsed()));
        } else {
            report.price_errors.extend(check.errors.iter().cloned());
            report.record(StepOutcome::fail(
                "validate cart",
                check.errors.join("; "),
                step_started.elapsed(),
            ));
        }

        // Step 4: checkout
        let step_started = Instant::now();
        cart.proceed_to_checkout().await?;
        checkout.complete_checkout(&self.billing).await?;
        if checkout.is_order_successful().await? {
            let order_number = checkout.order_number().await?;
            info!(order_number = %order_number, "order placed");
            report.order_number = Some(order_number);
            report.record(StepOutcome::pass("checkout", step_started.elapsed()));
        } else {
            report.record(StepOutcome::fail(
                "checkout",
                "order-completed banner never appeared",
                step_started.elapsed(),
            ));
        }

        report.duration = started.elapsed();
        Ok(report)
    }
}
