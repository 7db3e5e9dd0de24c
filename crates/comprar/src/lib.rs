//! Comprar: locator-driven storefront testing with independent price
//! reconciliation.
//!
//! Comprar (Spanish: "to buy") drives an e-commerce storefront through
//! page objects and recomputes every price the storefront displays,
//! reporting each discrepancy instead of trusting the page.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    COMPRAR Architecture                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐    ┌──────────────┐    ┌────────────────────┐  │
//! │  │ Fixtures │    │ Place-Order  │    │ Page Objects       │  │
//! │  │ (JSON/   │───►│ Scenario     │───►│ over ComprarDriver │  │
//! │  │  CSV)    │    │ + Prices     │    │ (CDP or mock)      │  │
//! │  └──────────┘    └──────────────┘    └────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The driver seam is the [`driver::ComprarDriver`] trait: scenarios
//! and page objects run unchanged against a real browser (the
//! `browser` feature) or the scripted [`driver::MockDriver`].

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod config;
pub mod driver;
pub mod fixture;
pub mod locator;
pub mod page;
pub mod price;
pub mod result;
pub mod scenario;

pub use config::StoreConfig;
pub use driver::{ComprarDriver, MockDriver};
#[cfg(feature = "browser")]
pub use driver::CdpDriver;
pub use fixture::{FixtureStore, Product, User};
pub use locator::{Locator, Selector};
pub use page::{
    BillingAddress, CartPage, CheckoutPage, HomePage, LoginPage, ProductPage, SummaryAmount,
};
pub use price::{CartLineItem, PriceCheck};
pub use result::{ComprarError, ComprarResult};
pub use scenario::{PlaceOrderScenario, ScenarioReport, StepOutcome};
