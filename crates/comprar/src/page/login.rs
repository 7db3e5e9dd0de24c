//! Login page: sign-in, sign-out, and session checks.

use std::time::Duration;

use crate::config::StoreConfig;
use crate::driver::ComprarDriver;
use crate::result::ComprarResult;

use super::PageBase;

/// Bound for the "am I logged in?" probe (5 seconds)
const LOGIN_PROBE_MS: u64 = 5_000;

/// Element selectors for the login page and account header
pub mod selectors {
    use crate::locator::Locator;

    /// Header link to the login page
    #[must_use]
    pub fn login_link() -> Locator {
        Locator::css("a.ico-login")
    }

    /// Email field
    #[must_use]
    pub fn email_input() -> Locator {
        Locator::css("#Email")
    }

    /// Password field
    #[must_use]
    pub fn password_input() -> Locator {
        Locator::css("#Password")
    }

    /// Submit button
    #[must_use]
    pub fn login_button() -> Locator {
        Locator::css(r#"input[value="Log in"]"#)
    }

    /// Header logout link, present only for a signed-in session
    #[must_use]
    pub fn logout_link() -> Locator {
        Locator::css("a.ico-logout")
    }

    /// Header account link carrying the signed-in email
    #[must_use]
    pub fn account_link() -> Locator {
        Locator::css("a.account")
    }
}

/// Page object for the login page
#[derive(Debug)]
pub struct LoginPage<'d, D> {
    base: PageBase<'d, D>,
}

impl<'d, D: ComprarDriver> LoginPage<'d, D> {
    /// Bind the page object to a driver and configuration
    pub const fn new(driver: &'d D, config: &'d StoreConfig) -> Self {
        Self {
            base: PageBase::new(driver, config),
        }
    }

    /// Open the login page via the header link
    pub async fn navigate_to_login(&self) -> ComprarResult<()> {
        self.base.click(&selectors::login_link()).await?;
        self.base.wait_for_page_load().await
    }

    /// Sign in with the given credentials
    pub async fn login(&self, email: &str, password: &str) -> ComprarResult<()> {
        self.navigate_to_login().await?;
        self.base.fill(&selectors::email_input(), email).await?;
        self.base.fill(&selectors::password_input(), password).await?;
        self.base.click(&selectors::login_button()).await?;
        self.base.wait_for_page_load().await
    }

    /// Whether a session is signed in, judged by the logout link
    pub async fn is_logged_in(&self) -> ComprarResult<bool> {
        self.base
            .probe(
                &selectors::logout_link(),
                Duration::from_millis(LOGIN_PROBE_MS),
            )
            .await
    }

    /// Sign out if currently signed in
    pub async fn logout(&self) -> ComprarResult<()> {
        if self.is_logged_in().await? {
            self.base.click(&selectors::logout_link()).await?;
            self.base.wait_for_page_load().await?;
        }
        Ok(())
    }

    /// Email shown in the account header link
    pub async fn logged_in_email(&self) -> ComprarResult<String> {
        self.base.text(&selectors::account_link()).await
    }
}
