//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a deferred reference to a UI element: it describes
//! *how* to find the element, and is resolved (and waited on) by the
//! driver at the moment of use. Locators compose — a cart row scopes
//! its cell locators, and `nth` narrows a match list to one row — so
//! page objects never touch raw DOM queries directly.
//!
//! Each locator can render itself as a JavaScript query expression for
//! script-evaluating drivers, and as a canonical `a >> b >> nth=i`
//! string used for logging and for keying scripted mock state.

use std::fmt;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g. `#checkout`, `input[value="Search"]`)
    Css(String),
    /// Any element whose text content contains the given string
    Text(String),
    /// Anchor element matched by its visible text
    Link {
        /// Link text to match
        name: String,
        /// Require an exact (trimmed) text match instead of `contains`
        exact: bool,
    },
    /// CSS selector narrowed by a text-content filter
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create an exact-text link selector
    #[must_use]
    pub fn link(name: impl Into<String>) -> Self {
        Self::Link {
            name: name.into(),
            exact: true,
        }
    }

    /// JavaScript expression yielding an `Array` of matches under `root`
    fn to_array_expr(&self, root: &str) -> String {
        match self {
            Self::Css(s) => format!("Array.from({root}.querySelectorAll({s:?}))"),
            Self::Text(t) => format!(
                "Array.from({root}.querySelectorAll('*')).filter(el => (el.textContent || '').includes({t:?}))"
            ),
            Self::Link { name, exact } => {
                if *exact {
                    format!(
                        "Array.from({root}.querySelectorAll('a')).filter(el => (el.textContent || '').trim() === {name:?})"
                    )
                } else {
                    format!(
                        "Array.from({root}.querySelectorAll('a')).filter(el => (el.textContent || '').includes({name:?}))"
                    )
                }
            }
            Self::CssWithText { css, text } => format!(
                "Array.from({root}.querySelectorAll({css:?})).filter(el => (el.textContent || '').includes({text:?}))"
            ),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "{s}"),
            Self::Text(t) => write!(f, "text={t}"),
            Self::Link { name, exact } => {
                if *exact {
                    write!(f, "link={name:?}")
                } else {
                    write!(f, "link~={name:?}")
                }
            }
            Self::CssWithText { css, text } => write!(f, "{css}:has-text({text:?})"),
        }
    }
}

/// A deferred, composable reference to one or more UI elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    parent: Option<Box<Locator>>,
    nth: Option<usize>,
}

impl Locator {
    /// Create a locator from a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::css(selector))
    }

    /// Create a locator matching elements by text content
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_selector(Selector::text(text))
    }

    /// Create a locator matching a link by its exact visible text
    #[must_use]
    pub fn link(name: impl Into<String>) -> Self {
        Self::from_selector(Selector::link(name))
    }

    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            parent: None,
            nth: None,
        }
    }

    /// Narrow a CSS locator to elements containing the given text
    #[must_use]
    pub fn has_text(mut self, text: impl Into<String>) -> Self {
        self.selector = match self.selector {
            Selector::Css(css) => Selector::CssWithText {
                css,
                text: text.into(),
            },
            other => other,
        };
        self
    }

    /// Narrow the match list to the element at `index` (DOM order)
    #[must_use]
    pub const fn nth(mut self, index: usize) -> Self {
        self.nth = Some(index);
        self
    }

    /// Narrow the match list to its first element
    #[must_use]
    pub const fn first(self) -> Self {
        self.nth(0)
    }

    /// Scope a child selector under this locator's first match
    #[must_use]
    pub fn child(&self, selector: Selector) -> Self {
        Self {
            selector,
            parent: Some(Box::new(self.clone())),
            nth: None,
        }
    }

    /// Scope a child CSS selector under this locator's first match
    #[must_use]
    pub fn child_css(&self, css: impl Into<String>) -> Self {
        self.child(Selector::css(css))
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// JavaScript expression producing the `Array` of matching elements
    #[must_use]
    pub fn to_elements_expr(&self) -> String {
        let base = match &self.parent {
            None => self.selector.to_array_expr("document"),
            Some(parent) => format!(
                "{}.slice(0, 1).flatMap(root => {})",
                parent.to_elements_expr(),
                self.selector.to_array_expr("root")
            ),
        };
        match self.nth {
            Some(i) => format!("{base}.slice({i}, {i} + 1)"),
            None => base,
        }
    }

    /// Expression counting the matching elements
    #[must_use]
    pub fn to_count_expr(&self) -> String {
        format!("{}.length", self.to_elements_expr())
    }

    /// Expression yielding the first match's text content, or `null`
    #[must_use]
    pub fn to_text_expr(&self) -> String {
        format!(
            "(() => {{ const el = {}[0]; return el ? el.textContent : null; }})()",
            self.to_elements_expr()
        )
    }

    /// Expression yielding the first match's input value, or `null`
    #[must_use]
    pub fn to_input_value_expr(&self) -> String {
        format!(
            "(() => {{ const el = {}[0]; return el && el.value !== undefined ? String(el.value) : null; }})()",
            self.to_elements_expr()
        )
    }

    /// Expression checking whether any match is visible
    #[must_use]
    pub fn to_visible_expr(&self) -> String {
        format!(
            "{}.some(el => !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length))",
            self.to_elements_expr()
        )
    }

    /// Expression clicking the first match; yields `false` when absent
    #[must_use]
    pub fn to_click_expr(&self) -> String {
        format!(
            "(() => {{ const el = {}[0]; if (!el) return false; el.click(); return true; }})()",
            self.to_elements_expr()
        )
    }

    /// Expression filling the first match; yields `false` when absent
    #[must_use]
    pub fn to_fill_expr(&self, text: &str) -> String {
        format!(
            "(() => {{ const el = {}[0]; if (!el) return false; el.value = {text:?}; \
             el.dispatchEvent(new Event('input', {{bubbles: true}})); \
             el.dispatchEvent(new Event('change', {{bubbles: true}})); return true; }})()",
            self.to_elements_expr()
        )
    }

    /// Expression checking the first checkbox/radio match
    #[must_use]
    pub fn to_check_expr(&self) -> String {
        format!(
            "(() => {{ const el = {}[0]; if (!el) return false; if (!el.checked) el.click(); return true; }})()",
            self.to_elements_expr()
        )
    }

    /// Expression selecting an option value on the first match
    #[must_use]
    pub fn to_select_expr(&self, value: &str) -> String {
        format!(
            "(() => {{ const el = {}[0]; if (!el) return false; el.value = {value:?}; \
             el.dispatchEvent(new Event('change', {{bubbles: true}})); return true; }})()",
            self.to_elements_expr()
        )
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = &self.parent {
            write!(f, "{parent} >> ")?;
        }
        write!(f, "{}", self.selector)?;
        if let Some(i) = self.nth {
            write!(f, " >> nth={i}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_selector_query() {
            let expr = Selector::css("button.primary").to_array_expr("document");
            assert!(expr.contains("querySelectorAll"));
            assert!(expr.contains("button.primary"));
        }

        #[test]
        fn test_text_selector_query() {
            let expr = Selector::text("Shopping cart").to_array_expr("document");
            assert!(expr.contains("textContent"));
            assert!(expr.contains("Shopping cart"));
        }

        #[test]
        fn test_link_selector_exact() {
            let expr = Selector::link("Fiction").to_array_expr("document");
            assert!(expr.contains("querySelectorAll('a')"));
            assert!(expr.contains("trim() ==="));
        }

        #[test]
        fn test_link_selector_contains() {
            let selector = Selector::Link {
                name: "Books".to_string(),
                exact: false,
            };
            let expr = selector.to_array_expr("document");
            assert!(expr.contains("includes"));
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_has_text_wraps_css() {
            let locator = Locator::css("tr").has_text("Sub-Total:");
            assert!(matches!(locator.selector(), Selector::CssWithText { .. }));
        }

        #[test]
        fn test_has_text_keeps_non_css() {
            let locator = Locator::link("Fiction").has_text("ignored");
            assert!(matches!(locator.selector(), Selector::Link { .. }));
        }

        #[test]
        fn test_nth_slices_match_list() {
            let expr = Locator::css(".cart-item-row").nth(2).to_elements_expr();
            assert!(expr.ends_with(".slice(2, 2 + 1)"));
        }

        #[test]
        fn test_child_scopes_under_parent() {
            let row = Locator::css(".cart-item-row").nth(0);
            let cell = row.child_css(".unit-price");
            let expr = cell.to_elements_expr();
            assert!(expr.contains("flatMap"));
            assert!(expr.contains(".cart-item-row"));
            assert!(expr.contains(".unit-price"));
        }

        #[test]
        fn test_count_expr() {
            let expr = Locator::css(".cart-item-row").to_count_expr();
            assert!(expr.ends_with(".length"));
        }

        #[test]
        fn test_visible_expr_checks_layout() {
            let expr = Locator::css("#checkout").to_visible_expr();
            assert!(expr.contains("offsetWidth"));
            assert!(expr.contains("getClientRects"));
        }

        #[test]
        fn test_fill_expr_dispatches_events() {
            let expr = Locator::css("#Email").to_fill_expr("user@shop.test");
            assert!(expr.contains("user@shop.test"));
            assert!(expr.contains("Event('input'"));
            assert!(expr.contains("Event('change'"));
        }

        #[test]
        fn test_fill_expr_escapes_quotes() {
            let expr = Locator::css("#City").to_fill_expr(r#"New "York""#);
            assert!(expr.contains(r#"\"York\""#));
        }

        #[test]
        fn test_check_expr_clicks_unchecked_only() {
            let expr = Locator::css("#termsofservice").to_check_expr();
            assert!(expr.contains("if (!el.checked) el.click()"));
        }
    }

    mod display_tests {
        use super::*;

        #[test]
        fn test_css_display() {
            assert_eq!(Locator::css("#checkout").to_string(), "#checkout");
        }

        #[test]
        fn test_composed_display() {
            let cell = Locator::css(".cart-item-row").nth(1).child_css(".subtotal");
            assert_eq!(cell.to_string(), ".cart-item-row >> nth=1 >> .subtotal");
        }

        #[test]
        fn test_has_text_display() {
            let row = Locator::css("table.cart-total tr").has_text("Shipping:");
            assert_eq!(row.to_string(), "table.cart-total tr:has-text(\"Shipping:\")");
        }

        #[test]
        fn test_link_display() {
            assert_eq!(Locator::link("Fiction").to_string(), "link=\"Fiction\"");
        }
    }
}
