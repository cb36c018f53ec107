//! Checkout information form scenario
//!
//! Every session logs in with the configured account, puts one item in the
//! cart and opens the first checkout step before the record's fields are
//! typed. A submission that reaches the overview page is then finished and
//! must end on the order confirmation.

use async_trait::async_trait;

use crate::common::config::{CheckoutConfig, Timeouts};
use crate::common::{Error, Result};
use crate::fixture::EXPECTED_OUTCOME;
use crate::target::{wait_for_marker, Locator, Marker, Target};

use super::{Input, Scenario, ScenarioKind};

pub(super) const FIELDS: &[&str] = &["first_name", "last_name", "postal_code", EXPECTED_OUTCOME];

/// Header text of the order confirmation page
pub const ORDER_CONFIRMATION: &str = "Thank you for your order!";

#[derive(Debug, Clone)]
pub struct CheckoutScenario {
    base_url: String,
    account: CheckoutConfig,
    inputs: Vec<Input>,
    trigger: Locator,
    success: Marker,
    error: Marker,
    error_text: Locator,
}

impl CheckoutScenario {
    pub fn new(base_url: &str, account: &CheckoutConfig) -> Self {
        let error_text = Locator::xpath("//h3[@data-test='error']");
        Self {
            base_url: base_url.to_string(),
            account: account.clone(),
            inputs: vec![
                Input::new("first_name", Locator::id("first-name")),
                Input::new("last_name", Locator::id("last-name")),
                Input::new("postal_code", Locator::id("postal-code")),
            ],
            trigger: Locator::id("continue"),
            success: Marker::UrlContains("/checkout-step-two.html".to_string()),
            error: Marker::Visible(error_text.clone()),
            error_text,
        }
    }

    async fn wait(&self, target: &mut dyn Target, marker: Marker, timeouts: &Timeouts) -> Result<()> {
        wait_for_marker(
            target,
            &marker,
            timeouts.page(),
            timeouts.poll_interval(),
            "checkout",
        )
        .await
    }
}

#[async_trait]
impl Scenario for CheckoutScenario {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::Checkout
    }

    fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    fn trigger(&self) -> &Locator {
        &self.trigger
    }

    fn success_marker(&self) -> &Marker {
        &self.success
    }

    fn error_marker(&self) -> &Marker {
        &self.error
    }

    fn error_text(&self) -> &Locator {
        &self.error_text
    }

    async fn prepare(&self, target: &mut dyn Target, timeouts: &Timeouts) -> Result<()> {
        target.goto(&self.base_url).await?;
        self.wait(target, Marker::Visible(Locator::id("login-button")), timeouts)
            .await?;

        target
            .send_keys(&Locator::id("user-name"), &self.account.username)
            .await?;
        target
            .send_keys(&Locator::id("password"), &self.account.password)
            .await?;
        target.click(&Locator::id("login-button")).await?;
        self.wait(
            target,
            Marker::Visible(Locator::id("inventory_container")),
            timeouts,
        )
        .await?;

        target
            .click(&Locator::id(&self.account.item_button_id))
            .await?;
        target
            .click(&Locator::class_name("shopping_cart_link"))
            .await?;
        self.wait(target, Marker::UrlContains("/cart.html".to_string()), timeouts)
            .await?;

        target.click(&Locator::id("checkout")).await?;
        self.wait(
            target,
            Marker::UrlContains("/checkout-step-one.html".to_string()),
            timeouts,
        )
        .await?;

        tracing::debug!(user = %self.account.username, "checkout form ready");
        Ok(())
    }

    async fn follow_through(&self, target: &mut dyn Target, timeouts: &Timeouts) -> Result<String> {
        target.click(&Locator::id("finish")).await?;
        self.wait(
            target,
            Marker::UrlContains("/checkout-complete.html".to_string()),
            timeouts,
        )
        .await?;

        let header = target.text(&Locator::class_name("complete-header")).await?;
        if header.trim() != ORDER_CONFIRMATION {
            return Err(Error::Scenario(format!(
                "order confirmation mismatch: expected '{}', got '{}'",
                ORDER_CONFIRMATION, header
            )));
        }
        Ok(header)
    }
}
