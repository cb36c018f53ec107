//! Login form scenario

use async_trait::async_trait;

use crate::common::config::Timeouts;
use crate::common::Result;
use crate::fixture::EXPECTED_OUTCOME;
use crate::target::{wait_for_marker, Locator, Marker, Target};

use super::{Input, Scenario, ScenarioKind};

pub(super) const FIELDS: &[&str] = &["username", "password", EXPECTED_OUTCOME];

/// Submit a username and password and land on either the inventory or the login error
#[derive(Debug, Clone)]
pub struct LoginScenario {
    base_url: String,
    inputs: Vec<Input>,
    trigger: Locator,
    ready: Marker,
    success: Marker,
    error: Marker,
    error_text: Locator,
}

impl LoginScenario {
    pub fn new(base_url: &str) -> Self {
        let error_text = Locator::xpath("//h3[@data-test='error']");
        Self {
            base_url: base_url.to_string(),
            inputs: vec![
                Input::new("username", Locator::id("user-name")),
                Input::new("password", Locator::id("password")),
            ],
            trigger: Locator::id("login-button"),
            ready: Marker::Visible(Locator::id("login-button")),
            success: Marker::AnyOf(vec![
                Marker::Visible(Locator::id("inventory_container")),
                Marker::Visible(Locator::class_name("shopping_cart_link")),
            ]),
            error: Marker::Visible(error_text.clone()),
            error_text,
        }
    }
}

#[async_trait]
impl Scenario for LoginScenario {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::Login
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
        wait_for_marker(
            target,
            &self.ready,
            timeouts.page(),
            timeouts.poll_interval(),
            "login",
        )
        .await
    }
}
