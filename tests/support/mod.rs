//! Scripted in-memory storefront used in place of a browser
//!
//! Mirrors the pages, element ids and error messages of the demo store
//! closely enough for the login and checkout scenarios to run unchanged.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use ddt::common::config::{CheckoutConfig, Config, Timeouts};
use ddt::{Error, Locator, Result, SessionFactory, Target};

pub const BASE_URL: &str = "https://shop.test/";

const VALID_USERS: &[&str] = &["standard_user", "problem_user", "performance_glitch_user"];
const PASSWORD: &str = "secret_sauce";

/// How the fake store misbehaves, if at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Normal,
    /// Submit buttons do nothing, so no terminal marker ever appears
    Unresponsive,
    /// Clicking a submit button panics
    PanicOnSubmit,
    /// The order confirmation header has the wrong text
    BrokenConfirmation,
    /// After a submit, visibility and URL probes never answer
    StalledAfterSubmit,
    /// Clicking a submit button never returns
    FrozenSubmit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Blank,
    Login,
    Inventory,
    Cart,
    StepOne,
    StepTwo,
    Complete,
}

impl Page {
    fn path(self) -> &'static str {
        match self {
            Page::Blank => "",
            Page::Login => "",
            Page::Inventory => "inventory.html",
            Page::Cart => "cart.html",
            Page::StepOne => "checkout-step-one.html",
            Page::StepTwo => "checkout-step-two.html",
            Page::Complete => "checkout-complete.html",
        }
    }
}

/// Everything one session typed, in order
pub type Typed = Vec<(String, String)>;

/// What one session did: typing and clicks, in order
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    pub typed: Typed,
    pub clicked: Vec<String>,
}

pub struct Storefront {
    behavior: Behavior,
    page: Page,
    inputs: HashMap<String, String>,
    error: Option<String>,
    cart: usize,
    stalled: bool,
    log: SessionLog,
}

impl Storefront {
    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            page: Page::Blank,
            inputs: HashMap::new(),
            error: None,
            cart: 0,
            stalled: false,
            log: SessionLog::default(),
        }
    }

    fn key(locator: &Locator) -> String {
        match locator {
            Locator::Id(v) | Locator::ClassName(v) | Locator::Css(v) => v.clone(),
            Locator::XPath(v) if v.contains("data-test='error'") => "error".to_string(),
            Locator::XPath(v) => v.clone(),
        }
    }

    fn visible(&self, key: &str) -> bool {
        let on_page: &[&str] = match self.page {
            Page::Blank => &[],
            Page::Login => &["user-name", "password", "login-button"],
            Page::Inventory => &[
                "inventory_container",
                "shopping_cart_link",
                "add-to-cart-sauce-labs-backpack",
            ],
            Page::Cart => &["shopping_cart_link", "checkout"],
            Page::StepOne => &["first-name", "last-name", "postal-code", "continue"],
            Page::StepTwo => &["finish"],
            Page::Complete => &["complete-header"],
        };
        on_page.contains(&key) || (key == "error" && self.error.is_some())
    }

    fn require(&self, locator: &Locator) -> Result<String> {
        let key = Self::key(locator);
        if self.visible(&key) {
            Ok(key)
        } else {
            Err(Error::ElementNotFound(locator.to_string()))
        }
    }

    fn field(&self, key: &str) -> &str {
        self.inputs.get(key).map(String::as_str).unwrap_or("")
    }

    fn submit_login(&mut self) {
        let user = self.field("user-name").to_string();
        let password = self.field("password").to_string();
        self.error = if user.is_empty() {
            Some("Epic sadface: Username is required".to_string())
        } else if password.is_empty() {
            Some("Epic sadface: Password is required".to_string())
        } else if user == "locked_out_user" && password == PASSWORD {
            Some("Epic sadface: Sorry, this user has been locked out.".to_string())
        } else if VALID_USERS.contains(&user.as_str()) && password == PASSWORD {
            None
        } else {
            Some(
                "Epic sadface: Username and password do not match any user in this service"
                    .to_string(),
            )
        };
        if self.error.is_none() {
            self.navigate(Page::Inventory);
        }
    }

    fn submit_checkout(&mut self) {
        self.error = if self.field("first-name").is_empty() {
            Some("Error: First Name is required".to_string())
        } else if self.field("last-name").is_empty() {
            Some("Error: Last Name is required".to_string())
        } else if self.field("postal-code").is_empty() {
            Some("Error: Postal Code is required".to_string())
        } else {
            None
        };
        if self.error.is_none() {
            self.navigate(Page::StepTwo);
        }
    }

    fn navigate(&mut self, page: Page) {
        self.page = page;
        self.inputs.clear();
        self.error = None;
    }
}

#[async_trait]
impl Target for Storefront {
    async fn goto(&mut self, url: &str) -> Result<()> {
        if url != BASE_URL {
            return Err(Error::Driver(format!("unknown url {}", url)));
        }
        self.navigate(Page::Login);
        Ok(())
    }

    async fn send_keys(&mut self, locator: &Locator, text: &str) -> Result<()> {
        let key = self.require(locator)?;
        self.inputs.entry(key.clone()).or_default().push_str(text);
        self.log.typed.push((key, text.to_string()));
        Ok(())
    }

    async fn click(&mut self, locator: &Locator) -> Result<()> {
        let key = self.require(locator)?;
        tokio::task::yield_now().await;
        self.log.clicked.push(key.clone());

        let submit = key == "login-button" || key == "continue";
        if submit && self.behavior == Behavior::Unresponsive {
            return Ok(());
        }
        if submit && self.behavior == Behavior::FrozenSubmit {
            std::future::pending::<()>().await;
        }
        if submit && self.behavior == Behavior::StalledAfterSubmit {
            self.stalled = true;
        }
        if submit && self.behavior == Behavior::PanicOnSubmit {
            panic!("renderer crashed on {}", key);
        }

        match key.as_str() {
            "login-button" => self.submit_login(),
            "continue" => self.submit_checkout(),
            "add-to-cart-sauce-labs-backpack" => self.cart += 1,
            "shopping_cart_link" => self.navigate(Page::Cart),
            "checkout" if self.cart > 0 => self.navigate(Page::StepOne),
            "finish" => self.navigate(Page::Complete),
            _ => {}
        }
        Ok(())
    }

    async fn text(&mut self, locator: &Locator) -> Result<String> {
        let key = self.require(locator)?;
        Ok(match key.as_str() {
            "error" => self.error.clone().unwrap_or_default(),
            "complete-header" if self.behavior == Behavior::BrokenConfirmation => {
                "Order pending".to_string()
            }
            "complete-header" => "Thank you for your order!".to_string(),
            _ => self.field(&key).to_string(),
        })
    }

    async fn is_visible(&mut self, locator: &Locator) -> Result<bool> {
        if self.stalled {
            std::future::pending::<()>().await;
        }
        Ok(self.visible(&Self::key(locator)))
    }

    async fn current_url(&mut self) -> Result<String> {
        if self.stalled {
            std::future::pending::<()>().await;
        }
        Ok(match self.page {
            Page::Blank => "about:blank".to_string(),
            page => format!("{}{}", BASE_URL, page.path()),
        })
    }
}

/// Hands out fresh storefront sessions and keeps count of them
pub struct StorefrontFactory {
    behavior: Behavior,
    opened: AtomicUsize,
    closed: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    logs: Mutex<Vec<SessionLog>>,
}

impl StorefrontFactory {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            opened: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            logs: Mutex::new(Vec::new()),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Typing log of every closed session, in close order
    pub fn typed(&self) -> Vec<Typed> {
        self.logs().into_iter().map(|log| log.typed).collect()
    }

    /// Full log of every closed session, in close order
    pub fn logs(&self) -> Vec<SessionLog> {
        self.logs.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionFactory for StorefrontFactory {
    type Session = Storefront;

    async fn open(&self) -> Result<Storefront> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Ok(Storefront::new(self.behavior))
    }

    async fn close(&self, session: Storefront) -> Result<()> {
        self.logs.lock().unwrap().push(session.log);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Short timeouts so stalled records fail fast
pub fn fast_timeouts() -> Timeouts {
    Timeouts {
        terminal_secs: 1,
        page_secs: 1,
        poll_interval_ms: 5,
        record_secs: 3,
    }
}

/// Configuration pointing the scenarios at the fake store
pub fn store_config() -> Config {
    let mut config = Config::default();
    config.site.base_url = BASE_URL.to_string();
    config.checkout = CheckoutConfig::default();
    config.timeouts = fast_timeouts();
    config
}
