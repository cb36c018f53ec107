//! Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Storefront under test
    #[serde(default)]
    pub site: SiteConfig,

    /// WebDriver server settings
    #[serde(default)]
    pub webdriver: WebDriverConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Run driver settings
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Preconditions for the checkout scenario
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

/// Storefront settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// URL every session starts from
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.saucedemo.com/".to_string()
}

/// Browser family requested from the WebDriver server
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BrowserKind {
    /// Chrome via chromedriver
    #[default]
    Chrome,
    /// Firefox via geckodriver
    Firefox,
}

/// WebDriver server settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebDriverConfig {
    /// WebDriver server URL (chromedriver defaults to port 9515)
    #[serde(default = "default_webdriver_url")]
    pub url: String,

    /// Browser to request
    #[serde(default)]
    pub browser: BrowserKind,

    /// Run the browser without a window
    #[serde(default)]
    pub headless: bool,

    /// Extra browser arguments
    #[serde(default = "default_browser_args")]
    pub args: Vec<String>,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: default_webdriver_url(),
            browser: BrowserKind::default(),
            headless: false,
            args: default_browser_args(),
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_browser_args() -> Vec<String> {
    vec!["--start-maximized".to_string()]
}

/// Timeout settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Timeouts {
    /// Bounded wait for a scenario's terminal marker, in seconds
    #[serde(default = "default_terminal")]
    pub terminal_secs: u64,

    /// Bounded wait for preparation and follow-through pages, in seconds
    #[serde(default = "default_page")]
    pub page_secs: u64,

    /// Interval between marker probes, in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Upper bound on one whole record, session open to close, in seconds
    #[serde(default = "default_record")]
    pub record_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            terminal_secs: default_terminal(),
            page_secs: default_page(),
            poll_interval_ms: default_poll_interval(),
            record_secs: default_record(),
        }
    }
}

fn default_terminal() -> u64 {
    5
}
fn default_page() -> u64 {
    10
}
fn default_poll_interval() -> u64 {
    100
}
fn default_record() -> u64 {
    120
}

impl Timeouts {
    /// Wait budget for terminal markers
    pub fn terminal(&self) -> Duration {
        Duration::from_secs(self.terminal_secs)
    }

    /// Wait budget for page transitions outside the terminal wait
    pub fn page(&self) -> Duration {
        Duration::from_secs(self.page_secs)
    }

    /// Probe interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Budget for a whole record, including steps that are not waits
    pub fn record(&self) -> Duration {
        Duration::from_secs(self.record_secs)
    }
}

/// Run driver settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// Records in flight at once; 1 keeps the run sequential
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Default table name inside a fixture resource
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            table: default_table(),
        }
    }
}

fn default_workers() -> usize {
    1
}
fn default_table() -> String {
    "Sheet1".to_string()
}

/// Account and cart contents used to reach the checkout form
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutConfig {
    #[serde(default = "default_checkout_user")]
    pub username: String,

    #[serde(default = "default_checkout_password")]
    pub password: String,

    /// Element id of the add-to-cart button for the item placed in the cart
    #[serde(default = "default_checkout_item")]
    pub item_button_id: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            username: default_checkout_user(),
            password: default_checkout_password(),
            item_button_id: default_checkout_item(),
        }
    }
}

fn default_checkout_user() -> String {
    "standard_user".to_string()
}
fn default_checkout_password() -> String {
    "secret_sauce".to_string()
}
fn default_checkout_item() -> String {
    "add-to-cart-sauce-labs-backpack".to_string()
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| super::Error::Internal(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.runner.workers == 0 {
            return Err(super::Error::Config(
                "runner.workers must be at least 1".to_string(),
            ));
        }
        if self.timeouts.terminal_secs == 0 {
            return Err(super::Error::Config(
                "timeouts.terminal_secs must be at least 1".to_string(),
            ));
        }
        if self.timeouts.record_secs < self.timeouts.terminal_secs {
            return Err(super::Error::Config(
                "timeouts.record_secs must be at least timeouts.terminal_secs".to_string(),
            ));
        }
        Ok(())
    }
}
