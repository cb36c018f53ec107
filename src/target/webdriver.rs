//! WebDriver-backed sessions (chromedriver, geckodriver)

use async_trait::async_trait;
use thirtyfour::prelude::*;

use crate::common::config::{BrowserKind, WebDriverConfig};
use crate::common::{Error, Result};

use super::{Locator, SessionFactory, Target};

fn to_by(locator: &Locator) -> By {
    match locator {
        Locator::Id(v) => By::Id(v.as_str()),
        Locator::XPath(v) => By::XPath(v.as_str()),
        Locator::Css(v) => By::Css(v.as_str()),
        Locator::ClassName(v) => By::ClassName(v.as_str()),
    }
}

/// Opens one browser session per call against a WebDriver server
#[derive(Debug, Clone)]
pub struct WebDriverFactory {
    server_url: String,
    browser: BrowserKind,
    headless: bool,
    args: Vec<String>,
}

impl WebDriverFactory {
    pub fn new(config: &WebDriverConfig) -> Self {
        Self {
            server_url: config.url.clone(),
            browser: config.browser,
            headless: config.headless,
            args: config.args.clone(),
        }
    }

    async fn connect(&self) -> WebDriverResult<WebDriver> {
        match self.browser {
            BrowserKind::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                if self.headless {
                    caps.set_headless()?;
                }
                for arg in &self.args {
                    caps.add_chrome_arg(arg)?;
                }
                WebDriver::new(&self.server_url, caps).await
            }
            BrowserKind::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                if self.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(&self.server_url, caps).await
            }
        }
    }
}

#[async_trait]
impl SessionFactory for WebDriverFactory {
    type Session = WebDriverSession;

    async fn open(&self) -> Result<WebDriverSession> {
        let driver = self.connect().await.map_err(|e| Error::SessionStart {
            url: self.server_url.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!(server = %self.server_url, browser = ?self.browser, "browser session opened");
        Ok(WebDriverSession { driver })
    }

    async fn close(&self, session: WebDriverSession) -> Result<()> {
        session.driver.quit().await?;
        tracing::debug!(server = %self.server_url, "browser session closed");
        Ok(())
    }
}

/// A live browser session
pub struct WebDriverSession {
    driver: WebDriver,
}

impl WebDriverSession {
    async fn find(&self, locator: &Locator) -> Result<WebElement> {
        self.driver
            .find(to_by(locator))
            .await
            .map_err(|e| Error::ElementNotFound(format!("{} ({})", locator, e)))
    }
}

#[async_trait]
impl Target for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn send_keys(&mut self, locator: &Locator, text: &str) -> Result<()> {
        self.find(locator).await?.send_keys(text).await?;
        Ok(())
    }

    async fn click(&mut self, locator: &Locator) -> Result<()> {
        self.find(locator).await?.click().await?;
        Ok(())
    }

    async fn text(&mut self, locator: &Locator) -> Result<String> {
        Ok(self.find(locator).await?.text().await?)
    }

    async fn is_visible(&mut self, locator: &Locator) -> Result<bool> {
        let elements = self.driver.find_all(to_by(locator)).await?;
        for element in elements {
            // Elements can go stale mid-navigation; that only means "not yet"
            if element.is_displayed().await.unwrap_or(false) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn current_url(&mut self) -> Result<String> {
        Ok(self.driver.current_url().await?.to_string())
    }
}
