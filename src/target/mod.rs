//! The system under test, as seen by a scenario
//!
//! `Target` is the small probe surface scenarios drive: navigate, type,
//! click, read text, check visibility, read the URL. A `SessionFactory`
//! hands out fresh, isolated targets and takes them back.

pub mod wait;
pub mod webdriver;

use async_trait::async_trait;
use std::fmt;

use crate::common::Result;

pub use wait::{wait_for_any, wait_for_marker};
pub use webdriver::{WebDriverFactory, WebDriverSession};

/// How to find an element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Id(String),
    XPath(String),
    Css(String),
    ClassName(String),
}

impl Locator {
    pub fn id(id: &str) -> Self {
        Locator::Id(id.to_string())
    }

    pub fn xpath(xpath: &str) -> Self {
        Locator::XPath(xpath.to_string())
    }

    pub fn css(css: &str) -> Self {
        Locator::Css(css.to_string())
    }

    pub fn class_name(class: &str) -> Self {
        Locator::ClassName(class.to_string())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(v) => write!(f, "id={}", v),
            Locator::XPath(v) => write!(f, "xpath={}", v),
            Locator::Css(v) => write!(f, "css={}", v),
            Locator::ClassName(v) => write!(f, "class={}", v),
        }
    }
}

/// An observable condition on the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// The element exists and is displayed
    Visible(Locator),
    /// The current URL contains the fragment
    UrlContains(String),
    /// Any of the inner markers holds
    AnyOf(Vec<Marker>),
}

impl Marker {
    /// Probe the marker once. Absent elements are not an error.
    pub fn observe<'a>(
        &'a self,
        target: &'a mut dyn Target,
    ) -> futures_util::future::BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            match self {
                Marker::Visible(locator) => target.is_visible(locator).await,
                Marker::UrlContains(fragment) => {
                    Ok(target.current_url().await?.contains(fragment.as_str()))
                }
                Marker::AnyOf(markers) => {
                    for marker in markers {
                        if marker.observe(&mut *target).await? {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
            }
        })
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Visible(locator) => write!(f, "visible({})", locator),
            Marker::UrlContains(fragment) => write!(f, "url contains '{}'", fragment),
            Marker::AnyOf(markers) => {
                let parts: Vec<String> = markers.iter().map(|m| m.to_string()).collect();
                write!(f, "any of [{}]", parts.join(", "))
            }
        }
    }
}

/// Probe and action surface of one isolated session
#[async_trait]
pub trait Target: Send {
    /// Navigate to a URL
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Type text into the located element
    async fn send_keys(&mut self, locator: &Locator, text: &str) -> Result<()>;

    /// Click the located element
    async fn click(&mut self, locator: &Locator) -> Result<()>;

    /// Visible text of the located element
    async fn text(&mut self, locator: &Locator) -> Result<String>;

    /// Whether the element exists and is displayed; `false` when absent
    async fn is_visible(&mut self, locator: &Locator) -> Result<bool>;

    /// The current page URL
    async fn current_url(&mut self) -> Result<String>;
}

/// Source of isolated target sessions
///
/// Every `open` must return a session that shares no cookies, storage or
/// page state with any other open or previously closed session.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: Target + 'static;

    /// Acquire a fresh session
    async fn open(&self) -> Result<Self::Session>;

    /// Release a session. Called exactly once per opened session.
    async fn close(&self, session: Self::Session) -> Result<()>;
}
