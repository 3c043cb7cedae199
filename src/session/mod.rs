//! Page-automation session abstraction
//!
//! The crawl engine never talks to a browser directly. It drives a
//! [`PageSession`], which can navigate, query the rendered DOM, read element
//! text and attributes, and run scripts in the page. The Chrome DevTools
//! implementation lives in `chrome`; tests use scripted in-memory sessions.
//!
//! The bounded waits (`wait_until_present`, `wait_until_clickable`) are
//! provided methods built on polling, so every implementation gets the same
//! timeout behavior.

#[cfg(feature = "browser")]
mod chrome;
mod manager;

#[cfg(feature = "browser")]
pub use chrome::ChromeSession;
pub use manager::SessionManager;

use crate::config::Locator;
use crate::{SessionError, SessionResult};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Interval between DOM polls while waiting for a condition
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Vertical scroll targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPosition {
    Top,
    Bottom,
}

impl ScrollPosition {
    /// Page script that performs the scroll
    pub fn script(&self) -> &'static str {
        match self {
            Self::Top => "window.scrollTo(0, 0);",
            Self::Bottom => "window.scrollTo(0, document.body.scrollHeight);",
        }
    }
}

/// A handle to one rendered element
#[async_trait]
pub trait ElementHandle: Send + Sync + Sized {
    /// Finds the first descendant matching `selector`
    ///
    /// Returns `SessionError::NotFound` when nothing matches.
    async fn find_child(&self, selector: &str) -> SessionResult<Self>;

    /// Rendered text of the element
    async fn text(&self) -> SessionResult<String>;

    /// Value of an attribute, `None` if the attribute is absent
    async fn attribute(&self, name: &str) -> SessionResult<Option<String>>;
}

/// An automated page the crawl engine can drive
#[async_trait]
pub trait PageSession: Send {
    type Element: ElementHandle;

    /// Loads `url` in the page
    async fn navigate(&mut self, url: &str) -> SessionResult<()>;

    /// All elements currently matching `selector`, in document order
    async fn find_all(&mut self, selector: &str) -> SessionResult<Vec<Self::Element>>;

    /// Runs a script in the page and returns its JSON-convertible result
    async fn execute_script(&mut self, script: &str) -> SessionResult<Value>;

    /// Calls a JavaScript function declaration with `this` bound to `element`
    async fn invoke_on(&mut self, element: &Self::Element, function: &str)
        -> SessionResult<Value>;

    /// Returns true if the element is displayed and enabled
    async fn is_clickable(&mut self, element: &Self::Element) -> SessionResult<bool>;

    /// Ends the session and releases the browser
    async fn close(&mut self) -> SessionResult<()>;

    /// The first element matching `selector`
    async fn find_one(&mut self, selector: &str) -> SessionResult<Self::Element> {
        self.find_all(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SessionError::NotFound {
                selector: selector.to_string(),
            })
    }

    async fn scroll_to(&mut self, position: ScrollPosition) -> SessionResult<()> {
        self.execute_script(position.script()).await.map(|_| ())
    }

    /// Polls until an element matching `selector` exists or `timeout` elapses
    ///
    /// Returns `Ok(false)` on timeout. Retryable lookup failures count as
    /// "not yet"; fatal ones are returned immediately.
    async fn wait_until_present(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> SessionResult<bool> {
        let deadline = Instant::now() + timeout;

        loop {
            match self.find_all(selector).await {
                Ok(found) if !found.is_empty() => return Ok(true),
                Ok(_) => {}
                Err(e) if e.is_retryable() => {
                    tracing::trace!("Lookup of '{}' failed while waiting: {}", selector, e);
                }
                Err(e) => return Err(e),
            }

            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Polls until an element matching `locator` is clickable or `timeout` elapses
    ///
    /// Returns `Ok(None)` on timeout.
    async fn wait_until_clickable(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> SessionResult<Option<Self::Element>> {
        let deadline = Instant::now() + timeout;

        loop {
            match first_clickable(self, locator).await {
                Ok(Some(element)) => return Ok(Some(element)),
                Ok(None) => {}
                Err(e) if e.is_retryable() => {
                    tracing::trace!("Lookup of '{}' failed while waiting: {}", locator.css, e);
                }
                Err(e) => return Err(e),
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

/// Returns the first candidate for `locator` that passes its text filter and is clickable
async fn first_clickable<S>(session: &mut S, locator: &Locator) -> SessionResult<Option<S::Element>>
where
    S: PageSession + ?Sized,
{
    for candidate in session.find_all(&locator.css).await? {
        if let Some(wanted) = &locator.text {
            if !candidate.text().await?.contains(wanted.as_str()) {
                continue;
            }
        }

        if session.is_clickable(&candidate).await? {
            return Ok(Some(candidate));
        }
    }

    Ok(None)
}
