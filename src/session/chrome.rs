//! Chrome DevTools Protocol session backed by chromiumoxide

use super::{ElementHandle, PageSession};
use crate::config::BrowserConfig;
use crate::{SessionError, SessionResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Hides the automation flag before any page script runs
const FINGERPRINT_MASK_JS: &str = r#"
    Object.defineProperty(navigator, 'webdriver', {
        get: () => undefined,
        configurable: true
    });
    window.chrome = window.chrome || { runtime: {} };
    Object.defineProperty(navigator, 'languages', {
        get: () => ['en-US', 'en']
    });
"#;

/// Displayed and enabled, evaluated with `this` bound to the element
const CLICKABLE_JS: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden'
        && style.display !== 'none'
        && !this.disabled
        && !this.hasAttribute('disabled');
}"#;

/// A single Chrome tab driven over CDP
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    /// Launches Chrome with a fixed window, a desktop user agent and automation
    /// fingerprints suppressed, then opens one blank tab
    pub async fn launch(config: &BrowserConfig) -> SessionResult<Self> {
        let mut builder = LaunchConfig::builder()
            .window_size(config.window_width, config.window_height)
            .viewport(Viewport {
                width: config.window_width,
                height: config.window_height,
                ..Viewport::default()
            })
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg(format!("--user-agent={}", config.user_agent));

        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        for arg in &config.extra_args {
            builder = builder.arg(arg.as_str());
        }

        let launch_config = builder.build().map_err(SessionError::Launch)?;

        let (browser, mut handler) = Browser::launch(launch_config)
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?;

        page.execute(SetUserAgentOverrideParams::new(config.user_agent.clone()))
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?;

        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
            FINGERPRINT_MASK_JS.to_string(),
        ))
        .await
        .map_err(|e| SessionError::Launch(e.to_string()))?;

        debug!(
            "Browser ready ({}x{}, headless: {})",
            config.window_width, config.window_height, config.headless
        );

        Ok(Self {
            browser,
            page,
            handler,
        })
    }
}

/// Maps a CDP failure onto the session error taxonomy
fn classify(err: CdpError, selector: &str) -> SessionError {
    match err {
        CdpError::NotFound => SessionError::NotFound {
            selector: selector.to_string(),
        },
        CdpError::Timeout => SessionError::Timeout("browser response".to_string()),
        other => classify_message(other.to_string()),
    }
}

fn classify_message(message: String) -> SessionError {
    let lower = message.to_lowercase();

    if lower.contains("node with given id")
        || lower.contains("could not find node")
        || lower.contains("cannot find context")
        || lower.contains("does not belong to the document")
    {
        SessionError::StaleElement
    } else if lower.contains("intercept") || lower.contains("not clickable") {
        SessionError::ClickIntercepted(message)
    } else if lower.contains("websocket")
        || lower.contains("channel")
        || lower.contains("connection")
    {
        SessionError::Disconnected(message)
    } else {
        SessionError::Script(message)
    }
}

#[async_trait]
impl ElementHandle for Element {
    async fn find_child(&self, selector: &str) -> SessionResult<Self> {
        // querySelectorAll yields an empty set for a missing child rather than an error
        self.find_elements(selector)
            .await
            .map_err(|e| classify(e, selector))?
            .into_iter()
            .next()
            .ok_or_else(|| SessionError::NotFound {
                selector: selector.to_string(),
            })
    }

    async fn text(&self) -> SessionResult<String> {
        Ok(self
            .inner_text()
            .await
            .map_err(|e| classify(e, "innerText"))?
            .unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> SessionResult<Option<String>> {
        Element::attribute(self, name)
            .await
            .map_err(|e| classify(e, name))
    }
}

#[async_trait]
impl PageSession for ChromeSession {
    type Element = Element;

    async fn navigate(&mut self, url: &str) -> SessionResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| classify(e, url))?;
        Ok(())
    }

    async fn find_all(&mut self, selector: &str) -> SessionResult<Vec<Element>> {
        self.page
            .find_elements(selector)
            .await
            .map_err(|e| classify(e, selector))
    }

    async fn execute_script(&mut self, script: &str) -> SessionResult<Value> {
        let result = self
            .page
            .evaluate(script.to_string())
            .await
            .map_err(|e| classify(e, "script"))?;

        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn invoke_on(&mut self, element: &Element, function: &str) -> SessionResult<Value> {
        let returns = element
            .call_js_fn(function, false)
            .await
            .map_err(|e| classify(e, "function call"))?;

        if let Some(exception) = returns.exception_details {
            return Err(classify_message(exception.text));
        }

        Ok(returns.result.value.unwrap_or(Value::Null))
    }

    async fn is_clickable(&mut self, element: &Element) -> SessionResult<bool> {
        let value = self.invoke_on(element, CLICKABLE_JS).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn close(&mut self) -> SessionResult<()> {
        let result = self
            .browser
            .close()
            .await
            .map_err(|e| SessionError::Disconnected(e.to_string()));

        if let Err(e) = self.browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();

        result.map(|_| ())
    }
}
