use crate::config::Locator;
use crate::session::PageSession;
use crate::SessionResult;
use std::time::Duration;
use tokio::time::sleep;

pub const SCROLL_INTO_VIEW_JS: &str = "function() { this.scrollIntoView({block: 'center'}); }";

/// Script click; overlays on the page routinely intercept native clicks
pub const CLICK_JS: &str = "function() { this.click(); }";

/// Settle time between scrolling the control into view and clicking it
pub const SETTLE_PAUSE: Duration = Duration::from_millis(500);

/// Finds the "load more" control, trying each locator in order
///
/// Each locator gets its own bounded wait of `timeout`. Returns `Ok(None)`
/// when no locator produces a clickable element.
pub async fn locate_control<S: PageSession>(
    session: &mut S,
    locators: &[Locator],
    timeout: Duration,
) -> SessionResult<Option<S::Element>> {
    for locator in locators {
        match session.wait_until_clickable(locator, timeout).await? {
            Some(control) => {
                tracing::debug!("Found load-more control via '{}'", locator.css);
                return Ok(Some(control));
            }
            None => tracing::trace!("No load-more control via '{}'", locator.css),
        }
    }

    Ok(None)
}

/// Scrolls the control into view and clicks it through the page's scripting
pub async fn activate<S: PageSession>(session: &mut S, control: &S::Element) -> SessionResult<()> {
    session.invoke_on(control, SCROLL_INTO_VIEW_JS).await?;
    sleep(SETTLE_PAUSE).await;
    session.invoke_on(control, CLICK_JS).await?;
    Ok(())
}
