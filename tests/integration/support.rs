//! Scripted in-memory page session for crawl tests
//!
//! The fake page renders an initial set of review rows. Each click on the
//! "load more" control appends the next scripted batch (or a generated one
//! when the page is endless). Everything the crawler does to the page is
//! recorded in a shared `Probe`.

use async_trait::async_trait;
use review_harvest::config::SelectorConfig;
use review_harvest::crawler::metadata::RELEASE_DATE_JS;
use review_harvest::crawler::CLICK_JS;
use review_harvest::session::{ElementHandle, PageSession, ScrollPosition};
use review_harvest::{SessionError, SessionResult};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// One review row of the fake page; `None` fields have no element
#[derive(Debug, Clone, Default)]
pub struct FakeRow {
    pub critic: Option<String>,
    pub publication: Option<String>,
    pub text: Option<String>,
    pub sentiment: Option<String>,
    pub date: Option<String>,
    pub link: Option<String>,
    pub original_score: Option<String>,

    /// Number of reads that fail as stale before the row reads normally
    pub stale_reads: Arc<AtomicU32>,
}

impl FakeRow {
    /// A fully populated row whose identity is derived from `n`
    pub fn numbered(n: usize) -> Self {
        Self {
            critic: Some(format!("Critic {}", n)),
            publication: Some(format!("Publication {}", n)),
            text: Some(format!("Review number {} has plenty to say.", n)),
            sentiment: Some(if n % 2 == 0 { "POSITIVE" } else { "NEGATIVE" }.to_string()),
            date: Some("Jan 1, 2024".to_string()),
            link: Some(format!("https://example.com/review/{}", n)),
            original_score: Some(format!("Original Score: {}/5 | Full Review", n % 5 + 1)),
            stale_reads: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn stale_for(self, reads: u32) -> Self {
        self.stale_reads.store(reads, Ordering::SeqCst);
        self
    }
}

pub fn rows(range: std::ops::Range<usize>) -> Vec<FakeRow> {
    range.map(FakeRow::numbered).collect()
}

#[derive(Debug, Clone)]
pub enum FakeElement {
    Row(FakeRow),
    Control(String),
    /// A clickable button that is not the "load more" control
    Decoy(String),
    Leaf {
        text: String,
        attribute: Option<(String, String)>,
    },
}

fn leaf_text(value: &Option<String>, selector: &str) -> SessionResult<FakeElement> {
    match value {
        Some(text) => Ok(FakeElement::Leaf {
            text: text.clone(),
            attribute: None,
        }),
        None => Err(not_found(selector)),
    }
}

fn leaf_attribute(value: &Option<String>, name: &str, selector: &str) -> SessionResult<FakeElement> {
    match value {
        Some(v) => Ok(FakeElement::Leaf {
            text: String::new(),
            attribute: Some((name.to_string(), v.clone())),
        }),
        None => Err(not_found(selector)),
    }
}

fn not_found(selector: &str) -> SessionError {
    SessionError::NotFound {
        selector: selector.to_string(),
    }
}

#[async_trait]
impl ElementHandle for FakeElement {
    async fn find_child(&self, selector: &str) -> SessionResult<Self> {
        let row = match self {
            FakeElement::Row(row) => row,
            _ => return Err(not_found(selector)),
        };

        let remaining = row.stale_reads.load(Ordering::SeqCst);
        if remaining > 0 {
            row.stale_reads.store(remaining - 1, Ordering::SeqCst);
            return Err(SessionError::StaleElement);
        }

        let selectors = SelectorConfig::default();
        if selector == selectors.critic {
            leaf_text(&row.critic, selector)
        } else if selector == selectors.publication {
            leaf_text(&row.publication, selector)
        } else if selector == selectors.review_text {
            leaf_text(&row.text, selector)
        } else if selector == selectors.score_icon {
            leaf_attribute(&row.sentiment, &selectors.score_attribute, selector)
        } else if selector == selectors.review_date {
            leaf_text(&row.date, selector)
        } else if selector == selectors.review_link {
            leaf_attribute(&row.link, "href", selector)
        } else if selector == selectors.original_score {
            leaf_text(&row.original_score, selector)
        } else {
            Err(not_found(selector))
        }
    }

    async fn text(&self) -> SessionResult<String> {
        match self {
            FakeElement::Leaf { text, .. } => Ok(text.clone()),
            FakeElement::Control(label) | FakeElement::Decoy(label) => Ok(label.clone()),
            FakeElement::Row(_) => Ok(String::new()),
        }
    }

    async fn attribute(&self, name: &str) -> SessionResult<Option<String>> {
        match self {
            FakeElement::Leaf {
                attribute: Some((key, value)),
                ..
            } if key == name => Ok(Some(value.clone())),
            _ => Ok(None),
        }
    }
}

/// When the "load more" control is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Absent,
    /// Present while scripted batches remain
    UntilExhausted,
    /// Present forever, even when clicks add nothing
    Always,
    /// Like `UntilExhausted`, but only rendered after the page has been
    /// scrolled to the bottom twice
    AfterSecondScroll,
}

/// Behavior of the fake page
#[derive(Debug, Clone)]
pub struct PageScript {
    pub initial: Vec<FakeRow>,
    pub batches: VecDeque<Vec<FakeRow>>,
    pub control: ControlMode,

    /// Index of the load-more locator that matches the control
    pub control_locator: usize,
    pub control_label: String,

    /// Other buttons rendered under the control's locator, ahead of it
    pub decoys: Vec<String>,

    /// Generate `rows_per_click` fresh rows per click once batches run out
    pub endless: bool,
    pub rows_per_click: usize,

    /// Clicks that fail as intercepted before clicks start working
    pub failing_clicks: u32,

    /// Rows never appear, so the initial wait times out
    pub never_renders: bool,

    /// Navigation fails with this error
    pub navigation_error: Option<SessionError>,

    pub title: Option<String>,
    pub release_label: Option<String>,
}

impl Default for PageScript {
    fn default() -> Self {
        Self {
            initial: Vec::new(),
            batches: VecDeque::new(),
            control: ControlMode::Absent,
            control_locator: 0,
            control_label: "Load More".to_string(),
            decoys: Vec::new(),
            endless: false,
            rows_per_click: 2,
            failing_clicks: 0,
            never_renders: false,
            navigation_error: None,
            title: None,
            release_label: None,
        }
    }
}

/// What the crawler did to the page
#[derive(Debug, Default)]
pub struct Probe {
    pub navigations: Vec<String>,
    pub clicks: u32,
    pub failed_clicks: u32,
    pub row_scans: u32,
    pub bottom_scrolls: u32,
    pub closed: bool,
}

pub struct ScriptedSession {
    script: PageScript,
    rendered: Vec<FakeRow>,
    generated: usize,
    selectors: SelectorConfig,
    probe: Arc<Mutex<Probe>>,
}

impl ScriptedSession {
    pub fn new(script: PageScript) -> (Self, Arc<Mutex<Probe>>) {
        let probe = Arc::new(Mutex::new(Probe::default()));
        let session = Self {
            script,
            rendered: Vec::new(),
            generated: 0,
            selectors: SelectorConfig::default(),
            probe: Arc::clone(&probe),
        };
        (session, probe)
    }

    fn control_visible(&self) -> bool {
        match self.script.control {
            ControlMode::Absent => false,
            ControlMode::UntilExhausted => !self.script.batches.is_empty(),
            ControlMode::Always => true,
            ControlMode::AfterSecondScroll => {
                self.probe.lock().unwrap().bottom_scrolls >= 2 && !self.script.batches.is_empty()
            }
        }
    }

    fn click(&mut self) -> SessionResult<Value> {
        if self.script.failing_clicks > 0 {
            self.script.failing_clicks -= 1;
            self.probe.lock().unwrap().failed_clicks += 1;
            return Err(SessionError::ClickIntercepted(
                "overlay received the click".to_string(),
            ));
        }

        self.probe.lock().unwrap().clicks += 1;

        if let Some(batch) = self.script.batches.pop_front() {
            self.rendered.extend(batch);
        } else if self.script.endless {
            // Numbers far above any scripted row
            let start = 10_000 + self.generated;
            self.generated += self.script.rows_per_click;
            self.rendered
                .extend(rows(start..start + self.script.rows_per_click));
        }

        Ok(Value::Null)
    }
}

#[async_trait]
impl PageSession for ScriptedSession {
    type Element = FakeElement;

    async fn navigate(&mut self, url: &str) -> SessionResult<()> {
        self.probe.lock().unwrap().navigations.push(url.to_string());

        if let Some(e) = &self.script.navigation_error {
            return Err(e.clone());
        }
        if !self.script.never_renders {
            self.rendered = self.script.initial.clone();
        }
        Ok(())
    }

    async fn find_all(&mut self, selector: &str) -> SessionResult<Vec<FakeElement>> {
        if selector == self.selectors.review_row {
            self.probe.lock().unwrap().row_scans += 1;
            return Ok(self.rendered.iter().cloned().map(FakeElement::Row).collect());
        }
        if selector == self.selectors.page_title {
            return Ok(self
                .script
                .title
                .iter()
                .map(|title| FakeElement::Leaf {
                    text: title.clone(),
                    attribute: None,
                })
                .collect());
        }
        let control_css = &self.selectors.load_more[self.script.control_locator].css;
        if control_css == selector {
            let mut found: Vec<FakeElement> = self
                .script
                .decoys
                .iter()
                .cloned()
                .map(FakeElement::Decoy)
                .collect();
            if self.control_visible() {
                found.push(FakeElement::Control(self.script.control_label.clone()));
            }
            return Ok(found);
        }
        Ok(Vec::new())
    }

    async fn execute_script(&mut self, script: &str) -> SessionResult<Value> {
        if script == RELEASE_DATE_JS {
            let items: Vec<Value> = self
                .script
                .release_label
                .iter()
                .map(|label| json!({ "own": label, "full": label }))
                .collect();
            return Ok(Value::Array(items));
        }
        if script == ScrollPosition::Bottom.script() {
            self.probe.lock().unwrap().bottom_scrolls += 1;
        }
        Ok(Value::Null)
    }

    async fn invoke_on(&mut self, element: &FakeElement, function: &str) -> SessionResult<Value> {
        match element {
            FakeElement::Control(_) if function == CLICK_JS => self.click(),
            _ => Ok(Value::Null),
        }
    }

    async fn is_clickable(&mut self, element: &FakeElement) -> SessionResult<bool> {
        Ok(matches!(element, FakeElement::Control(_) | FakeElement::Decoy(_)))
    }

    async fn close(&mut self) -> SessionResult<()> {
        self.probe.lock().unwrap().closed = true;
        Ok(())
    }
}
