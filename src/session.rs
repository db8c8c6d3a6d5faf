//! Single-user guide session
//!
//! Holds the form inputs, the request status and the last guide. Status
//! changes go through [`next_status`]; the browser reads the session through
//! [`Session::view`].

use serde::Serialize;

use crate::error::{NO_URLS_MESSAGE, TravelSynthError};
use crate::markdown::{self, Block};
use crate::models::{GroundingSource, TravelGuideResponse, TravelPreferences};

pub const MAX_URL_SLOTS: usize = 5;
pub const DEFAULT_URL_SLOTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Idle,
    /// Request sent, sources being read
    Analyzing,
    /// Cosmetic follow-up of `Analyzing`, no different in behavior
    Synthesizing,
    Complete,
    Error,
}

impl Status {
    #[must_use]
    pub fn is_busy(self) -> bool {
        matches!(self, Status::Analyzing | Status::Synthesizing)
    }
}

/// Something that happened to the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Submitted,
    SynthesisStarted,
    Completed,
    Failed,
}

/// Status transition table. `None` means the event does not apply in that
/// status and is ignored.
#[must_use]
pub fn next_status(status: Status, event: SessionEvent) -> Option<Status> {
    match (status, event) {
        (s, SessionEvent::Submitted) if !s.is_busy() => Some(Status::Analyzing),
        (Status::Analyzing, SessionEvent::SynthesisStarted) => Some(Status::Synthesizing),
        (s, SessionEvent::Completed) if s.is_busy() => Some(Status::Complete),
        (s, SessionEvent::Failed) if s.is_busy() => Some(Status::Error),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    urls: Vec<String>,
    preferences: TravelPreferences,
    status: Status,
    result: Option<TravelGuideResponse>,
    error: Option<String>,
    request_id: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self {
            urls: vec![String::new(); DEFAULT_URL_SLOTS],
            preferences: TravelPreferences::default(),
            status: Status::Idle,
            result: None,
            error: None,
            request_id: 0,
        }
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    #[must_use]
    pub fn preferences(&self) -> &TravelPreferences {
        &self.preferences
    }

    #[must_use]
    pub fn result(&self) -> Option<&TravelGuideResponse> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn ensure_idle(&self) -> Result<(), TravelSynthError> {
        if self.status.is_busy() {
            return Err(TravelSynthError::Busy);
        }
        Ok(())
    }

    /// Replace all URL slots. Slot count must stay within 1 and 5.
    pub fn set_urls(&mut self, urls: Vec<String>) -> Result<(), TravelSynthError> {
        self.ensure_idle()?;
        if urls.is_empty() || urls.len() > MAX_URL_SLOTS {
            return Err(TravelSynthError::validation(format!(
                "Provide between 1 and {MAX_URL_SLOTS} URL fields"
            )));
        }
        self.urls = urls;
        Ok(())
    }

    pub fn set_url(&mut self, index: usize, value: impl Into<String>) -> Result<(), TravelSynthError> {
        self.ensure_idle()?;
        let slot = self
            .urls
            .get_mut(index)
            .ok_or_else(|| TravelSynthError::validation(format!("No URL field at position {index}")))?;
        *slot = value.into();
        Ok(())
    }

    /// Append an empty slot. Returns false when all five slots are in use.
    pub fn add_url_slot(&mut self) -> Result<bool, TravelSynthError> {
        self.ensure_idle()?;
        if self.urls.len() >= MAX_URL_SLOTS {
            return Ok(false);
        }
        self.urls.push(String::new());
        Ok(true)
    }

    /// Remove a slot. The last remaining slot is kept.
    pub fn remove_url_slot(&mut self, index: usize) -> Result<bool, TravelSynthError> {
        self.ensure_idle()?;
        if self.urls.len() <= 1 || index >= self.urls.len() {
            return Ok(false);
        }
        self.urls.remove(index);
        Ok(true)
    }

    pub fn set_preferences(&mut self, preferences: TravelPreferences) -> Result<(), TravelSynthError> {
        self.ensure_idle()?;
        self.preferences = preferences;
        Ok(())
    }

    /// Start a request for the current inputs and return its id.
    ///
    /// Without a usable URL the error message is recorded and the status is
    /// left alone. On success the previous guide and error are cleared before
    /// the request goes out.
    pub fn submit(&mut self) -> Result<u64, TravelSynthError> {
        self.ensure_idle()?;
        if self.urls.iter().all(|url| url.trim().is_empty()) {
            self.error = Some(NO_URLS_MESSAGE.to_string());
            return Err(TravelSynthError::validation(NO_URLS_MESSAGE));
        }

        self.apply(SessionEvent::Submitted);
        self.error = None;
        self.result = None;
        self.request_id += 1;
        Ok(self.request_id)
    }

    /// Move from analyzing to synthesizing if `request_id` is still running.
    pub fn mark_synthesizing(&mut self, request_id: u64) {
        if request_id == self.request_id {
            self.apply(SessionEvent::SynthesisStarted);
        }
    }

    /// Record the outcome of request `request_id`.
    pub fn finish(&mut self, request_id: u64, outcome: &Result<TravelGuideResponse, TravelSynthError>) {
        if request_id != self.request_id {
            return;
        }
        match outcome {
            Ok(response) => {
                if self.apply(SessionEvent::Completed) {
                    self.result = Some(response.clone());
                }
            }
            Err(err) => {
                if self.apply(SessionEvent::Failed) {
                    self.error = Some(err.user_message());
                }
            }
        }
    }

    fn apply(&mut self, event: SessionEvent) -> bool {
        match next_status(self.status, event) {
            Some(status) => {
                self.status = status;
                true
            }
            None => false,
        }
    }

    /// Snapshot for display
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            status: self.status,
            is_loading: self.status.is_busy(),
            urls: self.urls.clone(),
            can_add_url: self.urls.len() < MAX_URL_SLOTS,
            can_remove_url: self.urls.len() > 1,
            preferences: self.preferences.clone(),
            error: self.error.clone(),
            guide: self.result.as_ref().map(GuideView::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub status: Status,
    pub is_loading: bool,
    pub urls: Vec<String>,
    pub can_add_url: bool,
    pub can_remove_url: bool,
    pub preferences: TravelPreferences,
    pub error: Option<String>,
    pub guide: Option<GuideView>,
}

/// Rendered guide with its citations
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideView {
    pub markdown_content: String,
    pub blocks: Vec<Block>,
    pub html: String,
    pub sources: Vec<GroundingSource>,
}

impl From<&TravelGuideResponse> for GuideView {
    fn from(response: &TravelGuideResponse) -> Self {
        let blocks = markdown::parse(&response.markdown_content);
        Self {
            html: markdown::to_html(&blocks),
            markdown_content: response.markdown_content.clone(),
            blocks,
            sources: response.sources.clone(),
        }
    }
}
