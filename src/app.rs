//! Shared application state for the web server

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::composer::GuideComposer;
use crate::error::TravelSynthError;
use crate::models::{TravelGuideResponse, TravelPreferences};
use crate::session::{Session, SessionView};

#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<Session>>,
    composer: GuideComposer,
    synthesizing_delay: Duration,
}

impl AppState {
    pub fn new(composer: GuideComposer, synthesizing_delay: Duration) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            composer,
            synthesizing_delay,
        }
    }

    pub async fn view(&self) -> SessionView {
        self.session.lock().await.view()
    }

    pub async fn set_urls(&self, urls: Vec<String>) -> Result<SessionView, TravelSynthError> {
        let mut session = self.session.lock().await;
        session.set_urls(urls)?;
        Ok(session.view())
    }

    /// Run one guide request to completion.
    ///
    /// The session lock is released while the generation service works, so
    /// the page can keep polling the status. The request runs on its own task:
    /// dropping the returned future (a closed browser tab) does not abandon it,
    /// and the session still leaves the busy state when it finishes.
    pub async fn generate(
        &self,
        urls: Vec<String>,
        preferences: TravelPreferences,
    ) -> Result<SessionView, TravelSynthError> {
        let request_id = {
            let mut session = self.session.lock().await;
            session.set_urls(urls.clone())?;
            session.set_preferences(preferences.clone())?;
            session.submit()?
        };
        info!(request_id, "Guide request accepted");

        self.schedule_synthesizing_label(request_id);

        let state = self.clone();
        let task = tokio::spawn(async move {
            let outcome = state.composer.generate_guide(&urls, &preferences).await;
            state.finish(request_id, outcome).await
        });

        match task.await {
            Ok(result) => result,
            Err(join_err) => {
                error!(request_id, "Guide request task failed: {join_err}");
                self.finish(request_id, Err(TravelSynthError::generation()))
                    .await
            }
        }
    }

    async fn finish(
        &self,
        request_id: u64,
        outcome: Result<TravelGuideResponse, TravelSynthError>,
    ) -> Result<SessionView, TravelSynthError> {
        let mut session = self.session.lock().await;
        session.finish(request_id, &outcome);
        let view = session.view();
        outcome.map(|_| view)
    }

    fn schedule_synthesizing_label(&self, request_id: u64) {
        let session = Arc::clone(&self.session);
        let delay = self.synthesizing_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(request_id, "Switching status label to synthesizing");
            session.lock().await.mark_synthesizing(request_id);
        });
    }
}
