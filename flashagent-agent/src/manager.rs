//! Task orchestration over the agent backend.

use std::sync::Arc;

use flashagent_browser::{BrowserSession, SessionFactory};
use flashagent_config::AgentSettings;

use crate::normalize::{ResponseRecord, ResultNormalizer};
use crate::runner::{BrowserAgent, TaskRequest};

/// Owns one shared headless session and drives single-task runs against the
/// configured backend.
///
/// The manager is cheap to share (`Arc` it) and holds no mutable state; the
/// backend is responsible for whatever coordination the shared session
/// needs when tasks are issued concurrently.
pub struct AgentManager {
    runner: Arc<dyn BrowserAgent>,
    session: BrowserSession,
    normalizer: ResultNormalizer,
    max_steps: u32,
}

impl AgentManager {
    pub fn new(
        runner: Arc<dyn BrowserAgent>,
        sessions: &SessionFactory,
        settings: &AgentSettings,
    ) -> Self {
        Self {
            runner,
            session: sessions.shared_session(true),
            normalizer: ResultNormalizer::new(settings),
            max_steps: settings.max_steps,
        }
    }

    /// Run one browsing task to a terminal record.
    ///
    /// This is the pipeline's outer guarantee: whatever the backend does —
    /// return a trace, return a partial trace, or fail outright — the caller
    /// gets back a well-formed [`ResponseRecord`], never an error. A run
    /// fault degrades the whole task to the failure-path record; there is no
    /// retry and no partial-result recovery.
    pub async fn run_task(&self, request: TaskRequest) -> ResponseRecord {
        tracing::info!(
            task = %request.task,
            model = %request.model,
            session_id = %self.session.id,
            "starting browser task"
        );

        match self
            .runner
            .run(&request, &self.session, self.max_steps)
            .await
        {
            Ok(trace) => {
                tracing::info!(
                    steps = trace.number_of_steps(),
                    is_done = trace.is_done(),
                    "browser task completed"
                );
                self.normalizer
                    .finished(&request.task, &request.model, &trace)
            }
            Err(fault) => {
                tracing::warn!(error = %fault, "browser task failed");
                self.normalizer.failed(&request.task, &request.model, &fault)
            }
        }
    }
}
