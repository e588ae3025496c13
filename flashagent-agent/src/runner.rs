//! The seam between this workspace and the external browser-agent backend.

use async_trait::async_trait;
use flashagent_browser::BrowserSession;
use flashagent_common::Result;
use serde::{Deserialize, Serialize};

use crate::trace::ExecutionTrace;

/// One browsing task submitted for execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Natural-language description of what to do in the browser.
    pub task: String,
    /// Planning-model identifier, e.g. `gpt-4.1-mini`.
    pub model: String,
    pub api_key: String,
    /// Optional OpenAI-compatible gateway endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Groups related runs on the backend side.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// The run operation supplied by the agent backend.
///
/// Everything hard — action planning, DOM interaction, page lifecycle —
/// happens behind this trait. A run either yields a complete
/// [`ExecutionTrace`] or fails with an arbitrary fault; callers must treat
/// both as terminal and never retry through this interface.
#[async_trait]
pub trait BrowserAgent: Send + Sync {
    async fn run(
        &self,
        request: &TaskRequest,
        session: &BrowserSession,
        max_steps: u32,
    ) -> Result<ExecutionTrace>;
}
