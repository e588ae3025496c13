//! Reshapes heterogeneous run traces into one stable response record.
//!
//! Every task execution converges here: a completed [`ExecutionTrace`] goes
//! through [`ResultNormalizer::finished`], a raised fault through
//! [`ResultNormalizer::failed`]. Both return a fully populated
//! [`ResponseRecord`] — callers never see an error cross this boundary, and
//! `browser_history` is never empty.

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use flashagent_config::AgentSettings;

use crate::trace::{ActionResult, AgentBrain, ExecutionTrace, ModelOutput};

/// Substituted when a finished run's terminal result cannot be read, and
/// embedded in every synthetic fallback step.
pub const TOOL_FAILURE_NOTE: &str = "The task failed ❌, browser tool encountered an issue.";

/// Terminal state of one task execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Finished,
    Error,
}

/// Normalized, redacted view of a single trace step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSummary {
    pub browser_status: String,
    pub extracted_content: Option<String>,
    pub url: Option<String>,
    pub error: Option<String>,
}

/// Raw per-action aggregates, kept for diagnostics and replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryInfo {
    pub action_names: Vec<String>,
    pub model_thoughts: Vec<AgentBrain>,
    pub model_outputs: Vec<ModelOutput>,
    pub model_actions: Vec<serde_json::Value>,
    pub action_results: Vec<ActionResult>,
    pub model_actions_filtered: Vec<serde_json::Value>,
}

/// The response shape guaranteed for every invocation, success or failure.
///
/// Field names are part of the wire contract; the whole record serializes
/// with every key present (failure is signalled through `status` and the
/// `-1`/empty sentinels, never through a missing field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub uid: Uuid,
    pub task: String,
    pub status: TaskStatus,
    pub time: String,
    pub total_duration_seconds: f64,
    pub total_tokens: i64,
    pub is_successful: bool,
    pub is_done: bool,
    pub final_browser_result: Option<String>,
    pub number_of_steps: i64,
    pub history_all_info: Option<HistoryInfo>,
    pub browser_history: Vec<StepSummary>,
    pub browser_history_screenshot: Vec<String>,
}

/// Pure transform from a completed run (or its fault) to a [`ResponseRecord`].
#[derive(Debug, Clone)]
pub struct ResultNormalizer {
    max_extracted_content_length: usize,
}

impl ResultNormalizer {
    pub fn new(settings: &AgentSettings) -> Self {
        Self {
            max_extracted_content_length: settings.max_extracted_content_length,
        }
    }

    /// Shape a completed trace into a `finished` record.
    pub fn finished(&self, task: &str, model: &str, trace: &ExecutionTrace) -> ResponseRecord {
        let mut history = self.step_summaries(trace);
        if history.is_empty() {
            history.push(null_response_step(model, None));
        }

        ResponseRecord {
            uid: Uuid::new_v4(),
            task: task.to_string(),
            status: TaskStatus::Finished,
            time: timestamp(),
            total_duration_seconds: trace.total_duration_seconds(),
            total_tokens: trace.total_input_tokens() as i64,
            is_successful: trace.is_successful(),
            is_done: trace.is_done(),
            final_browser_result: final_result(trace),
            number_of_steps: trace.number_of_steps() as i64,
            history_all_info: Some(all_info(trace)),
            browser_history: history,
            browser_history_screenshot: trace.screenshots(),
        }
    }

    /// Degrade a raised fault into an `error` record. Numeric aggregates
    /// carry the `-1` sentinel, the single history entry carries the fault
    /// text. This path never itself fails.
    pub fn failed(
        &self,
        task: &str,
        model: &str,
        fault: impl std::fmt::Display,
    ) -> ResponseRecord {
        ResponseRecord {
            uid: Uuid::new_v4(),
            task: task.to_string(),
            status: TaskStatus::Error,
            time: timestamp(),
            total_duration_seconds: -1.0,
            total_tokens: -1,
            is_successful: false,
            is_done: false,
            final_browser_result: None,
            number_of_steps: -1,
            history_all_info: None,
            browser_history: vec![null_response_step(model, Some(fault.to_string()))],
            browser_history_screenshot: Vec::new(),
        }
    }

    /// One summary per model turn. The url/error/content sequences are
    /// aligned by index; an index past a sequence's end reads as absent
    /// (the sequences are not guaranteed equal length, see the trace docs).
    fn step_summaries(&self, trace: &ExecutionTrace) -> Vec<StepSummary> {
        let urls = trace.urls();
        let errors = trace.errors();
        let contents = trace.extracted_content();

        trace
            .model_outputs()
            .iter()
            .enumerate()
            .map(|(idx, output)| {
                let browser_status = match output.action.last().and_then(|a| a.done_text()) {
                    Some(done_text) => format!("task finished: {done_text}"),
                    None => output.current_state.evaluation_previous_goal.clone(),
                };

                let extracted_content = contents
                    .get(idx)
                    .copied()
                    .filter(|c| c.chars().count() < self.max_extracted_content_length)
                    .map(str::to_string);

                StepSummary {
                    browser_status,
                    extracted_content,
                    url: urls.get(idx).copied().flatten().map(str::to_string),
                    error: errors.get(idx).copied().flatten().map(str::to_string),
                }
            })
            .collect()
    }
}

/// Terminal outcome text for a finished run. A trace that reports itself
/// done without a readable terminal action degrades to the fixed note
/// instead of propagating the lookup failure.
fn final_result(trace: &ExecutionTrace) -> Option<String> {
    if !trace.is_done() {
        return None;
    }
    Some(
        trace
            .last_action()
            .and_then(|a| a.done_text())
            .map(str::to_string)
            .unwrap_or_else(|| TOOL_FAILURE_NOTE.to_string()),
    )
}

fn all_info(trace: &ExecutionTrace) -> HistoryInfo {
    HistoryInfo {
        action_names: trace.action_names(),
        model_thoughts: trace.model_thoughts().into_iter().cloned().collect(),
        model_outputs: trace.model_outputs().into_iter().cloned().collect(),
        model_actions: trace.model_actions(),
        action_results: trace.action_results().into_iter().cloned().collect(),
        model_actions_filtered: trace.model_actions_filtered(&[]),
    }
}

/// Synthetic single-step fallback used whenever no real steps are available
/// to summarize. Embeds the model identifier for diagnostics.
fn null_response_step(model: &str, error: Option<String>) -> StepSummary {
    StepSummary {
        browser_status: "Error".to_string(),
        extracted_content: Some(format!("{TOOL_FAILURE_NOTE} Current agent LLM: {model}")),
        url: None,
        error,
    }
}

fn timestamp() -> String {
    Local::now().format("%Y%m%d%H%M%S").to_string()
}
