//! Execution traces produced by the external agent backend.
//!
//! A trace is the full step-by-step record of one browsing run. The backend
//! owns its construction; everything in this workspace only reads it through
//! the accessor surface below. Note that the derived sequences are NOT all
//! indexed alike: [`ExecutionTrace::urls`] is per step, while
//! [`ExecutionTrace::errors`] and [`ExecutionTrace::extracted_content`] are
//! flattened per action result (and the latter skips empty entries), so
//! consumers aligning them must treat an index past a sequence's end as
//! absent rather than assume equal lengths.

use serde::{Deserialize, Serialize};

/// One browser-facing action decided by the planning model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentAction {
    /// Navigate the page to a URL.
    Navigate { url: String },
    /// Click the interactive element with the given index.
    Click { index: u32 },
    /// Type text into the element with the given index.
    Type { index: u32, text: String },
    /// Scroll the page.
    Scroll { down: bool, amount: Option<u32> },
    /// Extract content from the page toward a goal.
    Extract { goal: String },
    /// Capture a screenshot of the current page.
    Screenshot,
    /// Wait before the next action.
    Wait { seconds: u64 },
    /// Terminal marker: the task is over, with a free-text outcome.
    Done { text: String, success: bool },
}

impl AgentAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Navigate { .. } => "navigate",
            Self::Click { .. } => "click",
            Self::Type { .. } => "type",
            Self::Scroll { .. } => "scroll",
            Self::Extract { .. } => "extract",
            Self::Screenshot => "screenshot",
            Self::Wait { .. } => "wait",
            Self::Done { .. } => "done",
        }
    }

    /// Free-text outcome when this is the terminal `done` marker.
    pub fn done_text(&self) -> Option<&str> {
        match self {
            Self::Done { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Model state snapshot emitted alongside each action batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentBrain {
    pub evaluation_previous_goal: String,
    pub memory: String,
    pub next_goal: String,
}

/// One planning-model turn: state assessment plus the actions it chose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub current_state: AgentBrain,
    pub action: Vec<AgentAction>,
}

/// Outcome of executing one action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(default)]
    pub is_done: bool,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub extracted_content: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Timing and cost accounting for one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepMetadata {
    pub step_number: usize,
    pub duration_seconds: f64,
    pub input_tokens: u64,
}

/// One step of the run. Any of the optional parts may be missing when the
/// backend aborted the step early.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub model_output: Option<ModelOutput>,
    pub results: Vec<ActionResult>,
    pub url: Option<String>,
    /// Base64-encoded page screenshot, when captured.
    pub screenshot: Option<String>,
    pub metadata: Option<StepMetadata>,
}

/// The full record of one automated browsing run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    pub steps: Vec<TraceStep>,
}

impl ExecutionTrace {
    pub fn number_of_steps(&self) -> usize {
        self.steps.len()
    }

    /// Total wall-clock duration across steps, in seconds.
    pub fn total_duration_seconds(&self) -> f64 {
        self.steps
            .iter()
            .filter_map(|s| s.metadata.as_ref())
            .map(|m| m.duration_seconds)
            .sum()
    }

    /// Total prompt tokens consumed across steps.
    pub fn total_input_tokens(&self) -> u64 {
        self.steps
            .iter()
            .filter_map(|s| s.metadata.as_ref())
            .map(|m| m.input_tokens)
            .sum()
    }

    fn last_result(&self) -> Option<&ActionResult> {
        self.steps.last().and_then(|s| s.results.last())
    }

    /// Whether the run reached its terminal action.
    pub fn is_done(&self) -> bool {
        self.last_result().is_some_and(|r| r.is_done)
    }

    /// Whether the run finished AND the terminal result reported success.
    pub fn is_successful(&self) -> bool {
        match self.last_result() {
            Some(r) if r.is_done => r.success.unwrap_or(false),
            _ => false,
        }
    }

    /// Model turns, skipping steps the backend aborted before planning.
    /// May therefore be shorter than [`Self::number_of_steps`].
    pub fn model_outputs(&self) -> Vec<&ModelOutput> {
        self.steps
            .iter()
            .filter_map(|s| s.model_output.as_ref())
            .collect()
    }

    /// Visited URL per step.
    pub fn urls(&self) -> Vec<Option<&str>> {
        self.steps.iter().map(|s| s.url.as_deref()).collect()
    }

    /// Error text per action result, flattened across steps.
    pub fn errors(&self) -> Vec<Option<&str>> {
        self.steps
            .iter()
            .flat_map(|s| s.results.iter().map(|r| r.error.as_deref()))
            .collect()
    }

    /// Non-empty extracted content per action result, flattened across
    /// steps. Indices here do not line up with [`Self::model_outputs`].
    pub fn extracted_content(&self) -> Vec<&str> {
        self.steps
            .iter()
            .flat_map(|s| s.results.iter())
            .filter_map(|r| r.extracted_content.as_deref())
            .filter(|c| !c.is_empty())
            .collect()
    }

    pub fn action_names(&self) -> Vec<String> {
        self.model_outputs()
            .iter()
            .flat_map(|o| o.action.iter().map(|a| a.name().to_string()))
            .collect()
    }

    pub fn model_thoughts(&self) -> Vec<&AgentBrain> {
        self.model_outputs()
            .into_iter()
            .map(|o| &o.current_state)
            .collect()
    }

    /// Every action taken, as tagged JSON values.
    pub fn model_actions(&self) -> Vec<serde_json::Value> {
        self.model_outputs()
            .iter()
            .flat_map(|o| o.action.iter())
            .filter_map(|a| serde_json::to_value(a).ok())
            .collect()
    }

    /// Actions whose name appears in `include`. An empty `include` list
    /// matches nothing.
    pub fn model_actions_filtered(&self, include: &[&str]) -> Vec<serde_json::Value> {
        self.model_outputs()
            .iter()
            .flat_map(|o| o.action.iter())
            .filter(|a| include.contains(&a.name()))
            .filter_map(|a| serde_json::to_value(a).ok())
            .collect()
    }

    pub fn action_results(&self) -> Vec<&ActionResult> {
        self.steps.iter().flat_map(|s| s.results.iter()).collect()
    }

    /// Base64 screenshots, in step order, skipping steps without one.
    pub fn screenshots(&self) -> Vec<String> {
        self.steps
            .iter()
            .filter_map(|s| s.screenshot.clone())
            .collect()
    }

    /// The last action of the last planned step, when the backend recorded
    /// one. Independent of the done flag carried by the action results, so
    /// a trace may report itself done while this lookup comes up empty.
    pub fn last_action(&self) -> Option<&AgentAction> {
        self.steps
            .last()
            .and_then(|s| s.model_output.as_ref())
            .and_then(|o| o.action.last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brain(eval: &str) -> AgentBrain {
        AgentBrain {
            evaluation_previous_goal: eval.to_string(),
            memory: String::new(),
            next_goal: String::new(),
        }
    }

    #[test]
    fn derived_sequences_may_disagree_on_length() {
        let trace = ExecutionTrace {
            steps: vec![
                TraceStep {
                    model_output: Some(ModelOutput {
                        current_state: brain("ok"),
                        action: vec![AgentAction::Navigate {
                            url: "https://example.com".into(),
                        }],
                    }),
                    results: vec![
                        ActionResult::default(),
                        ActionResult {
                            error: Some("boom".into()),
                            ..Default::default()
                        },
                    ],
                    url: Some("https://example.com".into()),
                    ..Default::default()
                },
                TraceStep {
                    model_output: None,
                    results: vec![],
                    url: None,
                    ..Default::default()
                },
            ],
        };

        assert_eq!(trace.number_of_steps(), 2);
        assert_eq!(trace.model_outputs().len(), 1);
        assert_eq!(trace.urls().len(), 2);
        assert_eq!(trace.errors().len(), 2);
        assert_eq!(trace.extracted_content().len(), 0);
    }

    #[test]
    fn done_flag_and_last_action_are_independent() {
        // The results claim the run finished, but no model output survived,
        // so the structured terminal lookup finds nothing.
        let trace = ExecutionTrace {
            steps: vec![TraceStep {
                model_output: None,
                results: vec![ActionResult {
                    is_done: true,
                    success: Some(true),
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };

        assert!(trace.is_done());
        assert!(trace.is_successful());
        assert!(trace.last_action().is_none());
    }

    #[test]
    fn success_requires_the_done_marker() {
        let trace = ExecutionTrace {
            steps: vec![TraceStep {
                results: vec![ActionResult {
                    is_done: false,
                    success: Some(true),
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };

        assert!(!trace.is_done());
        assert!(!trace.is_successful());
    }

    #[test]
    fn filtered_actions_need_an_explicit_include_list() {
        let trace = ExecutionTrace {
            steps: vec![TraceStep {
                model_output: Some(ModelOutput {
                    current_state: brain("ok"),
                    action: vec![
                        AgentAction::Click { index: 3 },
                        AgentAction::Done {
                            text: "all set".into(),
                            success: true,
                        },
                    ],
                }),
                ..Default::default()
            }],
        };

        assert!(trace.model_actions_filtered(&[]).is_empty());
        let clicks = trace.model_actions_filtered(&["click"]);
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0]["type"], "click");
        assert_eq!(trace.model_actions().len(), 2);
    }
}
