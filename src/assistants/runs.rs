use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{client::OpenAiClient, ApiResponseOrError};

use super::messages::IncompleteDetails;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Run {
    pub id: String,
    pub object: String,
    pub created_at: u32,
    /// The ID of the assistant used for this run.
    pub assistant_id: String,
    /// The ID of the thread associated with this run.
    pub thread_id: String,
    /// The status of the run.
    pub status: Status,
    /// Details on the action required to continue the run. Will be null if no action is required.
    pub required_action: Option<RequiredAction>,

    /// The last error that occurred during this run.
    pub last_error: Option<LastError>,

    /// The time at which the run will expire.
    pub expires_at: Option<u32>,
    /// The time at which the run was started.
    pub started_at: Option<u32>,
    /// The time at which the run was completed.
    pub completed_at: Option<u32>,
    /// The time at which the run was cancelled.
    pub cancelled_at: Option<u32>,
    /// The time at which the run was failed.
    pub failed_at: Option<u32>,
    /// Why the run ended up incomplete.
    pub incomplete_details: Option<IncompleteDetails>,

    /// The model used for this run.
    #[serde(default)]
    pub model: String,

    /// The instructions given to the assistant.
    #[serde(default)]
    pub instructions: String,

    /// The usage of the run.
    pub usage: Option<Usage>,

    pub metadata: Option<HashMap<String, String>>,
}

impl Run {
    /// The tool calls the run is waiting on, or an empty slice.
    pub fn pending_tool_calls(&self) -> &[ToolCall] {
        match &self.required_action {
            Some(RequiredAction::SubmitToolOutputs { submit_tool_outputs }) => {
                &submit_tool_outputs.tool_calls
            }
            None => &[],
        }
    }
}

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, strum_macros::Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    /// Any status this client does not know about yet. Treated as terminal.
    #[serde(other)]
    Unknown,
}

impl Status {
    /// Whether the server is still working on the run without input from us.
    pub fn is_pending(&self) -> bool {
        matches!(self, Status::Queued | Status::InProgress | Status::Cancelling)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending() && *self != Status::RequiresAction
    }
}

/// `{"type": "submit_tool_outputs", "submit_tool_outputs": {"tool_calls": [...]}}`
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type")]
pub enum RequiredAction {
    SubmitToolOutputs {
        submit_tool_outputs: SubmitToolOutputs,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubmitToolOutputs {
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ToolCall {
    /// The ID to reference when submitting this call's output.
    pub id: String,
    /// The type of the tool. Currently, only `function` is supported.
    #[serde(rename = "type")]
    pub kind: String,
    pub function: ToolCallFunction,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ToolCallFunction {
    /// The name of the function to call.
    pub name: String,
    /// The arguments to call the function with, JSON encoded.
    /// The model does not always generate valid JSON.
    pub arguments: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LastError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SubmitToolOutputsRequest {
    pub tool_outputs: Vec<ToolOutput>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

#[derive(Serialize, Builder, Debug, Clone, Default)]
#[builder(pattern = "owned")]
#[builder(name = "CreateRunBuilder")]
#[builder(setter(strip_option, into))]
pub struct CreateRunRequest {
    pub assistant_id: String,
}

impl CreateRunRequest {
    pub fn builder() -> CreateRunBuilder {
        CreateRunBuilder::create_empty()
    }
}

impl OpenAiClient {
    pub fn create_run(&self, thread_id: &str, request: CreateRunRequest) -> ApiResponseOrError<Run> {
        self.post(format!("threads/{thread_id}/runs"), request)
    }

    pub fn get_run(&self, thread_id: &str, run_id: &str) -> ApiResponseOrError<Run> {
        self.get(format!("threads/{thread_id}/runs/{run_id}"))
    }

    pub fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        request: SubmitToolOutputsRequest,
    ) -> ApiResponseOrError<Run> {
        self.post(
            format!("threads/{thread_id}/runs/{run_id}/submit_tool_outputs"),
            request,
        )
    }
}
