#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
};

use lambda_architect::{
    assistants::{
        messages::{CreateMessageRequest, Message},
        runs::{CreateRunRequest, Run, SubmitToolOutputsRequest},
        threads::Thread,
    },
    ApiResponseOrError, AssistantService, OpenAiError,
};
use serde_json::{json, Value};

pub const THREAD_ID: &str = "thread_abc123";
pub const RUN_ID: &str = "run_abc123";

/// Plays back a fixed sequence of runs and records what the client sent.
///
/// `create_run`, `retrieve_run` and `submit_tool_outputs` all take the next
/// entry from `script`.
#[derive(Default)]
pub struct ScriptedService {
    pub script: RefCell<VecDeque<ApiResponseOrError<Run>>>,
    pub replies: Vec<Message>,
    pub messages: RefCell<Vec<CreateMessageRequest>>,
    pub runs_created: RefCell<Vec<CreateRunRequest>>,
    pub submissions: RefCell<Vec<SubmitToolOutputsRequest>>,
    pub retrievals: Cell<usize>,
    pub list_limits: RefCell<Vec<u32>>,
}

impl ScriptedService {
    pub fn new(script: impl IntoIterator<Item = Run>) -> Self {
        Self {
            script: RefCell::new(script.into_iter().map(Ok).collect()),
            ..Default::default()
        }
    }

    pub fn with_replies(mut self, replies: Vec<Message>) -> Self {
        self.replies = replies;
        self
    }

    pub fn push_error(&self, message: &str) {
        self.script.borrow_mut().push_back(Err(OpenAiError::new(
            message.to_string(),
            "server_error".to_string(),
        )));
    }

    fn next(&self) -> ApiResponseOrError<Run> {
        self.script
            .borrow_mut()
            .pop_front()
            .expect("script ran out of runs")
    }
}

impl AssistantService for ScriptedService {
    fn create_thread(&self) -> ApiResponseOrError<Thread> {
        Ok(serde_json::from_value(json!({
            "id": THREAD_ID,
            "object": "thread",
            "created_at": 1699012949,
            "metadata": {}
        }))?)
    }

    fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> ApiResponseOrError<Message> {
        assert_eq!(thread_id, THREAD_ID);
        let message = message("user", json!([
            {"type": "text", "text": {"value": request.content, "annotations": []}}
        ]));
        self.messages.borrow_mut().push(request);
        Ok(message)
    }

    fn create_run(&self, thread_id: &str, request: CreateRunRequest) -> ApiResponseOrError<Run> {
        assert_eq!(thread_id, THREAD_ID);
        self.runs_created.borrow_mut().push(request);
        self.next()
    }

    fn retrieve_run(&self, thread_id: &str, run_id: &str) -> ApiResponseOrError<Run> {
        assert_eq!((thread_id, run_id), (THREAD_ID, RUN_ID));
        self.retrievals.set(self.retrievals.get() + 1);
        self.next()
    }

    fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        request: SubmitToolOutputsRequest,
    ) -> ApiResponseOrError<Run> {
        assert_eq!((thread_id, run_id), (THREAD_ID, RUN_ID));
        self.submissions.borrow_mut().push(request);
        self.next()
    }

    fn list_messages(&self, thread_id: &str, limit: u32) -> ApiResponseOrError<Vec<Message>> {
        assert_eq!(thread_id, THREAD_ID);
        self.list_limits.borrow_mut().push(limit);
        Ok(self.replies.iter().take(limit as usize).cloned().collect())
    }
}

pub fn run(status: &str) -> Run {
    run_value(status, Value::Null, Value::Null)
}

pub fn run_with_tool_calls(calls: &[(&str, &str, Value)]) -> Run {
    let tool_calls: Vec<Value> = calls
        .iter()
        .map(|(id, name, arguments)| {
            json!({
                "id": id,
                "type": "function",
                "function": {"name": name, "arguments": arguments.to_string()}
            })
        })
        .collect();

    run_value(
        "requires_action",
        json!({
            "type": "submit_tool_outputs",
            "submit_tool_outputs": {"tool_calls": tool_calls}
        }),
        Value::Null,
    )
}

pub fn failed_run(code: &str, message: &str) -> Run {
    run_value("failed", Value::Null, json!({"code": code, "message": message}))
}

fn run_value(status: &str, required_action: Value, last_error: Value) -> Run {
    serde_json::from_value(json!({
        "id": RUN_ID,
        "object": "thread.run",
        "created_at": 1699063290,
        "assistant_id": "asst_abc123",
        "thread_id": THREAD_ID,
        "status": status,
        "required_action": required_action,
        "last_error": last_error,
        "started_at": 1699063290,
        "expires_at": null,
        "cancelled_at": null,
        "failed_at": null,
        "completed_at": null,
        "model": "gpt-4o",
        "instructions": "You are a helpful software engineer.",
        "tools": [],
        "metadata": {},
        "usage": null
    }))
    .expect("run fixture should deserialize")
}

pub fn message(role: &str, content: Value) -> Message {
    serde_json::from_value(json!({
        "id": "msg_abc123",
        "object": "thread.message",
        "created_at": 1699017614,
        "thread_id": THREAD_ID,
        "status": "completed",
        "incomplete_details": null,
        "role": role,
        "content": content,
        "assistant_id": null,
        "run_id": null,
        "metadata": {}
    }))
    .expect("message fixture should deserialize")
}

pub fn assistant_reply(text: &str) -> Message {
    message(
        "assistant",
        json!([{"type": "text", "text": {"value": text, "annotations": []}}]),
    )
}
