//! The remote operations the chat loop and run poller need.
//!
//! [`OpenAiClient`] is the real implementation; tests drive the poller and
//! chat loop with scripted implementations instead.

use crate::{
    assistants::{
        messages::{CreateMessageRequest, Message},
        runs::{CreateRunRequest, Run, SubmitToolOutputsRequest},
        threads::{CreateThreadRequest, Thread},
    },
    ApiResponseOrError, OpenAiClient,
};

pub trait AssistantService {
    fn create_thread(&self) -> ApiResponseOrError<Thread>;

    fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> ApiResponseOrError<Message>;

    fn create_run(&self, thread_id: &str, request: CreateRunRequest) -> ApiResponseOrError<Run>;

    fn retrieve_run(&self, thread_id: &str, run_id: &str) -> ApiResponseOrError<Run>;

    fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        request: SubmitToolOutputsRequest,
    ) -> ApiResponseOrError<Run>;

    /// The newest `limit` messages, newest first.
    fn list_messages(&self, thread_id: &str, limit: u32) -> ApiResponseOrError<Vec<Message>>;
}

impl AssistantService for OpenAiClient {
    fn create_thread(&self) -> ApiResponseOrError<Thread> {
        OpenAiClient::create_thread(self, CreateThreadRequest::default())
    }

    fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> ApiResponseOrError<Message> {
        OpenAiClient::create_message(self, thread_id, request)
    }

    fn create_run(&self, thread_id: &str, request: CreateRunRequest) -> ApiResponseOrError<Run> {
        OpenAiClient::create_run(self, thread_id, request)
    }

    fn retrieve_run(&self, thread_id: &str, run_id: &str) -> ApiResponseOrError<Run> {
        self.get_run(thread_id, run_id)
    }

    fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        request: SubmitToolOutputsRequest,
    ) -> ApiResponseOrError<Run> {
        OpenAiClient::submit_tool_outputs(self, thread_id, run_id, request)
    }

    fn list_messages(&self, thread_id: &str, limit: u32) -> ApiResponseOrError<Vec<Message>> {
        OpenAiClient::list_messages(self, thread_id, limit)
    }
}

impl<S: AssistantService + ?Sized> AssistantService for &S {
    fn create_thread(&self) -> ApiResponseOrError<Thread> {
        (**self).create_thread()
    }

    fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> ApiResponseOrError<Message> {
        (**self).create_message(thread_id, request)
    }

    fn create_run(&self, thread_id: &str, request: CreateRunRequest) -> ApiResponseOrError<Run> {
        (**self).create_run(thread_id, request)
    }

    fn retrieve_run(&self, thread_id: &str, run_id: &str) -> ApiResponseOrError<Run> {
        (**self).retrieve_run(thread_id, run_id)
    }

    fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        request: SubmitToolOutputsRequest,
    ) -> ApiResponseOrError<Run> {
        (**self).submit_tool_outputs(thread_id, run_id, request)
    }

    fn list_messages(&self, thread_id: &str, limit: u32) -> ApiResponseOrError<Vec<Message>> {
        (**self).list_messages(thread_id, limit)
    }
}
