use std::{thread, time::Duration};

use crate::{
    assistants::runs::{Run, Status, SubmitToolOutputsRequest},
    dispatch::Dispatcher,
    service::AssistantService,
    ApiResponseOrError,
};

/// Drives a run until it reaches a terminal status, answering tool calls on
/// the way.
pub struct RunPoller<'a, S> {
    service: S,
    dispatcher: &'a Dispatcher,
    interval: Duration,
}

impl<'a, S: AssistantService> RunPoller<'a, S> {
    pub fn new(service: S, dispatcher: &'a Dispatcher, interval: Duration) -> Self {
        Self {
            service,
            dispatcher,
            interval,
        }
    }

    /// Polls with a fixed delay while the run is queued or in progress and
    /// submits one batch of tool outputs for each `requires_action`. Returns
    /// the run in whatever terminal status it ends up in.
    ///
    /// There is no timeout; API errors are returned as is.
    pub fn poll(&self, mut run: Run) -> ApiResponseOrError<Run> {
        loop {
            match run.status {
                status if status.is_pending() => {
                    log::info!("Run Status: {status}");
                    thread::sleep(self.interval);
                    run = self.service.retrieve_run(&run.thread_id, &run.id)?;
                }
                Status::RequiresAction => {
                    run = self.submit_tool_outputs(run)?;
                }
                _ => return Ok(run),
            }
        }
    }

    fn submit_tool_outputs(&self, run: Run) -> ApiResponseOrError<Run> {
        let tool_outputs = self.dispatcher.dispatch_all(run.pending_tool_calls());

        log::info!("Returning {} tool output(s) to OpenAI...", tool_outputs.len());
        self.service.submit_tool_outputs(
            &run.thread_id,
            &run.id,
            SubmitToolOutputsRequest { tool_outputs },
        )
    }
}
