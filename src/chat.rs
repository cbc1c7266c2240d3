//! The interactive loop: one operator line in, one assistant reply out.

use std::{
    io::{BufRead, Write},
    path::Path,
};

use anyhow::Result;

use crate::{
    assistants::{
        messages::CreateMessageRequest,
        runs::{CreateRunRequest, Run, Status},
    },
    config::Config,
    dispatch::Dispatcher,
    poller::RunPoller,
    service::AssistantService,
    ApiResponseOrError,
};

const EXIT_COMMANDS: &[&str] = &["exit", "quit"];

/// Tells the assistant where it is working.
pub fn context_message(working_dir: &Path) -> String {
    let cwd = working_dir.display();
    format!(
        "The root path of the SAM application can be found at '{cwd}'. \
         The current working directory is '{cwd}'."
    )
}

/// A conversation on one remote thread, alive for the whole process.
pub struct ChatSession<'a, S> {
    service: S,
    dispatcher: &'a Dispatcher,
    config: &'a Config,
    thread_id: String,
}

impl<'a, S: AssistantService> ChatSession<'a, S> {
    /// Creates the thread and posts the working directory context to it.
    pub fn start(service: S, dispatcher: &'a Dispatcher, config: &'a Config) -> ApiResponseOrError<Self> {
        let thread = service.create_thread()?;
        log::info!("Created thread {}", thread.id);

        service.create_message(
            &thread.id,
            CreateMessageRequest::user(context_message(&config.working_dir)),
        )?;

        Ok(Self {
            service,
            dispatcher,
            config,
            thread_id: thread.id,
        })
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// Reads lines from `input` until EOF or an exit command, answering each
    /// one on `output`.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<()> {
        loop {
            write!(output, "You: ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                log::info!("Input closed, ending chat");
                return Ok(());
            }

            let message = line.trim();
            if message.is_empty() {
                continue;
            }
            if EXIT_COMMANDS
                .iter()
                .any(|command| message.eq_ignore_ascii_case(command))
            {
                log::info!("Ending chat");
                return Ok(());
            }

            self.turn(message, &mut output)?;
        }
    }

    /// Sends one message, waits for the run to finish and prints the reply
    /// if it completed. Returns the final run status.
    pub fn turn<W: Write>(&self, message: &str, mut output: W) -> Result<Status> {
        self.service
            .create_message(&self.thread_id, CreateMessageRequest::user(message))?;

        let request = CreateRunRequest::builder()
            .assistant_id(self.config.assistant_id.as_str())
            .build()?;
        let run = self.service.create_run(&self.thread_id, request)?;

        writeln!(output, "Waiting for response...")?;
        let poller = RunPoller::new(&self.service, self.dispatcher, self.config.poll_interval);
        let run = poller.poll(run)?;

        log::info!("Exited Run Loop with Status: {}", run.status);
        if run.status == Status::Completed {
            self.print_reply(&mut output)?;
        } else {
            log_unfinished(&run);
        }

        Ok(run.status)
    }

    fn print_reply<W: Write>(&self, mut output: W) -> Result<()> {
        let messages = self
            .service
            .list_messages(&self.thread_id, self.config.message_lookback)?;

        let Some(newest) = messages.first() else {
            log::warn!("Run completed but the thread has no messages");
            return Ok(());
        };

        let name = &self.config.assistant_name;
        match (newest.first_text(), newest.content.first()) {
            (Some(text), _) => writeln!(output, "{name}: {text}")?,
            (None, Some(content)) => writeln!(output, "{name}: [{content}]")?,
            (None, None) => log::warn!("Newest message {} has no content", newest.id),
        }
        Ok(())
    }
}

fn log_unfinished(run: &Run) {
    match &run.last_error {
        Some(error) => log::warn!(
            "Run {} ended as {}: {} ({})",
            run.id,
            run.status,
            error.message,
            error.code
        ),
        None => log::warn!("Run {} ended as {}", run.id, run.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_message_names_working_dir() {
        let message = context_message(Path::new("/home/dev/project"));

        assert_eq!(
            message,
            "The root path of the SAM application can be found at '/home/dev/project'. \
             The current working directory is '/home/dev/project'."
        );
    }
}
