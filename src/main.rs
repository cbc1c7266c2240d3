use std::io::{stdin, stdout};

use anyhow::{Context, Result};
use dotenvy::dotenv;
use lambda_architect::{
    chat::ChatSession,
    config::Config,
    dispatch::Dispatcher,
    tools::ToolContext,
    Credentials, OpenAiClient,
};

fn main() -> Result<()> {
    // Make sure you have a file named `.env` with the `OPENAI_KEY` environment variable defined,
    // or export it before starting.
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let credentials = Credentials::from_env()?;
    let config = Config::from_env()?;
    let client = OpenAiClient::new(credentials).context("could not build the HTTP client")?;

    if config.sync_assistant_tools {
        let assistant = client.sync_function_tools(&config.assistant_id, Dispatcher::definitions())?;
        log::info!(
            "Synced {} tool(s) to assistant {}",
            assistant.tools.len(),
            assistant.id
        );
    } else {
        match client.get_assistant(&config.assistant_id) {
            Ok(assistant) => {
                let missing: Vec<&str> = Dispatcher::names()
                    .filter(|name| {
                        !assistant
                            .tools
                            .iter()
                            .any(|tool| tool.function_name() == Some(*name))
                    })
                    .collect();
                if !missing.is_empty() {
                    log::warn!(
                        "Assistant {} does not declare these tools: {}",
                        assistant.id,
                        missing.join(", ")
                    );
                }
            }
            Err(e) => log::warn!("Could not look up assistant {}: {e}", config.assistant_id),
        }
    }

    let dispatcher = Dispatcher::new(ToolContext::from(&config));
    let session = ChatSession::start(&client, &dispatcher, &config)?;

    session.run(stdin().lock(), stdout())
}
