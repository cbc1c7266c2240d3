//! Talks to the real API. Skipped when no key is configured.

use dotenvy::dotenv;
use lambda_architect::{
    assistants::messages::CreateMessageRequest, AssistantService, Credentials, OpenAiClient,
};

#[test]
#[cfg_attr(no_key, ignore)]
fn thread_round_trip() {
    dotenv().ok();
    let client = OpenAiClient::new(Credentials::from_env().unwrap()).unwrap();

    let thread = AssistantService::create_thread(&client).unwrap();
    AssistantService::create_message(
        &client,
        &thread.id,
        CreateMessageRequest::user("Hello from the integration tests"),
    )
    .unwrap();
    let messages = AssistantService::list_messages(&client, &thread.id, 5).unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].first_text(), Some("Hello from the integration tests"));
}
