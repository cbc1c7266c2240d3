use std::collections::HashMap;

use schemars::schema::RootSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{client::OpenAiClient, ApiResponseOrError};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Assistant {
    pub id: String,
    pub object: String,
    pub created_at: u32,
    /// The name of the assistant. The maximum length is 256 characters.
    pub name: Option<String>,
    /// ID of the model the assistant runs on.
    pub model: String,
    /// The system instructions that the assistant uses.
    pub instructions: Option<String>,
    #[serde(default)]
    pub tools: Vec<Tool>,
    pub metadata: Option<HashMap<String, String>>,
}

/// A tool enabled on an assistant.
///
/// On the wire the variant name doubles as the key holding its settings, e.g.
/// `{"type": "function", "function": {...}}`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    CodeInterpreter,
    Function {
        function: Function,
    },
    FileSearch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_search: Option<Value>,
    },
}

impl Tool {
    pub fn function_name(&self) -> Option<&str> {
        match self {
            Tool::Function { function } => Some(function.name.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON Schema of the argument object.
    pub parameters: RootSchema,
}

/// Replaces the tool set of an existing assistant; every other field is left
/// as it is on the server.
#[derive(Serialize, Debug, Clone)]
pub struct UpdateAssistantToolsRequest {
    pub tools: Vec<Tool>,
}

impl OpenAiClient {
    pub fn get_assistant(&self, assistant_id: &str) -> ApiResponseOrError<Assistant> {
        self.get(format!("assistants/{assistant_id}"))
    }

    pub fn update_assistant_tools(
        &self,
        assistant_id: &str,
        tools: Vec<Tool>,
    ) -> ApiResponseOrError<Assistant> {
        self.post(
            format!("assistants/{assistant_id}"),
            UpdateAssistantToolsRequest { tools },
        )
    }

    /// Adds `functions` to the assistant's tools, replacing functions of the
    /// same name and keeping everything else it already has.
    pub fn sync_function_tools(
        &self,
        assistant_id: &str,
        functions: Vec<Tool>,
    ) -> ApiResponseOrError<Assistant> {
        let assistant = self.get_assistant(assistant_id)?;
        self.update_assistant_tools(assistant_id, merge_tools(assistant.tools, functions))
    }
}

/// Existing tools first, minus functions that `functions` redefines, then
/// `functions` in order.
pub fn merge_tools(existing: Vec<Tool>, functions: Vec<Tool>) -> Vec<Tool> {
    let mut tools: Vec<Tool> = existing
        .into_iter()
        .filter(|tool| match tool.function_name() {
            Some(name) => !functions.iter().any(|f| f.function_name() == Some(name)),
            None => true,
        })
        .collect();
    tools.extend(functions);
    tools
}
