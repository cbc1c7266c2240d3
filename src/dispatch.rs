//! Routes tool calls from a run to the local [`tools`](crate::tools).

use std::{collections::HashMap, path::Path};

use schemars::{schema::RootSchema, schema_for, JsonSchema};
use serde::de::DeserializeOwned;

use crate::{
    assistants::{
        runs::{ToolCall, ToolOutput},
        Function, Tool,
    },
    tools::{
        self, CreateFileArgs, ListFilesArgs, ReadFileArgs, RunCommandArgs, RunTestsArgs,
        ToolContext, ToolError,
    },
};

type Handler = fn(&ToolContext, &str) -> Result<String, ToolError>;

struct ToolEntry {
    name: &'static str,
    description: &'static str,
    parameters: fn() -> RootSchema,
    handler: Handler,
}

const TOOLS: &[ToolEntry] = &[
    ToolEntry {
        name: "create_file",
        description: "Creates a file at a path, creating parent directories as needed and replacing any existing content.",
        parameters: schema::<CreateFileArgs>,
        handler: create_file,
    },
    ToolEntry {
        name: "read_file",
        description: "Reads a file at a given path and returns its content.",
        parameters: schema::<ReadFileArgs>,
        handler: read_file,
    },
    ToolEntry {
        name: "list_files",
        description: "Recursively lists files under a path, one full path per line.",
        parameters: schema::<ListFilesArgs>,
        handler: list_files,
    },
    ToolEntry {
        name: "run_tests",
        description: "Runs the project's test suite and returns its output.",
        parameters: schema::<RunTestsArgs>,
        handler: run_tests,
    },
    ToolEntry {
        name: "run_command",
        description: "Runs a shell command on the user's system and returns its output.",
        parameters: schema::<RunCommandArgs>,
        handler: run_command,
    },
];

fn schema<T: JsonSchema>() -> RootSchema {
    schema_for!(T)
}

fn arguments<T: DeserializeOwned>(function: &str, arguments: &str) -> Result<T, ToolError> {
    let arguments = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };

    serde_json::from_str(arguments).map_err(|e| ToolError::InvalidArguments {
        function: function.to_string(),
        reason: e.to_string(),
    })
}

fn create_file(_: &ToolContext, args: &str) -> Result<String, ToolError> {
    let args: CreateFileArgs = arguments("create_file", args)?;
    tools::create_file(Path::new(&args.filepath), &args.content)
}

fn read_file(_: &ToolContext, args: &str) -> Result<String, ToolError> {
    let args: ReadFileArgs = arguments("read_file", args)?;
    tools::read_file(Path::new(&args.filepath))
}

fn list_files(_: &ToolContext, args: &str) -> Result<String, ToolError> {
    let args: ListFilesArgs = arguments("list_files", args)?;
    tools::list_files(Path::new(&args.path))
}

fn run_tests(context: &ToolContext, args: &str) -> Result<String, ToolError> {
    let RunTestsArgs {} = arguments("run_tests", args)?;
    tools::run_tests(context)
}

fn run_command(context: &ToolContext, args: &str) -> Result<String, ToolError> {
    let args: RunCommandArgs = arguments("run_command", args)?;
    tools::run_command(&args.command, &context.working_dir)
}

pub struct Dispatcher {
    context: ToolContext,
    handlers: HashMap<&'static str, Handler>,
}

impl Dispatcher {
    pub fn new(context: ToolContext) -> Self {
        let handlers = TOOLS.iter().map(|tool| (tool.name, tool.handler)).collect();
        Self { context, handlers }
    }

    /// Names of every callable tool, in declaration order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        TOOLS.iter().map(|tool| tool.name)
    }

    /// Function tool definitions for the assistant, one per local tool.
    pub fn definitions() -> Vec<Tool> {
        TOOLS
            .iter()
            .map(|tool| Tool::Function {
                function: Function {
                    name: tool.name.to_string(),
                    description: tool.description.to_string(),
                    parameters: (tool.parameters)(),
                },
            })
            .collect()
    }

    /// Runs the named tool with JSON-encoded `arguments`.
    pub fn call(&self, name: &str, arguments: &str) -> Result<String, ToolError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| ToolError::FunctionNotFound(name.to_string()))?;
        handler(&self.context, arguments)
    }

    /// Answers one tool call. Failures become the output text so the run can
    /// carry on.
    pub fn dispatch(&self, tool_call: &ToolCall) -> ToolOutput {
        let name = tool_call.function.name.as_str();
        log::info!("Calling Function: {name}");

        let output = match self.call(name, &tool_call.function.arguments) {
            Ok(output) => output,
            Err(e) => {
                log::error!("Error Calling Function: {name}: {e}");
                e.to_string()
            }
        };

        ToolOutput {
            tool_call_id: tool_call.id.clone(),
            output,
        }
    }

    /// One output per call, in the same order.
    pub fn dispatch_all(&self, tool_calls: &[ToolCall]) -> Vec<ToolOutput> {
        tool_calls
            .iter()
            .map(|tool_call| self.dispatch(tool_call))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistants::runs::ToolCallFunction;
    use serde_json::json;
    use tempfile::tempdir;

    fn dispatcher(dir: &Path) -> Dispatcher {
        Dispatcher::new(ToolContext {
            working_dir: dir.to_path_buf(),
            test_command: "echo ran tests".to_string(),
        })
    }

    fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            kind: "function".to_string(),
            function: ToolCallFunction {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }
    }

    #[test]
    fn unknown_function_is_reported_as_output() {
        let dir = tempdir().unwrap();

        let output = dispatcher(dir.path()).dispatch(&tool_call("call_1", "delete_everything", json!({})));

        assert_eq!(output.tool_call_id, "call_1");
        assert_eq!(output.output, "function not found: delete_everything");
    }

    #[test]
    fn malformed_arguments_are_reported_as_output() {
        let dir = tempdir().unwrap();
        let call = ToolCall {
            function: ToolCallFunction {
                name: "read_file".to_string(),
                arguments: "{\"filepath\": ".to_string(),
            },
            ..tool_call("call_2", "read_file", json!({}))
        };

        let output = dispatcher(dir.path()).dispatch(&call);

        assert!(output.output.starts_with("invalid arguments for read_file"), "{}", output.output);
    }

    #[test]
    fn tool_errors_are_reported_as_output() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let output = dispatcher(dir.path()).dispatch(&tool_call(
            "call_3",
            "read_file",
            json!({"filepath": missing}),
        ));

        assert!(output.output.starts_with("could not read"), "{}", output.output);
    }

    #[test]
    fn calls_are_answered_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("src/lib.rs");
        let calls = [
            tool_call("call_a", "create_file", json!({"filepath": path, "content": "pub fn x() {}"})),
            tool_call("call_b", "read_file", json!({"filepath": path})),
            tool_call("call_c", "list_files", json!({"path": dir.path()})),
        ];

        let outputs = dispatcher(dir.path()).dispatch_all(&calls);

        let ids: Vec<&str> = outputs.iter().map(|o| o.tool_call_id.as_str()).collect();
        assert_eq!(ids, ["call_a", "call_b", "call_c"]);
        assert_eq!(outputs[1].output, "pub fn x() {}");
        assert_eq!(outputs[2].output, path.display().to_string());
    }

    #[cfg(unix)]
    #[test]
    fn run_tests_accepts_empty_arguments() {
        let dir = tempdir().unwrap();

        assert_eq!(dispatcher(dir.path()).call("run_tests", "").unwrap(), "ran tests\n");
    }

    #[test]
    fn definitions_cover_every_tool() {
        let definitions = Dispatcher::definitions();
        let names: Vec<&str> = definitions.iter().filter_map(Tool::function_name).collect();

        assert_eq!(names, Dispatcher::names().collect::<Vec<_>>());

        let create_file = serde_json::to_value(&definitions[0]).unwrap();
        let required = create_file["function"]["parameters"]["required"].as_array().unwrap();
        assert!(required.contains(&json!("filepath")));
        assert!(required.contains(&json!("content")));
    }
}
