//! Function tools exposed to a chat model.
//!
//! Definitions serialize to the OpenAI function-calling format. Dispatch
//! never fails: every outcome, including bad input, is a string the model
//! can read.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::catalog::SummaryCatalog;

/// Name of the summary lookup tool.
pub const GET_SUMMARY_BY_TITLE: &str = "get_summary_by_title";

/// A string parameter of a function tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
}

impl ToolParameter {
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: true,
        }
    }
}

/// A callable function and its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionTool {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl FunctionTool {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// JSON schema in OpenAI function-calling format.
    pub fn schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for parameter in &self.parameters {
            properties.insert(
                parameter.name.clone(),
                serde_json::json!({
                    "type": "string",
                    "description": parameter.description,
                }),
            );
            if parameter.required {
                required.push(Value::String(parameter.name.clone()));
            }
        }

        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                    "additionalProperties": false
                }
            }
        })
    }
}

/// Tools backed by a [`SummaryCatalog`].
#[derive(Debug, Clone)]
pub struct SummaryTool {
    catalog: SummaryCatalog,
}

impl SummaryTool {
    pub fn new(catalog: SummaryCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SummaryCatalog {
        &self.catalog
    }

    /// Every tool this dispatcher answers.
    pub fn definitions() -> Vec<FunctionTool> {
        vec![
            FunctionTool::new(
                GET_SUMMARY_BY_TITLE,
                "Return the full summary for a single book title from the library. \
                 Use the EXACT title text from the provided candidate list.",
            )
            .with_parameter(ToolParameter::required(
                "title",
                "Exact book title to retrieve the full summary for.",
            )),
        ]
    }

    /// Schemas of [`Self::definitions`] as a JSON array.
    pub fn schemas() -> Value {
        Value::Array(Self::definitions().iter().map(FunctionTool::schema).collect())
    }

    /// Full summary for `title`, or an apology naming the title.
    pub fn get_summary_by_title(&self, title: &str) -> String {
        match self.catalog.get(title) {
            Some(summary) => summary.to_string(),
            None => format!(
                "Sorry, I couldn't find a summary for the book titled '{title}'. \
                 Please check the title and try again."
            ),
        }
    }

    /// Dispatch a tool call. Blank arguments are treated as `{}`.
    pub fn call(&self, tool_name: &str, arguments_json: &str) -> String {
        debug!("Tool call: {tool_name}({arguments_json})");

        if tool_name != GET_SUMMARY_BY_TITLE {
            return format!("Unknown tool: {tool_name}");
        }

        let arguments_json = if arguments_json.trim().is_empty() {
            "{}"
        } else {
            arguments_json
        };
        let arguments = match serde_json::from_str::<Value>(arguments_json) {
            Ok(Value::Object(map)) => map,
            _ => return "Invalid JSON for tool arguments.".to_string(),
        };

        let title = arguments.get("title").and_then(Value::as_str).unwrap_or("");
        self.get_summary_by_title(title)
    }
}
