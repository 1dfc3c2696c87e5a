//! Tool trait: auxiliary helpers the tutor can surface to students.
//!
//! Tools are static lookups (concept explanations, complexity tables,
//! progressive hints). They take JSON arguments so the same registry can be
//! driven from HTTP, the CLI, or a model's function call.

use crate::error::ToolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A request to execute a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON object
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Which tool produced this output
    pub tool: String,

    pub success: bool,

    /// Markdown text shown to the student
    pub output: String,
}

/// Description of a registered tool, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the arguments
    pub parameters: serde_json::Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "explain_dsa_concept").
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError>;

    fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A name-ordered registry of available tools.
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Tool descriptions in name order.
    pub fn infos(&self) -> Vec<ToolInfo> {
        self.tools.values().map(|t| t.info()).collect()
    }

    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
        tool.execute(call.arguments.clone()).await
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the text argument"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            })
        }

        async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
            let text = arguments["text"]
                .as_str()
                .ok_or_else(|| ToolError::InvalidArguments("Missing 'text' argument".into()))?;
            Ok(ToolResult {
                tool: self.name().into(),
                success: true,
                output: text.into(),
            })
        }
    }

    #[tokio::test]
    async fn registry_executes_registered_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let call = ToolCall {
            name: "echo".into(),
            arguments: serde_json::json!({"text": "hi"}),
        };
        let result = registry.execute(&call).await.unwrap();
        assert_eq!(result.output, "hi");
        assert_eq!(registry.names(), vec!["echo"]);
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let registry = ToolRegistry::new();
        let call = ToolCall {
            name: "nope".into(),
            arguments: serde_json::Value::Null,
        };
        assert!(matches!(
            registry.execute(&call).await,
            Err(ToolError::NotFound(_))
        ));
    }

    #[test]
    fn infos_are_name_ordered() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let infos = registry.infos();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].parameters["required"][0], "text");
    }
}
