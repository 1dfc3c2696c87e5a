//! Complexity cheat sheet for a described algorithm.

use crate::lookup::required_str;
use async_trait::async_trait;
use dsatutor_core::error::ToolError;
use dsatutor_core::tool::{Tool, ToolResult};

const COMPLEXITY_TABLE: &str = "### Common Complexity Classes:
| Notation | Name | Example |
|----------|------|---------|
| O(1) | Constant | Array access by index |
| O(log n) | Logarithmic | Binary search |
| O(n) | Linear | Single loop through array |
| O(n log n) | Linearithmic | Merge sort, Quick sort |
| O(n²) | Quadratic | Nested loops |
| O(2ⁿ) | Exponential | Recursive Fibonacci |

### Tips:
- Count the number of nested loops
- Recursive calls often multiply complexity
- Hash tables provide O(1) average lookup
- Sorting typically costs O(n log n)
";

/// The description is echoed in the heading; the table is fixed.
pub fn analyze_complexity(code_description: &str) -> String {
    format!("## Complexity Analysis for: {code_description}\n\n{COMPLEXITY_TABLE}")
}

pub struct AnalyzeComplexityTool;

#[async_trait]
impl Tool for AnalyzeComplexityTool {
    fn name(&self) -> &str {
        "analyze_complexity"
    }

    fn description(&self) -> &str {
        "Summarize common time and space complexity classes for a described algorithm."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "code_description": {
                    "type": "string",
                    "description": "Description of the algorithm or approach to analyze"
                }
            },
            "required": ["code_description"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let description = required_str(&arguments, "code_description")?;
        Ok(ToolResult {
            tool: self.name().into(),
            success: true,
            output: analyze_complexity(description),
        })
    }
}
