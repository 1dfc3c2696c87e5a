//! Progressive hints for well-known LeetCode problems.
//!
//! Level 1 nudges toward the right data structure, level 3 nearly spells
//! out the algorithm. Levels outside 1–3 are clamped.

use crate::lookup::{find_entry, required_str};
use async_trait::async_trait;
use dsatutor_core::error::ToolError;
use dsatutor_core::tool::{Tool, ToolResult};

const HINTS: [(&str, [&str; 3]); 4] = [
    (
        "two sum",
        [
            "Hint 1: Think about what information you need to find a pair that sums to target.",
            "Hint 2: For each number, you need to find if its complement (target - num) exists. How can you check this quickly?",
            "Hint 3: Use a hash map to store numbers you've seen and their indices. For each new number, check if (target - num) is in the map.",
        ],
    ),
    (
        "valid parentheses",
        [
            "Hint 1: What data structure follows Last-In-First-Out (LIFO) order?",
            "Hint 2: Push opening brackets onto a stack. When you see a closing bracket, check if it matches the top of the stack.",
            "Hint 3: Use a dictionary to map closing brackets to opening brackets. Pop from stack and verify match.",
        ],
    ),
    (
        "reverse linked list",
        [
            "Hint 1: You need to change the direction of all the arrows (next pointers).",
            "Hint 2: Keep track of three nodes: previous, current, and next.",
            "Hint 3: Save next, point current to previous, then move forward. prev=curr, curr=next.",
        ],
    ),
    (
        "binary search",
        [
            "Hint 1: Always work with a sorted array. Compare middle element with target.",
            "Hint 2: If target < mid, search left half. If target > mid, search right half.",
            "Hint 3: Use left and right pointers. mid = (left + right) // 2. Update boundaries based on comparison.",
        ],
    ),
];

const GENERIC_HINTS: [&str; 3] = [
    "Start by understanding the problem: What are the inputs? What output is expected?",
    "Think about the brute force solution first, then optimize. What data structure could help?",
    "Consider edge cases: empty input, single element, duplicates. Write out the algorithm step by step.",
];

/// Hint for `problem_name` at `hint_level` (clamped to 1..=3).
pub fn get_leetcode_hints(problem_name: &str, hint_level: i64) -> &'static str {
    let index = (hint_level.clamp(1, 3) - 1) as usize;
    let hints = find_entry(&HINTS, problem_name).unwrap_or(&GENERIC_HINTS);
    hints[index]
}

pub struct LeetcodeHintsTool;

#[async_trait]
impl Tool for LeetcodeHintsTool {
    fn name(&self) -> &str {
        "get_leetcode_hints"
    }

    fn description(&self) -> &str {
        "Give a progressive hint for a LeetCode problem without revealing the solution."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "problem_name": {
                    "type": "string",
                    "description": "Name of the problem, e.g. 'Two Sum'"
                },
                "hint_level": {
                    "type": "integer",
                    "description": "1 = basic, 2 = medium, 3 = detailed",
                    "default": 1
                }
            },
            "required": ["problem_name"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let problem = required_str(&arguments, "problem_name")?;
        let level = match arguments.get("hint_level") {
            None | Some(serde_json::Value::Null) => 1,
            Some(v) => v.as_i64().ok_or_else(|| {
                ToolError::InvalidArguments("'hint_level' must be an integer".into())
            })?,
        };

        Ok(ToolResult {
            tool: self.name().into(),
            success: true,
            output: get_leetcode_hints(problem, level).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_problem_levels() {
        assert!(get_leetcode_hints("Two Sum", 1).starts_with("Hint 1: Think about"));
        assert!(get_leetcode_hints("two sum", 3).contains("hash map"));
        assert!(get_leetcode_hints("Valid Parentheses", 2).contains("stack"));
    }

    #[test]
    fn level_is_clamped() {
        assert_eq!(
            get_leetcode_hints("binary search", 0),
            get_leetcode_hints("binary search", 1)
        );
        assert_eq!(
            get_leetcode_hints("binary search", 99),
            get_leetcode_hints("binary search", 3)
        );
        assert_eq!(get_leetcode_hints("binary search", -5), HINTS[3].1[0]);
    }

    #[test]
    fn unknown_problem_gets_generic_hint() {
        assert_eq!(get_leetcode_hints("Median of Two Sorted Arrays", 2), GENERIC_HINTS[1]);
    }

    #[tokio::test]
    async fn default_level_is_one() {
        let result = LeetcodeHintsTool
            .execute(serde_json::json!({"problem_name": "Reverse Linked List"}))
            .await
            .unwrap();
        assert!(result.output.starts_with("Hint 1:"));
    }

    #[tokio::test]
    async fn non_integer_level_is_invalid() {
        let result = LeetcodeHintsTool
            .execute(serde_json::json!({"problem_name": "Two Sum", "hint_level": "high"}))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
