//! Concept explainer: beginner-friendly analogies for common DSA topics.

use crate::lookup::{find_entry, required_str, title_case};
use async_trait::async_trait;
use dsatutor_core::error::ToolError;
use dsatutor_core::tool::{Tool, ToolResult};

const CONCEPTS: [(&str, &str); 12] = [
    (
        "array",
        "An array is a collection of elements stored at contiguous memory locations. Think of it like a row of lockers - each locker has a number (index) and can store one item.",
    ),
    (
        "linked list",
        "A linked list is a chain of nodes where each node contains data and a pointer to the next node. Like a treasure hunt where each clue points to the next location.",
    ),
    (
        "stack",
        "A stack follows LIFO (Last In, First Out). Like a stack of plates - you add and remove from the top only.",
    ),
    (
        "queue",
        "A queue follows FIFO (First In, First Out). Like a line at a store - first person in line is served first.",
    ),
    (
        "hash table",
        "A hash table uses a hash function to map keys to values for fast lookups. Like a library catalog that tells you exactly where to find a book.",
    ),
    (
        "binary search",
        "Binary search works on sorted data by repeatedly dividing the search space in half. Like guessing a number between 1-100 by always guessing the middle.",
    ),
    (
        "recursion",
        "Recursion is when a function calls itself to solve smaller subproblems. Like Russian nesting dolls - each doll contains a smaller version of itself.",
    ),
    (
        "dynamic programming",
        "DP solves complex problems by breaking them into overlapping subproblems and storing results to avoid redundant work. Like filling a table of solutions bottom-up.",
    ),
    (
        "binary tree",
        "A binary tree is a hierarchical structure where each node has at most two children (left and right). Like a family tree but each person has at most 2 children.",
    ),
    (
        "graph",
        "A graph consists of vertices (nodes) connected by edges. Like a social network where people are vertices and friendships are edges.",
    ),
    (
        "two pointers",
        "Two pointers technique uses two indices to traverse data, often from opposite ends. Like two people walking towards each other on a path.",
    ),
    (
        "sliding window",
        "Sliding window maintains a window of elements that slides through the array. Like looking through a moving frame at a painting.",
    ),
];

/// Explain a DSA concept. Unknown concepts get a generic placeholder.
pub fn explain_dsa_concept(concept: &str) -> String {
    let heading = title_case(concept);
    match find_entry(&CONCEPTS, concept) {
        Some(explanation) => format!(
            "## {heading}\n\n{explanation}\n\n### Key Points:\n- Commonly used in coding interviews\n- Practice with LeetCode problems to master it"
        ),
        None => format!(
            "## {heading}\n\nThis is an important DSA concept. Let me explain it step by step in the main response."
        ),
    }
}

pub struct ExplainConceptTool;

#[async_trait]
impl Tool for ExplainConceptTool {
    fn name(&self) -> &str {
        "explain_dsa_concept"
    }

    fn description(&self) -> &str {
        "Explain a data structure or algorithm concept in simple terms, with an everyday analogy."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "concept": {
                    "type": "string",
                    "description": "The concept to explain, e.g. 'binary search' or 'hash table'"
                }
            },
            "required": ["concept"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let concept = required_str(&arguments, "concept")?;
        Ok(ToolResult {
            tool: self.name().into(),
            success: true,
            output: explain_dsa_concept(concept),
        })
    }
}
