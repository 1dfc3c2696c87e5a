//! Built-in DSA lookup tools.
//!
//! Each tool answers from a static table: concept explanations, a
//! complexity cheat sheet, and progressive LeetCode hints. Lookups are
//! case-insensitive and match when either string contains the other.

pub mod complexity;
pub mod explain_concept;
pub mod leetcode_hints;
mod lookup;

use dsatutor_core::tool::ToolRegistry;

pub use complexity::AnalyzeComplexityTool;
pub use explain_concept::ExplainConceptTool;
pub use leetcode_hints::LeetcodeHintsTool;

/// Create a registry holding every built-in tool.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(ExplainConceptTool));
    registry.register(Box::new(AnalyzeComplexityTool));
    registry.register(Box::new(LeetcodeHintsTool));
    registry
}
