//! Offline reply used when no model produced text.

use crate::context::truncate_chars;

const SUMMARY_CHARS: usize = 200;

/// Deterministic, never-empty reply that echoes the problem and outlines
/// a general approach.
pub fn fallback_response(message: &str) -> String {
    let summary = truncate_chars(message, SUMMARY_CHARS);
    let mut reply = String::from("### 🤖 Tutor Response\n\n");
    reply.push_str("I'm having temporary trouble reaching the AI model, but I can still help!\n\n");
    reply.push_str("**Problem Summary:**\n");
    reply.push_str(&summary);
    reply.push_str("\n\n");
    reply.push_str("**General Approach:**\n");
    reply.push_str("1. **Understand**: Break down what input you have and what output is needed.\n");
    reply.push_str("2. **Identify DSA Concept**: Think about arrays, hashing, two-pointers, recursion, or dynamic programming.\n");
    reply.push_str("3. **Design**: Work through a small example by hand.\n");
    reply.push_str("4. **Code**: Write clean Python code with comments.\n");
    reply.push_str("5. **Analyze**: Calculate time and space complexity.\n\n");
    reply.push_str("**Try Again**: Send your question again and I'll attempt a full AI-powered response!");
    reply
}
