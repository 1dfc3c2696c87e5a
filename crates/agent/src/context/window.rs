use super::truncate::truncate_chars;
use dsatutor_config::ContextConfig;
use dsatutor_core::session::Exchange;

pub const CONTEXT_HEADER: &str = "\n\n--- PREVIOUS CONVERSATION CONTEXT ---\n";
pub const CONTEXT_FOOTER: &str = "--- END CONTEXT ---\n";

/// Bounds on how much history is shown to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    /// Most recent exchanges included, oldest first.
    pub max_exchanges: usize,
    /// Characters kept from each student message.
    pub user_chars: usize,
    /// Characters kept from each tutor reply.
    pub tutor_chars: usize,
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self {
            max_exchanges: 4,
            user_chars: 150,
            tutor_chars: 200,
        }
    }
}

impl From<&ContextConfig> for ContextWindow {
    fn from(config: &ContextConfig) -> Self {
        Self {
            max_exchanges: config.max_exchanges,
            user_chars: config.user_chars,
            tutor_chars: config.tutor_chars,
        }
    }
}

impl ContextWindow {
    /// Render the tail of `history` as a context block.
    ///
    /// Empty history (or a zero-sized window) yields an empty string.
    pub fn assemble(&self, history: &[Exchange]) -> String {
        if history.is_empty() || self.max_exchanges == 0 {
            return String::new();
        }

        let start = history.len().saturating_sub(self.max_exchanges);
        let mut block = String::from(CONTEXT_HEADER);
        for exchange in &history[start..] {
            block.push_str("Student: ");
            block.push_str(&truncate_chars(&exchange.user_text, self.user_chars));
            block.push_str("\nTutor: ");
            block.push_str(&truncate_chars(&exchange.tutor_text, self.tutor_chars));
            block.push_str("\n\n");
        }
        block.push_str(CONTEXT_FOOTER);
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: usize) -> Vec<Exchange> {
        (1..=n)
            .map(|i| Exchange::new(format!("question {i}"), format!("answer {i}")))
            .collect()
    }

    #[test]
    fn empty_history_is_empty_string() {
        assert_eq!(ContextWindow::default().assemble(&[]), "");
    }

    #[test]
    fn single_exchange_layout() {
        let block = ContextWindow::default().assemble(&[Exchange::new("What is a stack?", "LIFO.")]);
        assert_eq!(
            block,
            "\n\n--- PREVIOUS CONVERSATION CONTEXT ---\n\
             Student: What is a stack?\n\
             Tutor: LIFO.\n\n\
             --- END CONTEXT ---\n"
        );
    }

    #[test]
    fn only_last_four_exchanges_appear() {
        let block = ContextWindow::default().assemble(&history(6));
        assert!(!block.contains("question 1\n"));
        assert!(!block.contains("question 2\n"));
        for i in 3..=6 {
            assert!(block.contains(&format!("Student: question {i}\n")));
            assert!(block.contains(&format!("Tutor: answer {i}\n")));
        }
        assert_eq!(block.matches("Student: ").count(), 4);

        let third = block.find("question 3").unwrap();
        let sixth = block.find("question 6").unwrap();
        assert!(third < sixth);
    }

    #[test]
    fn long_entries_are_truncated_per_role() {
        let user = "u".repeat(151);
        let tutor = "t".repeat(250);
        let block = ContextWindow::default().assemble(&[Exchange::new(user, tutor)]);

        assert!(block.contains(&format!("Student: {}...\n", "u".repeat(150))));
        assert!(block.contains(&format!("Tutor: {}...\n", "t".repeat(200))));
    }

    #[test]
    fn entries_at_limit_have_no_marker() {
        let user = "u".repeat(150);
        let block = ContextWindow::default().assemble(&[Exchange::new(user.clone(), "ok")]);
        assert!(block.contains(&format!("Student: {user}\n")));
        assert!(!block.contains("..."));
    }

    #[test]
    fn window_from_config() {
        let config = ContextConfig {
            max_exchanges: 2,
            user_chars: 10,
            tutor_chars: 20,
        };
        let window = ContextWindow::from(&config);
        assert_eq!(window.assemble(&history(5)).matches("Student: ").count(), 2);
    }
}
