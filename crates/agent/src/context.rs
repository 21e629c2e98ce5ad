//! The conversation context handed to the main agent every turn.

use crate::dispatcher::DispatchResult;

/// The text prompt that carries the whole run's history.
///
/// Append-only: it starts from the challenge and only ever grows by a
/// nudge or a folded batch of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationContext {
    buffer: String,
}

impl ConversationContext {
    pub fn new(challenge: &str) -> Self {
        Self {
            buffer: format!(
                "CHALLENGE: {challenge}\n\nBegin. Delegate tasks to your team using @TOOLS: @CODE: or @TEXT: format.\n"
            ),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Remind the main agent to delegate after a response with no markers.
    pub fn push_nudge(&mut self, response: &str) {
        self.buffer.push_str(&format!("\nYour response:\n{response}\n\n"));
        self.buffer.push_str(
            "I don't see any @TOOLS: or @CODE: or @TEXT: delegations. Please delegate the next task.\n",
        );
    }

    /// Fold the main agent's response and every sub-agent result back in.
    pub fn push_results(
        &mut self,
        response: &str,
        results: &[DispatchResult],
        task_chars: usize,
        result_chars: usize,
    ) {
        self.buffer
            .push_str(&format!("\nYour previous delegation:\n{response}\n\nResults:\n"));
        for result in results {
            self.buffer.push_str(&format!(
                "\n[{}] Task: {}\nResult: {}\n",
                result.kind.tag(),
                truncate_chars(&result.task, task_chars),
                truncate_chars(&result.output, result_chars),
            ));
        }
        self.buffer
            .push_str("\nWhat's next? Delegate the next step or say DONE if the project is complete.\n");
    }
}

impl std::fmt::Display for ConversationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.buffer)
    }
}

/// The first `max` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentrelay_core::agent::DelegationKind;

    #[test]
    fn starts_with_challenge() {
        let ctx = ConversationContext::new("Build a TTS app");
        assert_eq!(
            ctx.as_str(),
            "CHALLENGE: Build a TTS app\n\nBegin. Delegate tasks to your team using @TOOLS: @CODE: or @TEXT: format.\n"
        );
    }

    #[test]
    fn nudge_appends() {
        let mut ctx = ConversationContext::new("x");
        let before = ctx.as_str().to_string();
        ctx.push_nudge("I will think about it.");

        assert!(ctx.as_str().starts_with(&before));
        assert!(ctx.as_str().ends_with(
            "\nYour response:\nI will think about it.\n\nI don't see any @TOOLS: or @CODE: or @TEXT: delegations. Please delegate the next task.\n"
        ));
    }

    #[test]
    fn results_are_folded_with_previews() {
        let mut ctx = ConversationContext::new("x");
        let results = vec![
            DispatchResult::new(DelegationKind::Tools, "ls -la", "Command: ls -la\nOutput: app.py"),
            DispatchResult::new(DelegationKind::Code, "a".repeat(100), "b".repeat(400)),
        ];
        ctx.push_results("@TOOLS: ls -la @CODE: aaa", &results, 80, 300);

        let text = ctx.as_str();
        assert!(
            text.contains("\nYour previous delegation:\n@TOOLS: ls -la @CODE: aaa\n\nResults:\n")
        );
        assert!(text.contains("\n[TOOLS] Task: ls -la\nResult: Command: ls -la\nOutput: app.py\n"));
        let folded = format!("\n[CODE] Task: {}\nResult: {}\n", "a".repeat(80), "b".repeat(300));
        assert!(text.contains(&folded));
        assert!(!text.contains(&"a".repeat(81)));
        assert!(text.ends_with(
            "\nWhat's next? Delegate the next step or say DONE if the project is complete.\n"
        ));
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
        assert_eq!(truncate_chars("short", 80), "short");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn only_grows() {
        let mut ctx = ConversationContext::new("grow");
        let mut last = ctx.len();
        for i in 0..5 {
            if i % 2 == 0 {
                ctx.push_nudge("hmm");
            } else {
                ctx.push_results("@TEXT: hi", &[], 80, 300);
            }
            assert!(ctx.len() > last);
            last = ctx.len();
        }
        assert!(!ctx.is_empty());
        assert_eq!(ctx.to_string(), ctx.as_str());
    }
}
