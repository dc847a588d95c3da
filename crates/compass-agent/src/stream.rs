//! Turn event stream.
//!
//! The streaming responder delivers a turn as an ordered event sequence:
//! optional phase markers while tools run, then the final answer as text
//! fragments, then a single terminal event with the trace and session
//! snapshot. Tool-phase activity never produces text fragments, so
//! fragments of the final answer cannot interleave with tool rounds.

use serde::Serialize;

use compass_core::types::{SessionSnapshot, ToolCallRecord};

/// Events delivered to a streaming caller, in order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TurnEvent {
    /// A tool round started; the only caller-visible signal during
    /// TOOL_EXECUTING.
    Phase { tool: String },
    /// One fragment of the final assistant message.
    Delta { text: String },
    /// Terminal event; always after every fragment of the turn.
    Done {
        session_id: String,
        response: String,
        tool_calls: Vec<ToolCallRecord>,
        truncated: bool,
        session_data: SessionSnapshot,
    },
    /// The turn failed before producing a final answer.
    Error { message: String },
}

/// Maximum fragment length in bytes. Fragments break on word boundaries.
const FRAGMENT_TARGET: usize = 48;

/// Split the final answer into ordered fragments for delivery.
///
/// Whole words are kept together; a single word longer than the target
/// becomes its own fragment.
pub fn chunk_text(text: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    for word in text.split_inclusive(char::is_whitespace) {
        if !current.is_empty() && current.len() + word.len() > FRAGMENT_TARGET {
            fragments.push(std::mem::take(&mut current));
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        fragments.push(current);
    }
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_empty_text() {
        assert!(chunk_text("").is_empty());
    }

    #[test]
    fn test_chunk_short_text_single_fragment() {
        let fragments = chunk_text("You likely qualify for SNAP.");
        assert_eq!(fragments.len(), 1);
    }

    #[test]
    fn test_chunks_reassemble_exactly() {
        let text = "Based on what you've shared, you likely qualify for SNAP, Medicaid, \
                    and LIHEAP. Here's what I found for your household of three in Texas.";
        let fragments = chunk_text(text);
        assert!(fragments.len() > 1);
        assert_eq!(fragments.concat(), text);
    }

    #[test]
    fn test_chunk_respects_word_boundaries() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
        for fragment in chunk_text(text) {
            // No fragment starts mid-word.
            assert!(!fragment.starts_with(char::is_whitespace) || fragment.trim().is_empty());
        }
    }

    #[test]
    fn test_chunk_long_word_kept_whole() {
        let word = "a".repeat(100);
        let fragments = chunk_text(&word);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0], word);
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = TurnEvent::Delta {
            text: "hello".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "delta");
        assert_eq!(json["text"], "hello");

        let event = TurnEvent::Phase {
            tool: "check_benefit_eligibility".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "phase");
    }
}
