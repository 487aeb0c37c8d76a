//! Keyword fallback: canned replies computed locally when the dialog engine is unavailable.
//!
//! Rules are evaluated top to bottom against the lower-cased message; the first rule with a
//! keyword contained in the message wins. Order matters: "hi, can you help" is a greeting.

pub const GREETING_REPLY: &str = "Hello! Welcome to our smart chatbot. How can I help you today?";
pub const HELP_REPLY: &str = "I can help you with general questions. You can ask me about our services, products, or just chat with me!";
pub const THANKS_REPLY: &str = "You're welcome! Is there anything else I can help you with?";
pub const FAREWELL_REPLY: &str = "Goodbye! Thanks for chatting with us. Have a great day!";
pub const NOT_UNDERSTOOD_REPLY: &str = "I'm sorry, I didn't understand that. Can you please rephrase?";

/// One fallback rule: any keyword (substring, lower-case) selects the reply.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
}

impl KeywordRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Fallback rules in precedence order.
pub const RULES: [KeywordRule; 4] = [
    KeywordRule {
        keywords: &["hello", "hi", "hey"],
        reply: GREETING_REPLY,
    },
    KeywordRule {
        keywords: &["help"],
        reply: HELP_REPLY,
    },
    KeywordRule {
        keywords: &["thank"],
        reply: THANKS_REPLY,
    },
    KeywordRule {
        keywords: &["bye", "goodbye"],
        reply: FAREWELL_REPLY,
    },
];

/// Reply text for a message when no dialog engine answer is available. Pure and deterministic.
pub fn fallback(message: &str) -> &'static str {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.reply)
        .unwrap_or(NOT_UNDERSTOOD_REPLY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greetings_are_case_insensitive() {
        for m in ["hello", "Hi there", "HEY!", "well HELLO"] {
            assert_eq!(fallback(m), GREETING_REPLY, "message: {}", m);
        }
    }

    #[test]
    fn greeting_takes_precedence_over_help() {
        assert_eq!(fallback("hi, help me"), GREETING_REPLY);
        assert_eq!(fallback("hi, can you help"), GREETING_REPLY);
    }

    #[test]
    fn help_thanks_and_farewell() {
        assert_eq!(fallback("I need HELP"), HELP_REPLY);
        assert_eq!(fallback("thank you"), THANKS_REPLY);
        assert_eq!(fallback("Thanks a lot"), THANKS_REPLY);
        assert_eq!(fallback("goodbye"), FAREWELL_REPLY);
        assert_eq!(fallback("bye now"), FAREWELL_REPLY);
    }

    #[test]
    fn help_wins_over_thanks() {
        assert_eq!(fallback("thanks for the help"), HELP_REPLY);
    }

    #[test]
    fn substring_matching_is_literal() {
        // "this" contains "hi"
        assert_eq!(fallback("what is this"), GREETING_REPLY);
    }

    #[test]
    fn unmatched_and_empty_get_generic_reply() {
        assert_eq!(fallback(""), NOT_UNDERSTOOD_REPLY);
        assert_eq!(fallback("unknown message"), NOT_UNDERSTOOD_REPLY);
        assert_eq!(fallback("order status"), NOT_UNDERSTOOD_REPLY);
    }

    #[test]
    fn same_input_same_output() {
        let a = fallback("Goodbye friend");
        let b = fallback("Goodbye friend");
        assert_eq!(a, b);
    }
}
