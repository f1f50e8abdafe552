//! LLM prompt engineering for notification classification

/// System instruction sent with every extraction request
pub const SYSTEM_INSTRUCTION: &str = "You are a financial API. Respond only with valid JSON.";

/// Builds the user prompt for one notification
pub struct PromptBuilder<'a> {
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a prompt builder for a notification description
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(CLASSIFICATION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Notification:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const CLASSIFICATION_INSTRUCTIONS: &str = r#"You are a financial assistant. Analyze the bank or app notification below.

Tasks:
1. type: "expense" for a purchase or outgoing transfer, "income" for salary, an incoming transfer or a refund, "none" for anything else (advertisement, authentication code, system message, or anything without a monetary amount).
2. shop: where the transaction happened, or who the counterparty is.
3. amount: the number only, without currency symbol or thousands separators.
4. category: a short spending category, e.g. Groceries, Entertainment, Travel, Salary."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (strict JSON object only, no additional text):
{
  "shop": "...",
  "amount": 0,
  "category": "...",
  "type": "expense | income | none"
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_text() {
        let prompt = PromptBuilder::new("App: Bank, Title: Payment, Text: You paid 10 EUR").build();
        assert!(prompt.contains("App: Bank, Title: Payment, Text: You paid 10 EUR"));
    }

    #[test]
    fn test_prompt_names_every_key_and_type() {
        let prompt = PromptBuilder::new("Test").build();
        for key in ["\"shop\"", "\"amount\"", "\"category\"", "\"type\""] {
            assert!(prompt.contains(key), "prompt is missing {key}");
        }
        assert!(prompt.contains("\"expense\""));
        assert!(prompt.contains("\"income\""));
        assert!(prompt.contains("\"none\""));
        assert!(prompt.contains("authentication code"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(PromptBuilder::new("same").build(), PromptBuilder::new("same").build());
    }
}
