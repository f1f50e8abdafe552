//! Parse LLM output into an extraction result

use crate::error::ExtractorError;
use billings_domain::{ExtractionResult, TransactionType, DEFAULT_CATEGORY, DEFAULT_SHOP};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::warn;

/// Parse the completion text into an extraction result
///
/// Absent or `null` fields fall back to the defaults (`shop = "Unknown"`,
/// `amount = 0`, `category = "Other"`, `type = none`). A field of the wrong
/// JSON type is an error.
pub fn parse_llm_response(response: &str) -> Result<ExtractionResult, ExtractorError> {
    let json_str = strip_code_fence(response);

    let json: Value = serde_json::from_str(json_str)?;

    let obj = json
        .as_object()
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected JSON object".to_string()))?;

    Ok(ExtractionResult {
        shop: text_field(obj, "shop")?
            .unwrap_or_else(|| DEFAULT_SHOP.to_string()),
        amount: amount_field(obj)?,
        category: text_field(obj, "category")?
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        kind: type_field(obj)?,
    })
}

/// Strip a surrounding markdown code fence, if any
///
/// LLMs sometimes wrap JSON in ```` ```json ... ``` ```` despite being told
/// not to.
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();

    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);

    without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// A string field; blank strings count as absent
fn text_field(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, ExtractorError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => Err(ExtractorError::InvalidFormat(format!(
            "'{}' must be a string, got {}",
            key, other
        ))),
    }
}

fn amount_field(obj: &Map<String, Value>) -> Result<Decimal, ExtractorError> {
    match obj.get("amount") {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        Some(other) => Err(ExtractorError::InvalidFormat(format!(
            "'amount' must be a number, got {}",
            other
        ))),
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, ExtractorError> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|e| ExtractorError::InvalidFormat(format!("Invalid amount '{}': {}", s, e)))
}

fn type_field(obj: &Map<String, Value>) -> Result<TransactionType, ExtractorError> {
    match obj.get("type") {
        None | Some(Value::Null) => Ok(TransactionType::None),
        Some(Value::String(s)) => Ok(TransactionType::parse(s).unwrap_or_else(|| {
            warn!("Unknown transaction type '{}', treating as none", s);
            TransactionType::None
        })),
        Some(other) => Err(ExtractorError::InvalidFormat(format!(
            "'type' must be a string, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let response =
            r#"{"shop":"Groceries Inc","amount":42.50,"category":"Groceries","type":"expense"}"#;

        let result = parse_llm_response(response).unwrap();
        assert_eq!(result.shop, "Groceries Inc");
        assert_eq!(result.amount, Decimal::from_str("42.50").unwrap());
        assert_eq!(result.category, "Groceries");
        assert_eq!(result.kind, TransactionType::Expense);
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = r#"```json
{
    "shop": "Employer Ltd",
    "amount": 350000,
    "category": "Salary",
    "type": "income"
}
```"#;

        let result = parse_llm_response(response).unwrap();
        assert_eq!(result.shop, "Employer Ltd");
        assert_eq!(result.amount, Decimal::from(350_000));
        assert_eq!(result.kind, TransactionType::Income);
    }

    #[test]
    fn test_parse_single_line_fence() {
        let response = r#"```json {"type":"none"} ```"#;
        let result = parse_llm_response(response).unwrap();
        assert_eq!(result.kind, TransactionType::None);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let result = parse_llm_response(r#"{"type":"expense"}"#).unwrap();
        assert_eq!(result.shop, "Unknown");
        assert_eq!(result.category, "Other");
        assert_eq!(result.amount, Decimal::ZERO);
        assert_eq!(result.kind, TransactionType::Expense);

        let result = parse_llm_response("{}").unwrap();
        assert_eq!(result, ExtractionResult::default());
    }

    #[test]
    fn test_null_and_blank_fields_take_defaults() {
        let result =
            parse_llm_response(r#"{"shop":null,"amount":null,"category":" ","type":null}"#).unwrap();
        assert_eq!(result, ExtractionResult::default());
    }

    #[test]
    fn test_string_amount() {
        let result = parse_llm_response(r#"{"amount":"1299.90","type":"expense"}"#).unwrap();
        assert_eq!(result.amount, Decimal::from_str("1299.9").unwrap());
    }

    #[test]
    fn test_scientific_amount() {
        let result = parse_llm_response(r#"{"amount":1.5e3,"type":"expense"}"#).unwrap();
        assert_eq!(result.amount, Decimal::from(1500));
    }

    #[test]
    fn test_unknown_type_is_none() {
        let result = parse_llm_response(r#"{"type":"transfer"}"#).unwrap();
        assert_eq!(result.kind, TransactionType::None);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_llm_response("This is not JSON");
        assert!(matches!(result, Err(ExtractorError::JsonParse(_))));
    }

    #[test]
    fn test_parse_json_not_object() {
        let result = parse_llm_response(r#"[{"type":"expense"}]"#);
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_wrong_field_types_are_errors() {
        assert!(parse_llm_response(r#"{"shop": 12}"#).is_err());
        assert!(parse_llm_response(r#"{"amount": "about ten"}"#).is_err());
        assert!(parse_llm_response(r#"{"amount": [1]}"#).is_err());
        assert!(parse_llm_response(r#"{"type": true}"#).is_err());
    }

    #[test]
    fn test_strip_code_fence_plain_json() {
        let json = r#"{"key": "value"}"#;
        assert_eq!(strip_code_fence(json), json);
    }

    #[test]
    fn test_strip_code_fence_without_language() {
        let response = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fence(response), r#"{"key": "value"}"#);
    }

    #[test]
    fn test_strip_code_fence_surrounding_whitespace() {
        let response = "\n  ```json\n{\"key\": 1}\n```  \n";
        assert_eq!(strip_code_fence(response), r#"{"key": 1}"#);
    }
}
