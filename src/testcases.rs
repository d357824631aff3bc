//! Stage 2: synthesize test cases from the element listing.

use crate::config::Config;
use crate::elements::ElementListing;
use crate::prompts;
use crate::providers::{self, CompletionRequest};
use crate::table;
use crate::theme;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// One synthesized test case.  Wire names match the table columns the
/// script stage reads back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(rename = "Test_Case_ID")]
    pub id: String,
    #[serde(rename = "Test_Scenario")]
    pub scenario: String,
    #[serde(rename = "Steps_to_Execute")]
    pub steps: String,
    #[serde(rename = "Expected_Result")]
    pub expected_result: String,
}

/// Validation failures for a model response.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("response contains no JSON array")]
    MissingArray,
    #[error("response parsed to an empty test case list")]
    Empty,
    #[error("test case {0} is missing required fields")]
    IncompleteCase(String),
}

/// Strip a surrounding markdown code fence, if any.  The info string after
/// the opening fence (e.g. ```json) is dropped with it.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.split_once('\n') {
        Some((_info, body)) => body,
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Locate the outermost JSON array in a model response.  Models routinely
/// wrap the array in prose or a code fence despite the prompt contract.
pub fn extract_json_array(raw: &str) -> Result<&str, ResponseError> {
    let cleaned = strip_code_fence(raw);
    let start = cleaned.find('[').ok_or(ResponseError::MissingArray)?;
    let end = cleaned.rfind(']').ok_or(ResponseError::MissingArray)?;
    if end < start {
        return Err(ResponseError::MissingArray);
    }
    Ok(&cleaned[start..=end])
}

/// Parse and validate a test-case response.  Every case must carry a
/// non-empty ID, scenario, steps, and expected result.
pub fn parse_test_cases(raw: &str) -> Result<Vec<TestCase>> {
    let json = extract_json_array(raw)?;
    let cases: Vec<TestCase> =
        serde_json::from_str(json).context("Test case array is not valid JSON")?;

    if cases.is_empty() {
        return Err(ResponseError::Empty.into());
    }
    for case in &cases {
        if case.id.trim().is_empty()
            || case.scenario.trim().is_empty()
            || case.steps.trim().is_empty()
            || case.expected_result.trim().is_empty()
        {
            let label = if case.id.trim().is_empty() {
                "<unnamed>".to_string()
            } else {
                case.id.clone()
            };
            return Err(ResponseError::IncompleteCase(label).into());
        }
    }

    Ok(cases)
}

/// Run the test-case stage end to end and return the artifact path.
pub async fn run(
    http: &reqwest::Client,
    config: &Config,
    count_override: Option<usize>,
) -> Result<PathBuf> {
    let count = count_override.unwrap_or(config.case_count).max(1);

    let listing = ElementListing::load(&config.elements_path())
        .context("Run `testforge scrape` first")?;
    let elements_json = serde_json::to_string_pretty(&listing)?;

    let request = CompletionRequest::resolve(
        config,
        config.case_temperature,
        prompts::test_case_prompt(&elements_json, count),
    )?;

    let pb = theme::spinner(&format!(
        "Generating {count} test cases with {}",
        request.model
    ));
    let raw = match providers::complete(http, &request).await {
        Ok(text) => {
            theme::spinner_ok(&pb, "Model responded");
            text
        }
        Err(err) => {
            theme::spinner_fail(&pb, "Model call failed");
            return Err(err);
        }
    };

    let cases = parse_test_cases(&raw).context("Model response failed validation")?;

    let path = config.test_cases_path();
    table::write_rows(&path, &cases)?;

    for case in &cases {
        println!("{}", theme::label_value(&case.id, &case.scenario));
    }
    println!(
        "{}",
        theme::icon_ok(&format!(
            "Wrote {} test cases to {}",
            cases.len(),
            path.display()
        ))
    );

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_ARRAY: &str = r#"[
        {
            "Test_Case_ID": "TC001",
            "Test_Scenario": "Verify login",
            "Steps_to_Execute": "1. Open page\n2. Log in",
            "Expected_Result": "Dashboard shown"
        }
    ]"#;

    #[test]
    fn strips_fenced_responses() {
        let fenced = format!("```json\n{VALID_ARRAY}\n```");
        assert_eq!(strip_code_fence(&fenced), VALID_ARRAY.trim());
        // No fence: input passes through trimmed.
        assert_eq!(strip_code_fence("  plain  "), "plain");
    }

    #[test]
    fn extracts_array_wrapped_in_prose() {
        let raw = format!("Here are your test cases:\n{VALID_ARRAY}\nLet me know!");
        let json = extract_json_array(&raw).unwrap();
        assert!(json.starts_with('['));
        assert!(json.ends_with(']'));
        let cases: Vec<TestCase> = serde_json::from_str(json).unwrap();
        assert_eq!(cases[0].id, "TC001");
    }

    #[test]
    fn missing_array_is_rejected() {
        assert!(matches!(
            extract_json_array("no json here"),
            Err(ResponseError::MissingArray)
        ));
        assert!(matches!(
            extract_json_array("] backwards ["),
            Err(ResponseError::MissingArray)
        ));
    }

    #[test]
    fn parse_accepts_valid_response() {
        let cases = parse_test_cases(VALID_ARRAY).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].scenario, "Verify login");
    }

    #[test]
    fn parse_rejects_empty_array() {
        let err = parse_test_cases("[]").unwrap_err();
        assert!(err.to_string().contains("empty test case list"));
    }

    #[test]
    fn parse_rejects_blank_required_field() {
        let raw = r#"[{
            "Test_Case_ID": "TC001",
            "Test_Scenario": "",
            "Steps_to_Execute": "1. x",
            "Expected_Result": "y"
        }]"#;
        let err = parse_test_cases(raw).unwrap_err();
        assert!(err.to_string().contains("TC001"));
    }

    #[test]
    fn parse_rejects_missing_key() {
        let raw = r#"[{ "Test_Case_ID": "TC001", "Test_Scenario": "s" }]"#;
        assert!(parse_test_cases(raw).is_err());
    }
}
