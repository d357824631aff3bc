//! Prompt templates for the two synthesis stages.

use crate::testcases::TestCase;

/// Prompt asking the model for `count` test cases over an element listing.
/// The response contract is a bare JSON array with fixed object keys; the
/// parser in `testcases` enforces it.
pub fn test_case_prompt(elements_json: &str, count: usize) -> String {
    format!(
        r#"You are a test automation expert. Based on the following website UI elements, generate {count} detailed test cases.

Website UI Elements:
{elements_json}

Generate exactly {count} test cases in a valid JSON array format. Each test case should be a JSON object with these exact keys:
- Test_Case_ID (format: TC001, TC002, etc.)
- Test_Scenario (clear description of what is being tested)
- Steps_to_Execute (numbered steps)
- Expected_Result (clear success criteria)

Focus areas:
1. User authentication flows
2. Navigation and menu interactions
3. Form submissions and validations
4. Error handling scenarios
5. Data validation checks

IMPORTANT: Return ONLY the JSON array without any additional text or explanation."#
    )
}

/// Prompt asking the model for a Selenium script implementing one test case.
pub fn script_prompt(case: &TestCase) -> String {
    format!(
        r#"Generate a Python Selenium script for the following test case:

Test Case ID: {id}
Test Scenario: {scenario}
Steps to Execute: {steps}
Expected Result: {expected}

Requirements:
1. Use Python and Selenium WebDriver
2. Include proper waits and error handling
3. Use Page Object Model pattern
4. Include documentation and comments
5. Handle exceptions appropriately
6. Include logging
7. Return the complete script as a single string

Generate a complete, runnable Python script that implements this test case."#,
        id = case.id,
        scenario = case.scenario,
        steps = case.steps,
        expected = case.expected_result,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_prompt_embeds_listing_and_count() {
        let prompt = test_case_prompt("{\"buttons\": []}", 7);
        assert!(prompt.contains("generate 7 detailed test cases"));
        assert!(prompt.contains("exactly 7 test cases"));
        assert!(prompt.contains("{\"buttons\": []}"));
        assert!(prompt.contains("Test_Case_ID"));
        assert!(prompt.contains("Return ONLY the JSON array"));
    }

    #[test]
    fn script_prompt_carries_every_field() {
        let case = TestCase {
            id: "TC001".to_string(),
            scenario: "Login with valid credentials".to_string(),
            steps: "1. Open page\n2. Submit form".to_string(),
            expected_result: "User is logged in".to_string(),
        };
        let prompt = script_prompt(&case);
        assert!(prompt.contains("TC001"));
        assert!(prompt.contains("Login with valid credentials"));
        assert!(prompt.contains("2. Submit form"));
        assert!(prompt.contains("User is logged in"));
        assert!(prompt.contains("Page Object Model"));
    }
}
