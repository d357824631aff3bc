//! Stage 3: synthesize Selenium scripts from the test-case table.

use crate::config::Config;
use crate::prompts;
use crate::providers::{self, CompletionRequest};
use crate::table;
use crate::testcases::{TestCase, strip_code_fence};
use crate::theme;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One generated automation-script row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptRow {
    #[serde(rename = "Test_Case_ID")]
    pub id: String,
    #[serde(rename = "Test_Scenario")]
    pub scenario: String,
    #[serde(rename = "Selenium_Script")]
    pub script: String,
}

/// Run the script stage end to end and return the artifact path.
///
/// Scripts are generated sequentially, one API call per test case.  A
/// failure on any case aborts the stage; nothing is written on failure.
pub async fn run(http: &reqwest::Client, config: &Config) -> Result<PathBuf> {
    let cases: Vec<TestCase> = table::read_rows(&config.test_cases_path())
        .context("Run `testforge testcases` first")?;
    if cases.is_empty() {
        bail!(
            "Test case table at {} is empty",
            config.test_cases_path().display()
        );
    }

    let mut rows = Vec::with_capacity(cases.len());
    for (index, case) in cases.iter().enumerate() {
        let request = CompletionRequest::resolve(
            config,
            config.script_temperature,
            prompts::script_prompt(case),
        )?;

        let pb = theme::spinner(&format!(
            "[{}/{}] Generating script for {}",
            index + 1,
            cases.len(),
            case.id
        ));
        let raw = match providers::complete(http, &request).await {
            Ok(text) => {
                theme::spinner_ok(&pb, &format!("{} — {}", case.id, case.scenario));
                text
            }
            Err(err) => {
                theme::spinner_fail(&pb, &format!("{} failed", case.id));
                return Err(err.context(format!("Script generation failed for {}", case.id)));
            }
        };

        let script = strip_code_fence(&raw).to_string();
        if script.is_empty() {
            bail!("Model returned an empty script for {}", case.id);
        }

        rows.push(ScriptRow {
            id: case.id.clone(),
            scenario: case.scenario.clone(),
            script,
        });
    }

    let path = config.scripts_path();
    table::write_rows(&path, &rows)?;
    println!(
        "{}",
        theme::icon_ok(&format!("Wrote {} scripts to {}", rows.len(), path.display()))
    );

    Ok(path)
}
